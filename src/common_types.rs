use crate::errors::AppError;
use crate::validators::validate_boxes;
use crate::AppResult;
use serde::{Deserialize, Serialize};

/// Corner of a bounding polygon, in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Vertex {
    pub x: i64,
    pub y: i64,
}

/// One recognized region as produced by the OCR engine, before validation.
/// The engine names its score field "confident" and leaves the polygon as a
/// raw JSON value of coordinate pairs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawTextRegion {
    pub boxes: serde_json::Value,
    pub text: String,
    pub confident: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextAnnotation {
    pub boxes: Vec<Vertex>,
    pub text: String,
    pub confidence: f64,
}

impl TextAnnotation {
    /// Validates the raw region into the response shape: the polygon must be
    /// exactly 4 integer pairs, and the engine's "confident" score is
    /// re-exposed as "confidence".
    pub fn from_raw(raw: RawTextRegion) -> AppResult<Self> {
        Ok(TextAnnotation {
            boxes: validate_boxes(&raw.boxes).map_err(|err| AppError::MalformedOcrOutput {
                message: err.to_string(),
            })?,
            text: raw.text,
            confidence: raw.confident,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OcrApiResponse {
    pub text_annotations: Vec<TextAnnotation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_renames_confident() -> AppResult<()> {
        let raw = RawTextRegion {
            boxes: json!([[0, 0], [10, 0], [10, 10], [0, 10]]),
            text: "Hello".to_string(),
            confident: 0.95,
        };
        let annotation = TextAnnotation::from_raw(raw)?;
        assert_eq!(annotation.text, "Hello");
        assert_eq!(annotation.confidence, 0.95);
        assert_eq!(
            annotation.boxes,
            vec![
                Vertex { x: 0, y: 0 },
                Vertex { x: 10, y: 0 },
                Vertex { x: 10, y: 10 },
                Vertex { x: 0, y: 10 }
            ]
        );

        let serialized = serde_json::to_value(&annotation).unwrap();
        assert!(serialized.get("confidence").is_some());
        assert!(serialized.get("confident").is_none());
        Ok(())
    }

    #[test]
    fn test_from_raw_rejects_bad_polygon() {
        let raw = RawTextRegion {
            boxes: json!([[0, 0], [10, 0], [10, 10]]),
            text: "Hello".to_string(),
            confident: 0.95,
        };
        assert!(TextAnnotation::from_raw(raw).is_err());
    }
}
