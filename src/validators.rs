use crate::common_types::Vertex;
use crate::errors::AppError;
use crate::AppResult;
use regex::Regex;
use std::sync::LazyLock;

// Grammar: comma-separated codes, each 2+ ASCII letters with an optional
// alphanumeric subcode, e.g. "en", "ko,fr", "EN-us,pt-BR2".
static LANGUAGES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z]{2,}(?:-[a-zA-Z0-9]+)?)(?:,(?:[a-zA-Z]{2,}(?:-[a-zA-Z0-9]+)?))*$")
        .expect("languages pattern is valid")
});

/// Checks the raw comma-separated language string against the grammar and
/// returns it unchanged. Splitting into individual codes happens later, in
/// the request handler.
pub fn validate_languages(languages: &str) -> AppResult<&str> {
    if !LANGUAGES_PATTERN.is_match(languages) {
        return Err(AppError::validation(
            "Invalid language codes or format. Expected comma-separated codes such as 'en,ko,fr'.",
        ));
    }
    Ok(languages)
}

/// Interprets a raw JSON value as a bounding polygon: exactly 4 coordinate
/// pairs, each pair starting with two integers. Input order is preserved.
pub fn validate_boxes(boxes: &serde_json::Value) -> AppResult<Vec<Vertex>> {
    let pairs = boxes
        .as_array()
        .ok_or_else(|| AppError::validation("Boxes must be a list."))?;
    if pairs.len() != 4 {
        return Err(AppError::validation(
            "Boxes must contain exactly 4 vertices.",
        ));
    }
    pairs
        .iter()
        .map(|pair| {
            let x = pair.get(0).and_then(serde_json::Value::as_i64);
            let y = pair.get(1).and_then(serde_json::Value::as_i64);
            match (x, y) {
                (Some(x), Some(y)) => Ok(Vertex { x, y }),
                _ => Err(AppError::validation(format!(
                    "Invalid vertices: {pair} is not a pair of integers."
                ))),
            }
        })
        .collect()
}
