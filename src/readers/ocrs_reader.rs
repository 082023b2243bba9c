use crate::common_types::RawTextRegion;
use crate::errors::AppError;
use crate::readers::OcrReader;
use crate::AppResult;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams, OcrInput, TextItem};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

// Languages covered by the bundled Latin-alphabet recognition model.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "da", "de", "en", "es", "et", "fi", "fr", "id", "is", "it", "ms", "nl", "no", "pl", "pt",
    "ro", "sv", "sw", "tl", "tr",
];

pub struct OcrsReader {
    ocr_engine: OcrEngine,
}

impl OcrsReader {
    /// Builds a reader for the given language codes. Languages are checked
    /// against the supported set before the expensive model loading starts.
    pub fn new(languages: &[String], models_dir: Option<&Path>) -> AppResult<Self> {
        for language in languages {
            let code = language
                .split('-')
                .next()
                .unwrap_or(language)
                .to_lowercase();
            if !SUPPORTED_LANGUAGES.contains(&code.as_str()) {
                return Err(AppError::UnsupportedLanguage {
                    code: language.clone(),
                });
            }
        }

        let models_dir = match models_dir {
            Some(dir) => dir.to_path_buf(),
            None => Self::find_models_dir()?,
        };
        info!("Loading OCR models from {}", models_dir.to_string_lossy());
        let detection_model_path = models_dir.join("text-detection.rten");
        let rec_model_path = models_dir.join("text-recognition.rten");
        let detection_model =
            rten::Model::load_file(detection_model_path).map_err(AppError::engine)?;
        let recognition_model = rten::Model::load_file(rec_model_path).map_err(AppError::engine)?;
        let ocr_engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(AppError::engine)?;
        Ok(Self { ocr_engine })
    }

    fn find_models_dir() -> AppResult<PathBuf> {
        let executable = std::env::current_exe()?;
        let current_dir = executable.parent().map(|p| p.to_path_buf());

        vec![
            current_dir.clone().map(|p| p.join("models").join("ocrs")),
            current_dir
                .clone()
                .and_then(|p| p.parent().map(|p| p.join("share").join("ocrs"))),
            dirs::home_dir().map(|p| p.join(".cache").join("ocrs")),
        ]
        .into_iter()
        .collect::<Vec<Option<PathBuf>>>()
        .iter()
        .flatten()
        .find(|p| p.exists())
        .cloned()
        .ok_or_else(|| AppError::SystemError {
            message: "Could not find OCR models directory".to_string(),
        })
    }
}

impl OcrReader for OcrsReader {
    fn read_text(&self, image: &[u8]) -> AppResult<Vec<RawTextRegion>> {
        let rgb_image = image::load_from_memory(image)?.to_rgb8();
        let image_source = ImageSource::from_bytes(rgb_image.as_raw(), rgb_image.dimensions())
            .map_err(AppError::engine)?;
        let input: OcrInput = self
            .ocr_engine
            .prepare_input(image_source)
            .map_err(AppError::engine)?;
        let word_rects = self
            .ocr_engine
            .detect_words(&input)
            .map_err(AppError::engine)?;
        let line_rects = self.ocr_engine.find_text_lines(&input, &word_rects);
        let mut regions = vec![];
        for text_line in self
            .ocr_engine
            .recognize_text(&input, &line_rects)
            .map_err(AppError::engine)?
            .into_iter()
            .flatten()
        {
            let corners: Vec<[i64; 2]> = text_line
                .rotated_rect()
                .corners()
                .iter()
                .map(|corner| [corner.x.round() as i64, corner.y.round() as i64])
                .collect();
            regions.push(RawTextRegion {
                boxes: json!(corners),
                text: text_line.to_string(),
                // The recognition pipeline exposes no per-line score.
                confident: 1.0,
            });
        }
        Ok(regions)
    }
}
