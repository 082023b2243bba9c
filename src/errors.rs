use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    ValidationError { message: String },
    #[error("Unsupported language code: '{code}'")]
    UnsupportedLanguage { code: String },
    #[error("Input/output error")]
    InputOutputError(#[from] std::io::Error),
    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("OCR engine error:\n{0}")]
    OcrEngineError(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("Malformed OCR output: {message}")]
    MalformedOcrOutput { message: String },
    #[error("System error: {message}")]
    SystemError { message: String },
}

impl AppError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::ValidationError {
            message: message.into(),
        }
    }

    pub fn engine<E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>>(err: E) -> Self {
        AppError::OcrEngineError(err.into())
    }
}
