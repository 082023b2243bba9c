use crate::common_types::{OcrApiResponse, TextAnnotation};
use crate::readers::ReaderCache;
use crate::validators::validate_languages;
use crate::AppResult;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub struct AppState {
    pub reader_cache: ReaderCache,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ocr", post(ocr_processing))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Transport-level error shape: request binding and validation failures keep
/// their message; everything that happens after binding is collapsed into a
/// fixed 500 body with the detail only in the server log.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String },
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Something went wrong." })),
            )
                .into_response(),
        }
    }
}

fn bad_request<E: std::fmt::Display>(err: E) -> ApiError {
    ApiError::BadRequest {
        message: err.to_string(),
    }
}

pub async fn ocr_processing(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<OcrApiResponse>, ApiError> {
    let mut image: Option<axum::body::Bytes> = None;
    let mut languages: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                image = Some(field.bytes().await.map_err(bad_request)?);
            }
            Some("languages") => {
                let value = field.text().await.map_err(bad_request)?;
                validate_languages(&value).map_err(bad_request)?;
                languages = Some(value);
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| bad_request("Missing required field: image"))?;
    let languages = languages.ok_or_else(|| bad_request("Missing required field: languages"))?;
    let language_set: Vec<String> = languages.split(',').map(str::to_string).collect();

    let text_annotations = process_image(&state, &language_set, &image)
        .await
        .map_err(|err| {
            error!("OCR processing failed: {err}");
            ApiError::Internal
        })?;

    Ok(Json(OcrApiResponse { text_annotations }))
}

async fn process_image(
    state: &AppState,
    languages: &[String],
    image: &[u8],
) -> AppResult<Vec<TextAnnotation>> {
    let reader = state.reader_cache.get_or_create(languages).await?;
    let regions = reader.read_text(image)?;
    regions.into_iter().map(TextAnnotation::from_raw).collect()
}
