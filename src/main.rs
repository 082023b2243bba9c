use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod args;
use crate::errors::AppError;
use args::*;

mod api;

mod errors;

mod readers;

mod validators;

pub type AppResult<T> = Result<T, AppError>;

mod common_types;

use crate::api::AppState;
use crate::readers::{OcrsReader, ReaderCache, ReaderHandle};

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = CliArgs::parse();

    let models_dir = cli.models_dir.clone();
    let reader_cache = ReaderCache::new(Box::new(move |languages| {
        Ok(Arc::new(OcrsReader::new(languages, models_dir.as_deref())?) as ReaderHandle)
    }));
    let state = Arc::new(AppState { reader_cache });

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port)).await?;
    info!(
        "ocr-api v{} listening on http://{}:{}",
        env!("CARGO_PKG_VERSION"),
        cli.host,
        cli.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
