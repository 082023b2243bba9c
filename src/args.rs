use clap::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, about)]
pub struct CliArgs {
    #[arg(long, default_value = "127.0.0.1", help = "Host to bind the server to")]
    pub host: String,

    #[arg(short = 'p', long, default_value = "8080", help = "Port to bind the server to")]
    pub port: u16,

    #[arg(
        long,
        help = "Directory containing the OCR model files (text-detection.rten, text-recognition.rten). \
                When omitted, well-known locations next to the executable and ~/.cache/ocrs are searched"
    )]
    pub models_dir: Option<PathBuf>,
}
