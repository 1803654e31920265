pub mod config;
pub mod decode;
pub mod engine;
pub mod preprocess;
pub mod registry;

pub use config::*;
pub use decode::*;
pub use engine::*;
pub use registry::*;

use ort::error::Error as OrtError;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("ONNX Runtime error: {0}")]
    Ort(#[from] OrtError),
    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Input tensor shape mismatch")]
    InputShapeMismatch,
    #[error("Model output format unexpected")]
    OutputFormatUnexpected,
    #[error("Invalid path for model files: {0}")]
    InvalidPath(String),
    #[error("Failed to convert model output")]
    OutputConversion,
}
