use ort::error::Error as OrtError;

/// Errors produced by the detection pipeline.
///
/// `Decode` and `ShapeMismatch` are per-request and recoverable: they abort
/// the current interaction but never the process. Everything else is only
/// expected during startup, where it is fatal.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("ONNX Runtime error: {0}")]
    Ort(#[from] OrtError),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("unsupported image format (only JPEG and PNG are accepted)")]
    UnsupportedFormat,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("model returned {actual} scores but {expected} labels are defined")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("model output format unexpected")]
    OutputFormatUnexpected,
    #[error("invalid path for model files: {0}")]
    InvalidPath(String),
    #[error("failed to convert model output")]
    OutputConversion,
}

impl ModelError {
    /// Whether the error invalidates only the current request, as opposed to
    /// indicating a broken deployment.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ModelError::Decode(_)
                | ModelError::UnsupportedFormat
                | ModelError::ShapeMismatch { .. }
        )
    }
}
