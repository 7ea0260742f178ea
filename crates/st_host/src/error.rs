use st_capture::CaptureError;
use st_translate::TranslateError;
use thiserror::Error;

/// Host-level errors. Only startup failures are fatal.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("startup failed: {0}")]
    Startup(String),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("translator initialization failed: {0}")]
    Translator(#[from] TranslateError),

    #[error("capture worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type HostResult<T> = Result<T, HostError>;
