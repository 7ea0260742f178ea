use st_app::Region;
use thiserror::Error;

/// Capture/recognition failures. Each aborts the current pipeline run only.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("invalid capture region {0:?}")]
    InvalidRegion(Region),

    #[error("display query failed: {0}")]
    Display(String),

    #[error("screen capture failed: {0}")]
    Capture(String),

    #[error("text recognition failed: {0}")]
    Recognition(#[from] anyhow::Error),
}
