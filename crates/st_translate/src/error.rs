use thiserror::Error;

/// Transient translator failures. Each drops only the affected line.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed translator response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("language could not be determined")]
    Undetermined,

    #[error("translation failed: {0}")]
    Failed(String),
}
