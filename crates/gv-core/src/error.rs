use thiserror::Error;

/// Errors raised by the core state engines
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown hotspot '{0}'")]
    UnknownHotspot(String),
}
