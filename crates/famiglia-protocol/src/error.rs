use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid member ID: {0}")]
    InvalidMemberId(String),

    #[error("Unsupported roster format: {0}")]
    UnsupportedFormat(String),

    #[error("TOML roster error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON roster error: {0}")]
    Json(#[from] serde_json::Error),
}
