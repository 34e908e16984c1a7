use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown role `{0}`")]
    UnknownRole(String),

    #[error("invalid session code `{0}`: expected letters, digits or `_`")]
    InvalidCode(String),

    #[error("malformed signal message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode signal message: {0}")]
    Encode(#[source] serde_json::Error),
}
