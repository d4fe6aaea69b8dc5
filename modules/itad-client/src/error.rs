use thiserror::Error;

pub type Result<T> = std::result::Result<T, ItadError>;

#[derive(Debug, Error)]
pub enum ItadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ItadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ItadError::Parse(err.to_string())
        } else {
            ItadError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ItadError {
    fn from(err: serde_json::Error) -> Self {
        ItadError::Parse(err.to_string())
    }
}
