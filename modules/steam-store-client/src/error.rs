use thiserror::Error;

pub type Result<T> = std::result::Result<T, SteamStoreError>;

#[derive(Debug, Error)]
pub enum SteamStoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SteamStoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SteamStoreError::Parse(err.to_string())
        } else {
            SteamStoreError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SteamStoreError {
    fn from(err: serde_json::Error) -> Self {
        SteamStoreError::Parse(err.to_string())
    }
}
