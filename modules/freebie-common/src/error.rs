use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreebieError {
    #[error("Configuration error: {0}")]
    Config(String),
}
