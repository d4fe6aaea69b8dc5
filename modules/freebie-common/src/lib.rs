pub mod config;
pub mod error;
pub mod types;

pub use config::{FreebieConfig, RunMode};
pub use error::FreebieError;
pub use types::*;
