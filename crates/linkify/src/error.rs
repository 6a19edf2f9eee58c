//! Error types for link transformation
//!
//! Flat, like the DOM errors. Only a malformed tree or a bad configuration
//! can fail; well-formed input never does.

use dom::DomError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkifyError>;

#[derive(Debug, Error)]
pub enum LinkifyError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    /// For `Document` implementations that are not backed by `dom`
    #[error("Tree error: {0}")]
    Tree(String),

    #[error("Invalid pattern for handler '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
