//! Error types

use jamon_dom::DomError;
use jamon_select::SelectorError;

/// Result type for Jamon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Jamon errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A required argument is missing or empty
    #[error("Missing argument: {0}")]
    Argument(&'static str),

    /// The input cannot be turned into a collection
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Dom(#[from] DomError),
}
