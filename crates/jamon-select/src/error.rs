//! Selector errors

/// Result type for selector operations
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Selector errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector text is not a valid selector
    #[error("'{selector}' is not a valid selector: {message} at byte {position}")]
    Syntax {
        selector: String,
        position: usize,
        message: &'static str,
    },
}
