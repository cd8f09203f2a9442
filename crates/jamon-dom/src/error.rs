//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found in this document
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Hierarchy error (e.g. inserting an ancestor into its descendant)
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),

    /// Operation not supported by this kind of node
    #[error("invalid node type for {0}")]
    InvalidNodeType(&'static str),

    /// Name contains characters a tag or attribute name cannot hold
    #[error("invalid character in name '{0}'")]
    InvalidCharacter(String),

    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}
