//! Jamon DOM - Document Object Model
//!
//! Arena-based DOM tree that hosts the nodes a `jamon` collection points at.
//! Nodes are addressed by [`NodeId`] and never freed: a detached node keeps
//! its identity for as long as the [`Document`] lives.

mod classlist;
mod dataset;
mod document;
mod error;
pub mod events;
mod geometry;
pub mod html;
mod node;
mod properties;
mod style;
mod tree;
mod value;

pub use classlist::DOMTokenList;
pub use dataset::{to_camel_case, to_kebab_case};
pub use document::Document;
pub use error::{DomError, DomResult};
pub use events::{Event, EventFamily, EventPhase, EventType, ListenerHandle};
pub use geometry::{parse_px, DOMRect};
pub use node::{Attribute, ElementData, Node, NodeData, NodeType};
pub use style::StyleDeclaration;
pub use tree::DomTree;
pub use value::Value;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for absent links
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points at a node slot
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index of the node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `Some(self)` unless this is the sentinel
    #[inline]
    pub(crate) fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
