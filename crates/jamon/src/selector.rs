//! Selector input
//!
//! Everything `Jamon::get` and `Jamon::get_all` accept: nothing, a CSS
//! selector, a node, a list of nodes, or an existing collection.

use jamon_dom::NodeId;

use crate::Collection;

/// Input that resolves to a collection
#[derive(Debug, Clone, Copy)]
pub enum Selector<'a> {
    /// Resolves to an empty collection
    None,
    /// CSS selector, queried against the whole document
    Query(&'a str),
    /// A single node
    Node(NodeId),
    /// Nodes in the given order, duplicates included
    Nodes(&'a [NodeId]),
    /// An existing collection of the same `Jamon`
    Collection(&'a Collection),
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(selector: &'a str) -> Self {
        Selector::Query(selector)
    }
}

impl<'a> From<&'a String> for Selector<'a> {
    fn from(selector: &'a String) -> Self {
        Selector::Query(selector)
    }
}

impl From<NodeId> for Selector<'_> {
    fn from(node: NodeId) -> Self {
        Selector::Node(node)
    }
}

impl<'a> From<&'a [NodeId]> for Selector<'a> {
    fn from(nodes: &'a [NodeId]) -> Self {
        Selector::Nodes(nodes)
    }
}

impl<'a> From<&'a Vec<NodeId>> for Selector<'a> {
    fn from(nodes: &'a Vec<NodeId>) -> Self {
        Selector::Nodes(nodes)
    }
}

impl<'a, const N: usize> From<&'a [NodeId; N]> for Selector<'a> {
    fn from(nodes: &'a [NodeId; N]) -> Self {
        Selector::Nodes(nodes)
    }
}

impl<'a> From<&'a Collection> for Selector<'a> {
    fn from(collection: &'a Collection) -> Self {
        Selector::Collection(collection)
    }
}

impl<'a, T: Into<Selector<'a>>> From<Option<T>> for Selector<'a> {
    fn from(selector: Option<T>) -> Self {
        selector.map_or(Selector::None, Into::into)
    }
}
