//! Collection - ordered nodes of one Jamon document
//!
//! Collections are immutable: every operation that yields nodes returns a
//! fresh collection, and setters hand back a copy of the receiver for
//! chaining.

use std::collections::HashSet;

use jamon_dom::NodeId;

use crate::Jamon;

/// An ordered list of nodes
#[derive(Clone)]
pub struct Collection {
    jamon: Jamon,
    nodes: Vec<NodeId>,
}

impl Collection {
    pub(crate) fn new(jamon: Jamon, nodes: Vec<NodeId>) -> Self {
        Self { jamon, nodes }
    }

    /// The `Jamon` this collection belongs to
    pub fn jamon(&self) -> &Jamon {
        &self.jamon
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The nodes, in order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// First node, the one getters read from
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Node at `index`
    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Check if the collection holds a node
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Iterate over the nodes
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Iterate over one-node collections
    pub fn items(&self) -> impl Iterator<Item = Collection> + '_ {
        self.nodes.iter().map(|&node| self.derive(vec![node]))
    }

    /// A new collection over the same document
    pub(crate) fn derive(&self, nodes: Vec<NodeId>) -> Collection {
        Collection::new(self.jamon.clone(), nodes)
    }
}

/// Drop repeated nodes, keeping first occurrences in order
pub(crate) fn unique(nodes: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    nodes.into_iter().filter(|&node| seen.insert(node)).collect()
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.jamon.same(&other.jamon) && self.nodes == other.nodes
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Collection").field(&self.nodes).finish()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_wrap_single_nodes() {
        let jamon = Jamon::parse("<body><i></i><b></b></body>");
        let all = jamon.get_all("i, b").unwrap();

        let items: Vec<Collection> = all.items().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].nodes(), &[all.node(1).unwrap()]);
        assert!(all.contains(items[0].first().unwrap()));
    }

    #[test]
    fn test_unique_keeps_first_occurrence() {
        let jamon = Jamon::parse("<body><i></i><b></b></body>");
        let all = jamon.get_all("i, b").unwrap();
        let (i, b) = (all.node(0).unwrap(), all.node(1).unwrap());

        assert_eq!(unique([b, i, b, i]), vec![b, i]);
    }

    #[test]
    fn test_equality_needs_same_jamon() {
        let html = "<body><i></i></body>";
        let first = Jamon::parse(html);
        let second = Jamon::parse(html);

        assert_eq!(first.get("i").unwrap(), first.get("i").unwrap());
        assert_ne!(first.get("i").unwrap(), second.get("i").unwrap());
        assert_eq!(first.empty(), first.clone().empty());
    }
}
