//! Node insertion
//!
//! Every insertion has a subject (the content that moves) and targets (the
//! nodes it is placed relative to). With several targets, each target but
//! the last receives a deep clone of the subject and the last one receives
//! the subject itself, so a node is never needed in two places at once.

use jamon_dom::{Document, DomResult, NodeId, NodeType};

use crate::{Collection, Error, Result, Selector};

/// Content for `append`, `prepend`, `before`, `after` and `replace_with`
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    /// Inserted as a new text node
    Text(&'a str),
    /// A node of the same document
    Node(NodeId),
    /// The nodes of a collection, in order
    Collection(&'a Collection),
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(text: &'a str) -> Self {
        Content::Text(text)
    }
}

impl<'a> From<&'a String> for Content<'a> {
    fn from(text: &'a String) -> Self {
        Content::Text(text)
    }
}

impl From<NodeId> for Content<'_> {
    fn from(node: NodeId) -> Self {
        Content::Node(node)
    }
}

impl<'a> From<&'a Collection> for Content<'a> {
    fn from(collection: &'a Collection) -> Self {
        Content::Collection(collection)
    }
}

/// Where subjects go relative to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Prepend,
    Append,
    Before,
    After,
    ReplaceWith,
}

/// Subject nodes, or text that becomes a fresh node per target
enum Subject {
    Text(String),
    Nodes(Vec<NodeId>),
}

impl Collection {
    /// Insert content at the start of every node
    pub fn prepend<'a>(&self, content: impl Into<Content<'a>>) -> Result<Collection> {
        self.place_content(content.into(), Placement::Prepend)
    }

    /// Insert content at the end of every node
    pub fn append<'a>(&self, content: impl Into<Content<'a>>) -> Result<Collection> {
        self.place_content(content.into(), Placement::Append)
    }

    /// Insert content before every node
    pub fn before<'a>(&self, content: impl Into<Content<'a>>) -> Result<Collection> {
        self.place_content(content.into(), Placement::Before)
    }

    /// Insert content after every node
    pub fn after<'a>(&self, content: impl Into<Content<'a>>) -> Result<Collection> {
        self.place_content(content.into(), Placement::After)
    }

    /// Replace every node with content
    pub fn replace_with<'a>(&self, content: impl Into<Content<'a>>) -> Result<Collection> {
        self.place_content(content.into(), Placement::ReplaceWith)
    }

    /// Insert these nodes at the start of every target
    pub fn prepend_to<'a>(&self, target: impl Into<Selector<'a>>) -> Result<Collection> {
        self.place_into(target.into(), Placement::Prepend)
    }

    /// Insert these nodes at the end of every target
    pub fn append_to<'a>(&self, target: impl Into<Selector<'a>>) -> Result<Collection> {
        self.place_into(target.into(), Placement::Append)
    }

    /// Insert these nodes before every target
    pub fn insert_before<'a>(&self, target: impl Into<Selector<'a>>) -> Result<Collection> {
        self.place_into(target.into(), Placement::Before)
    }

    /// Insert these nodes after every target
    pub fn insert_after<'a>(&self, target: impl Into<Selector<'a>>) -> Result<Collection> {
        self.place_into(target.into(), Placement::After)
    }

    /// Replace every target with these nodes
    pub fn replace<'a>(&self, target: impl Into<Selector<'a>>) -> Result<Collection> {
        self.place_into(target.into(), Placement::ReplaceWith)
    }

    /// Independent copies of the nodes, with their subtrees when `deep`
    ///
    /// Copies carry attributes but no listeners, properties or data.
    pub fn clone_nodes(&self, deep: bool) -> Result<Collection> {
        let mut doc = self.jamon().document_mut();
        let copies = self
            .iter()
            .map(|node| doc.tree_mut().clone_node(node, deep))
            .collect::<DomResult<Vec<_>>>()?;
        Ok(self.derive(copies))
    }

    /// Detach every node and normalize the parent it leaves
    pub fn remove(&self) -> Result<Collection> {
        let mut doc = self.jamon().document_mut();
        let tree = doc.tree_mut();
        for node in self {
            let Some(parent) = tree.parent(node) else {
                continue;
            };
            tree.detach(node);
            tree.normalize(parent)?;
        }

        tracing::debug!("Removed {} node(s)", self.len());
        Ok(self.clone())
    }

    fn place_content(&self, content: Content<'_>, placement: Placement) -> Result<Collection> {
        let subject = match content {
            Content::Text(text) => Subject::Text(text.to_string()),
            Content::Node(node) => {
                self.jamon().check_node(node)?;
                Subject::Nodes(vec![node])
            }
            Content::Collection(collection) => {
                self.jamon().check_owner(collection)?;
                Subject::Nodes(collection.nodes().to_vec())
            }
        };

        place(&mut self.jamon().document_mut(), self.nodes(), &subject, placement)?;
        Ok(self.clone())
    }

    fn place_into(&self, target: Selector<'_>, placement: Placement) -> Result<Collection> {
        let targets = self.jamon().get_all(target)?;
        let subject = Subject::Nodes(self.nodes().to_vec());

        place(&mut self.jamon().document_mut(), targets.nodes(), &subject, placement)?;
        Ok(self.clone())
    }
}

fn place(doc: &mut Document, targets: &[NodeId], subject: &Subject, placement: Placement) -> Result<()> {
    let Some(last) = targets.len().checked_sub(1) else {
        return Ok(());
    };

    for (index, &target) in targets.iter().enumerate() {
        let nodes = match subject {
            Subject::Text(text) => vec![doc.create_text_node(text)],
            Subject::Nodes(nodes) if index == last => nodes.clone(),
            Subject::Nodes(nodes) => nodes
                .iter()
                .map(|&node| doc.tree_mut().clone_node(node, true))
                .collect::<DomResult<Vec<_>>>()?,
        };

        let text_involved = std::iter::once(target)
            .chain(nodes.iter().copied())
            .any(|node| doc.tree().node_type(node) == Some(NodeType::Text));
        let normalize_root = match placement {
            Placement::Prepend | Placement::Append => Some(target),
            _ => doc.tree().parent(target),
        };

        let tree = doc.tree_mut();
        match placement {
            Placement::Prepend => tree.prepend(target, &nodes),
            Placement::Append => tree.append(target, &nodes),
            Placement::Before => tree.before(target, &nodes),
            Placement::After => tree.after(target, &nodes),
            Placement::ReplaceWith => tree.replace_with(target, &nodes),
        }
        .map_err(Error::from)?;

        if let Some(root) = normalize_root.filter(|_| text_involved) {
            tree.normalize(root)?;
        }
    }

    tracing::debug!("{:?} into {} target(s)", placement, targets.len());
    Ok(())
}
