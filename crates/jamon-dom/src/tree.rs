//! DOM Tree (arena-based allocation)
//!
//! Nodes are pushed into a single `Vec` and linked through parent, child and
//! sibling ids. Removal only unlinks a node; its slot is never reused.

use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId, NodeType};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Check if the ID belongs to this tree
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Get a node or fail with `NotFound`
    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the tree (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Create an empty document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(Node::fragment())
    }

    /// Create a doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(name, public_id, system_id))
    }

    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data of a node, if it is an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Check if the node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Node type of a node
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    /// Parent node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Parent node, only when it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// First child
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.to_option())
    }

    /// Last child
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child.to_option())
    }

    /// Next sibling
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.to_option())
    }

    /// Previous sibling
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.to_option())
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Element children only
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    /// Ancestors from the parent up to the root of the node's tree
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Descendants in document (pre-)order, excluding the node itself
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Check if `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Check if the node is attached under the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root(), id)
    }

    /// Append a child node
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end)
    ///
    /// Inserting a fragment moves its children and leaves it empty.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<NodeId> {
        self.ensure_parent(parent)?;
        self.ensure_insertable(parent, child)?;
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
        }

        if matches!(self.node(child)?.data, NodeData::Fragment) {
            let kids: Vec<NodeId> = self.children(child).map(|(id, _)| id).collect();
            for kid in kids {
                self.link_before(parent, kid, reference);
            }
            return Ok(child);
        }

        let reference = if reference == Some(child) {
            self.next_sibling(child)
        } else {
            reference
        };
        self.link_before(parent, child, reference);
        Ok(child)
    }

    /// Remove a child node
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(child)
    }

    /// Replace a child with another node
    pub fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> DomResult<NodeId> {
        if self.parent(old_child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child: old_child });
        }
        if new_child == old_child {
            return Ok(old_child);
        }
        self.insert_before(parent, new_child, Some(old_child))?;
        self.detach(old_child);
        Ok(old_child)
    }

    /// Unlink a node from its parent; no-op for detached nodes
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// ParentNode.prepend
    pub fn prepend(&mut self, parent: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let list = self.collect_insertable(parent, nodes)?;
        list.iter().for_each(|&n| self.detach(n));
        let reference = self.first_child(parent);
        for n in list {
            self.link_before(parent, n, reference);
        }
        Ok(())
    }

    /// ParentNode.append
    pub fn append(&mut self, parent: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let list = self.collect_insertable(parent, nodes)?;
        for n in list {
            self.detach(n);
            self.link_before(parent, n, None);
        }
        Ok(())
    }

    /// ChildNode.before; no-op when the node has no parent
    pub fn before(&mut self, node: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        let mut viable_prev = self.prev_sibling(node);
        while let Some(p) = viable_prev.filter(|p| nodes.contains(p)) {
            viable_prev = self.prev_sibling(p);
        }

        let list = self.collect_insertable(parent, nodes)?;
        list.iter().for_each(|&n| self.detach(n));
        let reference = match viable_prev {
            Some(p) => self.next_sibling(p),
            None => self.first_child(parent),
        };
        for n in list {
            self.link_before(parent, n, reference);
        }
        Ok(())
    }

    /// ChildNode.after; no-op when the node has no parent
    pub fn after(&mut self, node: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        let viable_next = self.viable_next_sibling(node, nodes);

        let list = self.collect_insertable(parent, nodes)?;
        list.iter().for_each(|&n| self.detach(n));
        for n in list {
            self.link_before(parent, n, viable_next);
        }
        Ok(())
    }

    /// ChildNode.replaceWith; no-op when the node has no parent
    pub fn replace_with(&mut self, node: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        let viable_next = self.viable_next_sibling(node, nodes);

        let list = self.collect_insertable(parent, nodes)?;
        list.iter().for_each(|&n| self.detach(n));
        if self.parent(node) == Some(parent) {
            for n in list {
                self.link_before(parent, n, Some(node));
            }
            self.detach(node);
        } else {
            for n in list {
                self.link_before(parent, n, viable_next);
            }
        }
        Ok(())
    }

    /// Clone a node, with its subtree when `deep`
    ///
    /// The copy is detached and carries no expando properties.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let copy = self.node(id)?.detached_copy();
        let clone = self.push(copy);
        if deep {
            let kids: Vec<NodeId> = self.children(id).map(|(child, _)| child).collect();
            for kid in kids {
                let kid_clone = self.clone_node(kid, true)?;
                self.link_before(clone, kid_clone, None);
            }
        }
        Ok(clone)
    }

    /// Merge adjacent text nodes and drop empty ones throughout the subtree
    pub fn normalize(&mut self, id: NodeId) -> DomResult<()> {
        self.node(id)?;
        let mut child = self.first_child(id);

        while let Some(current) = child {
            let next = self.next_sibling(current);
            let Some(text) = self.nodes[current.index()].as_text() else {
                self.normalize(current)?;
                child = next;
                continue;
            };

            if text.is_empty() {
                self.detach(current);
                child = next;
                continue;
            }

            let mut merged = text.to_string();
            let mut following = next;
            while let Some(sibling) = following {
                let Some(more) = self.nodes[sibling.index()].as_text() else {
                    break;
                };
                merged.push_str(more);
                following = self.next_sibling(sibling);
                self.detach(sibling);
            }
            self.nodes[current.index()].data = NodeData::Text(merged);
            child = following;
        }

        Ok(())
    }

    /// Concatenated text of the subtree; `None` for documents and doctypes
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::Text(t) | NodeData::Comment(t) => Some(t.clone()),
            NodeData::Element(_) | NodeData::Fragment => Some(
                self.descendants(id)
                    .filter_map(|d| self.nodes[d.index()].as_text())
                    .collect(),
            ),
            NodeData::Document | NodeData::Doctype { .. } => None,
        }
    }

    /// Replace character data of a text or comment node
    pub fn set_character_data(&mut self, id: NodeId, content: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound(id))?;
        match &mut node.data {
            NodeData::Text(t) | NodeData::Comment(t) => {
                *t = content.to_string();
                Ok(())
            }
            _ => Err(DomError::InvalidNodeType("character data")),
        }
    }

    fn viable_next_sibling(&self, node: NodeId, excluded: &[NodeId]) -> Option<NodeId> {
        let mut next = self.next_sibling(node);
        while let Some(n) = next.filter(|n| excluded.contains(n)) {
            next = self.next_sibling(n);
        }
        next
    }

    fn ensure_parent(&self, parent: NodeId) -> DomResult<()> {
        if !self.node(parent)?.is_parent_node() {
            return Err(DomError::HierarchyRequest("node cannot have children"));
        }
        Ok(())
    }

    fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let node = self.node(child)?;
        if matches!(node.data, NodeData::Document) {
            return Err(DomError::HierarchyRequest("a document cannot be inserted"));
        }
        if node.is_text() && matches!(self.node(parent)?.data, NodeData::Document) {
            return Err(DomError::HierarchyRequest("text cannot be a child of the document"));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest("node is an ancestor of the parent"));
        }
        Ok(())
    }

    /// Validate nodes for insertion under `parent` and flatten fragments
    ///
    /// A node listed twice ends up at its last position.
    fn collect_insertable(&self, parent: NodeId, nodes: &[NodeId]) -> DomResult<Vec<NodeId>> {
        self.ensure_parent(parent)?;
        let mut list = Vec::with_capacity(nodes.len());
        for &n in nodes {
            self.ensure_insertable(parent, n)?;
            if matches!(self.node(n)?.data, NodeData::Fragment) {
                list.extend(self.children(n).map(|(kid, _)| kid));
            } else {
                list.push(n);
            }
        }

        let mut unique = Vec::with_capacity(list.len());
        for (i, &n) in list.iter().enumerate() {
            if !list[i + 1..].contains(&n) {
                unique.push(n);
            }
        }
        Ok(unique)
    }

    /// Link a (possibly attached) node before `reference` under `parent`
    fn link_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);

        match reference {
            Some(r) => {
                let prev = self.nodes[r.index()].prev_sibling;
                self.nodes[child.index()].prev_sibling = prev;
                self.nodes[child.index()].next_sibling = r;
                self.nodes[r.index()].prev_sibling = child;
                if prev.is_valid() {
                    self.nodes[prev.index()].next_sibling = child;
                } else {
                    self.nodes[parent.index()].first_child = child;
                }
            }
            None => {
                let last = self.nodes[parent.index()].last_child;
                self.nodes[child.index()].prev_sibling = last;
                self.nodes[child.index()].next_sibling = NodeId::NONE;
                if last.is_valid() {
                    self.nodes[last.index()].next_sibling = child;
                } else {
                    self.nodes[parent.index()].first_child = child;
                }
                self.nodes[parent.index()].last_child = child;
            }
        }

        self.nodes[child.index()].parent = parent;
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling.to_option();
        Some((id, node))
    }
}

/// Iterator over ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree, excluding its root
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;

        self.next = self.tree.first_child(id).or_else(|| {
            let mut current = id;
            loop {
                if current == self.root {
                    return None;
                }
                if let Some(sibling) = self.tree.next_sibling(current) {
                    return Some(sibling);
                }
                current = self.tree.parent(current)?;
            }
        });

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tree: &DomTree, parent: NodeId) -> Vec<NodeId> {
        tree.children(parent).map(|(id, _)| id).collect()
    }

    #[test]
    fn test_append_and_siblings() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("p");
        let b = tree.create_element("p");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        assert_eq!(ids(&tree, div), vec![a, b]);
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.parent(a), Some(div));
        assert!(tree.is_connected(b));
    }

    #[test]
    fn test_insert_before_moves_node() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        tree.insert_before(div, b, Some(a)).unwrap();
        assert_eq!(ids(&tree, div), vec![b, a]);
        assert_eq!(tree.last_child(div), Some(a));
    }

    #[test]
    fn test_hierarchy_errors() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        let text = tree.create_text("t");
        tree.append_child(outer, inner).unwrap();

        assert!(matches!(tree.append_child(inner, outer), Err(DomError::HierarchyRequest(_))));
        assert!(matches!(tree.append_child(text, inner), Err(DomError::HierarchyRequest(_))));
        assert!(matches!(tree.append_child(inner, inner), Err(DomError::HierarchyRequest(_))));
    }

    #[test]
    fn test_fragment_insertion_empties_fragment() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let frag = tree.create_fragment();
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        tree.append_child(frag, a).unwrap();
        tree.append_child(frag, b).unwrap();

        tree.append_child(div, frag).unwrap();
        assert_eq!(ids(&tree, div), vec![a, b]);
        assert!(tree.first_child(frag).is_none());
    }

    #[test]
    fn test_before_after_with_siblings_in_list() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        tree.append(div, &[a, b, c]).unwrap();

        tree.before(b, &[c, a]).unwrap();
        assert_eq!(ids(&tree, div), vec![c, a, b]);

        tree.after(c, &[b]).unwrap();
        assert_eq!(ids(&tree, div), vec![c, b, a]);
    }

    #[test]
    fn test_replace_with() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let old = tree.create_element("old");
        let x = tree.create_element("x");
        let y = tree.create_element("y");
        tree.append(div, &[old]).unwrap();

        tree.replace_with(old, &[x, y]).unwrap();
        assert_eq!(ids(&tree, div), vec![x, y]);
        assert_eq!(tree.parent(old), None);
    }

    #[test]
    fn test_prepend() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        tree.append(div, &[a]).unwrap();
        tree.prepend(div, &[b]).unwrap();

        assert_eq!(ids(&tree, div), vec![b, a]);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        let d = tree.create_element("d");
        tree.append(a, &[b, d]).unwrap();
        tree.append(b, &[c]).unwrap();
        tree.append_child(tree.root(), a).unwrap();

        assert_eq!(tree.descendants(a).collect::<Vec<_>>(), vec![b, c, d]);
        assert_eq!(tree.descendants(b).collect::<Vec<_>>(), vec![c]);
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![b, a, tree.root()]);
    }

    #[test]
    fn test_normalize_merges_text() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let t1 = tree.create_text("Hello");
        let empty = tree.create_text("");
        let t2 = tree.create_text(", ");
        let t3 = tree.create_text("World");
        let span = tree.create_element("span");
        tree.append(p, &[t1, empty, t2, t3, span]).unwrap();

        tree.normalize(p).unwrap();
        assert_eq!(ids(&tree, p), vec![t1, span]);
        assert_eq!(tree.get(t1).unwrap().as_text(), Some("Hello, World"));
    }

    #[test]
    fn test_clone_deep_and_shallow() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let text = tree.create_text("content");
        tree.append_child(div, text).unwrap();
        tree.element_mut(div).unwrap().set_attr("id", "x");

        let shallow = tree.clone_node(div, false).unwrap();
        assert!(tree.first_child(shallow).is_none());
        assert_eq!(tree.element(shallow).unwrap().id(), Some("x"));

        let deep = tree.clone_node(div, true).unwrap();
        assert_eq!(tree.text_content(deep).as_deref(), Some("content"));
        assert_ne!(tree.first_child(deep), Some(text));
        assert!(tree.parent(deep).is_none());
    }
}
