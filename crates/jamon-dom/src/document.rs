//! Document - High-level document API

use std::collections::HashMap;

use crate::events::RegisteredListener;
use crate::{DOMRect, DOMTokenList, DomError, DomResult, DomTree, NodeId};

/// HTML Document
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Event listeners per target node
    pub(crate) listeners: HashMap<NodeId, Vec<RegisteredListener>>,
    /// Flow boxes supplied by the host's layout
    pub(crate) layout: HashMap<NodeId, DOMRect>,
}

impl Document {
    /// Create a new document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes always link
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append(html, &[head, body]);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            listeners: HashMap::new(),
            layout: HashMap::new(),
        }
    }

    /// Locate html, head and body after the tree was built externally
    pub(crate) fn finalize(&mut self) {
        let tree = &self.tree;
        let html = tree
            .element_children(tree.root())
            .find(|&id| tree.element(id).is_some_and(|e| e.tag == "html"));
        let child = |tag: &str| {
            html.and_then(|h| {
                tree.element_children(h)
                    .find(|&id| tree.element(id).is_some_and(|e| e.tag == tag))
            })
        };
        let head = child("head");
        let body = child("body");

        self.html_element = html.unwrap_or(NodeId::NONE);
        self.head_element = head.unwrap_or(NodeId::NONE);
        self.body_element = body.unwrap_or(NodeId::NONE);
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get document title
    pub fn title(&self) -> String {
        let Some(head) = self.head() else {
            return String::new();
        };

        self.tree
            .element_children(head)
            .find(|&id| self.tree.element(id).is_some_and(|e| e.tag == "title"))
            .and_then(|title| self.tree.text_content(title))
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// Get the first connected element with the given ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.root())
            .find(|&node| self.tree.element(node).is_some_and(|e| e.id() == Some(id)))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Create a detached element after validating its tag name
    pub fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        validate_name(tag)?;
        Ok(self.tree.create_element(tag))
    }

    /// Create a detached text node
    pub fn create_text_node(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Lower-cased local name of an element
    pub fn local_name(&self, node: NodeId) -> Option<&str> {
        self.tree.element(node).map(|e| e.tag.as_str())
    }

    /// Get an attribute value
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.element(node)?.get_attr(name).map(str::to_string)
    }

    /// Check if an attribute is present
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.tree.element(node).is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        validate_name(name)?;
        self.element_data_mut(node)?.set_attr(name, value);
        Ok(())
    }

    /// Remove an attribute, returns true if it was present
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.element_data_mut(node)?.remove_attr(name))
    }

    /// The class token list of an element
    pub fn class_list(&self, node: NodeId) -> Option<DOMTokenList> {
        self.tree.element(node).map(|e| e.class_list())
    }

    /// Store a class token list back on an element
    pub fn set_class_list(&mut self, node: NodeId, list: &DOMTokenList) -> DomResult<()> {
        self.element_data_mut(node)?.set_class_list(list);
        Ok(())
    }

    /// `node.textContent`
    pub fn text_content(&self, node: NodeId) -> Option<String> {
        self.tree.text_content(node)
    }

    /// `node.textContent = content`
    pub fn set_text_content(&mut self, node: NodeId, content: &str) -> DomResult<()> {
        let tree = &mut self.tree;
        if tree.node(node)?.character_data().is_some() {
            return tree.set_character_data(node, content);
        }
        if !tree.node(node)?.is_parent_node() {
            return Ok(());
        }

        let kids: Vec<NodeId> = tree.children(node).map(|(id, _)| id).collect();
        kids.into_iter().for_each(|kid| tree.detach(kid));
        if !content.is_empty() {
            let text = tree.create_text(content);
            tree.append_child(node, text)?;
        }
        Ok(())
    }

    pub(crate) fn element_data_mut(&mut self, node: NodeId) -> DomResult<&mut crate::ElementData> {
        if !self.tree.contains(node) {
            return Err(DomError::NotFound(node));
        }
        self.tree
            .element_mut(node)
            .ok_or(DomError::InvalidNodeType("element operation"))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

/// Validate a tag or attribute name
pub(crate) fn validate_name(name: &str) -> DomResult<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));

    if valid {
        Ok(())
    } else {
        Err(DomError::InvalidCharacter(name.to_string()))
    }
}
