//! DOM Node
//!
//! Nodes live in the [`DomTree`](crate::DomTree) arena and link to their
//! relatives through [`NodeId`]s instead of pointers.

use std::collections::HashMap;

use crate::{DOMTokenList, NodeId, Value};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
    /// Expando properties set through the property API
    pub(crate) expando: HashMap<String, Value>,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
            expando: HashMap::new(),
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a new comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Comment(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a document fragment node
    pub fn fragment() -> Self {
        Self::with_data(NodeData::Fragment)
    }

    /// Create a doctype node
    pub fn doctype(name: impl Into<String>, public_id: impl Into<String>, system_id: impl Into<String>) -> Self {
        Self::with_data(NodeData::Doctype {
            name: name.into(),
            public_id: public_id.into(),
            system_id: system_id.into(),
        })
    }

    /// Numeric node type
    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Doctype { .. } => NodeType::Doctype,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::Fragment => NodeType::Fragment,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Check if this node may hold children
    #[inline]
    pub fn is_parent_node(&self) -> bool {
        matches!(self.data, NodeData::Element(_) | NodeData::Document | NodeData::Fragment)
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Character data of text and comment nodes
    pub fn character_data(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) | NodeData::Comment(t) => Some(t),
            _ => None,
        }
    }

    /// Copy of this node's own data with no tree links
    pub(crate) fn detached_copy(&self) -> Self {
        Self::with_data(self.data.clone())
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// Document fragment
    Fragment,
}

/// DOM node types, numbered like `Node.nodeType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
    Doctype = 10,
    Fragment = 11,
}

impl NodeType {
    /// Numeric value of the node type
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, lower-cased
    pub tag: String,
    /// Attributes in insertion order
    attrs: Vec<Attribute>,
    /// Dirty form-control value (set through the `value` property)
    pub(crate) value: Option<String>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            value: None,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Check if an attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        // Check if attribute already exists
        for attr in self.attrs.iter_mut() {
            if attr.name.eq_ignore_ascii_case(name) {
                attr.value = value;
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value,
        });
    }

    /// Remove an attribute, returns true if it was present
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|a| !a.name.eq_ignore_ascii_case(name));
        self.attrs.len() != before
    }

    /// Attributes in insertion order
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Parsed `class` attribute
    pub fn class_list(&self) -> DOMTokenList {
        DOMTokenList::from_string(self.get_attr("class").unwrap_or_default())
    }

    /// Write a token list back to the `class` attribute
    pub fn set_class_list(&mut self, list: &DOMTokenList) {
        // An element that never had a class attribute keeps none
        if list.is_empty() && !self.has_attr("class") {
            return;
        }
        self.set_attr("class", list.value());
    }

    /// Check whether this is a form control that carries a value
    pub fn is_form_control(&self) -> bool {
        matches!(
            self.tag.as_str(),
            "input" | "select" | "option" | "textarea" | "button"
        )
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
