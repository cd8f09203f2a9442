//! Jamon - Main entry point
//!
//! A [`Jamon`] owns the document, the configuration and the per-node
//! bookkeeping (delegation proxies, listener groups, data storage). Every
//! [`Collection`] it hands out shares that state, so clones of a `Jamon`
//! and all of its collections see the same document.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use jamon_dom::{Document, NodeId, NodeType, Value};
use jamon_select::ElementQuery;

use crate::config::validate_class_name;
use crate::events::EventRegistry;
use crate::{Collection, Config, Error, Result, Selector};

/// Entry point: resolves selectors into collections over one document
#[derive(Clone)]
pub struct Jamon {
    pub(crate) inner: Rc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) document: RefCell<Document>,
    config: RefCell<Config>,
    pub(crate) events: RefCell<EventRegistry>,
    /// Auxiliary data, layered over `data-*` attributes
    pub(crate) data: RefCell<HashMap<NodeId, HashMap<String, Value>>>,
}

impl Jamon {
    /// Wrap a document with the default configuration
    pub fn new(document: Document) -> Self {
        Self::from_parts(document, Config::default())
    }

    /// Wrap a document with a custom configuration
    pub fn with_config(document: Document, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(document, config))
    }

    /// Parse an HTML document and wrap it
    pub fn parse(html: &str) -> Self {
        Self::new(Document::parse_html(html))
    }

    fn from_parts(document: Document, config: Config) -> Self {
        tracing::debug!("Jamon created (hidden class '{}')", config.hidden_class_name);
        Self {
            inner: Rc::new(Inner {
                document: RefCell::new(document),
                config: RefCell::new(config),
                events: RefCell::new(EventRegistry::default()),
                data: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Borrow the document
    ///
    /// Collection operations borrow the document mutably; release this
    /// borrow before calling them.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    /// Borrow the document mutably
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    /// Current configuration
    pub fn config(&self) -> Config {
        self.inner.config.borrow().clone()
    }

    /// Class name used by `show`, `hide` and `toggle`
    pub fn hidden_class_name(&self) -> String {
        self.inner.config.borrow().hidden_class_name.clone()
    }

    /// Change the hidden class name; applies to every later call
    pub fn set_hidden_class_name(&self, name: &str) -> Result<()> {
        validate_class_name(name)?;
        tracing::debug!("Hidden class name set to '{}'", name);
        self.inner.config.borrow_mut().hidden_class_name = name.to_string();
        Ok(())
    }

    /// An empty collection
    pub fn empty(&self) -> Collection {
        self.collection(Vec::new())
    }

    /// Resolve a selector into a collection of at most one node
    pub fn get<'a>(&self, selector: impl Into<Selector<'a>>) -> Result<Collection> {
        let nodes = match selector.into() {
            Selector::None => Vec::new(),
            Selector::Query(query) => {
                let doc = self.document();
                doc.query_selector(doc.root(), query)?.into_iter().collect()
            }
            Selector::Node(node) => {
                self.check_node(node)?;
                vec![node]
            }
            Selector::Nodes(nodes) => match nodes.first() {
                Some(&node) => {
                    self.check_node(node)?;
                    vec![node]
                }
                None => Vec::new(),
            },
            Selector::Collection(collection) => {
                self.check_owner(collection)?;
                collection.first().into_iter().collect()
            }
        };

        tracing::trace!("get resolved {} node(s)", nodes.len());
        Ok(self.collection(nodes))
    }

    /// Resolve a selector into a collection of every matching node
    pub fn get_all<'a>(&self, selector: impl Into<Selector<'a>>) -> Result<Collection> {
        let nodes = match selector.into() {
            Selector::None => Vec::new(),
            Selector::Query(query) => {
                let doc = self.document();
                doc.query_selector_all(doc.root(), query)?
            }
            Selector::Node(node) => {
                self.check_node(node)?;
                vec![node]
            }
            Selector::Nodes(nodes) => {
                for &node in nodes {
                    self.check_node(node)?;
                }
                nodes.to_vec()
            }
            Selector::Collection(collection) => {
                self.check_owner(collection)?;
                collection.nodes().to_vec()
            }
        };

        tracing::trace!("get_all resolved {} node(s)", nodes.len());
        Ok(self.collection(nodes))
    }

    /// Create a detached element and assign properties to it
    pub fn create<K, V>(&self, tag: &str, properties: impl IntoIterator<Item = (K, V)>) -> Result<Collection>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let element = {
            let mut doc = self.document_mut();
            let element = doc.create_element(tag)?;
            for (name, value) in properties {
                doc.set_property(element, name.as_ref(), value.into())?;
            }
            element
        };

        tracing::debug!("Created <{}> as {}", tag, element);
        Ok(self.collection(vec![element]))
    }

    /// Create a detached element without properties
    pub fn create_element(&self, tag: &str) -> Result<Collection> {
        self.create(tag, Vec::<(&str, Value)>::new())
    }

    /// Check if two handles share the same document and state
    pub fn same(&self, other: &Jamon) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn collection(&self, nodes: Vec<NodeId>) -> Collection {
        Collection::new(self.clone(), nodes)
    }

    pub(crate) fn check_owner(&self, collection: &Collection) -> Result<()> {
        if self.same(collection.jamon()) {
            Ok(())
        } else {
            Err(Error::TypeMismatch("collection belongs to another Jamon".to_string()))
        }
    }

    /// Only element, text, document and fragment nodes can be wrapped
    pub(crate) fn check_node(&self, node: NodeId) -> Result<()> {
        match self.document().tree().node_type(node) {
            Some(NodeType::Element | NodeType::Text | NodeType::Document | NodeType::Fragment) => Ok(()),
            Some(other) => Err(Error::TypeMismatch(format!("{node} is a {other:?} node"))),
            None => Err(Error::TypeMismatch(format!("{node} is not a node of this document"))),
        }
    }
}

impl Default for Jamon {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl std::fmt::Debug for Jamon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jamon")
            .field("config", &*self.inner.config.borrow())
            .finish_non_exhaustive()
    }
}
