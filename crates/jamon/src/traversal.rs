//! Traversal and scoped queries
//!
//! Selector queries are evaluated against the whole document, so a query
//! from an element would also see the element's ancestors. `find_one` and
//! `find_all` anchor the selector on the element's id instead, handing out
//! a temporary id when the element has none.

use std::cell::RefMut;
use std::ops::Deref;

use jamon_dom::{Document, NodeId, NodeType};
use jamon_select::{escape_identifier, ElementQuery};

use crate::collection::unique;
use crate::{Collection, Result};

/// Id given to elements that are searched without having one
const TEMPORARY_ID: &str = "jamon-temporary-id";

/// Document borrow that keeps an id on an element until dropped
struct ScopedId<'a> {
    doc: RefMut<'a, Document>,
    element: NodeId,
    temporary: bool,
}

impl<'a> ScopedId<'a> {
    /// Ensure `element` has an id, returning the guard and the id
    fn assign(mut doc: RefMut<'a, Document>, element: NodeId) -> Result<(Self, String)> {
        let (id, temporary) = match doc.attribute(element, "id").filter(|id| !id.is_empty()) {
            Some(id) => (id, false),
            None => {
                doc.set_attribute(element, "id", TEMPORARY_ID)?;
                (TEMPORARY_ID.to_string(), true)
            }
        };
        Ok((Self { doc, element, temporary }, id))
    }
}

impl Deref for ScopedId<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.doc
    }
}

impl Drop for ScopedId<'_> {
    fn drop(&mut self) {
        if self.temporary {
            // The element had no id attribute before the query
            if let Err(err) = self.doc.remove_attribute(self.element, "id") {
                tracing::warn!("Temporary id left on {}: {}", self.element, err);
            }
        }
    }
}

/// Prefix every top-level selector of a list with `#id `
///
/// Leading combinators become relative to the element, so `> li` selects
/// its direct children. Empty parts stay empty and fail to parse.
fn scope_selector(id: &str, selector: &str) -> String {
    let id = escape_identifier(id);
    split_top_level(selector)
        .into_iter()
        .map(str::trim)
        .map(|part| if part.is_empty() { String::new() } else { format!("#{id} {part}") })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a selector list at commas outside brackets, parentheses and strings
fn split_top_level(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in selector.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
}

impl Collection {
    /// First descendant matching the selector, searching node by node
    pub fn find_one(&self, selector: &str) -> Result<Collection> {
        for node in self {
            if let Some(&found) = self.find_in(node, selector, true)?.first() {
                return Ok(self.derive(vec![found]));
            }
        }
        Ok(self.derive(Vec::new()))
    }

    /// All descendants matching the selector, without duplicates
    pub fn find_all(&self, selector: &str) -> Result<Collection> {
        let mut found = Vec::new();
        for node in self {
            found.extend(self.find_in(node, selector, false)?);
        }
        Ok(self.derive(unique(found)))
    }

    /// Parent elements, without duplicates
    pub fn parent(&self) -> Collection {
        let doc = self.jamon().document();
        let parents = self.iter().filter_map(|node| doc.tree().parent_element(node));
        self.derive(unique(parents))
    }

    /// Element children of every node
    pub fn children(&self) -> Collection {
        let doc = self.jamon().document();
        let children = self
            .iter()
            .flat_map(|node| doc.tree().element_children(node))
            .collect();
        self.derive(children)
    }

    /// Closest inclusive ancestor of every element matching the selector
    pub fn closest(&self, selector: &str) -> Result<Collection> {
        let doc = self.jamon().document();
        let mut found = Vec::new();
        for node in self {
            if let Some(ancestor) = doc.closest(node, selector)? {
                found.push(ancestor);
            }
        }
        Ok(self.derive(unique(found)))
    }

    fn find_in(&self, node: NodeId, selector: &str, first_only: bool) -> Result<Vec<NodeId>> {
        let doc = self.jamon().document_mut();
        match doc.tree().node_type(node) {
            Some(NodeType::Element) => {}
            // Nothing above a document or fragment can take part in a match.
            // With no element to anchor on, a leading combinator fails to parse.
            Some(NodeType::Document | NodeType::Fragment) => return query(&doc, node, selector, first_only),
            _ => return Ok(Vec::new()),
        }

        let (scope, id) = ScopedId::assign(doc, node)?;
        let scoped = scope_selector(&id, selector);
        tracing::trace!("Scoped query '{}' under {}", scoped, node);
        query(&scope, node, &scoped, first_only)
    }
}

fn query(doc: &Document, root: NodeId, selector: &str, first_only: bool) -> Result<Vec<NodeId>> {
    if first_only {
        Ok(doc.query_selector(root, selector)?.into_iter().collect())
    } else {
        Ok(doc.query_selector_all(root, selector)?)
    }
}
