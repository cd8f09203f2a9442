//! DOMStringMap (dataset)
//!
//! Maps camelCase dataset keys onto `data-*` attributes.

use crate::{Document, DomResult, NodeId};

/// Attribute name for a dataset key (`userId` → `data-user-id`)
pub fn attribute_name(key: &str) -> String {
    format!("data-{}", to_kebab_case(key))
}

/// Dataset key for an attribute name, if it is a `data-*` attribute
pub fn key_for_attribute(name: &str) -> Option<String> {
    name.strip_prefix("data-").map(to_camel_case)
}

/// Convert kebab-case to camelCase
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        // Only a dash followed by a lowercase letter folds
        match chars.peek() {
            Some(next) if c == '-' && next.is_ascii_lowercase() => {
                result.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => result.push(c),
        }
    }

    result
}

/// Convert camelCase to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

impl Document {
    /// `element.dataset[key]`
    pub fn dataset_get(&self, node: NodeId, key: &str) -> Option<String> {
        self.attribute(node, &attribute_name(key))
    }

    /// `element.dataset[key] = value`
    pub fn dataset_set(&mut self, node: NodeId, key: &str, value: &str) -> DomResult<()> {
        self.set_attribute(node, &attribute_name(key), value)
    }

    /// `delete element.dataset[key]`
    pub fn dataset_remove(&mut self, node: NodeId, key: &str) -> DomResult<bool> {
        self.remove_attribute(node, &attribute_name(key))
    }

    /// All dataset entries of an element, in attribute order
    pub fn dataset(&self, node: NodeId) -> Vec<(String, String)> {
        self.tree
            .element(node)
            .map(|elem| {
                elem.attrs()
                    .iter()
                    .filter_map(|a| key_for_attribute(&a.name).map(|k| (k, a.value.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }
}
