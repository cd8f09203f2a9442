//! Attribute, property, data and style accessors
//!
//! Getters read the first node and return `None` on an empty collection.
//! Setters apply to every node; writing `Value::Null` removes the entry.

use jamon_dom::{to_kebab_case, Document, NodeId, Value};

use crate::{Collection, Result};

/// Properties that take plain numbers, without a `px` unit
const UNITLESS_PROPERTIES: &[&str] = &[
    "animation-iteration-count",
    "aspect-ratio",
    "border-image-slice",
    "column-count",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-shrink",
    "flood-opacity",
    "font-weight",
    "grid-column",
    "grid-row",
    "line-clamp",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "scale",
    "stop-opacity",
    "stroke-miterlimit",
    "stroke-opacity",
    "tab-size",
    "widows",
    "z-index",
    "zoom",
];

/// CSS name for a camelCase or kebab-case property name
fn css_name(name: &str) -> String {
    if name.starts_with("--") {
        name.to_string()
    } else {
        to_kebab_case(name)
    }
}

/// Inline style text for a value; numbers get `px` unless unitless
fn css_value(name: &str, value: &Value) -> String {
    match value {
        Value::Number(_) if !UNITLESS_PROPERTIES.contains(&name) && !name.starts_with("--") => {
            format!("{value}px")
        }
        _ => value.to_string(),
    }
}

impl Collection {
    /// Attribute of the first node
    pub fn attr(&self, name: &str) -> Option<String> {
        self.jamon().document().attribute(self.first()?, name)
    }

    /// Set an attribute on every element; `Null` removes it
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> Result<Collection> {
        let value = value.into();
        if value.is_null() {
            return self.remove_attr(name);
        }

        let text = value.to_string();
        self.each_element(|doc, node| {
            doc.set_attribute(node, name, &text)?;
            Ok(())
        })
    }

    /// Remove an attribute from every element
    pub fn remove_attr(&self, name: &str) -> Result<Collection> {
        self.each_element(|doc, node| {
            doc.remove_attribute(node, name)?;
            Ok(())
        })
    }

    /// Property of the first node
    pub fn prop(&self, name: &str) -> Option<Value> {
        self.jamon().document().property(self.first()?, name)
    }

    /// Set a property on every node; `Null` removes it
    pub fn set_prop(&self, name: &str, value: impl Into<Value>) -> Result<Collection> {
        let value = value.into();
        let mut doc = self.jamon().document_mut();
        for node in self {
            doc.set_property(node, name, value.clone())?;
        }
        Ok(self.clone())
    }

    /// Remove a property from every node
    pub fn remove_prop(&self, name: &str) -> Result<Collection> {
        self.set_prop(name, Value::Null)
    }

    /// Data value of the first node
    ///
    /// Values stored through [`set_data`](Self::set_data) shadow the
    /// matching `data-*` attribute.
    pub fn data(&self, key: &str) -> Option<Value> {
        let node = self.first()?;
        let stored = self
            .jamon()
            .inner
            .data
            .borrow()
            .get(&node)
            .and_then(|entries| entries.get(key))
            .cloned();

        stored.or_else(|| self.jamon().document().dataset_get(node, key).map(Value::from))
    }

    /// Store a data value on every node; `Null` removes it
    pub fn set_data(&self, key: &str, value: impl Into<Value>) -> Result<Collection> {
        let value = value.into();
        if value.is_null() {
            return self.remove_data(key);
        }

        let mut data = self.jamon().inner.data.borrow_mut();
        for node in self {
            data.entry(node).or_default().insert(key.to_string(), value.clone());
        }
        Ok(self.clone())
    }

    /// Remove a data value and its `data-*` attribute from every node
    pub fn remove_data(&self, key: &str) -> Result<Collection> {
        {
            let mut data = self.jamon().inner.data.borrow_mut();
            for node in self {
                if let Some(entries) = data.get_mut(&node) {
                    entries.remove(key);
                    if entries.is_empty() {
                        data.remove(&node);
                    }
                }
            }
        }

        self.each_element(|doc, node| {
            doc.dataset_remove(node, key)?;
            Ok(())
        })
    }

    /// Computed style of the first node
    ///
    /// `name` may be camelCase (`marginTop`) or kebab-case (`margin-top`).
    pub fn css(&self, name: &str) -> Option<String> {
        self.jamon().document().computed_style(self.first()?, &css_name(name))
    }

    /// Set an inline style on every element; `Null` removes it
    ///
    /// Numbers get a `px` unit except for unitless properties such as
    /// `opacity` and `z-index`.
    pub fn set_css(&self, name: &str, value: impl Into<Value>) -> Result<Collection> {
        let name = css_name(name);
        let value = value.into();

        self.each_element(|doc, node| {
            if value.is_null() {
                doc.remove_style_property(node, &name)?;
            } else {
                doc.set_style_property(node, &name, &css_value(&name, &value))?;
            }
            Ok(())
        })
    }

    /// Set several inline styles on every element
    pub fn css_map<K, V>(&self, styles: impl IntoIterator<Item = (K, V)>) -> Result<Collection>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in styles {
            self.set_css(name.as_ref(), value)?;
        }
        Ok(self.clone())
    }

    /// Value of the first form control
    pub fn val(&self) -> Option<String> {
        let node = self.first()?;
        if !is_form_control(&self.jamon().document(), node) {
            return None;
        }
        self.prop("value").map(|value| value.to_string())
    }

    /// Set the value of every form control; `Null` resets it to the default
    pub fn set_val(&self, value: impl Into<Value>) -> Result<Collection> {
        let value = value.into();
        self.each_element(|doc, node| {
            if is_form_control(doc, node) {
                doc.set_property(node, "value", value.clone())?;
            }
            Ok(())
        })
    }

    /// Inner HTML of the first node
    pub fn html(&self) -> Option<String> {
        self.jamon().document().inner_html(self.first()?)
    }

    /// Replace the content of every element with parsed HTML; `Null` clears it
    pub fn set_html(&self, html: impl Into<Value>) -> Result<Collection> {
        let html = content_text(html.into());
        self.each_element(|doc, node| {
            doc.set_inner_html(node, &html)?;
            Ok(())
        })
    }

    /// Text content of the first node
    pub fn text(&self) -> Option<String> {
        self.jamon().document().text_content(self.first()?)
    }

    /// Replace the content of every node with text; `Null` clears it
    pub fn set_text(&self, text: impl Into<Value>) -> Result<Collection> {
        let text = content_text(text.into());
        let mut doc = self.jamon().document_mut();
        for node in self {
            doc.set_text_content(node, &text)?;
        }
        Ok(self.clone())
    }

    /// Run `f` for every element node, skipping text, document and fragment nodes
    fn each_element(&self, mut f: impl FnMut(&mut Document, NodeId) -> Result<()>) -> Result<Collection> {
        let mut doc = self.jamon().document_mut();
        for node in self {
            if doc.tree().is_element(node) {
                f(&mut doc, node)?;
            }
        }
        Ok(self.clone())
    }
}

fn is_form_control(doc: &Document, node: NodeId) -> bool {
    doc.tree().element(node).is_some_and(|elem| elem.is_form_control())
}

fn content_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        value => value.to_string(),
    }
}
