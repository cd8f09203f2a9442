//! Inline style declarations and computed style lookup
//!
//! The `style` attribute is the single source of truth for inline styles;
//! it is parsed on read and rewritten on every change.

use crate::{Document, DomResult, NodeId};

/// Properties whose computed value inherits from the parent element
const INHERITED: &[&str] = &[
    "color",
    "cursor",
    "direction",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-variant",
    "font-weight",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-type",
    "text-align",
    "text-indent",
    "text-transform",
    "visibility",
    "white-space",
    "word-spacing",
];

/// Elements that are block-level by default
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "main", "nav", "ol", "p", "pre", "section", "summary", "ul",
];

/// Elements that are never rendered
const HIDDEN_ELEMENTS: &[&str] = &["head", "meta", "link", "script", "style", "title", "template"];

/// Ordered list of `name: value` declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    declarations: Vec<(String, String)>,
}

impl StyleDeclaration {
    /// Create an empty declaration block
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a: b; c: d` style text, skipping malformed entries
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for declaration in text.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if !name.is_empty() {
                style.set(name, value.trim());
            }
        }
        style
    }

    /// Get a declaration value
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = normalize_name(name);
        self.declarations
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a declaration; an empty value removes it
    pub fn set(&mut self, name: &str, value: &str) {
        let name = normalize_name(name);
        if value.is_empty() {
            self.remove(&name);
            return;
        }

        match self.declarations.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.declarations.push((name, value.to_string())),
        }
    }

    /// Remove a declaration, returns true if it was present
    pub fn remove(&mut self, name: &str) -> bool {
        let name = normalize_name(name);
        let before = self.declarations.len();
        self.declarations.retain(|(n, _)| *n != name);
        self.declarations.len() != before
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check for no declarations
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize back to `style` attribute text
    pub fn to_css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(n, v)| format!("{n}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Custom properties keep their case, everything else is ASCII-lowercased
fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

impl Document {
    /// Parsed inline style of an element
    pub fn inline_style(&self, node: NodeId) -> StyleDeclaration {
        self.attribute(node, "style")
            .map(|text| StyleDeclaration::parse(&text))
            .unwrap_or_default()
    }

    /// `element.style.getPropertyValue(name)`
    pub fn inline_style_property(&self, node: NodeId, name: &str) -> Option<String> {
        self.inline_style(node).get(name).map(str::to_string)
    }

    /// `element.style.setProperty(name, value)`; empty value removes
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let mut style = self.inline_style(node);
        style.set(name, value);
        self.write_style(node, &style)
    }

    /// `element.style.removeProperty(name)`
    pub fn remove_style_property(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        let mut style = self.inline_style(node);
        if style.remove(name) {
            self.write_style(node, &style)?;
        }
        Ok(())
    }

    fn write_style(&mut self, node: NodeId, style: &StyleDeclaration) -> DomResult<()> {
        let elem = self.element_data_mut(node)?;
        if style.is_empty() && !elem.has_attr("style") {
            return Ok(());
        }
        elem.set_attr("style", style.to_css_text());
        Ok(())
    }

    /// `getComputedStyle(element).getPropertyValue(name)`
    ///
    /// Resolves inline declarations, then inheritance, then initial values.
    /// Returns `None` for non-elements.
    pub fn computed_style(&self, node: NodeId, name: &str) -> Option<String> {
        let elem = self.tree.element(node)?;
        let name = normalize_name(name);

        if let Some(value) = self.inline_style_property(node, &name) {
            if value != "inherit" {
                return Some(value);
            }
            return Some(self.inherited_value(node, &name));
        }

        if INHERITED.contains(&name.as_str()) {
            return Some(self.inherited_value(node, &name));
        }

        let value = match name.as_str() {
            "display" => {
                if HIDDEN_ELEMENTS.contains(&elem.tag.as_str()) || elem.has_attr("hidden") {
                    "none".to_string()
                } else if elem.tag == "li" {
                    "list-item".to_string()
                } else if BLOCK_ELEMENTS.contains(&elem.tag.as_str()) {
                    "block".to_string()
                } else {
                    "inline".to_string()
                }
            }
            "width" => format!("{}px", self.bounding_client_rect(node)?.width),
            "height" => format!("{}px", self.bounding_client_rect(node)?.height),
            "position" => "static".to_string(),
            "left" | "top" | "right" | "bottom" | "z-index" => "auto".to_string(),
            "opacity" => "1".to_string(),
            "float" => "none".to_string(),
            "overflow" => "visible".to_string(),
            "box-sizing" => "content-box".to_string(),
            "background-color" => "rgba(0, 0, 0, 0)".to_string(),
            name if name.starts_with("margin") || name.starts_with("padding") => "0px".to_string(),
            name if name.starts_with("border") && name.ends_with("width") => "0px".to_string(),
            _ => String::new(),
        };
        Some(value)
    }

    fn inherited_value(&self, node: NodeId, name: &str) -> String {
        match self.tree.parent_element(node) {
            Some(parent) => self.computed_style(parent, name).unwrap_or_default(),
            None => initial_inherited(name).to_string(),
        }
    }
}

fn initial_inherited(name: &str) -> &'static str {
    match name {
        "color" => "rgb(0, 0, 0)",
        "cursor" => "auto",
        "direction" => "ltr",
        "font-size" => "16px",
        "font-style" | "font-variant" | "line-height" | "letter-spacing" | "word-spacing" => "normal",
        "font-weight" => "400",
        "text-align" => "start",
        "text-indent" => "0px",
        "text-transform" => "none",
        "visibility" => "visible",
        "white-space" => "normal",
        "list-style-type" => "disc",
        _ => "",
    }
}
