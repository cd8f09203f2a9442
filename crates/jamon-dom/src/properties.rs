//! Element properties
//!
//! Reflects IDL properties onto attributes and node state. Names that are
//! not reflected are expando properties stored on the node itself.

use crate::{Document, DomResult, NodeData, NodeId, Value};

/// String properties reflected onto an attribute
const STRING_REFLECTIONS: &[(&str, &str)] = &[
    ("id", "id"),
    ("className", "class"),
    ("href", "href"),
    ("src", "src"),
    ("title", "title"),
    ("name", "name"),
    ("type", "type"),
    ("alt", "alt"),
    ("placeholder", "placeholder"),
    ("htmlFor", "for"),
    ("lang", "lang"),
    ("dir", "dir"),
    ("rel", "rel"),
    ("target", "target"),
];

/// Boolean properties reflected onto attribute presence
const BOOLEAN_REFLECTIONS: &[(&str, &str)] = &[
    ("checked", "checked"),
    ("disabled", "disabled"),
    ("selected", "selected"),
    ("hidden", "hidden"),
    ("required", "required"),
    ("readOnly", "readonly"),
    ("multiple", "multiple"),
];

/// Properties that can only be read
const READ_ONLY: &[&str] = &["outerHTML", "tagName", "nodeName", "nodeType"];

fn string_reflection(name: &str) -> Option<&'static str> {
    STRING_REFLECTIONS.iter().find(|(p, _)| *p == name).map(|(_, a)| *a)
}

fn boolean_reflection(name: &str) -> Option<&'static str> {
    BOOLEAN_REFLECTIONS.iter().find(|(p, _)| *p == name).map(|(_, a)| *a)
}

impl Document {
    /// `node[name]`
    ///
    /// `None` stands for `undefined`: an unknown node, a property the node
    /// does not have, or an expando that was never set.
    pub fn property(&self, node: NodeId, name: &str) -> Option<Value> {
        let n = self.tree.get(node)?;

        match name {
            "nodeType" => return Some(Value::from(n.node_type().as_u32())),
            "nodeName" => return Some(Value::from(self.node_name(node)?)),
            "textContent" => return Some(self.text_content(node).map(Value::from).unwrap_or_default()),
            "nodeValue" | "data" if n.character_data().is_some() => {
                return n.character_data().map(Value::from);
            }
            "innerHTML" if n.is_element() => return self.inner_html(node).map(Value::from),
            _ => {}
        }

        if let Some(elem) = n.as_element() {
            if let Some(attr) = string_reflection(name) {
                return Some(Value::from(elem.get_attr(attr).unwrap_or_default()));
            }
            if let Some(attr) = boolean_reflection(name) {
                return Some(Value::Bool(elem.has_attr(attr)));
            }
            match name {
                "tagName" => return Some(Value::from(elem.tag.to_ascii_uppercase())),
                "outerHTML" => return self.outer_html(node).map(Value::from),
                "value" if elem.is_form_control() => return Some(Value::from(self.form_value(node))),
                _ => {}
            }
        }

        n.expando.get(name).cloned()
    }

    /// `node[name] = value`; `Value::Null` removes the property
    ///
    /// Writes to read-only properties are ignored.
    pub fn set_property(&mut self, node: NodeId, name: &str, value: Value) -> DomResult<()> {
        if value.is_null() {
            return self.remove_property(node, name);
        }

        let n = self.tree.node(node)?;
        if READ_ONLY.contains(&name) {
            tracing::trace!("Ignoring write to read-only property {} on {}", name, node);
            return Ok(());
        }

        match name {
            "textContent" => return self.set_text_content(node, &value.to_string()),
            "nodeValue" | "data" if n.character_data().is_some() => {
                return self.tree.set_character_data(node, &value.to_string());
            }
            "innerHTML" if n.is_element() => return self.set_inner_html(node, &value.to_string()),
            _ => {}
        }

        if let Some(elem) = n.as_element() {
            if let Some(attr) = string_reflection(name) {
                return self.set_attribute(node, attr, &value.to_string());
            }
            if let Some(attr) = boolean_reflection(name) {
                let elem = self.element_data_mut(node)?;
                if value.is_truthy() {
                    elem.set_attr(attr, "");
                } else {
                    elem.remove_attr(attr);
                }
                return Ok(());
            }
            if name == "value" && elem.is_form_control() {
                return self.set_form_value(node, value.to_string());
            }
        }

        if let Some(n) = self.tree.get_mut(node) {
            n.expando.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// `delete node[name]`
    ///
    /// Reflected properties fall back to their empty state: the attribute
    /// is removed, content is cleared and a form value is reset to its
    /// default.
    pub fn remove_property(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        let n = self.tree.node(node)?;
        if READ_ONLY.contains(&name) {
            return Ok(());
        }

        match name {
            "textContent" => return self.set_text_content(node, ""),
            "nodeValue" | "data" if n.character_data().is_some() => {
                return self.tree.set_character_data(node, "");
            }
            "innerHTML" if n.is_element() => return self.set_text_content(node, ""),
            _ => {}
        }

        if let Some(elem) = n.as_element() {
            let attr = string_reflection(name).or_else(|| boolean_reflection(name));
            if let Some(attr) = attr {
                self.element_data_mut(node)?.remove_attr(attr);
                return Ok(());
            }
            if name == "value" && elem.is_form_control() {
                self.element_data_mut(node)?.value = None;
                return Ok(());
            }
        }

        if let Some(n) = self.tree.get_mut(node) {
            n.expando.remove(name);
        }
        Ok(())
    }

    /// `node.nodeName`
    pub fn node_name(&self, node: NodeId) -> Option<String> {
        let name = match &self.tree.get(node)?.data {
            NodeData::Element(elem) => elem.tag.to_ascii_uppercase(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::Document => "#document".to_string(),
            NodeData::Fragment => "#document-fragment".to_string(),
            NodeData::Doctype { name, .. } => name.clone(),
        };
        Some(name)
    }

    /// Current value of a form control: the dirty value, else the default
    fn form_value(&self, node: NodeId) -> String {
        let Some(elem) = self.tree.element(node) else {
            return String::new();
        };
        if let Some(value) = &elem.value {
            return value.clone();
        }

        match elem.tag.as_str() {
            "textarea" => self.text_content(node).unwrap_or_default(),
            "option" => match elem.get_attr("value") {
                Some(value) => value.to_string(),
                None => self.text_content(node).unwrap_or_default().trim().to_string(),
            },
            "select" => {
                let options = self.options(node);
                options
                    .iter()
                    .copied()
                    .find(|&o| self.selected(o))
                    .or_else(|| options.first().copied())
                    .map(|o| self.form_value(o))
                    .unwrap_or_default()
            }
            _ => elem.get_attr("value").unwrap_or_default().to_string(),
        }
    }

    fn set_form_value(&mut self, node: NodeId, value: String) -> DomResult<()> {
        if self.local_name(node) != Some("select") {
            self.element_data_mut(node)?.value = Some(value);
            return Ok(());
        }

        // A select's value picks the first option with that value
        let mut matched = false;
        for option in self.options(node) {
            let select = !matched && self.form_value(option) == value;
            matched |= select;
            self.set_selected(option, select)?;
        }
        Ok(())
    }

    /// `<option>` descendants of a select, in document order
    fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.tree
            .descendants(select)
            .filter(|&d| self.local_name(d) == Some("option"))
            .collect()
    }

    fn selected(&self, option: NodeId) -> bool {
        self.has_attribute(option, "selected")
    }

    fn set_selected(&mut self, option: NodeId, selected: bool) -> DomResult<()> {
        let elem = self.element_data_mut(option)?;
        if selected {
            elem.set_attr("selected", "");
        } else {
            elem.remove_attr("selected");
        }
        Ok(())
    }
}
