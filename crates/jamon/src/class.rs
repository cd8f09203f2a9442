//! Class name operations and visibility
//!
//! Class arguments are whitespace-separated lists. Each token is applied
//! once per call, so `"a a"` adds a single `a` and toggling `"a b"` flips
//! both classes independently.

use jamon_dom::DOMTokenList;

use crate::{Collection, Result};

#[derive(Debug, Clone, Copy)]
enum ClassEdit {
    Add,
    Remove,
    Toggle,
}

impl Collection {
    /// Add class names to every element
    pub fn add_class(&self, class_names: &str) -> Result<Collection> {
        self.edit_classes(class_names, ClassEdit::Add)
    }

    /// Remove class names from every element
    pub fn remove_class(&self, class_names: &str) -> Result<Collection> {
        self.edit_classes(class_names, ClassEdit::Remove)
    }

    /// Toggle each class name on every element
    pub fn toggle_class(&self, class_names: &str) -> Result<Collection> {
        self.edit_classes(class_names, ClassEdit::Toggle)
    }

    /// Check if the first node has a class
    pub fn has_class(&self, class_name: &str) -> bool {
        let class_name = class_name.trim();
        if class_name.is_empty() {
            return false;
        }
        self.first()
            .and_then(|node| self.jamon().document().class_list(node))
            .is_some_and(|list| list.contains(class_name))
    }

    /// Remove the hidden class
    pub fn show(&self) -> Result<Collection> {
        let hidden = self.jamon().hidden_class_name();
        self.remove_class(&hidden)
    }

    /// Add the hidden class
    pub fn hide(&self) -> Result<Collection> {
        let hidden = self.jamon().hidden_class_name();
        self.add_class(&hidden)
    }

    /// Toggle the hidden class
    pub fn toggle(&self) -> Result<Collection> {
        let hidden = self.jamon().hidden_class_name();
        self.toggle_class(&hidden)
    }

    fn edit_classes(&self, class_names: &str, edit: ClassEdit) -> Result<Collection> {
        let tokens = unique_tokens(class_names);
        if tokens.is_empty() {
            return Ok(self.clone());
        }

        let mut doc = self.jamon().document_mut();
        for node in self {
            // Non-elements have no class list
            let Some(mut list) = doc.class_list(node) else {
                continue;
            };
            apply(&mut list, &tokens, edit);
            doc.set_class_list(node, &list)?;
        }

        tracing::trace!("{:?} classes {:?} on {} node(s)", edit, tokens, self.len());
        Ok(self.clone())
    }
}

fn apply(list: &mut DOMTokenList, tokens: &[&str], edit: ClassEdit) {
    match edit {
        ClassEdit::Add => list.add(tokens.iter().copied()),
        ClassEdit::Remove => list.remove(tokens.iter().copied()),
        ClassEdit::Toggle => {
            for token in tokens {
                list.toggle(token);
            }
        }
    }
}

fn unique_tokens(class_names: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for token in class_names.split_whitespace() {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
