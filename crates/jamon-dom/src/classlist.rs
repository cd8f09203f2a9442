//! DOMTokenList (classList)
//!
//! Ordered, duplicate-free token list backing the `class` attribute.

/// Space-separated token set, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `class` attribute value, dropping repeats
    pub fn from_string(value: &str) -> Self {
        let mut list = Self::new();
        list.add(value.split_whitespace());
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|existing| existing == token)
    }

    /// Append tokens not yet present; empty tokens are ignored
    pub fn add<'a>(&mut self, tokens: impl IntoIterator<Item = &'a str>) {
        for token in tokens.into_iter().filter(|token| !token.is_empty()) {
            if !self.contains(token) {
                self.tokens.push(token.to_owned());
            }
        }
    }

    pub fn remove<'a>(&mut self, tokens: impl IntoIterator<Item = &'a str>) {
        let doomed: Vec<&str> = tokens.into_iter().collect();
        self.tokens.retain(|existing| !doomed.contains(&existing.as_str()));
    }

    /// Flip one token; true if it is present afterwards
    pub fn toggle(&mut self, token: &str) -> bool {
        if self.contains(token) {
            self.remove([token]);
            false
        } else {
            self.add([token]);
            !token.is_empty()
        }
    }

    /// Serialized `class` attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }
}
