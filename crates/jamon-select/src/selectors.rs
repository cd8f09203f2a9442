//! Selector syntax tree
//!
//! A [`SelectorList`] holds comma-separated [`ComplexSelector`]s. Each complex
//! selector is a chain of [`CompoundSelector`]s joined by [`Combinator`]s.

use crate::{parser, SelectorResult};

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse selector text
    pub fn parse(input: &str) -> SelectorResult<Self> {
        parser::parse_selector_list(input)
    }
}

/// Compound selectors joined by combinators, stored left to right
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Simple selectors that all apply to one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

/// Relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// A component of a selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name, lower-cased)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-child(), etc.
    PseudoClass(PseudoClass),
    /// Pseudo-element ::before, ::after
    PseudoElement(PseudoElement),
}

/// Pseudo-element type
///
/// Pseudo-elements are accepted by the parser but never match a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoElement {
    Before,
    After,
    FirstLine,
    FirstLetter,
    Marker,
    Selection,
    Placeholder,
    Backdrop,
}

impl PseudoElement {
    /// Parse from a name without colons
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "first-line" => Some(Self::FirstLine),
            "first-letter" => Some(Self::FirstLetter),
            "marker" => Some(Self::Marker),
            "selection" => Some(Self::Selection),
            "placeholder" => Some(Self::Placeholder),
            "backdrop" => Some(Self::Backdrop),
            _ => None,
        }
    }

    /// Pseudo-elements that may be written with a single colon
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Before | Self::After | Self::FirstLine | Self::FirstLetter)
    }
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Link and input pseudo-classes
    Link,
    Enabled,
    Disabled,
    Checked,
    Required,
    Optional,

    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    // Logical pseudo-classes
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),
}

impl PseudoClass {
    /// Non-functional pseudo-class by name
    pub fn parse(name: &str) -> Option<Self> {
        let pseudo = match name.to_ascii_lowercase().as_str() {
            "link" | "any-link" => Self::Link,
            "enabled" => Self::Enabled,
            "disabled" => Self::Disabled,
            "checked" => Self::Checked,
            "required" => Self::Required,
            "optional" => Self::Optional,
            "root" => Self::Root,
            "empty" => Self::Empty,
            "first-child" => Self::FirstChild,
            "last-child" => Self::LastChild,
            "only-child" => Self::OnlyChild,
            "first-of-type" => Self::FirstOfType,
            "last-of-type" => Self::LastOfType,
            "only-of-type" => Self::OnlyOfType,
            _ => return None,
        };
        Some(pseudo)
    }
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        // An+B, whitespace allowed around the sign of B
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let n_pos = s.find('n')?;
        let a_str = &s[..n_pos];
        let a = match a_str {
            "" | "+" => 1,
            "-" => -1,
            _ => a_str.parse().ok()?,
        };

        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() {
            0
        } else if rest.starts_with('+') || rest.starts_with('-') {
            rest.parse().ok()?
        } else {
            return None;
        };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }

        let diff = n - self.b;
        if self.a > 0 {
            diff >= 0 && diff % self.a == 0
        } else {
            diff <= 0 && diff % self.a == 0
        }
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    /// Attribute name, lower-cased
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (None, value) => return value.is_some(),
            (Some(_), None) => return false,
            (Some(matcher), Some(value)) => (matcher, value),
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_ascii_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                !expected.is_empty()
                    && !expected.contains(char::is_whitespace)
                    && val.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{expected}-"))
            }
            // Empty values never match the substring forms
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && val.starts_with(&fold(expected)),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && val.ends_with(&fold(expected)),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && val.contains(&fold(expected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_expression_odd() {
        let expr = NthExpression::odd();
        assert!(expr.matches(1));
        assert!(!expr.matches(2));
        assert!(expr.matches(3));
        assert!(!expr.matches(4));
    }

    #[test]
    fn test_nth_expression_parse() {
        assert_eq!(NthExpression::parse("odd"), Some(NthExpression::odd()));
        assert_eq!(NthExpression::parse(" EVEN "), Some(NthExpression::even()));
        assert_eq!(NthExpression::parse("3"), Some(NthExpression::index(3)));
        assert_eq!(NthExpression::parse("2n"), Some(NthExpression::new(2, 0)));
        assert_eq!(NthExpression::parse("2n + 1"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("-n+3"), Some(NthExpression::new(-1, 3)));
        assert_eq!(NthExpression::parse("n1"), None);
        assert_eq!(NthExpression::parse("x"), None);
    }

    #[test]
    fn test_nth_negative_coefficient() {
        let first_three = NthExpression::new(-1, 3);
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));
    }

    #[test]
    fn test_attribute_selector_exact() {
        let sel = AttributeSelector {
            name: "type".to_string(),
            matcher: Some(AttributeMatcher::Exact("text".to_string())),
            case_insensitive: false,
        };

        assert!(sel.matches(Some("text")));
        assert!(!sel.matches(Some("TEXT")));
        assert!(!sel.matches(None));
    }

    #[test]
    fn test_attribute_selector_case_insensitive() {
        let sel = AttributeSelector {
            name: "lang".to_string(),
            matcher: Some(AttributeMatcher::DashMatch("EN".to_string())),
            case_insensitive: true,
        };

        assert!(sel.matches(Some("en-US")));
        assert!(sel.matches(Some("en")));
        assert!(!sel.matches(Some("english")));
    }

    #[test]
    fn test_attribute_selector_empty_substring_never_matches() {
        let sel = AttributeSelector {
            name: "class".to_string(),
            matcher: Some(AttributeMatcher::Prefix(String::new())),
            case_insensitive: false,
        };
        assert!(!sel.matches(Some("anything")));
    }
}
