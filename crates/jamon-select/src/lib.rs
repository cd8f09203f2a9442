//! Jamon Select - CSS selectors
//!
//! Parses selector text into a [`SelectorList`] and matches it against a
//! [`jamon_dom::Document`]. The query functions behave like the DOM's
//! `querySelector` family: selectors are evaluated against the whole
//! document, and only descendants of the query root are returned.

mod error;
mod matching;
mod parser;
mod query;
mod selectors;

pub use error::{SelectorError, SelectorResult};
pub use parser::escape_identifier;
pub use query::ElementQuery;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, PseudoElement, SelectorComponent, SelectorList,
};
