//! Jamón
//!
//! Chainable collections over a Jamon DOM document, in the style of the
//! classic DOM utility libraries: class manipulation, attribute, property,
//! style and data accessors, traversal, node insertion, event delegation
//! and geometry.
//!
//! # Example
//! ```rust,ignore
//! use jamon::Jamon;
//!
//! let jamon = Jamon::parse("<ul><li>one</li></ul>");
//! jamon.get_all("li")?.add_class("item")?.set_attr("title", "entry")?;
//!
//! let link = jamon.create("a", [("href", "http://example.com")])?;
//! link.append_to("li")?;
//! ```

mod access;
mod class;
mod collection;
mod config;
mod context;
mod error;
mod events;
mod geometry;
mod insert;
mod selector;
mod traversal;

pub use collection::Collection;
pub use config::{Config, DEFAULT_HIDDEN_CLASS_NAME};
pub use context::Jamon;
pub use error::{Error, Result};
pub use events::Listener;
pub use geometry::Position;
pub use insert::Content;
pub use selector::Selector;

pub use jamon_dom as dom;
pub use jamon_dom::{Document, Event, NodeId, Value};
pub use jamon_select as select;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
