//! Geometry queries
//!
//! Sizes and positions come from the document's rendered rects, so they
//! follow whatever flow boxes the host assigned with
//! [`Document::set_layout_box`](jamon_dom::Document::set_layout_box).

use jamon_dom::{parse_px, DOMRect, Document, NodeId};
use serde::{Deserialize, Serialize};

use crate::{Collection, Result};

/// Left/top coordinates in px
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

impl Collection {
    /// Rendered width of the first element
    pub fn width(&self) -> Option<f64> {
        self.first_rect().map(|rect| rect.width)
    }

    /// Rendered height of the first element
    pub fn height(&self) -> Option<f64> {
        self.first_rect().map(|rect| rect.height)
    }

    /// Position of the first element relative to its offset parent
    pub fn offset(&self) -> Option<Position> {
        let doc = self.jamon().document();
        let node = self.first()?;
        Some(Position::new(doc.offset_left(node)?, doc.offset_top(node)?))
    }

    /// Document position of the first element
    pub fn position(&self) -> Option<Position> {
        self.first_rect().map(|rect| Position::new(rect.x, rect.y))
    }

    /// Move every element to a document position
    ///
    /// Static elements become `position: relative`. A `None` coordinate
    /// leaves that axis alone.
    pub fn set_position(&self, left: impl Into<Option<f64>>, top: impl Into<Option<f64>>) -> Result<Collection> {
        let (left, top) = (left.into(), top.into());
        let mut doc = self.jamon().document_mut();

        for node in self {
            if !doc.tree().is_element(node) {
                continue;
            }
            let (origin, parent_rect) = flow_origin(&mut doc, node)?;

            if let Some(left) = left {
                let value = format!("{}px", left - origin.left - parent_rect.x);
                doc.set_style_property(node, "left", &value)?;
            }
            if let Some(top) = top {
                let value = format!("{}px", top - origin.top - parent_rect.y);
                doc.set_style_property(node, "top", &value)?;
            }
        }

        tracing::debug!("Positioned {} node(s) at {:?}/{:?}", self.len(), left, top);
        Ok(self.clone())
    }

    fn first_rect(&self) -> Option<DOMRect> {
        self.jamon().document().bounding_client_rect(self.first()?)
    }
}

/// Offset of an element without its own `left`/`top`, and its offset parent's rect
///
/// Static elements are switched to `position: relative`, which does not
/// move them until an offset is written.
fn flow_origin(doc: &mut Document, node: NodeId) -> Result<(Position, DOMRect)> {
    let parent = doc.offset_parent(node).or_else(|| doc.body());
    let parent_rect = parent
        .and_then(|parent| doc.bounding_client_rect(parent))
        .unwrap_or_default();

    let offset = Position::new(
        doc.offset_left(node).unwrap_or_default(),
        doc.offset_top(node).unwrap_or_default(),
    );

    let is_static = doc.computed_style(node, "position").is_none_or(|position| position == "static");
    if is_static {
        doc.set_style_property(node, "position", "relative")?;
        return Ok((offset, parent_rect));
    }

    let shift = |name: &str| doc.computed_style(node, name).as_deref().and_then(parse_px).unwrap_or(0.0);
    let origin = Position::new(offset.left - shift("left"), offset.top - shift("top"));
    Ok((origin, parent_rect))
}
