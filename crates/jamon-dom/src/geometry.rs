//! Geometry APIs
//!
//! DOMRect, getBoundingClientRect, and offset properties.
//!
//! There is no layout engine here: the host hands every element its flow
//! box through [`Document::set_layout_box`]. Inline sizes and the offsets
//! of positioned elements are applied on top of that box when reading.

use serde::Serialize;

use crate::{Document, DomResult, NodeId};

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Check if point is inside
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Same rect moved by `dx`, `dy`
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Parse the leading number of a CSS value like `parseFloat` does
///
/// `"12.5px"` gives 12.5, `"auto"` and `""` give `None`.
pub fn parse_px(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// A length usable as a box size: `Npx` or a bare `0`
fn px_length(value: &str) -> Option<f64> {
    let value = value.trim();
    match value.strip_suffix("px") {
        Some(number) => number.trim().parse().ok(),
        None if value == "0" => Some(0.0),
        None => None,
    }
}

impl Document {
    /// Store the flow box of an element, as computed by the host's layout
    pub fn set_layout_box(&mut self, node: NodeId, rect: DOMRect) -> DomResult<()> {
        self.element_data_mut(node)?;
        self.layout.insert(node, rect);
        Ok(())
    }

    /// Flow box of an element, if the host supplied one
    pub fn layout_box(&self, node: NodeId) -> Option<DOMRect> {
        self.layout.get(&node).copied()
    }

    /// `element.getBoundingClientRect()`
    ///
    /// Elements without a flow box start from an empty rect at the origin.
    pub fn bounding_client_rect(&self, node: NodeId) -> Option<DOMRect> {
        self.tree.element(node)?;
        let mut rect = self.layout_box(node).unwrap_or_default();

        let inline = self.inline_style(node);
        if let Some(width) = inline.get("width").and_then(px_length) {
            rect.width = width;
        }
        if let Some(height) = inline.get("height").and_then(px_length) {
            rect.height = height;
        }

        let positioned = std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .filter(|&id| self.is_positioned(id));
        for id in positioned {
            let (dx, dy) = self.relative_offset(id);
            rect = rect.translate(dx, dy);
        }

        Some(rect)
    }

    /// `element.offsetParent`: nearest positioned ancestor, else `<body>`
    ///
    /// `None` for detached elements and for `<body>` and `<html>` themselves.
    pub fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.element(node)?;
        if !self.tree.is_connected(node) || self.body() == Some(node) || self.document_element() == Some(node) {
            return None;
        }

        self.tree
            .ancestors(node)
            .filter(|&id| self.tree.is_element(id))
            .find(|&id| self.is_positioned(id) || self.body() == Some(id))
    }

    /// `element.offsetLeft`
    pub fn offset_left(&self, node: NodeId) -> Option<f64> {
        let rect = self.bounding_client_rect(node)?;
        let origin = self
            .offset_parent(node)
            .and_then(|parent| self.bounding_client_rect(parent))
            .map_or(0.0, |parent| parent.x);
        Some(rect.x - origin)
    }

    /// `element.offsetTop`
    pub fn offset_top(&self, node: NodeId) -> Option<f64> {
        let rect = self.bounding_client_rect(node)?;
        let origin = self
            .offset_parent(node)
            .and_then(|parent| self.bounding_client_rect(parent))
            .map_or(0.0, |parent| parent.y);
        Some(rect.y - origin)
    }

    fn is_positioned(&self, node: NodeId) -> bool {
        self.computed_style(node, "position")
            .is_some_and(|position| position != "static")
    }

    fn relative_offset(&self, node: NodeId) -> (f64, f64) {
        let inline = self.inline_style(node);
        let dx = inline.get("left").and_then(parse_px).unwrap_or(0.0);
        let dy = inline.get("top").and_then(parse_px).unwrap_or(0.0);
        (dx, dy)
    }
}
