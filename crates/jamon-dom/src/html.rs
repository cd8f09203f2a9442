//! HTML parsing and serialization
//!
//! Uses html5ever's built-in RcDom and converts it into the arena, which is
//! simpler and more reliable than implementing TreeSink directly.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::{Document, DomResult, ElementData, NodeData, NodeId};

/// Elements that never have children or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text children are serialized verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes", "noscript"];

impl Document {
    /// Parse an HTML string into a new document
    pub fn parse_html(html: &str) -> Document {
        Self::parse_html_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_html_with_url(html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let root = document.root();
        for child in dom.document.children.borrow().iter() {
            convert_node(child, &mut document, root);
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse a body-level HTML fragment into a detached document fragment
    pub fn parse_fragment(&mut self, html: &str) -> NodeId {
        // Leading <body> keeps the parser in body mode so whitespace survives
        let dom = parse_document(RcDom::default(), Default::default()).one(format!("<body>{html}"));
        let fragment = self.tree.create_fragment();

        if let Some(body) = find_body(&dom.document) {
            for child in body.children.borrow().iter() {
                convert_node(child, self, fragment);
            }
        }

        fragment
    }

    /// `element.innerHTML`
    pub fn inner_html(&self, node: NodeId) -> Option<String> {
        let n = self.tree.get(node)?;
        if !n.is_parent_node() {
            return None;
        }
        let mut out = String::new();
        for (child, _) in self.tree.children(node) {
            self.serialize_into(child, &mut out);
        }
        Some(out)
    }

    /// `element.outerHTML`
    pub fn outer_html(&self, node: NodeId) -> Option<String> {
        self.tree.element(node)?;
        let mut out = String::new();
        self.serialize_into(node, &mut out);
        Some(out)
    }

    /// `element.innerHTML = html`
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> DomResult<()> {
        self.set_text_content(node, "")?;
        let fragment = self.parse_fragment(html);
        self.tree.append_child(node, fragment)?;
        Ok(())
    }

    fn serialize_into(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.tree.get(id) else {
            return;
        };

        match &node.data {
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(&elem.tag);
                for attr in elem.attrs() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape(&attr.value, true));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                    return;
                }
                for (child, _) in self.tree.children(id) {
                    self.serialize_into(child, out);
                }
                out.push_str("</");
                out.push_str(&elem.tag);
                out.push('>');
            }
            NodeData::Text(text) => {
                let raw = self
                    .tree
                    .parent(id)
                    .and_then(|p| self.tree.element(p))
                    .is_some_and(|p| RAW_TEXT_ELEMENTS.contains(&p.tag.as_str()));
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape(text, false));
                }
            }
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Document | NodeData::Fragment => {
                for (child, _) in self.tree.children(id) {
                    self.serialize_into(child, out);
                }
            }
        }
    }
}

/// Convert an RcDom node into the arena under `parent`
fn convert_node(handle: &Handle, document: &mut Document, parent: NodeId) {
    let tree = document.tree_mut();

    let id = match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, document, parent);
            }
            return;
        }
        RcNodeData::Doctype { name, public_id, system_id } => {
            tree.create_doctype(&name.to_string(), &public_id.to_string(), &system_id.to_string())
        }
        RcNodeData::Text { contents } => tree.create_text(&contents.borrow().to_string()),
        RcNodeData::Comment { contents } => tree.create_comment(&contents.to_string()),
        RcNodeData::Element { name, attrs, .. } => {
            let mut elem = ElementData::new(&name.local);
            for attr in attrs.borrow().iter() {
                elem.set_attr(&attr.name.local, attr.value.to_string());
            }
            let id = tree.create_element(&elem.tag);
            if let Some(node) = tree.element_mut(id) {
                *node = elem;
            }
            id
        }
        RcNodeData::ProcessingInstruction { .. } => return,
    };

    if tree.append_child(parent, id).is_err() {
        tracing::trace!("Dropping node {} that cannot live under {}", id, parent);
        return;
    }

    for child in handle.children.borrow().iter() {
        convert_node(child, document, id);
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    let children = document.children.borrow();
    let html = children
        .iter()
        .find(|c| matches!(&c.data, RcNodeData::Element { name, .. } if &*name.local == "html"))?;
    let html_children = html.children.borrow();
    html_children
        .iter()
        .find(|c| matches!(&c.data, RcNodeData::Element { name, .. } if &*name.local == "body"))
        .cloned()
}

/// Escape text for HTML output
fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
