//! Edge case tests for jamon-dom
//!
//! Boundary conditions of the tree, attribute and parsing layers.

use jamon_dom::{Document, DomError, DOMTokenList, NodeId, StyleDeclaration, Value, parse_px};
use pretty_assertions::assert_eq;

// ============================================================================
// TREE EDGE CASES
// ============================================================================

#[test]
fn test_unknown_node_id() {
    let mut doc = Document::default();
    let bogus = NodeId::NONE;

    assert!(doc.tree().get(bogus).is_none());
    assert_eq!(doc.tree_mut().append_child(bogus, NodeId::ROOT), Err(DomError::NotFound(bogus)));
    assert_eq!(doc.text_content(bogus), None);
}

#[test]
fn test_document_cannot_be_inserted() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let root = doc.root();

    assert!(matches!(
        doc.tree_mut().append_child(body, root),
        Err(DomError::HierarchyRequest(_))
    ));
}

#[test]
fn test_text_under_document_rejected() {
    let mut doc = Document::empty("about:blank");
    let text = doc.create_text_node("stray");
    let root = doc.root();

    assert!(doc.tree_mut().append_child(root, text).is_err());
    assert_eq!(doc.tree().parent(text), None);
}

#[test]
fn test_mixins_without_parent_are_noops() {
    let mut doc = Document::default();
    let lonely = doc.create_element("div").unwrap();
    let other = doc.create_element("span").unwrap();

    doc.tree_mut().before(lonely, &[other]).unwrap();
    doc.tree_mut().after(lonely, &[other]).unwrap();
    doc.tree_mut().replace_with(lonely, &[other]).unwrap();
    assert_eq!(doc.tree().parent(other), None);
}

#[test]
fn test_duplicate_nodes_in_append_list() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = doc.create_element("a").unwrap();
    let b = doc.create_element("b").unwrap();

    doc.tree_mut().append(body, &[a, b, a]).unwrap();
    let kids: Vec<NodeId> = doc.tree().children(body).map(|(id, _)| id).collect();
    assert_eq!(kids, vec![b, a]);
}

#[test]
fn test_replace_with_itself_in_list() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = doc.create_element("a").unwrap();
    let b = doc.create_element("b").unwrap();
    doc.tree_mut().append(body, &[a]).unwrap();

    doc.tree_mut().replace_with(a, &[b, a]).unwrap();
    let kids: Vec<NodeId> = doc.tree().children(body).map(|(id, _)| id).collect();
    assert_eq!(kids, vec![b, a]);
}

#[test]
fn test_normalize_nested_and_empty() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    doc.set_inner_html(body, "<p>a</p>").unwrap();
    let p = doc.tree().first_child(body).unwrap();
    let extra = doc.create_text_node("b");
    let empty = doc.create_text_node("");
    doc.tree_mut().append(p, &[empty, extra]).unwrap();

    doc.tree_mut().normalize(body).unwrap();
    assert_eq!(doc.tree().children(p).count(), 1);
    assert_eq!(doc.text_content(p).as_deref(), Some("ab"));
}

// ============================================================================
// ATTRIBUTE AND TOKEN EDGE CASES
// ============================================================================

#[test]
fn test_invalid_names_rejected() {
    let mut doc = Document::default();
    let div = doc.create_element("div").unwrap();

    assert!(matches!(doc.create_element("no good"), Err(DomError::InvalidCharacter(_))));
    assert!(matches!(doc.set_attribute(div, "", "x"), Err(DomError::InvalidCharacter(_))));
    assert!(matches!(doc.create_element("<p>"), Err(DomError::InvalidCharacter(_))));
}

#[test]
fn test_token_list_whitespace() {
    let list = DOMTokenList::from_string("  a\tb \n a  ");
    assert_eq!(list.value(), "a b");
    assert_eq!(list.len(), 2);
    assert!(!list.contains(""));
}

#[test]
fn test_unicode_attribute_values() {
    let mut doc = Document::default();
    let div = doc.create_element("div").unwrap();

    doc.set_attribute(div, "title", "Jamón ñ 🚀").unwrap();
    assert_eq!(doc.attribute(div, "TITLE").as_deref(), Some("Jamón ñ 🚀"));
    assert_eq!(doc.outer_html(div).as_deref(), Some("<div title=\"Jamón ñ 🚀\"></div>"));
}

#[test]
fn test_style_custom_properties_keep_case() {
    let mut style = StyleDeclaration::parse("--Main-Color: red; COLOR: blue");
    assert_eq!(style.get("--Main-Color"), Some("red"));
    assert_eq!(style.get("color"), Some("blue"));
    assert!(style.remove("--Main-Color"));
    assert_eq!(style.to_css_text(), "color: blue;");
}

#[test]
fn test_style_value_containing_colon() {
    let style = StyleDeclaration::parse("background: url(http://x/y.png)");
    assert_eq!(style.get("background"), Some("url(http://x/y.png)"));
}

#[test]
fn test_parse_px_edge_values() {
    assert_eq!(parse_px("0"), Some(0.0));
    assert_eq!(parse_px("-0.25px"), Some(-0.25));
    assert_eq!(parse_px("px"), None);
    assert_eq!(parse_px("."), None);
}

// ============================================================================
// PARSING EDGE CASES
// ============================================================================

#[test]
fn test_empty_document_parse() {
    let doc = Document::parse_html("");

    assert!(doc.document_element().is_some());
    assert!(doc.head().is_some());
    assert!(doc.body().is_some());
    assert_eq!(doc.title(), "");
}

#[test]
fn test_fragment_with_only_text() {
    let mut doc = Document::default();
    let fragment = doc.parse_fragment("just text");

    assert_eq!(doc.text_content(fragment).as_deref(), Some("just text"));
    assert_eq!(doc.tree().parent(fragment), None);
}

#[test]
fn test_script_text_not_escaped() {
    let mut doc = Document::default();
    let head = doc.head().unwrap();
    doc.set_inner_html(head, "<script>if (a < b) {}</script>").unwrap();

    assert_eq!(doc.inner_html(head).as_deref(), Some("<script>if (a < b) {}</script>"));
}

#[test]
fn test_comment_roundtrip() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    doc.set_inner_html(body, "<!-- note --><i>x</i>").unwrap();

    assert_eq!(doc.inner_html(body).as_deref(), Some("<!-- note --><i>x</i>"));
    assert_eq!(doc.property(body, "textContent"), Some(Value::from("x")));
}
