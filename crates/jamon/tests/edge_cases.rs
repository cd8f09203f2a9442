//! Edge case tests for jamon
//!
//! Empty collections, foreign and unusual inputs, error propagation and
//! cleanup on failure.

use std::cell::Cell;
use std::rc::Rc;

use jamon::dom::DomError;
use jamon::select::SelectorError;
use jamon::{Collection, Error, Event, Jamon, Listener, Selector, Value};
use pretty_assertions::assert_eq;

// ============================================================================
// EMPTY COLLECTIONS
// ============================================================================

#[test]
fn test_getters_on_empty_collection() {
    let jamon = Jamon::parse("<p class=\"a\">x</p>");
    let empty = jamon.get(".missing").unwrap();

    assert!(empty.is_empty());
    assert!(!empty.has_class("a"));
    assert_eq!(empty.attr("class"), None);
    assert_eq!(empty.prop("id"), None);
    assert_eq!(empty.data("x"), None);
    assert_eq!(empty.css("color"), None);
    assert_eq!(empty.val(), None);
    assert_eq!(empty.html(), None);
    assert_eq!(empty.text(), None);
    assert_eq!(empty.width(), None);
    assert_eq!(empty.position(), None);
}

#[test]
fn test_setters_on_empty_collection_chain() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<p>x</p>");
    let empty = jamon.empty();
    let listener = Listener::new(|_: &Collection, _: &mut Event| {});

    let returned = empty
        .add_class("a")?
        .set_attr("title", "t")?
        .set_css("color", "red")?
        .set_data("k", 1)?
        .append("text")?
        .on("click", &listener)?
        .trigger("click", None)?
        .set_position(1.0, 2.0)?
        .remove()?;
    assert_eq!(returned, empty);
    assert!(empty.find_all("p")?.is_empty());
    assert!(empty.parent().is_empty());
    Ok(())
}

#[test]
fn test_insert_into_no_targets() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<p>x</p>");
    let b = jamon.create_element("b")?;

    b.append_to(".missing")?;
    assert_eq!(jamon.document().tree().parent(b.first().unwrap()), None);
    Ok(())
}

// ============================================================================
// INPUTS
// ============================================================================

#[test]
fn test_absent_and_text_inputs() {
    let jamon = Jamon::parse("<p>text</p>");
    let p = jamon.get("p").unwrap().first().unwrap();
    let text = jamon.document().tree().first_child(p).unwrap();

    assert!(jamon.get_all(Selector::None).unwrap().is_empty());
    assert!(jamon.get(None::<&str>).unwrap().is_empty());
    assert_eq!(jamon.get(Some("p")).unwrap().first(), Some(p));

    let wrapped = jamon.get(text).unwrap();
    assert_eq!(wrapped.text().as_deref(), Some("text"));
    assert!(wrapped.find_all("*").unwrap().is_empty());
}

#[test]
fn test_duplicates_pass_through_raw_lists() {
    let jamon = Jamon::parse("<p>x</p>");
    let p = jamon.get("p").unwrap().first().unwrap();

    let nodes = vec![p, p, p];
    assert_eq!(jamon.get_all(&nodes).unwrap().len(), 3);
    assert_eq!(jamon.get_all(&nodes).unwrap().parent().len(), 1);
}

#[test]
fn test_foreign_collection_rejected() {
    let first = Jamon::parse("<p>x</p>");
    let second = Jamon::parse("<div></div>");
    let p = first.get("p").unwrap();

    assert!(matches!(second.get_all(&p), Err(Error::TypeMismatch(_))));
    assert!(matches!(second.get("div").unwrap().append(&p), Err(Error::TypeMismatch(_))));
}

#[test]
fn test_unknown_node_rejected() {
    let small = Jamon::parse("<p>x</p>");
    let large = Jamon::parse("<div><p>1</p><p>2</p><p>3</p><p>4</p><p>5</p></div>");
    let last = large.get("p:last-child").unwrap().first().unwrap();

    assert!(matches!(small.get(last), Err(Error::TypeMismatch(_))));
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_selector_errors_propagate() {
    let jamon = Jamon::parse("<div><p>x</p></div>");
    let div = jamon.get("div").unwrap();

    let err = jamon.get_all("p >").unwrap_err();
    assert!(matches!(err, Error::Selector(SelectorError::Syntax { .. })));
    assert!(matches!(div.find_one("::"), Err(Error::Selector(_))));
    assert!(matches!(div.closest("[x"), Err(Error::Selector(_))));
    assert!(matches!(div.find_all(":unknown-pseudo"), Err(Error::Selector(_))));
}

#[test]
fn test_leading_combinator_scoped_to_element() {
    let jamon = Jamon::parse("<ul><li>x</li><li><ul><li>y</li></ul></li></ul>");
    let ul = jamon.get("ul").unwrap();

    assert_eq!(ul.find_all("> li").unwrap().len(), 2);
    assert_eq!(ul.find_all("> li + li > ul > li").unwrap().text().as_deref(), Some("y"));
    assert_eq!(ul.attr("id"), None);

    assert!(matches!(ul.find_all("> "), Err(Error::Selector(_))));
    assert_eq!(ul.attr("id"), None);
}

#[test]
fn test_leading_combinator_on_document_rejected() {
    let jamon = Jamon::parse("<ul><li>x</li></ul>");
    let root = jamon.document().root();
    let document = jamon.get(root).unwrap();

    assert_eq!(document.find_all("li").unwrap().len(), 1);
    assert!(matches!(document.find_all("> html"), Err(Error::Selector(_))));
}

#[test]
fn test_invalid_selector_on_empty_collection() {
    let jamon = Jamon::parse("<p>x</p>");

    assert!(jamon.empty().find_all("[").unwrap().is_empty());
    assert!(jamon.empty().find_one("> ").unwrap().is_empty());
}

#[test]
fn test_failed_find_leaves_no_temporary_id() {
    let jamon = Jamon::parse("<div><p>x</p></div><section></section>");
    let blocks = jamon.get_all("div, section").unwrap();

    assert!(blocks.find_all("p, [").is_err());
    assert!(jamon.get_all("[id]").unwrap().is_empty());

    assert_eq!(blocks.find_all("p").unwrap().len(), 1);
    assert!(jamon.get_all("[id]").unwrap().is_empty());
}

#[test]
fn test_existing_id_kept() {
    let jamon = Jamon::parse("<div id=\"1 odd:id\"><p>x</p></div>");
    let div = jamon.get("div").unwrap();

    assert_eq!(div.find_all("p").unwrap().len(), 1);
    assert_eq!(div.attr("id").as_deref(), Some("1 odd:id"));
}

#[test]
fn test_hierarchy_errors() {
    let jamon = Jamon::parse("<div><p>x</p></div>");
    let div = jamon.get("div").unwrap();
    let p = div.find_one("p").unwrap().first().unwrap();
    let text_node = jamon.document().tree().first_child(p).unwrap();
    let text = jamon.get(text_node).unwrap();

    assert!(matches!(
        div.append_to("p"),
        Err(Error::Dom(DomError::HierarchyRequest(_)))
    ));
    assert!(matches!(text.append("y"), Err(Error::Dom(_))));
}

#[test]
fn test_event_argument_errors() {
    let jamon = Jamon::parse("<p>x</p>");
    let p = jamon.get("p").unwrap();
    let listener = Listener::new(|_: &Collection, _: &mut Event| {});

    assert_eq!(p.on(" \t", &listener).unwrap_err(), Error::Argument("event type"));
    assert_eq!(p.off("", &listener).unwrap_err(), Error::Argument("event type"));
    assert_eq!(p.trigger("", None).unwrap_err(), Error::Argument("event type"));
}

// ============================================================================
// VALUES AND NODES
// ============================================================================

#[test]
fn test_non_elements_skip_element_setters() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<p>x</p>");
    let p = jamon.get("p")?.first().unwrap();
    let text_node = jamon.document().tree().first_child(p).unwrap();
    let text = jamon.get(text_node)?;

    text.add_class("a")?.set_attr("title", "t")?.set_css("color", "red")?;
    assert_eq!(text.attr("title"), None);

    text.set_text("y")?;
    assert_eq!(jamon.get("p")?.text().as_deref(), Some("y"));
    Ok(())
}

#[test]
fn test_whitespace_only_class_names() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<p class=\"a\">x</p>");
    let p = jamon.get("p")?;

    p.add_class("   ")?.remove_class("\n")?.toggle_class("")?;
    assert_eq!(p.attr("class").as_deref(), Some("a"));
    assert!(!p.has_class("   "));
    Ok(())
}

#[test]
fn test_data_values_keep_their_type() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<p data-count=\"1\">x</p>");
    let p = jamon.get("p")?;

    assert_eq!(p.data("count"), Some(Value::from("1")));
    p.set_data("count", 2)?.set_data("flag", true)?;
    assert_eq!(p.data("count"), Some(Value::from(2)));
    assert_eq!(p.data("flag"), Some(Value::Bool(true)));

    // Copies start without stored data
    let copy = p.clone_nodes(false)?;
    assert_eq!(copy.data("flag"), None);
    assert_eq!(copy.data("count"), Some(Value::from("1")));
    Ok(())
}

#[test]
fn test_listeners_not_cloned() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<button>x</button>");
    let button = jamon.get("button")?;
    let hits = Rc::new(Cell::new(0));

    let count = Rc::clone(&hits);
    button.on("click", &Listener::new(move |_: &Collection, _: &mut Event| count.set(count.get() + 1)))?;

    let copy = button.clone_nodes(true)?;
    copy.append_to("body")?;
    copy.trigger("click", None)?;
    assert_eq!(hits.get(), 0);

    button.trigger("click", None)?;
    assert_eq!(hits.get(), 1);
    Ok(())
}

#[test]
fn test_hidden_class_change_applies_to_later_calls() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<p>x</p>");
    let p = jamon.get("p")?;

    p.hide()?;
    jamon.set_hidden_class_name("invisible")?;
    p.hide()?;
    assert_eq!(p.attr("class").as_deref(), Some("hidden invisible"));

    p.show()?;
    assert_eq!(p.attr("class").as_deref(), Some("hidden"));
    assert!(jamon.set_hidden_class_name("two words").is_err());
    Ok(())
}

#[test]
fn test_clones_of_jamon_share_state() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<p>x</p>");
    let other = jamon.clone();

    other.set_hidden_class_name("gone")?;
    jamon.get("p")?.hide()?;
    assert!(other.get("p")?.has_class("gone"));
    assert!(jamon.same(&other));
    Ok(())
}
