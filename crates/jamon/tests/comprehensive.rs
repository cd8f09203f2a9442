//! Comprehensive tests for jamon
//!
//! Chained operations over parsed pages, as an application would use them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use jamon::dom::DOMRect;
use jamon::{Collection, Config, Event, Jamon, Listener, Position, Value};
use pretty_assertions::assert_eq;

const PAGE: &str = "<body>\
    <nav id=\"menu\"><ul>\
        <li class=\"item active\"><a href=\"/\">Home</a></li>\
        <li class=\"item\"><a href=\"/docs\">Docs</a></li>\
        <li class=\"item\"><a href=\"/blog\">Blog</a></li>\
    </ul></nav>\
    <form id=\"search\"><input name=\"q\" value=\"ham\"><button type=\"submit\">Go</button></form>\
    <section class=\"cards\"><div class=\"card\"></div><div class=\"card\"></div></section>\
    </body>";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("jamon=trace")
        .with_test_writer()
        .try_init();
}

fn texts(collection: &Collection) -> Vec<String> {
    collection.items().filter_map(|item| item.text()).collect()
}

// ============================================================================
// SELECTION AND TRAVERSAL
// ============================================================================

#[test]
fn test_find_all_example_scenario() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<div id=\"a\"><span class=\"b\"></span></div>");
    let a = jamon.get("#a")?;

    let found = a.find_all(".b")?;
    assert_eq!(found.len(), 1);
    assert_eq!(jamon.document().local_name(found.first().unwrap()), Some("span"));
    assert!(a.find_all("#a")?.is_empty());
    Ok(())
}

#[test]
fn test_find_all_direct_children() -> anyhow::Result<()> {
    let jamon = Jamon::parse(
        "<div id=\"id1\"><p class=\"c\"></p><div><p class=\"c\"></p></div><p class=\"c\"></p></div>\
         <section><div class=\"d\"></div><div class=\"d\"><div></div></div></section>",
    );

    let el = jamon.get("#id1")?;
    let children = el.find_all("> .c")?;
    assert_eq!(children.len(), 2);
    assert_eq!(children.parent().first(), el.first());
    assert_eq!(el.attr("id").as_deref(), Some("id1"));

    let section = jamon.get("section")?;
    let divs = section.find_all("> div")?;
    assert_eq!(divs.len(), 2);
    assert!(divs.iter().all(|div| jamon.get(div).unwrap().has_class("d")));
    assert_eq!(section.attr("id"), None);
    Ok(())
}

#[test]
fn test_create_anchor_scenario() -> anyhow::Result<()> {
    let jamon = Jamon::default();
    let link = jamon.create("a", [("href", "http://example.com")])?;

    assert_eq!(link.len(), 1);
    assert_eq!(jamon.document().local_name(link.first().unwrap()), Some("a"));
    assert_eq!(link.attr("href").as_deref(), Some("http://example.com"));
    assert_eq!(link.prop("href"), Some(Value::from("http://example.com")));
    Ok(())
}

#[test]
fn test_menu_traversal() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let menu = jamon.get("#menu")?;

    let links = menu.find_all("li > a")?;
    assert_eq!(texts(&links), vec!["Home", "Docs", "Blog"]);

    let active = menu.find_one(".active a")?;
    assert_eq!(active.attr("href").as_deref(), Some("/"));

    let items = links.closest("li")?;
    assert_eq!(items.len(), 3);
    assert_eq!(items.parent().len(), 1);
    assert_eq!(items.parent().children(), items);
    assert_eq!(links.closest("nav")?, menu);
    Ok(())
}

#[test]
fn test_find_across_collections() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let sections = jamon.get_all("nav, form, section")?;

    assert_eq!(sections.find_all("input, a")?.len(), 4);
    assert_eq!(sections.find_one("input")?.attr("name").as_deref(), Some("q"));
    assert!(sections.find_all("nav")?.is_empty());
    Ok(())
}

// ============================================================================
// MUTATION
// ============================================================================

#[test]
fn test_class_chain() -> anyhow::Result<()> {
    init_tracing();
    let jamon = Jamon::parse(PAGE);
    let items = jamon.get_all(".item")?;

    items.remove_class("active")?.add_class("entry entry")?.toggle_class("item")?;
    assert_eq!(jamon.get_all(".entry")?.len(), 3);
    assert!(jamon.get_all(".item, .active")?.is_empty());
    assert_eq!(items.attr("class").as_deref(), Some("entry"));
    Ok(())
}

#[test]
fn test_visibility_with_custom_config() -> anyhow::Result<()> {
    let config = Config::with_hidden_class_name("is-hidden")?;
    let jamon = Jamon::with_config(jamon::Document::parse_html(PAGE), config)?;
    let cards = jamon.get_all(".card")?;

    cards.hide()?;
    assert_eq!(jamon.get_all(".is-hidden")?.len(), 2);
    cards.show()?;
    assert!(jamon.get_all(".is-hidden")?.is_empty());
    Ok(())
}

#[test]
fn test_accessor_round_trips() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let cards = jamon.get_all(".card")?;

    cards.set_attr("role", "listitem")?;
    cards.set_data("index", 3)?;
    cards.set_css("zIndex", 2)?.set_css("marginLeft", 12)?;
    cards.set_prop("hidden", true)?;

    assert_eq!(cards.attr("role").as_deref(), Some("listitem"));
    assert_eq!(cards.data("index"), Some(Value::from(3)));
    assert_eq!(cards.css("z-index").as_deref(), Some("2"));
    assert_eq!(cards.css("marginLeft").as_deref(), Some("12px"));
    assert_eq!(cards.prop("hidden"), Some(Value::Bool(true)));
    assert!(cards.attr("hidden").is_some());

    cards.set_attr("role", Value::Null)?;
    cards.set_data("index", Value::Null)?;
    cards.set_prop("hidden", Value::Null)?;
    assert_eq!(cards.attr("role"), None);
    assert_eq!(cards.data("index"), None);
    assert!(cards.attr("hidden").is_none());
    Ok(())
}

#[test]
fn test_form_values() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let input = jamon.get("[name=q]")?;

    assert_eq!(input.val().as_deref(), Some("ham"));
    input.set_val("jamón ibérico")?;
    assert_eq!(input.val().as_deref(), Some("jamón ibérico"));
    assert_eq!(input.attr("value").as_deref(), Some("ham"));
    Ok(())
}

#[test]
fn test_insertion_clones_for_all_but_last_target() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let badge = jamon.create("span", [("className", "badge"), ("textContent", "new")])?;
    let original = badge.first().unwrap();
    let cards = jamon.get_all(".card")?;

    let returned = cards.append(&badge)?;
    assert_eq!(returned, cards);

    let badges = jamon.get_all(".badge")?;
    assert_eq!(badges.len(), 2);
    assert_eq!(badges.node(1), Some(original));
    assert_ne!(badges.node(0), Some(original));
    assert_eq!(texts(&badges), vec!["new", "new"]);
    Ok(())
}

#[test]
fn test_insert_variants_return_receiver() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let list = jamon.get("#menu ul")?;

    let first = jamon.create("li", [("textContent", "Start")])?;
    assert_eq!(first.prepend_to(&list)?, first);

    let last = jamon.create("li", [("textContent", "End")])?;
    assert_eq!(last.insert_after("#menu li:last-child")?, last);

    let items = jamon.get_all("#menu li")?;
    assert_eq!(texts(&items), vec!["Start", "Home", "Docs", "Blog", "End"]);
    Ok(())
}

#[test]
fn test_text_insertion_is_normalized() -> anyhow::Result<()> {
    let jamon = Jamon::parse("<p>b</p>");
    let p = jamon.get("p")?;

    p.prepend("a")?.append("c")?;
    let node = p.first().unwrap();
    assert_eq!(jamon.document().tree().children(node).count(), 1);
    assert_eq!(p.text().as_deref(), Some("abc"));

    let b = jamon.create("b", [("textContent", "!")])?;
    p.append(&b)?;
    b.remove()?;
    assert_eq!(jamon.document().tree().children(node).count(), 1);
    Ok(())
}

#[test]
fn test_clone_and_replace() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let card = jamon.get(".card")?;
    card.set_attr("data-kind", "x")?;

    let copy = card.clone_nodes(true)?;
    assert_eq!(copy.attr("data-kind").as_deref(), Some("x"));
    copy.replace(".card:last-child")?;

    let cards = jamon.get_all(".card")?;
    assert_eq!(cards.len(), 2);
    assert_eq!(cards.node(1), copy.first());
    Ok(())
}

// ============================================================================
// EVENTS
// ============================================================================

#[test]
fn test_delegated_listener_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let jamon = Jamon::parse(PAGE);
    let menu = jamon.get("#menu")?;
    let clicked = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&clicked);
    let listener = Listener::new(move |this: &Collection, event: &mut Event| {
        log.borrow_mut().push(this.attr("href").unwrap_or_default());
        event.prevent_default();
    });

    menu.on_delegated("click", "a", &listener)?;
    jamon.get_all("a")?.trigger("click", None)?;
    assert_eq!(*clicked.borrow(), vec!["/", "/docs", "/blog"]);

    menu.off_delegated("click", "a", &listener)?;
    jamon.get_all("a")?.trigger("click", None)?;
    assert_eq!(clicked.borrow().len(), 3);
    assert_eq!(jamon.document().listener_count(menu.first().unwrap(), "click"), 0);
    Ok(())
}

#[test]
fn test_repeated_registration_single_invocation() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let form = jamon.get("#search")?;
    let submits = Rc::new(Cell::new(0));

    let count = Rc::clone(&submits);
    let listener = Listener::new(move |_: &Collection, _: &mut Event| count.set(count.get() + 1));

    form.on_delegated("submit", "form", &listener)?;
    form.on_delegated("submit", "form", &listener)?;
    form.on("submit", &listener)?.on("submit", &listener)?;
    form.trigger("submit", None)?;
    assert_eq!(submits.get(), 2);
    Ok(())
}

#[test]
fn test_trigger_with_detail() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    let details = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&details);
    let listener = Listener::new(move |_: &Collection, event: &mut Event| {
        log.borrow_mut().push(event.detail().cloned());
    });

    jamon.get("body")?.on("card:open", &listener)?;
    jamon.get_all(".card")?.trigger("card:open", Some(Value::from("first")))?;
    assert_eq!(
        *details.borrow(),
        vec![Some(Value::from("first")), Some(Value::from("first"))]
    );
    Ok(())
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[test]
fn test_position_round_trip() -> anyhow::Result<()> {
    let jamon = Jamon::parse(PAGE);
    {
        let mut doc = jamon.document_mut();
        let body = doc.body().unwrap();
        doc.set_layout_box(body, DOMRect::from_xywh(8.0, 8.0, 784.0, 600.0))?;
    }
    let cards = jamon.get_all(".card")?;
    {
        let mut doc = jamon.document_mut();
        for (i, card) in cards.iter().enumerate() {
            doc.set_layout_box(card, DOMRect::from_xywh(8.0, 120.0 + 50.0 * i as f64, 784.0, 50.0))?;
        }
    }

    for target in [Position::new(30.5, 40.25), Position::new(-12.0, 300.0)] {
        for card in cards.items() {
            card.set_position(target.left, target.top)?;
            let position = card.position().unwrap();
            assert!((position.left - target.left).abs() < 1e-9);
            assert!((position.top - target.top).abs() < 1e-9);
        }
    }
    assert_eq!(cards.width(), Some(784.0));
    assert_eq!(cards.height(), Some(50.0));
    Ok(())
}

#[test]
fn test_config_serde_round_trip() -> anyhow::Result<()> {
    let config: Config = serde_json::from_str(r#"{"hiddenClassName": "d-none"}"#)?;
    assert_eq!(config.hidden_class_name, "d-none");
    assert_eq!(serde_json::to_string(&config)?, r#"{"hiddenClassName":"d-none"}"#);

    let defaults: Config = serde_json::from_str("{}")?;
    assert_eq!(defaults, Config::default());

    let position: Position = serde_json::from_str(r#"{"left": 1.5, "top": 2}"#)?;
    assert_eq!(position, Position::new(1.5, 2.0));
    Ok(())
}
