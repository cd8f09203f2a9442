//! Selector matching
//!
//! Complex selectors match right to left: the last compound is tested
//! against the candidate, then combinators walk towards the root, trying
//! every ancestor or sibling that could continue the chain.

use jamon_dom::{Document, DomTree, ElementData, NodeId};

use crate::selectors::{
    Combinator, ComplexSelector, CompoundSelector, NthExpression, PseudoClass, SelectorComponent,
    SelectorList,
};

impl SelectorList {
    /// Check if an element matches any selector in the list
    pub fn matches(&self, doc: &Document, element: NodeId) -> bool {
        doc.tree().is_element(element) && self.selectors.iter().any(|s| s.matches(doc, element))
    }
}

impl ComplexSelector {
    /// Check if an element matches this selector
    pub fn matches(&self, doc: &Document, element: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => match_from(doc, self, n - 1, element),
        }
    }
}

fn match_from(doc: &Document, selector: &ComplexSelector, index: usize, element: NodeId) -> bool {
    if !compound_matches(doc, &selector.compounds[index], element) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let tree = doc.tree();
    let next = index - 1;
    match selector.combinators[next] {
        Combinator::Descendant => {
            let mut current = tree.parent_element(element);
            while let Some(ancestor) = current {
                if match_from(doc, selector, next, ancestor) {
                    return true;
                }
                current = tree.parent_element(ancestor);
            }
            false
        }
        Combinator::Child => tree
            .parent_element(element)
            .is_some_and(|parent| match_from(doc, selector, next, parent)),
        Combinator::NextSibling => previous_element(tree, element)
            .is_some_and(|sibling| match_from(doc, selector, next, sibling)),
        Combinator::SubsequentSibling => {
            let mut current = previous_element(tree, element);
            while let Some(sibling) = current {
                if match_from(doc, selector, next, sibling) {
                    return true;
                }
                current = previous_element(tree, sibling);
            }
            false
        }
    }
}

fn compound_matches(doc: &Document, compound: &CompoundSelector, element: NodeId) -> bool {
    let Some(elem) = doc.tree().element(element) else {
        return false;
    };
    compound
        .components
        .iter()
        .all(|component| component_matches(doc, component, element, elem))
}

fn component_matches(doc: &Document, component: &SelectorComponent, element: NodeId, elem: &ElementData) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => elem.tag == *tag,
        SelectorComponent::Id(id) => elem.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => elem
            .get_attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class)),
        SelectorComponent::Attribute(attr) => attr.matches(elem.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => pseudo_class_matches(doc, pseudo, element, elem),
        SelectorComponent::PseudoElement(_) => false,
    }
}

fn pseudo_class_matches(doc: &Document, pseudo: &PseudoClass, element: NodeId, elem: &ElementData) -> bool {
    let tree = doc.tree();
    match pseudo {
        PseudoClass::Link => matches!(elem.tag.as_str(), "a" | "area") && elem.has_attr("href"),
        PseudoClass::Enabled => is_disableable(elem) && !elem.has_attr("disabled"),
        PseudoClass::Disabled => is_disableable(elem) && elem.has_attr("disabled"),
        PseudoClass::Checked => match elem.tag.as_str() {
            "input" => {
                let kind = elem.get_attr("type").unwrap_or_default();
                (kind.eq_ignore_ascii_case("checkbox") || kind.eq_ignore_ascii_case("radio"))
                    && elem.has_attr("checked")
            }
            "option" => elem.has_attr("selected"),
            _ => false,
        },
        PseudoClass::Required => is_requirable(elem) && elem.has_attr("required"),
        PseudoClass::Optional => is_requirable(elem) && !elem.has_attr("required"),

        PseudoClass::Root => tree.parent(element) == Some(tree.root()),
        PseudoClass::Empty => tree
            .children(element)
            .all(|(_, child)| !child.is_element() && child.as_text().is_none_or(str::is_empty)),
        PseudoClass::FirstChild => previous_element(tree, element).is_none(),
        PseudoClass::LastChild => next_element(tree, element).is_none(),
        PseudoClass::OnlyChild => {
            previous_element(tree, element).is_none() && next_element(tree, element).is_none()
        }
        PseudoClass::FirstOfType => nth_position(tree, element, false, true) == 1,
        PseudoClass::LastOfType => nth_position(tree, element, true, true) == 1,
        PseudoClass::OnlyOfType => {
            nth_position(tree, element, false, true) == 1 && nth_position(tree, element, true, true) == 1
        }
        PseudoClass::NthChild(expr) => nth_matches(expr, nth_position(tree, element, false, false)),
        PseudoClass::NthLastChild(expr) => nth_matches(expr, nth_position(tree, element, true, false)),
        PseudoClass::NthOfType(expr) => nth_matches(expr, nth_position(tree, element, false, true)),
        PseudoClass::NthLastOfType(expr) => nth_matches(expr, nth_position(tree, element, true, true)),

        PseudoClass::Not(list) => !list.matches(doc, element),
        PseudoClass::Is(list) | PseudoClass::Where(list) => list.matches(doc, element),
    }
}

fn nth_matches(expr: &NthExpression, position: usize) -> bool {
    i32::try_from(position).is_ok_and(|n| expr.matches(n))
}

/// 1-based position among element siblings, counted from the end when
/// `from_end`, only counting siblings with the same tag when `of_type`
fn nth_position(tree: &DomTree, element: NodeId, from_end: bool, of_type: bool) -> usize {
    let tag = tree.element(element).map(|e| e.tag.as_str());
    let step = |id| {
        if from_end {
            next_element(tree, id)
        } else {
            previous_element(tree, id)
        }
    };

    let mut position = 1;
    let mut current = step(element);
    while let Some(sibling) = current {
        if !of_type || tree.element(sibling).map(|e| e.tag.as_str()) == tag {
            position += 1;
        }
        current = step(sibling);
    }
    position
}

fn previous_element(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut current = tree.prev_sibling(node);
    while let Some(id) = current {
        if tree.is_element(id) {
            return Some(id);
        }
        current = tree.prev_sibling(id);
    }
    None
}

fn next_element(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut current = tree.next_sibling(node);
    while let Some(id) = current {
        if tree.is_element(id) {
            return Some(id);
        }
        current = tree.next_sibling(id);
    }
    None
}

fn is_disableable(elem: &ElementData) -> bool {
    matches!(
        elem.tag.as_str(),
        "button" | "input" | "select" | "textarea" | "optgroup" | "option" | "fieldset"
    )
}

fn is_requirable(elem: &ElementData) -> bool {
    matches!(elem.tag.as_str(), "input" | "select" | "textarea")
}
