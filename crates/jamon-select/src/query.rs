//! Element Query
//!
//! querySelector, querySelectorAll, matches and closest.

use jamon_dom::{Document, NodeId};

use crate::{SelectorList, SelectorResult};

/// Element query trait
pub trait ElementQuery {
    /// First descendant of `root` matching the selector
    fn query_selector(&self, root: NodeId, selector: &str) -> SelectorResult<Option<NodeId>>;

    /// All descendants of `root` matching the selector, in document order
    fn query_selector_all(&self, root: NodeId, selector: &str) -> SelectorResult<Vec<NodeId>>;

    /// Check if element matches selector
    fn matches(&self, element: NodeId, selector: &str) -> SelectorResult<bool>;

    /// Find the element itself or its closest ancestor matching selector
    fn closest(&self, element: NodeId, selector: &str) -> SelectorResult<Option<NodeId>>;
}

impl SelectorList {
    /// Matching descendants of `root`, in document order
    ///
    /// The selector is evaluated against the whole tree, so `div p` finds a
    /// `p` under `root` even when the `div` is an ancestor of `root`.
    pub fn query_all(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
        doc.tree()
            .descendants(root)
            .filter(|&id| self.matches(doc, id))
            .collect()
    }

    /// First matching descendant of `root`
    pub fn query_first(&self, doc: &Document, root: NodeId) -> Option<NodeId> {
        doc.tree().descendants(root).find(|&id| self.matches(doc, id))
    }
}

impl ElementQuery for Document {
    fn query_selector(&self, root: NodeId, selector: &str) -> SelectorResult<Option<NodeId>> {
        Ok(SelectorList::parse(selector)?.query_first(self, root))
    }

    fn query_selector_all(&self, root: NodeId, selector: &str) -> SelectorResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let found = list.query_all(self, root);
        tracing::trace!("'{}' under {} matched {} elements", selector, root, found.len());
        Ok(found)
    }

    fn matches(&self, element: NodeId, selector: &str) -> SelectorResult<bool> {
        Ok(SelectorList::parse(selector)?.matches(self, element))
    }

    fn closest(&self, element: NodeId, selector: &str) -> SelectorResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        if !self.tree().is_element(element) {
            return Ok(None);
        }

        let found = std::iter::once(element)
            .chain(self.tree().ancestors(element))
            .take_while(|&id| self.tree().is_element(id))
            .find(|&id| list.matches(self, id));
        Ok(found)
    }
}
