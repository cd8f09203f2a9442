//! Event listeners, delegation and triggering
//!
//! A [`Listener`] carries a numeric id that stands for its identity. Plain
//! registrations use that id as the document listener handle. Delegated
//! registrations go through a proxy that is created once per
//! (listener, selector) pair and kept in the `Jamon`'s [`EventRegistry`],
//! so presenting the same pair to `off_delegated` finds the exact proxy
//! that was attached.

use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use jamon_dom::events::{dispatch_event, Callback};
use jamon_dom::{Event, ListenerHandle, NodeId, Value};
use jamon_select::SelectorList;

use crate::context::Inner;
use crate::{Collection, Error, Jamon, Result};

/// Listener and proxy ids
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A user event listener
///
/// Clones share the id, so a clone removes what the original registered.
/// The callback receives the node the listener runs for as a one-node
/// collection: the node it is attached to, or the matched node when
/// delegated.
#[derive(Clone)]
pub struct Listener {
    id: u64,
    callback: Rc<dyn Fn(&Collection, &mut Event)>,
}

impl Listener {
    /// Wrap a callback
    ///
    /// A callback that captures a `Collection` (or `Jamon`) keeps the whole
    /// document alive while it stays registered, since the registry owns
    /// the callback. Call `off` to break the cycle, or capture node ids and
    /// look them up through the receiver instead.
    pub fn new(callback: impl Fn(&Collection, &mut Event) + 'static) -> Self {
        Self {
            id: next_id(),
            callback: Rc::new(callback),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    fn call(&self, receiver: &Collection, event: &mut Event) {
        (self.callback)(receiver, event)
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Delegation proxy attached in place of a user listener
#[derive(Clone)]
struct Proxy {
    handle: ListenerHandle,
    callback: Callback,
}

/// Per-`Jamon` listener bookkeeping
#[derive(Default)]
pub(crate) struct EventRegistry {
    /// (listener id, selector) -> proxy
    proxies: HashMap<(u64, String), Proxy>,
    /// node -> "type|selector" -> attached handles
    groups: HashMap<NodeId, HashMap<String, HashSet<ListenerHandle>>>,
}

impl EventRegistry {
    /// Record a handle in its group; false if it was already there
    fn join(&mut self, node: NodeId, key: &str, handle: ListenerHandle) -> bool {
        self.groups
            .entry(node)
            .or_default()
            .entry(key.to_string())
            .or_default()
            .insert(handle)
    }

    /// Drop a handle from its group; false if it was not there
    fn leave(&mut self, node: NodeId, key: &str, handle: ListenerHandle) -> bool {
        let Some(groups) = self.groups.get_mut(&node) else {
            return false;
        };
        let removed = groups.get_mut(key).is_some_and(|group| group.remove(&handle));
        groups.retain(|_, group| !group.is_empty());
        if groups.is_empty() {
            self.groups.remove(&node);
        }
        removed
    }

    /// Number of proxies created so far
    pub(crate) fn proxy_count(&self) -> usize {
        self.proxies.len()
    }
}

/// `type|selector` group key; plain listeners use an empty selector
fn event_key(event_type: &str, selector: Option<&str>) -> String {
    format!("{}|{}", event_type, selector.unwrap_or_default())
}

/// Whitespace-separated event types, de-duplicated
fn event_types(events: &str) -> Result<Vec<&str>> {
    let mut types = Vec::new();
    for ty in events.split_whitespace() {
        if !types.contains(&ty) {
            types.push(ty);
        }
    }
    if types.is_empty() {
        return Err(Error::Argument("event type"));
    }
    Ok(types)
}

/// Receiver collection for a listener running on `node`
fn receiver(inner: &Weak<Inner>, node: NodeId) -> Option<Collection> {
    let inner = inner.upgrade()?;
    Some(Jamon { inner }.collection(vec![node]))
}

fn plain_callback(jamon: &Jamon, listener: &Listener) -> Callback {
    let inner = Rc::downgrade(&jamon.inner);
    let listener = listener.clone();
    Rc::new(move |event: &mut Event| {
        let Some(node) = event.current_target() else {
            return;
        };
        if let Some(this) = receiver(&inner, node) {
            listener.call(&this, event);
        }
    })
}

fn delegated_callback(jamon: &Jamon, listener: &Listener, selector: SelectorList) -> Callback {
    let inner = Rc::downgrade(&jamon.inner);
    let listener = listener.clone();
    Rc::new(move |event: &mut Event| {
        let Some(target) = event.target() else {
            return;
        };
        let Some(this) = receiver(&inner, target) else {
            return;
        };
        // Release the document before the listener runs
        let matched = selector.matches(&this.jamon().document(), target);
        if matched {
            listener.call(&this, event);
        }
    })
}

impl Collection {
    /// Attach a listener to every node for each whitespace-separated type
    ///
    /// Attaching the same listener twice for a type is a no-op.
    pub fn on(&self, events: &str, listener: &Listener) -> Result<Collection> {
        let handle = ListenerHandle(listener.id());
        let callback = plain_callback(self.jamon(), listener);
        self.attach(events, None, handle, &callback)
    }

    /// Detach a listener attached with [`on`](Self::on)
    pub fn off(&self, events: &str, listener: &Listener) -> Result<Collection> {
        self.detach(events, None, ListenerHandle(listener.id()))
    }

    /// Attach a listener that only runs for events whose target matches `selector`
    ///
    /// The listener receives the matched target. The selector is checked
    /// when the event is dispatched, so later descendants are covered too.
    pub fn on_delegated(&self, events: &str, selector: &str, listener: &Listener) -> Result<Collection> {
        let proxy = self.proxy(selector, listener)?;
        self.attach(events, Some(selector), proxy.handle, &proxy.callback)
    }

    /// Detach a listener attached with [`on_delegated`](Self::on_delegated)
    pub fn off_delegated(&self, events: &str, selector: &str, listener: &Listener) -> Result<Collection> {
        let key = (listener.id(), selector.to_string());
        let handle = self.jamon().inner.events.borrow().proxies.get(&key).map(|proxy| proxy.handle);
        match handle {
            Some(handle) => self.detach(events, Some(selector), handle),
            None => {
                event_types(events)?;
                Ok(self.clone())
            }
        }
    }

    /// Dispatch an event on every node
    ///
    /// Bubbling and cancelation follow the event's family; a `detail`
    /// makes it a custom event regardless of its name.
    pub fn trigger(&self, event_type: &str, detail: Option<Value>) -> Result<Collection> {
        if event_type.trim().is_empty() {
            return Err(Error::Argument("event type"));
        }

        for node in self {
            let mut event = match &detail {
                Some(detail) => Event::custom(event_type, Some(detail.clone())),
                None => Event::from_name(event_type),
            };
            tracing::trace!("Triggering {} on {}", event_type, node);
            dispatch_event(&self.jamon().inner.document, node, &mut event)?;
        }
        Ok(self.clone())
    }

    /// The proxy for (listener, selector), created on first use
    fn proxy(&self, selector: &str, listener: &Listener) -> Result<Proxy> {
        let key = (listener.id(), selector.to_string());
        if let Some(proxy) = self.jamon().inner.events.borrow().proxies.get(&key) {
            return Ok(proxy.clone());
        }

        let parsed = SelectorList::parse(selector)?;
        let proxy = Proxy {
            handle: ListenerHandle(next_id()),
            callback: delegated_callback(self.jamon(), listener, parsed),
        };
        tracing::debug!("Created proxy {:?} for listener {} on '{}'", proxy.handle, listener.id(), selector);
        self.jamon().inner.events.borrow_mut().proxies.insert(key, proxy.clone());
        Ok(proxy)
    }

    fn attach(&self, events: &str, selector: Option<&str>, handle: ListenerHandle, callback: &Callback) -> Result<Collection> {
        let types = event_types(events)?;
        let mut registry = self.jamon().inner.events.borrow_mut();
        let mut doc = self.jamon().document_mut();

        for ty in types {
            let key = event_key(ty, selector);
            for node in self {
                if registry.join(node, &key, handle) {
                    doc.add_event_listener(node, ty, handle, Rc::clone(callback))?;
                }
            }
        }

        tracing::debug!("Listener {:?} attached for '{}' on {} node(s)", handle, events, self.len());
        Ok(self.clone())
    }

    fn detach(&self, events: &str, selector: Option<&str>, handle: ListenerHandle) -> Result<Collection> {
        let types = event_types(events)?;
        let mut registry = self.jamon().inner.events.borrow_mut();
        let mut doc = self.jamon().document_mut();

        for ty in types {
            let key = event_key(ty, selector);
            for node in self {
                if registry.leave(node, &key, handle) {
                    doc.remove_event_listener(node, ty, handle);
                }
            }
        }

        tracing::debug!("Listener {:?} detached for '{}' from {} node(s)", handle, events, self.len());
        Ok(self.clone())
    }
}
