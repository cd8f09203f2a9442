//! DOM Events
//!
//! Event classification, listener registration per node and synchronous
//! dispatch with bubbling. There is no capture phase.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Document, DomResult, NodeId, Value};

/// Known event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    DblClick,
    ContextMenu,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseEnter,
    MouseLeave,
    MouseOver,
    MouseOut,
    KeyDown,
    KeyUp,
    KeyPress,
    Input,
    Change,
    Submit,
    Reset,
    Select,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    TouchStart,
    TouchEnd,
    TouchMove,
    TouchCancel,
    PointerDown,
    PointerUp,
    PointerMove,
    PointerOver,
    PointerOut,
    PointerEnter,
    PointerLeave,
    PointerCancel,
}

impl EventType {
    /// Look up an event type by its DOM name
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "click" => EventType::Click,
            "dblclick" => EventType::DblClick,
            "contextmenu" => EventType::ContextMenu,
            "mousedown" => EventType::MouseDown,
            "mouseup" => EventType::MouseUp,
            "mousemove" => EventType::MouseMove,
            "mouseenter" => EventType::MouseEnter,
            "mouseleave" => EventType::MouseLeave,
            "mouseover" => EventType::MouseOver,
            "mouseout" => EventType::MouseOut,
            "keydown" => EventType::KeyDown,
            "keyup" => EventType::KeyUp,
            "keypress" => EventType::KeyPress,
            "input" => EventType::Input,
            "change" => EventType::Change,
            "submit" => EventType::Submit,
            "reset" => EventType::Reset,
            "select" => EventType::Select,
            "focus" => EventType::Focus,
            "blur" => EventType::Blur,
            "focusin" => EventType::FocusIn,
            "focusout" => EventType::FocusOut,
            "touchstart" => EventType::TouchStart,
            "touchend" => EventType::TouchEnd,
            "touchmove" => EventType::TouchMove,
            "touchcancel" => EventType::TouchCancel,
            "pointerdown" => EventType::PointerDown,
            "pointerup" => EventType::PointerUp,
            "pointermove" => EventType::PointerMove,
            "pointerover" => EventType::PointerOver,
            "pointerout" => EventType::PointerOut,
            "pointerenter" => EventType::PointerEnter,
            "pointerleave" => EventType::PointerLeave,
            "pointercancel" => EventType::PointerCancel,
            _ => return None,
        };
        Some(ty)
    }

    /// Interface family used to construct this event
    pub fn family(&self) -> EventFamily {
        use EventType::*;
        match self {
            Click | DblClick | ContextMenu | MouseDown | MouseUp | MouseMove | MouseEnter
            | MouseLeave | MouseOver | MouseOut => EventFamily::Mouse,
            KeyDown | KeyUp | KeyPress => EventFamily::Keyboard,
            Input | Change | Submit | Reset | Select => EventFamily::Event,
            Focus | Blur | FocusIn | FocusOut => EventFamily::Focus,
            TouchStart | TouchEnd | TouchMove | TouchCancel => EventFamily::Touch,
            PointerDown | PointerUp | PointerMove | PointerOver | PointerOut | PointerEnter
            | PointerLeave | PointerCancel => EventFamily::Pointer,
        }
    }

    /// Check if this event type can bubble
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            EventType::Focus
                | EventType::Blur
                | EventType::MouseEnter
                | EventType::MouseLeave
                | EventType::PointerEnter
                | EventType::PointerLeave
        )
    }

    /// Check if this event type can be canceled
    pub fn cancelable(&self) -> bool {
        !matches!(
            self,
            EventType::Focus
                | EventType::Blur
                | EventType::FocusIn
                | EventType::FocusOut
                | EventType::MouseEnter
                | EventType::MouseLeave
                | EventType::TouchCancel
                | EventType::PointerEnter
                | EventType::PointerLeave
                | EventType::PointerCancel
        )
    }
}

/// Event interface family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFamily {
    /// Plain `Event` (form events)
    Event,
    /// `CustomEvent`, for unknown names or when a detail is attached
    Custom,
    Mouse,
    Focus,
    Keyboard,
    Touch,
    Pointer,
}

/// Event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None = 0,
    AtTarget = 2,
    Bubbling = 3,
}

/// A dispatched (or about to be dispatched) event
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    family: EventFamily,
    bubbles: bool,
    cancelable: bool,
    detail: Option<Value>,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Plain event with explicit flags
    pub fn new(event_type: &str, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type: event_type.to_string(),
            family: EventFamily::Event,
            bubbles,
            cancelable,
            detail: None,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Event whose family and flags are inferred from its name
    ///
    /// Unknown names become bubbling, cancelable custom events.
    pub fn from_name(event_type: &str) -> Self {
        match EventType::from_name(event_type) {
            Some(ty) => {
                let mut event = Self::new(event_type, ty.bubbles(), ty.cancelable());
                event.family = ty.family();
                event
            }
            None => Self::custom(event_type, None),
        }
    }

    /// Bubbling, cancelable custom event carrying an optional detail
    pub fn custom(event_type: &str, detail: Option<Value>) -> Self {
        let mut event = Self::new(event_type, true, true);
        event.family = EventFamily::Custom;
        event.detail = detail;
        event
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn family(&self) -> EventFamily {
        self.family
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// `CustomEvent.detail`
    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    /// Node the event was dispatched to
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Node whose listeners are running
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Cancel the default action; ignored for non-cancelable events
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop after the listeners of the current node
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop before the next listener
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Listener identity, chosen by the registering code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(pub u64);

/// Listener callback
pub type Callback = Rc<dyn Fn(&mut Event)>;

/// A listener attached to a node
#[derive(Clone)]
pub(crate) struct RegisteredListener {
    event_type: String,
    handle: ListenerHandle,
    callback: Callback,
}

impl Document {
    /// `addEventListener`; returns false if (type, handle) is already registered
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        handle: ListenerHandle,
        callback: Callback,
    ) -> DomResult<bool> {
        self.tree.node(node)?;
        let listeners = self.listeners.entry(node).or_default();
        if listeners.iter().any(|l| l.event_type == event_type && l.handle == handle) {
            return Ok(false);
        }

        tracing::trace!("Adding {} listener {:?} to {}", event_type, handle, node);
        listeners.push(RegisteredListener {
            event_type: event_type.to_string(),
            handle,
            callback,
        });
        Ok(true)
    }

    /// `removeEventListener`; returns true if a listener was removed
    pub fn remove_event_listener(&mut self, node: NodeId, event_type: &str, handle: ListenerHandle) -> bool {
        let Some(listeners) = self.listeners.get_mut(&node) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|l| !(l.event_type == event_type && l.handle == handle));
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.listeners.remove(&node);
        }
        if removed {
            tracing::trace!("Removed {} listener {:?} from {}", event_type, handle, node);
        }
        removed
    }

    /// Check if a (type, handle) listener is registered on a node
    pub fn has_event_listener(&self, node: NodeId, event_type: &str, handle: ListenerHandle) -> bool {
        self.listeners
            .get(&node)
            .is_some_and(|list| list.iter().any(|l| l.event_type == event_type && l.handle == handle))
    }

    /// Number of listeners of a type on a node
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners
            .get(&node)
            .map_or(0, |list| list.iter().filter(|l| l.event_type == event_type).count())
    }

    fn listeners_for(&self, node: NodeId, event_type: &str) -> Vec<(ListenerHandle, Callback)> {
        self.listeners
            .get(&node)
            .map(|list| {
                list.iter()
                    .filter(|l| l.event_type == event_type)
                    .map(|l| (l.handle, Rc::clone(&l.callback)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `target.dispatchEvent(event)`
///
/// Runs the listeners of the target, then of each ancestor when the event
/// bubbles. The propagation path is fixed before the first listener runs.
/// The document is not borrowed while a listener runs, so listeners may
/// read and mutate it. Returns false if a listener canceled the event.
pub fn dispatch_event(doc: &RefCell<Document>, target: NodeId, event: &mut Event) -> DomResult<bool> {
    let path: Vec<NodeId> = {
        let doc = doc.borrow();
        doc.tree.node(target)?;
        let mut path = vec![target];
        if event.bubbles {
            path.extend(doc.tree.ancestors(target));
        }
        path
    };

    tracing::trace!("Dispatching {} at {}", event.event_type, target);
    event.target = Some(target);
    event.propagation_stopped = false;
    event.immediate_propagation_stopped = false;

    for node in path {
        event.current_target = Some(node);
        event.phase = if node == target {
            EventPhase::AtTarget
        } else {
            EventPhase::Bubbling
        };

        let listeners = doc.borrow().listeners_for(node, &event.event_type);
        for (handle, callback) in listeners {
            // Skip listeners removed by an earlier listener
            if !doc.borrow().has_event_listener(node, &event.event_type, handle) {
                continue;
            }
            callback(event);
            if event.immediate_propagation_stopped {
                break;
            }
        }

        if event.propagation_stopped {
            break;
        }
    }

    event.current_target = None;
    event.phase = EventPhase::None;
    Ok(!event.default_prevented)
}
