//! Attribute values, event handlers, and the ordered attribute map.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Attribute key holding the payload of a text node.
pub const NODE_VALUE: &str = "nodeValue";

/// Ordered attribute map. Iteration follows insertion order.
pub type Attributes = IndexMap<String, AttrValue>;

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An event delivered by the host to an attached listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event name without the `on` prefix (e.g. `"click"`).
    pub name: String,
    /// Optional payload, e.g. the new value of an input.
    pub value: Option<String>,
}

impl Event {
    /// Create an event without a payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Attach a payload (builder).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// EventHandler
// ---------------------------------------------------------------------------

/// A shared event callback.
///
/// Two handlers are equal only if they are the same allocation, so a closure
/// rebuilt on every render always diffs as changed.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

// ---------------------------------------------------------------------------
// AttrValue
// ---------------------------------------------------------------------------

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Event-style attribute. Attached with `add_listener` instead of
    /// `set_attribute`.
    Listener(EventHandler),
}

impl AttrValue {
    /// Whether this value is an event listener.
    pub fn is_listener(&self) -> bool {
        matches!(self, AttrValue::Listener(_))
    }

    /// The string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Build a listener value from a closure.
    pub fn listener(f: impl Fn(&Event) + 'static) -> Self {
        AttrValue::Listener(EventHandler::new(f))
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::Int(n) => write!(f, "{n}"),
            AttrValue::Float(n) => write!(f, "{n}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Listener(_) => f.write_str("<listener>"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Int(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Int(n.into())
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Float(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<EventHandler> for AttrValue {
    fn from(h: EventHandler) -> Self {
        AttrValue::Listener(h)
    }
}

/// Event name for an event-style attribute key: `onClick` -> `click`.
pub fn event_name(key: &str) -> String {
    key.strip_prefix("on").unwrap_or(key).to_ascii_lowercase()
}
