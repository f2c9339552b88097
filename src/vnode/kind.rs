//! Node kinds: host tag, component, fragment, text.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::rc::Rc;

use super::element::{Props, VNode};
use crate::hooks::Hooks;

type RenderFn = dyn Fn(&mut Hooks<'_>, &Props) -> Option<VNode>;
type RenderFnPtr = fn(&mut Hooks<'_>, &Props) -> Option<VNode>;

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// How two components are told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Identity {
    /// `fn` items and closures: every expression has its own type.
    Type(TypeId),
    /// Function pointers share one type, so compare addresses.
    Address(usize),
    /// Boxed trait objects: only clones of the same `Component` match.
    Allocation,
}

/// A function component.
///
/// A `fn` item or a closure expression keeps the same identity across
/// renders, so its fiber (and its state cells) are reused when it reappears
/// at the same position. Function pointers are identified by address. A
/// boxed `dyn Fn` has no stable identity of its own: clone one `Component`
/// and render the clones to keep its state.
#[derive(Clone)]
pub struct Component {
    identity: Identity,
    name: &'static str,
    render: Rc<RenderFn>,
}

impl Component {
    /// Wrap a render function.
    ///
    /// Returning `None` renders an empty text node.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&mut Hooks<'_>, &Props) -> Option<VNode> + 'static,
    {
        let erased: &dyn Any = &render;
        let identity = if let Some(&f) = erased.downcast_ref::<RenderFnPtr>() {
            Identity::Address(f as usize)
        } else if erased.is::<Box<RenderFn>>() {
            Identity::Allocation
        } else {
            Identity::Type(TypeId::of::<F>())
        };
        Self {
            identity,
            name: type_name::<F>(),
            render: Rc::new(render),
        }
    }

    /// Type name of the render function, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn invoke(&self, hooks: &mut Hooks<'_>, props: &Props) -> Option<VNode> {
        (self.render)(hooks, props)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        match (self.identity, other.identity) {
            (Identity::Allocation, Identity::Allocation) => Rc::ptr_eq(&self.render, &other.render),
            (a, b) => a == b,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// The closed set of virtual node kinds.
///
/// Two kinds are "the same" for reconciliation exactly when they compare
/// equal: same tag, same component type, or both fragment / both text.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Host element identified by its tag name.
    Element(String),
    /// Function component.
    Component(Component),
    /// Grouping node with no host representation.
    Fragment,
    /// Text leaf; the payload lives in the `nodeValue` attribute.
    Text,
}

impl NodeKind {
    /// Whether nodes of this kind own a host node.
    pub fn has_host(&self) -> bool {
        matches!(self, NodeKind::Element(_) | NodeKind::Text)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Element(tag) => f.write_str(tag),
            NodeKind::Component(c) => write!(f, "<{}>", c.name()),
            NodeKind::Fragment => f.write_str("#fragment"),
            NodeKind::Text => f.write_str("#text"),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        NodeKind::Element(tag.to_owned())
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::Element(tag)
    }
}

impl From<Component> for NodeKind {
    fn from(c: Component) -> Self {
        NodeKind::Component(c)
    }
}
