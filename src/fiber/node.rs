//! Fiber types: FiberId, FiberKind, EffectTag, Fiber.

use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use crate::hooks::StateCell;
use crate::vnode::{Attributes, NodeKind, VNode};

new_key_type! {
    /// Handle to a fiber in the arena. Copy, lightweight (u64).
    pub struct FiberId;
}

// ---------------------------------------------------------------------------
// FiberKind
// ---------------------------------------------------------------------------

/// What a fiber stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum FiberKind {
    /// Top of a render pass. Its host handle is the container.
    Root,
    /// Mirrors the kind of the virtual node this fiber was built from.
    Node(NodeKind),
}

impl FiberKind {
    /// Whether a new description of `kind` can reuse this fiber.
    pub fn matches(&self, kind: &NodeKind) -> bool {
        match self {
            FiberKind::Root => false,
            FiberKind::Node(own) => own == kind,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, FiberKind::Root)
    }
}

impl fmt::Display for FiberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiberKind::Root => f.write_str("#root"),
            FiberKind::Node(kind) => kind.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// EffectTag
// ---------------------------------------------------------------------------

/// Host mutation a fiber requires at commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTag {
    #[default]
    None,
    /// New node: attach its host node under the nearest host ancestor.
    Placement,
    /// Same kind at the same position: patch attributes in place.
    Update,
    /// Previous-tree node with no counterpart: detach its host nodes.
    Deletion,
}

// ---------------------------------------------------------------------------
// Fiber
// ---------------------------------------------------------------------------

/// One unit of work and the persistent record for one tree position.
///
/// `parent`, `alternate` are lookups only. The tree shape is `child` (first
/// child) plus the `sibling` chain, so a walk can stop after any fiber and
/// resume from it later.
#[derive(Debug)]
pub struct Fiber<N> {
    pub kind: FiberKind,
    /// Current attributes (the props of this render).
    pub attributes: Rc<Attributes>,
    /// Child descriptions still to be reconciled when this fiber is visited.
    pub children: Rc<Vec<VNode>>,
    pub parent: Option<FiberId>,
    pub child: Option<FiberId>,
    pub sibling: Option<FiberId>,
    /// Host node handle; `None` for components and fragments.
    pub host: Option<N>,
    pub effect: EffectTag,
    /// Same-position fiber in the previously committed tree.
    pub alternate: Option<FiberId>,
    pub(crate) state_cells: Vec<StateCell>,
}

impl<N> Fiber<N> {
    /// A root fiber rendering `element` into `container`.
    pub fn root(container: N, element: VNode, alternate: Option<FiberId>) -> Self {
        Self {
            kind: FiberKind::Root,
            attributes: Rc::new(Attributes::new()),
            children: Rc::new(vec![element]),
            parent: None,
            child: None,
            sibling: None,
            host: Some(container),
            effect: EffectTag::None,
            alternate,
            state_cells: Vec::new(),
        }
    }

    /// A fiber for `node`, placed under `parent`.
    pub fn from_vnode(node: VNode, parent: FiberId, effect: EffectTag) -> Self {
        let (kind, attributes, children) = node.into_parts();
        Self {
            kind: FiberKind::Node(kind),
            attributes,
            children,
            parent: Some(parent),
            child: None,
            sibling: None,
            host: None,
            effect,
            alternate: None,
            state_cells: Vec::new(),
        }
    }

    /// Reuse an existing host node and link to the previous fiber (builder).
    pub fn with_alternate(mut self, alternate: FiberId, host: Option<N>) -> Self {
        self.alternate = Some(alternate);
        self.host = host;
        self
    }

    /// The virtual node kind, or `None` for the root.
    pub fn node_kind(&self) -> Option<&NodeKind> {
        match &self.kind {
            FiberKind::Root => None,
            FiberKind::Node(kind) => Some(kind),
        }
    }

    /// Number of state cells this fiber holds.
    pub fn state_len(&self) -> usize {
        self.state_cells.len()
    }
}
