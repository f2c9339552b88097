//! RecordingHost: an in-memory host tree that logs every adapter call.

use std::fmt;

use indexmap::IndexMap;
use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::host::{HostAdapter, HostError, HostNodeKind};
use crate::vnode::{AttrValue, Event, EventHandler};

new_key_type! {
    /// Handle to a node in a [`RecordingHost`].
    pub struct HostId;
}

/// Label of the container node every `RecordingHost` starts with.
pub const CONTAINER: &str = "#container";

// ---------------------------------------------------------------------------
// HostNode
// ---------------------------------------------------------------------------

/// One node of the recorded host tree.
#[derive(Debug, Clone)]
pub struct HostNode {
    /// Tag name, `#text`, or `#container`.
    pub label: String,
    pub attributes: IndexMap<String, AttrValue>,
    pub listeners: IndexMap<String, Vec<EventHandler>>,
}

impl HostNode {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attributes: IndexMap::new(),
            listeners: IndexMap::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.label == "#text"
    }
}

// ---------------------------------------------------------------------------
// HostCall
// ---------------------------------------------------------------------------

/// One recorded adapter call. `Display` gives a compact form for assertions:
/// `create div`, `set id=x`, `append a -> div`, `remove li from ul`.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create {
        node: HostId,
        label: String,
    },
    SetAttribute {
        node: HostId,
        key: String,
        value: String,
    },
    RemoveAttribute {
        node: HostId,
        key: String,
    },
    AddListener {
        node: HostId,
        event: String,
    },
    RemoveListener {
        node: HostId,
        event: String,
    },
    AppendChild {
        parent: HostId,
        child: HostId,
        parent_label: String,
        child_label: String,
    },
    RemoveChild {
        parent: HostId,
        child: HostId,
        parent_label: String,
        child_label: String,
    },
}

impl HostCall {
    /// The adapter operation this call went through.
    pub fn op(&self) -> &'static str {
        match self {
            HostCall::Create { .. } => "create_node",
            HostCall::SetAttribute { .. } => "set_attribute",
            HostCall::RemoveAttribute { .. } => "remove_attribute",
            HostCall::AddListener { .. } => "add_listener",
            HostCall::RemoveListener { .. } => "remove_listener",
            HostCall::AppendChild { .. } => "append_child",
            HostCall::RemoveChild { .. } => "remove_child",
        }
    }
}

impl fmt::Display for HostCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCall::Create { label, .. } => write!(f, "create {label}"),
            HostCall::SetAttribute { key, value, .. } => write!(f, "set {key}={value}"),
            HostCall::RemoveAttribute { key, .. } => write!(f, "unset {key}"),
            HostCall::AddListener { event, .. } => write!(f, "listen {event}"),
            HostCall::RemoveListener { event, .. } => write!(f, "unlisten {event}"),
            HostCall::AppendChild {
                parent_label,
                child_label,
                ..
            } => write!(f, "append {child_label} -> {parent_label}"),
            HostCall::RemoveChild {
                parent_label,
                child_label,
                ..
            } => write!(f, "remove {child_label} from {parent_label}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingHost
// ---------------------------------------------------------------------------

/// In-memory [`HostAdapter`] for tests and headless use.
///
/// Keeps a real tree (so markup can be inspected after a commit), records
/// every call in order, and can be told to fail a given operation.
pub struct RecordingHost {
    nodes: SlotMap<HostId, HostNode>,
    children: SecondaryMap<HostId, Vec<HostId>>,
    parent: SecondaryMap<HostId, HostId>,
    container: HostId,
    calls: Vec<HostCall>,
    failing: Option<&'static str>,
}

impl RecordingHost {
    /// A host holding a single empty container node.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let container = nodes.insert(HostNode::new(CONTAINER));
        let mut children = SecondaryMap::new();
        children.insert(container, Vec::new());
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            container,
            calls: Vec::new(),
            failing: None,
        }
    }

    /// The container created by [`new`](Self::new).
    pub fn container(&self) -> HostId {
        self.container
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Fail every call of adapter operation `op` (e.g. `"append_child"`)
    /// until [`recover`](Self::recover) is called.
    pub fn fail_on(&mut self, op: &'static str) {
        self.failing = Some(op);
    }

    pub fn recover(&mut self) {
        self.failing = None;
    }

    pub fn node(&self, id: HostId) -> Option<&HostNode> {
        self.nodes.get(id)
    }

    /// Children of `id` in order. Empty for unknown ids.
    pub fn children(&self, id: HostId) -> &[HostId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn parent(&self, id: HostId) -> Option<HostId> {
        self.parent.get(id).copied()
    }

    /// Number of nodes ever created, including the container.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// First node with `label` attached under the container, in document order.
    pub fn find(&self, label: &str) -> Option<HostId> {
        let mut stack = vec![self.container];
        while let Some(id) = stack.pop() {
            if id != self.container && self.nodes.get(id).is_some_and(|n| n.label == label) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev());
        }
        None
    }

    /// Deliver `event` to the listeners attached to `node` for `event.name`.
    /// Returns how many listeners ran.
    ///
    /// Handlers are cloned out first, so a listener may freely trigger state
    /// updates or even a re-render that replaces itself.
    pub fn dispatch(&self, node: HostId, event: &Event) -> usize {
        let handlers = self
            .nodes
            .get(node)
            .and_then(|n| n.listeners.get(&event.name))
            .cloned()
            .unwrap_or_default();
        for handler in &handlers {
            handler.call(event);
        }
        handlers.len()
    }

    fn check(&self, op: &'static str) -> Result<(), HostError> {
        if self.failing == Some(op) {
            return Err(HostError::Failed {
                op,
                reason: "injected failure".into(),
            });
        }
        Ok(())
    }

    fn get_mut(&mut self, id: HostId) -> Result<&mut HostNode, HostError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| HostError::InvalidHandle(format!("{id:?}")))
    }

    fn label(&self, id: HostId) -> Result<String, HostError> {
        self.nodes
            .get(id)
            .map(|n| n.label.clone())
            .ok_or_else(|| HostError::InvalidHandle(format!("{id:?}")))
    }

    fn detach(&mut self, child: HostId) {
        if let Some(old) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(old) {
                siblings.retain(|&c| c != child);
            }
        }
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordingHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingHost")
            .field("nodes", &self.nodes.len())
            .field("calls", &self.calls.len())
            .finish()
    }
}

impl HostAdapter for RecordingHost {
    type Node = HostId;

    fn create_node(&mut self, kind: HostNodeKind<'_>) -> Result<HostId, HostError> {
        self.check("create_node")?;
        let label = kind.to_string();
        let node = self.nodes.insert(HostNode::new(label.clone()));
        self.children.insert(node, Vec::new());
        self.calls.push(HostCall::Create { node, label });
        Ok(node)
    }

    fn set_attribute(&mut self, node: &HostId, key: &str, value: &AttrValue) -> Result<(), HostError> {
        self.check("set_attribute")?;
        self.get_mut(*node)?
            .attributes
            .insert(key.to_owned(), value.clone());
        self.calls.push(HostCall::SetAttribute {
            node: *node,
            key: key.to_owned(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: &HostId, key: &str) -> Result<(), HostError> {
        self.check("remove_attribute")?;
        self.get_mut(*node)?.attributes.shift_remove(key);
        self.calls.push(HostCall::RemoveAttribute {
            node: *node,
            key: key.to_owned(),
        });
        Ok(())
    }

    fn add_listener(
        &mut self,
        node: &HostId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        self.check("add_listener")?;
        self.get_mut(*node)?
            .listeners
            .entry(event.to_owned())
            .or_default()
            .push(handler.clone());
        self.calls.push(HostCall::AddListener {
            node: *node,
            event: event.to_owned(),
        });
        Ok(())
    }

    fn remove_listener(
        &mut self,
        node: &HostId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        self.check("remove_listener")?;
        let listeners = &mut self.get_mut(*node)?.listeners;
        if let Some(handlers) = listeners.get_mut(event) {
            handlers.retain(|h| h != handler);
            if handlers.is_empty() {
                listeners.shift_remove(event);
            }
        }
        self.calls.push(HostCall::RemoveListener {
            node: *node,
            event: event.to_owned(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &HostId, child: &HostId) -> Result<(), HostError> {
        self.check("append_child")?;
        let parent_label = self.label(*parent)?;
        let child_label = self.label(*child)?;
        self.detach(*child);
        self.parent.insert(*child, *parent);
        if let Some(children) = self.children.get_mut(*parent) {
            children.push(*child);
        }
        self.calls.push(HostCall::AppendChild {
            parent: *parent,
            child: *child,
            parent_label,
            child_label,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &HostId, child: &HostId) -> Result<(), HostError> {
        self.check("remove_child")?;
        let parent_label = self.label(*parent)?;
        let child_label = self.label(*child)?;
        if self.parent.get(*child) != Some(parent) {
            return Err(HostError::NotAChild {
                parent: format!("{parent:?}"),
                child: format!("{child:?}"),
            });
        }
        self.detach(*child);
        self.calls.push(HostCall::RemoveChild {
            parent: *parent,
            child: *child,
            parent_label,
            child_label,
        });
        Ok(())
    }
}
