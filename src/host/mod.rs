//! Host adapter: the primitive operations the engine uses to mutate the host tree.
//!
//! The engine never owns host nodes. It holds opaque handles and calls the
//! [`HostAdapter`] to create, decorate, attach, and detach them. See
//! [`crate::testing::RecordingHost`] for an in-memory implementation.

use std::fmt;

use crate::vnode::{AttrValue, EventHandler};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors reported by a host adapter.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("invalid host node handle: {0}")]
    InvalidHandle(String),
    #[error("host node {child} is not a child of {parent}")]
    NotAChild { parent: String, child: String },
    #[error("host operation `{op}` failed: {reason}")]
    Failed { op: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// HostNodeKind
// ---------------------------------------------------------------------------

/// What kind of host node to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostNodeKind<'a> {
    Element(&'a str),
    /// A text node. Its content arrives through the `nodeValue` attribute.
    Text,
}

impl fmt::Display for HostNodeKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostNodeKind::Element(tag) => f.write_str(tag),
            HostNodeKind::Text => f.write_str("#text"),
        }
    }
}

// ---------------------------------------------------------------------------
// HostAdapter
// ---------------------------------------------------------------------------

/// Primitive host-tree operations.
///
/// Errors are not handled by the engine: they abort the current render pass
/// and are returned to whoever drove the scheduler.
pub trait HostAdapter {
    /// Handle to a host node.
    type Node: Clone + PartialEq + fmt::Debug;

    fn create_node(&mut self, kind: HostNodeKind<'_>) -> Result<Self::Node, HostError>;

    fn set_attribute(
        &mut self,
        node: &Self::Node,
        key: &str,
        value: &AttrValue,
    ) -> Result<(), HostError>;

    fn remove_attribute(&mut self, node: &Self::Node, key: &str) -> Result<(), HostError>;

    fn add_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    fn remove_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;
}
