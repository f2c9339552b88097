//! Fiber tree: slotmap-backed arena of work units linked parent/child/sibling.

pub mod node;
pub mod tree;

pub use node::{EffectTag, Fiber, FiberId, FiberKind};
pub use tree::FiberTree;
