//! # minifiber
//!
//! A minimal fiber-based UI reconciler: declarative node descriptions in,
//! the smallest set of host-tree mutations out.
//!
//! Rendering is split into an interruptible render phase, which walks a
//! work-in-progress fiber tree one unit at a time and can yield to the host
//! between units, and an atomic commit phase, which applies deletions,
//! attribute updates, and placements to the host tree in one step. Function
//! components keep state across renders through positional state cells.
//!
//! ## Core Systems
//!
//! - **[`vnode`]**: Virtual nodes, attributes, event handlers, `create_element`
//! - **[`fiber`]**: Slotmap-backed fiber arena with child/sibling/parent links
//! - **[`reconcile`]**: Position-based child diffing and attribute diffing
//! - **[`scheduler`]**: Resumable work loop, yield deadlines, async driver
//! - **[`commit`]**: Deletions, updates, and leaf-first placements
//! - **[`hooks`]**: State cells, update queues, `use_state`
//! - **[`host`]**: The host adapter trait the engine mutates through
//! - **[`engine`]**: The context object tying everything together
//! - **[`testing`]**: Recording host adapter and markup helpers
//!
//! ## Example
//!
//! ```
//! use minifiber::engine::Engine;
//! use minifiber::testing::{to_markup, RecordingHost};
//! use minifiber::vnode::h;
//!
//! let host = RecordingHost::new();
//! let container = host.container();
//! let mut engine = Engine::new(host);
//!
//! engine.render(h("div").attr("id", "x").child(h("a").attr("href", "u").child("bar")), container);
//! engine.flush().unwrap();
//!
//! assert_eq!(
//!     to_markup(engine.host(), container),
//!     r#"<div id="x"><a href="u">bar</a></div>"#
//! );
//! ```

// Description layer
pub mod vnode;

// Fiber tree and diffing
pub mod fiber;
pub mod reconcile;

// Render and commit
pub mod commit;
pub mod engine;
pub mod hooks;
pub mod scheduler;

// Host boundary
pub mod host;
pub mod testing;

pub use engine::{Engine, EngineConfig, RenderError};
pub use hooks::{Hooks, SetState};
pub use host::{HostAdapter, HostError, HostNodeKind};
pub use scheduler::WorkStatus;
pub use vnode::{create_element, h, Component, Props, VNode};
