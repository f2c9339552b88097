//! State-cell store: per-fiber state slots that persist across renders.
//!
//! - [`Hooks::use_state`]: read a slot and get its update handle.
//! - [`SetState`]: queue a replacement or a function of the prior value;
//!   schedules one new render pass from the committed tree.

pub mod cell;
pub mod context;

pub use cell::SetState;
pub use context::Hooks;

pub(crate) use cell::{RenderSignal, StateCell};
