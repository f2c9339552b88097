//! Cooperative scheduling: the resumable work loop, yield signals, and an
//! async driver.
//!
//! A render pass is a pre-order walk over the work-in-progress tree, one
//! fiber per unit. The loop stops whenever the [`Deadline`] says so and picks
//! up at the same fiber on the next call. Nothing reaches the host tree until
//! the walk finishes and the pass commits.

pub mod deadline;
pub mod driver;
pub mod work_loop;

pub use deadline::{Deadline, IdleDeadline, Unbounded, UnitBudget};
pub use driver::run_until_idle;
pub use work_loop::WorkStatus;
