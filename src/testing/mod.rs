//! Headless testing support: a recording host adapter and markup helpers.
//!
//! Use [`RecordingHost`] as the engine's host to capture every host call in
//! order, inject failures, and dispatch events to attached listeners. Use
//! [`to_markup`] to assert on the resulting host tree as a string.

pub mod host;
pub mod markup;

pub use host::{HostCall, HostId, HostNode, RecordingHost, CONTAINER};
pub use markup::to_markup;
