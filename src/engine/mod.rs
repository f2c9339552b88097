//! Engine: the context object that owns the fiber arena and all render state.

pub mod config;
pub mod context;
pub mod error;

pub use config::EngineConfig;
pub use context::{Engine, RenderStats};
pub use error::{Phase, RenderError};
