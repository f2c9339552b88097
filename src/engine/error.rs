//! Render errors.

use std::fmt;

use crate::host::HostError;

/// Which half of a pass was running when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Walking the work-in-progress tree (host nodes are created here).
    Render,
    /// Applying effects to the host tree.
    Commit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Render => f.write_str("render"),
            Phase::Commit => f.write_str("commit"),
        }
    }
}

/// Errors that abort a render pass.
///
/// The committed tree is left as it was; the caller re-renders to retry.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("host adapter failed during {phase}")]
    Host {
        phase: Phase,
        #[source]
        source: HostError,
    },
    #[error("gave up after {passes} render passes without settling")]
    TooManyPasses { passes: usize },
}

impl RenderError {
    pub(crate) fn host(phase: Phase, source: HostError) -> Self {
        RenderError::Host { phase, source }
    }
}
