//! Async driver: run the work loop in time slices on a tokio runtime.
//!
//! Between slices the driver hands control back to the runtime, either with
//! a bare yield or by sleeping for the configured idle interval, so other
//! tasks (input handling, timers) interleave with rendering.

use tracing::{debug, trace};

use super::deadline::IdleDeadline;
use super::work_loop::WorkStatus;
use crate::engine::{Engine, RenderError};
use crate::host::HostAdapter;

/// Work until the engine is idle. Returns the number of slices used.
///
/// The engine holds `Rc` state, so the future is `!Send`; run it on a
/// current-thread runtime or inside a `LocalSet`.
pub async fn run_until_idle<H: HostAdapter>(engine: &mut Engine<H>) -> Result<usize, RenderError> {
    let start = engine.stats.passes_started;
    let mut slices = 0;
    while engine.has_pending_work() {
        slices += 1;
        let mut deadline = IdleDeadline::from_config(&engine.config);
        let status = engine.work_loop(&mut deadline)?;
        engine.check_pass_limit(start)?;
        trace!(slice = slices, ?status, "slice finished");
        if status == WorkStatus::Done {
            break;
        }
        let interval = engine.config.idle_interval;
        if interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(interval).await;
        }
    }
    debug!(slices, "engine idle");
    Ok(slices)
}
