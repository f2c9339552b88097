//! The engine context: every piece of render state, owned in one place.
//!
//! What a global-state reconciler keeps in module variables (next unit of
//! work, deletion list, work-in-progress root, committed root) lives here as
//! fields. Only the engine writes them; the scheduler, differ, and committer
//! are `impl Engine` blocks in their own modules.

use std::rc::Rc;

use tracing::debug;

use super::config::EngineConfig;
use crate::commit::CommitReport;
use crate::fiber::{EffectTag, Fiber, FiberId, FiberTree};
use crate::hooks::RenderSignal;
use crate::host::HostAdapter;
use crate::reconcile::ReconcileSummary;
use crate::vnode::VNode;

// ---------------------------------------------------------------------------
// RenderStats
// ---------------------------------------------------------------------------

/// Counters over the lifetime of an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Passes begun, by `render` or by state updates.
    pub passes_started: usize,
    /// Passes discarded before commit because a newer request arrived.
    pub passes_abandoned: usize,
    /// Passes aborted by a host adapter error.
    pub passes_failed: usize,
    pub units_performed: usize,
    pub commits: usize,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A reconciler bound to one host adapter.
///
/// Single-threaded: state-update handles share `Rc` state with the engine.
pub struct Engine<H: HostAdapter> {
    pub(crate) host: H,
    pub(crate) fibers: FiberTree<H::Node>,
    /// Root of the last committed tree.
    pub(crate) current_root: Option<FiberId>,
    /// Root of the tree being built, if a pass is in flight.
    pub(crate) wip_root: Option<FiberId>,
    /// Where the scheduler resumes.
    pub(crate) next_unit: Option<FiberId>,
    /// Previous-tree fibers to detach at commit.
    pub(crate) deletions: Vec<FiberId>,
    pub(crate) signal: Rc<RenderSignal>,
    pub(crate) config: EngineConfig,
    pub(crate) stats: RenderStats,
    /// Differ output accumulated over the current pass.
    pub(crate) pass: ReconcileSummary,
    pub(crate) last_commit: Option<CommitReport>,
}

impl<H: HostAdapter> Engine<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            fibers: FiberTree::new(),
            current_root: None,
            wip_root: None,
            next_unit: None,
            deletions: Vec::new(),
            signal: Rc::new(RenderSignal::default()),
            config,
            stats: RenderStats::default(),
            pass: ReconcileSummary::default(),
            last_commit: None,
        }
    }

    /// Start rendering `element` into `container`.
    ///
    /// Replaces any pass in flight. No work happens until the scheduler runs
    /// (`perform_unit`, `work_loop`, `flush`, or the async driver). Rendering
    /// again into the same container diffs against the committed tree.
    pub fn render(&mut self, element: VNode, container: H::Node) {
        // This pass folds every queued update, so a pending request is moot.
        self.signal.take_request();
        self.begin_pass(container, element);
    }

    /// Begin a pass that re-renders the committed tree, picking up state updates.
    pub(crate) fn rerender_current(&mut self) {
        let Some(current) = self.current_root else {
            return;
        };
        let root = &self.fibers[current];
        let (Some(container), Some(element)) = (root.host.clone(), root.children.first().cloned())
        else {
            return;
        };
        self.begin_pass(container, element);
    }

    fn begin_pass(&mut self, container: H::Node, element: VNode) {
        self.abandon_wip();
        let alternate = self
            .current_root
            .filter(|&id| self.fibers[id].host.as_ref() == Some(&container));
        let root = self.fibers.insert(Fiber::root(container, element, alternate));
        self.wip_root = Some(root);
        self.next_unit = Some(root);
        self.pass = ReconcileSummary::default();
        self.stats.passes_started += 1;
        debug!(?root, ?alternate, pass = self.stats.passes_started, "render pass started");
    }

    /// Drop the in-flight pass, if any. The committed tree is untouched.
    pub(crate) fn abandon_wip(&mut self) {
        self.next_unit = None;
        let Some(root) = self.wip_root.take() else {
            return;
        };
        for id in self.deletions.drain(..) {
            if let Some(fiber) = self.fibers.get_mut(id) {
                fiber.effect = EffectTag::None;
            }
        }
        let freed = self.fibers.remove_subtree(root);
        self.stats.passes_abandoned += 1;
        debug!(?root, freed, "abandoned in-progress pass");
    }

    /// Whether a pass is in flight or a state update is waiting for one.
    pub fn has_pending_work(&self) -> bool {
        self.next_unit.is_some() || (self.signal.is_requested() && self.current_root.is_some())
    }

    pub fn is_idle(&self) -> bool {
        !self.has_pending_work()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Report of the most recent successful commit.
    pub fn last_commit(&self) -> Option<CommitReport> {
        self.last_commit
    }

    /// Root fiber of the committed tree.
    pub fn current_root(&self) -> Option<FiberId> {
        self.current_root
    }

    /// Root fiber of the pass in flight.
    pub fn wip_root(&self) -> Option<FiberId> {
        self.wip_root
    }

    /// The fiber the scheduler will visit next.
    pub fn next_unit(&self) -> Option<FiberId> {
        self.next_unit
    }

    /// Read access to the fiber arena (both trees).
    pub fn fibers(&self) -> &FiberTree<H::Node> {
        &self.fibers
    }
}
