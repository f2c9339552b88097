//! The resumable work loop: one fiber per step, pre-order, commit at the end.

use std::rc::Rc;
use std::slice;

use tracing::{debug, trace, warn};

use super::deadline::{Deadline, Unbounded};
use crate::engine::{Engine, Phase, RenderError};
use crate::fiber::{FiberId, FiberKind};
use crate::hooks::Hooks;
use crate::host::{HostAdapter, HostError, HostNodeKind};
use crate::reconcile::{apply_changes, diff_attributes, reconcile_children};
use crate::vnode::{Attributes, Component, NodeKind, Props, VNode};

/// Outcome of a scheduler call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// Units remain; call again to resume where this call stopped.
    Continue,
    /// Nothing left: the last pass is committed and no update is queued.
    Done,
}

impl<H: HostAdapter> Engine<H> {
    /// Perform exactly one unit of work.
    ///
    /// A queued state update is picked up first and restarts the pass from
    /// the committed tree. The unit that finishes the walk also commits.
    pub fn perform_unit(&mut self) -> Result<WorkStatus, RenderError> {
        if self.signal.take_request() {
            self.rerender_current();
        }
        let Some(id) = self.next_unit else {
            return Ok(WorkStatus::Done);
        };

        if let Err(source) = self.expand(id) {
            warn!(fiber = ?id, error = %source, "render pass aborted by host adapter");
            self.fail_pass();
            return Err(RenderError::host(Phase::Render, source));
        }
        self.stats.units_performed += 1;
        self.next_unit = self.fibers.next_in_preorder(id);

        if self.next_unit.is_none() {
            self.commit_root()?;
        }
        Ok(if self.has_pending_work() {
            WorkStatus::Continue
        } else {
            WorkStatus::Done
        })
    }

    /// Perform units until `deadline` asks to yield or the work runs out.
    pub fn work_loop(&mut self, deadline: &mut impl Deadline) -> Result<WorkStatus, RenderError> {
        while self.has_pending_work() {
            self.perform_unit()?;
            if deadline.should_yield() {
                break;
            }
        }
        Ok(if self.has_pending_work() {
            WorkStatus::Continue
        } else {
            WorkStatus::Done
        })
    }

    /// Run until idle, including passes triggered by state updates.
    ///
    /// Fails with [`RenderError::TooManyPasses`] if updates keep requesting
    /// new passes beyond the configured limit.
    pub fn flush(&mut self) -> Result<(), RenderError> {
        let start = self.stats.passes_started;
        while self.has_pending_work() {
            self.perform_unit()?;
            self.check_pass_limit(start)?;
        }
        Ok(())
    }

    /// Give up once more than `max_render_passes` passes began since `start`.
    pub(crate) fn check_pass_limit(&mut self, start: usize) -> Result<(), RenderError> {
        let passes = self.stats.passes_started - start;
        if passes <= self.config.max_render_passes {
            return Ok(());
        }
        warn!(passes, "state updates keep scheduling passes; giving up");
        self.abandon_wip();
        self.signal.take_request();
        Err(RenderError::TooManyPasses { passes })
    }

    /// Abort the pass in flight after a failure.
    pub(crate) fn fail_pass(&mut self) {
        self.abandon_wip();
        self.stats.passes_failed += 1;
    }

    /// Kind-specific work for one fiber; produces its child fibers.
    fn expand(&mut self, id: FiberId) -> Result<(), HostError> {
        let kind = self.fibers[id].kind.clone();
        trace!(fiber = ?id, %kind, "unit of work");
        match kind {
            FiberKind::Root | FiberKind::Node(NodeKind::Fragment) => {
                self.reconcile_own_children(id);
            }
            FiberKind::Node(NodeKind::Element(tag)) => {
                self.ensure_host_node(id, HostNodeKind::Element(&tag))?;
                self.reconcile_own_children(id);
            }
            FiberKind::Node(NodeKind::Text) => {
                self.ensure_host_node(id, HostNodeKind::Text)?;
            }
            FiberKind::Node(NodeKind::Component(component)) => {
                self.render_component(id, &component);
            }
        }
        Ok(())
    }

    /// Create the host node on first visit and give it its initial attributes.
    fn ensure_host_node(&mut self, id: FiberId, kind: HostNodeKind<'_>) -> Result<(), HostError> {
        if self.fibers[id].host.is_some() {
            return Ok(());
        }
        let node = self.host.create_node(kind)?;
        let attributes = Rc::clone(&self.fibers[id].attributes);
        let empty = Attributes::new();
        apply_changes(&mut self.host, &node, &diff_attributes(&empty, &attributes))?;
        self.fibers[id].host = Some(node);
        Ok(())
    }

    fn reconcile_own_children(&mut self, id: FiberId) {
        let children = Rc::clone(&self.fibers[id].children);
        let summary = reconcile_children(&mut self.fibers, &mut self.deletions, id, &children);
        self.pass.merge(summary);
    }

    /// Invoke a component with its hook context; its output is its only child.
    fn render_component(&mut self, id: FiberId, component: &Component) {
        let fiber = &self.fibers[id];
        let props = Props::new(Rc::clone(&fiber.attributes), Rc::clone(&fiber.children));
        let previous = fiber
            .alternate
            .and_then(|alt| self.fibers.get(alt))
            .map(|alt| alt.state_cells.as_slice())
            .unwrap_or_default();

        let mut hooks = Hooks::new(previous, &self.signal, component.name());
        let output = component.invoke(&mut hooks, &props);
        let cells = hooks.finish();
        self.fibers[id].state_cells = cells;

        let child = output.unwrap_or_else(|| {
            debug!(component = component.name(), "component rendered nothing");
            VNode::text("")
        });
        let summary =
            reconcile_children(&mut self.fibers, &mut self.deletions, id, slice::from_ref(&child));
        self.pass.merge(summary);
    }
}
