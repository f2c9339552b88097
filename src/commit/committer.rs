//! Commit: apply a finished pass to the host tree in one uninterrupted step.

use std::rc::Rc;

use tracing::{debug, debug_span, warn};

use crate::engine::{Engine, Phase, RenderError};
use crate::fiber::{EffectTag, FiberId};
use crate::host::{HostAdapter, HostError};
use crate::reconcile::{apply_change, diff_attributes};

/// What a commit did to the host tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Host nodes attached.
    pub placements: usize,
    /// Fibers patched in place (whether or not any attribute changed).
    pub updates: usize,
    /// Previous-tree fibers removed.
    pub deletions: usize,
    /// Every host adapter call made by the commit.
    pub host_calls: usize,
}

/// Structural host mutations made so far by the commit in progress.
struct Applied<N> {
    /// Previous-tree fibers whose host node is already detached.
    detached: Vec<FiberId>,
    /// `(parent, child)` pairs attached under a node the committed tree owns.
    attached: Vec<(N, N)>,
}

impl<N> Applied<N> {
    fn new() -> Self {
        Self {
            detached: Vec::new(),
            attached: Vec::new(),
        }
    }
}

impl<H: HostAdapter> Engine<H> {
    /// Commit the finished work-in-progress tree.
    ///
    /// Deletions go first. Then one walk over the new tree patches updated
    /// nodes on the way down and attaches placed nodes on the way up, so every
    /// node is attached after its own children.
    ///
    /// If the host fails partway, the committed tree is brought back in line
    /// with the host before the pass is dropped, so the next render diffs
    /// against what the host actually holds.
    pub(crate) fn commit_root(&mut self) -> Result<(), RenderError> {
        let Some(root) = self.wip_root else {
            return Ok(());
        };
        let _span = debug_span!("commit", ?root).entered();

        let mut report = CommitReport::default();
        let mut applied = Applied::new();
        let result = self
            .commit_deletions(&mut report, &mut applied)
            .and_then(|()| self.commit_tree(root, &mut report, &mut applied));
        if let Err(source) = result {
            warn!(error = %source, "commit aborted partway");
            self.settle_failed_commit(applied);
            self.fail_pass();
            return Err(RenderError::host(Phase::Commit, source));
        }

        self.finish_commit(root, report);
        Ok(())
    }

    fn commit_deletions(
        &mut self,
        report: &mut CommitReport,
        applied: &mut Applied<H::Node>,
    ) -> Result<(), HostError> {
        for id in self.deletions.clone() {
            let Some(parent) = self.fibers.host_ancestor(id).and_then(|a| self.fibers[a].host.clone())
            else {
                continue;
            };
            self.detach_host_nodes(&parent, id, report, applied)?;
            report.deletions += 1;
        }
        Ok(())
    }

    /// Remove the topmost host nodes under `id` from `parent`.
    fn detach_host_nodes(
        &mut self,
        parent: &H::Node,
        id: FiberId,
        report: &mut CommitReport,
        applied: &mut Applied<H::Node>,
    ) -> Result<(), HostError> {
        if let Some(node) = self.fibers[id].host.clone() {
            self.host.remove_child(parent, &node)?;
            applied.detached.push(id);
            report.host_calls += 1;
            return Ok(());
        }
        for child in self.fibers.children(id) {
            self.detach_host_nodes(parent, child, report, applied)?;
        }
        Ok(())
    }

    fn commit_tree(
        &mut self,
        root: FiberId,
        report: &mut CommitReport,
        applied: &mut Applied<H::Node>,
    ) -> Result<(), HostError> {
        let mut current = root;
        'walk: loop {
            self.commit_update(current, report)?;
            if let Some(child) = self.fibers[current].child {
                current = child;
                continue;
            }
            loop {
                self.commit_placement(current, report, applied)?;
                if current == root {
                    break 'walk;
                }
                if let Some(sibling) = self.fibers[current].sibling {
                    current = sibling;
                    continue 'walk;
                }
                match self.fibers[current].parent {
                    Some(parent) => current = parent,
                    None => break 'walk,
                }
            }
        }
        Ok(())
    }

    /// Patch one updated fiber's host node.
    ///
    /// The previous fiber's attributes are rewritten to whatever reached the
    /// host, including a partial patch when the host fails midway.
    fn commit_update(&mut self, id: FiberId, report: &mut CommitReport) -> Result<(), HostError> {
        let fiber = &self.fibers[id];
        if fiber.effect != EffectTag::Update {
            return Ok(());
        }
        report.updates += 1;
        let (Some(node), Some(alt)) = (
            fiber.host.clone(),
            fiber.alternate.filter(|&alt| self.fibers.contains(alt)),
        ) else {
            return Ok(());
        };
        let old = Rc::clone(&self.fibers[alt].attributes);
        let new = Rc::clone(&fiber.attributes);

        let changes = diff_attributes(&old, &new);
        for (done, change) in changes.iter().enumerate() {
            if let Err(source) = apply_change(&mut self.host, &node, change) {
                let mut held = (*old).clone();
                for change in &changes[..done] {
                    change.record(&mut held);
                }
                self.fibers[alt].attributes = Rc::new(held);
                return Err(source);
            }
            report.host_calls += 1;
        }
        self.fibers[alt].attributes = Rc::clone(&new);
        Ok(())
    }

    fn commit_placement(
        &mut self,
        id: FiberId,
        report: &mut CommitReport,
        applied: &mut Applied<H::Node>,
    ) -> Result<(), HostError> {
        let fiber = &self.fibers[id];
        let (EffectTag::Placement, Some(node)) = (fiber.effect, fiber.host.clone()) else {
            return Ok(());
        };
        let Some(anchor) = self.fibers.host_ancestor(id) else {
            return Ok(());
        };
        let Some(parent) = self.fibers[anchor].host.clone() else {
            return Ok(());
        };
        self.host.append_child(&parent, &node)?;
        if self.fibers[anchor].effect != EffectTag::Placement {
            applied.attached.push((parent, node));
        }
        report.placements += 1;
        report.host_calls += 1;
        Ok(())
    }

    /// Make the committed tree describe the host again after a failed commit.
    ///
    /// Nodes the commit attached under committed nodes are detached again.
    /// Fibers whose host nodes were already removed are pruned, so later
    /// passes neither diff against them nor try to detach them twice.
    fn settle_failed_commit(&mut self, applied: Applied<H::Node>) {
        for (parent, node) in applied.attached.iter().rev() {
            if let Err(error) = self.host.remove_child(parent, node) {
                warn!(%error, "node attached by the failed commit stays in the host tree");
            }
        }
        let pruned: usize = applied
            .detached
            .iter()
            .map(|&id| {
                self.fibers.unlink(id);
                self.fibers.remove_subtree(id)
            })
            .sum();
        debug!(
            reverted = applied.attached.len(),
            pruned, "committed tree settled after failed commit"
        );
    }

    /// Promote the new tree to current and release the previous one.
    fn finish_commit(&mut self, root: FiberId, report: CommitReport) {
        for id in self.fibers.walk_depth_first(root) {
            let fiber = &mut self.fibers[id];
            for cell in &fiber.state_cells {
                cell.acknowledge();
            }
            fiber.alternate = None;
            fiber.effect = EffectTag::None;
        }

        let freed = self
            .current_root
            .replace(root)
            .map_or(0, |previous| self.fibers.remove_subtree(previous));
        self.wip_root = None;
        self.next_unit = None;
        self.deletions.clear();
        self.signal.mark_committed();
        self.stats.commits += 1;
        self.last_commit = Some(report);
        debug!(
            placements = report.placements,
            updates = report.updates,
            deletions = report.deletions,
            host_calls = report.host_calls,
            diffed = ?self.pass,
            freed,
            "committed"
        );
    }
}
