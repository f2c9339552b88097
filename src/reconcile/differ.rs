//! Child reconciliation: position-only matching of new descriptions against old fibers.

use tracing::trace;

use crate::fiber::{EffectTag, Fiber, FiberId, FiberTree};
use crate::vnode::VNode;

/// What one `reconcile_children` call produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub placements: usize,
    pub updates: usize,
    pub deletions: usize,
}

impl ReconcileSummary {
    /// Add another summary into this one.
    pub fn merge(&mut self, other: ReconcileSummary) {
        self.placements += other.placements;
        self.updates += other.updates;
        self.deletions += other.deletions;
    }
}

/// Build `parent`'s new child list from `elements`.
///
/// Walks the old children (`parent.alternate.child` chain) and `elements` in
/// lockstep, by position only. Equal kinds produce an `Update` fiber that
/// keeps the old host node; otherwise the new description becomes a
/// `Placement` and the old fiber is marked `Deletion` and pushed onto
/// `deletions`. Both sides advance every step, so a reordered list is
/// deletes plus inserts, never moves.
pub fn reconcile_children<N: Clone>(
    tree: &mut FiberTree<N>,
    deletions: &mut Vec<FiberId>,
    parent: FiberId,
    elements: &[VNode],
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();
    let mut old = tree[parent]
        .alternate
        .and_then(|alt| tree.get(alt))
        .and_then(|alt| alt.child);
    let mut previous: Option<FiberId> = None;
    tree[parent].child = None;

    let mut index = 0;
    while index < elements.len() || old.is_some() {
        let element = elements.get(index);
        let same_kind = match (element, old) {
            (Some(element), Some(old_id)) => tree[old_id].kind.matches(element.kind()),
            _ => false,
        };

        let created = match (element, old) {
            (Some(element), Some(old_id)) if same_kind => {
                let host = tree[old_id].host.clone();
                let fiber = Fiber::from_vnode(element.clone(), parent, EffectTag::Update)
                    .with_alternate(old_id, host);
                summary.updates += 1;
                Some(tree.insert(fiber))
            }
            (Some(element), _) => {
                summary.placements += 1;
                Some(tree.insert(Fiber::from_vnode(
                    element.clone(),
                    parent,
                    EffectTag::Placement,
                )))
            }
            (None, _) => None,
        };

        if let Some(old_id) = old.filter(|_| !same_kind) {
            trace!(fiber = ?old_id, kind = %tree[old_id].kind, "marking for deletion");
            tree[old_id].effect = EffectTag::Deletion;
            deletions.push(old_id);
            summary.deletions += 1;
        }

        if let Some(id) = created {
            match previous {
                None => tree[parent].child = Some(id),
                Some(prev) => tree[prev].sibling = Some(id),
            }
            previous = Some(id);
        }

        old = old.and_then(|id| tree[id].sibling);
        index += 1;
    }

    summary
}
