//! Differ: per-parent child reconciliation and attribute diffing.

pub mod differ;
pub mod props;

pub use differ::{reconcile_children, ReconcileSummary};
pub use props::{apply_change, apply_changes, diff_attributes, AttrChange};
