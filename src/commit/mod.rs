//! Commit phase: deletions, then updates and placements, applied atomically
//! with respect to the scheduler.

pub mod committer;

pub use committer::CommitReport;
