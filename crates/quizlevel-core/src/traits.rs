//! Trait definitions for the collaborators the level service depends on.

use async_trait::async_trait;

use crate::model::Attempt;

// ---------------------------------------------------------------------------
// History source trait
// ---------------------------------------------------------------------------

/// Supplies a learner's recorded attempts.
///
/// Implementations must return attempts ordered by `attempted_at`
/// descending (most recent first). The assessor never re-sorts.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Human-readable source name (e.g. "memory").
    fn name(&self) -> &str;

    /// All attempts recorded for `username`, most recent first. An unknown
    /// user has an empty history.
    async fn history(&self, username: &str) -> anyhow::Result<Vec<Attempt>>;
}
