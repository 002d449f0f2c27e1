//! Attempt history stores.
//!
//! [`MemoryHistory`] keeps attempts per learner in process and hands them out
//! most recent first. [`load_history_file`] fills one from a JSON export of
//! progress rows.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::Attempt;
use crate::traits::HistorySource;

/// One stored progress row: the learner plus their attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRow {
    pub username: String,
    #[serde(flatten)]
    pub attempt: Attempt,
}

/// In-process attempt store keyed by username.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    attempts: RwLock<HashMap<String, Vec<Attempt>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attempt for `username`. Recorded attempts are never changed.
    pub fn record(&self, username: &str, attempt: Attempt) {
        let mut attempts = self
            .attempts
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        attempts
            .entry(username.to_string())
            .or_default()
            .push(attempt);
    }

    /// Number of learners with at least one attempt.
    pub fn learner_count(&self) -> usize {
        self.attempts
            .read()
            .map(|a| a.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    /// Snapshot of a learner's attempts ordered most recent first.
    pub fn attempts_for(&self, username: &str) -> Vec<Attempt> {
        let attempts = self
            .attempts
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut history = attempts.get(username).cloned().unwrap_or_default();
        // Later recordings win ties on equal timestamps.
        history.reverse();
        history.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at));
        history
    }
}

impl FromIterator<ProgressRow> for MemoryHistory {
    fn from_iter<I: IntoIterator<Item = ProgressRow>>(iter: I) -> Self {
        let history = MemoryHistory::new();
        for row in iter {
            history.record(&row.username, row.attempt);
        }
        history
    }
}

#[async_trait]
impl HistorySource for MemoryHistory {
    fn name(&self) -> &str {
        "memory"
    }

    async fn history(&self, username: &str) -> Result<Vec<Attempt>> {
        Ok(self.attempts_for(username))
    }
}

/// Parse a JSON array of progress rows.
///
/// Rows that cannot be read as a progress row (no username, unreadable
/// timestamp) are skipped and counted in a warning; the file as a whole only
/// fails when it is not a JSON array.
pub fn parse_history_str(content: &str, source_path: &Path) -> Result<MemoryHistory> {
    let values: Vec<serde_json::Value> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse history JSON: {}", source_path.display()))?;

    let total = values.len();
    let rows: Vec<ProgressRow> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    let skipped = total - rows.len();
    if skipped > 0 {
        tracing::warn!(
            "skipping {skipped} unreadable progress row(s) in {}",
            source_path.display()
        );
    }
    tracing::debug!("loaded {} progress rows from {}", rows.len(), source_path.display());
    Ok(rows.into_iter().collect())
}

/// Load a JSON array of progress rows from disk.
pub fn load_history_file(path: &Path) -> Result<MemoryHistory> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file: {}", path.display()))?;
    parse_history_str(&content, path)
}
