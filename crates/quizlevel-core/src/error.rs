//! Level assessment error types.
//!
//! `ConfigError` covers every way a level configuration can be unusable.
//! `LevelError` is what the level service returns, wrapping configuration
//! problems and failures of the history collaborator.

use thiserror::Error;

/// A level configuration that cannot be assessed against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No level bands are configured.
    #[error("no levels configured")]
    NoLevels,

    /// Level numbers must start at 1 and increase without gaps.
    #[error("level numbers must be contiguous from 1: expected level {expected}, found {found}")]
    LevelGap { expected: u32, found: u32 },

    /// Question numbers start at 1.
    #[error("level {level} contains invalid question number {question}")]
    InvalidQuestion { level: u32, question: u32 },

    /// A question number belongs to more than one level.
    #[error("question {question} appears in both level {first} and level {second}")]
    OverlappingBands { question: u32, first: u32, second: u32 },

    /// A numeric assessment parameter is negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    /// An inclusive `from..=to` band with `from > to`.
    #[error("level {level} has an empty question range {from}..={to}")]
    InvalidRange { level: u32, from: u32, to: u32 },
}

/// Errors returned by [`crate::service::LevelService`].
#[derive(Debug, Error)]
pub enum LevelError {
    /// The configuration snapshot is not assessable.
    #[error("level assessment unavailable: {0}")]
    Config(#[from] ConfigError),

    /// The attempt history could not be retrieved.
    #[error("failed to load attempt history for '{username}'")]
    History {
        username: String,
        #[source]
        source: anyhow::Error,
    },
}

impl LevelError {
    /// Returns `true` if retrying without changing configuration cannot help.
    pub fn is_permanent(&self) -> bool {
        matches!(self, LevelError::Config(_))
    }
}
