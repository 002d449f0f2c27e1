//! Level assessment.
//!
//! Levels are judged in ascending order. For each level the most recent
//! `window_size` attempts whose question falls in that level's band are
//! taken from the history; more than `pass_threshold` correct answers passes
//! the level and moves on to the next one. The first level that is failed,
//! or that does not have a full window yet, is the learner's level.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Attempt, Level, LevelConfig};

/// How a single level fared during an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LevelOutcome {
    /// More than `pass_threshold` of the window was correct.
    Passed {
        level: Level,
        correct: usize,
        window: usize,
    },
    /// A full window was available but not enough of it was correct.
    Failed {
        level: Level,
        correct: usize,
        window: usize,
    },
    /// Fewer in-band attempts than the window size. Not a failure.
    Insufficient {
        level: Level,
        seen: usize,
        required: usize,
    },
}

impl LevelOutcome {
    pub fn level(&self) -> Level {
        match *self {
            LevelOutcome::Passed { level, .. }
            | LevelOutcome::Failed { level, .. }
            | LevelOutcome::Insufficient { level, .. } => level,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, LevelOutcome::Passed { .. })
    }
}

/// Result of assessing one learner's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// The level the learner currently works at, in `1..=max_level`.
    pub level: Level,
    /// Highest configured level at the time of assessment.
    pub max_level: Level,
    /// One entry per level evaluated, in ascending order.
    pub outcomes: Vec<LevelOutcome>,
}

impl Assessment {
    /// Highest level passed, or 0 when none was.
    pub fn highest_passed(&self) -> Level {
        self.outcomes
            .iter()
            .filter(|o| o.is_passed())
            .map(LevelOutcome::level)
            .max()
            .unwrap_or(0)
    }
}

/// Compute the learner's current level.
///
/// `history` must be ordered most recent first. The result is always in
/// `1..=max_level`; an empty history yields 1 for any valid configuration.
///
/// The configuration is validated before the history is looked at, so an
/// unusable configuration (e.g. no levels) is an error even when the
/// history is empty.
pub fn compute_level(history: &[Attempt], config: &LevelConfig) -> Result<Level, ConfigError> {
    assess(history, config).map(|a| a.level)
}

/// Compute the learner's level along with a per-level breakdown.
pub fn assess(history: &[Attempt], config: &LevelConfig) -> Result<Assessment, ConfigError> {
    config.validate()?;
    let max_level = config.max_level()?;

    let unassessable = history
        .iter()
        .filter(|a| a.assessable_question().is_none())
        .count();
    if unassessable > 0 {
        tracing::warn!("{unassessable} attempt(s) lack a question number or choice, ignoring");
    }

    let mut outcomes = Vec::new();
    let mut highest_passed: Level = 0;

    for (level, band) in config.level_ranges.iter() {
        let outcome = judge_level(history, level, band, config);
        tracing::debug!(?outcome, "assessed level {level}");
        outcomes.push(outcome);

        if !outcome.is_passed() {
            return Ok(Assessment {
                level: highest_passed + 1,
                max_level,
                outcomes,
            });
        }
        highest_passed = level;
    }

    // Every level passed: stay on the top level.
    Ok(Assessment {
        level: max_level,
        max_level,
        outcomes,
    })
}

fn judge_level(
    history: &[Attempt],
    level: Level,
    band: &BTreeSet<u32>,
    config: &LevelConfig,
) -> LevelOutcome {
    let required = config.window_size;
    let (seen, correct) = history
        .iter()
        .filter(|a| a.assessable_question().is_some_and(|q| band.contains(&q)))
        .take(required)
        .fold((0, 0), |(seen, correct), a| {
            (seen + 1, correct + usize::from(a.is_correct()))
        });

    if seen < required {
        LevelOutcome::Insufficient {
            level,
            seen,
            required,
        }
    } else if correct > config.pass_threshold {
        LevelOutcome::Passed {
            level,
            correct,
            window: required,
        }
    } else {
        LevelOutcome::Failed {
            level,
            correct,
            window: required,
        }
    }
}
