//! Core data model types for quizlevel.
//!
//! An [`Attempt`] is one recorded answer. A [`LevelConfig`] describes which
//! questions belong to which level and how a level's mastery is judged.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::RangeInclusive;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// A learner's level. Levels start at 1.
pub type Level = u32;

/// One recorded answer to a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Question number within its set. Maps the attempt to a level band.
    /// Anything other than a non-negative integer that fits reads as `None`.
    #[serde(default, deserialize_with = "lenient_question")]
    pub question_number: Option<u32>,
    /// The option the learner picked (e.g. "B").
    #[serde(default, deserialize_with = "lenient_choice")]
    pub user_choice: Option<String>,
    /// The correct option.
    #[serde(default, deserialize_with = "lenient_choice")]
    pub correct_choice: Option<String>,
    /// When the answer was recorded. Higher is more recent.
    pub attempted_at: NaiveDateTime,
    /// Source folder of the question set (e.g. "AMC 8 2020").
    #[serde(default)]
    pub folder_name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub set_identifier: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_filename: String,
    /// Seconds the learner spent on the question.
    #[serde(default)]
    pub answer_time_secs: Option<u32>,
}

impl Attempt {
    /// Create an attempt with only the fields the assessor looks at.
    pub fn new(
        question_number: u32,
        user_choice: impl Into<String>,
        correct_choice: impl Into<String>,
        attempted_at: NaiveDateTime,
    ) -> Self {
        Self {
            question_number: Some(question_number),
            user_choice: Some(user_choice.into()),
            correct_choice: Some(correct_choice.into()),
            attempted_at,
            folder_name: String::new(),
            year: None,
            set_identifier: String::new(),
            category: String::new(),
            image_filename: String::new(),
            answer_time_secs: None,
        }
    }

    /// The question number, if this record is complete enough to assess.
    ///
    /// Records missing the question number or either choice never match a
    /// level band.
    pub fn assessable_question(&self) -> Option<u32> {
        match (&self.user_choice, &self.correct_choice) {
            (Some(_), Some(_)) => self.question_number,
            _ => None,
        }
    }

    /// Exact equality of the chosen and correct options.
    pub fn is_correct(&self) -> bool {
        match (&self.user_choice, &self.correct_choice) {
            (Some(user), Some(correct)) => user == correct,
            _ => false,
        }
    }
}

fn lenient_question<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|n| u32::try_from(n).ok()))
}

fn lenient_choice<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(choice) => Ok(Some(choice)),
        _ => Ok(None),
    }
}

/// Ordered mapping from level number to the questions in that level's band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelRanges(BTreeMap<Level, BTreeSet<u32>>);

impl LevelRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// `levels` consecutive bands of `per_level` questions, numbered from 1.
    pub fn uniform(levels: u32, per_level: u32) -> Self {
        let mut ranges = Self::new();
        for level in 1..=levels {
            let first = (level - 1) * per_level + 1;
            ranges.insert_range(level, first..=first + per_level - 1);
        }
        ranges
    }

    /// Add questions to a level's band.
    pub fn insert(&mut self, level: Level, questions: impl IntoIterator<Item = u32>) {
        self.0.entry(level).or_default().extend(questions);
    }

    pub fn insert_range(&mut self, level: Level, questions: RangeInclusive<u32>) {
        self.insert(level, questions);
    }

    pub fn band(&self, level: Level) -> Option<&BTreeSet<u32>> {
        self.0.get(&level)
    }

    /// Highest configured level.
    pub fn max_level(&self) -> Option<Level> {
        self.0.keys().next_back().copied()
    }

    /// The level whose band contains `question`.
    pub fn level_of(&self, question: u32) -> Option<Level> {
        self.0
            .iter()
            .find(|(_, band)| band.contains(&question))
            .map(|(level, _)| *level)
    }

    /// Bands in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &BTreeSet<u32>)> {
        self.0.iter().map(|(level, band)| (*level, band))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Level, BTreeSet<u32>)> for LevelRanges {
    fn from_iter<I: IntoIterator<Item = (Level, BTreeSet<u32>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Immutable snapshot of everything the assessor needs besides the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    /// Question bands per level.
    pub level_ranges: LevelRanges,
    /// Number of most recent in-band attempts judged per level.
    pub window_size: usize,
    /// A level is passed when the window holds strictly more correct answers.
    pub pass_threshold: usize,
}

pub const DEFAULT_LEVELS: u32 = 5;
pub const DEFAULT_QUESTIONS_PER_LEVEL: u32 = 5;
pub const DEFAULT_WINDOW_SIZE: usize = 5;
pub const DEFAULT_PASS_THRESHOLD: usize = 3;

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            level_ranges: LevelRanges::uniform(DEFAULT_LEVELS, DEFAULT_QUESTIONS_PER_LEVEL),
            window_size: DEFAULT_WINDOW_SIZE,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }
}

impl LevelConfig {
    pub fn new(level_ranges: LevelRanges, window_size: usize, pass_threshold: usize) -> Self {
        Self {
            level_ranges,
            window_size,
            pass_threshold,
        }
    }

    /// Build and validate a config from signed parameters, as they arrive
    /// from configuration files and environment variables.
    pub fn from_signed(
        level_ranges: LevelRanges,
        window_size: i64,
        pass_threshold: i64,
    ) -> Result<Self, ConfigError> {
        let config = Self::new(
            level_ranges,
            non_negative("window_size", window_size)?,
            non_negative("pass_threshold", pass_threshold)?,
        );
        config.validate()?;
        Ok(config)
    }

    /// Check that levels run 1, 2, 3, … without gaps and that every question
    /// number is positive and belongs to at most one level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level_ranges.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        let mut owner: HashMap<u32, Level> = HashMap::new();
        for (expected, (level, band)) in (1..).zip(self.level_ranges.iter()) {
            if level != expected {
                return Err(ConfigError::LevelGap {
                    expected,
                    found: level,
                });
            }
            for &question in band {
                if question == 0 {
                    return Err(ConfigError::InvalidQuestion { level, question });
                }
                if let Some(first) = owner.insert(question, level) {
                    return Err(ConfigError::OverlappingBands {
                        question,
                        first,
                        second: level,
                    });
                }
            }
        }
        Ok(())
    }

    /// Highest configured level. Never defaulted.
    pub fn max_level(&self) -> Result<Level, ConfigError> {
        self.level_ranges.max_level().ok_or(ConfigError::NoLevels)
    }
}

pub(crate) fn non_negative(field: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::Negative { field, value })
}
