//! quizlevel-core — adaptive level assessment for quiz learners.
//!
//! This crate defines the attempt and configuration model, the level
//! assessor, and the service that computes a learner's level from a
//! history source.

pub mod assessor;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod service;
pub mod traits;

pub use assessor::{assess, compute_level, Assessment, LevelOutcome};
pub use error::{ConfigError, LevelError};
pub use model::{Attempt, Level, LevelConfig, LevelRanges};
