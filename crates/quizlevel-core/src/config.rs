//! Level configuration files.
//!
//! Loads a [`LevelConfig`] from TOML, applies environment overrides, and
//! reports non-fatal issues with a configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::{
    LevelConfig, LevelRanges, DEFAULT_LEVELS, DEFAULT_PASS_THRESHOLD, DEFAULT_QUESTIONS_PER_LEVEL,
    DEFAULT_WINDOW_SIZE,
};

/// Environment variable overriding `assessment.window_size`.
pub const WINDOW_SIZE_ENV: &str = "QUIZLEVEL_WINDOW_SIZE";
/// Environment variable overriding `assessment.pass_threshold`.
pub const PASS_THRESHOLD_ENV: &str = "QUIZLEVEL_PASS_THRESHOLD";

/// Intermediate TOML structure for level configuration files.
#[derive(Debug, Deserialize)]
struct TomlLevelFile {
    #[serde(default)]
    assessment: TomlAssessment,
    #[serde(default)]
    levels: Vec<TomlLevel>,
}

#[derive(Debug, Deserialize)]
struct TomlAssessment {
    #[serde(default = "default_window_size")]
    window_size: i64,
    #[serde(default = "default_pass_threshold")]
    pass_threshold: i64,
}

impl Default for TomlAssessment {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            pass_threshold: default_pass_threshold(),
        }
    }
}

fn default_window_size() -> i64 {
    DEFAULT_WINDOW_SIZE as i64
}

fn default_pass_threshold() -> i64 {
    DEFAULT_PASS_THRESHOLD as i64
}

#[derive(Debug, Deserialize)]
struct TomlLevel {
    level: u32,
    /// First question of an inclusive range.
    #[serde(default)]
    from: Option<u32>,
    /// Last question of an inclusive range.
    #[serde(default)]
    to: Option<u32>,
    #[serde(default)]
    questions: Vec<u32>,
}

/// Parse a TOML string into a validated `LevelConfig`.
///
/// A file with no `[[levels]]` gets the default bands.
pub fn parse_config_str(content: &str, source_path: &Path) -> Result<LevelConfig> {
    let parsed: TomlLevelFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let level_ranges = if parsed.levels.is_empty() {
        LevelRanges::uniform(DEFAULT_LEVELS, DEFAULT_QUESTIONS_PER_LEVEL)
    } else {
        build_ranges(parsed.levels)?
    };

    let config = LevelConfig::from_signed(
        level_ranges,
        parsed.assessment.window_size,
        parsed.assessment.pass_threshold,
    )
    .with_context(|| format!("invalid level configuration: {}", source_path.display()))?;

    Ok(config)
}

fn build_ranges(levels: Vec<TomlLevel>) -> Result<LevelRanges, ConfigError> {
    let mut ranges = LevelRanges::new();
    for entry in levels {
        match (entry.from, entry.to) {
            (Some(from), Some(to)) if from > to => {
                return Err(ConfigError::InvalidRange {
                    level: entry.level,
                    from,
                    to,
                });
            }
            (Some(from), Some(to)) => ranges.insert_range(entry.level, from..=to),
            (Some(single), None) | (None, Some(single)) => {
                ranges.insert(entry.level, [single])
            }
            (None, None) => {}
        }
        ranges.insert(entry.level, entry.questions);
    }
    Ok(ranges)
}

/// Parse a single TOML file into a `LevelConfig`.
pub fn parse_config_file(path: &Path) -> Result<LevelConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    parse_config_str(&content, path)
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizlevel.toml` in the current directory
/// 2. `~/.config/quizlevel/config.toml`
/// 3. built-in defaults
///
/// Environment variable overrides: `QUIZLEVEL_WINDOW_SIZE`,
/// `QUIZLEVEL_PASS_THRESHOLD`.
pub fn load_config() -> Result<LevelConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LevelConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizlevel.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading level config from {}", path.display());
            parse_config_file(&path)?
        }
        None => LevelConfig::default(),
    };

    apply_env_overrides(config)
}

fn apply_env_overrides(config: LevelConfig) -> Result<LevelConfig> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Apply window/threshold overrides looked up by variable name.
fn apply_overrides(
    mut config: LevelConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LevelConfig> {
    if let Some(value) = parse_override(WINDOW_SIZE_ENV, lookup(WINDOW_SIZE_ENV))? {
        config.window_size = crate::model::non_negative("window_size", value)?;
    }
    if let Some(value) = parse_override(PASS_THRESHOLD_ENV, lookup(PASS_THRESHOLD_ENV))? {
        config.pass_threshold = crate::model::non_negative("pass_threshold", value)?;
    }
    Ok(config)
}

fn parse_override(name: &str, raw: Option<String>) -> Result<Option<i64>> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be an integer, got '{raw}'")),
        None => Ok(None),
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizlevel"))
}

/// A non-fatal issue found in a level configuration.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The level concerned (if applicable).
    pub level: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Check a configuration for settings that are legal but likely mistakes.
pub fn validate_config(config: &LevelConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if config.window_size == 0 {
        warnings.push(ValidationWarning {
            level: None,
            message: "window_size is 0, no level can ever be passed".into(),
        });
    } else if config.pass_threshold >= config.window_size {
        warnings.push(ValidationWarning {
            level: None,
            message: format!(
                "pass_threshold {} is not below window_size {}, no level can ever be passed",
                config.pass_threshold, config.window_size
            ),
        });
    }

    for (level, band) in config.level_ranges.iter() {
        if band.is_empty() {
            warnings.push(ValidationWarning {
                level: Some(level),
                message: "band has no questions, learners cannot progress past it".into(),
            });
        } else if band.len() < config.window_size {
            warnings.push(ValidationWarning {
                level: Some(level),
                message: format!(
                    "band has {} questions but window_size is {}, repeats are needed to fill the window",
                    band.len(),
                    config.window_size
                ),
            });
        }
    }

    warnings
}
