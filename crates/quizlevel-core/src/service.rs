//! Level service.
//!
//! Ties a [`HistorySource`] to the current [`LevelConfig`] and answers
//! "which level is this learner at?" by username.

use std::sync::{Arc, RwLock};

use crate::assessor::{self, Assessment};
use crate::error::{ConfigError, LevelError};
use crate::model::{Level, LevelConfig};
use crate::traits::HistorySource;

/// Computes learner levels from a history source and a swappable config.
pub struct LevelService {
    source: Arc<dyn HistorySource>,
    config: RwLock<Arc<LevelConfig>>,
}

impl LevelService {
    /// Create a service. The configuration is validated up front.
    pub fn new(source: Arc<dyn HistorySource>, config: LevelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            config: RwLock::new(Arc::new(config)),
        })
    }

    /// The configuration new calls will use.
    pub fn config(&self) -> Arc<LevelConfig> {
        let guard = self
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a new configuration. Calls already running keep their snapshot.
    pub fn replace_config(&self, config: LevelConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let mut guard = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::info!(
            max_level = ?config.max_level().ok(),
            window_size = config.window_size,
            pass_threshold = config.pass_threshold,
            "level config replaced"
        );
        *guard = Arc::new(config);
        Ok(())
    }

    /// Current level for `username`.
    pub async fn compute_level(&self, username: &str) -> Result<Level, LevelError> {
        self.assess(username).await.map(|a| a.level)
    }

    /// Current level for `username` with the per-level breakdown.
    pub async fn assess(&self, username: &str) -> Result<Assessment, LevelError> {
        let config = self.config();
        let history = self
            .source
            .history(username)
            .await
            .map_err(|source| LevelError::History {
                username: username.to_string(),
                source,
            })?;

        let assessment = assessor::assess(&history, &config)?;
        tracing::debug!(
            username,
            source = self.source.name(),
            attempts = history.len(),
            level = assessment.level,
            "assessed learner"
        );
        Ok(assessment)
    }
}
