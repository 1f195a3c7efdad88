// Drill configuration.
//
// All tunable numbers outside the theory tables live in `DrillConfig`,
// loaded from JSON. Missing fields take their defaults, so an empty object
// `{}` is a valid config. `validate()` runs on every load.
//
// Groups:
// - `session`: questions per quiz and misses allowed per question.
// - `recommender`: the `WeightPolicy` constants (see `recommend.rs`).
// - `seed`: fixed RNG seed for reproducible quizzes; `None` seeds from time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DrillError, Result};
use crate::recommend::WeightPolicy;

/// Quiz session parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Questions per (non-retry) session.
    pub limit: usize,
    /// Wrong attempts on one question before it is recorded as failed
    /// and the session moves on.
    pub max_misses: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            limit: 10,
            max_misses: 3,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    pub session: SessionSettings,
    pub recommender: WeightPolicy,
    pub seed: Option<u64>,
}

impl DrillConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DrillConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.limit == 0 {
            return Err(DrillError::Config("session.limit must be positive".into()));
        }
        if self.session.max_misses == 0 {
            return Err(DrillError::Config(
                "session.max_misses must be positive".into(),
            ));
        }
        self.recommender.validate()
    }
}
