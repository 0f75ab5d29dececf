use serde::{Deserialize, Serialize};
use water_core::{
    CostModel, EstimateMode, Estimator, LEGACY_WATER_PER_CHAR_ML, MAX_HISTORY, WATER_PER_TOKEN_ML,
};

use crate::error::{AppError, Result};

const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModelKind {
    #[default]
    PerToken,
    PerCharacter,
}

/// Estimation and retention settings, read from the `[tracker]` table of
/// the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub cost_model: CostModelKind,
    pub water_per_token_ml: f64,
    pub water_per_char_ml: f64,
    pub estimate_mode: EstimateMode,
    pub max_history: usize,
    pub event_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            cost_model: CostModelKind::default(),
            water_per_token_ml: WATER_PER_TOKEN_ML,
            water_per_char_ml: LEGACY_WATER_PER_CHAR_ML,
            estimate_mode: EstimateMode::default(),
            max_history: MAX_HISTORY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl TrackerConfig {
    pub fn cost_model(&self) -> CostModel {
        match self.cost_model {
            CostModelKind::PerToken => CostModel::PerToken {
                ml_per_token: self.water_per_token_ml,
            },
            CostModelKind::PerCharacter => CostModel::PerCharacter {
                ml_per_char: self.water_per_char_ml,
            },
        }
    }

    pub fn estimator(&self) -> Estimator {
        Estimator::new(self.cost_model())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("water_per_token_ml", self.water_per_token_ml),
            ("water_per_char_ml", self.water_per_char_ml),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.max_history == 0 {
            return Err(AppError::Config("max_history must be at least 1".to_string()));
        }
        if self.event_capacity == 0 {
            return Err(AppError::Config(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_token_rate() {
        let config = TrackerConfig::default();
        assert_eq!(
            config.cost_model(),
            CostModel::PerToken {
                ml_per_token: 0.18
            }
        );
        assert_eq!(config.max_history, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn per_character_model_uses_char_rate() {
        let config = TrackerConfig {
            cost_model: CostModelKind::PerCharacter,
            water_per_char_ml: 0.5,
            ..TrackerConfig::default()
        };
        assert_eq!(
            config.cost_model(),
            CostModel::PerCharacter { ml_per_char: 0.5 }
        );
    }

    #[test]
    fn validate_rejects_bad_values() {
        let negative = TrackerConfig {
            water_per_token_ml: -0.1,
            ..TrackerConfig::default()
        };
        assert!(matches!(negative.validate(), Err(AppError::Config(_))));

        let infinite = TrackerConfig {
            water_per_char_ml: f64::INFINITY,
            ..TrackerConfig::default()
        };
        assert!(infinite.validate().is_err());

        let no_history = TrackerConfig {
            max_history: 0,
            ..TrackerConfig::default()
        };
        assert!(no_history.validate().is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"estimate_mode":"single_text","water_per_token_ml":0.2}"#)
                .expect("parse");
        assert_eq!(config.estimate_mode, EstimateMode::SingleText);
        assert_eq!(config.water_per_token_ml, 0.2);
        assert_eq!(config.max_history, 1000);
    }
}
