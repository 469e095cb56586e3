use std::env;
use std::fmt;
use std::num::ParseIntError;

use crate::assessment::controls::DEFAULT_MAX_SUGGESTIONS;
use crate::assessment::scoring::{DEFAULT_GOVERNANCE_FLOOR, MIN_GOVERNANCE_FLOOR};
use crate::assessment::{EngineConfig, ResolverConfig, ScoringConfig};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub engine: EngineSettings,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let governance_floor = match env::var("GOVERNANCE_ADJUSTMENT_FLOOR") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|source| ConfigError::InvalidGovernanceFloor {
                    value: raw.clone(),
                    source: Some(source),
                })
                .and_then(|floor| {
                    if (MIN_GOVERNANCE_FLOOR..=0).contains(&floor) {
                        Ok(floor)
                    } else {
                        Err(ConfigError::InvalidGovernanceFloor {
                            value: raw.clone(),
                            source: None,
                        })
                    }
                })?,
            Err(_) => DEFAULT_GOVERNANCE_FLOOR,
        };

        let max_suggestions = match env::var("MAX_AI_SUGGESTIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|source| ConfigError::InvalidSuggestionCap { value: raw, source })?,
            Err(_) => DEFAULT_MAX_SUGGESTIONS,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            engine: EngineSettings {
                governance_floor,
                max_suggestions,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            scoring: ScoringConfig::new(self.engine.governance_floor),
            resolver: ResolverConfig {
                max_suggestions: self.engine.max_suggestions,
            },
        }
    }
}

/// Scoring and resolution dials read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub governance_floor: i32,
    pub max_suggestions: usize,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidGovernanceFloor {
        value: String,
        source: Option<ParseIntError>,
    },
    InvalidSuggestionCap {
        value: String,
        source: ParseIntError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGovernanceFloor { value, .. } => write!(
                f,
                "GOVERNANCE_ADJUSTMENT_FLOOR must be an integer between {MIN_GOVERNANCE_FLOOR} and 0, got '{value}'"
            ),
            ConfigError::InvalidSuggestionCap { value, .. } => {
                write!(f, "MAX_AI_SUGGESTIONS must be a non-negative integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidGovernanceFloor { source, .. } => {
                source.as_ref().map(|err| err as &(dyn std::error::Error + 'static))
            }
            ConfigError::InvalidSuggestionCap { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("GOVERNANCE_ADJUSTMENT_FLOOR");
        env::remove_var("MAX_AI_SUGGESTIONS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.engine.governance_floor, -7);
        assert_eq!(config.engine.max_suggestions, 5);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine_config(), EngineConfig::default());
    }

    #[test]
    fn reads_engine_dials() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("GOVERNANCE_ADJUSTMENT_FLOOR", "-3");
        env::set_var("MAX_AI_SUGGESTIONS", "2");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        let engine = config.engine_config();
        assert_eq!(engine.scoring.governance_floor(), -3);
        assert_eq!(engine.resolver.max_suggestions, 2);
    }

    #[test]
    fn rejects_positive_governance_floor() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GOVERNANCE_ADJUSTMENT_FLOOR", "4");
        let err = AppConfig::load().expect_err("positive floor rejected");
        reset_env();
        assert!(matches!(err, ConfigError::InvalidGovernanceFloor { source: None, .. }));
    }

    #[test]
    fn floor_range_matches_the_scorer() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GOVERNANCE_ADJUSTMENT_FLOOR", MIN_GOVERNANCE_FLOOR.to_string());
        let config = AppConfig::load().expect("lowest floor accepted");
        env::set_var(
            "GOVERNANCE_ADJUSTMENT_FLOOR",
            (MIN_GOVERNANCE_FLOOR - 1).to_string(),
        );
        let below = AppConfig::load();
        reset_env();

        assert_eq!(
            config.engine_config().scoring.governance_floor(),
            MIN_GOVERNANCE_FLOOR
        );
        assert!(below.is_err());
    }

    #[test]
    fn rejects_non_numeric_suggestion_cap() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MAX_AI_SUGGESTIONS", "plenty");
        let err = AppConfig::load().expect_err("cap rejected");
        reset_env();
        assert!(err.to_string().contains("plenty"));
    }
}
