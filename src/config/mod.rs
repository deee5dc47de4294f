//! Machine configuration.
//!
//! A [`MachineConfig`] can be built in code with chained setters or loaded
//! from JSON. Every field has a default, so a config file only names what it
//! changes.
//!
//! # Example
//!
//! ```rust
//! use cadence::config::MachineConfig;
//!
//! let config = MachineConfig::from_json(r#"{ "name": "traffic", "max_steps": 20 }"#).unwrap();
//! assert_eq!(config.name, "traffic");
//! assert_eq!(config.max_steps, Some(20));
//! assert_eq!(config.history_limit, MachineConfig::default().history_limit);
//!
//! let config = MachineConfig::new().named("lamp").history_limit(8);
//! assert_eq!(config.history_limit, 8);
//! ```

use crate::core::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub mod error;

pub use error::ConfigError;

/// Name used in log lines when none is configured.
pub const DEFAULT_MACHINE_NAME: &str = "state-machine";

/// Settings for a [`StateMachine`](crate::machine::StateMachine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Origin attached to every log line the machine emits
    pub name: String,

    /// Number of transitions kept in the history (0 disables it)
    pub history_limit: usize,

    /// Upper bound on steps per `run` call; `None` runs until stopped
    pub max_steps: Option<u64>,

    /// Log each transition at info level rather than debug
    pub log_transitions: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MACHINE_NAME.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_steps: None,
            log_transitions: true,
        }
    }
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set how many transitions the history keeps
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Bound the number of steps a single `run` call may take
    pub fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Choose whether transitions are logged at info level
    pub fn log_transitions(mut self, enabled: bool) -> Self {
        self.log_transitions = enabled;
        self
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.check()
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    fn check(self) -> Result<Self, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name must not be empty".to_string()));
        }
        if self.max_steps == Some(0) {
            return Err(ConfigError::Invalid(
                "max_steps must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = MachineConfig::from_json("{}").unwrap();
        assert_eq!(config, MachineConfig::default());
        assert!(config.log_transitions);
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn setters_chain() {
        let config = MachineConfig::new()
            .named("signal")
            .history_limit(4)
            .max_steps(10)
            .log_transitions(false);

        assert_eq!(config.name, "signal");
        assert_eq!(config.history_limit, 4);
        assert_eq!(config.max_steps, Some(10));
        assert!(!config.log_transitions);
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = MachineConfig::from_json(r#"{ "name": "  " }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_step_limit_is_rejected() {
        let result = MachineConfig::from_json(r#"{ "max_steps": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = MachineConfig::from_json("{ name: ");
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = MachineConfig::from_path("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::ReadFailed(_))));
    }

    #[test]
    fn json_round_trip() {
        let config = MachineConfig::new().named("lamp").max_steps(5);
        let json = config.to_json().unwrap();
        assert_eq!(MachineConfig::from_json(&json).unwrap(), config);
    }
}
