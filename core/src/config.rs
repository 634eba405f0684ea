//! Flow configuration.
//!
//! Loaded from TOML or from `FLOWCTL_*` environment variables:
//!
//! - `FLOWCTL_LABEL`: name used in log spans
//! - `FLOWCTL_RECORD_LOOP_RESULTS`: `1|true|yes` to record loop results
//! - `FLOWCTL_CATCH_PANICS`: `0|false|no` to let step panics unwind

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

const ENV_LABEL: &str = "FLOWCTL_LABEL";
const ENV_RECORD_LOOP_RESULTS: &str = "FLOWCTL_RECORD_LOOP_RESULTS";
const ENV_CATCH_PANICS: &str = "FLOWCTL_CATCH_PANICS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Name of the flow in log spans.
    pub label: Option<String>,
    /// Record the last iteration's result of each `while` item.
    ///
    /// Off by default: loops run for their side effects.
    pub record_loop_results: bool,
    /// Turn panics inside steps into [`FlowError::Panicked`](crate::FlowError::Panicked).
    pub catch_panics: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            label: None,
            record_loop_results: false,
            catch_panics: true,
        }
    }
}

impl FlowConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `FLOWCTL_*` variables on top of this configuration.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(label) = std::env::var(ENV_LABEL) {
            self.label = Some(label);
        }
        if let Ok(value) = std::env::var(ENV_RECORD_LOOP_RESULTS) {
            self.record_loop_results = parse_flag(ENV_RECORD_LOOP_RESULTS, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_CATCH_PANICS) {
            self.catch_panics = parse_flag(ENV_CATCH_PANICS, &value)?;
        }
        Ok(self)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn record_loop_results(mut self, record: bool) -> Self {
        self.record_loop_results = record;
        self
    }

    pub fn catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
