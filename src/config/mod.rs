//! Configuration for the prompt compiler runtime.

use crate::types::CompileError;
use serde::{Deserialize, Serialize};

/// Complete compiler configuration.
///
/// Read-only after startup; independent pipeline runs share it freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Minimum scalar score that ends the loop successfully.
    pub score_threshold: f64,
    /// Additional optimization attempts after the first (total attempts are
    /// `max_retries + 1`).
    pub max_retries: u32,
    /// Consecutive non-improving attempts tolerated before early stop.
    pub early_stop_patience: u32,
    /// Scoring strategy name resolved through `scoring::strategy_for`.
    pub scoring_strategy: String,
    pub roles: RolesConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.9,
            max_retries: 3,
            early_stop_patience: 2,
            scoring_strategy: "weighted".to_string(),
            roles: RolesConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl CompilerConfig {
    /// Load configuration from `promptc.toml` (optional) layered with
    /// `PROMPTC_*` environment variables, falling back to defaults for
    /// anything unset.
    pub fn load() -> Result<Self, CompileError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("promptc").required(false))
            .add_source(config::Environment::with_prefix("PROMPTC").separator("__"))
            .build()
            .map_err(|e| invalid_config(&e))?;

        // An empty source set deserializes into full defaults thanks to
        // `serde(default)` on every block.
        settings.try_deserialize().map_err(|e| invalid_config(&e))
    }
}

fn invalid_config(err: &config::ConfigError) -> CompileError {
    tracing::error!("Failed to load compiler configuration: {}", err);
    CompileError::InvalidConfig(err.to_string())
}

/// Which provider/model each LLM-backed role runs on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    pub decompiler: RoleConfig,
    pub architect: RoleConfig,
    pub judge: RoleConfig,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            decompiler: RoleConfig::new("gemini", "gemini-2.5-pro"),
            architect: RoleConfig::new("openai", "gpt-4.1"),
            judge: RoleConfig::new("openai", "gpt-4o"),
        }
    }
}

/// One role's provider/model binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    pub provider: String,
    pub model: String,
}

impl RoleConfig {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub metrics_enabled: bool,
    pub tracing_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            metrics_enabled: true,
            tracing_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_loop_parameters() {
        let config = CompilerConfig::default();
        assert_eq!(config.score_threshold, 0.9);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.early_stop_patience, 2);
        assert_eq!(config.scoring_strategy, "weighted");
        assert_eq!(config.roles.judge.model, "gpt-4o");
    }

    #[test]
    fn partial_toml_overlays_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "score_threshold = 0.8\n[roles.architect]\nprovider = \"anthropic\"\nmodel = \"claude-sonnet-4\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: CompilerConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.score_threshold, 0.8);
        assert_eq!(config.roles.architect.provider, "anthropic");
        // Untouched blocks keep their defaults.
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.roles.judge.provider, "openai");
    }
}
