use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure
///
/// All endpoint addresses and model identities live here and are passed into
/// the client constructors explicitly; nothing is read from module scope.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub agent: AgentConfig,
    pub detector: DetectorConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Model-management agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Base URL of the agent (e.g. "http://127.0.0.1:8602")
    pub endpoint: String,
    /// Name the model is loaded under
    pub model_name: String,
    /// On-device path the agent loads the model from
    pub model_path: String,
}

/// Anomaly-detection server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Named targets; the evaluate CLI selects one with --target.
    /// Each target pairs a server endpoint with the model it serves.
    pub targets: HashMap<String, DetectorTarget>,
}

/// One detection server endpoint and the model it serves
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorTarget {
    pub endpoint: String,
    pub model_id: String,
}

/// Evaluation run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Dataset subsets evaluated per run, each with its own accumulator.
    #[serde(default = "default_subsets")]
    pub subsets: Vec<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            subsets: default_subsets(),
        }
    }
}

fn default_subsets() -> Vec<String> {
    vec!["validation".to_string(), "training".to_string()]
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in EDGEVAL_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("EDGEVAL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.agent.endpoint.trim().is_empty() {
            anyhow::bail!("agent.endpoint must not be empty");
        }
        if self.agent.model_name.trim().is_empty() {
            anyhow::bail!("agent.model_name must not be empty");
        }
        if self.agent.model_path.trim().is_empty() {
            anyhow::bail!("agent.model_path must not be empty");
        }

        if self.detector.targets.is_empty() {
            anyhow::bail!(
                "detector.targets must name at least one target. Add a [detector.targets.<name>] section to config.toml."
            );
        }
        for (name, target) in &self.detector.targets {
            if target.endpoint.trim().is_empty() {
                anyhow::bail!("detector.targets.{}.endpoint must not be empty", name);
            }
            if target.model_id.trim().is_empty() {
                anyhow::bail!("detector.targets.{}.model_id must not be empty", name);
            }
        }

        if self.evaluation.subsets.is_empty() {
            anyhow::bail!("evaluation.subsets must name at least one subset");
        }

        Ok(())
    }

    /// Look up a detector target by name
    pub fn detector_target(&self, name: &str) -> Option<&DetectorTarget> {
        self.detector.targets.get(name)
    }
}
