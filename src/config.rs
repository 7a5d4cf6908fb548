use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use crate::workflow::controller::WorkflowSettings;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "record-workflow.toml";

/// Main configuration structure for the record workflow
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RecordWorkflowConfig {
    /// Navigation targets
    #[serde(default)]
    pub workflow: WorkflowSettings,
    /// Logging settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Fixture backing the CLI stores
    #[serde(default)]
    pub fixture: FixtureConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level or filter directive
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FixtureConfig {
    /// JSON file with `records` and `branches`
    pub path: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            path: "record-workflow.json".to_string(),
        }
    }
}

impl RecordWorkflowConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (record-workflow.toml, or `path` when given)
    /// 3. Environment variables (RECORD_WORKFLOW__SECTION__KEY)
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path));
            }
            None => {
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("RECORD_WORKFLOW")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<RecordWorkflowConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        RecordWorkflowConfig::load_env_file()?;
        RecordWorkflowConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static RecordWorkflowConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
