use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CorralError, CorralResult};

/// Default management tool binary
pub const DEFAULT_TOOL: &str = "cf";

/// Configuration for Corral test environments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorralConfig {
    /// Prefix for generated organization/space/quota names
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    /// Partition identifier for parallel runs (single digit)
    #[serde(default = "default_shard_index")]
    pub shard_index: u8,
    /// Multiplier applied to the one-minute per-step timeout
    #[serde(default = "default_timeout_scale")]
    pub timeout_scale: f64,
    /// Reuse an organization owned by another process
    #[serde(default)]
    pub use_existing_organization: bool,
    /// Name of the reused organization
    #[serde(default)]
    pub existing_organization: Option<String>,
    /// Fixed organization name for the persistent environment
    #[serde(default)]
    pub persistent_environment_org: String,
    /// Fixed space name for the persistent environment
    #[serde(default)]
    pub persistent_environment_space: String,
    /// Fixed quota name for the persistent environment
    #[serde(default)]
    pub persistent_environment_quota: String,
    /// Total-memory limit for the persistent quota, e.g. "20G"
    #[serde(default)]
    pub persistent_environment_quota_limit: Option<String>,
    /// Management tool binary invoked for every step
    #[serde(default = "default_tool_binary")]
    pub tool_binary: String,
}

fn default_name_prefix() -> String {
    "CORRAL".to_string()
}

fn default_shard_index() -> u8 {
    1
}

fn default_timeout_scale() -> f64 {
    1.0
}

fn default_tool_binary() -> String {
    DEFAULT_TOOL.to_string()
}

impl Default for CorralConfig {
    fn default() -> Self {
        Self {
            name_prefix: default_name_prefix(),
            shard_index: default_shard_index(),
            timeout_scale: default_timeout_scale(),
            use_existing_organization: false,
            existing_organization: None,
            persistent_environment_org: String::new(),
            persistent_environment_space: String::new(),
            persistent_environment_quota: String::new(),
            persistent_environment_quota_limit: None,
            tool_binary: default_tool_binary(),
        }
    }
}

impl CorralConfig {
    /// Create a new configuration with the given name prefix
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CorralResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        if config.timeout_scale <= 0.0 {
            tracing::debug!(
                timeout_scale = config.timeout_scale,
                "non-positive timeout scale, falling back to 1.0"
            );
            config.timeout_scale = default_timeout_scale();
        }
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> CorralResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> CorralResult<()> {
        if self.name_prefix.is_empty() {
            return Err(CorralError::config("name prefix must not be empty"));
        }

        if self.shard_index > 9 {
            return Err(CorralError::config(format!(
                "shard index must be a single digit, got {}",
                self.shard_index
            )));
        }

        if self.timeout_scale <= 0.0 {
            return Err(CorralError::config(format!(
                "timeout scale must be positive, got {}",
                self.timeout_scale
            )));
        }

        if self.use_existing_organization
            && self
                .existing_organization
                .as_deref()
                .unwrap_or("")
                .is_empty()
        {
            return Err(CorralError::config(
                "existing organization requested but no organization name configured",
            ));
        }

        if self.tool_binary.is_empty() {
            return Err(CorralError::config("tool binary must not be empty"));
        }

        Ok(())
    }

    /// Per-step timeout: one minute scaled by `timeout_scale`
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(60).mul_f64(self.timeout_scale)
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn tool_binary(&self) -> &str {
        &self.tool_binary
    }
}
