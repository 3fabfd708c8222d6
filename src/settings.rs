//! Ledger settings (sloth-ledger.toml)

use crate::ledger::VersionStamps;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file name, looked up in the project root
pub const SETTINGS_FILE: &str = "sloth-ledger.toml";

/// Default log filter when neither RUST_LOG nor settings provide one
pub const DEFAULT_LOG_FILTER: &str = "sloth_ledger=info";

/// Project-level ledger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Directory holding ledger.json and config.sanitized.yaml
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Default cluster definition file
    #[serde(default = "default_cluster_config")]
    pub cluster_config: PathBuf,

    #[serde(default)]
    pub versions: VersionOverrides,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Optional overrides for build-time version stamps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".sloth/state")
}

fn default_cluster_config() -> PathBuf {
    PathBuf::from("cluster.yaml")
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            cluster_config: default_cluster_config(),
            versions: VersionOverrides::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl LedgerSettings {
    /// Load settings from sloth-ledger.toml; a missing file means defaults
    pub fn load(project_root: &Path) -> anyhow::Result<Self> {
        let settings_path = project_root.join(SETTINGS_FILE);
        if !settings_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&settings_path)?;
        let settings: LedgerSettings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to sloth-ledger.toml
    pub fn save(&self, project_root: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(project_root.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// State directory resolved against the project root
    pub fn state_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.state_dir)
    }

    /// Version stamps with settings overrides applied
    pub fn version_stamps(&self) -> VersionStamps {
        VersionStamps::default()
            .with_overrides(self.versions.engine.as_deref(), self.versions.schema.as_deref())
    }
}
