//! FileStateStore - ledger.json / config.sanitized.yaml on disk

use crate::models::cluster::ClusterConfig;
use crate::models::ledger::DeploymentRecord;
use crate::sanitizer::find_exposed_credentials;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Current ledger record, pretty JSON
pub const LEDGER_FILE: &str = "ledger.json";

/// Redacted cluster configuration, YAML
pub const SANITIZED_CONFIG_FILE: &str = "config.sanitized.yaml";

/// Durable storage for ledger records
pub trait StateStore {
    /// Previous record as stored text; empty when nothing was stored yet
    fn load_previous(&self) -> Result<String>;

    /// Persist a new record together with its sanitized configuration
    fn save(&self, record: &DeploymentRecord, sanitized: &ClusterConfig) -> Result<()>;
}

/// State store backed by a directory
#[derive(Debug, Clone)]
pub struct FileStateStore {
    state_dir: PathBuf,
}

impl FileStateStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    /// Get state directory
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.state_dir.join(LEDGER_FILE)
    }

    pub fn sanitized_config_path(&self) -> PathBuf {
        self.state_dir.join(SANITIZED_CONFIG_FILE)
    }

    /// Current record, strictly decoded; `None` when nothing was stored
    pub fn load_record(&self) -> Result<Option<DeploymentRecord>> {
        let content = self.load_previous()?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let record = DeploymentRecord::from_json(&content)
            .with_context(|| format!("Failed to parse {}", self.ledger_path().display()))?;
        Ok(Some(record))
    }

    /// Stored sanitized configuration, if any
    pub fn load_sanitized_config(&self) -> Result<Option<ClusterConfig>> {
        let path = self.sanitized_config_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = ClusterConfig::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(config))
    }

    /// Write through a sibling temp file so readers never see a partial file
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load_previous(&self) -> Result<String> {
        let path = self.ledger_path();
        if !path.exists() {
            return Ok(String::new());
        }

        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn save(&self, record: &DeploymentRecord, sanitized: &ClusterConfig) -> Result<()> {
        let exposed = find_exposed_credentials(sanitized);
        if !exposed.is_empty() {
            bail!(
                "Refusing to persist configuration with exposed credentials: {}",
                exposed.join(", ")
            );
        }

        std::fs::create_dir_all(&self.state_dir).with_context(|| {
            format!("Failed to create state directory {}", self.state_dir.display())
        })?;

        let ledger = record.to_json()?;
        let config = sanitized.to_yaml()?;

        // Config first: a ledger record must never point at a config that was not written
        self.write_atomic(&self.sanitized_config_path(), &config)?;
        self.write_atomic(&self.ledger_path(), &ledger)?;

        tracing::info!(
            deployment_id = %record.deployment_id,
            path = %self.ledger_path().display(),
            "stored ledger record"
        );
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MetadataBuilder;
    use crate::models::cluster::DigitalOceanProvider;
    use crate::sanitizer::sanitize_config;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, FileStateStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path().join(".sloth/state"));
        (temp_dir, store)
    }

    fn config_with_token() -> ClusterConfig {
        let mut config = ClusterConfig::new("prod-cluster");
        config.providers.digitalocean = Some(DigitalOceanProvider {
            enabled: true,
            token: "dop_v1_secret".to_string(),
            ..Default::default()
        });
        config
    }

    #[test]
    fn test_empty_store() {
        let (_temp, store) = setup_store();
        assert_eq!(store.load_previous().unwrap(), "");
        assert!(store.load_record().unwrap().is_none());
        assert!(store.load_sanitized_config().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let (_temp, store) = setup_store();
        let config = config_with_token();
        let record = MetadataBuilder::new().build(&config, "", 3, "manifest");

        store.save(&record, &sanitize_config(&config)).unwrap();

        assert_eq!(store.load_record().unwrap(), Some(record.clone()));
        assert_eq!(store.load_previous().unwrap(), record.to_json().unwrap());

        let stored_config = store.load_sanitized_config().unwrap().unwrap();
        assert_eq!(
            stored_config.providers.digitalocean.unwrap().token,
            "${DIGITALOCEAN_TOKEN}"
        );
        assert!(!store.state_dir().join("ledger.tmp").exists());
    }

    #[test]
    fn test_refuses_unsanitized_config() {
        let (_temp, store) = setup_store();
        let config = config_with_token();
        let record = MetadataBuilder::new().build(&config, "", 3, "manifest");

        let err = store.save(&record, &config).unwrap_err();
        assert!(err.to_string().contains("DIGITALOCEAN_TOKEN"));
        assert!(!store.ledger_path().exists());
    }

    #[test]
    fn test_corrupt_ledger() {
        let (_temp, store) = setup_store();
        std::fs::create_dir_all(store.state_dir()).unwrap();
        std::fs::write(store.ledger_path(), "{incomplete").unwrap();

        // Raw text is handed back as-is; only strict decoding fails
        assert_eq!(store.load_previous().unwrap(), "{incomplete");
        assert!(store.load_record().is_err());
    }
}
