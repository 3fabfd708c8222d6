//! Deployment Ledger
//!
//! Computes the versioned, hash-linked record of each applied deployment:
//! - Builder: first-deployment / scale / update state machine
//! - History: bounded newest-first list of past deployments
//! - Verify: lineage and manifest checks between consecutive records
//! - Clock: injectable time source

pub mod builder;
pub mod clock;
pub mod history;
pub mod verify;

pub use builder::MetadataBuilder;
pub use clock::{Clock, FixedClock, SystemClock};
pub use history::{prepend_history, MAX_HISTORY_ENTRIES};
pub use verify::{verify_lineage, verify_manifest};

/// Identity recorded as the actor of every change log entry
pub const ACTOR: &str = "sloth-kubernetes";

/// Current ledger schema version
pub const LEDGER_SCHEMA_VERSION: &str = "1.0";

/// Errors produced by the ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Failed to serialize ledger record: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to parse ledger record: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Parent state id mismatch: expected '{expected}', found '{found}'")]
    LineageBroken { expected: String, found: String },

    #[error("Config version chain broken: expected parent hash '{expected}', found '{found}'")]
    ConfigChainBroken { expected: String, found: String },

    #[error("Checksum mismatch: expected '{expected}', found '{found}'")]
    ChecksumMismatch { expected: String, found: String },

    #[error("Deployment count not incremented: previous {previous}, current {current}")]
    CountNotIncremented { previous: u64, current: u64 },

    #[error("createdAt changed between deployments")]
    CreatedAtChanged,

    #[error("History does not start with the previous deployment '{0}'")]
    HistoryMismatch(String),
}

/// Version metadata stamped into every record
///
/// Defaults come from the build: the crate version for the orchestrator and
/// `SLOTH_ENGINE_VERSION` (read at compile time) for the provisioning engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStamps {
    pub system_version: String,
    pub engine_version: String,
    pub schema_version: String,
}

impl Default for VersionStamps {
    fn default() -> Self {
        Self {
            system_version: env!("CARGO_PKG_VERSION").to_string(),
            engine_version: option_env!("SLOTH_ENGINE_VERSION")
                .unwrap_or("unknown")
                .to_string(),
            schema_version: LEDGER_SCHEMA_VERSION.to_string(),
        }
    }
}

impl VersionStamps {
    /// Apply optional overrides (from settings)
    pub fn with_overrides(mut self, engine: Option<&str>, schema: Option<&str>) -> Self {
        if let Some(engine) = engine {
            self.engine_version = engine.to_string();
        }
        if let Some(schema) = schema {
            self.schema_version = schema.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_versions_come_from_build() {
        let versions = VersionStamps::default();
        assert_eq!(versions.system_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(versions.schema_version, LEDGER_SCHEMA_VERSION);
        assert!(!versions.engine_version.is_empty());
    }

    #[test]
    fn test_version_overrides() {
        let versions = VersionStamps::default().with_overrides(Some("3.112.0"), None);
        assert_eq!(versions.engine_version, "3.112.0");
        assert_eq!(versions.schema_version, LEDGER_SCHEMA_VERSION);
    }
}
