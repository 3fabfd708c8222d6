//! Deployment Ledger Types
//!
//! Defines the persisted record written after every applied deployment:
//! - DeploymentRecord (the current ledger entry)
//! - ChangeLogEntry (what changed in this deployment)
//! - DeploymentHistoryEntry (compact summary of a past deployment)
//! - ConfigVersion (hash-linked configuration chain)
//!
//! Field names are lowerCamelCase on the wire. Every field defaults, so a
//! structurally valid but partial record still decodes.

use crate::ledger::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Deployment Record
// =============================================================================

/// One applied deployment; superseded (never mutated) by the next one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentRecord {
    /// Set on the first deployment and never changed afterwards
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_deployed_at: Option<DateTime<Utc>>,

    /// `deploy-{count}-{YYYY-MM-DD}`
    pub deployment_id: String,
    pub deployment_count: u64,
    pub last_scale_operation: ScaleOperation,

    pub previous_node_count: i64,
    pub current_node_count: i64,

    pub node_pools_added: Vec<String>,
    pub node_pools_removed: Vec<String>,
    pub node_pools_scaled: Vec<String>,

    /// Orchestrator version
    pub system_version: String,
    /// Provisioning engine version
    pub engine_version: String,
    /// Ledger schema version
    pub schema_version: String,

    /// SHA-256 of the manifest text
    pub config_checksum: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_version: Option<ConfigVersion>,

    /// `state-{deploymentId}-{first 8 hex of configChecksum}`
    pub state_snapshot_id: String,
    pub parent_state_id: String,

    pub change_log: Vec<ChangeLogEntry>,
    /// Newest first, at most `MAX_HISTORY_ENTRIES`
    pub previous_deployments: Vec<DeploymentHistoryEntry>,
}

impl DeploymentRecord {
    /// Whether this is a real record (as opposed to the zero value)
    pub fn is_initialized(&self) -> bool {
        self.created_at.is_some()
    }

    /// Strict decode; fails on anything that is not a record object
    pub fn from_json(content: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(content).map_err(LedgerError::Parse)
    }

    /// Lenient decode: any failure yields the zero-valued record
    ///
    /// Empty text, `null`, arrays, scalars and truncated JSON all map to
    /// `DeploymentRecord::default()`.
    pub fn from_json_lenient(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::default();
        }

        match Self::from_json(content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "previous ledger record is unreadable, starting a new ledger"
                );
                Self::default()
            }
        }
    }

    /// Encode as pretty JSON; failures are surfaced, never replaced by `{}`
    pub fn to_json(&self) -> Result<String, LedgerError> {
        serde_json::to_string_pretty(self).map_err(LedgerError::Serialize)
    }

    /// Hash of the config this record's config version chain points at
    pub fn config_hash(&self) -> Option<&str> {
        self.config_version.as_ref().map(|v| v.config_hash.as_str())
    }
}

/// Classification of a deployment relative to the previous one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleOperation {
    #[default]
    Initial,
    ScaleUp,
    ScaleDown,
    Update,
}

impl ScaleOperation {
    /// Classify a node-count transition on a subsequent deployment
    pub fn classify(previous: i64, current: i64) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => ScaleOperation::ScaleUp,
            std::cmp::Ordering::Less => ScaleOperation::ScaleDown,
            std::cmp::Ordering::Equal => ScaleOperation::Update,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleOperation::Initial => "initial",
            ScaleOperation::ScaleUp => "scale-up",
            ScaleOperation::ScaleDown => "scale-down",
            ScaleOperation::Update => "update",
        }
    }
}

impl fmt::Display for ScaleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Change Log
// =============================================================================

/// A single change recorded for a deployment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeLogEntry {
    pub change_type: ChangeType,
    pub resource_id: String,
    pub description: String,
    /// Empty when there is no prior value
    pub old_value: String,
    pub new_value: String,
    pub actor: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Kind of change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    #[default]
    ClusterCreated,
    PoolAdded,
    ScaleUp,
    ScaleDown,
    ConfigUpdated,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeType::ClusterCreated => "cluster_created",
            ChangeType::PoolAdded => "pool_added",
            ChangeType::ScaleUp => "scale_up",
            ChangeType::ScaleDown => "scale_down",
            ChangeType::ConfigUpdated => "config_updated",
        };
        f.write_str(s)
    }
}

// =============================================================================
// History & Config Version
// =============================================================================

/// Compact summary of a past deployment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentHistoryEntry {
    pub deployment_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub node_count: i64,
    pub config_checksum: String,
    pub schema_version: String,
    /// No failure path is recorded yet, so always true
    pub success: bool,
    pub error_message: String,
}

impl DeploymentHistoryEntry {
    /// Summarize a record that is about to be superseded
    pub fn summarize(record: &DeploymentRecord) -> Self {
        Self {
            deployment_id: record.deployment_id.clone(),
            timestamp: record.last_deployed_at,
            node_count: record.current_node_count,
            config_checksum: record.config_checksum.clone(),
            schema_version: record.schema_version.clone(),
            success: true,
            error_message: String::new(),
        }
    }
}

/// Link in the configuration hash chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigVersion {
    pub config_hash: String,
    /// Previous record's `configHash`, empty at the chain start
    pub parent_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_decode_malformed_inputs() {
        for input in ["", "   ", "not-json", "{incomplete", "null", "[]", "12345", "\"s\""] {
            let record = DeploymentRecord::from_json_lenient(input);
            assert_eq!(record, DeploymentRecord::default(), "input: {:?}", input);
            assert!(!record.is_initialized());
        }
    }

    #[test]
    fn test_strict_decode_rejects_non_objects() {
        assert!(DeploymentRecord::from_json("[]").is_err());
        assert!(DeploymentRecord::from_json("null").is_err());
        assert!(DeploymentRecord::from_json("{}").is_ok());
    }

    #[test]
    fn test_partial_record_decodes_with_defaults() {
        let record = DeploymentRecord::from_json(
            r#"{"deploymentCount": 4, "currentNodeCount": 3, "stateSnapshotId": "state-x"}"#,
        )
        .unwrap();
        assert_eq!(record.deployment_count, 4);
        assert_eq!(record.current_node_count, 3);
        assert!(record.created_at.is_none());
        assert!(record.config_version.is_none());
        assert!(record.previous_deployments.is_empty());
    }

    #[test]
    fn test_wire_names() {
        let record = DeploymentRecord {
            deployment_id: "deploy-1-2026-10-18".to_string(),
            last_scale_operation: ScaleOperation::ScaleDown,
            config_version: Some(ConfigVersion {
                config_hash: "abc".to_string(),
                parent_hash: String::new(),
            }),
            change_log: vec![ChangeLogEntry {
                change_type: ChangeType::ConfigUpdated,
                ..Default::default()
            }],
            ..Default::default()
        };
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

        for key in [
            "createdAt",
            "deploymentId",
            "configChecksum",
            "stateSnapshotId",
            "parentStateId",
            "changeLog",
            "previousDeployments",
            "configVersion",
            "nodePoolsAdded",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["lastScaleOperation"], "scale-down");
        assert_eq!(value["changeLog"][0]["changeType"], "config_updated");
        assert_eq!(value["configVersion"]["parentHash"], "");
    }

    #[test]
    fn test_change_log_entry_emits_every_field() {
        let entry = ChangeLogEntry {
            change_type: ChangeType::ClusterCreated,
            resource_id: "prod".to_string(),
            description: "Cluster prod created with 3 nodes".to_string(),
            new_value: "3".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&entry).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                "actor",
                "changeType",
                "description",
                "newValue",
                "oldValue",
                "resourceId",
                "timestamp"
            ]
        );
        assert_eq!(value["oldValue"], "");
    }

    #[test]
    fn test_created_at_normalized_to_utc() {
        let record =
            DeploymentRecord::from_json(r#"{"createdAt": "2026-10-01T00:00:00+02:00"}"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["createdAt"], "2026-09-30T22:00:00Z");
    }

    #[test]
    fn test_unparseable_created_at_discards_record() {
        let input = r#"{"createdAt": "yesterday", "deploymentCount": 7}"#;
        assert!(DeploymentRecord::from_json(input).is_err());
        assert_eq!(DeploymentRecord::from_json_lenient(input), DeploymentRecord::default());
    }

    #[test]
    fn test_scale_classification() {
        assert_eq!(ScaleOperation::classify(3, 7), ScaleOperation::ScaleUp);
        assert_eq!(ScaleOperation::classify(7, 3), ScaleOperation::ScaleDown);
        assert_eq!(ScaleOperation::classify(3, 3), ScaleOperation::Update);
        assert_eq!(ScaleOperation::classify(0, -1), ScaleOperation::ScaleDown);
    }

    #[test]
    fn test_summarize_record() {
        let record = DeploymentRecord {
            deployment_id: "deploy-2-2026-10-01".to_string(),
            current_node_count: 5,
            config_checksum: "ff".to_string(),
            schema_version: "1.0".to_string(),
            ..Default::default()
        };
        let entry = DeploymentHistoryEntry::summarize(&record);
        assert_eq!(entry.deployment_id, "deploy-2-2026-10-01");
        assert_eq!(entry.node_count, 5);
        assert!(entry.success);
        assert!(entry.error_message.is_empty());
    }
}
