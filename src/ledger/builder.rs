//! Deployment metadata builder
//!
//! Given the previous ledger record (as stored text) and the facts of the
//! current apply, produces the next record. The branch is decided solely by
//! whether the decoded previous record has a `createdAt`:
//! - absent (no record, malformed record, empty object) => first deployment
//! - present => subsequent deployment (scale-up, scale-down or update)

use super::clock::{Clock, SystemClock};
use super::history::prepend_history;
use super::{VersionStamps, ACTOR};
use crate::checksum::{fingerprint, ChecksumAlgorithm, Sha256Checksum};
use crate::models::cluster::ClusterConfig;
use crate::models::ledger::{
    ChangeLogEntry, ChangeType, ConfigVersion, DeploymentHistoryEntry, DeploymentRecord,
    ScaleOperation,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Checksum of record for change detection
const RECORD_CHECKSUM: &dyn ChecksumAlgorithm = &Sha256Checksum;

/// Length of the checksum fingerprint embedded in snapshot ids
const SNAPSHOT_FINGERPRINT_LEN: usize = 8;

/// Builds ledger records; holds no state beyond its clock and version stamps
#[derive(Debug, Clone)]
pub struct MetadataBuilder<C = SystemClock> {
    clock: C,
    versions: VersionStamps,
}

impl MetadataBuilder<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MetadataBuilder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MetadataBuilder<C> {
    /// Builder with an explicit time source
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            versions: VersionStamps::default(),
        }
    }

    /// Replace the version stamps written into records
    pub fn with_versions(mut self, versions: VersionStamps) -> Self {
        self.versions = versions;
        self
    }

    pub fn versions(&self) -> &VersionStamps {
        &self.versions
    }

    /// Compute the next ledger record
    ///
    /// # Arguments
    /// * `config` - Cluster configuration (name and node-pool names are read)
    /// * `previous_record` - Stored previous record; may be empty or malformed
    /// * `current_node_count` - Node count after this apply (not validated)
    /// * `manifest` - Exact text of the cluster definition, used for hashing
    pub fn build(
        &self,
        config: &ClusterConfig,
        previous_record: &str,
        current_node_count: i64,
        manifest: &str,
    ) -> DeploymentRecord {
        let previous = DeploymentRecord::from_json_lenient(previous_record);
        let now = self.clock.now();
        let config_checksum = RECORD_CHECKSUM.checksum(manifest);

        let next_count = previous.deployment_count.checked_add(1);
        let record = match next_count {
            Some(count) if previous.is_initialized() => self.subsequent_deployment(
                config,
                &previous,
                count,
                current_node_count,
                config_checksum,
                now,
            ),
            _ => {
                if next_count.is_none() {
                    warn!(
                        deployment_count = previous.deployment_count,
                        "previous deployment count cannot be incremented, starting a new ledger"
                    );
                }
                self.first_deployment(config, current_node_count, config_checksum, now)
            }
        };

        info!(
            deployment_id = %record.deployment_id,
            deployment_count = record.deployment_count,
            scale_operation = %record.last_scale_operation,
            changes = record.change_log.len(),
            "built deployment ledger record"
        );
        record
    }

    fn first_deployment(
        &self,
        config: &ClusterConfig,
        node_count: i64,
        config_checksum: String,
        now: DateTime<Utc>,
    ) -> DeploymentRecord {
        debug!(cluster = %config.name(), "no previous ledger record, first deployment");

        let deployment_id = deployment_id(1, now);
        let state_snapshot_id = state_snapshot_id(&deployment_id, &config_checksum);

        let mut change_log = vec![ChangeLogEntry {
            change_type: ChangeType::ClusterCreated,
            resource_id: config.name().to_string(),
            description: format!("Cluster {} created with {} nodes", config.name(), node_count),
            old_value: String::new(),
            new_value: node_count.to_string(),
            actor: ACTOR.to_string(),
            timestamp: Some(now),
        }];
        change_log.extend(config.node_pools.iter().map(|(name, pool)| ChangeLogEntry {
            change_type: ChangeType::PoolAdded,
            resource_id: name.clone(),
            description: format!("Initial node pool {} with {} nodes", name, pool.count),
            old_value: String::new(),
            new_value: pool.count.to_string(),
            actor: ACTOR.to_string(),
            timestamp: Some(now),
        }));

        DeploymentRecord {
            created_at: Some(now),
            updated_at: Some(now),
            last_deployed_at: Some(now),
            deployment_id,
            deployment_count: 1,
            last_scale_operation: ScaleOperation::Initial,
            previous_node_count: 0,
            current_node_count: node_count,
            node_pools_added: config.node_pools.keys().cloned().collect(),
            node_pools_removed: Vec::new(),
            node_pools_scaled: Vec::new(),
            system_version: self.versions.system_version.clone(),
            engine_version: self.versions.engine_version.clone(),
            schema_version: self.versions.schema_version.clone(),
            config_version: Some(ConfigVersion {
                config_hash: config_checksum.clone(),
                parent_hash: String::new(),
            }),
            config_checksum,
            state_snapshot_id,
            parent_state_id: String::new(),
            change_log,
            previous_deployments: Vec::new(),
        }
    }

    fn subsequent_deployment(
        &self,
        config: &ClusterConfig,
        previous: &DeploymentRecord,
        deployment_count: u64,
        node_count: i64,
        config_checksum: String,
        now: DateTime<Utc>,
    ) -> DeploymentRecord {
        let deployment_id = deployment_id(deployment_count, now);
        let state_snapshot_id = state_snapshot_id(&deployment_id, &config_checksum);
        let previous_node_count = previous.current_node_count;
        let scale_operation = ScaleOperation::classify(previous_node_count, node_count);

        debug!(
            previous = %previous.deployment_id,
            previous_node_count,
            node_count,
            "subsequent deployment"
        );

        let mut change_log = Vec::new();
        if scale_operation != ScaleOperation::Update {
            let change_type = if scale_operation == ScaleOperation::ScaleUp {
                ChangeType::ScaleUp
            } else {
                ChangeType::ScaleDown
            };
            change_log.push(ChangeLogEntry {
                change_type,
                resource_id: config.name().to_string(),
                description: format!(
                    "Scaled cluster from {} to {} nodes",
                    previous_node_count, node_count
                ),
                old_value: previous_node_count.to_string(),
                new_value: node_count.to_string(),
                actor: ACTOR.to_string(),
                timestamp: Some(now),
            });
        }
        if config_checksum != previous.config_checksum {
            change_log.push(ChangeLogEntry {
                change_type: ChangeType::ConfigUpdated,
                resource_id: config.name().to_string(),
                description: "Cluster configuration updated".to_string(),
                old_value: previous.config_checksum.clone(),
                new_value: config_checksum.clone(),
                actor: ACTOR.to_string(),
                timestamp: Some(now),
            });
        }

        let parent_hash = previous.config_hash().unwrap_or_default().to_string();

        DeploymentRecord {
            created_at: previous.created_at,
            updated_at: Some(now),
            last_deployed_at: Some(now),
            deployment_id,
            deployment_count,
            last_scale_operation: scale_operation,
            previous_node_count,
            current_node_count: node_count,
            // Pool definitions are not persisted, so there is nothing to diff against
            node_pools_added: Vec::new(),
            node_pools_removed: Vec::new(),
            node_pools_scaled: Vec::new(),
            system_version: self.versions.system_version.clone(),
            engine_version: self.versions.engine_version.clone(),
            schema_version: self.versions.schema_version.clone(),
            config_version: Some(ConfigVersion {
                config_hash: config_checksum.clone(),
                parent_hash,
            }),
            config_checksum,
            state_snapshot_id,
            parent_state_id: previous.state_snapshot_id.clone(),
            change_log,
            previous_deployments: prepend_history(
                &previous.previous_deployments,
                DeploymentHistoryEntry::summarize(previous),
            ),
        }
    }
}

/// `deploy-{count}-{YYYY-MM-DD}`
pub fn deployment_id(count: u64, now: DateTime<Utc>) -> String {
    format!("deploy-{}-{}", count, now.format("%Y-%m-%d"))
}

/// `state-{deploymentId}-{first 8 hex of checksum}`
pub fn state_snapshot_id(deployment_id: &str, config_checksum: &str) -> String {
    format!(
        "state-{}-{}",
        deployment_id,
        fingerprint(config_checksum, SNAPSHOT_FINGERPRINT_LEN)
    )
}

// =============================================================================
// Tests
// =============================================================================
