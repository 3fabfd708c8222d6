//! Lineage verification between consecutive ledger records
//!
//! A stored record is only as trustworthy as its links. These checks catch a
//! record that was hand-edited, replaced or built from the wrong predecessor.

use super::builder::state_snapshot_id;
use super::LedgerError;
use crate::checksum::sha256_checksum;
use crate::models::ledger::DeploymentRecord;

/// Check that `current` was built on top of `previous`
pub fn verify_lineage(
    previous: &DeploymentRecord,
    current: &DeploymentRecord,
) -> Result<(), LedgerError> {
    if previous.deployment_count.checked_add(1) != Some(current.deployment_count) {
        return Err(LedgerError::CountNotIncremented {
            previous: previous.deployment_count,
            current: current.deployment_count,
        });
    }

    if current.created_at != previous.created_at {
        return Err(LedgerError::CreatedAtChanged);
    }

    if current.parent_state_id != previous.state_snapshot_id {
        return Err(LedgerError::LineageBroken {
            expected: previous.state_snapshot_id.clone(),
            found: current.parent_state_id.clone(),
        });
    }

    let expected_parent = previous.config_hash().unwrap_or_default();
    let found_parent = current
        .config_version
        .as_ref()
        .map(|v| v.parent_hash.as_str())
        .unwrap_or_default();
    if expected_parent != found_parent {
        return Err(LedgerError::ConfigChainBroken {
            expected: expected_parent.to_string(),
            found: found_parent.to_string(),
        });
    }

    match current.previous_deployments.first() {
        Some(entry) if entry.deployment_id == previous.deployment_id => Ok(()),
        _ => Err(LedgerError::HistoryMismatch(previous.deployment_id.clone())),
    }
}

/// Check that `record` was built from exactly `manifest`
pub fn verify_manifest(record: &DeploymentRecord, manifest: &str) -> Result<(), LedgerError> {
    let checksum = sha256_checksum(manifest);
    if record.config_checksum != checksum {
        return Err(LedgerError::ChecksumMismatch {
            expected: checksum,
            found: record.config_checksum.clone(),
        });
    }

    let expected_snapshot = state_snapshot_id(&record.deployment_id, &checksum);
    if record.state_snapshot_id != expected_snapshot {
        return Err(LedgerError::ChecksumMismatch {
            expected: expected_snapshot,
            found: record.state_snapshot_id.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{FixedClock, MetadataBuilder};
    use crate::models::cluster::ClusterConfig;
    use chrono::{TimeZone, Utc};

    fn pair() -> (DeploymentRecord, DeploymentRecord) {
        let config = ClusterConfig::new("prod");
        let first = MetadataBuilder::with_clock(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        ))
        .build(&config, "", 3, "v1");
        let second = MetadataBuilder::with_clock(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 10, 2, 0, 0, 0).unwrap(),
        ))
        .build(&config, &first.to_json().unwrap(), 5, "v2");
        (first, second)
    }

    #[test]
    fn test_valid_lineage() {
        let (first, second) = pair();
        verify_lineage(&first, &second).unwrap();
        verify_manifest(&second, "v2").unwrap();
    }

    #[test]
    fn test_tampered_parent() {
        let (first, mut second) = pair();
        second.parent_state_id = "state-forged".to_string();
        assert!(matches!(
            verify_lineage(&first, &second),
            Err(LedgerError::LineageBroken { .. })
        ));
    }

    #[test]
    fn test_tampered_config_chain() {
        let (first, mut second) = pair();
        second.config_version.as_mut().unwrap().parent_hash = "00".to_string();
        assert!(matches!(
            verify_lineage(&first, &second),
            Err(LedgerError::ConfigChainBroken { .. })
        ));
    }

    #[test]
    fn test_skipped_deployment() {
        let (first, mut second) = pair();
        second.deployment_count += 1;
        assert!(matches!(
            verify_lineage(&first, &second),
            Err(LedgerError::CountNotIncremented { .. })
        ));
    }

    #[test]
    fn test_count_wrapped_to_zero() {
        let (mut first, mut second) = pair();
        first.deployment_count = u64::MAX;
        second.deployment_count = 0;
        assert!(matches!(
            verify_lineage(&first, &second),
            Err(LedgerError::CountNotIncremented { .. })
        ));
    }

    #[test]
    fn test_created_at_rewritten() {
        let (first, mut second) = pair();
        second.created_at = second.updated_at;
        assert!(matches!(
            verify_lineage(&first, &second),
            Err(LedgerError::CreatedAtChanged)
        ));
    }

    #[test]
    fn test_history_dropped() {
        let (first, mut second) = pair();
        second.previous_deployments.clear();
        assert!(matches!(
            verify_lineage(&first, &second),
            Err(LedgerError::HistoryMismatch(_))
        ));
    }

    #[test]
    fn test_manifest_mismatch() {
        let (_, second) = pair();
        assert!(matches!(
            verify_manifest(&second, "v1"),
            Err(LedgerError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_snapshot_id_tampered() {
        let (_, mut second) = pair();
        second.state_snapshot_id = "state-deploy-2-2026-10-02-ffffffff".to_string();
        assert!(verify_manifest(&second, "v2").is_err());
    }
}
