//! `verify` - check the stored record against its manifest and history

use super::{open_store, resolve_path};
use crate::ledger::verify_manifest;
use crate::models::ledger::DeploymentRecord;
use crate::settings::LedgerSettings;
use crate::Result;
use anyhow::{bail, Context};
use colored::Colorize;
use std::path::Path;

pub fn run(project_root: &Path, settings: &LedgerSettings, manifest: Option<&Path>) -> Result<()> {
    let Some(record) = open_store(project_root, settings).load_record()? else {
        println!("{}", "No deployments recorded yet.".yellow());
        return Ok(());
    };

    let path = resolve_path(project_root, manifest, &settings.cluster_config);
    let manifest = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;

    let issues = check(&record, &manifest);
    if issues.is_empty() {
        println!(
            "{}",
            format!("✅ {} matches {}", record.deployment_id, path.display()).green()
        );
        return Ok(());
    }

    for issue in &issues {
        println!("   {} {}", "✗".red(), issue);
    }
    bail!("Ledger verification failed with {} issue(s)", issues.len())
}

/// Everything wrong with `record`, as human-readable messages
fn check(record: &DeploymentRecord, manifest: &str) -> Vec<String> {
    let mut issues = Vec::new();

    if let Err(e) = verify_manifest(record, manifest) {
        issues.push(e.to_string());
    }

    if let Some(version) = &record.config_version {
        if version.config_hash != record.config_checksum {
            issues.push(format!(
                "configVersion.configHash '{}' differs from configChecksum '{}'",
                version.config_hash, record.config_checksum
            ));
        }
    }

    if let Some(entry) = record.previous_deployments.first() {
        if record.parent_state_id.is_empty() {
            issues.push(format!(
                "record has history ({}) but no parentStateId",
                entry.deployment_id
            ));
        }
        if let Some(version) = &record.config_version {
            if version.parent_hash != entry.config_checksum {
                issues.push(format!(
                    "configVersion.parentHash does not match {}'s checksum",
                    entry.deployment_id
                ));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MetadataBuilder;
    use crate::models::cluster::ClusterConfig;

    #[test]
    fn test_check_clean_record() {
        let config = ClusterConfig::new("c");
        let first = MetadataBuilder::new().build(&config, "", 1, "v1");
        let second = MetadataBuilder::new().build(&config, &first.to_json().unwrap(), 2, "v2");

        assert!(check(&first, "v1").is_empty());
        assert!(check(&second, "v2").is_empty());
    }

    #[test]
    fn test_check_reports_issues() {
        let config = ClusterConfig::new("c");
        let first = MetadataBuilder::new().build(&config, "", 1, "v1");
        let mut second = MetadataBuilder::new().build(&config, &first.to_json().unwrap(), 2, "v2");
        second.parent_state_id.clear();
        second.config_version.as_mut().unwrap().parent_hash = "bogus".to_string();

        let issues = check(&second, "v3");
        assert_eq!(issues.len(), 3);
    }
}
