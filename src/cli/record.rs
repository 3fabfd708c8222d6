//! `record` - build and store the ledger record for an applied deployment

use super::{open_store, resolve_path};
use crate::ledger::MetadataBuilder;
use crate::models::cluster::ClusterConfig;
use crate::models::ledger::DeploymentRecord;
use crate::sanitizer::sanitize_config;
use crate::settings::LedgerSettings;
use crate::state::StateStore;
use crate::Result;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;

/// Options for a record run
#[derive(Debug, Default)]
pub struct RecordOptions<'a> {
    /// Cluster definition (defaults to settings.cluster_config)
    pub config: Option<&'a Path>,
    /// Manifest to hash (defaults to the cluster definition's raw text)
    pub manifest: Option<&'a Path>,
    /// Node count after the apply (defaults to the sum of pool counts)
    pub nodes: Option<i64>,
    pub json: bool,
}

pub fn run(project_root: &Path, settings: &LedgerSettings, opts: RecordOptions<'_>) -> Result<()> {
    let json = opts.json;
    let record = record_deployment(project_root, settings, opts)?;

    if json {
        println!("{}", record.to_json()?);
    } else {
        print_summary(&record);
    }
    Ok(())
}

/// Build the next record from the stored one and persist it with the
/// sanitized configuration
pub fn record_deployment(
    project_root: &Path,
    settings: &LedgerSettings,
    opts: RecordOptions<'_>,
) -> Result<DeploymentRecord> {
    let config_path = resolve_path(project_root, opts.config, &settings.cluster_config);
    let (config, raw) = ClusterConfig::load(&config_path)?;

    let manifest = match opts.manifest {
        Some(path) => {
            let path = project_root.join(path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read manifest {}", path.display()))?
        }
        None => raw,
    };
    let nodes = opts.nodes.unwrap_or_else(|| config.total_nodes());

    let store = open_store(project_root, settings);
    let previous = store.load_previous()?;

    let record = MetadataBuilder::new()
        .with_versions(settings.version_stamps())
        .build(&config, &previous, nodes, &manifest);
    let sanitized = sanitize_config(&config);

    store.save(&record, &sanitized)?;
    Ok(record)
}

fn print_summary(record: &DeploymentRecord) {
    println!(
        "{}",
        format!("📒 Recorded {}", record.deployment_id).green().bold()
    );
    println!("   Operation: {}", record.last_scale_operation.to_string().cyan());
    println!(
        "   Nodes:     {} → {}",
        record.previous_node_count, record.current_node_count
    );
    println!("   Snapshot:  {}", record.state_snapshot_id);
    if !record.parent_state_id.is_empty() {
        println!("   Parent:    {}", record.parent_state_id.bright_black());
    }

    if record.change_log.is_empty() {
        println!("   {}", "No changes".bright_black());
    }
    for change in &record.change_log {
        println!("   • [{}] {}", change.change_type.to_string().yellow(), change.description);
    }
}
