//! `show` and `history` - display the stored ledger

use super::open_store;
use crate::models::ledger::{DeploymentRecord, ScaleOperation};
use crate::settings::LedgerSettings;
use crate::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(project_root: &Path, settings: &LedgerSettings, json: bool) -> Result<()> {
    let Some(record) = open_store(project_root, settings).load_record()? else {
        println!("{}", "No deployments recorded yet.".yellow());
        return Ok(());
    };

    if json {
        println!("{}", record.to_json()?);
        return Ok(());
    }

    let operation = record.last_scale_operation.to_string();
    let operation = match record.last_scale_operation {
        ScaleOperation::Initial => operation.green(),
        ScaleOperation::ScaleUp => operation.cyan(),
        ScaleOperation::ScaleDown => operation.yellow(),
        ScaleOperation::Update => operation.blue(),
    };

    println!("{}", format!("Deployment: {}", record.deployment_id).cyan().bold());
    println!();
    println!("   Count:     {}", record.deployment_count);
    println!("   Operation: {}", operation);
    println!(
        "   Nodes:     {} → {}",
        record.previous_node_count, record.current_node_count
    );
    println!("   Checksum:  {}", record.config_checksum);
    println!("   Snapshot:  {}", record.state_snapshot_id);
    if !record.parent_state_id.is_empty() {
        println!("   Parent:    {}", record.parent_state_id);
    }
    if let Some(created) = &record.created_at {
        println!("   Created:   {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(deployed) = &record.last_deployed_at {
        println!("   Deployed:  {}", deployed.format("%Y-%m-%d %H:%M:%S"));
    }
    println!(
        "   Versions:  system {} / engine {} / schema {}",
        record.system_version, record.engine_version, record.schema_version
    );

    if !record.change_log.is_empty() {
        println!("\n{}", "Changes:".green().bold());
        for change in &record.change_log {
            println!("   • [{}] {}", change.change_type, change.description);
        }
    }

    Ok(())
}

pub fn run_history(project_root: &Path, settings: &LedgerSettings) -> Result<()> {
    let Some(record) = open_store(project_root, settings).load_record()? else {
        println!("{}", "No deployments recorded yet.".yellow());
        return Ok(());
    };

    for line in history_lines(&record) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per deployment, current first
fn history_lines(record: &DeploymentRecord) -> Vec<String> {
    let mut lines = vec![format!(
        "* {}  nodes={}  {}",
        record.deployment_id,
        record.current_node_count,
        short(&record.config_checksum)
    )];

    lines.extend(record.previous_deployments.iter().map(|entry| {
        let when = entry
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        format!(
            "  {}  nodes={}  {}  {}",
            entry.deployment_id,
            entry.node_count,
            short(&entry.config_checksum),
            when
        )
    }));
    lines
}

fn short(checksum: &str) -> &str {
    crate::checksum::fingerprint(checksum, 12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{FixedClock, MetadataBuilder};
    use crate::models::cluster::ClusterConfig;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_history_lines_newest_first() {
        let config = ClusterConfig::new("c");
        let record = (1..=3).fold(DeploymentRecord::default(), |previous, day| {
            let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, day, 8, 0, 0).unwrap());
            let stored = if day == 1 {
                String::new()
            } else {
                previous.to_json().unwrap()
            };
            MetadataBuilder::with_clock(clock).build(&config, &stored, day as i64, "m")
        });

        let lines = history_lines(&record);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("* deploy-3-2026-10-03"));
        assert!(lines[1].contains("deploy-2-2026-10-02"));
        assert!(lines[2].contains("deploy-1-2026-10-01"));
        assert!(lines[2].contains("2026-10-01 08:00"));
    }

    #[test]
    fn test_show_empty_store() {
        let temp = tempfile::TempDir::new().unwrap();
        run(temp.path(), &LedgerSettings::default(), false).unwrap();
        run_history(temp.path(), &LedgerSettings::default()).unwrap();
    }
}
