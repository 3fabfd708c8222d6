//! `sanitize` - print the redacted cluster configuration

use super::resolve_path;
use crate::models::cluster::ClusterConfig;
use crate::sanitizer::sanitize_config;
use crate::settings::LedgerSettings;
use crate::Result;
use std::path::Path;

pub fn run(project_root: &Path, settings: &LedgerSettings, config: Option<&Path>) -> Result<()> {
    println!("{}", render(project_root, settings, config)?);
    Ok(())
}

fn render(project_root: &Path, settings: &LedgerSettings, config: Option<&Path>) -> Result<String> {
    let path = resolve_path(project_root, config, &settings.cluster_config);
    let (config, _) = ClusterConfig::load(&path)?;
    sanitize_config(&config).to_yaml()
}
