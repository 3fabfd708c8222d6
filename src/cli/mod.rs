//! Command-line driver for the deployment ledger

pub mod checksum;
pub mod record;
pub mod sanitize;
pub mod show;
pub mod verify;

use crate::settings::LedgerSettings;
use crate::state::FileStateStore;
use std::path::{Path, PathBuf};

/// Resolve an optional CLI path against the project root, falling back to `default`
pub(crate) fn resolve_path(project_root: &Path, path: Option<&Path>, default: &Path) -> PathBuf {
    project_root.join(path.unwrap_or(default))
}

/// File store configured by settings
pub(crate) fn open_store(project_root: &Path, settings: &LedgerSettings) -> FileStateStore {
    FileStateStore::new(settings.state_dir(project_root))
}
