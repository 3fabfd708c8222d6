//! Bounded deployment history

use crate::models::ledger::DeploymentHistoryEntry;

/// Maximum number of past deployments kept in a record
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// Prepend `entry` to `history`, keeping at most `MAX_HISTORY_ENTRIES`
///
/// The oldest entries fall off the tail; relative order is preserved.
pub fn prepend_history(
    history: &[DeploymentHistoryEntry],
    entry: DeploymentHistoryEntry,
) -> Vec<DeploymentHistoryEntry> {
    let mut result = Vec::with_capacity(MAX_HISTORY_ENTRIES);
    result.push(entry);
    result.extend(
        history
            .iter()
            .take(MAX_HISTORY_ENTRIES.saturating_sub(1))
            .cloned(),
    );
    result
}
