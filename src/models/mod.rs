pub mod cluster;
pub mod ledger;

pub use cluster::{ClusterConfig, NodePool};
pub use ledger::{
    ChangeLogEntry, ChangeType, ConfigVersion, DeploymentHistoryEntry, DeploymentRecord,
    ScaleOperation,
};
