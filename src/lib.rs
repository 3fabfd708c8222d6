// Sloth Ledger - Deployment ledger for multi-cloud Kubernetes clusters
// Versioned, hash-linked records of every applied cluster deployment

pub mod checksum;
pub mod cli;
pub mod ledger;
pub mod models;
pub mod sanitizer;
pub mod settings;
pub mod state;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use ledger::{LedgerError, MetadataBuilder, VersionStamps};
pub use models::{ClusterConfig, DeploymentRecord, ScaleOperation};
pub use sanitizer::sanitize_config;
pub use state::{FileStateStore, StateStore};
