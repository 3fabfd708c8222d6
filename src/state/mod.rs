//! Ledger Persistence
//!
//! The durable home of the current ledger record and the sanitized cluster
//! configuration. The ledger core only needs the previous record back as
//! text, so stores are free to keep it anywhere.

mod store;

pub use store::{FileStateStore, StateStore, LEDGER_FILE, SANITIZED_CONFIG_FILE};
