//! Mural State - the replicated message store
//!
//! This crate implements the node-local board:
//! - Uid-deduplicated, append-only post log behind a single lock
//! - Snapshot reads in arrival and display order
//! - Missing-set computation and batch merge for reconciliation

pub mod reconcile;
pub mod store;

pub use reconcile::*;
pub use store::*;
