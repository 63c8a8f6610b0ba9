//! Mural Runtime - node orchestration
//!
//! This crate runs one board node:
//! - Node state and the active/inactive gate
//! - Session registry
//! - Per-connection request handling
//! - Propagation of new posts to peers
//! - Reconciliation against peers
//! - The accept loop and logging setup

pub mod config;
pub mod handler;
pub mod logging;
pub mod node;
pub mod propagation;
pub mod reconciliation;
pub mod server;
pub mod session;
pub mod stats;

pub use config::*;
pub use handler::*;
pub use node::*;
pub use propagation::*;
pub use reconciliation::*;
pub use server::*;
pub use session::*;
pub use stats::*;
