//! Mural node binaries
//!
//! Shared pieces of the `mural-node` hub binary and the `mural-client`
//! interactive client:
//! - Command line and config file handling
//! - Administrative console of a running hub
//! - Persistent board client

pub mod client;
pub mod config;
pub mod console;
