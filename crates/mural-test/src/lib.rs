//! Mural Test Harness - multi-hub scenarios over real sockets
//!
//! This crate provides:
//! - An in-process cluster of hubs on loopback ports
//! - Configurable peer topologies, including unreachable peers
//! - Board convergence checks
//! - End-to-end scenario tests

pub mod cluster;
pub mod integration;

pub use cluster::*;
pub use integration::*;
