//! Mural Transport Layer - TCP connections between clients and nodes
//!
//! This crate provides:
//! - A listening socket for inbound connections
//! - Persistent request/response connections
//! - One-shot peer exchanges with timeouts

pub mod tcp;

pub use tcp::*;
