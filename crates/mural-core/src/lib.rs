//! Mural Core - Fundamental types for the replicated message board
//!
//! This crate defines the types shared by every node:
//! - Identifiers (PostUid) and timestamps
//! - Posts
//! - Static peer and credential configuration
//! - The error taxonomy

pub mod credentials;
pub mod error;
pub mod id;
pub mod peer;
pub mod post;
pub mod time;

pub use credentials::*;
pub use error::*;
pub use id::*;
pub use peer::*;
pub use post::*;
pub use time::Timestamp;
