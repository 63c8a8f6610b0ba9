//! Mural Wire Protocol - JSON request/response frames
//!
//! This crate implements the wire format spoken by clients and peer nodes:
//! - Request objects (auth, publish, fetch, sync, sync_request)
//! - Response objects (status + content, plus board / missing_posts)
//! - Newline-delimited framing with a frame size limit

pub mod codec;
pub mod message;

pub use codec::*;
pub use message::*;
