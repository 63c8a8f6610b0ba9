//! Session registry
//!
//! Maps a live connection's remote address to the identity it authenticated
//! as. Only the owning connection reads or removes its entry, and its
//! teardown always removes it, so a new connection starts unauthenticated.

use std::collections::HashMap;
use std::net::SocketAddr;

use parking_lot::RwLock;

use mural_core::{time, Timestamp};

/// Authenticated identity of one connection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    pub authenticated_at: Timestamp,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SocketAddr, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    /// Bind `addr` to `identity`, replacing any earlier session on it
    pub fn authenticate(&self, addr: SocketAddr, identity: impl Into<String>) {
        let session = Session {
            identity: identity.into(),
            authenticated_at: time::now(),
        };
        self.sessions.write().insert(addr, session);
    }

    /// Identity bound to `addr`, if any
    pub fn identity(&self, addr: &SocketAddr) -> Option<String> {
        self.sessions.read().get(addr).map(|s| s.identity.clone())
    }

    /// Drop the session of a closing connection
    pub fn end(&self, addr: &SocketAddr) -> Option<Session> {
        self.sessions.write().remove(addr)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
