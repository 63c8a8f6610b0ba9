//! Static peer configuration
//!
//! The peer set is fixed at startup. Its order is significant: reconciliation
//! queries peers in exactly this order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Another node, addressed by host and port
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerAddr {
    pub host: String,
    pub port: u16,
}

impl PeerAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        PeerAddr {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Ordered, static set of peers
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerSet(Vec<PeerAddr>);

impl PeerSet {
    /// All peers on one host, in the given port order
    pub fn on_host(host: &str, ports: &[u16]) -> Self {
        PeerSet(ports.iter().map(|&port| PeerAddr::new(host, port)).collect())
    }

    /// Peers other than the node listening on `local_port`, in configuration order
    pub fn others(&self, local_port: u16) -> impl Iterator<Item = &PeerAddr> + '_ {
        self.0.iter().filter(move |p| p.port != local_port)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeerAddr> {
        self.0.iter()
    }
}
