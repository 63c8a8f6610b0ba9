//! Node configuration

use std::time::Duration;

use mural_core::{CredentialTable, PeerSet};
use mural_wire::MAX_FRAME_SIZE;

/// Mural node configuration
#[derive(Clone, Debug)]
pub struct NodeConfig {
    /// Host the node listens on; peers are assumed to share it
    pub host: String,
    /// Local listening port, also stamped into every uid minted here
    pub port: u16,
    /// Ordered static peer set (may include this node; it is skipped)
    pub peers: PeerSet,
    /// Read-only credential table
    pub credentials: CredentialTable,
    /// Single deadline covering connect plus one request/response to a peer
    pub peer_timeout: Duration,
    /// Maximum simultaneous outbound propagation pushes
    pub propagation_concurrency: usize,
    /// Largest frame accepted, inbound and in peer responses
    pub max_frame_size: usize,
}

impl NodeConfig {
    /// Config for a node on `host:port` whose peers all live on the same host
    pub fn new(host: impl Into<String>, port: u16, peer_ports: &[u16]) -> Self {
        let host = host.into();
        NodeConfig {
            peers: PeerSet::on_host(&host, peer_ports),
            host,
            port,
            ..NodeConfig::default()
        }
    }

    /// Address to bind the listener to
    pub fn listen_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            host: "127.0.0.1".to_string(),
            port: 9001,
            peers: PeerSet::default(),
            credentials: CredentialTable::default(),
            peer_timeout: Duration::from_secs(5),
            propagation_concurrency: 16,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}
