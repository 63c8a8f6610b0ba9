//! In-process hub cluster
//!
//! Every hub gets a real listener on `127.0.0.1:0` and is served on its own
//! task, so scenarios exercise the full wire path.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mural_core::{MuralError, MuralResult, PeerAddr, PeerSet};
use mural_runtime::{Node, NodeConfig, Server};
use mural_transport::{Connection, TcpTransport};
use mural_wire::{Request, MAX_FRAME_SIZE};

const LOOPBACK: &str = "127.0.0.1";

/// Who each hub pushes to and reconciles from
#[derive(Debug, Clone)]
pub enum Topology {
    /// Every hub lists every port, its own included, in index order
    FullMesh,
    /// Explicit peer indices per hub, in reconciliation order
    Custom(Vec<Vec<usize>>),
}

/// Cluster configuration
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub size: usize,
    pub topology: Topology,
    /// Ports with no listener, placed first in every hub's peer list
    pub unreachable_peers: usize,
    pub peer_timeout: Duration,
    /// Frame limit applied by every hub, inbound and in peer responses
    pub max_frame_size: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            size: 3,
            topology: Topology::FullMesh,
            unreachable_peers: 0,
            peer_timeout: Duration::from_secs(2),
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}

impl ClusterConfig {
    /// Two fully meshed hubs
    pub fn pair() -> Self {
        Self {
            size: 2,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_topology(mut self, peers: Vec<Vec<usize>>) -> Self {
        self.topology = Topology::Custom(peers);
        self
    }

    pub fn with_unreachable_peers(mut self, n: usize) -> Self {
        self.unreachable_peers = n;
        self
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    pub fn with_peer_timeout(mut self, timeout: Duration) -> Self {
        self.peer_timeout = timeout;
        self
    }
}

/// A running cluster. Hubs stop when it is dropped.
pub struct TestCluster {
    nodes: Vec<Arc<Node>>,
    addrs: Vec<SocketAddr>,
    servers: Vec<JoinHandle<()>>,
}

impl TestCluster {
    /// Start the default three-hub full mesh
    pub async fn start() -> MuralResult<Self> {
        Self::start_with(ClusterConfig::default()).await
    }

    pub async fn start_with(config: ClusterConfig) -> MuralResult<Self> {
        let mut transports = Vec::with_capacity(config.size);
        for _ in 0..config.size {
            transports.push(TcpTransport::bind((LOOPBACK, 0)).await?);
        }
        let ports: Vec<u16> = transports.iter().map(|t| t.local_addr().port()).collect();

        let mut dead = Vec::with_capacity(config.unreachable_peers);
        for _ in 0..config.unreachable_peers {
            dead.push(unreachable_port().await?);
        }

        let mut nodes = Vec::with_capacity(config.size);
        let mut addrs = Vec::with_capacity(config.size);
        let mut servers = Vec::with_capacity(config.size);

        for (i, transport) in transports.into_iter().enumerate() {
            let mut peer_ports = dead.clone();
            match config.topology {
                Topology::FullMesh => peer_ports.extend(&ports),
                Topology::Custom(ref peers) => {
                    let list = peers.get(i).map(Vec::as_slice).unwrap_or_default();
                    peer_ports.extend(list.iter().map(|&j| ports[j]));
                }
            }

            let mut node_config = NodeConfig::new(LOOPBACK, ports[i], &[]);
            node_config.peers = PeerSet::on_host(LOOPBACK, &peer_ports);
            node_config.peer_timeout = config.peer_timeout;
            node_config.max_frame_size = config.max_frame_size;

            let node = Arc::new(Node::new(node_config));
            addrs.push(transport.local_addr());
            servers.push(tokio::spawn(
                Server::with_transport(Arc::clone(&node), transport).run(),
            ));
            nodes.push(node);
        }

        Ok(TestCluster {
            nodes,
            addrs,
            servers,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, i: usize) -> &Arc<Node> {
        &self.nodes[i]
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn addr(&self, i: usize) -> SocketAddr {
        self.addrs[i]
    }

    pub fn peer_addr(&self, i: usize) -> PeerAddr {
        PeerAddr::new(LOOPBACK, self.addrs[i].port())
    }

    /// Open a fresh, unauthenticated connection to hub `i`
    pub async fn client(&self, i: usize) -> MuralResult<Connection> {
        let conn = Connection::connect_to(self.addrs[i], Some(Duration::from_secs(30))).await?;
        Ok(conn.with_max_frame_size(self.nodes[i].config().max_frame_size))
    }

    /// Open a connection to hub `i` and authenticate it
    pub async fn login(&self, i: usize, user: &str, pass: &str) -> MuralResult<Connection> {
        let mut conn = self.client(i).await?;
        conn.request(&Request::Auth {
            user: user.to_string(),
            pass: pass.to_string(),
        })
        .await?
        .into_result()?;
        Ok(conn)
    }
}

impl Drop for TestCluster {
    fn drop(&mut self) {
        for server in &self.servers {
            server.abort();
        }
    }
}

/// A loopback port nothing listens on
async fn unreachable_port() -> MuralResult<u16> {
    let listener = TcpListener::bind((LOOPBACK, 0))
        .await
        .map_err(|e| MuralError::Transport(e.to_string()))?;
    let port = listener
        .local_addr()
        .map_err(|e| MuralError::Transport(e.to_string()))?
        .port();
    drop(listener);
    Ok(port)
}

/// Poll `check` until it holds or `timeout` passes
pub async fn eventually<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Run `fut` with a deadline, for scenario steps that must not hang
pub async fn within<F: Future>(timeout: Duration, fut: F) -> Option<F::Output> {
    tokio::time::timeout(timeout, fut).await.ok()
}
