//! Accept loop

use std::sync::Arc;
use std::time::Duration;

use mural_core::MuralResult;
use mural_transport::TcpTransport;

use crate::{handle_connection, Node};

/// Back-off after a failed accept, so a persistent error does not spin
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// TCP front end of a node
pub struct Server {
    node: Arc<Node>,
    transport: TcpTransport,
}

impl Server {
    /// Bind to the node's configured host and port
    pub async fn bind(node: Arc<Node>) -> MuralResult<Self> {
        let transport = TcpTransport::bind(node.config().listen_addr()).await?;
        Ok(Server::with_transport(node, transport))
    }

    /// Serve on an already bound transport
    pub fn with_transport(node: Arc<Node>, transport: TcpTransport) -> Self {
        Server { node, transport }
    }

    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.transport.local_addr()
    }

    /// Accept connections forever, one task per connection
    pub async fn run(self) {
        tracing::info!(addr = %self.local_addr(), "listening for connections");
        loop {
            match self.transport.accept().await {
                Ok((stream, addr)) => {
                    self.node.stats().connections_accepted.incr();
                    tokio::spawn(handle_connection(Arc::clone(&self.node), stream, addr));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            }
        }
    }
}
