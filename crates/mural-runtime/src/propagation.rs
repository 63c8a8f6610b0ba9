//! Propagation - push of new posts to every peer
//!
//! Fire-and-forget, at most one attempt per peer; a peer answering with an
//! error status counts as a failed push. Each peer push runs on its
//! own task and must hold a permit from the node-wide semaphore while it is
//! connected, which bounds outbound connections under bursts of publishes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use mural_core::{MuralError, MuralResult, PeerAddr, Post};
use mural_transport::exchange;
use mural_wire::{Request, Response};

use crate::{NodeConfig, NodeStats};

/// Propagation engine
#[derive(Debug)]
pub struct Propagator {
    /// Peers other than this node, in configuration order
    targets: Vec<PeerAddr>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    max_frame_size: usize,
    stats: Arc<NodeStats>,
}

impl Propagator {
    pub fn new(config: &NodeConfig, stats: Arc<NodeStats>) -> Self {
        Propagator {
            targets: config.peers.others(config.port).cloned().collect(),
            permits: Arc::new(Semaphore::new(config.propagation_concurrency.max(1))),
            timeout: config.peer_timeout,
            max_frame_size: config.max_frame_size,
            stats,
        }
    }

    /// Peers a new post is pushed to
    pub fn targets(&self) -> &[PeerAddr] {
        &self.targets
    }

    /// Push `post` to every peer concurrently.
    ///
    /// Must be called from within a tokio runtime. Returns immediately; the
    /// handles may be awaited but the publish path never does.
    pub fn propagate(&self, post: &Post) -> Vec<JoinHandle<MuralResult<()>>> {
        tracing::debug!(uid = %post.uid, peers = self.targets.len(), "propagating post");

        let request = Arc::new(Request::Sync {
            message_payload: post.clone(),
        });

        self.targets
            .iter()
            .cloned()
            .map(|peer| {
                let request = Arc::clone(&request);
                let permits = Arc::clone(&self.permits);
                let stats = Arc::clone(&self.stats);
                let timeout = self.timeout;
                let max_frame_size = self.max_frame_size;
                tokio::spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|e| MuralError::Transport(e.to_string()))?;

                    match exchange(&peer, &request, timeout, max_frame_size)
                        .await
                        .and_then(Response::into_result)
                    {
                        Ok(response) => {
                            stats.propagations_sent.incr();
                            tracing::debug!(peer = %peer, content = %response.content, "propagation delivered");
                            Ok(())
                        }
                        Err(e) => {
                            stats.propagations_failed.incr();
                            tracing::warn!(peer = %peer, error = %e, "propagation failed, peer may be offline");
                            Err(e)
                        }
                    }
                })
            })
            .collect()
    }
}
