//! Reconciliation requester
//!
//! Pull-based catch-up. Peers are asked in configuration order and the first
//! one that answers successfully is the only one merged from: later peers are
//! not consulted even if they hold more.

use std::fmt;

use mural_core::{MuralResult, PeerAddr, Post};
use mural_transport::exchange;
use mural_wire::{Request, Response};

use crate::Node;

/// How a reconciliation round ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// `peer` answered; `received` posts came back and `merged` were new
    Merged {
        peer: PeerAddr,
        received: usize,
        merged: usize,
    },
    /// Every one of `attempted` peers was unreachable or answered an error
    Exhausted { attempted: usize },
}

impl ReconcileOutcome {
    /// Posts added to the local board
    pub fn merged(&self) -> usize {
        match self {
            ReconcileOutcome::Merged { merged, .. } => *merged,
            ReconcileOutcome::Exhausted { .. } => 0,
        }
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileOutcome::Merged { peer, received: 0, .. } => {
                write!(f, "reconciled with {peer}: no new posts")
            }
            ReconcileOutcome::Merged {
                peer,
                received,
                merged,
            } => write!(
                f,
                "reconciled with {peer}: {received} posts received, {merged} merged"
            ),
            ReconcileOutcome::Exhausted { attempted } => write!(
                f,
                "could not reconcile with any available hub ({attempted} tried)"
            ),
        }
    }
}

impl Node {
    /// Catch up on posts this node missed.
    ///
    /// Refused with `NodeInactive` while the node is inactive.
    pub async fn reconcile(&self) -> MuralResult<ReconcileOutcome> {
        self.ensure_active()?;
        self.stats().reconciliations.incr();

        let request = Request::SyncRequest {
            known_uids: self.store().known_uids(),
        };
        tracing::info!(known = self.store().len(), "starting reconciliation");

        let mut attempted = 0;
        for peer in self.config().peers.others(self.port()) {
            attempted += 1;
            tracing::info!(peer = %peer, "requesting reconciliation");

            let timeout = self.config().peer_timeout;
            let limit = self.config().max_frame_size;
            let response = match exchange(peer, &request, timeout, limit)
                .await
                .and_then(Response::into_result)
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(peer = %peer, error = %e, "reconciliation with peer failed");
                    continue;
                }
            };

            let posts: Vec<_> = response
                .missing_posts
                .unwrap_or_default()
                .into_iter()
                .filter(Post::is_well_formed)
                .collect();
            let received = posts.len();
            let outcome = self.store().merge(posts);
            self.stats().posts_reconciled.add(outcome.merged as u64);

            let result = ReconcileOutcome::Merged {
                peer: peer.clone(),
                received,
                merged: outcome.merged,
            };
            tracing::info!("{result}");
            return Ok(result);
        }

        let result = ReconcileOutcome::Exhausted { attempted };
        tracing::warn!("{result}");
        Ok(result)
    }
}
