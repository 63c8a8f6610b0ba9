//! End-to-end Integration Test Suite
//!
//! Scenarios that drive hubs over the wire:
//! - Publish, fetch and session rules
//! - Sync idempotency
//! - Propagation between hubs
//! - Reconciliation after an outage, and its first-success policy
//! - Inactive gating
//! - Connection error handling and frame limits

use std::collections::BTreeSet;

use mural_core::PostUid;

use crate::TestCluster;

/// Board contents across a cluster at one instant
#[derive(Debug, Clone)]
pub struct ConvergenceReport {
    /// Uid set of each hub, by index
    pub boards: Vec<BTreeSet<PostUid>>,
    /// Hubs holding the same uid more than once
    pub duplicated: Vec<usize>,
}

impl ConvergenceReport {
    pub fn capture(cluster: &TestCluster) -> Self {
        let mut boards = Vec::with_capacity(cluster.len());
        let mut duplicated = Vec::new();
        for (i, node) in cluster.nodes().iter().enumerate() {
            let posts = node.fetch();
            let uids: BTreeSet<PostUid> = posts.iter().map(|p| p.uid.clone()).collect();
            if uids.len() != posts.len() {
                duplicated.push(i);
            }
            boards.push(uids);
        }
        ConvergenceReport { boards, duplicated }
    }

    /// Every hub holds the same set of uids
    pub fn converged(&self) -> bool {
        self.boards.windows(2).all(|w| w[0] == w[1])
    }

    pub fn passed(&self) -> bool {
        self.converged() && self.duplicated.is_empty()
    }

    /// Uids known somewhere but missing on hub `i`
    pub fn missing_on(&self, i: usize) -> BTreeSet<PostUid> {
        let all: BTreeSet<PostUid> = self.boards.iter().flatten().cloned().collect();
        all.difference(&self.boards[i]).cloned().collect()
    }
}
