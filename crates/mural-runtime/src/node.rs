//! Mural Node - the runtime entity
//!
//! A node owns the message store, the session registry, the static peer set
//! and the active/inactive gate. Each operation locks one resource at a time;
//! publish is append-then-propagate and reconciliation is read-then-merge,
//! neither atomic as a whole.

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mural_core::{MuralError, MuralResult, Post, PostUid};
use mural_state::{InsertOutcome, MessageStore};

use crate::{NodeConfig, NodeStats, Propagator, RuntimeStats, SessionRegistry};

/// Snapshot reported by the administrative `status` command
#[derive(Clone, Debug)]
pub struct NodeStatus {
    pub active: bool,
    pub port: u16,
    pub posts: usize,
    pub sessions: usize,
    pub peers: usize,
    pub stats: RuntimeStats,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.active { "active" } else { "inactive" };
        writeln!(f, "Hub state: {} (port {})", state, self.port)?;
        writeln!(f, "Posts on local board: {}", self.posts)?;
        writeln!(f, "Open sessions: {}", self.sessions)?;
        writeln!(f, "Known peers: {}", self.peers)?;
        write!(f, "{}", self.stats)
    }
}

/// Mural node
pub struct Node {
    config: NodeConfig,
    store: MessageStore,
    sessions: SessionRegistry,
    /// Outage simulation gate, flipped only by the administrative console
    active: AtomicBool,
    propagator: Propagator,
    stats: Arc<NodeStats>,
}

impl Node {
    /// Create an active node with an empty board
    pub fn new(config: NodeConfig) -> Self {
        let stats = Arc::new(NodeStats::default());
        Node {
            propagator: Propagator::new(&config, Arc::clone(&stats)),
            config,
            store: MessageStore::new(),
            sessions: SessionRegistry::new(),
            active: AtomicBool::new(true),
            stats,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Local listening port
    pub fn port(&self) -> u16 {
        self.config.port
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    pub fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Mark the node inactive. Returns false if it already was.
    pub fn deactivate(&self) -> bool {
        let changed = self.active.swap(false, Ordering::SeqCst);
        if changed {
            tracing::warn!(port = self.port(), "hub deactivated, rejecting all requests");
        }
        changed
    }

    /// Mark the node active again. Returns false if it already was.
    ///
    /// Reactivation does not reconcile by itself.
    pub fn activate(&self) -> bool {
        let changed = !self.active.swap(true, Ordering::SeqCst);
        if changed {
            tracing::info!(port = self.port(), "hub activated");
        }
        changed
    }

    pub fn ensure_active(&self) -> MuralResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(MuralError::NodeInactive)
        }
    }

    // ------------------------------------------------------------------
    // Request actions
    // ------------------------------------------------------------------

    /// `auth`: bind the connection at `addr` to `user` on a credential match
    pub fn authenticate(&self, addr: SocketAddr, user: &str, pass: &str) -> MuralResult<()> {
        match self.config.credentials.verify(user, pass) {
            Ok(identity) => {
                self.sessions.authenticate(addr, identity);
                tracing::info!(user = %identity, %addr, "user authenticated");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(user = %user, %addr, "authentication failed");
                Err(e)
            }
        }
    }

    /// `publish`: append a new post as the session identity, then push it to
    /// every peer without waiting.
    pub fn publish(&self, addr: SocketAddr, content: String) -> MuralResult<Post> {
        let sender = self.sessions.identity(&addr).ok_or(MuralError::AccessDenied)?;
        let post = Post::create(sender, content, self.port())?;

        self.store.insert(post.clone());
        self.stats.posts_published.incr();
        tracing::info!(uid = %post.uid, sender = %post.sender, body = %post.body, "new post published");

        self.propagator.propagate(&post);
        Ok(post)
    }

    /// `fetch`: copy of the board in arrival order
    pub fn fetch(&self) -> Vec<Post> {
        self.store.snapshot()
    }

    /// `sync`: dedup-insert a post pushed by a peer.
    ///
    /// Posts without a uid or with an empty body are rejected.
    pub fn accept_sync(&self, post: Post) -> MuralResult<InsertOutcome> {
        if !post.is_well_formed() {
            return Err(MuralError::InvalidSyncPayload);
        }

        let uid = post.uid.clone();
        let sender = post.sender.clone();
        let outcome = self.store.insert(post);
        match outcome {
            InsertOutcome::Inserted => {
                self.stats.posts_synced.incr();
                tracing::info!(uid = %uid, sender = %sender, "synchronized post received");
            }
            InsertOutcome::Duplicate => {
                self.stats.duplicate_syncs.incr();
                tracing::debug!(uid = %uid, "synchronized post already present");
            }
        }
        Ok(outcome)
    }

    /// `sync_request`: every local post whose uid the peer does not know
    pub fn missing_posts(&self, known_uids: Vec<PostUid>) -> Vec<Post> {
        let known: HashSet<PostUid> = known_uids.into_iter().collect();
        let missing = self.store.missing_from(&known);
        tracing::info!(
            peer_known = known.len(),
            missing = missing.len(),
            "answering reconciliation request"
        );
        missing
    }

    /// Tear down the session of a closed connection
    pub fn end_session(&self, addr: &SocketAddr) {
        if let Some(session) = self.sessions.end(addr) {
            tracing::debug!(user = %session.identity, %addr, "session ended");
        }
    }

    // ------------------------------------------------------------------
    // Administrative surface
    // ------------------------------------------------------------------

    /// Board ordered by creation time
    pub fn board_for_display(&self) -> Vec<Post> {
        self.store.sorted_snapshot()
    }

    pub fn status(&self) -> NodeStatus {
        NodeStatus {
            active: self.is_active(),
            port: self.port(),
            posts: self.store.len(),
            sessions: self.sessions.len(),
            peers: self.propagator.targets().len(),
            stats: self.stats.snapshot(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("port", &self.config.port)
            .field("active", &self.is_active())
            .field("posts", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn isolated_node() -> Node {
        Node::new(NodeConfig::new("127.0.0.1", 9001, &[]))
    }

    fn foreign_post(uid: &str) -> Post {
        Post {
            uid: PostUid::from(uid),
            sender: "carlos".into(),
            body: "from elsewhere".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_auth_then_publish() {
        let node = isolated_node();
        node.authenticate(addr(5000), "ana", "senha321").unwrap();

        let post = node.publish(addr(5000), "hello".into()).unwrap();
        assert_eq!(post.sender, "ana");
        assert_eq!(post.uid.origin_port(), Some(9001));

        let board = node.fetch();
        assert_eq!(board, vec![post]);
    }

    #[test]
    fn test_publish_without_session_is_denied() {
        let node = isolated_node();
        node.authenticate(addr(5001), "ana", "senha321").unwrap();

        let err = node.publish(addr(5000), "hello".into()).unwrap_err();
        assert_eq!(err, MuralError::AccessDenied);
        assert!(node.fetch().is_empty());
    }

    #[test]
    fn test_failed_auth_creates_no_session() {
        let node = isolated_node();
        let err = node.authenticate(addr(5000), "ana", "wrong").unwrap_err();
        assert_eq!(err, MuralError::InvalidCredentials);
        assert!(node.sessions().is_empty());
    }

    #[test]
    fn test_publish_empty_content() {
        let node = isolated_node();
        node.authenticate(addr(5000), "ana", "senha321").unwrap();
        assert_eq!(
            node.publish(addr(5000), String::new()).unwrap_err(),
            MuralError::EmptyContent
        );
        assert!(node.fetch().is_empty());
    }

    #[test]
    fn test_sync_is_idempotent() {
        let node = isolated_node();
        let post = foreign_post("1.000000-9002");
        for _ in 0..5 {
            node.accept_sync(post.clone()).unwrap();
        }
        assert_eq!(node.fetch().len(), 1);

        let snap = node.stats().snapshot();
        assert_eq!(snap.posts_synced, 1);
        assert_eq!(snap.duplicate_syncs, 4);
    }

    #[test]
    fn test_sync_rejects_empty_uid() {
        let node = isolated_node();
        assert_eq!(
            node.accept_sync(foreign_post("")).unwrap_err(),
            MuralError::InvalidSyncPayload
        );
    }

    #[test]
    fn test_sync_rejects_empty_body() {
        let node = isolated_node();
        let mut post = foreign_post("1.000000-9002");
        post.body.clear();
        assert_eq!(node.accept_sync(post).unwrap_err(), MuralError::InvalidSyncPayload);
        assert!(node.fetch().is_empty());
        assert_eq!(node.stats().snapshot().posts_synced, 0);
    }

    #[test]
    fn test_missing_posts() {
        let node = isolated_node();
        node.accept_sync(foreign_post("a")).unwrap();
        node.accept_sync(foreign_post("b")).unwrap();

        let missing = node.missing_posts(vec![PostUid::from("a")]);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].uid, PostUid::from("b"));
    }

    #[test]
    fn test_lifecycle_flags() {
        let node = isolated_node();
        assert!(node.is_active());
        assert!(node.deactivate());
        assert!(!node.deactivate());
        assert_eq!(node.ensure_active(), Err(MuralError::NodeInactive));
        assert!(node.activate());
        assert!(!node.activate());
        assert!(node.ensure_active().is_ok());
    }

    #[test]
    fn test_status() {
        let node = isolated_node();
        node.authenticate(addr(5000), "ana", "senha321").unwrap();
        node.accept_sync(foreign_post("a")).unwrap();

        let status = node.status();
        assert!(status.active);
        assert_eq!(status.posts, 1);
        assert_eq!(status.sessions, 1);
        assert!(status.to_string().contains("Posts on local board: 1"));

        node.end_session(&addr(5000));
        assert_eq!(node.status().sessions, 0);
    }
}
