//! Message store - the local board
//!
//! One lock guards the whole store. Every read, append and existence check
//! happens inside it, and nothing that can block on the network ever runs
//! while it is held.

use std::collections::HashSet;

use parking_lot::Mutex;

use mural_core::{sort_for_display, Post, PostUid};

/// Result of a dedup-insert
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The post was new and has been appended
    Inserted,
    /// A post with the same uid was already present; nothing changed
    Duplicate,
}

impl InsertOutcome {
    #[inline]
    pub fn is_inserted(self) -> bool {
        self == InsertOutcome::Inserted
    }
}

#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    /// Posts in arrival order
    pub(crate) posts: Vec<Post>,
    /// Uids of every post in `posts`
    pub(crate) uids: HashSet<PostUid>,
}

impl StoreInner {
    pub(crate) fn insert(&mut self, post: Post) -> InsertOutcome {
        if self.uids.contains(&post.uid) {
            return InsertOutcome::Duplicate;
        }
        self.uids.insert(post.uid.clone());
        self.posts.push(post);
        InsertOutcome::Inserted
    }
}

/// Append-only, uid-deduplicated log of posts
#[derive(Debug, Default)]
pub struct MessageStore {
    pub(crate) inner: Mutex<StoreInner>,
}

impl MessageStore {
    pub fn new() -> Self {
        MessageStore::default()
    }

    /// Append `post` unless a post with the same uid is already stored
    pub fn insert(&self, post: Post) -> InsertOutcome {
        self.inner.lock().insert(post)
    }

    /// Copy of every post, in arrival order
    pub fn snapshot(&self) -> Vec<Post> {
        self.inner.lock().posts.clone()
    }

    /// Copy of every post, ordered by creation time for display
    pub fn sorted_snapshot(&self) -> Vec<Post> {
        let mut posts = self.snapshot();
        sort_for_display(&mut posts);
        posts
    }

    /// Uids of every stored post, in arrival order
    pub fn known_uids(&self) -> Vec<PostUid> {
        self.inner
            .lock()
            .posts
            .iter()
            .map(|p| p.uid.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().posts.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub(crate) fn post(uid: &str, secs: i64) -> Post {
        Post {
            uid: PostUid::from(uid),
            sender: "ana".into(),
            body: format!("body of {uid}"),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_insert_and_dedup() {
        let store = MessageStore::new();
        assert!(store.is_empty());

        assert_eq!(store.insert(post("a", 1)), InsertOutcome::Inserted);
        assert_eq!(store.insert(post("a", 1)), InsertOutcome::Duplicate);
        assert_eq!(store.insert(post("b", 2)), InsertOutcome::Inserted);

        assert_eq!(store.len(), 2);
        assert_eq!(store.known_uids(), vec![PostUid::from("a"), PostUid::from("b")]);
    }

    #[test]
    fn test_duplicate_keeps_first_copy() {
        let store = MessageStore::new();
        store.insert(post("a", 1));
        let mut altered = post("a", 1);
        altered.body = "tampered".into();
        assert_eq!(store.insert(altered), InsertOutcome::Duplicate);
        assert_eq!(store.snapshot()[0].body, "body of a");
    }

    #[test]
    fn test_snapshot_arrival_order_vs_sorted() {
        let store = MessageStore::new();
        store.insert(post("late", 30));
        store.insert(post("early", 10));

        let arrival: Vec<_> = store.snapshot().into_iter().map(|p| p.uid).collect();
        assert_eq!(arrival, [PostUid::from("late"), PostUid::from("early")]);

        let sorted: Vec<_> = store.sorted_snapshot().into_iter().map(|p| p.uid).collect();
        assert_eq!(sorted, [PostUid::from("early"), PostUid::from("late")]);

        assert_eq!(store.known_uids(), [PostUid::from("late"), PostUid::from("early")]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let store = MessageStore::new();
        store.insert(post("a", 1));
        let snap = store.snapshot();
        store.insert(post("b", 2));
        assert_eq!(snap.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_concurrent_inserts_of_same_uid() {
        let store = std::sync::Arc::new(MessageStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|i| store.insert(post(&format!("p{i}"), *i)).is_inserted())
                        .count()
                })
            })
            .collect();
        let inserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(inserted, 50);
        assert_eq!(store.len(), 50);
    }

    proptest::proptest! {
        #[test]
        fn test_store_never_holds_duplicate_uids(ids in proptest::collection::vec(0u8..20, 0..100)) {
            let store = MessageStore::new();
            for id in &ids {
                store.insert(post(&id.to_string(), *id as i64));
            }
            let distinct: HashSet<u8> = ids.iter().copied().collect();
            proptest::prop_assert_eq!(store.len(), distinct.len());
        }
    }
}
