//! Reconciliation set arithmetic
//!
//! The responder side answers "which of my posts are not in this uid set";
//! the requester side merges the answer with the same dedup rule as a sync.

use std::collections::HashSet;

use mural_core::{Post, PostUid};

use crate::MessageStore;

/// Result of merging a batch of posts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Posts appended to the store
    pub merged: usize,
    /// Posts already present and skipped
    pub duplicates: usize,
}

impl MergeOutcome {
    /// Number of posts offered
    pub fn received(&self) -> usize {
        self.merged + self.duplicates
    }
}

impl MessageStore {
    /// Every stored post whose uid is not in `known`, in arrival order
    pub fn missing_from(&self, known: &HashSet<PostUid>) -> Vec<Post> {
        self.inner
            .lock()
            .posts
            .iter()
            .filter(|p| !known.contains(&p.uid))
            .cloned()
            .collect()
    }

    /// Dedup-insert a batch under a single lock acquisition
    pub fn merge<I>(&self, posts: I) -> MergeOutcome
    where
        I: IntoIterator<Item = Post>,
    {
        let mut outcome = MergeOutcome::default();
        {
            let mut inner = self.inner.lock();
            for post in posts {
                if inner.insert(post).is_inserted() {
                    outcome.merged += 1;
                } else {
                    outcome.duplicates += 1;
                }
            }
        }
        tracing::debug!(
            merged = outcome.merged,
            duplicates = outcome.duplicates,
            "merged post batch"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::post;

    #[test]
    fn test_missing_from() {
        let store = MessageStore::new();
        store.insert(post("a", 1));
        store.insert(post("b", 2));
        store.insert(post("c", 3));

        let known: HashSet<PostUid> = ["a", "c", "zzz"].into_iter().map(PostUid::from).collect();
        let missing = store.missing_from(&known);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].uid, PostUid::from("b"));

        assert_eq!(store.missing_from(&HashSet::new()).len(), 3);
    }

    #[test]
    fn test_merge_skips_known_posts() {
        let store = MessageStore::new();
        store.insert(post("a", 1));

        let outcome = store.merge(vec![post("a", 1), post("b", 2), post("b", 2)]);
        assert_eq!(outcome, MergeOutcome { merged: 1, duplicates: 2 });
        assert_eq!(outcome.received(), 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_exchange_converges() {
        let a = MessageStore::new();
        let b = MessageStore::new();
        a.insert(post("shared", 1));
        b.insert(post("shared", 1));
        a.insert(post("only-a", 2));

        let known: HashSet<PostUid> = b.known_uids().into_iter().collect();
        let outcome = b.merge(a.missing_from(&known));
        assert_eq!(outcome.merged, 1);

        let mut left = a.known_uids();
        let mut right = b.known_uids();
        left.sort();
        right.sort();
        assert_eq!(left, right);
    }

    proptest::proptest! {
        #[test]
        fn test_missing_plus_known_covers_store(
            stored in proptest::collection::hash_set(0u16..200, 0..60),
            known in proptest::collection::hash_set(0u16..200, 0..60),
        ) {
            let store = MessageStore::new();
            for id in &stored {
                store.insert(post(&id.to_string(), *id as i64));
            }
            let known_uids: HashSet<PostUid> = known.iter().map(|id| PostUid::from(id.to_string())).collect();
            let missing = store.missing_from(&known_uids);

            proptest::prop_assert_eq!(missing.len(), stored.difference(&known).count());
            for p in &missing {
                proptest::prop_assert!(!known_uids.contains(&p.uid));
            }
        }
    }
}
