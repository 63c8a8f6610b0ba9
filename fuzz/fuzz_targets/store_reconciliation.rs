#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use mural_core::{Post, PostUid};
use mural_state::MessageStore;

#[derive(Arbitrary, Debug)]
struct Input {
    local: Vec<u8>,
    remote: Vec<u8>,
}

fn post(n: u8) -> Post {
    Post {
        uid: PostUid::from(format!("{n}.000000-1")),
        sender: "fuzz".into(),
        body: n.to_string(),
        created_at: Utc.timestamp_opt(i64::from(n), 0).unwrap(),
    }
}

fuzz_target!(|input: Input| {
    let local = MessageStore::new();
    for &n in &input.local {
        local.insert(post(n));
    }
    let remote = MessageStore::new();
    for &n in &input.remote {
        remote.insert(post(n));
    }

    let known: HashSet<PostUid> = local.known_uids().into_iter().collect();
    let missing = remote.missing_from(&known);
    let outcome = local.merge(missing);
    assert_eq!(outcome.duplicates, 0);

    let local_uids: HashSet<PostUid> = local.known_uids().into_iter().collect();
    assert_eq!(local_uids.len(), local.len());
    for uid in remote.known_uids() {
        assert!(local_uids.contains(&uid));
    }
});
