//! Posts on the board
//!
//! A post is immutable once created and travels between nodes verbatim.

use serde::{Deserialize, Serialize};

use crate::{time, MuralError, MuralResult, PostUid, Timestamp};

/// A single message on the board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Network-wide deduplication key
    pub uid: PostUid,
    /// Authenticated author
    pub sender: String,
    /// Message text, never empty for locally created posts
    pub body: String,
    /// Origin-node wall clock at creation
    pub created_at: Timestamp,
}

impl Post {
    /// Create a new post originating on the node listening on `origin_port`.
    pub fn create(sender: impl Into<String>, body: impl Into<String>, origin_port: u16) -> MuralResult<Self> {
        let body = body.into();
        if body.is_empty() {
            return Err(MuralError::EmptyContent);
        }
        let created_at = time::now();
        Ok(Post {
            uid: PostUid::mint(created_at, origin_port),
            sender: sender.into(),
            body,
            created_at,
        })
    }

    /// Carries a uid and a non-empty body, as every post accepted from a
    /// peer must
    pub fn is_well_formed(&self) -> bool {
        !self.uid.is_empty() && !self.body.is_empty()
    }

    /// One-line console rendering: `[created_at] sender: body`
    pub fn display_line(&self) -> String {
        format!("[{}] {}: {}", time::display(&self.created_at), self.sender, self.body)
    }
}

/// Sort posts for display by creation time, keeping arrival order on ties
pub fn sort_for_display(posts: &mut [Post]) {
    posts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post_at(uid: &str, secs: i64) -> Post {
        Post {
            uid: PostUid::from(uid),
            sender: "ana".into(),
            body: uid.into(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_create_post() {
        let post = Post::create("ana", "hello", 9001).unwrap();
        assert_eq!(post.sender, "ana");
        assert_eq!(post.body, "hello");
        assert_eq!(post.uid.origin_port(), Some(9001));
    }

    #[test]
    fn test_create_rejects_empty_body() {
        assert!(matches!(
            Post::create("ana", "", 9001),
            Err(MuralError::EmptyContent)
        ));
    }

    #[test]
    fn test_well_formed() {
        assert!(post_at("1-9001", 1).is_well_formed());

        let mut no_body = post_at("1-9001", 1);
        no_body.body.clear();
        assert!(!no_body.is_well_formed());

        let mut no_uid = post_at("1-9001", 1);
        no_uid.uid = PostUid::from("");
        assert!(!no_uid.is_well_formed());
    }

    #[test]
    fn test_json_field_names() {
        let post = post_at("1-9001", 1_700_000_000);
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["uid"], "1-9001");
        assert_eq!(json["sender"], "ana");
        assert!(json["created_at"].as_str().unwrap().starts_with("2023-11-14T22:13:20"));
    }

    #[test]
    fn test_sort_for_display_is_stable() {
        let mut posts = vec![
            post_at("c", 30),
            post_at("a", 10),
            post_at("b1", 20),
            post_at("b2", 20),
        ];
        sort_for_display(&mut posts);
        let order: Vec<_> = posts.iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(order, ["a", "b1", "b2", "c"]);
    }
}
