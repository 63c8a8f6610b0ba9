//! Identity types for the mural board
//!
//! A post is identified network-wide by its uid alone. The uid is minted once,
//! on the node where the post originates, and never rewritten afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Globally unique post identifier: `<unix-seconds>.<micros>-<origin-port>`
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostUid(String);

impl PostUid {
    /// Mint a uid for a post created at `at` on the node listening on `origin_port`.
    ///
    /// Two posts created on the same node within the same microsecond collide.
    pub fn mint(at: DateTime<Utc>, origin_port: u16) -> Self {
        PostUid(format!(
            "{}.{:06}-{}",
            at.timestamp(),
            at.timestamp_subsec_micros(),
            origin_port
        ))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Port of the node that created the post, if the uid is well formed
    pub fn origin_port(&self) -> Option<u16> {
        self.0.rsplit_once('-').and_then(|(_, port)| port.parse().ok())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for PostUid {
    fn from(value: String) -> Self {
        PostUid(value)
    }
}

impl From<&str> for PostUid {
    fn from(value: &str) -> Self {
        PostUid(value.to_owned())
    }
}

impl fmt::Debug for PostUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Post({})", self.0)
    }
}

impl fmt::Display for PostUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_uid_format() {
        let at = Utc.timestamp_opt(1_700_000_000, 42_000).unwrap();
        let uid = PostUid::mint(at, 9001);
        assert_eq!(uid.as_str(), "1700000000.000042-9001");
        assert_eq!(uid.origin_port(), Some(9001));
    }

    #[test]
    fn test_uid_differs_by_port() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_ne!(PostUid::mint(at, 9001), PostUid::mint(at, 9002));
    }

    #[test]
    fn test_foreign_uid_without_port() {
        let uid = PostUid::from("opaque");
        assert_eq!(uid.origin_port(), None);
        assert_eq!(uid.to_string(), "opaque");
    }
}
