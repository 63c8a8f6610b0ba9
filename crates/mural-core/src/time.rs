//! Time primitives for the mural board
//!
//! Wall-clock time is only used to mint uids and to order posts for display.
//! It never decides which copy of a post wins.

use chrono::{DateTime, SecondsFormat, Utc};

/// Origin-node wall-clock timestamp of a post
pub type Timestamp = DateTime<Utc>;

/// Current wall-clock time
#[inline]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp for console output
pub fn display(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
