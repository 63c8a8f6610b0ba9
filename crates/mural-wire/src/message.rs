//! Request and response objects carried inside frames
//!
//! Every request names its `action`; every response carries `status` and a
//! human-readable `content`, plus `board` for fetch and `missing_posts` for
//! sync_request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use mural_core::{MuralError, MuralResult, Post, PostUid};

/// Actions understood by a node
pub const ACTIONS: [&str; 5] = ["auth", "publish", "fetch", "sync", "sync_request"];

/// A request frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    /// Authenticate this connection
    Auth { user: String, pass: String },
    /// Publish a post as the session identity
    Publish {
        #[serde(default)]
        content: String,
    },
    /// Snapshot of the whole local board
    Fetch,
    /// Push of one post from a peer
    Sync { message_payload: Post },
    /// Ask for every post whose uid is not in `known_uids`
    SyncRequest {
        #[serde(default)]
        known_uids: Vec<PostUid>,
    },
}

impl Request {
    /// Build a typed request from a decoded JSON object.
    ///
    /// Unknown actions and bad fields are validation errors, never fatal to
    /// the connection.
    pub fn from_value(value: Value) -> MuralResult<Self> {
        let action = match value.get("action") {
            Some(Value::String(action)) => action.clone(),
            Some(other) => return Err(MuralError::UnknownAction(other.to_string())),
            None => return Err(MuralError::MissingField("action")),
        };

        if !ACTIONS.contains(&action.as_str()) {
            return Err(MuralError::UnknownAction(action));
        }

        serde_json::from_value(value).map_err(|e| {
            if action == "sync" {
                MuralError::InvalidSyncPayload
            } else {
                MuralError::InvalidRequest {
                    action,
                    reason: e.to_string(),
                }
            }
        })
    }

    pub fn action(&self) -> &'static str {
        match self {
            Request::Auth { .. } => "auth",
            Request::Publish { .. } => "publish",
            Request::Fetch => "fetch",
            Request::Sync { .. } => "sync",
            Request::SyncRequest { .. } => "sync_request",
        }
    }
}

/// Response status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// A response frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Vec<Post>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_posts: Option<Vec<Post>>,
}

impl Response {
    pub fn ok(content: impl Into<String>) -> Self {
        Response {
            status: Status::Ok,
            content: content.into(),
            board: None,
            missing_posts: None,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Response {
            status: Status::Error,
            ..Response::ok(content)
        }
    }

    /// Error response whose content is the error's display text
    pub fn from_error(err: &MuralError) -> Self {
        Response::error(err.to_string())
    }

    /// Fetch response
    pub fn board(posts: Vec<Post>) -> Self {
        Response {
            board: Some(posts),
            ..Response::ok("board")
        }
    }

    /// Reconciliation response
    pub fn missing_posts(posts: Vec<Post>) -> Self {
        let content = format!("{} missing posts", posts.len());
        Response {
            missing_posts: Some(posts),
            ..Response::ok(content)
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Turn an error status into `PeerRejected`
    pub fn into_result(self) -> MuralResult<Self> {
        match self.status {
            Status::Ok => Ok(self),
            Status::Error => Err(MuralError::PeerRejected(self.content)),
        }
    }
}

impl From<MuralResult<Response>> for Response {
    fn from(result: MuralResult<Response>) -> Self {
        result.unwrap_or_else(|e| Response::from_error(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_each_action() {
        let auth = Request::from_value(json!({"action": "auth", "user": "ana", "pass": "senha321"}));
        assert_eq!(
            auth.unwrap(),
            Request::Auth {
                user: "ana".into(),
                pass: "senha321".into()
            }
        );

        let fetch = Request::from_value(json!({"action": "fetch"})).unwrap();
        assert_eq!(fetch, Request::Fetch);

        let req = Request::from_value(json!({"action": "sync_request", "known_uids": ["a", "b"]}));
        assert_eq!(
            req.unwrap(),
            Request::SyncRequest {
                known_uids: vec!["a".into(), "b".into()]
            }
        );
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let publish = Request::from_value(json!({"action": "publish"})).unwrap();
        assert_eq!(publish, Request::Publish { content: String::new() });

        let req = Request::from_value(json!({"action": "sync_request"})).unwrap();
        assert_eq!(req, Request::SyncRequest { known_uids: vec![] });
    }

    #[test]
    fn test_unknown_and_missing_action() {
        assert_eq!(
            Request::from_value(json!({"action": "delete"})),
            Err(MuralError::UnknownAction("delete".into()))
        );
        assert_eq!(
            Request::from_value(json!({"user": "ana"})),
            Err(MuralError::MissingField("action"))
        );
        assert_eq!(
            Request::from_value(json!([1, 2])),
            Err(MuralError::MissingField("action"))
        );
    }

    #[test]
    fn test_sync_without_uid_is_invalid_payload() {
        let req = json!({
            "action": "sync",
            "message_payload": {"sender": "ana", "body": "x", "created_at": "2024-01-01T00:00:00Z"}
        });
        assert_eq!(Request::from_value(req), Err(MuralError::InvalidSyncPayload));
        assert_eq!(
            Request::from_value(json!({"action": "sync"})),
            Err(MuralError::InvalidSyncPayload)
        );
    }

    #[test]
    fn test_auth_missing_pass_is_validation_error() {
        let err = Request::from_value(json!({"action": "auth", "user": "ana"})).unwrap_err();
        assert!(matches!(err, MuralError::InvalidRequest { ref action, .. } if action == "auth"));
    }

    #[test]
    fn test_request_encodes_action_tag() {
        let value = serde_json::to_value(Request::SyncRequest { known_uids: vec![] }).unwrap();
        assert_eq!(value, json!({"action": "sync_request", "known_uids": []}));
    }

    #[test]
    fn test_response_shape() {
        let value = serde_json::to_value(Response::ok("done")).unwrap();
        assert_eq!(value, json!({"status": "ok", "content": "done"}));

        let value = serde_json::to_value(Response::board(vec![])).unwrap();
        assert_eq!(value["board"], json!([]));
        assert!(value.get("missing_posts").is_none());

        let value = serde_json::to_value(Response::from_error(&MuralError::AccessDenied)).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["content"], "access denied: authentication required");
    }

    #[test]
    fn test_response_without_content_decodes() {
        let resp: Response = serde_json::from_value(json!({"status": "ok", "missing_posts": []})).unwrap();
        assert!(resp.is_ok());
        assert_eq!(resp.missing_posts, Some(vec![]));
    }

    #[test]
    fn test_into_result() {
        let err = Response::error("nope").into_result().unwrap_err();
        assert_eq!(err, MuralError::PeerRejected("nope".into()));
        assert!(Response::ok("yes").into_result().is_ok());
    }
}
