//! Error types for the mural board

use thiserror::Error;

/// Broad error class, deciding how a failure is surfaced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing request fields
    Validation,
    /// Operation needs an authenticated session
    Authorization,
    /// Credential mismatch
    Authentication,
    /// Node is administratively inactive
    Inactive,
    /// Connection-scoped failure
    Transport,
}

/// Core mural errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MuralError {
    // Validation errors
    #[error("content must not be empty")]
    EmptyContent,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid {action} request: {reason}")]
    InvalidRequest { action: String, reason: String },

    #[error("invalid sync payload")]
    InvalidSyncPayload,

    // Access errors
    #[error("access denied: authentication required")]
    AccessDenied,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("hub temporarily inactive")]
    NodeInactive,

    // Transport errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("frame too large: {size} > {limit}")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("timed out")]
    Timeout,

    #[error("peer rejected request: {0}")]
    PeerRejected(String),
}

impl MuralError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MuralError::EmptyContent
            | MuralError::MissingField(_)
            | MuralError::UnknownAction(_)
            | MuralError::InvalidRequest { .. }
            | MuralError::InvalidSyncPayload => ErrorKind::Validation,
            MuralError::AccessDenied => ErrorKind::Authorization,
            MuralError::InvalidCredentials => ErrorKind::Authentication,
            MuralError::NodeInactive => ErrorKind::Inactive,
            MuralError::Transport(_)
            | MuralError::ConnectionClosed
            | MuralError::MalformedFrame(_)
            | MuralError::FrameTooLarge { .. }
            | MuralError::Timeout
            | MuralError::PeerRejected(_) => ErrorKind::Transport,
        }
    }

    /// Whether the failure ends the connection or outbound attempt it happened on
    pub fn is_connection_fatal(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

impl From<std::io::Error> for MuralError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => MuralError::ConnectionClosed,
            std::io::ErrorKind::TimedOut => MuralError::Timeout,
            _ => MuralError::Transport(e.to_string()),
        }
    }
}

/// Result type for mural operations
pub type MuralResult<T> = Result<T, MuralError>;
