use peercast_core::{ModelError, Role};
use thiserror::Error;

/// Failures of the relay connection itself.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to connect to relay at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("failed to send `{kind}` message: {reason}")]
    Send { kind: String, reason: String },

    #[error("relay connection closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("media source not available: {0}")]
    NotAvailable(String),
}

/// Errors reported by a peer-transport engine.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    WebRtc(#[from] webrtc::Error),

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("unsupported session description type `{0}`")]
    UnsupportedDescription(String),

    #[error("{0}")]
    Engine(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("parse error: {0}")]
    Parse(#[from] ModelError),

    #[error("negotiation failed: {0}")]
    Negotiation(#[source] TransportError),

    #[error("media acquisition failed: {0}")]
    MediaAcquisition(#[from] MediaError),

    #[error("failed to apply ICE candidate: {0}")]
    CandidateApply(#[source] TransportError),

    #[error("role already assigned as {current}, refusing {requested}")]
    RoleConflict { current: Role, requested: Role },

    #[error("operation requires the {required} role (assigned: {actual:?})")]
    WrongRole {
        required: Role,
        actual: Option<Role>,
    },

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("session has failed; restart with a new role assignment")]
    SessionFailed,

    #[error("session has been torn down")]
    TornDown,
}
