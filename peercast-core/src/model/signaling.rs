use crate::error::ModelError;
use crate::model::role::Role;
use crate::model::session::SessionCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// The `type` tag of a relay message.
///
/// Unrecognized tags are kept verbatim in `Other` so that newer relays do not
/// break older clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    Join,
    JoinAck,
    Offer,
    Answer,
    IceCandidate,
    Error,
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Join => "join",
            MessageKind::JoinAck => "join_ack",
            MessageKind::Offer => "offer",
            MessageKind::Answer => "answer",
            MessageKind::IceCandidate => "ice-candidate",
            MessageKind::Error => "error",
            MessageKind::Other(tag) => tag,
        }
    }
}

impl From<String> for MessageKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "join" => MessageKind::Join,
            "join_ack" => MessageKind::JoinAck,
            "offer" => MessageKind::Offer,
            "answer" => MessageKind::Answer,
            "ice-candidate" => MessageKind::IceCandidate,
            "error" => MessageKind::Error,
            _ => MessageKind::Other(tag),
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque session description (`{"type": "offer", "sdp": "..."}` in browsers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionDescription(pub Value);

impl SessionDescription {
    /// The `type` member, when present.
    pub fn sdp_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn sdp(&self) -> Option<&str> {
        self.0.get("sdp").and_then(Value::as_str)
    }
}

/// Opaque network-path candidate (`RTCIceCandidateInit` shape in browsers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateDescriptor(pub Value);

/// One JSON text frame exchanged with the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SignalMessage {
    pub fn new(kind: MessageKind, data: Option<Value>, code: &SessionCode, role: Role) -> Self {
        Self {
            kind,
            data,
            code: Some(code.as_str().to_owned()),
            role: Some(role),
            message: None,
        }
    }

    pub fn join(code: &SessionCode, role: Role) -> Self {
        Self::new(MessageKind::Join, None, code, role)
    }

    pub fn decode(text: &str) -> Result<Self, ModelError> {
        serde_json::from_str(text).map_err(ModelError::Decode)
    }

    pub fn encode(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(ModelError::Encode)
    }

    pub fn session_description(&self) -> Option<SessionDescription> {
        self.data.clone().map(SessionDescription)
    }

    pub fn candidate(&self) -> Option<CandidateDescriptor> {
        self.data.clone().map(CandidateDescriptor)
    }
}
