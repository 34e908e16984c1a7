use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Which side of the session this endpoint plays.
///
/// Only the broadcaster ever creates an offer, so the two roles can never
/// both initiate negotiation at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Broadcaster,
    Viewer,
}

impl Role {
    /// `true` for the role that sends the offer.
    pub fn is_initiator(self) -> bool {
        matches!(self, Role::Broadcaster)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Broadcaster => "broadcaster",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "broadcaster" => Ok(Role::Broadcaster),
            "viewer" => Ok(Role::Viewer),
            other => Err(ModelError::UnknownRole(other.to_owned())),
        }
    }
}
