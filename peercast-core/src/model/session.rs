use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::utils::DEFAULT_ACCESS_CODE;

/// Shared access code naming the relay room both endpoints join.
///
/// The relay routes `ws/signal/<code>/`, so the code is restricted to word
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    pub fn parse(code: impl Into<String>) -> Result<Self, ModelError> {
        let code = code.into();
        if code.is_empty() {
            return Err(ModelError::InvalidCode(code));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ModelError::InvalidCode(code));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full relay URL for this room, e.g. `ws://localhost:8000/ws/signal/12345678/`.
    pub fn signal_url(&self, relay_base: &str) -> String {
        format!("{}/ws/signal/{}/", relay_base.trim_end_matches('/'), self.0)
    }

    /// Whether a wire `code` field belongs to this session.
    pub fn matches(&self, code: Option<&str>) -> bool {
        code == Some(self.0.as_str())
    }
}

impl Default for SessionCode {
    fn default() -> Self {
        Self(DEFAULT_ACCESS_CODE.to_owned())
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}
