use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Session key used when the caller does not supply one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Upper bound on session identifier length. Callers pick their own keys,
/// so the bound is enforced at construction rather than trusted from the wire.
pub const MAX_SESSION_ID_CHARS: usize = 128;

/// Opaque, caller-scoped conversation key.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Build a session id from caller input, truncating to
    /// [`MAX_SESSION_ID_CHARS`] on a char boundary.
    pub fn from_raw(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.chars().count() <= MAX_SESSION_ID_CHARS {
            Self(s)
        } else {
            Self(s.chars().take(MAX_SESSION_ID_CHARS).collect())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(DEFAULT_SESSION_ID.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_raw(s))
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}
