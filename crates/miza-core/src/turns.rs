use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Label used when the turn is rendered into the upstream transcript.
    pub fn speaker(&self) -> &'static str {
        match self {
            Self::User => "Usuario",
            Self::Model => "MIZA",
        }
    }
}

/// One entry of a session's conversation history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }

    /// `"Usuario: <text>"` / `"MIZA: <text>"` transcript line.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.speaker(), self.text)
    }
}
