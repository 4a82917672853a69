//! Conversation data model: sessions, intake steps, the visitor profile
//! and the append-only message list.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session identity
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Opaque identifier minted once per widget activation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Intake steps
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The profile field collected at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Email,
    Phone,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of the intake conversation. Only ever moves forward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    CollectName,
    CollectEmail,
    CollectPhone,
    Freeform,
}

impl Step {
    /// The step that follows a successful capture. `Freeform` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::CollectName => Self::CollectEmail,
            Self::CollectEmail => Self::CollectPhone,
            Self::CollectPhone | Self::Freeform => Self::Freeform,
        }
    }

    /// The field this step collects, or `None` once collection is over.
    pub fn field(self) -> Option<FieldKind> {
        match self {
            Self::CollectName => Some(FieldKind::Name),
            Self::CollectEmail => Some(FieldKind::Email),
            Self::CollectPhone => Some(FieldKind::Phone),
            Self::Freeform => None,
        }
    }

    pub fn is_collecting(self) -> bool {
        self != Self::Freeform
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollectName => "collect_name",
            Self::CollectEmail => "collect_email",
            Self::CollectPhone => "collect_phone",
            Self::Freeform => "freeform",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Profile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The three-field contact record assembled during intake.
///
/// An empty string means "not collected yet". Fields can only be written
/// through [`Profile::accept`], which refuses to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    name: String,
    email: String,
    phone: String,
}

impl Profile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn get(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Name => &self.name,
            FieldKind::Email => &self.email,
            FieldKind::Phone => &self.phone,
        }
    }

    /// Write `value` into the `kind` slot. Returns `false` (and leaves the
    /// profile untouched) if that slot was already filled or `value` is empty.
    pub fn accept(&mut self, kind: FieldKind, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = match kind {
            FieldKind::Name => &mut self.name,
            FieldKind::Email => &mut self.email,
            FieldKind::Phone => &mut self.phone,
        };
        if !slot.is_empty() || value.is_empty() {
            return false;
        }
        *slot = value;
        true
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && !self.phone.is_empty()
    }

    /// First whitespace-delimited token of the name, for friendly prompts.
    pub fn first_name(&self) -> Option<&str> {
        self.name.split_whitespace().next()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Messages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub origin_is_assistant: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    fn new(text: impl Into<String>, origin_is_assistant: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            origin_is_assistant,
            timestamp: Utc::now(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
