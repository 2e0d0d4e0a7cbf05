use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identifier of a user-defined tag.
///
/// Generated by the catalogue when a tag is created and kept verbatim
/// across export and import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub String);

impl TagId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TagId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Where a tag comes from. Only user-defined tags exist for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagKind {
    #[serde(rename = "local")]
    Local,
}

impl TagKind {
    pub const LOCAL: &'static str = "local";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(rename = "type")]
    pub kind: TagKind,
    pub local_id: TagId,
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn local(local_id: TagId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            kind: TagKind::Local,
            local_id,
            name: name.into(),
            color: color.into(),
        }
    }
}
