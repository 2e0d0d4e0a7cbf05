use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::tag::TagId;

/// Represents the track ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub String);

impl TrackId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Represent a catalogued track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub local_id: TrackId,
    pub title: String,
    pub artists: Vec<String>,
    /// Tag ids in insertion order, without duplicates.
    pub tags: Vec<TagId>,
}

impl Track {
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.contains(tag)
    }

    /// returns false if the tag was already there
    pub(crate) fn insert_tag(&mut self, tag: TagId) -> bool {
        if self.has_tag(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// returns false if the tag was not there
    pub(crate) fn remove_tag(&mut self, tag: &TagId) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }
}

/// Drops repeated ids, keeping the first occurrence.
pub(crate) fn dedup_tag_ids(ids: impl IntoIterator<Item = TagId>) -> Vec<TagId> {
    let mut out: Vec<TagId> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
