use serde::{Deserialize, Serialize};

use super::{tag::Tag, track::Track};

/// The whole catalogue as one portable document.
///
/// Field order here is the field order of every export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub tags: Vec<Tag>,
    pub tracks: Vec<Track>,
}
