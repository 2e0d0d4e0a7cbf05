//! Gatekeeper for user data coming from outside the process.
//!
//! The raw text is parsed into a JSON tree first and every record is
//! checked field by field, so a rejected document reports the exact path
//! that failed. Only a fully valid document is turned into [`UserData`].

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::{
    domain::{
        tag::{Tag, TagId, TagKind},
        track::{Track, TrackId, dedup_tag_ids},
        user_data::UserData,
    },
    store::error::SchemaError,
};

pub mod fields {
    pub const TAGS: &str = "tags";
    pub const TRACKS: &str = "tracks";
    pub const TYPE: &str = "type";
    pub const LOCAL_ID: &str = "localId";
    pub const NAME: &str = "name";
    pub const COLOR: &str = "color";
    pub const TITLE: &str = "title";
    pub const ARTISTS: &str = "artists";
}

use fields::*;

/// Parses and checks `raw`, returning the document it describes.
pub fn validate(raw: &str) -> Result<UserData, SchemaError> {
    let root: Value = serde_json::from_str(raw).map_err(|e| SchemaError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;

    let root = as_object(&root, "$")?;
    let tags = required_array(root, "$", TAGS)?
        .iter()
        .enumerate()
        .map(|(i, value)| tag(value, &format!("$.{TAGS}[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    let tracks = required_array(root, "$", TRACKS)?
        .iter()
        .enumerate()
        .map(|(i, value)| track(value, &format!("$.{TRACKS}[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    check_unique(tags.iter().map(|t| t.local_id.as_str()), TAGS, LOCAL_ID)?;
    check_unique(tags.iter().map(|t| t.name.as_str()), TAGS, NAME)?;
    check_unique(tracks.iter().map(|t| t.local_id.as_str()), TRACKS, LOCAL_ID)?;

    Ok(UserData { tags, tracks })
}

fn tag(value: &Value, path: &str) -> Result<Tag, SchemaError> {
    let record = as_object(value, path)?;

    let kind = required_str(record, path, TYPE)?;
    if kind != TagKind::LOCAL {
        return Err(SchemaError::UnknownTagType {
            path: format!("{path}.{TYPE}"),
            found: kind.to_string(),
        });
    }

    Ok(Tag::local(
        TagId(required_str(record, path, LOCAL_ID)?.to_string()),
        required_str(record, path, NAME)?,
        required_str(record, path, COLOR)?,
    ))
}

fn track(value: &Value, path: &str) -> Result<Track, SchemaError> {
    let record = as_object(value, path)?;

    let local_id = TrackId(required_str(record, path, LOCAL_ID)?.to_string());
    let title = required_str(record, path, TITLE)?.to_string();
    let artists = string_array(record, path, ARTISTS)?;
    let tags = string_array(record, path, TAGS)?;

    Ok(Track {
        local_id,
        title,
        artists,
        tags: dedup_tag_ids(tags.into_iter().map(TagId)),
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    value.as_object().ok_or_else(|| SchemaError::WrongType {
        path: path.to_string(),
        expected: "object",
    })
}

fn required<'a>(
    record: &'a Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<&'a Value, SchemaError> {
    record.get(field).ok_or_else(|| SchemaError::MissingField {
        path: format!("{path}.{field}"),
    })
}

fn required_str<'a>(
    record: &'a Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<&'a str, SchemaError> {
    required(record, path, field)?
        .as_str()
        .ok_or_else(|| SchemaError::WrongType {
            path: format!("{path}.{field}"),
            expected: "string",
        })
}

fn required_array<'a>(
    record: &'a Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<&'a Vec<Value>, SchemaError> {
    required(record, path, field)?
        .as_array()
        .ok_or_else(|| SchemaError::WrongType {
            path: format!("{path}.{field}"),
            expected: "array",
        })
}

fn string_array(
    record: &Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<Vec<String>, SchemaError> {
    required_array(record, path, field)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaError::WrongType {
                    path: format!("{path}.{field}[{i}]"),
                    expected: "string",
                })
        })
        .collect()
}

fn check_unique<'a>(
    values: impl Iterator<Item = &'a str>,
    collection: &str,
    field: &str,
) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for (i, value) in values.enumerate() {
        if !seen.insert(value) {
            return Err(SchemaError::Duplicate {
                path: format!("$.{collection}[{i}].{field}"),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}
