use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    domain::user_data::UserData,
    store::{catalogue::Catalogue, error::StoreError, query, schema},
};

/// Layout of exported text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pretty,
    Compact,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ImportSummary {
    pub tags: usize,
    pub tracks: usize,
    /// track tag ids with no matching tag
    pub dangling_references: usize,
}

/// Serializes the whole catalogue.
///
/// Output is a pure function of the catalogue state: the same state always
/// yields the same bytes.
pub fn export(catalogue: &Catalogue, format: ExportFormat) -> String {
    let data = UserData {
        tags: catalogue.tags().to_vec(),
        tracks: catalogue.tracks().to_vec(),
    };

    let encoded = match format {
        ExportFormat::Pretty => serde_json::to_string_pretty(&data),
        ExportFormat::Compact => serde_json::to_string(&data),
    };
    // only string fields and sequences, nothing that can fail to encode
    encoded.expect("user data always encodes as JSON")
}

/// Replaces the catalogue with the document in `raw`.
///
/// On any validation failure the catalogue is left exactly as it was.
pub fn import(catalogue: &mut Catalogue, raw: &str) -> Result<ImportSummary, StoreError> {
    let UserData { tags, tracks } = schema::validate(raw).inspect_err(|e| {
        warn!("Rejected user data import: {e}");
    })?;

    catalogue.replace_all(tags, tracks);

    let dangling = query::dangling_references(catalogue);
    if !dangling.is_empty() {
        warn!(
            "Imported user data has {} track tag references without a tag",
            dangling.len()
        );
    }

    let summary = ImportSummary {
        tags: catalogue.tags().len(),
        tracks: catalogue.tracks().len(),
        dangling_references: dangling.len(),
    };
    info!("Imported {} tags and {} tracks", summary.tags, summary.tracks);
    Ok(summary)
}
