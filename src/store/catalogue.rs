use log::{debug, info};

use crate::{
    domain::{
        tag::{Tag, TagId},
        track::{Track, TrackId, dedup_tag_ids},
    },
    store::error::StoreError,
};

/// Main structure that owns all user tags and tracks
///
/// Every mutation goes through `&mut self`, so a query borrowing the
/// catalogue always sees the latest committed state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Catalogue {
    tags: Vec<Tag>,
    tracks: Vec<Track>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.local_id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.tracks.is_empty()
    }

    /// exact, case-sensitive match on the tag name
    pub fn tag_exists(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    fn tag_id_taken(&self, id: &TagId) -> bool {
        self.tags.iter().any(|tag| &tag.local_id == id)
    }

    fn track_mut(&mut self, id: &TrackId) -> Result<&mut Track, StoreError> {
        self.tracks
            .iter_mut()
            .find(|t| &t.local_id == id)
            .ok_or_else(|| StoreError::TrackNotFound(id.clone()))
    }

    /// Creates a tag with a fresh id and appends it to the catalogue.
    ///
    /// Fails without touching the catalogue if a tag with that name exists.
    pub fn add_tag(&mut self, name: &str, color: &str) -> Result<Tag, StoreError> {
        if self.tag_exists(name) {
            return Err(StoreError::DuplicateTag(name.to_string()));
        }

        let mut id = TagId::generate();
        while self.tag_id_taken(&id) {
            id = TagId::generate();
        }

        let tag = Tag::local(id, name, color);
        self.tags.push(tag.clone());
        info!("Added tag \"{}\" ({})", tag.name, tag.local_id);
        Ok(tag)
    }

    /// Appends a track with a fresh id. Tag ids are not checked.
    pub fn add_track(
        &mut self,
        title: &str,
        artists: Vec<String>,
        tags: impl IntoIterator<Item = TagId>,
    ) -> Track {
        let mut id = TrackId::generate();
        while self.track(&id).is_some() {
            id = TrackId::generate();
        }

        let track = Track {
            local_id: id,
            title: title.to_string(),
            artists,
            tags: dedup_tag_ids(tags),
        };
        self.tracks.push(track.clone());
        info!("Added track \"{}\" ({})", track.title, track.local_id);
        track
    }

    /// associates an existing tag with an existing track
    ///
    /// no-op if the track already carries the tag
    pub fn add_tag_to_track(&mut self, tag: &TagId, track: &TrackId) -> Result<(), StoreError> {
        if !self.tag_id_taken(tag) {
            return Err(StoreError::TagNotFound(tag.clone()));
        }

        if self.track_mut(track)?.insert_tag(tag.clone()) {
            debug!("Tagged track {track} with {tag}");
        }
        Ok(())
    }

    /// Drops `tag` from one track's tag list.
    ///
    /// The tag itself stays in the catalogue and other tracks are left alone.
    /// Removing a tag the track does not carry is a no-op. The tag does not
    /// have to exist, which makes this the way to clear a dangling reference.
    pub fn remove_tag_from_track(&mut self, tag: &TagId, track: &TrackId) -> Result<(), StoreError> {
        if self.track_mut(track)?.remove_tag(tag) {
            debug!("Removed tag {tag} from track {track}");
        }
        Ok(())
    }

    /// Swaps both sequences at once, discarding the previous state.
    pub fn replace_all(&mut self, tags: Vec<Tag>, tracks: Vec<Track>) {
        *self = Self { tags, tracks };
        info!(
            "Catalogue replaced: {} tags, {} tracks",
            self.tags.len(),
            self.tracks.len()
        );
    }
}
