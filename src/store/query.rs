//! Derived, read-only views over a [`Catalogue`].
//!
//! Nothing here is cached: every call recomputes from the catalogue it
//! borrows.

use std::{cmp::Ordering, collections::HashSet};

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
    domain::{
        tag::{Tag, TagId},
        track::{Track, TrackId},
    },
    store::catalogue::Catalogue,
};

/// A track entry pointing at a tag that is not in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub track: TrackId,
    pub tag: TagId,
}

/// Base letters only: decomposed, accents stripped, lowercased.
fn base_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().flat_map(char::to_lowercase)
}

/// Collates names the way a UI expects: base letters first, ignoring
/// accents and case, then unaccented before accented, then lowercase
/// before uppercase.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => x.cmp(&y),
                })
                .unwrap_or(Ordering::Equal)
        })
}

/// All tags ordered by name.
pub fn sorted_tags(catalogue: &Catalogue) -> Vec<&Tag> {
    let mut tags = catalogue.tags().iter().collect::<Vec<_>>();
    tags.sort_by(|a, b| compare_names(&a.name, &b.name));
    tags
}

/// `None` is an expected answer here, e.g. for a dangling reference.
pub fn tag_by_local_id<'a>(catalogue: &'a Catalogue, id: &TagId) -> Option<&'a Tag> {
    catalogue.tags().iter().find(|tag| &tag.local_id == id)
}

/// Tracks carrying `tag`, in catalogue order
pub fn tracks_by_tag<'a>(catalogue: &'a Catalogue, tag: &TagId) -> Vec<&'a Track> {
    catalogue
        .tracks()
        .iter()
        .filter(|track| track.has_tag(tag))
        .collect()
}

/// Ids of every tag not listed in `excluded`, in catalogue order.
pub fn tags_not<'a>(catalogue: &'a Catalogue, excluded: &[TagId]) -> Vec<&'a TagId> {
    let excluded = excluded.iter().collect::<HashSet<_>>();
    catalogue
        .tags()
        .iter()
        .map(|tag| &tag.local_id)
        .filter(|id| !excluded.contains(id))
        .collect()
}

/// Resolves each tag id of a track; unresolved ids come back as `None`.
pub fn tags_of_track<'a>(catalogue: &'a Catalogue, track: &Track) -> Vec<Option<&'a Tag>> {
    track
        .tags
        .iter()
        .map(|id| tag_by_local_id(catalogue, id))
        .collect()
}

pub fn dangling_references(catalogue: &Catalogue) -> Vec<DanglingRef> {
    let known = catalogue
        .tags()
        .iter()
        .map(|tag| &tag.local_id)
        .collect::<HashSet<_>>();
    let known = &known;

    catalogue
        .tracks()
        .iter()
        .flat_map(|track| {
            track
                .tags
                .iter()
                .filter(move |id| !known.contains(id))
                .map(move |id| DanglingRef {
                    track: track.local_id.clone(),
                    tag: id.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(tags: &[&'a Tag]) -> Vec<&'a str> {
        tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_rock_and_jazz_scenario() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        let rock = catalogue.add_tag("Rock", "#ff0000")?;
        let jazz = catalogue.add_tag("Jazz", "#0000ff")?;

        assert_eq!(names(&sorted_tags(&catalogue)), vec!["Jazz", "Rock"]);

        let track = catalogue.add_track(
            "Highway Star",
            vec!["Deep Purple".to_string()],
            [rock.local_id.clone()],
        );

        assert_eq!(tracks_by_tag(&catalogue, &rock.local_id), vec![&track]);
        assert_eq!(
            tags_not(&catalogue, &[rock.local_id.clone()]),
            vec![&jazz.local_id]
        );
        Ok(())
    }

    #[test]
    fn test_sorted_tags_ignores_case() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        for name in ["beta", "Alpha", "gamma", "alpha", "Delta"] {
            catalogue.add_tag(name, "#fff")?;
        }

        let sorted = sorted_tags(&catalogue);

        assert_eq!(
            names(&sorted),
            vec!["alpha", "Alpha", "beta", "Delta", "gamma"]
        );
        assert_eq!(sorted.len(), catalogue.tags().len());
        Ok(())
    }

    #[test]
    fn test_sorted_tags_places_accented_names_by_base_letter() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        for name in ["Zouk", "Électro", "apple", "Ambient", "émo"] {
            catalogue.add_tag(name, "#fff")?;
        }

        assert_eq!(
            names(&sorted_tags(&catalogue)),
            vec!["Ambient", "apple", "Électro", "émo", "Zouk"]
        );
        Ok(())
    }

    #[test]
    fn test_sorted_tags_does_not_reorder_catalogue() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        catalogue.add_tag("b", "#fff")?;
        catalogue.add_tag("a", "#fff")?;

        let _ = sorted_tags(&catalogue);

        assert_eq!(catalogue.tags()[0].name, "b");
        Ok(())
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("abc", "ABD"), Ordering::Less);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("A", "a"), Ordering::Greater);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
        assert_eq!(compare_names("ab", "a"), Ordering::Greater);
        assert_eq!(compare_names("Électro", "Zouk"), Ordering::Less);
        assert_eq!(compare_names("electro", "électro"), Ordering::Less);
        assert_eq!(compare_names("électro", "Électro"), Ordering::Less);
    }

    #[test]
    fn test_tag_by_local_id() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        let tag = catalogue.add_tag("Rock", "#ff0000")?;

        assert_eq!(tag_by_local_id(&catalogue, &tag.local_id), Some(&tag));
        assert_eq!(tag_by_local_id(&catalogue, &TagId::from("missing")), None);
        Ok(())
    }

    #[test]
    fn test_tracks_by_unknown_tag_is_empty() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        let tag = catalogue.add_tag("Rock", "#ff0000")?;
        catalogue.add_track("One", vec![], [tag.local_id]);

        assert!(tracks_by_tag(&catalogue, &TagId::from("none")).is_empty());
        Ok(())
    }

    #[test]
    fn test_tracks_by_tag_keeps_catalogue_order() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        let tag = catalogue.add_tag("Rock", "#ff0000")?;
        let first = catalogue.add_track("z", vec![], [tag.local_id.clone()]);
        catalogue.add_track("untagged", vec![], []);
        let third = catalogue.add_track("a", vec![], [tag.local_id.clone()]);

        assert_eq!(
            tracks_by_tag(&catalogue, &tag.local_id),
            vec![&first, &third]
        );
        Ok(())
    }

    #[test]
    fn test_views_follow_mutations() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        let tag = catalogue.add_tag("Rock", "#ff0000")?;
        let track = catalogue.add_track("One", vec![], [tag.local_id.clone()]);
        assert_eq!(tracks_by_tag(&catalogue, &tag.local_id).len(), 1);

        catalogue.remove_tag_from_track(&tag.local_id, &track.local_id)?;

        assert!(tracks_by_tag(&catalogue, &tag.local_id).is_empty());
        Ok(())
    }

    #[test]
    fn test_tags_not_partitions_ids() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        let ids = ["a", "b", "c", "d"]
            .iter()
            .map(|n| catalogue.add_tag(n, "#fff").map(|t| t.local_id))
            .collect::<Result<Vec<_>, _>>()?;
        let excluded = vec![ids[1].clone(), ids[3].clone(), TagId::from("ghost")];

        let rest = tags_not(&catalogue, &excluded);

        assert_eq!(rest, vec![&ids[0], &ids[2]]);
        let mut covered = rest.into_iter().cloned().collect::<Vec<_>>();
        covered.extend(excluded.into_iter().filter(|id| ids.contains(id)));
        covered.sort();
        let mut all = ids.clone();
        all.sort();
        assert_eq!(covered, all);
        Ok(())
    }

    #[test]
    fn test_tags_not_with_nothing_excluded() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        let a = catalogue.add_tag("a", "#fff")?;

        assert_eq!(tags_not(&catalogue, &[]), vec![&a.local_id]);
        Ok(())
    }

    #[test]
    fn test_dangling_references_are_reported() -> anyhow::Result<()> {
        let mut catalogue = Catalogue::new();
        let tag = catalogue.add_tag("Rock", "#ff0000")?;
        let track = catalogue.add_track(
            "One",
            vec![],
            [tag.local_id.clone(), TagId::from("gone")],
        );

        assert_eq!(
            dangling_references(&catalogue),
            vec![DanglingRef {
                track: track.local_id.clone(),
                tag: TagId::from("gone"),
            }]
        );
        assert_eq!(tags_of_track(&catalogue, &track), vec![Some(&tag), None]);
        Ok(())
    }
}
