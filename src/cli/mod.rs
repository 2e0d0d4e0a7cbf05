use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::config::{self, DataFile};
use crate::domain::{tag::TagId, track::TrackId, user_data::UserData};
use crate::store::{
    catalogue::Catalogue,
    error::StoreError,
    query, schema,
    transfer::{self, ExportFormat},
};

#[derive(Parser)]
#[command(name = "tagstore")]
#[command(version = "0.1")]
#[command(about = "Manage user-defined music tags")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// User data file, overrides the one from the config
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tags sorted by name
    Tags,
    /// Create a tag
    AddTag { name: String, color: String },
    /// Add a track to the catalogue
    AddTrack {
        title: String,
        #[arg(short, long = "artist")]
        artists: Vec<String>,
        /// Tag id, can be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// List tracks, optionally only those carrying a tag
    Tracks {
        #[arg(long)]
        tag: Option<String>,
    },
    /// Attach a tag to a track
    Tag { tag: String, track: String },
    /// Detach a tag from a track
    Untag { tag: String, track: String },
    /// List ids of tags other than the given ones
    TagsNot { excluded: Vec<String> },
    /// Validate the user data file and report dangling tag references
    Check,
    /// Write the user data document to a file or stdout
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace all user data with the content of a file
    Import { file: PathBuf },
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::AddTag { .. }
                | Commands::AddTrack { .. }
                | Commands::Tag { .. }
                | Commands::Untag { .. }
                | Commands::Import { .. }
        )
    }
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    execute(&cli, &mut std::io::stdout().lock())
}

fn resolve_data_file(cli: &Cli) -> anyhow::Result<DataFile> {
    let cfg = match &cli.config {
        Some(path) => config::Config::load(path)?,
        None => config::Config::default(),
    };

    let mut data = cfg.data;
    if let Some(path) = &cli.data {
        data.path = path.clone();
    }
    Ok(data)
}

/// a missing data file means nothing was saved yet
fn load_catalogue(path: &Path) -> anyhow::Result<Catalogue> {
    let mut catalogue = Catalogue::new();
    if !path.exists() {
        log::info!(
            "No user data at {}, starting empty",
            path.to_string_lossy()
        );
        return Ok(catalogue);
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read user data {}", path.to_string_lossy()))?;
    transfer::import(&mut catalogue, &raw)
        .with_context(|| format!("Failed to load user data {}", path.to_string_lossy()))?;
    Ok(catalogue)
}

/// Writes `text` to a temporary file next to `path`, then moves it over
/// `path`. A failed write never leaves half a document or a stray file.
fn write_atomically(path: &Path, text: &str) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.to_string_lossy()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("Failed to write {}", tmp.path().to_string_lossy()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.to_string_lossy()))?;
    Ok(())
}

fn save_catalogue(path: &Path, catalogue: &Catalogue, format: ExportFormat) -> anyhow::Result<()> {
    write_atomically(path, &transfer::export(catalogue, format))?;
    log::debug!("Saved user data to {}", path.to_string_lossy());
    Ok(())
}

/// Validates the data file on its own so a broken file can be reported
/// instead of aborting the load.
fn check(path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    if !path.exists() {
        writeln!(out, "No user data at {}", path.to_string_lossy())?;
        return Ok(());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read user data {}", path.to_string_lossy()))?;
    let UserData { tags, tracks } = match schema::validate(&raw) {
        Ok(data) => data,
        Err(e) => {
            writeln!(out, "User data {} is invalid", path.to_string_lossy())?;
            if let Some(at) = e.path() {
                writeln!(out, "  [INVALID]  {at}")?;
            }
            return Err(StoreError::Schema(e).into());
        }
    };

    let mut catalogue = Catalogue::new();
    catalogue.replace_all(tags, tracks);
    if catalogue.is_empty() {
        writeln!(out, "User data is empty")?;
        return Ok(());
    }

    writeln!(
        out,
        "User data contains {} tags and {} tracks",
        catalogue.tags().len(),
        catalogue.tracks().len()
    )?;

    let dangling = query::dangling_references(&catalogue);
    if !dangling.is_empty() {
        writeln!(out, "Tracks referencing missing tags:")?;
        for r in &dangling {
            writeln!(out, "  [DANGLING]  track {} -> tag {}", r.track, r.tag)?;
        }
    }
    Ok(())
}

fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let data = resolve_data_file(cli)?;
    // import replaces everything and check reads the file itself, so neither
    // needs the current data file to be readable
    let mut catalogue = match &cli.command {
        Commands::Import { .. } | Commands::Check => Catalogue::new(),
        _ => load_catalogue(&data.path)?,
    };

    match &cli.command {
        Commands::Tags => {
            for tag in query::sorted_tags(&catalogue) {
                writeln!(out, "{}\t{}\t{}", tag.local_id, tag.color, tag.name)?;
            }
        }

        Commands::AddTag { name, color } => {
            let tag = catalogue.add_tag(name, color)?;
            writeln!(out, "{}", tag.local_id)?;
        }

        Commands::AddTrack {
            title,
            artists,
            tags,
        } => {
            let track = catalogue.add_track(
                title,
                artists.clone(),
                tags.iter().map(|t| TagId::from(t.as_str())),
            );
            writeln!(out, "{}", track.local_id)?;
        }

        Commands::Tracks { tag } => {
            let tracks = match tag {
                Some(tag) => query::tracks_by_tag(&catalogue, &TagId::from(tag.as_str())),
                None => catalogue.tracks().iter().collect(),
            };

            for track in tracks {
                writeln!(
                    out,
                    "{}\t{} - {}",
                    track.local_id,
                    track.artists.join(", "),
                    track.title
                )?;
                for (id, tag) in track.tags.iter().zip(query::tags_of_track(&catalogue, track)) {
                    match tag {
                        Some(tag) => writeln!(out, "    - {}", tag.name)?,
                        None => writeln!(out, "    - [MISSING] {id}")?,
                    }
                }
            }
        }

        Commands::Tag { tag, track } => {
            catalogue.add_tag_to_track(&TagId::from(tag.as_str()), &TrackId::from(track.as_str()))?;
        }

        Commands::Untag { tag, track } => {
            catalogue
                .remove_tag_from_track(&TagId::from(tag.as_str()), &TrackId::from(track.as_str()))?;
        }

        Commands::TagsNot { excluded } => {
            let excluded = excluded
                .iter()
                .map(|id| TagId::from(id.as_str()))
                .collect::<Vec<_>>();
            for id in query::tags_not(&catalogue, &excluded) {
                writeln!(out, "{id}")?;
            }
        }

        Commands::Check => check(&data.path, out)?,

        Commands::Export { out: Some(path) } => {
            write_atomically(path, &transfer::export(&catalogue, data.format))?;
        }

        Commands::Export { out: None } => {
            write!(out, "{}", transfer::export(&catalogue, data.format))?;
        }

        Commands::Import { file } => {
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.to_string_lossy()))?;
            let summary = transfer::import(&mut catalogue, &raw)?;
            writeln!(
                out,
                "Imported {} tags and {} tracks",
                summary.tags, summary.tracks
            )?;
            if summary.dangling_references > 0 {
                writeln!(
                    out,
                    "{} track tag references point to missing tags",
                    summary.dangling_references
                )?;
            }
        }
    }

    if cli.command.mutates() {
        save_catalogue(&data.path, &catalogue, data.format)?;
    }
    Ok(())
}
