//! Markdown index of processed episodes.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::episode::record::EpisodeRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexEntry {
    show_name: String,
    season: String,
    episode: String,
    episode_name: String,
    file_name: String,
}

/// Episodes grouped by season for a single show.
#[derive(Debug, Clone, Default)]
pub struct EpisodeIndex {
    delimiter: String,
    entries: Vec<IndexEntry>,
}

impl EpisodeIndex {
    /// Names in the index are shown with `delimiter` replaced by spaces.
    #[must_use]
    pub fn new(delimiter: &str) -> Self {
        Self {
            delimiter: delimiter.to_string(),
            entries: Vec::new(),
        }
    }

    /// Add a resolved record located at `path`.
    pub fn add(&mut self, record: &EpisodeRecord, path: &Path) {
        let fields = record.fields();
        let (Some(season), Some(episode)) = (&fields.season, &fields.episode) else {
            return;
        };
        self.entries.push(IndexEntry {
            show_name: self.readable(fields.show_name.as_deref().unwrap_or_default()),
            season: season.clone(),
            episode: episode.clone(),
            episode_name: self.readable(fields.episode_name.as_deref().unwrap_or_default()),
            file_name: path
                .file_name()
                .map(crate::os_str_to_string)
                .unwrap_or_default(),
        });
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Unique show names in sorted order.
    #[must_use]
    pub fn show_names(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|entry| entry.show_name.as_str()).collect()
    }

    /// The show name if all entries belong to one show.
    #[must_use]
    pub fn single_show(&self) -> Option<&str> {
        let names = self.show_names();
        if names.len() == 1 { names.into_iter().next() } else { None }
    }

    /// Render the index as Markdown with one section per season.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let title = self.single_show().filter(|name| !name.is_empty()).unwrap_or("Episodes");
        let mut output = format!("# {title}\n");

        let sorted = self
            .entries
            .iter()
            .sorted_by(|a, b| {
                sort_key(&a.season)
                    .cmp(&sort_key(&b.season))
                    .then_with(|| sort_key(&a.episode).cmp(&sort_key(&b.episode)))
            })
            .chunk_by(|entry| entry.season.clone());

        for (season, entries) in &sorted {
            let _ = write!(output, "\n## Season {season}\n\n");
            for entry in entries {
                let name = if entry.episode_name.is_empty() {
                    String::new()
                } else {
                    format!(" {}", entry.episode_name)
                };
                let _ = writeln!(output, "- E{}{name} (`{}`)", entry.episode, entry.file_name);
            }
        }
        output
    }

    /// Write the index to `<output_dir>/<show name>.md`.
    ///
    /// Returns the index file path. Nothing is written in dryrun mode.
    ///
    /// # Errors
    /// Returns an error if the index does not contain exactly one show,
    /// the file already exists and overwrite is disabled, or writing fails.
    pub fn write(&self, output_dir: &Path, dryrun: bool, overwrite: bool) -> Result<PathBuf> {
        let Some(show_name) = self.single_show() else {
            anyhow::bail!(
                "Index requires exactly one show, found {}: {}",
                self.show_names().len(),
                self.show_names().iter().join(", ")
            );
        };
        let file_name = if show_name.is_empty() {
            "index.md".to_string()
        } else {
            format!("{}.md", show_name.replace(' ', &self.delimiter))
        };
        let path = output_dir.join(file_name);

        if path.exists() && !overwrite {
            anyhow::bail!("Index file already exists: {}", path.display());
        }
        if !dryrun {
            fs::write(&path, self.to_markdown())
                .with_context(|| format!("Failed to write index file: {}", path.display()))?;
        }
        Ok(path)
    }

    fn readable(&self, name: &str) -> String {
        name.replace(self.delimiter.as_str(), " ").trim().to_string()
    }
}

/// Sort numbers numerically and put other values after them.
fn sort_key(value: &str) -> (u32, u64, &str) {
    value
        .parse::<u64>()
        .map_or((1, 0, value), |number| (0, number, value))
}
