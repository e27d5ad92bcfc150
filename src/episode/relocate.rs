//! Move or copy resolved episode files to their destination.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{fmt, fs, io};

use crate::episode::config::RenameConfig;
use crate::episode::record::{EpisodeRecord, FailureReason};
use crate::episode::status::{StatusEvent, StatusSink};

/// Filesystem action used for relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationAction {
    Move,
    Copy,
}

/// Terminal state of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    SkippedNoMatch,
    SkippedUnchanged,
    SkippedCollision,
    Relocated,
    RelocationFailed,
}

/// Result of relocating a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationOutcome {
    /// The record could not be resolved so the file was left alone.
    NoMatch { source: PathBuf, reason: FailureReason },
    /// The file already has the correct name.
    Unchanged { path: PathBuf },
    /// The destination exists and overwrite is disabled.
    Collision { source: PathBuf, destination: PathBuf },
    Relocated {
        source: PathBuf,
        destination: PathBuf,
        action: RelocationAction,
        dryrun: bool,
    },
    Failed {
        source: PathBuf,
        destination: PathBuf,
        error: String,
    },
}

/// Number of records per terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelocationSummary {
    pub no_match: usize,
    pub unchanged: usize,
    pub collision: usize,
    pub relocated: usize,
    pub failed: usize,
    pub dryrun: bool,
}

/// Applies the relocation policy to resolved records in order.
///
/// In dry-run mode the filesystem is never touched.
/// Planned directories and files are tracked instead,
/// so that the outcomes match what a real run would produce.
pub struct Relocator<'a> {
    config: &'a RenameConfig,
    planned_dirs: HashSet<PathBuf>,
    planned_files: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl RelocationAction {
    #[must_use]
    pub const fn from_copy(copy: bool) -> Self {
        if copy { Self::Copy } else { Self::Move }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Copy => "copy",
        }
    }
}

impl RelocationOutcome {
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::NoMatch { .. } => OutcomeKind::SkippedNoMatch,
            Self::Unchanged { .. } => OutcomeKind::SkippedUnchanged,
            Self::Collision { .. } => OutcomeKind::SkippedCollision,
            Self::Relocated { .. } => OutcomeKind::Relocated,
            Self::Failed { .. } => OutcomeKind::RelocationFailed,
        }
    }

    /// Original path of the record.
    #[must_use]
    pub fn source(&self) -> &Path {
        match self {
            Self::NoMatch { source, .. }
            | Self::Collision { source, .. }
            | Self::Relocated { source, .. }
            | Self::Failed { source, .. } => source,
            Self::Unchanged { path } => path,
        }
    }

    /// Final path of the file if it is in place after the operation.
    #[must_use]
    pub fn placed_path(&self) -> Option<&Path> {
        match self {
            Self::Unchanged { path } => Some(path),
            Self::Relocated { destination, .. } => Some(destination),
            _ => None,
        }
    }
}

impl RelocationSummary {
    #[must_use]
    pub const fn new(dryrun: bool) -> Self {
        Self {
            no_match: 0,
            unchanged: 0,
            collision: 0,
            relocated: 0,
            failed: 0,
            dryrun,
        }
    }

    pub const fn add(&mut self, outcome: &RelocationOutcome) {
        match outcome.kind() {
            OutcomeKind::SkippedNoMatch => self.no_match += 1,
            OutcomeKind::SkippedUnchanged => self.unchanged += 1,
            OutcomeKind::SkippedCollision => self.collision += 1,
            OutcomeKind::Relocated => self.relocated += 1,
            OutcomeKind::RelocationFailed => self.failed += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.no_match + self.unchanged + self.collision + self.relocated + self.failed
    }
}

impl<'a> Relocator<'a> {
    #[must_use]
    pub fn new(config: &'a RenameConfig) -> Self {
        Self {
            config,
            planned_dirs: HashSet::new(),
            planned_files: HashSet::new(),
            vacated: HashSet::new(),
        }
    }

    /// Relocate all records in order and report each outcome to the sink.
    pub fn relocate_all<S>(&mut self, records: &[EpisodeRecord], sink: &mut S) -> RelocationSummary
    where
        S: StatusSink + ?Sized,
    {
        self.relocate_all_with(records, sink, |_, _| {})
    }

    /// Relocate all records in order and also pass each record with its outcome to `on_outcome`.
    pub fn relocate_all_with<S, F>(
        &mut self,
        records: &[EpisodeRecord],
        sink: &mut S,
        mut on_outcome: F,
    ) -> RelocationSummary
    where
        S: StatusSink + ?Sized,
        F: FnMut(&EpisodeRecord, &RelocationOutcome),
    {
        let mut summary = RelocationSummary::new(self.config.dryrun());
        for record in records {
            let outcome = self.relocate(record, sink);
            summary.add(&outcome);
            on_outcome(record, &outcome);
        }
        summary
    }

    /// Relocate a single record and report the outcome to the sink.
    pub fn relocate<S>(&mut self, record: &EpisodeRecord, sink: &mut S) -> RelocationOutcome
    where
        S: StatusSink + ?Sized,
    {
        let outcome = self.relocate_record(record, sink);
        sink.report(&StatusEvent::Outcome(outcome.clone()));
        outcome
    }

    fn relocate_record<S>(&mut self, record: &EpisodeRecord, sink: &mut S) -> RelocationOutcome
    where
        S: StatusSink + ?Sized,
    {
        let (source, rendered) = record.resolve();
        let source = source.to_path_buf();
        let rendered = match rendered {
            Ok(rendered) => rendered,
            Err(reason) => {
                return RelocationOutcome::NoMatch {
                    source,
                    reason: reason.clone(),
                };
            }
        };

        let destination = self.config.output_dir().join(rendered);
        if let Some(directory) = destination.parent()
            && let Err(error) = self.ensure_directory(directory, sink)
        {
            let error = format!("Failed to create directory {}: {error}", directory.display());
            return RelocationOutcome::Failed {
                source,
                destination,
                error,
            };
        }

        if same_path(&source, &destination) {
            return RelocationOutcome::Unchanged { path: source };
        }

        let action = RelocationAction::from_copy(self.config.copy());
        let case_only = action == RelocationAction::Move && is_case_only_rename(&source, &destination);
        if !case_only && self.destination_exists(&destination) && !self.config.overwrite() {
            return RelocationOutcome::Collision { source, destination };
        }

        if self.config.dryrun() {
            self.planned_files.insert(destination.clone());
            if action == RelocationAction::Move {
                self.planned_files.remove(&source);
                self.vacated.insert(source.clone());
            }
            return RelocationOutcome::Relocated {
                source,
                destination,
                action,
                dryrun: true,
            };
        }

        let result = match action {
            RelocationAction::Move if case_only => rename_with_temp_file(&source, &destination),
            RelocationAction::Move => move_file(&source, &destination),
            RelocationAction::Copy => fs::copy(&source, &destination).map(|_| ()),
        };

        match result {
            Ok(()) => RelocationOutcome::Relocated {
                source,
                destination,
                action,
                dryrun: false,
            },
            Err(error) => RelocationOutcome::Failed {
                source,
                destination,
                error: error.to_string(),
            },
        }
    }

    /// Create the destination directory if it is missing.
    fn ensure_directory<S>(&mut self, directory: &Path, sink: &mut S) -> io::Result<()>
    where
        S: StatusSink + ?Sized,
    {
        if directory.is_dir() {
            return Ok(());
        }
        if self.config.dryrun() {
            if self.planned_dirs.insert(directory.to_path_buf()) {
                sink.report(&StatusEvent::DirectoryCreated {
                    path: directory.to_path_buf(),
                    dryrun: true,
                });
            }
            return Ok(());
        }
        fs::create_dir_all(directory)?;
        sink.report(&StatusEvent::DirectoryCreated {
            path: directory.to_path_buf(),
            dryrun: false,
        });
        Ok(())
    }

    /// Check if the destination exists, taking planned dry-run changes into account.
    fn destination_exists(&self, destination: &Path) -> bool {
        if self.planned_files.contains(destination) {
            return true;
        }
        destination.exists() && !self.vacated.contains(destination)
    }
}

/// Check if both paths point to the same location.
fn same_path(source: &Path, destination: &Path) -> bool {
    if source == destination {
        return true;
    }
    match (dunce::canonicalize(source), dunce::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}

/// True when the paths differ only by capitalization.
fn is_case_variant(source: &Path, destination: &Path) -> bool {
    source != destination
        && crate::path_to_string(source).to_lowercase() == crate::path_to_string(destination).to_lowercase()
}

/// True when the destination names the source file itself with different capitalization,
/// which only happens on case-insensitive file systems.
///
/// On a case-sensitive file system the destination is a separate file
/// and goes through the regular collision check.
fn is_case_only_rename(source: &Path, destination: &Path) -> bool {
    is_case_variant(source, destination) && same_file::is_same_file(source, destination).unwrap_or(false)
}

/// Rename a file, falling back to copy and remove when crossing filesystems.
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        result => result,
    }
}

/// Rename a file with an intermediate temp file to work around case-insensitive file systems.
fn rename_with_temp_file(source: &Path, destination: &Path) -> io::Result<()> {
    let temp_file = crate::append_extension_to_path(destination.to_path_buf(), "tmp");
    fs::rename(source, &temp_file)?;
    fs::rename(&temp_file, destination)
}

impl fmt::Display for RelocationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SkippedNoMatch => "skipped-no-match",
            Self::SkippedUnchanged => "skipped-unchanged",
            Self::SkippedCollision => "skipped-collision",
            Self::Relocated => "relocated",
            Self::RelocationFailed => "relocation-failed",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for RelocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relocated = if self.dryrun { "Would relocate" } else { "Relocated" };
        write!(
            f,
            "{relocated} {} / {} files: unchanged {}, collision {}, no match {}, failed {}",
            self.relocated,
            self.total(),
            self.unchanged,
            self.collision,
            self.no_match,
            self.failed
        )
    }
}
