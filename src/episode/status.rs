use std::fmt;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::episode::logger::FileLogger;
use crate::episode::relocate::RelocationOutcome;

/// Event emitted by the relocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    DirectoryCreated { path: PathBuf, dryrun: bool },
    Outcome(RelocationOutcome),
}

/// Receives status events during a relocation batch.
pub trait StatusSink {
    fn report(&mut self, event: &StatusEvent);
}

/// Collects events in memory.
impl StatusSink for Vec<StatusEvent> {
    fn report(&mut self, event: &StatusEvent) {
        self.push(event.clone());
    }
}

/// Prints coloured status lines to the terminal and optionally writes them to a log file.
pub struct ConsoleSink {
    root: PathBuf,
    output_dir: PathBuf,
    verbose: bool,
    logger: Option<FileLogger>,
}

impl ConsoleSink {
    /// Source paths are printed relative to `root` and destinations relative to `output_dir`.
    #[must_use]
    pub fn new(root: &Path, output_dir: &Path, verbose: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            verbose,
            logger: None,
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Option<FileLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub const fn logger_mut(&mut self) -> Option<&mut FileLogger> {
        self.logger.as_mut()
    }

    fn source_name(&self, path: &Path) -> String {
        crate::get_relative_path_or_filename(path, &self.root)
    }

    fn destination_name(&self, path: &Path) -> String {
        crate::get_relative_path_or_filename(path, &self.output_dir)
    }

    fn print_outcome(&self, outcome: &RelocationOutcome) {
        match outcome {
            RelocationOutcome::NoMatch { source, reason } => {
                crate::print_warning!("Skipping {}: {reason}", self.source_name(source));
            }
            RelocationOutcome::Unchanged { path } => {
                if self.verbose {
                    println!("{}", format!("Unchanged: {}", self.source_name(path)).dimmed());
                }
            }
            RelocationOutcome::Collision { source, destination } => {
                crate::print_warning!(
                    "Skipping {} to already existing file: {}",
                    self.source_name(source),
                    self.destination_name(destination)
                );
            }
            RelocationOutcome::Relocated {
                source,
                destination,
                action,
                dryrun,
            } => {
                let header = if *dryrun {
                    format!("Dryrun {action}:").bold().cyan()
                } else {
                    format!("{}:", capitalize_action(action.name())).bold().magenta()
                };
                println!("{header}");
                crate::show_diff(&self.source_name(source), &self.destination_name(destination));
            }
            RelocationOutcome::Failed {
                source,
                destination,
                error,
            } => {
                crate::print_error!(
                    "Failed to relocate {} to {}\n{error}",
                    self.source_name(source),
                    self.destination_name(destination)
                );
            }
        }
    }
}

impl StatusSink for ConsoleSink {
    fn report(&mut self, event: &StatusEvent) {
        if let Some(logger) = self.logger.as_mut() {
            logger.log_event(event);
        }
        match event {
            StatusEvent::DirectoryCreated { path, dryrun } => {
                let name = self.destination_name(path);
                if *dryrun {
                    println!("{}", format!("Dryrun create directory: {name}").cyan());
                } else {
                    println!("{}", format!("Created directory: {name}").green());
                }
            }
            StatusEvent::Outcome(outcome) => self.print_outcome(outcome),
        }
    }
}

fn capitalize_action(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryCreated { path, dryrun } => {
                let verb = if *dryrun { "would create" } else { "created" };
                write!(f, "{verb} directory \"{}\"", path.display())
            }
            Self::Outcome(outcome) => write!(f, "{outcome}"),
        }
    }
}

impl fmt::Display for RelocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch { source, reason } => write!(f, "\"{}\" | {reason}", source.display()),
            Self::Unchanged { path } => write!(f, "\"{}\"", path.display()),
            Self::Collision { source, destination } => {
                write!(f, "\"{}\" -> \"{}\" | destination exists", source.display(), destination.display())
            }
            Self::Relocated {
                source,
                destination,
                action,
                dryrun,
            } => {
                let dryrun = if *dryrun { " (dryrun)" } else { "" };
                write!(
                    f,
                    "\"{}\" -> \"{}\" | {action}{dryrun}",
                    source.display(),
                    destination.display()
                )
            }
            Self::Failed {
                source,
                destination,
                error,
            } => write!(f, "\"{}\" -> \"{}\" | {error}", source.display(), destination.display()),
        }
    }
}
