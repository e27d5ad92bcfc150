use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use crate::episode::config::RenameConfig;
use crate::episode::relocate::{OutcomeKind, RelocationSummary};
use crate::episode::status::StatusEvent;

/// Simple file logger for relocation events with buffered writes.
pub struct FileLogger {
    writer: BufWriter<File>,
}

impl FileLogger {
    /// Open the log file for appending, creating it and its parent directory if needed.
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Log when starting the program
    pub fn log_init(&mut self, root: &Path, config: &RenameConfig) {
        let _ = writeln!(self.writer, "[{}] INIT \"{}\"", Self::timestamp(), root.display());
        let _ = writeln!(self.writer, "  output: {}", config.output_dir().display());
        let _ = writeln!(self.writer, "  template: {}", config.template());
        let _ = writeln!(self.writer, "  delimiter: \"{}\"", config.delimiter());
        let _ = writeln!(self.writer, "  camel_case: {}", config.camel_case());
        let _ = writeln!(self.writer, "  season_padding: {}", config.season_padding());
        let _ = writeln!(self.writer, "  episode_padding: {}", config.episode_padding());
        if let Some(show_name) = config.show_name_override() {
            let _ = writeln!(self.writer, "  show_name: \"{show_name}\"");
        }
        if let Some(season) = config.season_override() {
            let _ = writeln!(self.writer, "  season: \"{season}\"");
        }
        let _ = writeln!(self.writer, "  extensions: {:?}", config.extensions());
        let _ = writeln!(self.writer, "  copy: {}", config.copy());
        let _ = writeln!(self.writer, "  overwrite: {}", config.overwrite());
        let _ = writeln!(self.writer, "  strict: {}", config.strict());
        let _ = writeln!(self.writer, "  dryrun: {}", config.dryrun());
        let _ = self.writer.flush();
    }

    /// Log a single status event
    pub fn log_event(&mut self, event: &StatusEvent) {
        let tag = match event {
            StatusEvent::DirectoryCreated { .. } => "MKDIR",
            StatusEvent::Outcome(outcome) => match outcome.kind() {
                OutcomeKind::SkippedNoMatch => "NOMATCH",
                OutcomeKind::SkippedUnchanged => "SAME",
                OutcomeKind::SkippedCollision => "EXISTS",
                OutcomeKind::Relocated => "OK",
                OutcomeKind::RelocationFailed => "ERROR",
            },
        };
        let _ = writeln!(self.writer, "[{}] {tag:<7} {event}", Self::timestamp());
        let _ = self.writer.flush();
    }

    /// Log final statistics
    pub fn log_summary(&mut self, summary: &RelocationSummary) {
        let _ = writeln!(self.writer, "[{}] SUMMARY", Self::timestamp());
        let _ = writeln!(self.writer, "  Relocated: {}", summary.relocated);
        let _ = writeln!(self.writer, "  Unchanged: {}", summary.unchanged);
        let _ = writeln!(self.writer, "  Collision: {}", summary.collision);
        let _ = writeln!(self.writer, "  No match:  {}", summary.no_match);
        let _ = writeln!(self.writer, "  Failed:    {}", summary.failed);
        let _ = writeln!(self.writer, "[{}] END", Self::timestamp());
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod logger_tests {
    use super::*;

    use std::path::PathBuf;

    use tempfile::TempDir;

    use crate::episode::relocate::RelocationOutcome;

    #[test]
    fn test_log_lines_are_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("eprename.log");
        let config = RenameConfig::default();

        let mut logger = FileLogger::new(&path).unwrap();
        logger.log_init(dir.path(), &config);
        logger.log_event(&StatusEvent::Outcome(RelocationOutcome::Unchanged {
            path: PathBuf::from("Show.S1E01.mkv"),
        }));
        let mut summary = RelocationSummary::new(false);
        summary.unchanged = 1;
        logger.log_summary(&summary);
        drop(logger);

        let mut logger = FileLogger::new(&path).unwrap();
        logger.log_event(&StatusEvent::DirectoryCreated {
            path: PathBuf::from("Show"),
            dryrun: false,
        });
        drop(logger);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("INIT"));
        assert!(content.contains("SAME    \"Show.S1E01.mkv\""));
        assert!(content.contains("Unchanged: 1"));
        assert!(content.contains("MKDIR   created directory \"Show\""));
        assert!(content.find("END").unwrap() < content.find("MKDIR").unwrap());
    }
}
