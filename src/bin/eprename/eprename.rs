use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use itertools::Itertools;
use walkdir::WalkDir;

use episode_rename::episode::{
    ConsoleSink, EpisodeIndex, EpisodeRecord, FileLogger, RelocationSummary, Relocator, StatusSink,
};
use episode_rename::{print_error, print_warning};

use crate::Args;
use crate::config::Config;

pub struct EpisodeRename {
    /// Directory used for printing relative source paths.
    root: PathBuf,
    config: Config,
}

impl EpisodeRename {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::from_args(args)?;
        let root = if config.input.is_file() {
            config
                .input
                .parent()
                .context("Failed to get input file parent directory")?
                .to_path_buf()
        } else {
            config.input.clone()
        };
        Ok(Self { root, config })
    }

    pub fn run(&self) -> Result<()> {
        if self.config.rename.debug() {
            println!("{}", self.config);
        }

        let files = self.gather_files();
        if files.is_empty() {
            println!("No episode files found in {}", self.root.display());
            return Ok(());
        }
        if self.config.rename.verbose() {
            println!("Found {} files", files.len());
        }

        let rename = &self.config.rename;
        let records: Vec<EpisodeRecord> = files
            .into_iter()
            .map(|path| EpisodeRecord::from_path(path, rename))
            .collect();

        let logger = self.config.log_file.as_deref().map(FileLogger::new).transpose()?;
        let mut sink = ConsoleSink::new(&self.root, rename.output_dir(), rename.verbose()).with_logger(logger);
        if let Some(logger) = sink.logger_mut() {
            logger.log_init(&self.config.input, rename);
        }

        let summary = self.relocate(&records, &mut sink);

        if let Some(logger) = sink.logger_mut() {
            logger.log_summary(&summary);
        }

        if summary.failed > 0 {
            println!("{}", summary.to_string().red().bold());
        } else {
            println!("{}", summary.to_string().bold());
        }
        Ok(())
    }

    /// Relocate records in order and collect the index of placed episodes.
    fn relocate<S: StatusSink>(&self, records: &[EpisodeRecord], sink: &mut S) -> RelocationSummary {
        let rename = &self.config.rename;
        let mut index = EpisodeIndex::new(rename.delimiter());

        let summary = Relocator::new(rename).relocate_all_with(records, sink, |record, outcome| {
            if let Some(path) = outcome.placed_path() {
                index.add(record, path);
            }
        });

        if self.config.index {
            self.write_index(&index);
        }
        summary
    }

    fn write_index(&self, index: &EpisodeIndex) {
        if index.is_empty() {
            return;
        }
        if index.single_show().is_none() {
            print_warning!(
                "Skipping index, found more than one show: {}",
                index.show_names().iter().join(", ")
            );
            return;
        }
        let rename = &self.config.rename;
        match index.write(rename.output_dir(), rename.dryrun(), rename.overwrite()) {
            Ok(path) => {
                let name = episode_rename::get_relative_path_or_filename(&path, rename.output_dir());
                if rename.dryrun() {
                    println!("{}", format!("Dryrun index: {name}").cyan());
                } else {
                    println!("{}", format!("Index: {name}").green());
                }
            }
            Err(error) => print_error!("{error}"),
        }
    }

    /// Get sorted list of media files to process.
    fn gather_files(&self) -> Vec<PathBuf> {
        let input = &self.config.input;
        if input.is_file() {
            return if self.config.rename.is_media_file(input) {
                vec![input.clone()]
            } else {
                print_warning!("Not a recognized media file: {}", input.display());
                Vec::new()
            };
        }

        let mut files: Vec<PathBuf> = WalkDir::new(input)
            .min_depth(1)
            .max_depth(if self.config.recurse { usize::MAX } else { 1 })
            .into_iter()
            .filter_entry(|entry| !episode_rename::is_hidden(entry))
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| self.config.rename.is_media_file(path))
            .collect();

        files.sort_unstable();
        files
    }
}
