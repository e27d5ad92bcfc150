mod config;
mod eprename;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::eprename::EpisodeRename;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Rename TV episode files using season and episode numbers parsed from the file name"
)]
pub(crate) struct Args {
    /// Optional input directory or file
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    path: Option<PathBuf>,

    /// Delimiter used between words
    #[arg(short = 'd', long, value_name = "DELIMITER")]
    delimiter: Option<String>,

    /// Capitalize the first letter of each word
    #[arg(short = 'c', long)]
    camelcase: bool,

    /// Output filename template
    #[arg(short = 'w', long, value_name = "TEMPLATE")]
    writeformat: Option<String>,

    /// Output directory, defaults to the input directory
    #[arg(short = 'o', long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    outputdir: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(short = 'f', long)]
    force: bool,

    /// Copy files instead of moving them
    #[arg(short = 's', long, visible_alias = "saferename")]
    copy: bool,

    /// Skip files with empty values for template fields
    #[arg(short = 'S', long)]
    strict: bool,

    /// Zero padding width for episode numbers
    #[arg(long, value_name = "WIDTH")]
    epad: Option<usize>,

    /// Zero padding width for season numbers
    #[arg(long, value_name = "WIDTH")]
    spad: Option<usize>,

    /// Use this show name for all files
    #[arg(long, value_name = "NAME")]
    showname: Option<String>,

    /// Use this season for all files
    #[arg(long, value_name = "SEASON")]
    season: Option<String>,

    /// Remove token from show and episode names
    #[arg(short = 'z', long, num_args = 1, action = clap::ArgAction::Append, value_name = "TOKEN")]
    purge: Vec<String>,

    /// Also process subtitle files
    #[arg(short = 't', long)]
    subtitles: bool,

    /// Recurse into subdirectories
    #[arg(short = 'r', long)]
    recurse: bool,

    /// Only print changes without moving files
    #[arg(short = 'p', long)]
    print: bool,

    /// Write a Markdown index of the episodes to the output directory
    #[arg(short = 'i', long)]
    index: bool,

    /// Also write status messages to a log file
    #[arg(short = 'L', long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    log: Option<PathBuf>,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Enable debug prints
    #[arg(short = 'D', long)]
    debug: bool,

    /// Print verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        episode_rename::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        EpisodeRename::new(args)?.run()
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_repeated_purge() {
        let args = Args::try_parse_from(["eprename", "-z", "group", "--purge", "proper", "-p"]).unwrap();
        assert_eq!(args.purge, vec!["group", "proper"]);
        assert!(args.print);
    }

    #[test]
    fn saferename_is_copy_alias() {
        let args = Args::try_parse_from(["eprename", "--saferename"]).unwrap();
        assert!(args.copy);
    }
}
