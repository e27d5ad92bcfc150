use std::fmt;
use std::path::PathBuf;

use anyhow::Result;

use episode_rename::episode::{EpisodeUserConfig, RenameConfig, RenameConfigBuilder};

use crate::Args;

/// Final config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    /// Absolute input directory or file.
    pub(crate) input: PathBuf,
    pub(crate) index: bool,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) recurse: bool,
    pub(crate) rename: RenameConfig,
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// Command line options take precedence over the user config.
    pub fn from_args(args: Args) -> Result<Self> {
        let user_config = EpisodeUserConfig::get_user_config()?;
        let input = episode_rename::resolve_input_path(args.path.as_deref())?;
        let output_dir = episode_rename::resolve_output_path(
            args.outputdir.as_deref().or(user_config.output_dir.as_deref()),
            &input,
        )?;

        let mut builder = RenameConfigBuilder::from_user_config(&user_config)
            .output_dir(output_dir)
            .purge_all(&args.purge);

        if let Some(delimiter) = args.delimiter {
            builder = builder.delimiter(delimiter);
        }
        if let Some(template) = args.writeformat {
            builder = builder.template(template);
        }
        if let Some(width) = args.epad {
            builder = builder.episode_padding(width);
        }
        if let Some(width) = args.spad {
            builder = builder.season_padding(width);
        }
        if let Some(name) = args.showname {
            builder = builder.show_name(name);
        }
        if let Some(season) = args.season {
            builder = builder.season(season);
        }
        if args.camelcase {
            builder = builder.camel_case(true);
        }
        if args.copy {
            builder = builder.copy(true);
        }
        if args.force {
            builder = builder.overwrite(true);
        }
        if args.strict {
            builder = builder.strict(true);
        }
        if args.subtitles {
            builder = builder.subtitles(true);
        }
        if args.print {
            builder = builder.dryrun(true);
        }
        if args.verbose {
            builder = builder.verbose(true);
        }
        if args.debug {
            builder = builder.debug(true);
        }

        Ok(Self {
            input,
            index: args.index || user_config.index,
            log_file: args.log.or(user_config.log_file),
            recurse: args.recurse || user_config.recurse,
            rename: builder.build()?,
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input: {}", self.input.display())?;
        writeln!(f, "  recurse:     {}", episode_rename::colorize_bool(self.recurse))?;
        writeln!(f, "  index:       {}", episode_rename::colorize_bool(self.index))?;
        if let Some(log_file) = &self.log_file {
            writeln!(f, "  log file:    {}", log_file.display())?;
        }
        write!(f, "{}", self.rename)
    }
}
