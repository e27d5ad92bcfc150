//! Configuration for episode renaming.
//!
//! Options are collected into a [`RenameConfigBuilder`],
//! which is validated once into an immutable [`RenameConfig`] before any file is processed.

use std::path::{Path, PathBuf};
use std::{fmt, fs};

use anyhow::{Context, Result};
use itertools::Itertools;
use regex::Regex;
use serde::Deserialize;

use crate::episode::clean::{DEFAULT_NOISE_TOKENS, TokenCleaner};
use crate::episode::pattern::{EpisodePattern, PatternMatcher};
use crate::episode::template::Template;

/// Default output template.
pub const DEFAULT_TEMPLATE: &str = "{show_name}{sep}{season}{sep}{show_name} S{season}E{episode} {episode_name}";

pub const DEFAULT_DELIMITER: &str = ".";

pub const DEFAULT_SEASON_PADDING: usize = 1;

pub const DEFAULT_EPISODE_PADDING: usize = 2;

/// Zero padding is clamped to this width.
pub const MAX_PADDING: usize = 5;

/// Video file extensions processed by default.
pub const DEFAULT_EXTENSIONS: [&str; 6] = ["mkv", "mp4", "avi", "flv", "mpg", "mpeg"];

pub const SUBTITLE_EXTENSION: &str = "srt";

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
pub struct EpisodeUserConfig {
    #[serde(default)]
    pub camel_case: bool,
    #[serde(default)]
    pub copy: bool,
    #[serde(default)]
    pub debug: bool,
    pub delimiter: Option<String>,
    #[serde(default)]
    pub dryrun: bool,
    pub episode_padding: Option<usize>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub index: bool,
    pub log_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub purge: Vec<String>,
    #[serde(default)]
    pub recurse: bool,
    pub season_padding: Option<usize>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub subtitles: bool,
    pub template: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

/// Wrapper needed for parsing the config section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    eprename: EpisodeUserConfig,
}

/// Mutable options collected before a run.
///
/// Noise tokens can only be added here. [`Self::build`] validates the options
/// and freezes them into a [`RenameConfig`].
#[derive(Debug, Clone)]
pub struct RenameConfigBuilder {
    camel_case: bool,
    copy: bool,
    debug: bool,
    delimiter: String,
    dryrun: bool,
    episode_padding: usize,
    extensions: Vec<String>,
    noise_tokens: Vec<String>,
    output_dir: PathBuf,
    overwrite: bool,
    patterns: Vec<String>,
    season: Option<String>,
    season_padding: usize,
    show_name: Option<String>,
    strict: bool,
    subtitles: bool,
    template: String,
    verbose: bool,
}

/// Validated configuration used for a run.
#[derive(Debug, Clone)]
pub struct RenameConfig {
    camel_case: bool,
    cleaner: TokenCleaner,
    copy: bool,
    debug: bool,
    delimiter: String,
    delimiter_runs: Regex,
    dryrun: bool,
    episode_padding: usize,
    extensions: Vec<String>,
    matcher: PatternMatcher,
    output_dir: PathBuf,
    overwrite: bool,
    season: Option<String>,
    season_padding: usize,
    show_name: Option<String>,
    strict: bool,
    template: Template,
    verbose: bool,
}

impl EpisodeUserConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> Result<Self> {
        let Some(path) = crate::config::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.eprename)
            .with_context(|| "Failed to parse config TOML")
    }
}

impl Default for RenameConfigBuilder {
    fn default() -> Self {
        Self {
            camel_case: false,
            copy: false,
            debug: false,
            delimiter: DEFAULT_DELIMITER.to_string(),
            dryrun: false,
            episode_padding: DEFAULT_EPISODE_PADDING,
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            noise_tokens: DEFAULT_NOISE_TOKENS.iter().map(ToString::to_string).collect(),
            output_dir: PathBuf::from("."),
            overwrite: false,
            patterns: Vec::new(),
            season: None,
            season_padding: DEFAULT_SEASON_PADDING,
            show_name: None,
            strict: false,
            subtitles: false,
            template: DEFAULT_TEMPLATE.to_string(),
            verbose: false,
        }
    }
}

impl RenameConfigBuilder {
    /// Start from the values in the user config file.
    #[must_use]
    pub fn from_user_config(user_config: &EpisodeUserConfig) -> Self {
        let mut builder = Self {
            camel_case: user_config.camel_case,
            copy: user_config.copy,
            debug: user_config.debug,
            dryrun: user_config.dryrun,
            overwrite: user_config.overwrite,
            patterns: user_config.patterns.clone(),
            strict: user_config.strict,
            subtitles: user_config.subtitles,
            verbose: user_config.verbose,
            ..Self::default()
        };
        if let Some(delimiter) = &user_config.delimiter {
            builder.delimiter.clone_from(delimiter);
        }
        if let Some(padding) = user_config.episode_padding {
            builder.episode_padding = padding;
        }
        if let Some(padding) = user_config.season_padding {
            builder.season_padding = padding;
        }
        if let Some(template) = &user_config.template {
            builder.template.clone_from(template);
        }
        if let Some(output_dir) = &user_config.output_dir {
            builder.output_dir.clone_from(output_dir);
        }
        if !user_config.extensions.is_empty() {
            builder.extensions.clone_from(&user_config.extensions);
        }
        builder.purge_all(&user_config.purge)
    }

    #[must_use]
    pub const fn camel_case(mut self, value: bool) -> Self {
        self.camel_case = value;
        self
    }

    /// Copy files instead of moving them.
    #[must_use]
    pub const fn copy(mut self, value: bool) -> Self {
        self.copy = value;
        self
    }

    #[must_use]
    pub const fn debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Only print what would be done.
    #[must_use]
    pub const fn dryrun(mut self, value: bool) -> Self {
        self.dryrun = value;
        self
    }

    #[must_use]
    pub const fn episode_padding(mut self, width: usize) -> Self {
        self.episode_padding = width;
        self
    }

    /// Replace the recognized media file extensions.
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    #[must_use]
    pub const fn overwrite(mut self, value: bool) -> Self {
        self.overwrite = value;
        self
    }

    /// Append a custom episode regex with lower priority than the built-in patterns.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Append a noise token that is stripped from show and episode names.
    #[must_use]
    pub fn purge(mut self, token: impl Into<String>) -> Self {
        self.noise_tokens.push(token.into());
        self
    }

    /// Append multiple noise tokens.
    #[must_use]
    pub fn purge_all<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.noise_tokens
            .extend(tokens.into_iter().map(|token| token.as_ref().to_string()));
        self
    }

    /// Use this season verbatim instead of the parsed number.
    #[must_use]
    pub fn season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    #[must_use]
    pub const fn season_padding(mut self, width: usize) -> Self {
        self.season_padding = width;
        self
    }

    /// Use this show name verbatim instead of the parsed name.
    #[must_use]
    pub fn show_name(mut self, name: impl Into<String>) -> Self {
        self.show_name = Some(name.into());
        self
    }

    /// Fail files where a template field resolves to an empty value.
    #[must_use]
    pub const fn strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    /// Also process subtitle files.
    #[must_use]
    pub const fn subtitles(mut self, value: bool) -> Self {
        self.subtitles = value;
        self
    }

    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    #[must_use]
    pub const fn verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Validate options and create the final config.
    ///
    /// # Errors
    /// Returns an error for an invalid template, delimiter, extension list or custom pattern.
    pub fn build(self) -> Result<RenameConfig> {
        if self.delimiter.is_empty() {
            anyhow::bail!("Delimiter can not be empty");
        }
        if self.delimiter.chars().any(std::path::is_separator) {
            anyhow::bail!("Delimiter can not contain a path separator: '{}'", self.delimiter);
        }

        let template = Template::parse(&self.template)?;

        let delimiter_runs = Regex::new(&format!(r"(?:{}){{2,}}", regex::escape(&self.delimiter)))
            .with_context(|| format!("Invalid delimiter: '{}'", self.delimiter))?;

        let noise_tokens: Vec<String> = self
            .noise_tokens
            .iter()
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .unique()
            .collect();
        let cleaner = TokenCleaner::new(&noise_tokens)?;

        let mut matcher = PatternMatcher::default();
        for pattern in &self.patterns {
            matcher.push(EpisodePattern::custom(pattern)?);
        }

        let mut extensions: Vec<String> = self
            .extensions
            .iter()
            .map(|extension| extension.trim().trim_start_matches('.').to_lowercase())
            .filter(|extension| !extension.is_empty())
            .collect();
        if self.subtitles {
            extensions.push(SUBTITLE_EXTENSION.to_string());
        }
        let extensions: Vec<String> = extensions.into_iter().unique().collect();
        if extensions.is_empty() {
            anyhow::bail!("No media file extensions configured");
        }

        Ok(RenameConfig {
            camel_case: self.camel_case,
            cleaner,
            copy: self.copy,
            debug: self.debug,
            delimiter: self.delimiter,
            delimiter_runs,
            dryrun: self.dryrun,
            episode_padding: self.episode_padding.min(MAX_PADDING),
            extensions,
            matcher,
            output_dir: self.output_dir,
            overwrite: self.overwrite,
            season: self.season,
            season_padding: self.season_padding.min(MAX_PADDING),
            show_name: self.show_name,
            strict: self.strict,
            template,
            verbose: self.verbose,
        })
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        RenameConfigBuilder::default()
            .build()
            .expect("Failed to build default config")
    }
}

impl RenameConfig {
    #[must_use]
    pub fn builder() -> RenameConfigBuilder {
        RenameConfigBuilder::default()
    }

    #[must_use]
    pub const fn camel_case(&self) -> bool {
        self.camel_case
    }

    #[must_use]
    pub const fn cleaner(&self) -> &TokenCleaner {
        &self.cleaner
    }

    #[must_use]
    pub const fn copy(&self) -> bool {
        self.copy
    }

    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    #[must_use]
    pub const fn dryrun(&self) -> bool {
        self.dryrun
    }

    #[must_use]
    pub const fn episode_padding(&self) -> usize {
        self.episode_padding
    }

    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    #[must_use]
    pub const fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub const fn overwrite(&self) -> bool {
        self.overwrite
    }

    #[must_use]
    pub fn season_override(&self) -> Option<&str> {
        self.season.as_deref()
    }

    #[must_use]
    pub const fn season_padding(&self) -> usize {
        self.season_padding
    }

    #[must_use]
    pub fn show_name_override(&self) -> Option<&str> {
        self.show_name.as_deref()
    }

    #[must_use]
    pub const fn strict(&self) -> bool {
        self.strict
    }

    #[must_use]
    pub const fn template(&self) -> &Template {
        &self.template
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Check if the file extension is one of the recognized media extensions.
    #[must_use]
    pub fn is_media_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|extension| crate::os_str_to_string(extension).to_lowercase())
            .is_some_and(|extension| self.extensions.contains(&extension))
    }

    /// Replace repeated delimiters with a single one.
    #[must_use]
    pub fn collapse_delimiters(&self, name: &str) -> String {
        self.delimiter_runs.replace_all(name, self.delimiter.as_str()).into_owned()
    }
}

impl fmt::Display for RenameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noise = self.cleaner.tokens().join(", ");
        let patterns = self.matcher.patterns().iter().join(", ");
        writeln!(f, "Config:")?;
        writeln!(f, "  debug:       {}", crate::colorize_bool(self.debug))?;
        writeln!(f, "  dryrun:      {}", crate::colorize_bool(self.dryrun))?;
        writeln!(f, "  camel case:  {}", crate::colorize_bool(self.camel_case))?;
        writeln!(f, "  copy:        {}", crate::colorize_bool(self.copy))?;
        writeln!(f, "  overwrite:   {}", crate::colorize_bool(self.overwrite))?;
        writeln!(f, "  strict:      {}", crate::colorize_bool(self.strict))?;
        writeln!(f, "  verbose:     {}", crate::colorize_bool(self.verbose))?;
        writeln!(f, "  delimiter:   \"{}\"", self.delimiter)?;
        writeln!(f, "  season pad:  {}", self.season_padding)?;
        writeln!(f, "  episode pad: {}", self.episode_padding)?;
        writeln!(f, "  show name:   \"{}\"", self.show_name.as_deref().unwrap_or_default())?;
        writeln!(f, "  season:      \"{}\"", self.season.as_deref().unwrap_or_default())?;
        writeln!(f, "  template:    \"{}\"", self.template)?;
        writeln!(f, "  output:      {}", self.output_dir.display())?;
        writeln!(f, "  extensions:  [{}]", self.extensions.join(", "))?;
        writeln!(f, "  patterns:    [{patterns}]")?;
        writeln!(f, "  noise:       [{noise}]")
    }
}
