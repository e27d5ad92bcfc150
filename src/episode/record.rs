use std::fmt;
use std::path::{Path, PathBuf};

use crate::episode::case::case_words;
use crate::episode::config::RenameConfig;
use crate::episode::pattern::{EpisodeMatch, PatternMatcher};
use crate::episode::template::{Field, FieldValues};

/// Why an episode record could not be resolved to a new name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No pattern recognized the file name.
    Unrecognized,
    /// No season number was found and no season override is set.
    MissingSeason,
    /// Strict mode: a template field resolved to an empty value.
    MissingField(Field),
    /// The rendered file name is empty.
    EmptyName,
}

/// Normalized values used for rendering the template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeFields {
    pub show_name: Option<String>,
    pub season: Option<String>,
    pub episode: Option<String>,
    pub episode_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    Pending,
    Resolved(PathBuf),
    Failed(FailureReason),
}

/// Parsed episode information for a single file.
///
/// Created from a path and then resolved in three stages:
/// extraction, normalization and rendering.
/// A failed record stays failed and later stages leave it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    source: PathBuf,
    directory: PathBuf,
    stem: String,
    extension: String,
    captured: Option<EpisodeMatch>,
    fields: EpisodeFields,
    resolution: Resolution,
}

impl EpisodeRecord {
    /// Create an unresolved record for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let source = path.into();
        let directory = source.parent().map(Path::to_path_buf).unwrap_or_default();
        let (stem, extension) = crate::normalized_stem_and_extension(&source);
        Self {
            source,
            directory,
            stem,
            extension,
            captured: None,
            fields: EpisodeFields::default(),
            resolution: Resolution::Pending,
        }
    }

    /// Create a record and run all resolution stages with the given config.
    pub fn from_path(path: impl Into<PathBuf>, config: &RenameConfig) -> Self {
        let mut record = Self::new(path);
        record.extract(config.matcher());
        record.normalize(config);
        record.render(config);
        record
    }

    /// Run the pattern matcher on the file stem.
    pub fn extract(&mut self, matcher: &PatternMatcher) {
        if self.is_failed() {
            return;
        }
        self.captured = matcher.find(&self.stem);
        if self.captured.is_none() {
            self.fail(FailureReason::Unrecognized);
        }
    }

    /// Clean, case and pad the captured values.
    pub fn normalize(&mut self, config: &RenameConfig) {
        if self.is_failed() {
            return;
        }
        let Some(captured) = self.captured.clone() else {
            self.fail(FailureReason::Unrecognized);
            return;
        };

        let season = match (config.season_override(), captured.season) {
            (Some(season), _) => season.to_string(),
            (None, Some(season)) => zero_pad(season, config.season_padding()),
            (None, None) => {
                self.fail(FailureReason::MissingSeason);
                return;
            }
        };
        let episode = zero_pad(captured.episode, config.episode_padding());

        let show_name = config.show_name_override().map_or_else(
            || {
                case_words(
                    &config.cleaner().clean(&captured.show_name),
                    config.delimiter(),
                    config.camel_case(),
                )
            },
            ToString::to_string,
        );
        let episode_name = case_words(
            &config.cleaner().clean(&captured.episode_name),
            config.delimiter(),
            config.camel_case(),
        );

        self.fields = EpisodeFields {
            show_name: Some(show_name),
            season: Some(season),
            episode: Some(episode),
            episode_name: Some(episode_name),
        };
    }

    /// Render the output template into a relative path with the original extension.
    pub fn render(&mut self, config: &RenameConfig) {
        if self.is_failed() {
            return;
        }
        if self.fields.season.is_none() || self.fields.episode.is_none() {
            self.fail(FailureReason::Unrecognized);
            return;
        }

        let values = FieldValues {
            show_name: self.fields.show_name.as_deref().unwrap_or_default(),
            season: self.fields.season.as_deref().unwrap_or_default(),
            episode: self.fields.episode.as_deref().unwrap_or_default(),
            episode_name: self.fields.episode_name.as_deref().unwrap_or_default(),
        };

        let missing = if config.strict() {
            config.template().fields().find(|field| values.get(*field).is_empty())
        } else {
            None
        };
        if let Some(field) = missing {
            self.fail(FailureReason::MissingField(field));
            return;
        }

        let rendered = config.template().render(&values);
        match self.finalize_name(&rendered, config) {
            Some(path) => self.resolution = Resolution::Resolved(path),
            None => self.fail(FailureReason::EmptyName),
        }
    }

    /// Split the rendered string into path segments and format each one.
    ///
    /// Spaces are replaced with the delimiter and repeated delimiters are collapsed.
    /// Empty segments are dropped so that an empty field never creates an absolute path.
    fn finalize_name(&self, rendered: &str, config: &RenameConfig) -> Option<PathBuf> {
        let delimiter = config.delimiter();
        let segments: Vec<String> = rendered
            .split(std::path::is_separator)
            .map(|segment| {
                let segment = config.collapse_delimiters(&segment.trim().replace(' ', delimiter));
                segment
                    .trim_start_matches(delimiter)
                    .trim_end_matches(delimiter)
                    .trim()
                    .to_string()
            })
            .filter(|segment| !segment.is_empty() && segment != "." && segment != "..")
            .collect();

        let (leaf, directories) = segments.split_last()?;
        let mut path: PathBuf = directories.iter().collect();
        path.push(format!("{leaf}{}", self.extension));
        Some(path)
    }

    fn fail(&mut self, reason: FailureReason) {
        self.resolution = Resolution::Failed(reason);
    }

    const fn is_failed(&self) -> bool {
        matches!(self.resolution, Resolution::Failed(_))
    }

    /// True when a pattern matched and the output name was rendered.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved(_))
    }

    /// Original path and either the rendered relative output path or the failure reason.
    #[must_use]
    pub fn resolve(&self) -> (&Path, Result<&Path, &FailureReason>) {
        let result = match &self.resolution {
            Resolution::Resolved(path) => Ok(path.as_path()),
            Resolution::Failed(reason) => Err(reason),
            Resolution::Pending => Err(&FailureReason::Unrecognized),
        };
        (&self.source, result)
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Raw values captured by the pattern matcher.
    #[must_use]
    pub const fn captured(&self) -> Option<&EpisodeMatch> {
        self.captured.as_ref()
    }

    /// Normalized values, empty until normalization has run.
    #[must_use]
    pub const fn fields(&self) -> &EpisodeFields {
        &self.fields
    }

    /// Rendered relative output path if resolution succeeded.
    #[must_use]
    pub fn rendered_name(&self) -> Option<&Path> {
        self.resolve().1.ok()
    }
}

/// Format number with leading zeros to the given width.
fn zero_pad(number: u32, width: usize) -> String {
    format!("{number:0width$}")
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized => write!(f, "no season and episode found"),
            Self::MissingSeason => write!(f, "no season found"),
            Self::MissingField(field) => write!(f, "empty value for {field}"),
            Self::EmptyName => write!(f, "empty output name"),
        }
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;

    use crate::episode::config::RenameConfigBuilder;
    use crate::episode::pattern::EpisodePattern;

    const SHOW_TEMPLATE: &str = "{show_name}{sep}{season}{sep}{show_name} S{season}E{episode} {episode_name}";

    fn rendered(record: &EpisodeRecord) -> PathBuf {
        record.rendered_name().unwrap().to_path_buf()
    }

    #[test]
    fn test_zero_pad() {
        assert_eq!(zero_pad(5, 2), "05");
        assert_eq!(zero_pad(5, 1), "5");
        assert_eq!(zero_pad(123, 2), "123");
        assert_eq!(zero_pad(7, 0), "7");
        assert_eq!(zero_pad(7, 5), "00007");
    }

    #[test]
    fn test_split_path() {
        let record = EpisodeRecord::new("/tv/downloads/the.show.S02E05.mkv");
        assert_eq!(record.directory(), Path::new("/tv/downloads"));
        assert_eq!(record.stem(), "the.show.S02E05");
        assert_eq!(record.extension(), ".mkv");
        assert!(!record.is_success());
    }

    #[test]
    fn test_end_to_end_example() {
        let config = RenameConfigBuilder::default()
            .template(SHOW_TEMPLATE)
            .delimiter(".")
            .season_padding(1)
            .episode_padding(2)
            .camel_case(true)
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("/tv/the.show.S02E05.HDTV.x264-GROUP.mkv", &config);
        assert!(record.is_success());
        assert_eq!(record.fields().season.as_deref(), Some("2"));
        assert_eq!(record.fields().episode.as_deref(), Some("05"));
        assert_eq!(record.fields().show_name.as_deref(), Some("The.Show"));
        assert_eq!(record.fields().episode_name.as_deref(), Some(""));
        assert_eq!(
            rendered(&record),
            ["The.Show", "2", "The.Show.S2E05.mkv"].iter().collect::<PathBuf>()
        );
    }

    #[test]
    fn test_cross_marker_example() {
        let config = RenameConfigBuilder::default()
            .template("{show_name} {season}x{episode} {episode_name}")
            .episode_padding(2)
            .season_padding(1)
            .camel_case(true)
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("Show.Name.1x3.Some.Title.avi", &config);
        assert_eq!(record.fields().season.as_deref(), Some("1"));
        assert_eq!(record.fields().episode.as_deref(), Some("03"));
        assert_eq!(rendered(&record), PathBuf::from("Show.Name.1x03.Some.Title.avi"));
    }

    #[test]
    fn test_padding_follows_config() {
        let config = RenameConfigBuilder::default()
            .template("S{season}E{episode}")
            .season_padding(3)
            .episode_padding(4)
            .build()
            .unwrap();

        for (stem, expected) in [
            ("Show.S1E2", "S001E0002.mkv"),
            ("Show.S01E02", "S001E0002.mkv"),
            ("Show.S12E34", "S012E0034.mkv"),
        ] {
            let record = EpisodeRecord::from_path(format!("{stem}.mkv"), &config);
            assert_eq!(rendered(&record), PathBuf::from(expected), "{stem}");
        }
    }

    #[test]
    fn test_unrecognized_name_fails() {
        let config = RenameConfig::default();
        let record = EpisodeRecord::from_path("/movies/Some.Movie.2010.mkv", &config);
        assert!(!record.is_success());
        let (source, result) = record.resolve();
        assert_eq!(source, Path::new("/movies/Some.Movie.2010.mkv"));
        assert_eq!(result, Err(&FailureReason::Unrecognized));
    }

    #[test]
    fn test_failure_is_terminal() {
        let config = RenameConfig::default();
        let mut record = EpisodeRecord::new("no episode here.mkv");
        record.extract(config.matcher());
        record.normalize(&config);
        record.render(&config);
        record.extract(config.matcher());
        record.render(&config);
        assert!(!record.is_success());
        assert_eq!(record.fields(), &EpisodeFields::default());
    }

    #[test]
    fn test_render_without_normalize_fails() {
        let config = RenameConfig::default();
        let mut record = EpisodeRecord::new("Show.S01E01.mkv");
        record.extract(config.matcher());
        record.render(&config);
        assert!(!record.is_success());
    }

    #[test]
    fn test_overrides() {
        let config = RenameConfigBuilder::default()
            .template("{show_name} S{season}E{episode}")
            .show_name("My Show")
            .season("Specials")
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("wrong.name.S05E09.mkv", &config);
        assert_eq!(record.fields().show_name.as_deref(), Some("My Show"));
        assert_eq!(record.fields().season.as_deref(), Some("Specials"));
        assert_eq!(rendered(&record), PathBuf::from("My.Show.SSpecialsE09.mkv"));
    }

    #[test]
    fn test_missing_season_without_override() {
        let config = RenameConfigBuilder::default()
            .pattern(r"^(?P<show>.+?)\.ep(?P<episode>\d+)$")
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("Show.ep4.mkv", &config);
        assert_eq!(record.resolve().1, Err(&FailureReason::MissingSeason));

        let config = RenameConfigBuilder::default()
            .template("{show_name} S{season}E{episode}")
            .pattern(r"^(?P<show>.+?)\.ep(?P<episode>\d+)$")
            .season("1")
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("Show.ep4.mkv", &config);
        assert_eq!(rendered(&record), PathBuf::from("Show.S1E04.mkv"));
        assert!(matches!(config.matcher().patterns().last(), Some(EpisodePattern::Custom(_))));
    }

    #[test]
    fn test_strict_rejects_empty_field() {
        let config = RenameConfigBuilder::default()
            .template("{show_name} S{season}E{episode} {episode_name}")
            .strict(true)
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("Show.S01E02.mkv", &config);
        assert_eq!(
            record.resolve().1,
            Err(&FailureReason::MissingField(Field::EpisodeName))
        );

        let record = EpisodeRecord::from_path("S01E02.Title.mkv", &config);
        assert_eq!(record.resolve().1, Err(&FailureReason::MissingField(Field::ShowName)));

        let record = EpisodeRecord::from_path("Show.S01E02.Title.mkv", &config);
        assert!(record.is_success());
    }

    #[test]
    fn test_strict_ignores_fields_not_in_template() {
        let config = RenameConfigBuilder::default()
            .template("{show_name} S{season}E{episode}")
            .strict(true)
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("Show.S01E02.mkv", &config);
        assert!(record.is_success());
    }

    #[test]
    fn test_strict_treats_whitespace_as_value() {
        let config = RenameConfigBuilder::default()
            .template("{show_name} S{season}E{episode}")
            .show_name(" ")
            .strict(true)
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("S01E02.mkv", &config);
        assert_eq!(rendered(&record), PathBuf::from("S1E02.mkv"));
    }

    #[test]
    fn test_non_strict_renders_empty_segment() {
        let config = RenameConfigBuilder::default()
            .template("{show_name}{sep}{show_name} S{season}E{episode} {episode_name}")
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("S01E02.mkv", &config);
        assert!(record.is_success());
        assert_eq!(rendered(&record), PathBuf::from("S1E02.mkv"));
    }

    #[test]
    fn test_dot_segments_are_dropped() {
        let config = RenameConfigBuilder::default()
            .template("{show_name}{sep}S{season}E{episode}")
            .show_name("..")
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("/tv/show.s01e02.mkv", &config);
        assert_eq!(rendered(&record), PathBuf::from("S1E02.mkv"));
    }

    #[test]
    fn test_empty_name_fails() {
        let config = RenameConfigBuilder::default()
            .template("{episode_name}")
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("Show.S01E02.mkv", &config);
        assert_eq!(record.resolve().1, Err(&FailureReason::EmptyName));
    }

    #[test]
    fn test_delimiter_runs_collapse() {
        let config = RenameConfigBuilder::default()
            .template("{show_name} -  S{season}E{episode}")
            .delimiter("_")
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("the_show_1x02.mp4", &config);
        assert_eq!(rendered(&record), PathBuf::from("the_show_-_S1E02.mp4"));
    }

    #[test]
    fn test_without_camel_case() {
        let config = RenameConfigBuilder::default()
            .template("{show_name} S{season}E{episode} {episode_name}")
            .camel_case(false)
            .build()
            .unwrap();

        let record = EpisodeRecord::from_path("The.Show.S01E02.The.Pilot.HDTV.mkv", &config);
        assert_eq!(rendered(&record), PathBuf::from("the.show.S1E02.the.pilot.mkv"));
    }
}
