//! Season and episode extraction from file stems.
//!
//! Patterns are tried in priority order and the first match wins.
//! Explicit markers like `S01E02` come first so that a loose numeric pattern
//! never shadows an unambiguous one.

use std::fmt;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

/// `S01E02`, `s1e2`, `S.01.E.02`, `[S01E02]`
static RE_SEASON_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<show>.*?)[\[(]?s[^\pL\pN]?(?P<season>\d{1,2})[^\pL\pN]?e[^\pL\pN]?(?P<episode>\d{1,2})[\])]?(?P<title>(?:\D.*)?)$",
    )
    .expect("Failed to compile season episode regex")
});

/// `1x02`, `01x02`, `1-02`, `1 x 02`, `[1x02]`
static RE_CROSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<show>(?:.*?\D)?)[\[(]?\s?(?P<season>\d{1,2})\s?[x-]\s?(?P<episode>\d{1,2})\s?[\])]?(?P<title>(?:\D.*)?)$",
    )
    .expect("Failed to compile cross marker regex")
});

/// `Season 1 Episode 2`, `season.01.episode.02`
static RE_VERBOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<show>(?:.*?[^\pL\pN])?)season[^\pL\pN]*(?P<season>\d{1,2})[^\pL\pN]*episode[^\pL\pN]*(?P<episode>\d{1,3})(?P<title>(?:\D.*)?)$",
    )
    .expect("Failed to compile verbose marker regex")
});

/// `102` as season 1 episode 02
static RE_THREE_DIGIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<show>(?:.*?[^\pL\pN])?)[\[(]?(?P<season>\d)(?P<episode>\d{2})[\])]?(?P<title>(?:[^\pL\pN].*)?)$",
    )
    .expect("Failed to compile three digit regex")
});

/// Season and episode information captured from a file stem.
///
/// Show and episode names are raw substrings with surrounding whitespace trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeMatch {
    pub season: Option<u32>,
    pub episode: u32,
    pub show_name: String,
    pub episode_name: String,
}

/// A strategy for recognizing a season and episode layout.
#[derive(Debug, Clone)]
pub enum EpisodePattern {
    /// Explicit `S<season>E<episode>` marker.
    SeasonEpisodeMarker,
    /// `<season>x<episode>` or `<season>-<episode>` marker.
    CrossMarker,
    /// Literal words `season <N> episode <M>`.
    VerboseMarker,
    /// Bare three digit run as one digit season and two digit episode.
    ThreeDigit,
    /// User supplied regex with named groups `episode` and optionally `season`, `show` and `title`.
    Custom(Regex),
}

/// Ordered list of episode patterns.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<EpisodePattern>,
}

impl EpisodeMatch {
    fn from_captures(captures: &Captures) -> Option<Self> {
        let episode = captures.name("episode")?.as_str().parse().ok()?;
        let season = match captures.name("season") {
            Some(season) => Some(season.as_str().parse().ok()?),
            None => None,
        };
        let text = |name: &str| {
            captures
                .name(name)
                .map_or_else(String::new, |m| m.as_str().trim().to_string())
        };

        Some(Self {
            season,
            episode,
            show_name: text("show"),
            episode_name: text("title"),
        })
    }
}

impl EpisodePattern {
    /// Built-in patterns in priority order.
    #[must_use]
    pub fn built_in() -> Vec<Self> {
        vec![
            Self::SeasonEpisodeMarker,
            Self::CrossMarker,
            Self::VerboseMarker,
            Self::ThreeDigit,
        ]
    }

    /// Compile a user supplied pattern.
    ///
    /// # Errors
    /// Returns an error if the regex is invalid or has no `episode` group.
    pub fn custom(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).with_context(|| format!("Invalid episode pattern: '{pattern}'"))?;
        if !regex.capture_names().flatten().any(|name| name == "episode") {
            anyhow::bail!("Episode pattern is missing the named group (?P<episode>...): '{pattern}'");
        }
        Ok(Self::Custom(regex))
    }

    fn regex(&self) -> &Regex {
        match self {
            Self::SeasonEpisodeMarker => &RE_SEASON_EPISODE,
            Self::CrossMarker => &RE_CROSS,
            Self::VerboseMarker => &RE_VERBOSE,
            Self::ThreeDigit => &RE_THREE_DIGIT,
            Self::Custom(regex) => regex,
        }
    }

    /// Try to extract episode information from a file stem.
    #[must_use]
    pub fn find(&self, stem: &str) -> Option<EpisodeMatch> {
        let captures = self.regex().captures(stem)?;
        EpisodeMatch::from_captures(&captures)
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(EpisodePattern::built_in())
    }
}

impl PatternMatcher {
    #[must_use]
    pub const fn new(patterns: Vec<EpisodePattern>) -> Self {
        Self { patterns }
    }

    /// Append a pattern with the lowest priority.
    pub fn push(&mut self, pattern: EpisodePattern) {
        self.patterns.push(pattern);
    }

    #[must_use]
    pub fn patterns(&self) -> &[EpisodePattern] {
        &self.patterns
    }

    /// Return the match of the first pattern that recognizes the stem.
    #[must_use]
    pub fn find(&self, stem: &str) -> Option<EpisodeMatch> {
        self.find_with_pattern(stem).map(|(_, episode)| episode)
    }

    /// Like [`Self::find`] but also returns the pattern that matched.
    #[must_use]
    pub fn find_with_pattern(&self, stem: &str) -> Option<(&EpisodePattern, EpisodeMatch)> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.find(stem).map(|episode| (pattern, episode)))
    }
}

impl fmt::Display for EpisodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeasonEpisodeMarker => write!(f, "S01E02"),
            Self::CrossMarker => write!(f, "1x02"),
            Self::VerboseMarker => write!(f, "season 1 episode 2"),
            Self::ThreeDigit => write!(f, "102"),
            Self::Custom(regex) => write!(f, "custom: {}", regex.as_str()),
        }
    }
}
