//! Noise token removal and separator normalization for captured name fragments.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

/// Release group tag at the end of a name: `x264-GROUP`.
static RE_RELEASE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<head>.*)-[\pL\pN]+$").expect("Failed to compile release group regex"));

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Separators replaced with whitespace, applied in order after noise removal.
const SEPARATORS: [(&str, &str); 7] = [
    (" - ", " "),
    (".", " "),
    (",", " "),
    ("_", " "),
    ("-", " "),
    ("'", ""),
    ("’", ""),
];

/// Release markers that are stripped by default.
pub const DEFAULT_NOISE_TOKENS: [&str; 22] = [
    "hdtv", "pdtv", "web-dl", "webrip", "web-rip", "bluray", "blu-ray", "bdrip", "brrip", "dvdrip", "xvid", "divx",
    "x264", "x265", "h264", "h265", "hevc", "480p", "576p", "720p", "1080p", "2160p",
];

/// A single noise token with its compiled whole-word matcher.
#[derive(Debug, Clone)]
struct NoiseToken {
    token: String,
    regex: Regex,
}

/// Lower-cases names and strips configured noise tokens from them.
#[derive(Debug, Clone, Default)]
pub struct TokenCleaner {
    noise: Vec<NoiseToken>,
}

impl NoiseToken {
    /// Compile a matcher for the given lower-case token.
    ///
    /// An alphanumeric edge of the token may not touch another alphanumeric character,
    /// so `hdtv` is removed from `show.hdtv` but not from `hdtvshow`.
    fn new(token: &str) -> Result<Self> {
        let starts_with_word = token.chars().next().is_some_and(char::is_alphanumeric);
        let ends_with_word = token.chars().next_back().is_some_and(char::is_alphanumeric);
        let leading = if starts_with_word { r"(^|[^\pL\pN])" } else { "()" };
        let trailing = if ends_with_word { r"([^\pL\pN]|$)" } else { "()" };
        let pattern = format!("{leading}{}{trailing}", regex::escape(token));
        let regex = Regex::new(&pattern).with_context(|| format!("Invalid noise token: '{token}'"))?;
        Ok(Self {
            token: token.to_string(),
            regex,
        })
    }

    /// True when the name ends with the whole token.
    fn ends(&self, name: &str) -> bool {
        name.strip_suffix(self.token.as_str()).is_some_and(|head| {
            !self.token.starts_with(char::is_alphanumeric) || !head.ends_with(char::is_alphanumeric)
        })
    }

    /// Remove every occurrence of the token.
    ///
    /// Adjacent occurrences share a boundary character,
    /// so replacing is repeated until nothing matches anymore.
    fn strip(&self, name: &mut String) {
        while self.regex.is_match(name) {
            *name = self.regex.replace_all(name, "${1}${2}").into_owned();
        }
    }
}

impl TokenCleaner {
    /// Create a cleaner for the given noise tokens.
    ///
    /// Tokens are lower-cased and empty tokens are ignored.
    pub fn new<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let noise = tokens
            .into_iter()
            .map(|token| token.as_ref().trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .map(|token| NoiseToken::new(&token))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { noise })
    }

    /// The noise tokens in the order they are applied.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.noise.iter().map(|noise| noise.token.as_str())
    }

    /// Lower-case the raw string, remove noise tokens and replace separators with single spaces.
    #[must_use]
    pub fn clean(&self, raw: &str) -> String {
        let mut name = raw.to_lowercase();
        self.strip_release_group(&mut name);

        for noise in &self.noise {
            noise.strip(&mut name);
        }

        for (pattern, replacement) in SEPARATORS {
            name = name.replace(pattern, replacement);
        }

        RE_WHITESPACE.replace_all(name.trim(), " ").into_owned()
    }

    /// Drop a trailing `-TAG` release group that directly follows a noise token.
    fn strip_release_group(&self, name: &mut String) {
        let Some(head) = RE_RELEASE_GROUP
            .captures(name)
            .and_then(|captures| captures.name("head"))
            .map(|head| head.as_str())
        else {
            return;
        };
        if self.noise.iter().any(|noise| noise.ends(head)) {
            let head_length = head.len();
            name.truncate(head_length);
        }
    }
}
