//! Output filename template.
//!
//! A template contains literal text and the placeholders
//! `{show_name}`, `{season}`, `{episode}`, `{episode_name}` and `{sep}`.
//! Literal braces are written as `{{` and `}}`.

use std::fmt;
use std::path::MAIN_SEPARATOR_STR;

use anyhow::Result;
use itertools::Itertools;

/// A template placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ShowName,
    Season,
    Episode,
    EpisodeName,
    /// Path separator for creating subdirectories.
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Parsed output template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValues<'a> {
    pub show_name: &'a str,
    pub season: &'a str,
    pub episode: &'a str,
    pub episode_name: &'a str,
}

impl Field {
    pub const ALL: [Self; 5] = [
        Self::ShowName,
        Self::Season,
        Self::Episode,
        Self::EpisodeName,
        Self::Separator,
    ];

    /// Placeholder name without braces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShowName => "show_name",
            Self::Season => "season",
            Self::Episode => "episode",
            Self::EpisodeName => "episode_name",
            Self::Separator => "sep",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl FieldValues<'_> {
    #[must_use]
    pub const fn get(&self, field: Field) -> &str {
        match field {
            Field::ShowName => self.show_name,
            Field::Season => self.season,
            Field::Episode => self.episode,
            Field::EpisodeName => self.episode_name,
            Field::Separator => MAIN_SEPARATOR_STR,
        }
    }
}

impl Template {
    /// Parse and validate a template string.
    ///
    /// # Errors
    /// Returns an error for an empty template, an unknown placeholder or unbalanced braces.
    pub fn parse(template: &str) -> Result<Self> {
        if template.trim().is_empty() {
            anyhow::bail!("Output template is empty");
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => {
                                anyhow::bail!("Unclosed placeholder '{{{name}' in template: '{template}'");
                            }
                            Some(c) => name.push(c),
                        }
                    }
                    let Some(field) = Field::from_name(name.trim()) else {
                        anyhow::bail!(
                            "Unknown placeholder '{{{name}}}' in template: '{template}'\nValid placeholders: {}",
                            Field::ALL.iter().join(", ")
                        );
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => anyhow::bail!("Unmatched '}}' in template: '{template}'"),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// The original template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholders used in the template, in order of appearance and without duplicates.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Field(field) => Some(*field),
                Segment::Literal(_) => None,
            })
            .unique()
    }

    /// Substitute the values into the template.
    #[must_use]
    pub fn render(&self, values: &FieldValues) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Field(field) => values.get(*field),
            })
            .collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
