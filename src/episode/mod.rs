//! Episode renaming pipeline.
//!
//! Each candidate file becomes an [`EpisodeRecord`]:
//! the [`PatternMatcher`] extracts season and episode numbers from the file name,
//! captured names are cleaned of noise tokens and joined with the delimiter,
//! and the output [`Template`] is rendered into a relative destination path.
//! The [`Relocator`] then moves or copies the files and reports every outcome to a [`StatusSink`].

pub mod case;
pub mod clean;
pub mod config;
pub mod index;
pub mod logger;
pub mod pattern;
pub mod record;
pub mod relocate;
pub mod status;
pub mod template;

pub use case::case_words;
pub use clean::{DEFAULT_NOISE_TOKENS, TokenCleaner};
pub use config::{EpisodeUserConfig, RenameConfig, RenameConfigBuilder};
pub use index::EpisodeIndex;
pub use logger::FileLogger;
pub use pattern::{EpisodeMatch, EpisodePattern, PatternMatcher};
pub use record::{EpisodeFields, EpisodeRecord, FailureReason};
pub use relocate::{OutcomeKind, RelocationAction, RelocationOutcome, RelocationSummary, Relocator};
pub use status::{ConsoleSink, StatusEvent, StatusSink};
pub use template::{Field, FieldValues, Template};
