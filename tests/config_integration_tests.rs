//! Integration tests for config loading from fixture files.
//!
//! These tests verify that the sample config file parses into a valid rename config.

use std::fs;
use std::path::{Path, PathBuf};

use episode_rename::episode::{EpisodePattern, EpisodeRecord, EpisodeUserConfig, RenameConfigBuilder};

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_file_exists() {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    assert!(config_path.exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn eprename_section_has_expected_structure() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let eprename = value.get("eprename").expect("should have eprename section");

    for key in [
        "camel_case",
        "delimiter",
        "episode_padding",
        "extensions",
        "output_dir",
        "patterns",
        "purge",
        "season_padding",
        "template",
    ] {
        assert!(eprename.get(key).is_some(), "Config should have eprename.{key}");
    }
}

#[test]
fn config_values_have_correct_types() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");
    let eprename = value.get("eprename").expect("should have eprename section");

    assert!(eprename.get("camel_case").unwrap().is_bool());
    assert!(eprename.get("episode_padding").unwrap().is_integer());
    assert!(eprename.get("delimiter").unwrap().is_str());
    assert!(eprename.get("purge").unwrap().is_array());
    assert!(eprename.get("patterns").unwrap().is_array());
}

#[test]
fn sample_config_parses_into_user_config() {
    let config = EpisodeUserConfig::from_toml_str(&read_sample_config()).expect("should parse");

    assert!(config.camel_case);
    assert!(config.recurse);
    assert!(config.subtitles);
    assert_eq!(config.delimiter.as_deref(), Some("."));
    assert_eq!(config.episode_padding, Some(2));
    assert_eq!(config.season_padding, Some(1));
    assert_eq!(config.output_dir, Some(PathBuf::from("/media/tv")));
    assert_eq!(config.purge.len(), 5);
    assert_eq!(config.patterns.len(), 1);
}

#[test]
fn sample_config_builds_rename_config() {
    let user_config = EpisodeUserConfig::from_toml_str(&read_sample_config()).expect("should parse");
    let config = RenameConfigBuilder::from_user_config(&user_config)
        .build()
        .expect("sample config should be valid");

    assert_eq!(config.output_dir(), Path::new("/media/tv"));
    assert_eq!(config.extensions(), ["mkv", "mp4", "avi", "m4v", "srt"]);
    assert!(config.cleaner().tokens().any(|token| token == "repack"));
    assert!(matches!(config.matcher().patterns().last(), Some(EpisodePattern::Custom(_))));

    let record = EpisodeRecord::from_path("/downloads/the.show.s03e07.the.heist.PROPER.1080p.mkv", &config);
    let expected: PathBuf = ["The.Show", "Season.3", "The.Show.S3E07.The.Heist.mkv"].iter().collect();
    assert_eq!(record.rendered_name(), Some(expected.as_path()));
}
