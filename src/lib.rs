//! Rename TV episode files based on season and episode information parsed from the file name.
//!
//! The [`episode`] module contains the parsing and renaming pipeline,
//! the functions in this root module are shared path and terminal output helpers.

pub mod config;
pub mod episode;

use std::cmp::Ordering;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::{ColoredString, Colorize};
use difference::{Changeset, Difference};
use unicode_normalization::UnicodeNormalization;

/// Append an extension after the existing one: `Show.mkv` -> `Show.mkv.tmp`.
pub fn append_extension_to_path(path: PathBuf, extension: impl AsRef<OsStr>) -> PathBuf {
    let mut os_string: OsString = path.into();
    os_string.push(".");
    os_string.push(extension);
    os_string.into()
}

/// Format bool value as a coloured string.
#[must_use]
pub fn colorize_bool(value: bool) -> ColoredString {
    if value { "true".green() } else { "false".red() }
}

/// Split a path into file stem and extension with special characters retained.
///
/// The extension is returned with its leading dot, or as an empty string if the file has none.
///
/// ```rust
/// use std::path::Path;
/// use episode_rename::normalized_stem_and_extension;
///
/// let (stem, extension) = normalized_stem_and_extension(Path::new("shows/Show.S01E02.mkv"));
/// assert_eq!(stem, "Show.S01E02");
/// assert_eq!(extension, ".mkv");
///
/// let (stem, extension) = normalized_stem_and_extension(Path::new("README"));
/// assert_eq!(stem, "README");
/// assert_eq!(extension, "");
/// ```
#[must_use]
pub fn normalized_stem_and_extension(path: &Path) -> (String, String) {
    let file_stem = os_str_to_string(path.file_stem().unwrap_or_default());
    let file_extension = path
        .extension()
        .map(|extension| format!(".{}", os_str_to_string(extension)))
        .unwrap_or_default();

    // Rust uses Unicode NFD (Normalization Form Decomposed) by default,
    // which converts special chars like "å" to "a\u{30a}".
    // Use NFC (Normalization Form Composed) to keep the composed characters.
    (
        file_stem.nfc().collect::<String>(),
        file_extension.nfc().collect::<String>(),
    )
}

/// Check if a walked entry below the root is hidden, meaning its name starts with a dot.
#[must_use]
pub fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    let name_bytes = entry.file_name().as_encoded_bytes();
    entry.depth() > 0 && !name_bytes.is_empty() && name_bytes[0] == b'.'
}

/// Resolves the provided input path to a directory or file to an absolute path.
///
/// If `path` is `None`, the current working directory is used.
/// Returns an error if the path does not exist.
///
/// ```rust
/// use std::path::Path;
/// use episode_rename::resolve_input_path;
///
/// let absolute_path = resolve_input_path(Some(Path::new("src"))).unwrap();
/// assert!(absolute_path.is_absolute());
/// ```
pub fn resolve_input_path(path: Option<&Path>) -> Result<PathBuf> {
    let input_path = path.map(path_to_string).unwrap_or_default().trim().to_string();

    let filepath = if input_path.is_empty() {
        env::current_dir().context("Failed to get current working directory")?
    } else {
        PathBuf::from(input_path)
    };
    if !filepath.exists() {
        anyhow::bail!(
            "Input path does not exist or is not accessible: '{}'",
            filepath.display()
        );
    }

    dunce::canonicalize(&filepath).with_context(|| format!("Failed to resolve path: {}", filepath.display()))
}

/// Resolves the output directory relative to an absolute input path.
///
/// If `path` is `None` or empty and the input path is a file,
/// the parent directory of the input path is used.
/// Otherwise, the input directory is used as the output path.
/// A relative output path is resolved against the current working directory.
pub fn resolve_output_path(path: Option<&Path>, absolute_input_path: &Path) -> Result<PathBuf> {
    let output_path = path.map(path_to_string).unwrap_or_default().trim().to_string();
    if output_path.is_empty() {
        return if absolute_input_path.is_file() {
            Ok(absolute_input_path
                .parent()
                .context("Failed to get parent directory")?
                .to_path_buf())
        } else {
            Ok(absolute_input_path.to_path_buf())
        };
    }

    let output_path = PathBuf::from(output_path);
    let output_path = if output_path.is_absolute() {
        output_path
    } else {
        env::current_dir()
            .context("Failed to get current working directory")?
            .join(output_path)
    };
    Ok(dunce::simplified(&output_path).to_path_buf())
}

/// Gets the relative path or filename from a full path based on a root directory.
///
/// If the full path is within the root directory, the function returns the relative path.
/// Otherwise, it returns just the filename.
///
/// ```rust
/// use std::path::Path;
/// use episode_rename::get_relative_path_or_filename;
///
/// let root = Path::new("/tv");
/// let full_path = root.join("Show/1/Show.S1E01.mkv");
/// assert_eq!(get_relative_path_or_filename(&full_path, root), "Show/1/Show.S1E01.mkv");
///
/// let outside_path = Path::new("/downloads/show.101.mkv");
/// assert_eq!(get_relative_path_or_filename(outside_path, root), "show.101.mkv");
/// ```
#[must_use]
pub fn get_relative_path_or_filename(full_path: &Path, root: &Path) -> String {
    match full_path.strip_prefix(root) {
        Ok(relative_path) if !relative_path.as_os_str().is_empty() => relative_path.display().to_string(),
        _ => full_path
            .file_name()
            .map_or_else(|| full_path.display().to_string(), os_str_to_string),
    }
}

/// Convert `OsStr` to String with invalid Unicode handling.
#[must_use]
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str().map_or_else(
        || name.to_string_lossy().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to string with invalid Unicode handling.
#[must_use]
pub fn path_to_string(path: &Path) -> String {
    path.to_str().map_or_else(
        || path.to_string_lossy().to_string().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

/// Print the old and new path on consecutive lines with the changed parts coloured.
///
/// The new path is only printed when it differs from the old one.
/// Both lines are indented so the first longer shared segment lines up.
pub fn show_diff(old: &str, new: &str) {
    let changeset = Changeset::new(old, new, "");
    let (mut old_line, mut new_line) = aligned_prefixes(&changeset.diffs, old, new);

    for diff in &changeset.diffs {
        match diff {
            Difference::Same(text) => {
                old_line.push_str(text);
                new_line.push_str(text);
            }
            Difference::Add(text) if text.chars().all(char::is_whitespace) => {
                new_line.push_str(&text.on_green().to_string());
            }
            Difference::Add(text) => new_line.push_str(&text.green().to_string()),
            Difference::Rem(text) if text.chars().all(char::is_whitespace) => {
                old_line.push_str(&text.on_red().to_string());
            }
            Difference::Rem(text) => old_line.push_str(&text.red().to_string()),
        }
    }

    println!("{old_line}");
    if old != new {
        println!("{new_line}");
    }
}

/// Leading padding for the old and new line.
fn aligned_prefixes(diffs: &[Difference], old: &str, new: &str) -> (String, String) {
    let anchor = diffs.iter().find_map(|diff| match diff {
        Difference::Same(text) if text.chars().count() >= 3 && !text.chars().all(char::is_whitespace) => {
            Some((old.find(text.as_str())?, new.find(text.as_str())?))
        }
        _ => None,
    });
    match anchor {
        Some((old_index, new_index)) => match old_index.cmp(&new_index) {
            Ordering::Greater => (String::new(), " ".repeat(old_index - new_index)),
            Ordering::Less => (" ".repeat(new_index - old_index), String::new()),
            Ordering::Equal => (String::new(), String::new()),
        },
        None => (String::new(), String::new()),
    }
}

/// Generate a shell completion script for the given shell.
pub fn generate_shell_completion(shell: Shell, mut command: Command, install: bool, command_name: &str) -> Result<()> {
    if install {
        let out_dir = get_shell_completion_dir(shell, command_name)?;
        let path = clap_complete::generate_to(shell, &mut command, command_name, out_dir)?;
        println!("Completion file generated to: {}", path.display());
    } else {
        clap_complete::generate(shell, &mut command, command_name, &mut std::io::stdout());
    }
    Ok(())
}

/// Directory for installed shell completions under the user home directory.
///
/// Zsh completions go to an oh-my-zsh plugin directory when oh-my-zsh is installed.
fn get_shell_completion_dir(shell: Shell, name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    let dir = match shell {
        Shell::Zsh if home.join(".oh-my-zsh/custom/plugins").exists() => {
            home.join(".oh-my-zsh/custom/plugins").join(name)
        }
        Shell::Zsh => home.join(".zsh/completions"),
        Shell::Bash => home.join(".bash_completion.d"),
        Shell::Fish => home.join(".config/fish/completions"),
        Shell::Elvish => home.join(".elvish"),
        Shell::PowerShell => home.join(".config/powershell/completions"),
        _ => anyhow::bail!("Unsupported shell: {shell}"),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create completion directory: {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;
    use walkdir::WalkDir;

    #[test]
    fn test_is_hidden_file() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join(".hidden.mkv")).unwrap();
        File::create(dir.path().join("visible.mkv")).unwrap();

        let hidden = WalkDir::new(dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .find(|e| e.file_name().to_string_lossy().eq(".hidden.mkv"))
            .unwrap();
        assert!(is_hidden(&hidden));

        let visible = WalkDir::new(dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .find(|e| e.file_name().to_string_lossy().eq("visible.mkv"))
            .unwrap();
        assert!(!is_hidden(&visible));
    }

    #[test]
    fn test_root_is_never_hidden() {
        let dir = tempdir().unwrap();
        let root = dir.path().join(".downloads");
        std::fs::create_dir(&root).unwrap();

        let entry = WalkDir::new(&root).into_iter().filter_map(Result::ok).next().unwrap();
        assert!(!is_hidden(&entry));
    }

    #[test]
    fn test_stem_and_extension_with_multiple_dots() {
        let (stem, extension) = normalized_stem_and_extension(Path::new("/tv/Show.Name.S01E02.HDTV.x264.mkv"));
        assert_eq!(stem, "Show.Name.S01E02.HDTV.x264");
        assert_eq!(extension, ".mkv");
    }

    #[test]
    fn test_stem_is_nfc_normalized() {
        let (stem, _) = normalized_stem_and_extension(Path::new("Ma\u{30a}ndag.S01E01.mkv"));
        assert_eq!(stem, "M\u{e5}ndag.S01E01");
    }

    #[test]
    fn test_resolve_input_path_valid() {
        let dir = tempdir().unwrap();
        assert!(resolve_input_path(Some(dir.path())).is_ok());
    }

    #[test]
    fn test_resolve_input_path_nonexistent() {
        assert!(resolve_input_path(Some(Path::new("nonexistent"))).is_err());
    }

    #[test]
    fn test_resolve_input_path_default() {
        let resolved = resolve_input_path(None).unwrap();
        assert_eq!(resolved, dunce::canonicalize(env::current_dir().unwrap()).unwrap());
    }

    #[test]
    fn test_resolve_output_path_with_file() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();

        let input_file = input_dir.path().join("show.101.mkv");
        File::create(&input_file).unwrap();

        let output_path = resolve_output_path(Some(output_dir.path()), &input_file).unwrap();
        assert_eq!(output_path, dunce::simplified(output_dir.path()));
    }

    #[test]
    fn test_resolve_output_path_defaults_to_parent_of_file() {
        let dir = tempdir().unwrap();
        let input_file = dir.path().join("show.101.mkv");
        File::create(&input_file).unwrap();

        let output_path = resolve_output_path(None, &input_file).unwrap();
        assert_eq!(output_path, dir.path());
    }

    #[test]
    fn test_resolve_output_path_default() {
        let dir = tempdir().unwrap();
        let output_path = resolve_output_path(None, dir.path()).unwrap();
        assert_eq!(output_path, dir.path());
    }

    #[test]
    fn test_resolve_output_path_relative() {
        let output_path = resolve_output_path(Some(Path::new("sorted")), Path::new("/tmp")).unwrap();
        assert!(output_path.is_absolute());
        assert!(output_path.ends_with("sorted"));
    }

    #[test]
    fn test_append_extension_to_path() {
        let path = append_extension_to_path(PathBuf::from("dir/Show.S1E01.mkv"), "tmp");
        assert_eq!(path, PathBuf::from("dir/Show.S1E01.mkv.tmp"));
    }
}
