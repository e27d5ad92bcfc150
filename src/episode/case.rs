use itertools::Itertools;

/// Join the space separated words of a cleaned name with the delimiter.
///
/// With `camel_case` every word gets an uppercase first letter,
/// otherwise spaces are only replaced with the delimiter.
#[must_use]
pub fn case_words(cleaned: &str, delimiter: &str, camel_case: bool) -> String {
    if camel_case {
        cleaned
            .split(' ')
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .join(delimiter)
    } else {
        cleaned.replace(' ', delimiter)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod case_tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(case_words("the show name", ".", true), "The.Show.Name");
        assert_eq!(case_words("the show", " ", true), "The Show");
        assert_eq!(case_words("s01e02 part 2", "_", true), "S01e02_Part_2");
    }

    #[test]
    fn test_camel_case_skips_empty_words() {
        assert_eq!(case_words("the  show ", ".", true), "The.Show");
    }

    #[test]
    fn test_camel_case_unicode() {
        assert_eq!(case_words("älskade öar", ".", true), "Älskade.Öar");
    }

    #[test]
    fn test_plain_replace() {
        assert_eq!(case_words("the show name", ".", false), "the.show.name");
        assert_eq!(case_words("the show", "-", false), "the-show");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(case_words("", ".", true), "");
        assert_eq!(case_words("", ".", false), "");
    }
}
