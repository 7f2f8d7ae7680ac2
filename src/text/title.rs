//! Language-aware title capitalization.

/// The one language whose titles use sentence case.
pub const SENTENCE_CASE_LANGUAGE: &str = "spanish";

/// Capitalize a title according to the rules of `language`.
///
/// Spanish (matched case-insensitively) uses sentence case: the first word
/// is capitalized and every other word is lower-cased. Proper nouns after
/// the first word are lower-cased too; this is a known limitation.
///
/// Every other language gets title case: each whitespace-delimited word has
/// its first letter upper-cased and the rest lower-cased. Words are rejoined
/// with single spaces in both modes.
///
/// # Examples
///
/// ```
/// use bookgen::text::format_title;
///
/// assert_eq!(format_title("the art of memory", "spanish"), "The art of memory");
/// assert_eq!(format_title("the art of memory", "english"), "The Art Of Memory");
/// ```
pub fn format_title(title: &str, language: &str) -> String {
    if language.eq_ignore_ascii_case(SENTENCE_CASE_LANGUAGE) {
        title
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                if i == 0 {
                    capitalize(word)
                } else {
                    word.to_lowercase()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        title
            .split_whitespace()
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Upper-case the first character and lower-case the remainder.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
