//! Plain-text utilities applied to generated prose.
//!
//! Model output frequently carries lightweight markup (headers, emphasis,
//! inline code) that must not leak into the assembled documents. Everything
//! here is pure and total.

mod title;

pub use title::{SENTENCE_CASE_LANGUAGE, format_title};

/// Markup characters stripped by [`sanitize`].
pub const MARKUP_CHARS: [char; 4] = ['#', '*', '_', '`'];

/// Remove markup punctuation and trim surrounding whitespace.
///
/// Every occurrence of `#`, `*`, `_` and `` ` `` is dropped; all other
/// characters are kept as-is. The function is idempotent.
///
/// # Examples
///
/// ```
/// use bookgen::text::sanitize;
///
/// assert_eq!(sanitize("## The *first* step\n"), "The first step");
/// assert_eq!(sanitize(&sanitize("__x__")), sanitize("__x__"));
/// ```
pub fn sanitize(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect();
    stripped.trim().to_string()
}

/// Count whitespace-delimited words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text into paragraph blocks on blank lines.
///
/// Consecutive non-blank lines form one block; the lines of a block are
/// trimmed and re-joined with `\n`. Blank-only input yields no blocks.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}
