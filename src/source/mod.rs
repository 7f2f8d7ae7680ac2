//! The boundary to the text generator.
//!
//! A [`ChapterSource`] turns one planned [`Section`] into prose. It may be
//! slow and it may fail; the generation run treats every failure as local to
//! the section (see [`crate::generate`]).

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{CompletionClient, CompletionConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};

use thiserror::Error;

use crate::plan::{Section, SectionKind};

/// Why a chapter source produced no usable text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("authentication rejected (HTTP {0})")]
    Authentication(u16),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("provider returned no text")]
    Empty,
}

/// Produces the prose for one section.
pub trait ChapterSource {
    fn generate(
        &self,
        section: &Section,
        topic: &str,
        audience: &str,
    ) -> Result<String, GenerationError>;
}

impl<F> ChapterSource for F
where
    F: Fn(&Section, &str, &str) -> Result<String, GenerationError>,
{
    fn generate(
        &self,
        section: &Section,
        topic: &str,
        audience: &str,
    ) -> Result<String, GenerationError> {
        self(section, topic, audience)
    }
}

/// System and user messages for one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Build the prompt that asks for `section` of a book on `topic`.
    pub fn for_section(section: &Section, topic: &str, audience: &str) -> Self {
        let language = section.language.name();
        let words = section.target_words;

        let mut user = match section.kind {
            SectionKind::Introduction => format!(
                "Write the introduction of a book about {topic} aimed at {audience} with {words} words in {language}."
            ),
            SectionKind::Conclusion => format!(
                "Write the conclusions of a book about {topic} aimed at {audience} with {words} words in {language}."
            ),
            SectionKind::Chapter => format!(
                "Write chapter {} of a book about {topic} aimed at {audience} with {words} words in {language}.",
                section.ordinal
            ),
        };

        if let Some(count) = section.subsections {
            user.push_str(&format!(
                " Organize the chapter into {count} sections separated by blank lines, without section titles."
            ));
        }
        if let Some(ref instructions) = section.extra_instructions {
            user.push_str(&format!(" Additional instructions: {instructions}"));
        }

        Self {
            system: format!("You are a helpful assistant that writes in {language}."),
            user,
        }
    }
}
