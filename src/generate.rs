//! A generation run: resolve every planned section through a chapter source.
//!
//! Sections are resolved one at a time in planner order. A failed section,
//! or one whose reply has no words left after sanitizing, is replaced by
//! [`PLACEHOLDER`] and reported; it never aborts the run.
//! The result is an explicit [`GeneratedBook`] value that callers hand to
//! whichever assemblers they need.

use std::fmt;
use std::ops::ControlFlow;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::plan::{BookRequest, Section};
use crate::source::{ChapterSource, GenerationError};
use crate::text::{sanitize, split_paragraphs, word_count};

/// Body substituted for a section whose generation failed.
pub const PLACEHOLDER: &str = "[This section could not be generated.]";

/// The sanitized prose of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    pub section: Section,
    pub body: String,
    /// Words in the sanitized body.
    pub word_count: usize,
    /// True when `body` is the failure placeholder.
    pub placeholder: bool,
}

impl GeneratedText {
    /// Sanitize raw model output for `section`.
    pub fn new(section: Section, raw: &str) -> Self {
        let body = sanitize(raw);
        Self {
            word_count: word_count(&body),
            section,
            body,
            placeholder: false,
        }
    }

    /// Placeholder text for a section that could not be generated.
    pub fn placeholder(section: Section) -> Self {
        Self {
            placeholder: true,
            ..Self::new(section, PLACEHOLDER)
        }
    }
}

/// Non-fatal observations about a generated section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// The body's word count is outside the requested range.
    WordCount {
        words: usize,
        min: u32,
        max: u32,
    },
    /// The body split into a different number of blocks than requested.
    SubsectionCount { expected: usize, actual: usize },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::WordCount { words, min, max } => {
                write!(f, "{words} words, expected {min}-{max}")
            }
            Advisory::SubsectionCount { expected, actual } => {
                write!(f, "{actual} sub-sections, expected {expected}")
            }
        }
    }
}

/// Outcome of one section in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub section: Section,
    pub error: Option<GenerationError>,
    pub advisories: Vec<Advisory>,
}

/// Everything a finished run produced, in planner order.
#[derive(Debug, Clone, Default)]
pub struct GeneratedBook {
    pub texts: Vec<GeneratedText>,
    pub reports: Vec<SectionReport>,
}

impl GeneratedBook {
    /// Reports of sections that fell back to the placeholder.
    pub fn failures(&self) -> impl Iterator<Item = &SectionReport> {
        self.reports.iter().filter(|r| r.error.is_some())
    }

    pub fn total_words(&self) -> usize {
        self.texts.iter().map(|t| t.word_count).sum()
    }
}

/// Progress notifications emitted during a run.
#[derive(Debug)]
pub enum Progress<'a> {
    Started {
        index: usize,
        total: usize,
        section: &'a Section,
    },
    Finished {
        index: usize,
        total: usize,
        text: &'a GeneratedText,
        report: &'a SectionReport,
    },
}

/// Receives progress and may cancel the run by returning `Break`.
pub trait Observer {
    fn on_progress(&mut self, progress: Progress<'_>) -> ControlFlow<()>;
}

/// Observer that ignores progress and never cancels.
impl Observer for () {
    fn on_progress(&mut self, _: Progress<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<F> Observer for F
where
    F: FnMut(Progress<'_>) -> ControlFlow<()>,
{
    fn on_progress(&mut self, progress: Progress<'_>) -> ControlFlow<()> {
        self(progress)
    }
}

/// Resolve `sections` through `source`, strictly in order.
///
/// Returns [`Error::Validation`] for an empty section list and
/// [`Error::Cancelled`] if the observer stops the run; in that case the
/// partial results are dropped.
pub fn generate_book<S, O>(
    source: &S,
    request: &BookRequest,
    sections: Vec<Section>,
    observer: &mut O,
) -> Result<GeneratedBook>
where
    S: ChapterSource + ?Sized,
    O: Observer + ?Sized,
{
    if sections.is_empty() {
        return Err(Error::Validation("no sections to generate".into()));
    }

    let total = sections.len();
    let mut book = GeneratedBook {
        texts: Vec::with_capacity(total),
        reports: Vec::with_capacity(total),
    };

    for (index, section) in sections.into_iter().enumerate() {
        if observer
            .on_progress(Progress::Started {
                index,
                total,
                section: &section,
            })
            .is_break()
        {
            info!(%section, "generation cancelled");
            return Err(Error::Cancelled);
        }

        info!(%section, index = index + 1, total, "generating section");
        let (text, report) = resolve_section(source, request, section);

        if observer
            .on_progress(Progress::Finished {
                index,
                total,
                text: &text,
                report: &report,
            })
            .is_break()
        {
            info!(section = %report.section, "generation cancelled");
            return Err(Error::Cancelled);
        }

        book.texts.push(text);
        book.reports.push(report);
    }

    Ok(book)
}

fn resolve_section<S>(
    source: &S,
    request: &BookRequest,
    section: Section,
) -> (GeneratedText, SectionReport)
where
    S: ChapterSource + ?Sized,
{
    let result = source
        .generate(&section, &request.topic, &request.audience)
        .map(|raw| GeneratedText::new(section.clone(), &raw))
        .and_then(|text| {
            if text.word_count == 0 {
                Err(GenerationError::Empty)
            } else {
                Ok(text)
            }
        });

    match result {
        Ok(text) => {
            let advisories = advisories_for(&text);
            for advisory in &advisories {
                warn!(%section, %advisory, "section outside requested shape");
            }
            info!(%section, words = text.word_count, "section generated");
            let report = SectionReport {
                section,
                error: None,
                advisories,
            };
            (text, report)
        }
        Err(error) => {
            warn!(%section, %error, "generation failed, using placeholder");
            let report = SectionReport {
                section: section.clone(),
                error: Some(error),
                advisories: Vec::new(),
            };
            (GeneratedText::placeholder(section), report)
        }
    }
}

fn advisories_for(text: &GeneratedText) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    let target = text.section.target_words;
    if !target.contains(text.word_count) {
        advisories.push(Advisory::WordCount {
            words: text.word_count,
            min: target.min,
            max: target.max,
        });
    }
    if let Some(expected) = text.section.subsections {
        let actual = split_paragraphs(&text.body).len();
        if actual != expected {
            advisories.push(Advisory::SubsectionCount { expected, actual });
        }
    }
    advisories
}
