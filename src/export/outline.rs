//! The heading structure shared by all assemblers.
//!
//! Every assembler renders headings and its table of contents from the same
//! [`Outline`], so the two can never disagree.

use crate::book::TocEntry;
use crate::error::{Error, Result};
use crate::generate::GeneratedText;
use crate::language::Language;
use crate::plan::{Section, SectionKind};
use crate::text::{format_title, split_paragraphs};

/// Localized, title-formatted heading for a section.
///
/// # Examples
///
/// ```
/// use bookgen::Language;
/// use bookgen::export::section_heading;
/// use bookgen::plan::{PlanOptions, plan};
///
/// let sections = plan(&PlanOptions::new(1)).unwrap();
/// assert_eq!(section_heading(&sections[1], Language::English), "Chapter 1");
/// assert_eq!(section_heading(&sections[0], Language::Spanish), "Introducción");
/// ```
pub fn section_heading(section: &Section, language: Language) -> String {
    let labels = language.labels();
    let label = match section.kind {
        SectionKind::Introduction => labels.introduction.to_string(),
        SectionKind::Chapter => labels.chapter(section.ordinal),
        SectionKind::Conclusion => labels.conclusion.to_string(),
    };
    format_title(&label, language.name())
}

/// Fragment identifier of a section's heading.
///
/// Chapters use their own number, so "Chapter 2" is always `chapter-2`
/// whether or not an introduction precedes it.
pub fn section_anchor(section: &Section) -> String {
    match section.kind {
        SectionKind::Introduction => "introduction".to_string(),
        SectionKind::Chapter => format!("chapter-{}", section.ordinal),
        SectionKind::Conclusion => "conclusion".to_string(),
    }
}

/// A numbered block of a subdivided chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub heading: String,
    pub anchor: String,
    pub body: String,
}

/// One section as it appears in an assembled document.
#[derive(Debug, Clone)]
pub struct OutlineEntry<'a> {
    pub heading: String,
    pub anchor: String,
    pub text: &'a GeneratedText,
    /// Empty unless chapters are subdivided.
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone)]
pub struct Outline<'a> {
    pub entries: Vec<OutlineEntry<'a>>,
}

impl<'a> Outline<'a> {
    /// Build the outline for `texts` in the given order.
    ///
    /// With `subdivide`, every chapter body is split on blank lines and each
    /// block becomes a numbered sub-section. Introduction and conclusion are
    /// never subdivided. Fails with [`Error::Assembly`] for an empty list.
    pub fn new(texts: &'a [GeneratedText], language: Language, subdivide: bool) -> Result<Self> {
        if texts.is_empty() {
            return Err(Error::Assembly("book has no sections".into()));
        }

        let labels = language.labels();
        let entries = texts
            .iter()
            .map(|text| {
                let anchor = section_anchor(&text.section);
                let subsections = if subdivide && text.section.is_chapter() {
                    split_paragraphs(&text.body)
                        .into_iter()
                        .enumerate()
                        .map(|(k, body)| Subsection {
                            heading: format_title(&labels.section(k + 1), language.name()),
                            anchor: format!("{anchor}-section-{}", k + 1),
                            body,
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                OutlineEntry {
                    heading: section_heading(&text.section, language),
                    anchor,
                    text,
                    subsections,
                }
            })
            .collect();

        Ok(Self { entries })
    }

    /// Table of contents: one entry per section, sub-sections as children.
    pub fn toc(&self) -> Vec<TocEntry> {
        self.entries
            .iter()
            .map(|entry| TocEntry {
                title: entry.heading.clone(),
                anchor: entry.anchor.clone(),
                children: entry
                    .subsections
                    .iter()
                    .map(|sub| TocEntry::new(sub.heading.clone(), sub.anchor.clone()))
                    .collect(),
            })
            .collect()
    }
}
