//! Content planning: which sections a book has and how each is generated.
//!
//! [`plan`] is a pure function from [`PlanOptions`] to the ordered list of
//! [`Section`]s: introduction (optional), chapters `1..=N`, conclusion
//! (optional). The chapter source later consumes each section exactly once.

use std::fmt;

use crate::error::{Error, Result};
use crate::language::Language;

/// Largest chapter count a book may request.
pub const MAX_CHAPTERS: u32 = 20;

/// What role a section plays in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Introduction,
    Chapter,
    Conclusion,
}

/// Inclusive word-count target for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordRange {
    pub min: u32,
    pub max: u32,
}

impl WordRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, words: usize) -> bool {
        (self.min as usize..=self.max as usize).contains(&words)
    }
}

impl fmt::Display for WordRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// How word targets are assigned to sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordTargets {
    /// Every section, chapters and bookends alike, shares one range.
    Flat(WordRange),
    /// Chapters get one range; introduction and conclusion get another.
    Split { chapter: WordRange, bookend: WordRange },
}

impl Default for WordTargets {
    fn default() -> Self {
        WordTargets::Split {
            chapter: WordRange::new(2000, 2500),
            bookend: WordRange::new(500, 800),
        }
    }
}

impl WordTargets {
    fn ranges(&self) -> Vec<WordRange> {
        match *self {
            WordTargets::Flat(range) => vec![range],
            WordTargets::Split { chapter, bookend } => vec![chapter, bookend],
        }
    }

    fn for_kind(&self, kind: SectionKind) -> WordRange {
        match (*self, kind) {
            (WordTargets::Flat(range), _) => range,
            (WordTargets::Split { chapter, .. }, SectionKind::Chapter) => chapter,
            (WordTargets::Split { bookend, .. }, _) => bookend,
        }
    }
}

/// One logical unit of the book, with its generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    /// 1-based chapter number; 0 for introduction and conclusion.
    pub ordinal: u32,
    pub target_words: WordRange,
    pub language: Language,
    pub extra_instructions: Option<String>,
    /// Number of blank-line separated sub-sections requested from the model.
    pub subsections: Option<usize>,
}

impl Section {
    pub fn is_chapter(&self) -> bool {
        self.kind == SectionKind::Chapter
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SectionKind::Introduction => f.write_str("introduction"),
            SectionKind::Chapter => write!(f, "chapter {}", self.ordinal),
            SectionKind::Conclusion => f.write_str("conclusion"),
        }
    }
}

/// User choices that shape the section list.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub chapter_count: u32,
    pub include_intro: bool,
    pub include_conclusion: bool,
    pub language: Language,
    pub instructions: Option<String>,
    pub word_targets: WordTargets,
    /// Ask for each chapter to be organised into this many sub-sections.
    pub subsections_per_chapter: Option<usize>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            chapter_count: 5,
            include_intro: true,
            include_conclusion: true,
            language: Language::default(),
            instructions: None,
            word_targets: WordTargets::default(),
            subsections_per_chapter: None,
        }
    }
}

impl PlanOptions {
    pub fn new(chapter_count: u32) -> Self {
        Self {
            chapter_count,
            ..Default::default()
        }
    }

    pub fn with_intro(mut self, include: bool) -> Self {
        self.include_intro = include;
        self
    }

    pub fn with_conclusion(mut self, include: bool) -> Self {
        self.include_conclusion = include;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_word_targets(mut self, targets: WordTargets) -> Self {
        self.word_targets = targets;
        self
    }

    pub fn with_subsections(mut self, count: usize) -> Self {
        self.subsections_per_chapter = Some(count);
        self
    }
}

/// Topic and audience of the book to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRequest {
    pub topic: String,
    pub audience: String,
}

impl BookRequest {
    /// Build a request, rejecting a blank topic or audience.
    pub fn new(topic: impl Into<String>, audience: impl Into<String>) -> Result<Self> {
        let topic = topic.into().trim().to_string();
        let audience = audience.into().trim().to_string();
        if topic.is_empty() {
            return Err(Error::Validation("topic must not be empty".into()));
        }
        if audience.is_empty() {
            return Err(Error::Validation("audience must not be empty".into()));
        }
        Ok(Self { topic, audience })
    }
}

/// Enumerate the sections of a book in reading order.
///
/// Fails with [`Error::Validation`] when the chapter count is outside
/// `1..=MAX_CHAPTERS`, a word range has `min > max`, or a sub-section count
/// of zero is requested.
pub fn plan(options: &PlanOptions) -> Result<Vec<Section>> {
    if !(1..=MAX_CHAPTERS).contains(&options.chapter_count) {
        return Err(Error::Validation(format!(
            "chapter count must be between 1 and {MAX_CHAPTERS}, got {}",
            options.chapter_count
        )));
    }
    if let Some(range) = options.word_targets.ranges().into_iter().find(|r| r.min > r.max) {
        return Err(Error::Validation(format!("word range {range} is inverted")));
    }
    if options.subsections_per_chapter == Some(0) {
        return Err(Error::Validation("sub-section count must be positive".into()));
    }

    let instructions = options
        .instructions
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let section = |kind: SectionKind, ordinal: u32| Section {
        kind,
        ordinal,
        target_words: options.word_targets.for_kind(kind),
        language: options.language,
        extra_instructions: instructions.clone(),
        subsections: if kind == SectionKind::Chapter {
            options.subsections_per_chapter
        } else {
            None
        },
    };

    let mut sections = Vec::with_capacity(options.chapter_count as usize + 2);
    if options.include_intro {
        sections.push(section(SectionKind::Introduction, 0));
    }
    for n in 1..=options.chapter_count {
        sections.push(section(SectionKind::Chapter, n));
    }
    if options.include_conclusion {
        sections.push(section(SectionKind::Conclusion, 0));
    }

    Ok(sections)
}
