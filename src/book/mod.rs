use crate::language::Language;

/// Presentation metadata shared by every assembler of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: String,
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
    pub language: Language,
    pub include_toc: bool,
}

/// A table of contents entry (hierarchical)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    /// Fragment identifier of the heading, without `#`.
    pub anchor: String,
    pub children: Vec<TocEntry>,
}

impl BookMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            include_toc: true,
            ..Default::default()
        }
    }

    /// Set the author name; blank names are ignored.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author_name = non_blank(author.into());
        self
    }

    /// Set the author biography; blank text is ignored.
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.author_bio = non_blank(bio.into());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = include;
        self
    }
}

impl TocEntry {
    pub fn new(title: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            anchor: anchor.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: TocEntry) -> Self {
        self.children.push(child);
        self
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
