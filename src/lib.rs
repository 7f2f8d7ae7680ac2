//! # bookgen
//!
//! Generate non-fiction books with a language model and assemble the result
//! as DOCX, EPUB, and HTML.
//!
//! ## Features
//!
//! - Plan a book as introduction, numbered chapters, and conclusion
//! - Resolve each section through any [`ChapterSource`] (an HTTP
//!   chat-completions client ships behind the `http` feature)
//! - Sanitize model output and format titles per language
//! - Assemble paginated documents, e-book packages, and flat HTML from the
//!   same ordered sections
//!
//! ## Quick Start
//!
//! ```
//! use bookgen::{BookMetadata, BookRequest, Format, GenerationError, PlanOptions, Section};
//! use bookgen::export::ExportOptions;
//!
//! let request = BookRequest::new("memory palaces", "students")?;
//! let sections = bookgen::plan(&PlanOptions::new(3))?;
//!
//! let source = |section: &Section, topic: &str, _: &str| -> Result<String, GenerationError> {
//!     Ok(format!("Some prose about {topic} for the {section}."))
//! };
//! let book = bookgen::generate_book(&source, &request, sections, &mut ())?;
//!
//! let meta = BookMetadata::new("the art of memory").with_author("Ada Writer");
//! for (format, document) in bookgen::assemble_all(&Format::ALL, &book.texts, &meta, &ExportOptions::default()) {
//!     let document = document?;
//!     assert_eq!(document.format(), format);
//! }
//! # Ok::<(), bookgen::Error>(())
//! ```

pub mod book;
pub mod error;
pub mod export;
pub mod generate;
pub mod language;
pub mod plan;
pub mod source;
pub mod text;

pub use book::{BookMetadata, TocEntry};
pub use error::{Error, Result};
pub use export::{Assembler, Document, Format, assemble, assemble_all};
pub use generate::{GeneratedBook, GeneratedText, PLACEHOLDER, generate_book};
pub use language::Language;
pub use plan::{BookRequest, PlanOptions, Section, SectionKind, plan};
pub use source::{ChapterSource, GenerationError};
pub use text::{format_title, sanitize};
