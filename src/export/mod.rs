//! Document assemblers for the generated book.
//!
//! Provides the `Assembler` trait and one implementation per output format.
//!
//! # Architecture
//!
//! Assemblers use a builder pattern:
//! - `new()` creates an assembler with default configuration
//! - `with_config()` allows customization
//! - `write()` renders to any `Write + Seek` destination
//! - `assemble()` renders to an in-memory [`Document`]
//!
//! Assemblers never share state, so a failure in one format does not affect
//! another (see [`assemble_all`]).
//!
//! # Example
//!
//! ```
//! use bookgen::{BookMetadata, GeneratedText};
//! use bookgen::export::{Assembler, HtmlAssembler};
//! use bookgen::plan::{PlanOptions, plan};
//!
//! let texts: Vec<_> = plan(&PlanOptions::new(2))?
//!     .into_iter()
//!     .map(|section| GeneratedText::new(section, "Some prose."))
//!     .collect();
//! let meta = BookMetadata::new("the art of memory");
//!
//! let document = HtmlAssembler::new().assemble(&texts, &meta)?;
//! assert_eq!(document.media_type(), "text/html");
//! # Ok::<(), bookgen::Error>(())
//! ```

use std::fmt;
use std::fs;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::book::BookMetadata;
use crate::error::{Error, Result};
use crate::generate::GeneratedText;

mod docx;
mod epub;
mod html;
mod outline;

pub use docx::{Alignment, DocxAssembler, LayoutOptions, Margins};
pub use epub::{EpubAssembler, EpubConfig};
pub use html::{HtmlAssembler, HtmlConfig};
pub use outline::{Outline, OutlineEntry, Subsection, section_anchor, section_heading};

/// Output formats a book can be assembled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Docx,
    Epub,
    Html,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Docx, Format::Epub, Format::Html];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Docx => "docx",
            Format::Epub => "epub",
            Format::Html => "html",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Format::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Format::Epub => "application/epub+zip",
            Format::Html => "text/html",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" | "word" => Ok(Format::Docx),
            "epub" => Ok(Format::Epub),
            "html" | "htm" => Ok(Format::Html),
            other => Err(Error::Validation(format!("unknown output format: {other}"))),
        }
    }
}

/// An assembled output file held in memory.
///
/// Reading starts at the beginning of the buffer.
#[derive(Debug, Clone)]
pub struct Document {
    format: Format,
    filename: String,
    data: Cursor<Vec<u8>>,
}

impl Document {
    pub fn new(format: Format, title: &str, data: Vec<u8>) -> Self {
        Self {
            format,
            filename: format!("{}.{}", file_stem(title), format.extension()),
            data: Cursor::new(data),
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    /// Suggested file name, derived from the book title.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.get_ref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_inner()
    }

    /// Write the document into `dir` under its suggested file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        fs::write(&path, self.as_bytes())?;
        Ok(path)
    }
}

impl Read for Document {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl Seek for Document {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.data.seek(pos)
    }
}

/// Trait for rendering generated sections into one output format.
pub trait Assembler {
    fn format(&self) -> Format;

    /// Render `texts` to the provided writer, in the given order.
    ///
    /// The writer can be:
    /// - `std::fs::File` for disk output
    /// - `std::io::Cursor<Vec<u8>>` for seekable in-memory output
    /// - Any other type implementing `Write + Seek`
    fn write<W: Write + Seek>(
        &self,
        texts: &[GeneratedText],
        meta: &BookMetadata,
        writer: &mut W,
    ) -> Result<()>;

    /// Render into an in-memory [`Document`] positioned at its start.
    fn assemble(&self, texts: &[GeneratedText], meta: &BookMetadata) -> Result<Document> {
        let mut buffer = Cursor::new(Vec::new());
        self.write(texts, meta, &mut buffer)?;
        Ok(Document::new(self.format(), &meta.title, buffer.into_inner()))
    }
}

/// Configuration for every assembler, used by [`assemble`] and [`assemble_all`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub docx: LayoutOptions,
    pub epub: EpubConfig,
    pub html: HtmlConfig,
}

/// Assemble one format with its configured assembler.
pub fn assemble(
    format: Format,
    texts: &[GeneratedText],
    meta: &BookMetadata,
    options: &ExportOptions,
) -> Result<Document> {
    match format {
        Format::Docx => DocxAssembler::new()
            .with_config(options.docx.clone())
            .assemble(texts, meta),
        Format::Epub => EpubAssembler::new()
            .with_config(options.epub.clone())
            .assemble(texts, meta),
        Format::Html => HtmlAssembler::new()
            .with_config(options.html.clone())
            .assemble(texts, meta),
    }
}

/// Assemble every requested format independently.
///
/// Each format gets its own result; a failing assembler never prevents the
/// others from producing their documents.
pub fn assemble_all(
    formats: &[Format],
    texts: &[GeneratedText],
    meta: &BookMetadata,
    options: &ExportOptions,
) -> Vec<(Format, Result<Document>)> {
    formats
        .iter()
        .map(|&format| {
            let result = assemble(format, texts, meta, options);
            match &result {
                Ok(doc) => info!(%format, bytes = doc.as_bytes().len(), file = doc.filename(), "document assembled"),
                Err(error) => warn!(%format, %error, "assembly failed"),
            }
            (format, result)
        })
        .collect()
}

/// File name stem for a book title, safe on common file systems.
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();
    let stem = stem.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if stem.is_empty() {
        "book".to_string()
    } else {
        stem.to_string()
    }
}

/// Escape text for XML and XHTML content and attribute values.
///
/// Characters XML 1.0 does not allow are removed; vertical tab and form feed
/// become spaces.
pub(crate) fn escape_xml(s: &str) -> String {
    if !s.chars().any(is_restricted_xml_char) {
        return quick_xml::escape::escape(s).into_owned();
    }
    let cleaned: String = s
        .chars()
        .filter_map(|c| match c {
            '\u{B}' | '\u{C}' => Some(' '),
            c if is_restricted_xml_char(c) => None,
            c => Some(c),
        })
        .collect();
    quick_xml::escape::escape(&cleaned).into_owned()
}

fn is_restricted_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

/// ZIP entry options: stored (for `mimetype`) and deflated.
pub(crate) fn zip_options(compression_level: Option<u32>) -> (SimpleFileOptions, SimpleFileOptions) {
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(compression_level.unwrap_or(6) as i64));
    (stored, deflated)
}
