//! EPUB assembler.
//!
//! Creates an EPUB 3 package with an EPUB 2 NCX for older readers. Each
//! section becomes its own XHTML page with the body kept as a single block.

use std::io::{Seek, Write};

use zip::ZipWriter;

use crate::book::{BookMetadata, TocEntry};
use crate::error::Result;
use crate::generate::GeneratedText;
use crate::language::Language;
use crate::text::split_paragraphs;

use super::outline::Outline;
use super::{Assembler, Format, escape_xml, zip_options};

/// Configuration for EPUB assembly.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// Package identifier (`dc:identifier`).
    pub identifier: String,
    /// Creator used when the book has no author name.
    pub default_author: String,
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
    /// `dcterms:modified` timestamp. Fixed so output is reproducible.
    pub modified: String,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            identifier: "urn:uuid:6f1d7c52-8d0e-4d3a-9a67-b00c9e4e1a2f".to_string(),
            default_author: "bookgen".to_string(),
            compression_level: None,
            modified: "2024-01-01T00:00:00Z".to_string(),
        }
    }
}

/// E-book package assembler.
///
/// # Example
///
/// ```no_run
/// use bookgen::{BookMetadata, GeneratedText};
/// use bookgen::export::{Assembler, EpubAssembler};
/// use std::fs::File;
///
/// # let texts: Vec<GeneratedText> = Vec::new();
/// let mut file = File::create("memory.epub")?;
/// EpubAssembler::new().write(&texts, &BookMetadata::new("Memory"), &mut file)?;
/// # Ok::<(), bookgen::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpubAssembler {
    config: EpubConfig,
}

impl EpubAssembler {
    /// Create a new assembler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the assembler with custom settings.
    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }
}

/// One XHTML page of the package.
struct Page {
    id: String,
    href: String,
    title: String,
    content: String,
}

impl Assembler for EpubAssembler {
    fn format(&self) -> Format {
        Format::Epub
    }

    fn write<W: Write + Seek>(
        &self,
        texts: &[GeneratedText],
        meta: &BookMetadata,
        writer: &mut W,
    ) -> Result<()> {
        let outline = Outline::new(texts, meta.language, false)?;
        let labels = meta.language.labels();

        let mut pages: Vec<Page> = outline
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut body = String::new();
                body.push_str(&format!(
                    "  <h1 id=\"{}\">{}</h1>\n  <p>{}</p>\n",
                    entry.anchor,
                    escape_xml(&entry.heading),
                    escape_xml(&entry.text.body)
                ));
                Page {
                    id: format!("chapter_{}", i + 1),
                    href: format!("chapter_{}.xhtml", i + 1),
                    content: xhtml_page(&entry.heading, meta.language, &body),
                    title: entry.heading.clone(),
                }
            })
            .collect();

        if let Some(ref bio) = meta.author_bio {
            let mut body = String::new();
            body.push_str(&format!(
                "  <h1 id=\"author\">{}</h1>\n",
                escape_xml(labels.author_info)
            ));
            for paragraph in split_paragraphs(bio) {
                body.push_str(&format!("  <p>{}</p>\n", escape_xml(&paragraph)));
            }
            pages.push(Page {
                id: "author".to_string(),
                href: "author.xhtml".to_string(),
                content: xhtml_page(labels.author_info, meta.language, &body),
                title: labels.author_info.to_string(),
            });
        }

        let toc: Vec<TocEntry> = pages
            .iter()
            .map(|page| TocEntry::new(page.title.clone(), page.href.clone()))
            .collect();

        let (stored, deflated) = zip_options(self.config.compression_level);
        let mut zip = ZipWriter::new(writer);

        // mimetype must be first and uncompressed
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML)?;

        let author = meta
            .author_name
            .as_deref()
            .unwrap_or(&self.config.default_author);
        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(generate_opf(meta, author, &self.config, &pages).as_bytes())?;

        zip.start_file("OEBPS/toc.ncx", deflated)?;
        zip.write_all(generate_ncx(meta, &self.config.identifier, &toc).as_bytes())?;

        zip.start_file("OEBPS/nav.xhtml", deflated)?;
        zip.write_all(generate_nav(meta, &toc).as_bytes())?;

        zip.start_file("OEBPS/style.css", deflated)?;
        zip.write_all(STYLE_CSS)?;

        for page in &pages {
            zip.start_file(format!("OEBPS/{}", page.href), deflated)?;
            zip.write_all(page.content.as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// Container.xml template.
const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

const STYLE_CSS: &[u8] = br#"body { font-family: serif; line-height: 1.5; margin: 0 5%; }
h1 { text-align: center; margin: 2em 0 1em; }
p { text-align: justify; white-space: pre-line; }
nav ol { list-style: none; padding: 0; }
"#;

fn xhtml_page(title: &str, language: Language, body: &str) -> String {
    let dir = if language.is_rtl() { " dir=\"rtl\"" } else { "" };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE html>\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\" lang=\"{tag}\" xml:lang=\"{tag}\"{dir}>\n\
         <head>\n  <title>{title}</title>\n  <link rel=\"stylesheet\" type=\"text/css\" href=\"style.css\"/>\n</head>\n\
         <body>\n{body}</body>\n</html>\n",
        tag = language.tag(),
        title = escape_xml(title),
    )
}

/// Generate content.opf.
///
/// The nav document is always in the manifest; it joins the spine as a
/// visible contents page only when the book asks for a table of contents.
fn generate_opf(meta: &BookMetadata, author: &str, config: &EpubConfig, pages: &[Page]) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );
    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_xml(&config.identifier)
    ));
    opf.push_str(&format!("    <dc:title>{}</dc:title>\n", escape_xml(&meta.title)));
    opf.push_str(&format!("    <dc:creator>{}</dc:creator>\n", escape_xml(author)));
    opf.push_str(&format!("    <dc:language>{}</dc:language>\n", meta.language.tag()));
    opf.push_str(&format!(
        "    <meta property=\"dcterms:modified\">{}</meta>\n",
        escape_xml(&config.modified)
    ));
    opf.push_str("  </metadata>\n");

    opf.push_str("  <manifest>\n");
    opf.push_str(
        "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
    );
    opf.push_str(
        "    <item id=\"nav\" href=\"nav.xhtml\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n",
    );
    opf.push_str("    <item id=\"style\" href=\"style.css\" media-type=\"text/css\"/>\n");
    for page in pages {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
            page.id, page.href
        ));
    }
    opf.push_str("  </manifest>\n");

    let direction = if meta.language.is_rtl() {
        " page-progression-direction=\"rtl\""
    } else {
        ""
    };
    opf.push_str(&format!("  <spine toc=\"ncx\"{direction}>\n"));
    if meta.include_toc {
        opf.push_str("    <itemref idref=\"nav\"/>\n");
    }
    for page in pages {
        opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", page.id));
    }
    opf.push_str("  </spine>\n");

    opf.push_str("</package>\n");
    opf
}

/// Generate toc.ncx. Entry anchors hold page hrefs.
fn generate_ncx(meta: &BookMetadata, identifier: &str, toc: &[TocEntry]) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
"#,
    );
    ncx.push_str(&format!("    <meta name=\"dtb:uid\" content=\"{}\"/>\n", escape_xml(identifier)));
    ncx.push_str(
        r#"    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
"#,
    );
    ncx.push_str(&format!(
        "  <docTitle>\n    <text>{}</text>\n  </docTitle>\n",
        escape_xml(&meta.title)
    ));
    ncx.push_str("  <navMap>\n");

    let mut play_order = 1;
    write_nav_points(&mut ncx, toc, &mut play_order, 2);

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

/// Recursively write navPoint elements.
fn write_nav_points(ncx: &mut String, entries: &[TocEntry], play_order: &mut usize, indent: usize) {
    let indent_str = "  ".repeat(indent);

    for entry in entries {
        ncx.push_str(&format!(
            "{indent_str}<navPoint id=\"navPoint-{play_order}\" playOrder=\"{play_order}\">\n"
        ));
        ncx.push_str(&format!(
            "{indent_str}  <navLabel><text>{}</text></navLabel>\n",
            escape_xml(&entry.title)
        ));
        ncx.push_str(&format!(
            "{indent_str}  <content src=\"{}\"/>\n",
            escape_xml(&entry.anchor)
        ));

        *play_order += 1;

        if !entry.children.is_empty() {
            write_nav_points(ncx, &entry.children, play_order, indent + 1);
        }

        ncx.push_str(&format!("{indent_str}</navPoint>\n"));
    }
}

/// Generate the EPUB 3 navigation document.
fn generate_nav(meta: &BookMetadata, toc: &[TocEntry]) -> String {
    let contents = meta.language.labels().contents;
    let mut body = String::new();
    body.push_str("  <nav epub:type=\"toc\" id=\"toc\">\n");
    body.push_str(&format!("    <h1>{}</h1>\n", escape_xml(contents)));
    body.push_str("    <ol>\n");
    for entry in toc {
        body.push_str(&format!(
            "      <li><a href=\"{}\">{}</a></li>\n",
            escape_xml(&entry.anchor),
            escape_xml(&entry.title)
        ));
    }
    body.push_str("    </ol>\n  </nav>\n");
    xhtml_page(contents, meta.language, &body)
}
