//! DOCX (WordprocessingML) assembler.
//!
//! Produces a paginated word-processor document: title page, optional author
//! information, optional table of contents, then one page-broken block per
//! section. Every page footer carries a `PAGE` field.

use std::io::{Seek, Write};

use tracing::debug;
use zip::ZipWriter;

use crate::book::BookMetadata;
use crate::error::Result;
use crate::generate::GeneratedText;
use crate::text::{format_title, split_paragraphs};

use super::outline::Outline;
use super::{Assembler, Format, escape_xml, zip_options};

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    fn as_ooxml(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn uniform(inches: f32) -> Self {
        Self {
            top: inches,
            right: inches,
            bottom: inches,
            left: inches,
        }
    }
}

/// Page and typography settings for DOCX output.
///
/// Lengths are in inches, font sizes in points.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margins: Margins,
    pub font_family: String,
    pub body_size: f32,
    pub title_size: f32,
    pub author_size: f32,
    pub heading_size: f32,
    pub subheading_size: f32,
    pub alignment: Alignment,
    /// Space after each body paragraph, in points.
    pub paragraph_spacing: f32,
    /// Line spacing as a multiple of single spacing.
    pub line_spacing: f32,
    /// Split chapter bodies on blank lines into titled "Section N" blocks.
    pub subdivide_chapters: bool,
    /// Pre-rendered table of contents, used instead of generated lines.
    pub toc_text: Option<String>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: 5.5,
            page_height: 8.5,
            margins: Margins::uniform(0.8),
            font_family: "Times New Roman".to_string(),
            body_size: 11.0,
            title_size: 14.0,
            author_size: 12.0,
            heading_size: 12.0,
            subheading_size: 11.0,
            alignment: Alignment::Justify,
            paragraph_spacing: 6.0,
            line_spacing: 1.0,
            subdivide_chapters: false,
            toc_text: None,
        }
    }
}

/// Paginated-document assembler.
///
/// # Example
///
/// ```
/// use bookgen::{BookMetadata, GeneratedText};
/// use bookgen::export::{Assembler, DocxAssembler, LayoutOptions};
/// use bookgen::plan::{PlanOptions, plan};
///
/// let texts: Vec<_> = plan(&PlanOptions::new(1))?
///     .into_iter()
///     .map(|section| GeneratedText::new(section, "First.\n\nSecond."))
///     .collect();
/// let layout = LayoutOptions { subdivide_chapters: true, ..Default::default() };
/// let doc = DocxAssembler::new()
///     .with_config(layout)
///     .assemble(&texts, &BookMetadata::new("Memory"))?;
/// assert_eq!(doc.filename(), "Memory.docx");
/// # Ok::<(), bookgen::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocxAssembler {
    layout: LayoutOptions,
}

impl DocxAssembler {
    /// Create a new assembler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the assembler with custom settings.
    pub fn with_config(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }
}

impl Assembler for DocxAssembler {
    fn format(&self) -> Format {
        Format::Docx
    }

    fn write<W: Write + Seek>(
        &self,
        texts: &[GeneratedText],
        meta: &BookMetadata,
        writer: &mut W,
    ) -> Result<()> {
        let outline = Outline::new(texts, meta.language, self.layout.subdivide_chapters)?;
        let document = render_document(&outline, meta, &self.layout);
        debug!(sections = outline.entries.len(), bytes = document.len(), "rendered document.xml");

        let (_, deflated) = zip_options(None);
        let mut zip = ZipWriter::new(writer);

        let parts: [(&str, String); 8] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", PACKAGE_RELS_XML.to_string()),
            ("docProps/core.xml", core_properties(meta)),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
            ("word/document.xml", document),
            ("word/styles.xml", styles(&self.layout)),
            ("word/settings.xml", SETTINGS_XML.to_string()),
            ("word/footer1.xml", FOOTER_XML.to_string()),
        ];
        for (name, content) in parts {
            zip.start_file(name, deflated)?;
            zip.write_all(content.as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }
}

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>
  <Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>
"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>
"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
</Relationships>
"#;

const SETTINGS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:defaultTabStop w:val="720"/>
  <w:characterSpacingControl w:val="doNotCompress"/>
</w:settings>
"#;

/// Centered footer with a running page number.
const FOOTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:p>
    <w:pPr><w:jc w:val="center"/></w:pPr>
    <w:r><w:fldChar w:fldCharType="begin"/></w:r>
    <w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r>
    <w:r><w:fldChar w:fldCharType="separate"/></w:r>
    <w:r><w:t>1</w:t></w:r>
    <w:r><w:fldChar w:fldCharType="end"/></w:r>
  </w:p>
</w:ftr>
"#;

fn core_properties(meta: &BookMetadata) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );
    xml.push_str(&format!("  <dc:title>{}</dc:title>\n", escape_xml(&meta.title)));
    if let Some(ref author) = meta.author_name {
        xml.push_str(&format!("  <dc:creator>{}</dc:creator>\n", escape_xml(author)));
    }
    xml.push_str(&format!("  <dc:language>{}</dc:language>\n", meta.language.tag()));
    xml.push_str("</cp:coreProperties>\n");
    xml
}

fn styles(layout: &LayoutOptions) -> String {
    let font = escape_xml(&layout.font_family);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/><w:sz w:val="{body}"/><w:szCs w:val="{body}"/></w:rPr></w:rPrDefault>
    <w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="{line}" w:lineRule="auto"/></w:pPr></w:pPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="{heading}"/><w:szCs w:val="{heading}"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="{subheading}"/><w:szCs w:val="{subheading}"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="TOCHeading"><w:name w:val="TOC Heading"/><w:basedOn w:val="Heading1"/><w:next w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="TOC1"><w:name w:val="toc 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:after="60"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="TOC2"><w:name w:val="toc 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:after="60"/><w:ind w:left="360"/></w:pPr></w:style>
</w:styles>
"#,
        body = half_points(layout.body_size),
        heading = half_points(layout.heading_size),
        subheading = half_points(layout.subheading_size),
        line = (layout.line_spacing * 240.0).round() as u32,
    )
}

fn twips(inches: f32) -> u32 {
    (inches * 1440.0).round() as u32
}

fn half_points(points: f32) -> u32 {
    (points * 2.0).round() as u32
}

/// Run formatting.
#[derive(Clone, Copy)]
struct RunProps {
    size: f32,
    bold: bool,
}

/// Paragraph formatting.
#[derive(Clone, Copy, Default)]
struct ParaProps<'a> {
    style: Option<&'a str>,
    alignment: Option<Alignment>,
    space_after: Option<f32>,
}

/// Builds the body of `word/document.xml`.
struct BodyWriter<'a> {
    out: String,
    layout: &'a LayoutOptions,
    rtl: bool,
    next_bookmark: u32,
}

impl<'a> BodyWriter<'a> {
    fn new(layout: &'a LayoutOptions, rtl: bool) -> Self {
        Self {
            out: String::new(),
            layout,
            rtl,
            next_bookmark: 0,
        }
    }

    fn open_paragraph(&mut self, props: ParaProps<'_>) {
        self.out.push_str("<w:p><w:pPr>");
        if let Some(style) = props.style {
            self.out.push_str(&format!("<w:pStyle w:val=\"{style}\"/>"));
        }
        if self.rtl {
            self.out.push_str("<w:bidi/>");
        }
        if let Some(after) = props.space_after {
            self.out.push_str(&format!(
                "<w:spacing w:after=\"{}\"/>",
                (after * 20.0).round() as u32
            ));
        }
        if let Some(alignment) = props.alignment {
            self.out.push_str(&format!("<w:jc w:val=\"{}\"/>", alignment.as_ooxml()));
        }
        self.out.push_str("</w:pPr>");
    }

    fn run(&mut self, text: &str, props: RunProps) {
        let font = escape_xml(&self.layout.font_family);
        self.out.push_str("<w:r><w:rPr>");
        self.out.push_str(&format!(
            "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:eastAsia=\"{font}\" w:cs=\"{font}\"/>"
        ));
        if props.bold {
            self.out.push_str("<w:b/>");
        }
        let size = half_points(props.size);
        self.out.push_str(&format!("<w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/>"));
        if self.rtl {
            self.out.push_str("<w:rtl/>");
        }
        self.out.push_str("</w:rPr>");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.out.push_str("<w:br/>");
            }
            self.out.push_str(&format!("<w:t xml:space=\"preserve\">{}</w:t>", escape_xml(line)));
        }
        self.out.push_str("</w:r>");
    }

    fn paragraph(&mut self, text: &str, para: ParaProps<'_>, run: RunProps) {
        self.open_paragraph(para);
        self.run(text, run);
        self.out.push_str("</w:p>");
    }

    /// Heading paragraph wrapped in a bookmark named after `anchor`.
    fn heading(&mut self, text: &str, style: &str, size: f32, anchor: &str) {
        let id = self.next_bookmark;
        self.next_bookmark += 1;
        self.open_paragraph(ParaProps {
            style: Some(style),
            ..Default::default()
        });
        self.out.push_str(&format!(
            "<w:bookmarkStart w:id=\"{id}\" w:name=\"{}\"/>",
            bookmark_name(anchor)
        ));
        self.run(text, RunProps { size, bold: true });
        self.out.push_str(&format!("<w:bookmarkEnd w:id=\"{id}\"/></w:p>"));
    }

    /// Table of contents line linking to the bookmark for `anchor`.
    fn toc_line(&mut self, text: &str, level: u8, anchor: &str) {
        let style = if level == 1 { "TOC1" } else { "TOC2" };
        self.open_paragraph(ParaProps {
            style: Some(style),
            ..Default::default()
        });
        self.out.push_str(&format!(
            "<w:hyperlink w:anchor=\"{}\" w:history=\"1\">",
            bookmark_name(anchor)
        ));
        self.run(
            text,
            RunProps {
                size: self.layout.body_size,
                bold: false,
            },
        );
        self.out.push_str("</w:hyperlink></w:p>");
    }

    fn body_paragraph(&mut self, text: &str) {
        self.paragraph(
            text,
            ParaProps {
                style: Some("Normal"),
                alignment: Some(self.layout.alignment),
                space_after: Some(self.layout.paragraph_spacing),
            },
            RunProps {
                size: self.layout.body_size,
                bold: false,
            },
        );
    }

    fn page_break(&mut self) {
        self.out.push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>");
    }

    fn finish(mut self) -> String {
        let layout = self.layout;
        self.out.push_str(&format!(
            "<w:sectPr><w:footerReference w:type=\"default\" r:id=\"rId3\"/>\
             <w:pgSz w:w=\"{}\" w:h=\"{}\"/>\
             <w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/>\
             </w:sectPr>",
            twips(layout.page_width),
            twips(layout.page_height),
            twips(layout.margins.top),
            twips(layout.margins.right),
            twips(layout.margins.bottom),
            twips(layout.margins.left)
        ));
        self.out
    }
}

/// Word bookmark names allow letters, digits and underscores only.
fn bookmark_name(anchor: &str) -> String {
    anchor.replace('-', "_")
}

fn render_document(outline: &Outline<'_>, meta: &BookMetadata, layout: &LayoutOptions) -> String {
    let labels = meta.language.labels();
    let mut body = BodyWriter::new(layout, meta.language.is_rtl());

    let centered = ParaProps {
        alignment: Some(Alignment::Center),
        ..Default::default()
    };
    body.paragraph(
        &format_title(&meta.title, meta.language.name()),
        centered,
        RunProps {
            size: layout.title_size,
            bold: true,
        },
    );

    if let Some(ref author) = meta.author_name {
        body.paragraph(
            author,
            centered,
            RunProps {
                size: layout.author_size,
                bold: false,
            },
        );
        body.page_break();
    }

    if let Some(ref bio) = meta.author_bio {
        body.paragraph(
            labels.author_info,
            ParaProps {
                style: Some("Heading2"),
                ..Default::default()
            },
            RunProps {
                size: layout.subheading_size,
                bold: true,
            },
        );
        for paragraph in split_paragraphs(bio) {
            body.body_paragraph(&paragraph);
        }
        body.page_break();
    }

    if meta.include_toc {
        body.paragraph(
            labels.contents,
            ParaProps {
                style: Some("TOCHeading"),
                ..Default::default()
            },
            RunProps {
                size: layout.heading_size,
                bold: true,
            },
        );
        match layout.toc_text {
            Some(ref text) => {
                for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    body.paragraph(
                        line,
                        ParaProps {
                            style: Some("TOC1"),
                            ..Default::default()
                        },
                        RunProps {
                            size: layout.body_size,
                            bold: false,
                        },
                    );
                }
            }
            None => {
                for entry in outline.toc() {
                    body.toc_line(&entry.title, 1, &entry.anchor);
                    for child in &entry.children {
                        body.toc_line(&child.title, 2, &child.anchor);
                    }
                }
            }
        }
        body.page_break();
    }

    for entry in &outline.entries {
        body.heading(&entry.heading, "Heading1", layout.heading_size, &entry.anchor);
        if entry.subsections.is_empty() {
            for paragraph in split_paragraphs(&entry.text.body) {
                body.body_paragraph(&paragraph);
            }
        } else {
            for sub in &entry.subsections {
                body.heading(&sub.heading, "Heading2", layout.subheading_size, &sub.anchor);
                body.body_paragraph(&sub.body);
            }
        }
        body.page_break();
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <w:document xmlns:w=\"{W_NS}\" xmlns:r=\"{R_NS}\"><w:body>{}</w:body></w:document>\n",
        body.finish()
    )
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use quick_xml::Reader;
    use quick_xml::events::Event;
    use zip::ZipArchive;

    use super::*;
    use crate::language::Language;
    use crate::plan::{PlanOptions, plan};

    fn texts(options: &PlanOptions, bodies: &[&str]) -> Vec<GeneratedText> {
        plan(options)
            .unwrap()
            .into_iter()
            .zip(bodies.iter().cycle())
            .map(|(section, body)| GeneratedText::new(section, body))
            .collect()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    /// (style, text) for every paragraph of document.xml.
    fn paragraphs(xml: &str) -> Vec<(Option<String>, String)> {
        let mut reader = Reader::from_str(xml);
        let mut result = Vec::new();
        let mut style = None;
        let mut text = String::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"w:p" => {
                    style = None;
                    text.clear();
                }
                Event::Empty(e) if e.name().as_ref() == b"w:pStyle" => {
                    style = e
                        .try_get_attribute("w:val")
                        .unwrap()
                        .map(|a| String::from_utf8_lossy(&a.value).into_owned());
                }
                Event::Text(t) => text.push_str(&String::from_utf8_lossy(&t)),
                Event::End(e) if e.name().as_ref() == b"w:p" => {
                    result.push((style.take(), std::mem::take(&mut text)));
                }
                Event::Eof => break,
                _ => {}
            }
        }
        result
    }

    fn with_style<'a>(paras: &'a [(Option<String>, String)], style: &str) -> Vec<&'a str> {
        paras
            .iter()
            .filter(|(s, _)| s.as_deref() == Some(style))
            .map(|(_, t)| t.as_str())
            .collect()
    }

    #[test]
    fn test_sections_in_order() {
        let options = PlanOptions::new(3).with_intro(false).with_conclusion(false);
        let texts: Vec<_> = plan(&options)
            .unwrap()
            .into_iter()
            .zip(["A", "B", "C"])
            .map(|(section, body)| GeneratedText::new(section, body))
            .collect();
        let doc = DocxAssembler::new().assemble(&texts, &BookMetadata::new("memory")).unwrap();
        let paras = paragraphs(&read_part(doc.as_bytes(), "word/document.xml"));

        assert_eq!(with_style(&paras, "Heading1"), vec!["Chapter 1", "Chapter 2", "Chapter 3"]);
        assert_eq!(with_style(&paras, "Normal"), vec!["A", "B", "C"]);
        assert_eq!(with_style(&paras, "TOC1"), vec!["Chapter 1", "Chapter 2", "Chapter 3"]);
    }

    #[test]
    fn test_front_matter() {
        let texts = texts(&PlanOptions::new(1), &["Body"]);
        let meta = BookMetadata::new("the art of memory")
            .with_author("Ada Writer")
            .with_bio("Ada writes.")
            .with_toc(false);
        let doc = DocxAssembler::new().assemble(&texts, &meta).unwrap();
        let paras = paragraphs(&read_part(doc.as_bytes(), "word/document.xml"));

        assert_eq!(paras[0].1, "The Art Of Memory");
        assert_eq!(paras[1].1, "Ada Writer");
        assert_eq!(with_style(&paras, "Heading2"), vec!["Author Information"]);
        assert!(with_style(&paras, "TOC1").is_empty());
        assert!(with_style(&paras, "TOCHeading").is_empty());
    }

    #[test]
    fn test_paragraph_blocks_and_page_breaks() {
        let texts = texts(
            &PlanOptions::new(1).with_intro(false).with_conclusion(false),
            &["First paragraph.\n\nSecond paragraph."],
        );
        let doc = DocxAssembler::new()
            .assemble(&texts, &BookMetadata::new("Memory").with_toc(false))
            .unwrap();
        let xml = read_part(doc.as_bytes(), "word/document.xml");
        let paras = paragraphs(&xml);

        assert_eq!(with_style(&paras, "Normal"), vec!["First paragraph.", "Second paragraph."]);
        assert!(xml.contains("<w:jc w:val=\"both\"/>"));
        assert!(xml.contains("<w:spacing w:after=\"120\"/>"));
        assert_eq!(xml.matches("<w:br w:type=\"page\"/>").count(), 1);
    }

    #[test]
    fn test_subdivided_chapters() {
        let texts = texts(
            &PlanOptions::new(2).with_conclusion(false),
            &["Intro text.", "One.\n\nTwo.", "Only one block."],
        );
        let layout = LayoutOptions {
            subdivide_chapters: true,
            ..Default::default()
        };
        let doc = DocxAssembler::new()
            .with_config(layout)
            .assemble(&texts, &BookMetadata::new("Memory"))
            .unwrap();
        let paras = paragraphs(&read_part(doc.as_bytes(), "word/document.xml"));

        assert_eq!(
            with_style(&paras, "Heading1"),
            vec!["Introduction", "Chapter 1", "Chapter 2"]
        );
        assert_eq!(
            with_style(&paras, "Heading2"),
            vec!["Section 1", "Section 2", "Section 1"]
        );
        assert_eq!(with_style(&paras, "TOC2"), vec!["Section 1", "Section 2", "Section 1"]);
    }

    #[test]
    fn test_pre_rendered_toc() {
        let texts = texts(&PlanOptions::new(1), &["Body"]);
        let layout = LayoutOptions {
            toc_text: Some("Part one\n\nPart two".to_string()),
            ..Default::default()
        };
        let doc = DocxAssembler::new()
            .with_config(layout)
            .assemble(&texts, &BookMetadata::new("Memory"))
            .unwrap();
        let paras = paragraphs(&read_part(doc.as_bytes(), "word/document.xml"));
        assert_eq!(with_style(&paras, "TOC1"), vec!["Part one", "Part two"]);
    }

    #[test]
    fn test_spanish_headings() {
        let texts = texts(&PlanOptions::new(1).with_language(Language::Spanish), &["Texto"]);
        let meta = BookMetadata::new("EL ARTE DE LA MEMORIA").with_language(Language::Spanish);
        let doc = DocxAssembler::new().assemble(&texts, &meta).unwrap();
        let paras = paragraphs(&read_part(doc.as_bytes(), "word/document.xml"));

        assert_eq!(paras[0].1, "El arte de la memoria");
        assert_eq!(
            with_style(&paras, "Heading1"),
            vec!["Introducción", "Capítulo 1", "Conclusiones"]
        );
        assert_eq!(with_style(&paras, "TOCHeading"), vec!["Índice"]);
    }

    #[test]
    fn test_page_setup_and_footer() {
        let texts = texts(&PlanOptions::new(1), &["Body"]);
        let doc = DocxAssembler::new().assemble(&texts, &BookMetadata::new("Memory")).unwrap();
        let xml = read_part(doc.as_bytes(), "word/document.xml");

        assert!(xml.contains("<w:pgSz w:w=\"7920\" w:h=\"12240\"/>"));
        assert!(xml.contains("w:top=\"1152\" w:right=\"1152\" w:bottom=\"1152\" w:left=\"1152\""));
        assert!(xml.contains("<w:footerReference w:type=\"default\" r:id=\"rId3\"/>"));

        let footer = read_part(doc.as_bytes(), "word/footer1.xml");
        assert!(footer.contains(" PAGE "));
        assert!(footer.contains("w:fldCharType=\"begin\""));
        assert!(footer.contains("w:fldCharType=\"end\""));
    }

    #[test]
    fn test_package_parts() {
        let texts = texts(&PlanOptions::new(1), &["Body"]);
        let meta = BookMetadata::new("Tom & Jerry").with_author("Ada");
        let doc = DocxAssembler::new().assemble(&texts, &meta).unwrap();

        let archive = ZipArchive::new(Cursor::new(doc.as_bytes())).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/footer1.xml",
                "word/settings.xml",
                "word/styles.xml",
            ]
        );

        let core = read_part(doc.as_bytes(), "docProps/core.xml");
        assert!(core.contains("<dc:title>Tom &amp; Jerry</dc:title>"));
        assert!(core.contains("<dc:creator>Ada</dc:creator>"));
        assert!(core.contains("<dc:language>en</dc:language>"));
    }

    #[test]
    fn test_toc_links_target_bookmarks() {
        let texts = texts(&PlanOptions::new(1).with_intro(false).with_conclusion(false), &["Body"]);
        let doc = DocxAssembler::new().assemble(&texts, &BookMetadata::new("Memory")).unwrap();
        let xml = read_part(doc.as_bytes(), "word/document.xml");

        assert!(xml.contains("<w:hyperlink w:anchor=\"chapter_1\""));
        assert!(xml.contains("<w:bookmarkStart w:id=\"0\" w:name=\"chapter_1\"/>"));
    }
}
