//! Cross-format assembly tests: unpack outputs and inspect their structure.

use std::io::{Cursor, Read};

use proptest::prelude::*;
use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use bookgen::export::{Assembler, DocxAssembler, EpubAssembler, ExportOptions, HtmlAssembler};
use bookgen::{BookMetadata, Format, GeneratedText, PlanOptions};

fn three_chapters() -> Vec<GeneratedText> {
    let options = PlanOptions::new(3).with_intro(false).with_conclusion(false);
    bookgen::plan(&options)
        .unwrap()
        .into_iter()
        .zip(["A", "B", "C"])
        .map(|(section, body)| GeneratedText::new(section, body))
        .collect()
}

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

/// Text of every paragraph with the given style in a DOCX body.
fn docx_styled(xml: &str, style: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut result = Vec::new();
    let mut current: Option<String> = None;
    let mut text = String::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"w:p" => {
                current = None;
                text.clear();
            }
            Event::Empty(e) if e.name().as_ref() == b"w:pStyle" => {
                current = e
                    .try_get_attribute("w:val")
                    .unwrap()
                    .map(|a| String::from_utf8_lossy(&a.value).into_owned());
            }
            Event::Text(t) => text.push_str(&String::from_utf8_lossy(&t)),
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                if current.as_deref() == Some(style) {
                    result.push(std::mem::take(&mut text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    result
}

/// `src` of every NCX navPoint, in order.
fn ncx_targets(ncx: &str) -> Vec<String> {
    let mut reader = Reader::from_str(ncx);
    let mut targets = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Empty(e) if e.name().as_ref() == b"content" => {
                if let Some(src) = e.try_get_attribute("src").unwrap() {
                    targets.push(String::from_utf8_lossy(&src.value).into_owned());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    targets
}

/// Text inside every element named `tag`, in document order.
fn element_texts(xml: &str, tag: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut result = Vec::new();
    let mut current: Option<String> = None;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == tag.as_bytes() => {
                current = Some(String::new());
            }
            Event::Text(t) => {
                if let Some(ref mut text) = current {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::End(e) if e.name().as_ref() == tag.as_bytes() => {
                result.extend(current.take());
            }
            Event::Eof => break,
            _ => {}
        }
    }
    result
}

/// Values of `attr` on every `tag` start tag in an HTML string.
fn html_attrs(html: &str, tag: &str, attr: &str) -> Vec<String> {
    let marker = format!("<{tag} {attr}=\"");
    html.match_indices(&marker)
        .map(|(i, _)| {
            let rest = &html[i + marker.len()..];
            rest[..rest.find('"').unwrap()].to_string()
        })
        .collect()
}

fn is_restricted(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

fn assert_well_formed(xml: &str) {
    assert!(!xml.contains(is_restricted), "restricted character in {xml}");
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML at {}: {e}", reader.buffer_position()),
        }
    }
}

#[test]
fn test_three_chapters_in_order_across_formats() {
    let texts = three_chapters();
    let meta = BookMetadata::new("Memory").with_toc(true);

    let docx = DocxAssembler::new().assemble(&texts, &meta).unwrap();
    let body = read_entry(docx.as_bytes(), "word/document.xml");
    assert_eq!(docx_styled(&body, "Heading1"), vec!["Chapter 1", "Chapter 2", "Chapter 3"]);
    assert_eq!(docx_styled(&body, "Normal"), vec!["A", "B", "C"]);

    let html = HtmlAssembler::new().assemble(&texts, &meta).unwrap();
    let html = String::from_utf8(html.into_bytes()).unwrap();
    let links: Vec<_> = html
        .match_indices("href=\"#")
        .map(|(i, _)| {
            let rest = &html[i + 7..];
            rest[..rest.find('"').unwrap()].to_string()
        })
        .collect();
    assert_eq!(links, vec!["chapter-1", "chapter-2", "chapter-3"]);
    for link in &links {
        assert!(html.contains(&format!("<details id=\"{link}\">")));
    }

    let epub = EpubAssembler::new().assemble(&texts, &meta).unwrap();
    let ncx = read_entry(epub.as_bytes(), "OEBPS/toc.ncx");
    assert_eq!(
        ncx_targets(&ncx),
        vec!["chapter_1.xhtml", "chapter_2.xhtml", "chapter_3.xhtml"]
    );
}

#[test]
fn test_toc_toggle_combinations() {
    let options = PlanOptions::new(2);
    let texts: Vec<_> = bookgen::plan(&options)
        .unwrap()
        .into_iter()
        .map(|section| GeneratedText::new(section, "Body"))
        .collect();

    for include_toc in [true, false] {
        for bio in [None, Some("Ada writes.")] {
            let mut meta = BookMetadata::new("Memory").with_toc(include_toc);
            if let Some(bio) = bio {
                meta = meta.with_bio(bio);
            }

            let docx = DocxAssembler::new().assemble(&texts, &meta).unwrap();
            let body = read_entry(docx.as_bytes(), "word/document.xml");
            let toc_lines = docx_styled(&body, "TOC1");
            let headings = docx_styled(&body, "Heading1");
            if include_toc {
                assert_eq!(toc_lines, headings);
            } else {
                assert!(toc_lines.is_empty());
            }

            let html = String::from_utf8(
                HtmlAssembler::new().assemble(&texts, &meta).unwrap().into_bytes(),
            )
            .unwrap();
            assert_eq!(html.contains("<nav>"), include_toc);
            assert_eq!(html.matches("<details ").count(), 4);

            let epub = EpubAssembler::new().assemble(&texts, &meta).unwrap();
            let ncx = read_entry(epub.as_bytes(), "OEBPS/toc.ncx");
            let expected = 4 + usize::from(bio.is_some());
            assert_eq!(ncx_targets(&ncx).len(), expected);
            if bio.is_some() {
                assert_eq!(ncx_targets(&ncx).last().unwrap(), "author.xhtml");
            }
        }
    }
}

#[test]
fn test_documents_written_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let texts = three_chapters();
    let meta = BookMetadata::new("The Art of Memory");

    let mut written = Vec::new();
    for (format, result) in
        bookgen::assemble_all(&Format::ALL, &texts, &meta, &ExportOptions::default())
    {
        let doc = result.unwrap();
        let path = doc.write_to_dir(dir.path()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), doc.as_bytes());
        written.push(path.file_name().unwrap().to_string_lossy().into_owned());
        assert_eq!(doc.format(), format);
    }

    assert_eq!(
        written,
        vec!["The Art of Memory.docx", "The Art of Memory.epub", "The Art of Memory.html"]
    );
}

#[test]
fn test_write_to_file() {
    let mut file = tempfile::tempfile().unwrap();
    EpubAssembler::new()
        .write(&three_chapters(), &BookMetadata::new("Memory"), &mut file)
        .unwrap();

    let archive = ZipArchive::new(file).unwrap();
    assert!(archive.file_names().any(|name| name == "OEBPS/chapter_3.xhtml"));
}

#[test]
fn test_documents_start_at_position_zero() {
    let mut doc = bookgen::assemble(
        Format::Epub,
        &three_chapters(),
        &BookMetadata::new("Memory"),
        &ExportOptions::default(),
    )
    .unwrap();
    let mut magic = [0u8; 2];
    doc.read_exact(&mut magic).unwrap();
    assert_eq!(&magic, b"PK");
}

#[test]
fn test_control_characters_stripped_from_output() {
    let options = PlanOptions::new(1).with_intro(false).with_conclusion(false);
    let section = bookgen::plan(&options).unwrap().remove(0);
    let texts = vec![GeneratedText::new(section, "Page one\u{000C}page two \u{0001} end")];
    let meta = BookMetadata::new("Memory\u{0002}").with_bio("Ada\u{001B} writes.");

    let docx = DocxAssembler::new().assemble(&texts, &meta).unwrap();
    let body = read_entry(docx.as_bytes(), "word/document.xml");
    assert_well_formed(&body);
    assert!(docx_styled(&body, "Normal").contains(&"Page one page two  end".to_string()));
    assert_well_formed(&read_entry(docx.as_bytes(), "docProps/core.xml"));

    let epub = EpubAssembler::new().assemble(&texts, &meta).unwrap();
    let parts = ["OEBPS/chapter_1.xhtml", "OEBPS/author.xhtml", "OEBPS/content.opf", "OEBPS/toc.ncx"];
    for name in parts {
        assert_well_formed(&read_entry(epub.as_bytes(), name));
    }

    let html = HtmlAssembler::new().assemble(&texts, &meta).unwrap();
    let html = String::from_utf8(html.into_bytes()).unwrap();
    assert!(!html.contains(is_restricted));
    assert!(html.contains("<p>Page one page two  end</p>"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_toc_lists_every_section_once(
        count in 1u32..=20,
        intro: bool,
        conclusion: bool,
        include_toc: bool,
        bio: bool,
    ) {
        let options = PlanOptions::new(count)
            .with_intro(intro)
            .with_conclusion(conclusion);
        let sections = bookgen::plan(&options).unwrap();
        let headings: Vec<String> = sections
            .iter()
            .map(|s| bookgen::export::section_heading(s, bookgen::Language::English))
            .collect();
        let anchors: Vec<String> = sections.iter().map(bookgen::export::section_anchor).collect();
        let texts: Vec<_> = sections
            .into_iter()
            .map(|section| GeneratedText::new(section, "Body"))
            .collect();

        let mut meta = BookMetadata::new("Memory").with_toc(include_toc);
        if bio {
            meta = meta.with_bio("Ada writes.");
        }

        let docx = DocxAssembler::new().assemble(&texts, &meta).unwrap();
        let body = read_entry(docx.as_bytes(), "word/document.xml");
        prop_assert_eq!(&docx_styled(&body, "Heading1"), &headings);
        let toc_lines = docx_styled(&body, "TOC1");
        if include_toc {
            prop_assert_eq!(&toc_lines, &headings);
        } else {
            prop_assert!(toc_lines.is_empty());
        }

        let html = String::from_utf8(
            HtmlAssembler::new().assemble(&texts, &meta).unwrap().into_bytes(),
        )
        .unwrap();
        prop_assert_eq!(&html_attrs(&html, "details", "id"), &anchors);
        let links: Vec<String> = html_attrs(&html, "a", "href")
            .into_iter()
            .map(|href| href.trim_start_matches('#').to_string())
            .collect();
        if include_toc {
            prop_assert_eq!(&links, &anchors);
        } else {
            prop_assert!(links.is_empty());
        }

        let epub = EpubAssembler::new().assemble(&texts, &meta).unwrap();
        let bytes = epub.as_bytes();
        let targets = ncx_targets(&read_entry(bytes, "OEBPS/toc.ncx"));
        let page_titles: Vec<String> = targets
            .iter()
            .flat_map(|href| element_texts(&read_entry(bytes, &format!("OEBPS/{href}")), "h1"))
            .collect();
        let mut expected = headings.clone();
        if bio {
            expected.push("Author Information".to_string());
        }
        prop_assert_eq!(&page_titles, &expected);

        let nav_titles = element_texts(&read_entry(bytes, "OEBPS/nav.xhtml"), "a");
        prop_assert_eq!(&nav_titles, &expected);
        // first <text> is the document title
        let ncx_labels = element_texts(&read_entry(bytes, "OEBPS/toc.ncx"), "text");
        prop_assert_eq!(&ncx_labels[1..], &expected[..]);
    }
}
