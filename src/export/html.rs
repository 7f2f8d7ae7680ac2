//! Flat HTML assembler.
//!
//! One self-contained page: fixed style block, title, optional table of
//! contents, optional author blocks, then one `<details>` element per section.

use std::io::{Seek, Write};

use crate::book::BookMetadata;
use crate::error::Result;
use crate::generate::GeneratedText;
use crate::text::format_title;

use super::outline::Outline;
use super::{Assembler, Format, escape_xml};

const STYLE: &str = "body { font-family: Georgia, serif; max-width: 42em; margin: 2em auto; padding: 0 1em; line-height: 1.6; }
h1 { text-align: center; }
nav ol { padding-left: 1.5em; }
details { margin: 1em 0; }
summary { font-weight: bold; cursor: pointer; }
p { white-space: pre-line; text-align: justify; }
.author { text-align: center; font-style: italic; }";

/// Configuration for HTML assembly.
#[derive(Debug, Clone, Default)]
pub struct HtmlConfig {
    /// Render every section expanded.
    pub expanded: bool,
    /// Extra CSS appended after the built-in style block.
    pub extra_css: Option<String>,
}

/// Flat HTML assembler.
#[derive(Debug, Clone, Default)]
pub struct HtmlAssembler {
    config: HtmlConfig,
}

impl HtmlAssembler {
    /// Create a new assembler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the assembler with custom settings.
    pub fn with_config(mut self, config: HtmlConfig) -> Self {
        self.config = config;
        self
    }

    /// Render the page as a string.
    pub fn render(&self, texts: &[GeneratedText], meta: &BookMetadata) -> Result<String> {
        let outline = Outline::new(texts, meta.language, false)?;
        let labels = meta.language.labels();
        let title = escape_xml(&format_title(&meta.title, meta.language.name()));
        let dir = if meta.language.is_rtl() { "rtl" } else { "ltr" };

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!("<html lang=\"{}\" dir=\"{dir}\">\n", meta.language.tag()));
        html.push_str("<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{title}</title>\n"));
        html.push_str(&format!("<style>\n{STYLE}\n"));
        if let Some(ref css) = self.config.extra_css {
            html.push_str(&format!("{css}\n"));
        }
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(&format!("<h1>{title}</h1>\n"));

        if meta.include_toc {
            html.push_str(&format!("<nav>\n<h2>{}</h2>\n<ol>\n", escape_xml(labels.contents)));
            for entry in outline.toc() {
                html.push_str(&format!(
                    "<li><a href=\"#{}\">{}</a></li>\n",
                    entry.anchor,
                    escape_xml(&entry.title)
                ));
            }
            html.push_str("</ol>\n</nav>\n");
        }

        if let Some(ref author) = meta.author_name {
            html.push_str(&format!("<p class=\"author\">{}</p>\n", escape_xml(author)));
        }
        if let Some(ref bio) = meta.author_bio {
            html.push_str(&format!(
                "<section class=\"bio\">\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
                escape_xml(labels.author_info),
                escape_xml(bio)
            ));
        }

        let open = if self.config.expanded { " open" } else { "" };
        for entry in &outline.entries {
            html.push_str(&format!(
                "<details id=\"{}\"{open}>\n<summary>{}</summary>\n<p>{}</p>\n</details>\n",
                entry.anchor,
                escape_xml(&entry.heading),
                escape_xml(&entry.text.body)
            ));
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

impl Assembler for HtmlAssembler {
    fn format(&self) -> Format {
        Format::Html
    }

    fn write<W: Write + Seek>(
        &self,
        texts: &[GeneratedText],
        meta: &BookMetadata,
        writer: &mut W,
    ) -> Result<()> {
        let html = self.render(texts, meta)?;
        writer.write_all(html.as_bytes())?;
        Ok(())
    }
}
