//! bookgen - generate a book with a language model

use std::fs;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use bookgen::export::{ExportOptions, LayoutOptions};
use bookgen::generate::Progress;
use bookgen::source::{CompletionClient, CompletionConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use bookgen::{BookMetadata, BookRequest, Format, Language, PlanOptions};

#[derive(Parser)]
#[command(name = "bookgen")]
#[command(version, about = "Generate a book with a language model", long_about = None)]
#[command(after_help = "EXAMPLES:
    bookgen \"memory palaces\" students                  Five chapters, all formats
    bookgen \"stoicism\" managers -c 8 -l spanish -f epub  Eight chapters in Spanish as EPUB")]
struct Cli {
    /// Subject of the book
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Intended readers
    #[arg(value_name = "AUDIENCE")]
    audience: String,

    /// Number of chapters (1-20)
    #[arg(short, long, default_value_t = 5)]
    chapters: u32,

    /// Language the book is written in
    #[arg(short, long, default_value_t = Language::English)]
    language: Language,

    /// Book title (defaults to the topic)
    #[arg(short, long)]
    title: Option<String>,

    /// Skip the introduction
    #[arg(long)]
    no_intro: bool,

    /// Skip the conclusion
    #[arg(long)]
    no_conclusion: bool,

    /// Leave out the table of contents
    #[arg(long)]
    no_toc: bool,

    /// Author name for the title page
    #[arg(long)]
    author: Option<String>,

    /// Author biography
    #[arg(long)]
    bio: Option<String>,

    /// Extra instructions appended to every prompt
    #[arg(short, long)]
    instructions: Option<String>,

    /// Ask for this many sections per chapter and lay them out with headings
    #[arg(long, value_name = "COUNT")]
    subsections: Option<usize>,

    /// Output formats
    #[arg(short, long = "format", value_delimiter = ',', default_values_t = Format::ALL)]
    formats: Vec<Format>,

    /// Directory for the assembled files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Provider API key
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Chat-completions endpoint
    #[arg(long, env = "BOOKGEN_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Completion model
    #[arg(long, env = "BOOKGEN_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Request timeout in seconds
    #[arg(long, env = "BOOKGEN_TIMEOUT_SECS", default_value_t = 300)]
    timeout: u64,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("bookgen=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bookgen=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let request = BookRequest::new(&cli.topic, &cli.audience).map_err(|e| e.to_string())?;

    let mut options = PlanOptions::new(cli.chapters)
        .with_intro(!cli.no_intro)
        .with_conclusion(!cli.no_conclusion)
        .with_language(cli.language);
    if let Some(ref instructions) = cli.instructions {
        options = options.with_instructions(instructions.as_str());
    }
    if let Some(count) = cli.subsections {
        options = options.with_subsections(count);
    }
    let sections = bookgen::plan(&options).map_err(|e| e.to_string())?;

    let config = CompletionConfig::new(&cli.api_key)
        .with_endpoint(&cli.endpoint)
        .with_model(&cli.model)
        .with_timeout(Duration::from_secs(cli.timeout));
    let client = CompletionClient::new(config).map_err(|e| e.to_string())?;

    let quiet = cli.quiet;
    let mut observer = |progress: Progress<'_>| {
        if let Progress::Finished {
            index, total, text, ..
        } = progress
            && !quiet
        {
            let status = if text.placeholder { "failed" } else { "done" };
            println!(
                "[{}/{}] {} {status} ({} words)",
                index + 1,
                total,
                text.section,
                text.word_count
            );
        }
        ControlFlow::Continue(())
    };
    let book = bookgen::generate_book(&client, &request, sections, &mut observer)
        .map_err(|e| e.to_string())?;

    let failures = book.failures().count();
    if failures > 0 {
        warn!(failures, "some sections use the placeholder text");
    }

    let mut meta = BookMetadata::new(cli.title.as_deref().unwrap_or(&request.topic))
        .with_language(cli.language)
        .with_toc(!cli.no_toc);
    if let Some(ref author) = cli.author {
        meta = meta.with_author(author.as_str());
    }
    if let Some(ref bio) = cli.bio {
        meta = meta.with_bio(bio.as_str());
    }

    let export = ExportOptions {
        docx: LayoutOptions {
            subdivide_chapters: cli.subsections.is_some(),
            ..Default::default()
        },
        ..Default::default()
    };

    fs::create_dir_all(&cli.output_dir).map_err(|e| e.to_string())?;

    let mut errors = Vec::new();
    for (format, result) in bookgen::assemble_all(&cli.formats, &book.texts, &meta, &export) {
        match result.and_then(|doc| doc.write_to_dir(&cli.output_dir)) {
            Ok(path) => {
                if !quiet {
                    println!("Wrote {}", path.display());
                }
            }
            Err(e) => errors.push(format!("{format}: {e}")),
        }
    }

    if !quiet {
        println!("{} words across {} sections", book.total_words(), book.texts.len());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}
