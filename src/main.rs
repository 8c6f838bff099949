//! CLI for docxdown - DOCX to Markdown converter

use anyhow::{Context, Result};
use clap::Parser;
use docxdown::{ConvertOptions, DocxToMarkdown, ImageHandling, Language};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input DOCX file path
    input: PathBuf,

    /// Output Markdown file path (prints to stdout if not specified)
    output: Option<PathBuf>,

    /// Directory to extract images to (if not set, images are embedded inline)
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Skip extracting images
    #[arg(long, conflicts_with = "images_dir")]
    skip_images: bool,

    /// Language conventions for headings and list markers
    #[arg(long, value_enum, default_value_t = LangArg::Default)]
    lang: LangArg,

    /// Keep leading and trailing whitespace of paragraphs
    #[arg(long)]
    preserve_whitespace: bool,

    /// Drop underline formatting instead of emitting <u> tags
    #[arg(long)]
    no_html_underline: bool,

    /// Render strikethrough as <s> tags instead of ~~
    #[arg(long)]
    html_strikethrough: bool,

    /// Fail when a footnote, endnote or comment reference has no definition
    #[arg(long)]
    strict: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LangArg {
    Default,
    Ko,
}

impl From<LangArg> for Language {
    fn from(v: LangArg) -> Self {
        match v {
            LangArg::Default => Language::Default,
            LangArg::Ko => Language::Korean,
        }
    }
}

impl Args {
    fn options(&self) -> ConvertOptions {
        let image_handling = if self.skip_images {
            ImageHandling::Skip
        } else if let Some(dir) = &self.images_dir {
            ImageHandling::SaveToDir(dir.clone())
        } else {
            ImageHandling::Inline
        };

        ConvertOptions {
            image_handling,
            preserve_whitespace: self.preserve_whitespace,
            html_underline: !self.no_html_underline,
            html_strikethrough: self.html_strikethrough,
            strict_reference_validation: self.strict,
            language: self.lang.into(),
        }
    }
}

fn run(args: Args) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("input file not found: {}", args.input.display());
    }

    let converter = DocxToMarkdown::new(args.options());
    let markdown = converter
        .convert(&args.input)
        .with_context(|| format!("failed to convert '{}'", args.input.display()))?;
    debug!(chars = markdown.len(), "conversion finished");

    match &args.output {
        Some(output) => {
            std::fs::write(output, &markdown)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
            println!(
                "Converted '{}' to '{}'",
                args.input.display(),
                output.display()
            );
        }
        None => print!("{}", markdown),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version land here too and are not failures.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
