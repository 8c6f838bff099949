//! Converts a sample document, prints a short preview and saves the result.
//!
//! ```text
//! cargo run --example preview -- path/to/sample.docx
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const PREVIEW_CHARS: usize = 500;
const OUTPUT_FILE: &str = "output.md";

/// Converts `sample`, failing when it is missing or not a valid package.
fn convert_sample(sample: &Path) -> Result<String> {
    if !sample.exists() {
        anyhow::bail!("sample file not found at {}", sample.display());
    }

    println!("Converting {}...", sample.display());
    docxdown::convert_docx(sample)
        .with_context(|| format!("conversion of {} failed", sample.display()))
}

fn main() -> Result<()> {
    let sample = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("samples/sample.docx"));

    let markdown = convert_sample(&sample)?;

    let preview: String = markdown.chars().take(PREVIEW_CHARS).collect();
    println!("\n--- Conversion Success! Preview (first {} chars) ---", PREVIEW_CHARS);
    println!("{}", preview);
    println!("...\n---------------------------------------------------");

    std::fs::write(OUTPUT_FILE, &markdown)
        .with_context(|| format!("failed to write {}", OUTPUT_FILE))?;
    println!("Full output saved to {}", OUTPUT_FILE);
    Ok(())
}
