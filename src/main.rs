//! # smsxtract CLI
//!
//! Command-line interface for the smsxtract library.

use std::process;

use clap::Parser as ClapParser;
use env_logger::Env;

use smsxtract::cli::Args;
use smsxtract::ExtractError;
use smsxtract::pipeline::{ExtractionSummary, Extractor};

fn main() {
    let args = <Args as ClapParser>::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ExtractError> {
    let extractor = Extractor::new(args.to_config());

    for file in &args.files {
        if !args.json {
            println!("📂 Extracting content from '{}'...", file.display());
        }

        match extractor.extract_file(file) {
            Ok(summary) => report(&summary, args.json)?,
            Err(e) if e.is_skippable() => {
                eprintln!("⚠️  Warning: {}: Skipping", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn report(summary: &ExtractionSummary, json: bool) -> Result<(), ExtractError> {
    if json {
        return print_json(summary);
    }

    println!(
        "   Found {} pieces of data total with {} unique addresses",
        summary.total, summary.contacts
    );
    if summary.skipped_records > 0 {
        println!(
            "   Skipped {} attachment record(s) at the edges of the file",
            summary.skipped_records
        );
    }
    if summary.overwritten_attachments > 0 {
        println!(
            "   {} attachment(s) overwritten by later ones with the same name",
            summary.overwritten_attachments
        );
    }
    println!("{}", summary);
    println!("✅ Output saved to {}", summary.output.display());
    Ok(())
}

#[cfg(feature = "json-output")]
fn print_json(summary: &ExtractionSummary) -> Result<(), ExtractError> {
    let line = serde_json::to_string(summary).map_err(|e| {
        ExtractError::invalid_input(&summary.input, format!("cannot encode summary: {e}"))
    })?;
    println!("{line}");
    Ok(())
}

#[cfg(not(feature = "json-output"))]
fn print_json(summary: &ExtractionSummary) -> Result<(), ExtractError> {
    eprintln!("⚠️  Warning: built without JSON support, printing text summary");
    report(summary, false)
}
