//! Batch command - extract every statement matching a glob pattern.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use tracing::warn;

use extracto_core::{default_registry, extract_statement_with};

use super::process::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files (e.g. "statements/*.pdf")
    #[arg(required = true)]
    pattern: String,

    /// Directory to write one JSON result per input file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut processed = 0usize;
    let mut failed = 0usize;

    for entry in glob(&args.pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("unreadable path: {}", e);
                failed += 1;
                continue;
            }
        };

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{} {}: {}", style("✗").red(), path.display(), e);
                failed += 1;
                continue;
            }
        };

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("statement.pdf");

        let registry = default_registry(&config);
        match extract_statement_with(&bytes, file_name, &config, registry) {
            Ok(result) => {
                processed += 1;
                println!(
                    "{} {}: {} transactions, confidence {}%",
                    style("✓").green(),
                    path.display(),
                    result.transactions.len(),
                    result.confidence
                );

                if let Some(dir) = &args.output_dir {
                    fs::create_dir_all(dir)?;
                    let stem = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("statement");
                    let out = dir.join(format!("{}.json", stem));
                    fs::write(&out, serde_json::to_string_pretty(&result)?)?;
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", style("✗").red(), path.display(), e);
            }
        }
    }

    println!();
    println!("{} processed, {} failed", processed, failed);

    if processed == 0 && failed == 0 {
        anyhow::bail!("no files matched pattern '{}'", args.pattern);
    }

    Ok(())
}
