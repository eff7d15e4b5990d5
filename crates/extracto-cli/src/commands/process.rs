//! Process command - extract transactions from a single statement file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use extracto_core::{
    default_registry, extract_statement_with, ExtractionResult, ExtractoConfig, Severity,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show the parser trace after extraction
    #[arg(long)]
    show_trace: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full result as JSON
    Json,
    /// Transactions as CSV rows
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let bytes = fs::read(&args.input)?;
    let file_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("statement.pdf");
    debug!("processing {} ({} bytes)", file_name, bytes.len());

    let registry = default_registry(&config);
    let result = extract_statement_with(&bytes, file_name, &config, registry)?;

    let output = format_result(&result, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    print_warnings(&result);

    if args.show_trace {
        eprintln!();
        eprintln!("{}", style("Parser trace:").dim());
        for entry in &result.parser_trace {
            eprintln!("  {}", style(entry).dim());
        }
    }

    Ok(())
}

pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<ExtractoConfig> {
    Ok(match config_path {
        Some(path) => ExtractoConfig::from_file(std::path::Path::new(path))?,
        None => ExtractoConfig::default(),
    })
}

fn print_warnings(result: &ExtractionResult) {
    for warning in &result.warnings {
        let label = match warning.severity {
            Severity::Critical | Severity::High => style(warning.code.to_string()).red(),
            _ => style(warning.code.to_string()).yellow(),
        };
        eprintln!("{} {}", label, warning.message);
    }
}

fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "description", "amount", "balance", "currency", "page"])?;

    for tx in &result.transactions {
        wtr.write_record([
            tx.date.to_string(),
            tx.description.clone(),
            tx.amount.map(|a| a.to_string()).unwrap_or_default(),
            tx.balance.map(|b| b.to_string()).unwrap_or_default(),
            tx.currency.clone().unwrap_or_default(),
            tx.source_page.map(|p| p.to_string()).unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Statement: {}\n", result.profile.file_name));

    if let Some(meta) = &result.meta {
        if let Some(name) = &meta.institution_name {
            output.push_str(&format!("Institution: {}\n", name));
        }
        if let (Some(start), Some(end)) = (meta.period_start, meta.period_end) {
            output.push_str(&format!("Period: {} to {}\n", start, end));
        }
        if let Some(opening) = meta.opening_balance {
            output.push_str(&format!("Opening balance: {}\n", opening));
        }
        if let Some(closing) = meta.closing_balance {
            output.push_str(&format!("Closing balance: {}\n", closing));
        }
    }

    output.push_str(&format!("Transactions: {}\n", result.transactions.len()));
    output.push_str(&format!("Confidence: {}%\n", result.confidence));

    if !result.transactions.is_empty() {
        output.push('\n');
        for tx in &result.transactions {
            let amount = tx
                .amount
                .map(|a| a.to_string())
                .unwrap_or_else(|| "?".to_string());
            output.push_str(&format!("{}  {:>14}  {}\n", tx.date, amount, tx.description));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use extracto_core::{DocumentProfile, DocumentType, Transaction};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_result() -> ExtractionResult {
        ExtractionResult {
            profile: DocumentProfile {
                file_name: "resumen.pdf".into(),
                content_hash: "00".into(),
                page_count: 1,
                is_text_extractable: true,
                is_scanned: false,
                sample_text: String::new(),
                language_hint: "es-AR".into(),
                document_type: DocumentType::MovementList,
                has_balance_keyword: true,
                has_account_keyword: false,
                has_period_keyword: true,
                institution: Some("bcorrientes".into()),
            },
            transactions: vec![Transaction {
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                description: "PAYMENT RECEIVED".into(),
                amount: Some(Decimal::from_str("250.00").unwrap()),
                balance: Some(Decimal::from_str("1250.00").unwrap()),
                currency: Some("ARS".into()),
                type_hint: None,
                category_hint: None,
                source_page: Some(1),
                source_raw: None,
            }],
            meta: None,
            warnings: Vec::new(),
            confidence: 95,
            parser_trace: vec!["INSTITUTION:bcorrientes".into(), "OK:STUB".into()],
            processing_time_ms: 12,
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_transaction() {
        let csv = format_csv(&sample_result()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "date,description,amount,balance,currency,page");
        assert_eq!(lines[1], "2024-01-05,PAYMENT RECEIVED,250.00,1250.00,ARS,1");
    }

    #[test]
    fn text_summary_includes_confidence() {
        let text = format_text(&sample_result());
        assert!(text.contains("Statement: resumen.pdf"));
        assert!(text.contains("Transactions: 1"));
        assert!(text.contains("Confidence: 95%"));
    }
}
