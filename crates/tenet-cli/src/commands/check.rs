//! Check file command

use crate::checks::{run_checks, CheckFile, CheckReport, Outcome};
use anyhow::{Context, Result};

pub struct CheckArgs {
    pub file: String,
    pub format: String,
    /// `None` defers to the file's `[settings]`
    pub fail_fast: Option<bool>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let file = CheckFile::load_file(&args.file)
        .with_context(|| format!("Failed to load check file {}", args.file))?;
    tracing::info!(path = %args.file, checks = file.len(), "loaded check file");

    if file.is_empty() {
        println!("No checks found in {}", args.file);
        return Ok(());
    }

    let fail_fast = file.settings.fail_fast_with(args.fail_fast);
    let report = run_checks(&file, fail_fast);

    match args.format.as_str() {
        "text" => print_report_text(&report),
        "json" => print_report_json(&report)?,
        other => anyhow::bail!("Unknown format: {}", other),
    }

    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report_text(report: &CheckReport) {
    for result in &report.results {
        let label = match result.outcome {
            Outcome::Pass => "PASS ",
            Outcome::Fail(_) => "FAIL ",
            Outcome::Error(_) => "ERROR",
        };
        println!("  [{}] {}: {}", label, result.name, result.expect);
        if let Some(description) = &result.description {
            println!("          # {}", description);
        }
        if let Some(message) = result.outcome.message() {
            for line in message.lines() {
                println!("          {}", line.trim_start());
            }
        }
    }

    println!();
    println!("{}", report.summary());
}

fn print_report_json(report: &CheckReport) -> Result<()> {
    let results: Vec<serde_json::Value> = report
        .results
        .iter()
        .map(|r| {
            serde_json::json!({
                "name": r.name,
                "description": r.description,
                "expect": r.expect,
                "outcome": r.outcome.label(),
                "message": r.outcome.message(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "success": report.is_success(),
        "summary": report.summary(),
        "passed": report.passed_count(),
        "failed": report.failed_count(),
        "errored": report.error_count(),
        "skipped": report.skipped,
        "results": results,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
