//! Run summaries for the command line
//!
//! Each subcommand reports what it produced either as human-readable text or
//! as a single JSON document on stdout. Logs go to stderr separately.
//!
//! # Example
//!
//! ```
//! use tlog2ninja::cli::output::{OutputFormat, OutputFormatter};
//! use tlog2ninja::emit::EmitSummary;
//! use std::path::PathBuf;
//!
//! let summary = EmitSummary { path: PathBuf::from("build.ninja"), edges: 2 };
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_emit(&summary).unwrap();
//! assert!(output.contains("\"edges\": 2"));
//! ```

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;

use crate::emit::EmitSummary;
use crate::harvest::HarvestedLogs;
use crate::parse::{ParseReport, RecordFailure};
use crate::pipeline::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_harvest(&self, logs: &HarvestedLogs, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(json!({
                "logs": logs.len(),
                "records": logs.record_count(),
                "log_files": logs.log_files().collect::<Vec<_>>(),
                "output": output,
            })),
            OutputFormat::Human => {
                let mut text = format!(
                    "\u{2713} Harvested {} records from {} log files\n",
                    logs.record_count(),
                    logs.len()
                );
                for path in logs.log_files() {
                    text.push_str(&format!("\u{251C}\u{2500} {}\n", path.display()));
                }
                text.push_str(&format!("\u{2514}\u{2500} Written to {}\n", output.display()));
                Ok(text)
            }
        }
    }

    pub fn format_parse(&self, report: &ParseReport, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(json!({
                "invocations": report.invocations.len(),
                "duplicates": report.duplicates,
                "failures": failures_json(&report.failures),
                "output": output,
            })),
            OutputFormat::Human => {
                let mut text = format!(
                    "{} Parsed {} invocations ({} duplicate sources)\n",
                    status_mark(&report.failures),
                    report.invocations.len(),
                    report.duplicates
                );
                text.push_str(&format!("\u{2514}\u{2500} Written to {}\n", output.display()));
                text.push_str(&failures_human(&report.failures));
                Ok(text)
            }
        }
    }

    pub fn format_emit(&self, summary: &EmitSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(json!({
                "edges": summary.edges,
                "output": summary.path,
            })),
            OutputFormat::Human => Ok(format!(
                "\u{2713} Wrote {} build edges to {}\n",
                summary.edges,
                summary.path.display()
            )),
        }
    }

    pub fn format_run(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(json!({
                "logs": summary.logs,
                "records": summary.records,
                "invocations": summary.invocations,
                "duplicates": summary.duplicates,
                "edges": summary.edges,
                "failures": failures_json(&summary.failures),
                "output": summary.build_file,
            })),
            OutputFormat::Human => {
                let mut text = format!(
                    "{} Build graph written to {}\n",
                    status_mark(&summary.failures),
                    summary.build_file.display()
                );
                text.push_str(&format!(
                    "\u{251C}\u{2500} Logs:         {}\n",
                    summary.logs
                ));
                text.push_str(&format!(
                    "\u{251C}\u{2500} Records:      {}\n",
                    summary.records
                ));
                text.push_str(&format!(
                    "\u{251C}\u{2500} Invocations:  {} ({} duplicate sources)\n",
                    summary.invocations, summary.duplicates
                ));
                text.push_str(&format!(
                    "\u{2514}\u{2500} Build edges:  {}\n",
                    summary.edges
                ));
                text.push_str(&failures_human(&summary.failures));
                Ok(text)
            }
        }
    }
}

fn to_json(value: Value) -> Result<String> {
    serde_json::to_string_pretty(&value).context("Failed to serialize summary to JSON")
}

fn status_mark(failures: &[RecordFailure]) -> &'static str {
    if failures.is_empty() {
        "\u{2713}"
    } else {
        "\u{26A0}"
    }
}

fn failures_json(failures: &[RecordFailure]) -> Value {
    failures
        .iter()
        .map(|failure| {
            json!({
                "log_file": failure.log_file,
                "record": failure.record,
                "reason": failure.reason.to_string(),
            })
        })
        .collect()
}

fn failures_human(failures: &[RecordFailure]) -> String {
    if failures.is_empty() {
        return String::new();
    }
    let mut text = format!("\n\u{26A0} Skipped {} records:\n", failures.len());
    for failure in failures {
        text.push_str(&format!("  - {}\n", failure));
    }
    text
}
