//! Batch parsing with per-record failure reporting

use super::invocation::{CompileInvocation, InvocationParser};
use super::normalize::unquote;
use crate::error::RecordError;
use crate::harvest::RawInvocation;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// What to do when two records normalize to the same source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep every record; the build graph gets one edge per record.
    KeepAll,
    /// The later record replaces the earlier one in its original position.
    #[default]
    LastWins,
    /// Keep the first record and report each later one as a failure.
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "keep-all" => Ok(DuplicatePolicy::KeepAll),
            "last-wins" => Ok(DuplicatePolicy::LastWins),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!("unknown duplicate policy: {}", other)),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::KeepAll => write!(f, "keep-all"),
            DuplicatePolicy::LastWins => write!(f, "last-wins"),
            DuplicatePolicy::Reject => write!(f, "reject"),
        }
    }
}

/// A record that produced no invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub log_file: PathBuf,
    pub record: usize,
    pub reason: RecordError,
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (record {}): {}",
            self.log_file.display(),
            self.record,
            self.reason
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub invocations: Vec<CompileInvocation>,
    pub failures: Vec<RecordFailure>,
    /// Records whose source file had already been seen
    pub duplicates: usize,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parses every record, collecting failures instead of stopping at them.
pub fn parse_batch<'a, I>(parser: &InvocationParser, records: I, policy: DuplicatePolicy) -> ParseReport
where
    I: IntoIterator<Item = RawInvocation<'a>>,
{
    let mut report = ParseReport::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for raw in records {
        let invocation = match parser.parse(raw.text) {
            Ok(invocation) => invocation,
            Err(reason) => {
                warn!(
                    file = %raw.log_file.display(),
                    record = raw.record,
                    error = %reason,
                    "Skipping malformed invocation"
                );
                report.failures.push(RecordFailure {
                    log_file: raw.log_file.to_path_buf(),
                    record: raw.record,
                    reason,
                });
                continue;
            }
        };

        debug!(
            source = %invocation.source_file,
            defines = invocation.args.defines.len(),
            includes = invocation.args.includes.len(),
            "Parsed invocation"
        );

        let (key, _) = unquote(&invocation.source_file);
        let Some(index) = seen.get(key).copied() else {
            seen.insert(key.to_string(), report.invocations.len());
            report.invocations.push(invocation);
            continue;
        };

        report.duplicates += 1;
        match policy {
            DuplicatePolicy::KeepAll => {
                debug!(source = %invocation.source_file, "Keeping duplicate source");
                report.invocations.push(invocation);
            }
            DuplicatePolicy::LastWins => {
                warn!(
                    source = %invocation.source_file,
                    file = %raw.log_file.display(),
                    record = raw.record,
                    "Duplicate source replaces earlier invocation"
                );
                report.invocations[index] = invocation;
            }
            DuplicatePolicy::Reject => {
                warn!(
                    source = %invocation.source_file,
                    file = %raw.log_file.display(),
                    record = raw.record,
                    "Rejecting duplicate source"
                );
                report.failures.push(RecordFailure {
                    log_file: raw.log_file.to_path_buf(),
                    record: raw.record,
                    reason: RecordError::DuplicateSource(invocation.source_file),
                });
            }
        }
    }

    info!(
        invocations = report.invocations.len(),
        failures = report.failures.len(),
        duplicates = report.duplicates,
        policy = %policy,
        "Parsed invocation batch"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::PathNormalizer;
    use std::path::Path;
    use tempfile::TempDir;

    const LOG: &str = "/build/CL.command.1.tlog";

    fn raws(texts: &[&'static str]) -> Vec<RawInvocation<'static>> {
        texts
            .iter()
            .enumerate()
            .map(|(i, &text)| RawInvocation {
                log_file: Path::new(LOG),
                record: i + 1,
                text,
            })
            .collect()
    }

    fn run(texts: &[&'static str], policy: DuplicatePolicy) -> ParseReport {
        let temp = TempDir::new().unwrap();
        let parser = InvocationParser::new(PathNormalizer::new(temp.path()));
        parse_batch(&parser, raws(texts), policy)
    }

    #[test]
    fn test_malformed_record_does_not_abort_batch() {
        let report = run(
            &["/c /DA a.cpp\n", "/c /DB b.cpp", "/c /DC c.cpp\n"],
            DuplicatePolicy::default(),
        );

        assert_eq!(report.invocations.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].record, 2);
        assert_eq!(report.failures[0].log_file, Path::new(LOG));
        assert_eq!(report.failures[0].reason, RecordError::MissingTerminator);
        assert!(!report.is_clean());
        assert!(report.failures[0].to_string().contains("record 2"));
    }

    #[test]
    fn test_keep_all_preserves_every_record() {
        let report = run(
            &["/c /DA a.cpp\n", "/c /DB a.cpp\n"],
            DuplicatePolicy::KeepAll,
        );

        assert_eq!(report.invocations.len(), 2);
        assert_eq!(report.duplicates, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_last_wins_replaces_in_place() {
        let report = run(
            &["/c /DA a.cpp\n", "/c /DX b.cpp\n", "/c /DB a.cpp\n"],
            DuplicatePolicy::LastWins,
        );

        assert_eq!(report.invocations.len(), 2);
        assert!(report.invocations[0].source_file.ends_with("a.cpp"));
        assert_eq!(report.invocations[0].args.defines, vec!["B"]);
        assert!(report.invocations[1].source_file.ends_with("b.cpp"));
        assert_eq!(report.duplicates, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_quoted_and_bare_source_are_duplicates() {
        let report = run(
            &["/c /DA a.cpp\n", "/c /DB \"a.cpp\"\n"],
            DuplicatePolicy::LastWins,
        );

        assert_eq!(report.invocations.len(), 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.invocations[0].args.defines, vec!["B"]);
    }

    #[test]
    fn test_reject_reports_later_duplicates() {
        let report = run(
            &["/c /DA a.cpp\n", "/c /DB a.cpp\n"],
            DuplicatePolicy::Reject,
        );

        assert_eq!(report.invocations.len(), 1);
        assert_eq!(report.invocations[0].args.defines, vec!["A"]);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].reason,
            RecordError::DuplicateSource(_)
        ));
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("keep_all".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::KeepAll));
        assert_eq!("Last-Wins".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::LastWins));
        assert_eq!("reject".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Reject));
        assert!("first-wins".parse::<DuplicatePolicy>().is_err());
        assert_eq!(DuplicatePolicy::KeepAll.to_string(), "keep-all");
    }
}
