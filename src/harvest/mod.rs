//! Invocation log harvesting
//!
//! Finds compiler invocation logs (MSVC `CL.command.*.tlog` files) under a
//! build directory and decodes each one into its raw command-line records.

pub mod decode;
pub mod scanner;

pub use decode::{decode_log, split_records, LogEncoding};
pub use scanner::{harvest, LogHarvester};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One decoded log file: its absolute path and the command-line records it
/// holds, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationLog {
    pub path: PathBuf,
    pub records: Vec<String>,
}

impl InvocationLog {
    pub fn new(path: PathBuf, records: Vec<String>) -> Self {
        Self { path, records }
    }

    pub fn raw_invocations(&self) -> impl Iterator<Item = RawInvocation<'_>> {
        raw_invocations(&self.path, &self.records)
    }
}

/// A single unparsed command line and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInvocation<'a> {
    pub log_file: &'a Path,
    /// 1-based position among the log's retained records
    pub record: usize,
    pub text: &'a str,
}

fn raw_invocations<'a>(
    log_file: &'a Path,
    records: &'a [String],
) -> impl Iterator<Item = RawInvocation<'a>> {
    records
        .iter()
        .enumerate()
        .map(move |(index, text)| RawInvocation {
            log_file,
            record: index + 1,
            text,
        })
}

/// Harvest result keyed by absolute log path.
///
/// Serializes as a JSON object mapping each log path to its list of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HarvestedLogs {
    logs: BTreeMap<PathBuf, Vec<String>>,
}

impl HarvestedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, log: InvocationLog) {
        self.logs.insert(log.path, log.records);
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.logs.values().map(Vec::len).sum()
    }

    pub fn get(&self, path: &Path) -> Option<&[String]> {
        self.logs.get(path).map(Vec::as_slice)
    }

    pub fn log_files(&self) -> impl Iterator<Item = &Path> {
        self.logs.keys().map(PathBuf::as_path)
    }

    /// Every record of every log, logs in path order and records in file order.
    pub fn raw_invocations(&self) -> impl Iterator<Item = RawInvocation<'_>> {
        self.logs
            .iter()
            .flat_map(|(path, records)| raw_invocations(path, records))
    }
}

impl FromIterator<InvocationLog> for HarvestedLogs {
    fn from_iter<I: IntoIterator<Item = InvocationLog>>(iter: I) -> Self {
        let mut logs = HarvestedLogs::new();
        for log in iter {
            logs.insert(log);
        }
        logs
    }
}
