use super::decode::{decode_log, split_records, LogEncoding};
use super::{HarvestedLogs, InvocationLog};
use crate::error::HarvestError;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Walks a build directory for invocation logs and decodes them.
pub struct LogHarvester {
    root: PathBuf,
    pattern: Pattern,
    filter: Option<String>,
    encoding: LogEncoding,
}

impl LogHarvester {
    pub fn new(root: impl Into<PathBuf>, pattern: &str) -> Result<Self, HarvestError> {
        let root = root.into();
        if !root.exists() {
            return Err(HarvestError::DirectoryNotFound(root));
        }
        if !root.is_dir() {
            return Err(HarvestError::NotADirectory(root));
        }

        let root = root
            .canonicalize()
            .map_err(|source| HarvestError::ReadFailed {
                path: root.clone(),
                source,
            })?;

        let pattern = Pattern::new(pattern).map_err(|e| HarvestError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        debug!(root = %root.display(), pattern = %pattern, "LogHarvester initialized");

        Ok(Self {
            root,
            pattern,
            filter: None,
            encoding: LogEncoding::default(),
        })
    }

    /// Keeps only logs whose absolute path contains `filter`, e.g. `Release`.
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    pub fn with_encoding(mut self, encoding: LogEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths of the logs to harvest, in walk order.
    pub fn discover(&self) -> Result<Vec<PathBuf>, HarvestError> {
        let mut matches = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() && !entry.path().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !self.pattern.matches(name) {
                continue;
            }

            let resolved = entry
                .path()
                .canonicalize()
                .map_err(|source| HarvestError::ReadFailed {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
            debug!(path = %resolved.display(), "Matched log file");
            matches.push(resolved);
        }

        if matches.is_empty() {
            return Err(HarvestError::NoMatches {
                pattern: self.pattern.to_string(),
                dir: self.root.clone(),
            });
        }

        if let Some(filter) = &self.filter {
            let before = matches.len();
            matches.retain(|path| path.to_string_lossy().contains(filter.as_str()));
            debug!(filter = %filter, before, after = matches.len(), "Applied path filter");

            if matches.is_empty() {
                return Err(HarvestError::FilteredOut {
                    filter: filter.clone(),
                });
            }
        }

        Ok(matches)
    }

    pub fn harvest(&self) -> Result<HarvestedLogs, HarvestError> {
        let start = Instant::now();
        info!(
            root = %self.root.display(),
            pattern = %self.pattern,
            filter = ?self.filter,
            "Starting log harvest"
        );

        let mut logs = HarvestedLogs::new();
        for path in self.discover()? {
            let log = read_log(&path, self.encoding)?;
            info!(
                file = %log.path.display(),
                records = log.records.len(),
                "Harvested log"
            );
            logs.insert(log);
        }

        info!(
            logs = logs.len(),
            records = logs.record_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Log harvest completed"
        );

        Ok(logs)
    }
}

/// Reads and decodes a single invocation log.
pub fn read_log(path: &Path, encoding: LogEncoding) -> Result<InvocationLog, HarvestError> {
    let bytes = fs::read(path).map_err(|source| HarvestError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_log(&bytes, encoding).map_err(|message| HarvestError::Decode {
        path: path.to_path_buf(),
        message,
    })?;

    Ok(InvocationLog::new(path.to_path_buf(), split_records(&text)))
}

/// Harvests `root_dir` with the default UTF-16LE encoding.
pub fn harvest(
    root_dir: impl Into<PathBuf>,
    pattern: &str,
    filter: Option<&str>,
) -> Result<HarvestedLogs, HarvestError> {
    LogHarvester::new(root_dir, pattern)?
        .with_filter(filter.map(str::to_string))
        .harvest()
}
