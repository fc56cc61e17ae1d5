use crate::config::Tlog2NinjaConfig;
use crate::emit::EmitSummary;
use crate::harvest::HarvestedLogs;
use crate::parse::{ParseReport, PathNormalizer};
use std::path::PathBuf;

/// Inputs of one pipeline run and the results each phase leaves behind.
#[derive(Debug)]
pub struct PipelineContext {
    pub config: Tlog2NinjaConfig,
    pub log_dir: PathBuf,
    pub filter: Option<String>,
    pub output: PathBuf,
    pub normalizer: PathNormalizer,
    /// Directory for `tlogs.json` and `cmds.json` dumps, if wanted
    pub intermediates_dir: Option<PathBuf>,

    pub logs: Option<HarvestedLogs>,
    pub report: Option<ParseReport>,
    pub emitted: Option<EmitSummary>,
}

impl PipelineContext {
    pub fn new(
        config: Tlog2NinjaConfig,
        log_dir: PathBuf,
        output: PathBuf,
        normalizer: PathNormalizer,
    ) -> Self {
        Self {
            config,
            log_dir,
            filter: None,
            output,
            normalizer,
            intermediates_dir: None,
            logs: None,
            report: None,
            emitted: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_intermediates(mut self, dir: Option<PathBuf>) -> Self {
        self.intermediates_dir = dir;
        self
    }
}
