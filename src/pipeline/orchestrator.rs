use super::context::PipelineContext;
use super::phase_trait::PipelinePhase;
use super::phases::{EmitPhase, HarvestPhase, ParsePhase};
use crate::parse::RecordFailure;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Counts and outcomes of a complete pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub logs: usize,
    pub records: usize,
    pub invocations: usize,
    pub duplicates: usize,
    pub failures: Vec<RecordFailure>,
    pub build_file: PathBuf,
    pub edges: usize,
}

pub struct PipelineOrchestrator;

impl Default for PipelineOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineOrchestrator {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, context: &mut PipelineContext) -> Result<RunSummary> {
        let start = Instant::now();
        info!(
            log_dir = %context.log_dir.display(),
            output = %context.output.display(),
            "Starting tlog2ninja pipeline"
        );

        let phases: Vec<Box<dyn PipelinePhase>> = vec![
            Box::new(HarvestPhase),
            Box::new(ParsePhase),
            Box::new(EmitPhase),
        ];

        for phase in phases {
            let phase_name = phase.name();
            info!(phase = %phase_name, "Starting phase");

            let phase_start = Instant::now();
            phase
                .execute(context)
                .with_context(|| format!("Phase {} failed", phase_name))?;

            info!(
                phase = %phase_name,
                duration_ms = phase_start.elapsed().as_millis(),
                "Phase complete"
            );
        }

        let summary = summarize(context)?;
        info!(
            invocations = summary.invocations,
            failures = summary.failures.len(),
            edges = summary.edges,
            total_time_ms = start.elapsed().as_millis(),
            "Pipeline complete"
        );

        Ok(summary)
    }
}

fn summarize(context: &PipelineContext) -> Result<RunSummary> {
    let logs = context.logs.as_ref().context("Harvest results missing")?;
    let report = context.report.as_ref().context("Parse results missing")?;
    let emitted = context.emitted.as_ref().context("Emit results missing")?;

    Ok(RunSummary {
        logs: logs.len(),
        records: logs.record_count(),
        invocations: report.invocations.len(),
        duplicates: report.duplicates,
        failures: report.failures.clone(),
        build_file: emitted.path.clone(),
        edges: emitted.edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tlog2NinjaConfig;
    use crate::error::HarvestError;
    use crate::parse::PathNormalizer;
    use std::fs;
    use tempfile::TempDir;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn context(temp: &TempDir) -> PipelineContext {
        PipelineContext::new(
            Tlog2NinjaConfig::builtin(),
            temp.path().join("logs"),
            temp.path().join("build.ninja"),
            PathNormalizer::new(temp.path()),
        )
    }

    #[test]
    fn test_pipeline_runs_all_phases() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("logs")).unwrap();
        fs::write(
            temp.path().join("logs/CL.command.1.tlog"),
            utf16le("\u{feff}^HEADER\r\n/c /DA a.cpp\r\n/c /DB b.cpp\r\n"),
        )
        .unwrap();

        let mut ctx = context(&temp).with_intermediates(Some(temp.path().to_path_buf()));
        let summary = PipelineOrchestrator::new().execute(&mut ctx).unwrap();

        assert_eq!(summary.logs, 1);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.invocations, 2);
        assert_eq!(summary.edges, 2);
        assert!(summary.failures.is_empty());
        assert!(temp.path().join("build.ninja").exists());
        assert!(temp.path().join("tlogs.json").exists());
        assert!(temp.path().join("cmds.json").exists());
    }

    #[test]
    fn test_empty_result_is_detectable_through_context() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("logs")).unwrap();

        let mut ctx = context(&temp);
        let err = PipelineOrchestrator::new().execute(&mut ctx).unwrap_err();

        let harvest_err = err.downcast_ref::<HarvestError>().unwrap();
        assert!(harvest_err.is_empty_result());
        assert!(format!("{:#}", err).contains("HarvestPhase"));
        assert!(!temp.path().join("build.ninja").exists());
    }
}
