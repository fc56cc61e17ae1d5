use crate::formats::{save_json, DEFAULT_INVOCATIONS_FILE};
use crate::parse::{parse_batch, InvocationParser};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use anyhow::{Context, Result};

pub struct ParsePhase;

impl PipelinePhase for ParsePhase {
    fn name(&self) -> &'static str {
        "ParsePhase"
    }

    fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let logs = context
            .logs
            .as_ref()
            .context("Harvest results missing")?;

        let parser = InvocationParser::new(context.normalizer.clone());
        let report = parse_batch(&parser, logs.raw_invocations(), context.config.duplicates);

        if let Some(dir) = &context.intermediates_dir {
            save_json(&dir.join(DEFAULT_INVOCATIONS_FILE), &report.invocations)?;
        }

        context.report = Some(report);
        Ok(())
    }
}
