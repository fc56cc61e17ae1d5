use crate::emit::emit;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use anyhow::{Context, Result};

pub struct EmitPhase;

impl PipelinePhase for EmitPhase {
    fn name(&self) -> &'static str {
        "EmitPhase"
    }

    fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let report = context
            .report
            .as_ref()
            .context("Parse results missing")?;

        let summary = emit(&report.invocations, &context.config.tool, &context.output)?;
        context.emitted = Some(summary);
        Ok(())
    }
}
