use super::context::PipelineContext;
use anyhow::Result;

/// One stage of the pipeline. A phase consumes the full output of the
/// previous phase from the context and stores its own full output there.
pub trait PipelinePhase {
    fn name(&self) -> &'static str;

    fn execute(&self, context: &mut PipelineContext) -> Result<()>;
}
