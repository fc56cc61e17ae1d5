use crate::formats::{save_json, DEFAULT_HARVEST_FILE};
use crate::harvest::LogHarvester;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::PipelinePhase;
use anyhow::Result;

pub struct HarvestPhase;

impl PipelinePhase for HarvestPhase {
    fn name(&self) -> &'static str {
        "HarvestPhase"
    }

    fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let logs = LogHarvester::new(&context.log_dir, &context.config.pattern)?
            .with_filter(context.filter.clone())
            .with_encoding(context.config.encoding)
            .harvest()?;

        if let Some(dir) = &context.intermediates_dir {
            save_json(&dir.join(DEFAULT_HARVEST_FILE), &logs)?;
        }

        context.logs = Some(logs);
        Ok(())
    }
}
