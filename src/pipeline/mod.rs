//! Sequential harvest → parse → emit pipeline

pub mod context;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;

pub use context::PipelineContext;
pub use orchestrator::{PipelineOrchestrator, RunSummary};
pub use phase_trait::PipelinePhase;
