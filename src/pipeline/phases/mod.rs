pub mod emit;
pub mod harvest;
pub mod parse;

pub use emit::EmitPhase;
pub use harvest::HarvestPhase;
pub use parse::ParsePhase;
