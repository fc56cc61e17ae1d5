pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, EmitArgs, HarvestArgs, ParseArgs, RunArgs};
pub use output::{OutputFormat, OutputFormatter};
