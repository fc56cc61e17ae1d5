//! tlog2ninja - build graphs from MSVC compiler tracking logs
//!
//! MSBuild records every `cl.exe` invocation in `CL.command.*.tlog` files.
//! This crate recovers those invocations and turns them into a ninja build
//! file that runs an external tool (typically a source indexer) once per
//! translation unit, with the same defines and include directories the
//! compiler saw.
//!
//! # Pipeline
//!
//! 1. [`harvest`]: find and decode the logs under a build directory
//! 2. [`parse`]: extract defines, include directories, the object output
//!    directory and the source file from every record
//! 3. [`emit`]: write one `COMPILE` build edge per source file
//!
//! Each stage can also be run on its own through the JSON files in
//! [`formats`], or all three in sequence through [`pipeline`].
//!
//! # Example Usage
//!
//! ```no_run
//! use tlog2ninja::harvest::harvest;
//! use tlog2ninja::parse::{parse_batch, DuplicatePolicy, InvocationParser, PathNormalizer};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let logs = harvest("build", "CL.command*.tlog", Some("Release"))?;
//! let parser = InvocationParser::new(PathNormalizer::from_current_dir()?);
//! let report = parse_batch(&parser, logs.raw_invocations(), DuplicatePolicy::LastWins);
//! tlog2ninja::emit::emit(&report.invocations, "indexer", Path::new("build.ninja"))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod formats;
pub mod harvest;
pub mod parse;
pub mod pipeline;
pub mod util;

pub use config::{ConfigError, Tlog2NinjaConfig};
pub use emit::EmitSummary;
pub use error::{EmitError, FormatError, HarvestError, RecordError};
pub use harvest::{HarvestedLogs, LogEncoding, LogHarvester};
pub use parse::{CompileArgs, CompileInvocation, DuplicatePolicy, InvocationParser, ParseReport};
pub use pipeline::{PipelineContext, PipelineOrchestrator, RunSummary};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
