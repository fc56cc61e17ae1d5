//! Subcommand handlers
//!
//! Every handler prints its summary to stdout and returns the process exit
//! code: `0` on success, `1` when there was nothing to do, `3` on a fatal
//! error.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::cli::commands::{EmitArgs, HarvestArgs, ParseArgs, RunArgs, SourceArgs};
use crate::cli::output::OutputFormatter;
use crate::config::Tlog2NinjaConfig;
use crate::emit::emit;
use crate::error::HarvestError;
use crate::formats::{load_json, save_json};
use crate::harvest::{HarvestedLogs, LogHarvester};
use crate::parse::{parse_batch, CompileInvocation, InvocationParser, PathNormalizer};
use crate::pipeline::{PipelineContext, PipelineOrchestrator};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_EMPTY: i32 = 1;
pub const EXIT_FATAL: i32 = 3;

/// Maps a failed command to its exit code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    let empty = err.chain().any(|cause| {
        cause
            .downcast_ref::<HarvestError>()
            .is_some_and(HarvestError::is_empty_result)
    });
    if empty {
        EXIT_EMPTY
    } else {
        EXIT_FATAL
    }
}

pub fn handle_harvest(
    args: &HarvestArgs,
    config: Tlog2NinjaConfig,
    formatter: &OutputFormatter,
) -> i32 {
    finish(run_harvest(args, config, formatter))
}

pub fn handle_parse(args: &ParseArgs, config: Tlog2NinjaConfig, formatter: &OutputFormatter) -> i32 {
    finish(run_parse(args, config, formatter))
}

pub fn handle_emit(args: &EmitArgs, config: Tlog2NinjaConfig, formatter: &OutputFormatter) -> i32 {
    finish(run_emit(args, config, formatter))
}

pub fn handle_run(args: &RunArgs, config: Tlog2NinjaConfig, formatter: &OutputFormatter) -> i32 {
    finish(run_pipeline(args, config, formatter))
}

fn finish(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(err) => {
            let code = exit_code_for(&err);
            if code == EXIT_EMPTY {
                warn!("{:#}", err);
            } else {
                error!("{:#}", err);
            }
            eprintln!("Error: {:#}", err);
            code
        }
    }
}

fn apply_source_overrides(config: &mut Tlog2NinjaConfig, source: &SourceArgs) {
    if let Some(pattern) = &source.pattern {
        config.pattern = pattern.clone();
    }
    if let Some(encoding) = source.encoding {
        config.encoding = encoding.into();
    }
}

fn run_harvest(
    args: &HarvestArgs,
    mut config: Tlog2NinjaConfig,
    formatter: &OutputFormatter,
) -> Result<i32> {
    apply_source_overrides(&mut config, &args.source);
    config.validate()?;

    let logs = LogHarvester::new(&args.source.dir, &config.pattern)?
        .with_filter(args.source.filter.clone())
        .with_encoding(config.encoding)
        .harvest()?;

    save_json(&args.output, &logs)?;
    print!("{}", formatter.format_harvest(&logs, &args.output)?);

    Ok(EXIT_SUCCESS)
}

fn run_parse(args: &ParseArgs, mut config: Tlog2NinjaConfig, formatter: &OutputFormatter) -> Result<i32> {
    if let Some(duplicates) = args.duplicates {
        config.duplicates = duplicates.into();
    }
    config.validate()?;

    let logs: HarvestedLogs = load_json(&args.input)?;
    let normalizer =
        PathNormalizer::from_current_dir().context("Failed to resolve the working directory")?;
    let parser = InvocationParser::new(normalizer);
    let report = parse_batch(&parser, logs.raw_invocations(), config.duplicates);

    save_json(&args.output, &report.invocations)?;
    print!("{}", formatter.format_parse(&report, &args.output)?);

    Ok(if report.invocations.is_empty() {
        info!("No compile invocations recovered");
        EXIT_EMPTY
    } else {
        EXIT_SUCCESS
    })
}

fn run_emit(args: &EmitArgs, mut config: Tlog2NinjaConfig, formatter: &OutputFormatter) -> Result<i32> {
    if let Some(tool) = &args.tool {
        config.tool = tool.clone();
    }
    config.validate()?;

    let invocations: Vec<CompileInvocation> = load_json(&args.input)?;
    let summary = emit(&invocations, &config.tool, &args.output)?;
    print!("{}", formatter.format_emit(&summary)?);

    Ok(if summary.edges == 0 {
        EXIT_EMPTY
    } else {
        EXIT_SUCCESS
    })
}

fn run_pipeline(args: &RunArgs, mut config: Tlog2NinjaConfig, formatter: &OutputFormatter) -> Result<i32> {
    apply_source_overrides(&mut config, &args.source);
    if let Some(tool) = &args.tool {
        config.tool = tool.clone();
    }
    if let Some(duplicates) = args.duplicates {
        config.duplicates = duplicates.into();
    }
    config.validate()?;

    let normalizer =
        PathNormalizer::from_current_dir().context("Failed to resolve the working directory")?;
    let intermediates = args
        .keep_intermediates
        .then(|| intermediates_dir(&args.output));

    let mut context = PipelineContext::new(
        config,
        args.source.dir.clone(),
        args.output.clone(),
        normalizer,
    )
    .with_filter(args.source.filter.clone())
    .with_intermediates(intermediates);

    let summary = PipelineOrchestrator::new().execute(&mut context)?;
    print!("{}", formatter.format_run(&summary)?);

    Ok(if summary.edges == 0 {
        EXIT_EMPTY
    } else {
        EXIT_SUCCESS
    })
}

fn intermediates_dir(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
