use crate::formats::{DEFAULT_BUILD_FILE, DEFAULT_HARVEST_FILE, DEFAULT_INVOCATIONS_FILE};
use crate::harvest::LogEncoding;
use crate::parse::DuplicatePolicy;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Turn MSVC compiler tracking logs into a ninja build graph
#[derive(Parser, Debug)]
#[command(
    name = "tlog2ninja",
    about = "Turn MSVC compiler tracking logs into a ninja build graph",
    version,
    author,
    long_about = "tlog2ninja harvests the CL.command*.tlog files MSBuild leaves behind, \
                  recovers each compiler invocation (defines, include directories, output \
                  directory and source file) and writes a ninja build file that runs an \
                  external tool once per translation unit."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "human",
        help = "Summary format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Collect compiler invocation logs into a JSON file",
        long_about = "Walks a directory for compiler tracking logs, decodes them and writes \
                      every invocation record, grouped by log file, to a JSON file.\n\n\
                      Examples:\n  \
                      tlog2ninja harvest -d build/\n  \
                      tlog2ninja harvest -d build/ -f Release -o tlogs.json"
    )]
    Harvest(HarvestArgs),

    #[command(
        about = "Parse harvested records into compile invocations",
        long_about = "Reads a harvest file and extracts defines, include directories, the \
                      object output directory and the source file from every record.\n\n\
                      Examples:\n  \
                      tlog2ninja parse\n  \
                      tlog2ninja parse -i tlogs.json -o cmds.json --duplicates reject"
    )]
    Parse(ParseArgs),

    #[command(
        about = "Write a ninja build file from compile invocations",
        long_about = "Reads parsed invocations and writes one build edge per source file.\n\n\
                      Examples:\n  \
                      tlog2ninja emit\n  \
                      tlog2ninja emit -i cmds.json -o build.ninja -e /opt/bin/indexer"
    )]
    Emit(EmitArgs),

    #[command(
        about = "Harvest, parse and emit in one go",
        long_about = "Runs the whole pipeline from a log directory to a ninja build file.\n\n\
                      Examples:\n  \
                      tlog2ninja run -d build/\n  \
                      tlog2ninja run -d build/ -f Debug -o index.ninja --keep-intermediates"
    )]
    Run(RunArgs),
}

/// Where to look for logs and which ones to keep.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        help = "Directory searched recursively for invocation logs"
    )]
    pub dir: PathBuf,

    #[arg(
        short = 'p',
        long,
        value_name = "GLOB",
        help = "File name pattern for invocation logs [default: CL.command*.tlog]"
    )]
    pub pattern: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_name = "TEXT",
        help = "Only keep logs whose path contains this text"
    )]
    pub filter: Option<String>,

    #[arg(long, value_enum, help = "Log file encoding [default: utf-16le]")]
    pub encoding: Option<EncodingArg>,
}

#[derive(Args, Debug, Clone)]
pub struct HarvestArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        default_value = DEFAULT_HARVEST_FILE,
        help = "Harvest output file"
    )]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    #[arg(
        short = 'i',
        long,
        value_name = "FILE",
        default_value = DEFAULT_HARVEST_FILE,
        help = "Harvest file to read"
    )]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        default_value = DEFAULT_INVOCATIONS_FILE,
        help = "Invocations output file"
    )]
    pub output: PathBuf,

    #[arg(long, value_enum, help = "How to treat repeated source files [default: last-wins]")]
    pub duplicates: Option<DuplicatePolicyArg>,
}

#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    #[arg(
        short = 'i',
        long,
        value_name = "FILE",
        default_value = DEFAULT_INVOCATIONS_FILE,
        help = "Invocations file to read"
    )]
    pub input: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        default_value = DEFAULT_BUILD_FILE,
        help = "Ninja build file to write"
    )]
    pub output: PathBuf,

    #[arg(
        short = 'e',
        long = "executable",
        value_name = "TOOL",
        help = "Tool run for every source file [default: indexer]"
    )]
    pub tool: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        default_value = DEFAULT_BUILD_FILE,
        help = "Ninja build file to write"
    )]
    pub output: PathBuf,

    #[arg(
        short = 'e',
        long = "executable",
        value_name = "TOOL",
        help = "Tool run for every source file [default: indexer]"
    )]
    pub tool: Option<String>,

    #[arg(long, value_enum, help = "How to treat repeated source files [default: last-wins]")]
    pub duplicates: Option<DuplicatePolicyArg>,

    #[arg(
        long,
        help = "Also write tlogs.json and cmds.json next to the build file"
    )]
    pub keep_intermediates: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingArg {
    #[value(name = "utf-16le")]
    Utf16Le,
    #[value(name = "utf-8")]
    Utf8,
}

impl From<EncodingArg> for LogEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf16Le => LogEncoding::Utf16Le,
            EncodingArg::Utf8 => LogEncoding::Utf8,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicyArg {
    KeepAll,
    LastWins,
    Reject,
}

impl From<DuplicatePolicyArg> for DuplicatePolicy {
    fn from(arg: DuplicatePolicyArg) -> Self {
        match arg {
            DuplicatePolicyArg::KeepAll => DuplicatePolicy::KeepAll,
            DuplicatePolicyArg::LastWins => DuplicatePolicy::LastWins,
            DuplicatePolicyArg::Reject => DuplicatePolicy::Reject,
        }
    }
}
