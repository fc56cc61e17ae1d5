use tlog2ninja::cli::commands::{CliArgs, Commands};
use tlog2ninja::cli::handlers::{handle_emit, handle_harvest, handle_parse, handle_run, EXIT_FATAL};
use tlog2ninja::cli::OutputFormatter;
use tlog2ninja::util::{init_logging, LoggingConfig};
use tlog2ninja::{Tlog2NinjaConfig, VERSION};

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();

    let config = match Tlog2NinjaConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FATAL);
        }
    };

    init_logging(LoggingConfig::from_flags(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
        &config.log_level,
    ));

    debug!("tlog2ninja v{} starting", VERSION);
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {}", config);

    let formatter = OutputFormatter::new(args.format.into());
    let exit_code = match &args.command {
        Commands::Harvest(harvest_args) => handle_harvest(harvest_args, config, &formatter),
        Commands::Parse(parse_args) => handle_parse(parse_args, config, &formatter),
        Commands::Emit(emit_args) => handle_emit(emit_args, config, &formatter),
        Commands::Run(run_args) => handle_run(run_args, config, &formatter),
    };

    std::process::exit(exit_code);
}
