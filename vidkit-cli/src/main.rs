// ============================================================================
// vidkit-cli/src/main.rs
// ============================================================================
//
// MAIN ENTRY POINT: parses arguments, sets up logging, dispatches commands
//
// Errors are printed once and turn into exit code 1.

use clap::Parser;
use vidkit_cli::logging::init_logging;
use vidkit_cli::output::print_error;
use vidkit_cli::{Cli, Commands, run_compress, run_info, run_options};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compress(args) => run_compress(args),
        Commands::Info(args) => run_info(args),
        Commands::Options => run_options(),
    };

    if let Err(e) = result {
        log::debug!("Command failed: {e:?}");
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
