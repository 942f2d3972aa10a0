pub mod handlers;

use crate::logging::{self, Verbosity};
use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use clap::error::ErrorKind;
use sar_core::error::{Result, SarError};
use std::process::ExitCode;
use tracing::{error, info};

/// Help-only invocations exit 0, setup failures 1, jobs that ran but failed 2.
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    let outcome = match cli.command {
        Commands::Build(args) => handlers::handle_build(args, &cli.fs_root),
        Commands::Search(args) => handlers::handle_search(args, &cli.fs_root),
        Commands::List {
            in_path,
            in_path_local,
        } => handlers::handle_list(in_path, in_path_local, &cli.fs_root),
    };

    match &outcome {
        Ok(true) => info!("completed successfully"),
        Ok(false) => error!("job failed to complete successfully"),
        Err(SarError::Argument(msg)) => {
            eprintln!("error: {msg}\n\nFor more information, try '--help'.")
        }
        Err(e) => error!(error = %e, "error running job"),
    }
    ExitCode::from(exit_status(&outcome))
}

/// Process status for a finished command: `Ok(success)` or a fatal error.
fn exit_status(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 2,
        Err(_) => 1,
    }
}
