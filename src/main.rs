//! BMP Gateway: outbound business-messaging client
//!
//! Entry point for the bmp-gateway application.

use bmp_gateway::config::{Cli, Command, SendCommand, Settings, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Parses arguments, resolves settings and performs one command.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let command = match &cli.command {
        Command::Init { output } => return handle_init(output),
        Command::Send(command) => command,
    };

    let settings = match Settings::load(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(settings.log_level);
    tracing::debug!("{settings}");

    run_application(&settings, command)
}

/// Writes the configuration template for `init`.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Wrote configuration template to {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Sends one message on a single-threaded runtime and prints the reply JSON.
#[cfg(not(tarpaulin_include))]
fn run_application(settings: &Settings, command: &SendCommand) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(settings, command)) {
        Ok(output) => {
            println!("{output}");
            exit_code::SUCCESS
        }
        Err(e) => {
            tracing::error!("Send failed: {e}");
            eprintln!("Error: {e}");
            exit_code::runtime_error()
        }
    }
}
