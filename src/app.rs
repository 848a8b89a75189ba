//! Process plumbing for the CLI: exit codes, log output, operator hints.

use bmp_gateway::config::{ConfigError, field};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Exit codes reported by `bmp-gateway`.
pub mod exit_code {
    use std::process::ExitCode;

    /// The command finished and the platform accepted the message.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Settings were missing or invalid; nothing was sent.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// The send was rejected locally, by the platform, or by the network.
    #[must_use]
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Suggests `init` when the operator seems to have no configuration at all.
pub fn print_config_hint(error: &ConfigError) {
    const REQUIRED: [&str; 4] = [
        field::BASE_URL,
        field::ACCESS_TOKEN,
        field::SENDER,
        field::PLATFORM,
    ];

    let unconfigured = error.errors().into_iter().any(|e| match e {
        ConfigError::MissingRequired { field, .. } => REQUIRED.contains(field),
        ConfigError::FileRead { .. } => true,
        _ => false,
    });

    if unconfigured {
        eprintln!("\nRun 'bmp-gateway init' to generate a configuration template.");
    }
}

/// Installs the global subscriber; logs go to stderr so stdout stays JSON.
///
/// `RUST_LOG` directives take precedence over the configured level.
pub fn setup_tracing(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
