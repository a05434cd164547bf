//! backoff-retry
//!
//! Runs a command and retries it with exponential backoff while it fails.
//!
//! ```text
//! backoff-retry [--config FILE] [--retries N] [--wait-ratio MS]
//!               [--jitter | --no-jitter] [--maximum-backoff MS] -- PROGRAM [ARGS..]
//! ```
//!
//! A non-zero exit status or a failure to spawn counts as a failed attempt.
//! On exhaustion the process exits with the last exit code of the program.

use std::path::PathBuf;
use std::process::{ExitCode, ExitStatus};

use clap::Parser;
use thiserror::Error;
use tokio::process::Command;

use backoff_retry::config::loader::load_options;
use backoff_retry::observability::logging::{init_logging, DEFAULT_FILTER};
use backoff_retry::{retry, RetryOptions};

/// Exit code for unusable configuration.
const CONFIG_EXIT_CODE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "backoff-retry")]
#[command(about = "Run a command, retrying failures with exponential backoff", long_about = None)]
struct Cli {
    /// TOML file with retry options; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of retries after the first attempt (0-64)
    #[arg(short, long, allow_negative_numbers = true)]
    retries: Option<i64>,

    /// Base multiplier for backoff in milliseconds (0-60000)
    #[arg(short, long, allow_negative_numbers = true)]
    wait_ratio: Option<f64>,

    /// Wait a random fraction of the exponential value
    #[arg(long, overrides_with = "no_jitter")]
    jitter: bool,

    /// Wait exactly the exponential value instead of a random fraction of it
    #[arg(long, overrides_with = "jitter")]
    no_jitter: bool,

    /// Upper bound on any single wait in milliseconds
    #[arg(short, long, allow_negative_numbers = true)]
    maximum_backoff: Option<f64>,

    /// Program to run, followed by its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

impl Cli {
    /// Options given on the command line.
    fn options(&self) -> RetryOptions {
        RetryOptions {
            wait_ratio: self.wait_ratio,
            retries: self.retries,
            jitter: self.jitter_override(),
            maximum_backoff: self.maximum_backoff,
        }
    }

    /// `None` when neither jitter flag was given; the last one given wins.
    fn jitter_override(&self) -> Option<bool> {
        match (self.jitter, self.no_jitter) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Why one run of the program failed.
#[derive(Debug, Error)]
enum CommandError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },
}

impl CommandError {
    fn exit_code(&self) -> u8 {
        match self {
            CommandError::Exit { status, .. } => status
                .code()
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1),
            CommandError::Spawn { .. } => 1,
        }
    }
}

async fn run_command(program: &str, args: &[String], attempt: u32) -> Result<(), CommandError> {
    tracing::info!(program, attempt, "Running command");

    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| CommandError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        let err = CommandError::Exit {
            program: program.to_string(),
            status,
        };
        tracing::warn!(attempt, error = %err, "Command failed");
        Err(err)
    }
}

/// Run the command under the retry policy and return the process exit code.
async fn execute(cli: Cli) -> u8 {
    let file_options = match &cli.config {
        Some(path) => match load_options(path) {
            Ok(options) => options,
            Err(e) => {
                tracing::error!(path = ?path, error = %e, "Failed to load retry options");
                return CONFIG_EXIT_CODE;
            }
        },
        None => RetryOptions::default(),
    };
    let options = file_options.merge(cli.options());

    let Some((program, args)) = cli.command.split_first() else {
        tracing::error!("No command given");
        return CONFIG_EXIT_CODE;
    };

    let runner = match retry(
        move |_: (), attempt| run_command(program, args, attempt),
        options,
    ) {
        Ok(runner) => runner,
        Err(e) => {
            tracing::error!(error = %e, "Invalid retry options");
            return CONFIG_EXIT_CODE;
        }
    };

    let config = runner.config();
    tracing::debug!(
        wait_ratio = config.wait_ratio,
        retries = config.retries,
        jitter = config.jitter,
        maximum_backoff = config.maximum_backoff,
        "Retry policy resolved"
    );

    match runner.run().await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, cause = %e.last_error(), "Giving up");
            e.last_error().exit_code()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging(DEFAULT_FILTER);

    let cli = Cli::parse();
    ExitCode::from(execute(cli).await)
}
