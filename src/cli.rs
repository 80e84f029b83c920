use crate::commands;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "safe-log-fixer",
    version,
    about = "Rewrite console.log/error/warn to sanitizing safeLog/safeError/safeWarn"
)]
struct Cli {
    /// Increase verbosity (-v, -vv). Uses RUST_LOG under the hood
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite unsafe logging calls in place and add the missing import
    Fix {
        /// Path to safe-log-fixer.toml (defaults to current directory)
        #[arg(long)]
        config: Option<String>,
        /// Exit non-zero when any file could not be processed
        #[arg(long)]
        strict: bool,
        /// Print the run summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Report files that `fix` would change, without writing
    Check {
        #[arg(long)]
        config: Option<String>,
        /// Exit non-zero when any file still needs rewriting or errored
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    // stdout carries the report; a second init (tests) is a no-op
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fix {
            config,
            strict,
            json,
        } => commands::fix(config.as_deref(), strict, json)?,
        Commands::Check {
            config,
            strict,
            json,
        } => commands::check(config.as_deref(), strict, json)?,
    }

    Ok(())
}

pub fn run_cli() -> Result<()> {
    dispatch(Cli::parse())
}

pub fn run_cli_with<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    dispatch(Cli::try_parse_from(args)?)
}
