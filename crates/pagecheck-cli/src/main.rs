mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{batch, check, completions, records, split, Context};
use crate::error::{exit_code_for, report_error};
use pagecheck_config as config;
use pagecheck_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(
    name = "pagecheck",
    version,
    about = "Verify contact names, job titles and phone numbers against web pages"
)]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load contact records from a CSV file
    Import(records::ImportArgs),
    /// Verify pending records against extracted page artifacts
    Run(batch::RunArgs),
    /// Verify a single record against one page file without the database
    Check(check::CheckArgs),
    List(records::ListArgs),
    /// Show one record with its verification result
    Show(records::ShowArgs),
    Status(records::StatusArgs),
    /// Return interrupted (and optionally failed) records to the queue
    Reset(records::ResetArgs),
    /// Write the verification report as CSV
    Export(records::ExportArgs),
    /// Split an input CSV into several files
    Split(split::SplitArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        Command::Split(args) => split::split(json, args),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path.clone()) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }

            let command = match command {
                Command::Check(args) => return check::check(json, &app_config, args),
                command => command,
            };

            let db_path =
                paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;

            if verbose {
                debug!(path = %db_path.display(), "database path resolved");
            }

            let store = Store::open(&db_path)
                .with_context(|| format!("open database {}", db_path.display()))?;
            store.migrate().with_context(|| "run migrations")?;

            let ctx = Context {
                store: &store,
                json,
                config: &app_config,
            };

            match command {
                Command::Import(args) => records::import(&ctx, args),
                Command::Run(args) => batch::run(&ctx, args),
                Command::List(args) => records::list(&ctx, args),
                Command::Show(args) => records::show(&ctx, args),
                Command::Status(args) => records::status(&ctx, args),
                Command::Reset(args) => records::reset(&ctx, args),
                Command::Export(args) => records::export(&ctx, args),
                Command::Check(_) => {
                    unreachable!("check command handled before store initialization")
                }
                Command::Split(_) => {
                    unreachable!("split command handled before store initialization")
                }
                Command::Completions(_) => {
                    unreachable!("completions command handled before store initialization")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
