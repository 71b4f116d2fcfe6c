// Command-line entry point for rmlog.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rmlog::api::dto::RunSummaryDto;
use rmlog::application::{CleanupUsecase, WriteMode};
use rmlog::domain::rules::MatchRule;
use rmlog::infrastructure::{concurrency, Config, GoParser, GoPrinter, ProjectLoader};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove debug print statements from Go source files",
    long_about = None
)]
struct Cli {
    /// Go files or directories to clean
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Like --dry-run, but exit non-zero if any file would change
    #[arg(long)]
    check: bool,

    /// Print a JSON summary on stdout
    #[arg(long)]
    json: bool,

    /// Configuration file (default: ./rmlog.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra rule, `name` or `qualifier.member` (repeatable)
    #[arg(long = "rule", value_parser = clap::value_parser!(MatchRule))]
    rules: Vec<MatchRule>,

    /// Number of worker threads (default: one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            Config::discover(&cwd)?
        }
    };
    let mut rules = config.rule_set()?;
    rules.extend(cli.rules);
    if rules.is_empty() {
        anyhow::bail!("no rules configured: enable the defaults or pass --rule");
    }

    concurrency::init_thread_pool(cli.jobs)?;

    let files = ProjectLoader::new(config.walk.exclude.clone()).collect(&cli.paths)?;
    let mode = if cli.dry_run || cli.check {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };

    let usecase = CleanupUsecase {
        parser: &GoParser,
        printer: &GoPrinter,
        rules: &rules,
    };
    let results = usecase.process_all(&files, mode);
    let summary = RunSummaryDto::from_results(&results);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            eprintln!("Error: {}", err);
        }
        for report in results.iter().filter_map(|r| r.as_ref().ok()) {
            if report.changed {
                let verb = if report.written { "cleaned" } else { "would clean" };
                println!(
                    "{} {} ({} statements, {} comments)",
                    verb,
                    report.path.display(),
                    report.removed_statements,
                    report.removed_comments
                );
            }
        }
        if !summary.has_failures() {
            println!(
                "Done! {} file(s) processed, {} changed.",
                summary.processed, summary.changed
            );
        }
    }

    if summary.has_failures() || (cli.check && summary.changed > 0) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
