use anyhow::{Context, Result};
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};

use coverage_checker::cli::Cli;
use coverage_checker::config::Config;
use coverage_checker::report::ConsoleReporter;
use coverage_checker::{check_paths, discover_paths, load_report, CheckOptions, Threshold};

const LOG_ENV: &str = "COVERAGE_CHECKER_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse_lenient(std::env::args_os());

    let working_dir =
        std::env::current_dir().context("Could not determine the working directory")?;
    let config = Config::discover(&working_dir)?;

    let threshold = Threshold::parse(&cli.threshold);
    tracing::debug!("threshold {:.2}% on metric {}", threshold.value(), cli.metric);

    let report_path = working_dir.join(&cli.coverage_file);
    let root = load_report(&report_path, config.report.format, &working_dir)?;

    let paths = if cli.paths.is_empty() {
        let discovered = discover_paths(&root, &working_dir);
        tracing::debug!("discovered paths: {:?}", discovered);
        discovered
    } else {
        cli.paths
    };

    let options = CheckOptions {
        metric: cli.metric,
        threshold,
        working_dir,
        match_mode: config.paths.match_mode,
    };

    let mut reporter = ConsoleReporter::new();
    let summary = check_paths(&root, &paths, &options, &mut reporter);

    Ok(summary.exit_code())
}
