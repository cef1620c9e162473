//! Command-line arguments

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "coverage-checker")]
#[command(about = "Check a code coverage report against a minimum threshold per path")]
#[command(version)]
#[command(
    after_help = "Exit status is the number of failing paths. Shells only see it modulo 256 on Unix, so 256 failures read as 0; parse the [ERROR] lines when checking that many paths."
)]
pub struct Cli {
    /// Coverage report, relative to the working directory (Clover, Cobertura or LCOV)
    pub coverage_file: PathBuf,

    /// Metric to check: line, method or class
    pub metric: String,

    /// Minimum coverage in percent, clamped to 0..=100
    #[arg(allow_hyphen_values = true)]
    pub threshold: String,

    /// Project-relative paths to check (default: top-level report directories)
    pub paths: Vec<String>,
}

impl Cli {
    /// Parse arguments after dropping `--` options
    pub fn parse_lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Cli::parse_from(strip_options(args))
    }
}

/// Drop every argument from the first `--` option onwards.
///
/// Options are accepted for compatibility with wrappers that append them,
/// but they carry no meaning.
pub fn strip_options<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .take_while(|arg| !arg.to_string_lossy().starts_with("--"))
        .collect()
}
