use std::path::PathBuf;

/// Coverage checker error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Report file missing or not readable
    #[error("Coverage report file \"{}\" is not readable or does not exist.", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report file exists but is not UTF-8 text
    #[error("Coverage report file \"{}\" is not valid UTF-8 text.", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Report content matches none of the supported formats
    #[error("could not detect coverage format of {} (supported: clover, cobertura, lcov)", .path.display())]
    UnknownFormat { path: PathBuf },

    /// Report content could not be parsed
    #[error("error parsing {format} report: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// Configuration file invalid
    #[error("config error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Coverage metric \"{0}\" is not supported yet.")]
    UnsupportedMetric(String),
}

/// Result type using the checker Error
pub type Result<T> = std::result::Result<T, Error>;
