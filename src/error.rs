//! Module defining the errors which are exposed to the users of the crate

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing command-line argument, e.g., a non-positive batch size
    #[error("usage error: {0}")]
    Usage(String),

    /// Input file missing or unreadable
    #[error("cannot access {}: {}", .path.display(), .source)]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An operation got an empty or too short series, e.g., a trend fit over two points
    #[error("insufficient data for {operation}: {message}")]
    InsufficientData {
        operation: &'static str,
        message: String,
    },

    /// Indexing outside of a record or into an empty series
    #[error("out of bounds in series '{label}': {message}")]
    Bounds { label: String, message: String },

    /// A report-line pattern failed to compile
    #[error("invalid report pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Malformed profile file
    #[error("invalid profile: {0}")]
    Config(#[from] toml::de::Error),

    /// The plotting backend failed to draw or write the chart
    #[error("rendering failed: {0}")]
    Render(String),

    /// The plotted points could not be written as CSV
    #[error("CSV export error: {0}")]
    Export(#[from] csv::Error),
}

pub(crate) fn insufficient_data(operation: &'static str, message: impl Into<String>) -> Error {
    Error::InsufficientData {
        operation,
        message: message.into(),
    }
}

pub(crate) fn bounds_error(label: impl Into<String>, message: impl Into<String>) -> Error {
    Error::Bounds {
        label: label.into(),
        message: message.into(),
    }
}

pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
    Error::FileAccess {
        path: path.into(),
        source,
    }
}

pub(crate) fn render_error(err: impl std::fmt::Display) -> Error {
    Error::Render(err.to_string())
}
