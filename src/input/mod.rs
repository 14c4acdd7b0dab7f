//! Module turning the text written by the load and query benchmarkers into numeric records.

use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind},
    path::Path,
};

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::LogRecord;
use crate::error::{Error, file_access};

mod queries;

pub use queries::{QueryStat, parse_query_stats, read_query_stats};


const TIMED_PATTERN: &str = r"^REPORT: time (?P<time>\d+) col rate (?P<col_rate>\d+\.\d+)/sec row rate (?P<row_rate>\d+\.\d+)/sec \(period\) (?P<period_rate>\d+\.\d+)/sec \(total\) total rows (?P<total_rows>\d+\.\d+[E0-9+]+)";

const UNTIMED_PATTERN: &str = r"^REPORT: col rate (?P<col_rate>\d+\.\d+)/sec row rate (?P<row_rate>\d+\.\d+)/sec \(period\) (?P<period_rate>\d+\.\d+)/sec \(total\) total rows (?P<total_rows>\d+\.\d+[E0-9+]+)";

/// The known layouts of insert report lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PatternVariant {
    /// `REPORT: time <unix secs> col rate .. row rate .. (period) .. (total) total rows ..`
    #[default]
    Timed,
    /// The older layout without the leading timestamp
    Untimed,
}

impl PatternVariant {
    fn pattern(self) -> &'static str {
        match self {
            PatternVariant::Timed => TIMED_PATTERN,
            PatternVariant::Untimed => UNTIMED_PATTERN,
        }
    }

    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            PatternVariant::Timed => &["time", "col_rate", "row_rate", "period_rate", "total_rows"],
            PatternVariant::Untimed => &["col_rate", "row_rate", "period_rate", "total_rows"],
        }
    }

    pub fn field_count(self) -> usize {
        self.field_names().len()
    }

    pub fn field_index(self, name: &str) -> Option<usize> {
        self.field_names().iter().position(|n| *n == name)
    }

    /// Index of the timestamp field, if the layout has one
    pub fn time_field(self) -> Option<usize> {
        self.field_index("time")
    }

    /// The `(x, y)` fields plotted by default: database size against insert rate
    pub fn default_axes(self) -> (usize, usize) {
        match self {
            PatternVariant::Timed => (4, 2),
            PatternVariant::Untimed => (3, 1),
        }
    }
}

/// A compiled report-line matcher for one [`PatternVariant`].
#[derive(Debug, Clone)]
pub struct LogPattern {
    variant: PatternVariant,
    regex: Regex,
}

impl LogPattern {
    pub fn new(variant: PatternVariant) -> Result<Self, Error> {
        Ok(Self {
            variant,
            regex: Regex::new(variant.pattern())?,
        })
    }

    pub fn variant(&self) -> PatternVariant {
        self.variant
    }

    /// Matches `line` from its start. Returns `None` for lines that are not report lines.
    pub fn match_line(&self, line: &[u8]) -> Option<LogRecord> {
        let captures = self.regex.captures(line)?;
        let fields = captures
            .iter()
            .skip(1)
            .map(|group| {
                let text = std::str::from_utf8(group?.as_bytes()).ok()?;
                text.parse::<f64>().ok()
            })
            .collect::<Option<Vec<_>>>();

        if fields.is_none() {
            debug!(
                line = %String::from_utf8_lossy(line),
                "report line matched but a field is not a number"
            );
        }
        fields.map(LogRecord::new)
    }
}

/// Parses the data provided by the reader and returns an iterator over the matching report lines.
/// Lines which do not match the pattern are skipped.
pub fn parse_records<'a>(
    reader: impl BufRead + 'a,
    pattern: &'a LogPattern,
) -> impl Iterator<Item = std::io::Result<LogRecord>> + 'a {
    reader.split(b'\n').filter_map(move |line| match line {
        Ok(line) => pattern.match_line(&line).map(Ok),
        Err(e) => Some(Err(e)),
    })
}

/// Reads all report lines of the log file at `path`.
///
/// A file without a single matching line is not an error, but is reported as a warning since it
/// usually means the wrong [`PatternVariant`] was selected.
pub fn read_log_file(path: &Path, pattern: &LogPattern) -> Result<Vec<LogRecord>, Error> {
    let file = File::open(path).map_err(|e| file_access(path, e))?;
    let records = parse_records(BufReader::new(file), pattern)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| file_access(path, e))?;

    if records.is_empty() {
        warn!(
            path = %path.display(),
            variant = ?pattern.variant(),
            "no line matches the report pattern, is the layout right?"
        );
    } else {
        debug!(path = %path.display(), records = records.len(), "parsed log file");
    }
    Ok(records)
}

/// Like [`read_log_file`], but a missing file yields `None` instead of an error.
pub fn read_optional_log_file(
    path: &Path,
    pattern: &LogPattern,
) -> Result<Option<Vec<LogRecord>>, Error> {
    match read_log_file(path, pattern) {
        Ok(records) => Ok(Some(records)),
        Err(Error::FileAccess { source, .. }) if source.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "optional log file not found, skipping");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
