//! Parsing of the per-query summary lines printed by the query benchmarker

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::error::{Error, file_access};

/// `min: ..ms (../sec), mean: ..ms (../sec), max: ..ms (../sec)[, count: ..][, stddev: ..], sum: ..sec`
const STATS: &str = r"min:\s*(?P<min>\d+\.\d+)ms \([^)]*\), mean:\s*(?P<mean>\d+\.\d+)ms \([^)]*\), max:\s*(?P<max>\d+\.\d+)ms \([^)]*\)(?:, count:\s*(?P<count>\d+))?(?:, stddev:\s*(?P<stddev>\d+\.\d+)(?:ms)?)?, sum:\s*(?P<sum>\d+\.\d+)sec";

/// Query name on its own line, as printed before an indented stats line
const HEADER_PATTERN: &str = r"^(?P<name>\S.*?)\s*:\s*$";

/// Latency summary of one query type
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStat {
    pub name: String,
    pub min_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
    /// Only printed by some benchmarkers
    pub count: Option<u64>,
    pub stddev_ms: Option<f64>,
    pub sum_secs: f64,
}

/// The two summary layouts of the query benchmarkers: `<name> : <stats>` on one line, or
/// `<name>:` followed by an indented `<stats>` line.
struct SummaryPatterns {
    inline: Regex,
    stats: Regex,
    header: Regex,
}

impl SummaryPatterns {
    fn new() -> Result<Self, Error> {
        Ok(Self {
            inline: Regex::new(&format!(r"^(?P<name>.*?)\s*: {STATS}"))?,
            stats: Regex::new(&format!(r"^\s*{STATS}"))?,
            header: Regex::new(HEADER_PATTERN)?,
        })
    }
}

/// Parses the summary lines from `reader`.
///
/// The benchmarker prints running summaries before the final one, so when a query name shows up
/// more than once the last summary wins. The order of first appearance is kept.
pub fn parse_query_stats(reader: impl BufRead) -> Result<Vec<QueryStat>, Error> {
    let patterns = SummaryPatterns::new()?;
    let mut stats: Vec<QueryStat> = Vec::new();
    let mut pending_name: Option<String> = None;

    for line in reader.lines() {
        let line = line.map_err(|e| file_access("<query stats>", e))?;
        let header = pending_name.take();

        let stat = if let Some(caps) = patterns.inline.captures(&line) {
            caps.name("name").and_then(|name| to_stat(name.as_str(), &caps))
        } else if let Some(caps) = patterns.stats.captures(&line) {
            header.and_then(|name| to_stat(&name, &caps))
        } else {
            pending_name = patterns
                .header
                .captures(&line)
                .and_then(|caps| caps.name("name"))
                .map(|name| name.as_str().to_string());
            None
        };

        let Some(stat) = stat else {
            continue;
        };
        match stats.iter_mut().find(|s| s.name == stat.name) {
            Some(existing) => *existing = stat,
            None => stats.push(stat),
        }
    }
    Ok(stats)
}

pub fn read_query_stats(path: &Path) -> Result<Vec<QueryStat>, Error> {
    let file = File::open(path).map_err(|e| file_access(path, e))?;
    let stats = parse_query_stats(BufReader::new(file)).map_err(|e| match e {
        Error::FileAccess { source, .. } => file_access(path, source),
        other => other,
    })?;

    if stats.is_empty() {
        warn!(path = %path.display(), "no query summary line found");
    } else {
        debug!(path = %path.display(), queries = stats.len(), "parsed query stats");
    }
    Ok(stats)
}

fn to_stat(name: &str, caps: &Captures<'_>) -> Option<QueryStat> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let number = |group: &str| caps.name(group)?.as_str().parse::<f64>().ok();
    Some(QueryStat {
        name: name.to_string(),
        min_ms: number("min")?,
        mean_ms: number("mean")?,
        max_ms: number("max")?,
        count: match caps.name("count") {
            Some(count) => Some(count.as_str().parse().ok()?),
            None => None,
        },
        stddev_ms: match caps.name("stddev") {
            Some(_) => Some(number("stddev")?),
            None => None,
        },
        sum_secs: number("sum")?,
    })
}
