//! Module combining the series of the compared systems into one report, with the summaries shown in
//! the chart title.

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    domain::{Series, SeriesStyle},
    engine::TrendCurve,
    error::{Error, bounds_error, insufficient_data},
    input::QueryStat,
};


const SECONDS_PER_HOUR: f64 = 3600.0;

/// Parameters of the benchmark run, only used for annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub batch_size: u64,
    pub report_period: u64,
    pub memory: Option<String>,
}

/// Hours between the first and the last `x` of a series whose `x` is a timestamp in seconds.
/// An empty series took zero hours.
pub fn elapsed_hours(timeline: &Series) -> f64 {
    match (timeline.first(), timeline.last()) {
        (Some((first, _)), Some((last, _))) => (last - first) / SECONDS_PER_HOUR,
        _ => 0.0,
    }
}

/// One compared system in a [`ReportSet`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    series: Series,
    trend: Option<TrendCurve>,
    style: SeriesStyle,
    elapsed_hours: f64,
    optional: bool,
}

impl ReportEntry {
    pub fn new(series: Series, style: SeriesStyle) -> Self {
        Self {
            series,
            trend: None,
            style,
            elapsed_hours: 0.0,
            optional: false,
        }
    }

    pub fn with_trend(mut self, trend: TrendCurve) -> Self {
        self.trend = Some(trend);
        self
    }

    pub fn with_elapsed_hours(mut self, hours: f64) -> Self {
        self.elapsed_hours = hours;
        self
    }

    /// Marks the entry as a baseline that may be missing
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn label(&self) -> &str {
        self.series.label()
    }

    pub fn trend(&self) -> Option<&TrendCurve> {
        self.trend.as_ref()
    }

    pub fn style(&self) -> &SeriesStyle {
        &self.style
    }

    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_hours
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// The compared series of one chart together with its title
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSet {
    title: String,
    entries: Vec<ReportEntry>,
}

impl ReportSet {
    ///
    /// Assembles the report. A required entry without points is an error, an optional one is kept
    /// for the title but will not be drawn.
    ///
    pub fn build(
        title_prefix: &str,
        params: &RunParams,
        pretty: bool,
        entries: Vec<ReportEntry>,
    ) -> Result<Self, Error> {
        if let Some(entry) = entries
            .iter()
            .find(|e| !e.optional && e.series.is_empty())
        {
            return Err(bounds_error(
                entry.label(),
                "required series has no report lines",
            ));
        }
        if entries.iter().all(|e| e.series.is_empty()) {
            return Err(insufficient_data("report", "no series has any points"));
        }

        let title = insert_title(title_prefix, params, pretty, &entries);
        debug!(%title, series = entries.len(), "built report");
        Ok(Self { title, entries })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Entries which have points to draw
    pub fn plotted(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| !e.series.is_empty())
    }
}

/// `"<prefix>: <batch size>"`, followed by the memory label and per-series hours unless `pretty`
pub fn insert_title(
    prefix: &str,
    params: &RunParams,
    pretty: bool,
    entries: &[ReportEntry],
) -> String {
    let mut title = format!("{prefix}: {}", params.batch_size);
    if pretty {
        return title;
    }
    if let Some(memory) = &params.memory {
        title.push_str(&format!(", memory {memory}"));
    }
    for entry in entries {
        title.push_str(&format!(", {} {:.1} h", entry.label(), entry.elapsed_hours));
    }
    title
}

/// Change of the mean latency of one query type between two runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDelta {
    pub name: String,
    pub baseline_ms: f64,
    pub candidate_ms: f64,
    /// `(candidate - baseline) / baseline * 100`, positive when the candidate is slower
    pub percent: f64,
}

///
/// Pairs the query types present in both runs, in the order of the baseline.
/// Query types only present in one run, or with a zero baseline mean, are skipped.
///
pub fn compare_queries(baseline: &[QueryStat], candidate: &[QueryStat]) -> Vec<QueryDelta> {
    for stat in candidate {
        if !baseline.iter().any(|b| b.name == stat.name) {
            warn!(query = %stat.name, "query only present in the candidate run, skipping");
        }
    }

    baseline
        .iter()
        .filter_map(|base| {
            let Some(cand) = candidate.iter().find(|c| c.name == base.name) else {
                warn!(query = %base.name, "query only present in the baseline run, skipping");
                return None;
            };
            if base.mean_ms == 0.0 {
                warn!(query = %base.name, "baseline mean latency is zero, skipping");
                return None;
            }
            Some(QueryDelta {
                name: base.name.clone(),
                baseline_ms: base.mean_ms,
                candidate_ms: cand.mean_ms,
                percent: (cand.mean_ms - base.mean_ms) / base.mean_ms * 100.0,
            })
        })
        .collect()
}
