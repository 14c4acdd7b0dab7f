mod config;
mod domain;
mod engine;
mod error;
mod input;
mod output;
mod report;
mod telemetry;

use std::path::{Path, PathBuf};

use tracing::info;

pub use config::{InsertChartConfig, Profile, QueryChartConfig, SeriesConfig};
pub use domain::{LogRecord, Marker, Rgb, Series, SeriesStyle};
pub use engine::{TrendCurve, downsample, project};
pub use error::Error;
pub use input::{
    LogPattern, PatternVariant, QueryStat, parse_query_stats, parse_records, read_log_file,
    read_optional_log_file, read_query_stats,
};
pub use output::{
    BarColors, CHART_SIZE, ChartSpec, OutputFormat, StagedOutput, export_points,
    export_query_deltas, render_bar_chart, render_line_chart,
};
pub use report::{
    QueryDelta, ReportEntry, ReportSet, RunParams, compare_queries, elapsed_hours, insert_title,
};
pub use telemetry::setup_logging;

/// Settings of one insert-rate comparison chart
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlotOptions {
    /// Checked to be positive before anything is read
    pub batch_size: i64,
    pub report_period: u64,
    pub input_dir: PathBuf,
    pub out_dir: PathBuf,
    pub pretty: bool,
    /// Degree of the fitted trend curve, `None` to plot the raw series only
    pub trend_degree: Option<usize>,
    pub downsample: Option<usize>,
    pub memory: Option<String>,
    pub layout: PatternVariant,
    /// Field plotted along x, defaults to the running row count of the layout
    pub x_field: Option<usize>,
    /// Field plotted along y, defaults to the row rate of the layout
    pub y_field: Option<usize>,
    pub format: OutputFormat,
    pub export_csv: bool,
}

impl Default for InsertPlotOptions {
    fn default() -> Self {
        Self {
            batch_size: 10000,
            report_period: 20000,
            input_dir: PathBuf::from("new_insert_no_debug"),
            out_dir: PathBuf::from("."),
            pretty: false,
            trend_degree: None,
            downsample: None,
            memory: None,
            layout: PatternVariant::Timed,
            x_field: None,
            y_field: None,
            format: OutputFormat::Svg,
            export_csv: false,
        }
    }
}

/// Settings of one query-latency comparison chart
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlotOptions {
    pub baseline: PathBuf,
    pub candidate: PathBuf,
    /// Names the comparison in the title and in the output file name
    pub label: String,
    pub out_dir: PathBuf,
    pub format: OutputFormat,
    pub export_csv: bool,
}

/// The supported degrees of trend curves
pub const TREND_DEGREES: std::ops::RangeInclusive<usize> = 2..=3;

pub fn validate_batch_size(batch_size: i64) -> Result<u64, Error> {
    u64::try_from(batch_size)
        .ok()
        .filter(|b| *b > 0)
        .ok_or_else(|| Error::Usage(format!("batch size must be > 0, got {batch_size}")))
}

/// Plots the insert rate of every series of the profile against the database size.
///
/// Reads `<input_dir>/<series dir>/load_<series file>_<batch size>_<report period>.log` for every
/// series, and writes `write_performance_<batch size>_<report period>[_<memory>]` into `out_dir`.
/// Returns the path of the written chart. Nothing is left behind when any step fails, the chart
/// and its CSV export only get their final names once both are complete.
///
/// # Example
///
/// ```no_run
/// use bench_report::{InsertPlotOptions, Profile, plot_inserts};
///
/// let options = InsertPlotOptions {
///     batch_size: 10000,
///     trend_degree: Some(3),
///     ..InsertPlotOptions::default()
/// };
/// let chart = plot_inserts(&options, &Profile::default()).unwrap();
/// println!("{}", chart.display());
/// ```
pub fn plot_inserts(options: &InsertPlotOptions, profile: &Profile) -> Result<PathBuf, Error> {
    let batch_size = validate_batch_size(options.batch_size)?;
    if options.report_period == 0 {
        return Err(Error::Usage("report period must be > 0".to_string()));
    }
    if let Some(degree) = options.trend_degree
        && !TREND_DEGREES.contains(&degree)
    {
        return Err(Error::Usage(format!(
            "trend degree must be 2 or 3, got {degree}"
        )));
    }

    let layout = options.layout;
    let (default_x, default_y) = layout.default_axes();
    let x_field = options.x_field.unwrap_or(default_x);
    let y_field = options.y_field.unwrap_or(default_y);
    for field in [x_field, y_field] {
        if field >= layout.field_count() {
            return Err(Error::Usage(format!(
                "field {field} does not exist, the {layout:?} layout has the fields {:?}",
                layout.field_names()
            )));
        }
    }

    let pattern = LogPattern::new(layout)?;
    let params = RunParams {
        batch_size,
        report_period: options.report_period,
        memory: options.memory.clone(),
    };

    let entries = profile
        .inserts
        .series
        .iter()
        .map(|config| {
            let path = config.log_path(&options.input_dir, batch_size, options.report_period);
            let records = if config.optional {
                read_optional_log_file(&path, &pattern)?.unwrap_or_default()
            } else {
                read_log_file(&path, &pattern)?
            };
            build_entry(config, &records, options, (x_field, y_field))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let report = ReportSet::build(&profile.inserts.title, &params, options.pretty, entries)?;

    let out = options
        .out_dir
        .join(insert_chart_name(&params, options.format));
    let spec = ChartSpec::new(
        report.title(),
        profile.inserts.x_label.as_str(),
        profile.inserts.y_label.as_str(),
        options.format,
    );
    let staged = StagedOutput::new(&out, options.export_csv)?;
    render_line_chart(&report, &spec, staged.chart_path())?;
    if let Some(csv) = staged.csv_path() {
        export_points(&report, csv)?;
    }
    let written = staged.commit()?;
    info!(path = %written.display(), "wrote insert chart");
    Ok(written)
}

fn build_entry(
    config: &SeriesConfig,
    records: &[LogRecord],
    options: &InsertPlotOptions,
    (x_field, y_field): (usize, usize),
) -> Result<ReportEntry, Error> {
    let hours = match options.layout.time_field() {
        Some(time) => elapsed_hours(&project(&config.label, records, time, time)?),
        None => 0.0,
    };

    let mut series = project(&config.label, records, x_field, y_field)?;
    if let Some(block) = options.downsample {
        series = downsample(&series, block)?;
    }

    let trend = match options.trend_degree {
        Some(degree) if !series.is_empty() => Some(TrendCurve::fit(&series, degree)?),
        _ => None,
    };
    info!(
        series = %config.label,
        points = series.len(),
        hours,
        "prepared series"
    );

    let entry = ReportEntry::new(series, config.style)
        .with_elapsed_hours(hours)
        .optional(config.optional);
    Ok(match trend {
        Some(trend) => entry.with_trend(trend),
        None => entry,
    })
}

fn insert_chart_name(params: &RunParams, format: OutputFormat) -> String {
    let memory = params
        .memory
        .as_deref()
        .map(|m| format!("_{}", file_safe(m)))
        .unwrap_or_default();
    format!(
        "write_performance_{}_{}{memory}.{}",
        params.batch_size,
        params.report_period,
        format.extension()
    )
}

/// Compares the mean latency per query type of two query benchmark runs as a bar chart.
///
/// Writes `query_performance_<label>` into `out_dir` and returns its path.
pub fn plot_queries(options: &QueryPlotOptions, profile: &Profile) -> Result<PathBuf, Error> {
    if options.label.trim().is_empty() {
        return Err(Error::Usage("the comparison label must not be empty".to_string()));
    }

    let baseline = read_query_stats(&options.baseline)?;
    let candidate = read_query_stats(&options.candidate)?;
    let deltas = compare_queries(&baseline, &candidate);
    if deltas.is_empty() {
        return Err(Error::InsufficientData {
            operation: "query comparison",
            message: format!(
                "{} and {} have no query type in common",
                options.baseline.display(),
                options.candidate.display()
            ),
        });
    }

    let config = &profile.queries;
    let spec = ChartSpec::new(
        format!("{}: {}", config.title, options.label),
        config.x_label.as_str(),
        "",
        options.format,
    );
    let out = query_chart_path(&options.out_dir, &options.label, options.format);
    let colors = BarColors {
        slower: config.slower,
        faster: config.faster,
    };
    let staged = StagedOutput::new(&out, options.export_csv)?;
    render_bar_chart(&deltas, &spec, colors, staged.chart_path())?;
    if let Some(csv) = staged.csv_path() {
        export_query_deltas(&deltas, csv)?;
    }
    let written = staged.commit()?;
    info!(path = %written.display(), "wrote query chart");
    Ok(written)
}

fn query_chart_path(out_dir: &Path, label: &str, format: OutputFormat) -> PathBuf {
    out_dir.join(format!(
        "query_performance_{}.{}",
        file_safe(label),
        format.extension()
    ))
}

fn file_safe(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
