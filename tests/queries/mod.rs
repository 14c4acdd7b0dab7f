//! Integration tests for the query latency comparison

use std::path::Path;

use bench_report::{Error, OutputFormat, Profile, QueryPlotOptions, plot_queries};
use claims::{assert_matches, assert_ok};

use crate::{data_dir, file_names};

fn options(out_dir: &Path) -> QueryPlotOptions {
    QueryPlotOptions {
        baseline: data_dir().join("queries").join("baseline.out"),
        candidate: data_dir().join("queries").join("candidate.out"),
        label: "pg vs ts".to_string(),
        out_dir: out_dir.to_path_buf(),
        format: OutputFormat::Svg,
        export_csv: false,
    }
}

#[test]
fn compares_mean_latency_per_query_type() {
    let out = tempfile::tempdir().unwrap();

    let chart = assert_ok!(plot_queries(&options(out.path()), &Profile::default()));

    assert_eq!(chart, out.path().join("query_performance_pg_vs_ts.svg"));
    let svg = std::fs::read_to_string(&chart).unwrap();
    assert!(svg.contains("Mean query latency: pg vs ts"));
    assert!(svg.contains("-25.0%"));
    assert!(svg.contains("+25.0%"));
    assert!(svg.contains("+0.0%"));
    assert!(svg.contains("+3.8%"));
}

#[test]
fn exports_the_deltas_in_baseline_order() {
    let out = tempfile::tempdir().unwrap();
    let options = QueryPlotOptions {
        export_csv: true,
        ..options(out.path())
    };

    assert_ok!(plot_queries(&options, &Profile::default()));

    assert_eq!(
        file_names(out.path()),
        vec!["query_performance_pg_vs_ts.csv", "query_performance_pg_vs_ts.svg"]
    );
    let csv = std::fs::read_to_string(out.path().join("query_performance_pg_vs_ts.csv")).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "name,baseline_ms,candidate_ms,percent");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("\"TimescaleDB max cpu, rand    1 hosts, rand 12hr by 1h\",8.0,6.0,-25.0"));
    assert!(lines[4].starts_with("all queries,26.0,27.0,"));
}

#[test]
fn blank_label_is_a_usage_error() {
    let out = tempfile::tempdir().unwrap();
    let options = QueryPlotOptions {
        label: "  ".to_string(),
        ..options(out.path())
    };

    assert_matches!(
        plot_queries(&options, &Profile::default()),
        Err(Error::Usage(_))
    );
    assert!(file_names(out.path()).is_empty());
}

#[test]
fn runs_without_common_queries_are_insufficient_data() {
    let out = tempfile::tempdir().unwrap();
    let options = QueryPlotOptions {
        candidate: data_dir().join("no_reports.log"),
        ..options(out.path())
    };

    assert_matches!(
        plot_queries(&options, &Profile::default()),
        Err(Error::InsufficientData { .. })
    );
    assert!(file_names(out.path()).is_empty());
}

#[test]
fn missing_run_is_a_file_access_error() {
    let out = tempfile::tempdir().unwrap();
    let options = QueryPlotOptions {
        baseline: out.path().join("missing.out"),
        ..options(out.path())
    };

    assert_matches!(
        plot_queries(&options, &Profile::default()),
        Err(Error::FileAccess { .. })
    );
}

#[test]
fn candidate_in_the_two_line_layout_is_compared() {
    let out = tempfile::tempdir().unwrap();
    let options = QueryPlotOptions {
        candidate: data_dir().join("queries").join("timescaledb.out"),
        export_csv: true,
        ..options(out.path())
    };

    assert_ok!(plot_queries(&options, &Profile::default()));

    let csv = std::fs::read_to_string(out.path().join("query_performance_pg_vs_ts.csv")).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].ends_with(",8.0,6.0,-25.0"));
    assert!(lines[4].starts_with("all queries,26.0,27.0,"));
}
