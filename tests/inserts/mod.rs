//! Integration tests for the insert-rate chart pipeline

use std::path::Path;

use bench_report::{
    Error, InsertPlotOptions, OutputFormat, PatternVariant, Profile, plot_inserts,
};
use claims::{assert_matches, assert_ok};
use rstest::rstest;

use crate::{data_dir, file_names};

fn options(out_dir: &Path) -> InsertPlotOptions {
    InsertPlotOptions {
        batch_size: 10000,
        input_dir: data_dir().join("inserts"),
        out_dir: out_dir.to_path_buf(),
        ..InsertPlotOptions::default()
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("chart should have been written")
}

#[test]
fn compares_plain_with_hypertable() {
    let out = tempfile::tempdir().unwrap();

    let chart = assert_ok!(plot_inserts(&options(out.path()), &Profile::default()));

    assert_eq!(chart, out.path().join("write_performance_10000_20000.svg"));
    let svg = read(&chart);
    assert!(svg.contains("Insert batch size: 10000, plain 0.2 h, hypertable 0.2 h"));
    // once in the title, once in the legend
    assert_eq!(svg.matches("plain").count(), 2);
    assert_eq!(svg.matches("hypertable").count(), 2);
}

#[rstest]
#[case::trend(Some(3), None)]
#[case::quadratic_trend(Some(2), None)]
#[case::downsampled(None, Some(10))]
#[case::downsampled_trend(Some(3), Some(4))]
fn optional_transforms_still_write_one_chart(
    #[case] trend_degree: Option<usize>,
    #[case] downsample: Option<usize>,
) {
    let out = tempfile::tempdir().unwrap();
    let options = InsertPlotOptions {
        trend_degree,
        downsample,
        pretty: true,
        memory: Some("16GB".to_string()),
        ..options(out.path())
    };

    let chart = assert_ok!(plot_inserts(&options, &Profile::default()));

    assert_eq!(file_names(out.path()), vec!["write_performance_10000_20000_16GB.svg"]);
    let svg = read(&chart);
    assert!(svg.contains("Insert batch size: 10000"));
    assert!(!svg.contains("16GB"));
    assert!(!svg.contains(" h,"));
}

#[test]
fn uneven_downsampling_is_rejected_without_output() {
    let out = tempfile::tempdir().unwrap();
    let options = InsertPlotOptions {
        downsample: Some(7),
        ..options(out.path())
    };

    let result = plot_inserts(&options, &Profile::default());

    assert_matches!(result, Err(Error::InsufficientData { .. }));
    assert!(file_names(out.path()).is_empty());
}

#[rstest]
#[case(0)]
#[case(-5)]
fn non_positive_batch_size_is_a_usage_error(#[case] batch_size: i64) {
    let out = tempfile::tempdir().unwrap();
    let options = InsertPlotOptions {
        batch_size,
        ..options(out.path())
    };

    assert_matches!(
        plot_inserts(&options, &Profile::default()),
        Err(Error::Usage(_))
    );
    assert!(file_names(out.path()).is_empty());
}

#[test]
fn missing_plain_baseline_counts_as_zero_hours() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let hyper_dir = input.path().join("hypertable");
    std::fs::create_dir(&hyper_dir).unwrap();
    std::fs::copy(
        data_dir()
            .join("inserts")
            .join("hypertable")
            .join("load_hypertable_10000_20000.log"),
        hyper_dir.join("load_hypertable_10000_20000.log"),
    )
    .unwrap();
    let options = InsertPlotOptions {
        input_dir: input.path().to_path_buf(),
        ..options(out.path())
    };

    let chart = assert_ok!(plot_inserts(&options, &Profile::default()));

    let svg = read(&chart);
    assert!(svg.contains("plain 0.0 h, hypertable 0.2 h"));
    assert_eq!(svg.matches("plain").count(), 1);
}

#[test]
fn missing_required_series_is_a_file_access_error() {
    let out = tempfile::tempdir().unwrap();
    let options = InsertPlotOptions {
        batch_size: 5000,
        ..options(out.path())
    };

    assert_matches!(
        plot_inserts(&options, &Profile::default()),
        Err(Error::FileAccess { .. })
    );
    assert!(file_names(out.path()).is_empty());
}

#[test]
fn required_series_without_report_lines_is_a_bounds_error() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let hyper_dir = input.path().join("hypertable");
    std::fs::create_dir(&hyper_dir).unwrap();
    std::fs::copy(
        data_dir().join("no_reports.log"),
        hyper_dir.join("load_hypertable_10000_20000.log"),
    )
    .unwrap();
    let options = InsertPlotOptions {
        input_dir: input.path().to_path_buf(),
        ..options(out.path())
    };

    assert_matches!(
        plot_inserts(&options, &Profile::default()),
        Err(Error::Bounds { .. })
    );
    assert!(file_names(out.path()).is_empty());
}

#[test]
fn untimed_logs_are_plotted_with_a_custom_profile() {
    let out = tempfile::tempdir().unwrap();
    let profile = Profile::from_toml(
        r##"
[inserts]
title = "iobeam batch"
y_label = "rows/s"

[[inserts.series]]
label = "iobeam"
color = "orange"
marker = "triangle"
"##,
    )
    .unwrap();
    let options = InsertPlotOptions {
        batch_size: 5000,
        input_dir: data_dir().join("untimed"),
        layout: PatternVariant::Untimed,
        trend_degree: Some(2),
        export_csv: true,
        ..options(out.path())
    };

    let chart = assert_ok!(plot_inserts(&options, &profile));

    assert!(read(&chart).contains("iobeam batch: 5000, iobeam 0.0 h"));
    assert_eq!(
        file_names(out.path()),
        vec!["write_performance_5000_20000.csv", "write_performance_5000_20000.svg"]
    );
    let csv = read(&out.path().join("write_performance_5000_20000.csv"));
    assert_eq!(csv.lines().count(), 13);
}

#[test]
fn field_outside_the_layout_is_a_usage_error() {
    let out = tempfile::tempdir().unwrap();
    let options = InsertPlotOptions {
        layout: PatternVariant::Untimed,
        x_field: Some(4),
        ..options(out.path())
    };

    assert_matches!(
        plot_inserts(&options, &Profile::default()),
        Err(Error::Usage(_))
    );
}

#[cfg(not(feature = "png"))]
#[test]
fn png_without_the_feature_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let options = InsertPlotOptions {
        format: OutputFormat::Png,
        ..options(out.path())
    };

    assert_matches!(
        plot_inserts(&options, &Profile::default()),
        Err(Error::Usage(_))
    );
    assert!(file_names(out.path()).is_empty());
}

#[rstest]
#[case::chart_blocked("write_performance_10000_20000.svg")]
#[case::csv_blocked("write_performance_10000_20000.csv")]
fn nothing_is_published_unless_chart_and_csv_both_land(#[case] blocked: &str) {
    let out = tempfile::tempdir().unwrap();
    std::fs::create_dir(out.path().join(blocked)).unwrap();
    std::fs::write(out.path().join(blocked).join("keep"), "").unwrap();
    let options = InsertPlotOptions {
        export_csv: true,
        ..options(out.path())
    };

    assert_matches!(
        plot_inserts(&options, &Profile::default()),
        Err(Error::FileAccess { .. })
    );
    assert_eq!(file_names(out.path()), vec![blocked]);
}
