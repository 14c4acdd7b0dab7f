//! Integration tests reading the fixture logs through the public parsing API

use bench_report::{LogPattern, PatternVariant, project, read_log_file, read_query_stats};
use claims::{assert_matches, assert_ok};

use crate::data_dir;

#[test]
fn ten_report_lines_become_a_ten_point_series() {
    let pattern = LogPattern::new(PatternVariant::Timed).unwrap();
    let records = assert_ok!(read_log_file(
        &data_dir().join("report_example.log"),
        &pattern
    ));

    let time = PatternVariant::Timed.field_index("time").unwrap();
    let col_rate = PatternVariant::Timed.field_index("col_rate").unwrap();
    let series = assert_ok!(project("example", &records, time, col_rate));

    let expected_x: Vec<f64> = (0..10).map(|i| 100.0 + 10.0 * i as f64).collect();
    let expected_y: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
    assert_eq!(series.len(), 10);
    assert_eq!(series.x(), expected_x.as_slice());
    assert_eq!(series.y(), expected_y.as_slice());
}

#[test]
fn parsing_the_same_file_twice_gives_the_same_records() {
    let pattern = LogPattern::new(PatternVariant::Timed).unwrap();
    let path = data_dir()
        .join("inserts")
        .join("hypertable")
        .join("load_hypertable_10000_20000.log");

    let first = assert_ok!(read_log_file(&path, &pattern));
    let second = assert_ok!(read_log_file(&path, &pattern));

    assert_eq!(first.len(), 40);
    assert_eq!(first, second);
}

#[test]
fn log_without_report_lines_is_empty_not_an_error() {
    let pattern = LogPattern::new(PatternVariant::Timed).unwrap();

    let records = assert_ok!(read_log_file(&data_dir().join("no_reports.log"), &pattern));

    assert!(records.is_empty());
}

#[test]
fn untimed_log_needs_the_untimed_layout() {
    let path = data_dir()
        .join("untimed")
        .join("iobeam")
        .join("load_iobeam_5000_20000.log");

    let timed = LogPattern::new(PatternVariant::Timed).unwrap();
    let untimed = LogPattern::new(PatternVariant::Untimed).unwrap();

    assert!(assert_ok!(read_log_file(&path, &timed)).is_empty());
    let records = assert_ok!(read_log_file(&path, &untimed));
    assert_eq!(records.len(), 12);
    assert!(records.iter().all(|r| r.len() == 4));
}

#[test]
fn query_stats_fixture_is_parsed() {
    let stats = assert_ok!(read_query_stats(
        &data_dir().join("queries").join("baseline.out")
    ));

    assert_eq!(stats.len(), 4);
    assert_eq!(stats[3].name, "all queries");
    assert_eq!(stats[3].mean_ms, 26.0);
}

#[test]
fn missing_log_is_a_file_access_error() {
    let pattern = LogPattern::new(PatternVariant::Timed).unwrap();

    assert_matches!(
        read_log_file(&data_dir().join("missing.log"), &pattern),
        Err(bench_report::Error::FileAccess { .. })
    );
}

#[test]
fn both_summary_layouts_give_the_same_latencies() {
    let queries = data_dir().join("queries");

    let inline = assert_ok!(read_query_stats(&queries.join("candidate.out")));
    let two_line = assert_ok!(read_query_stats(&queries.join("timescaledb.out")));

    let means = |stats: &[bench_report::QueryStat]| {
        stats
            .iter()
            .map(|s| (s.name.clone(), s.mean_ms))
            .collect::<Vec<_>>()
    };
    assert_eq!(means(&inline), means(&two_line));
    assert!(two_line.iter().all(|s| s.count.is_none() && s.stddev_ms.is_some()));
}
