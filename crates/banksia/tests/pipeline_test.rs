//! End-to-end tests of the processing and analysis stages.

use banksia::output::ChartKind;
use banksia::{Layout, MetricEngine, Stage, analyze_all_at, process_all};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

fn run_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 31)
        .unwrap()
        .and_hms_opt(8, 0, 1)
        .unwrap()
}

fn write_raw(layout: &Layout, ticker: &str, closes: &[f64]) {
    fs::create_dir_all(&layout.raw_dir).unwrap();
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut content = format!("Date,Close,High,Low,Open,Volume\n,{ticker},{ticker},{ticker},{ticker},{ticker}\n");
    for (i, close) in closes.iter().enumerate() {
        let date = start + Duration::days(i as i64);
        content.push_str(&format!("{date},{close},{close},{close},{close},1000\n"));
    }
    fs::write(layout.raw_dir.join(format!("{ticker}.csv")), content).unwrap();
}

fn prices(n: usize, seed: f64) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + seed * ((i as f64) / 9.0).sin() + (i as f64) * 0.05)
        .collect()
}

#[test]
fn test_process_then_analyze() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::from_root(dir.path());
    write_raw(&layout, "IEV", &prices(300, 2.0));
    write_raw(&layout, "EWJ", &prices(40, 1.0));
    write_raw(&layout, "SPY", &[100.0, 102.0, 101.0]);

    let run = process_all(&layout, &MetricEngine::new()).unwrap();
    assert_eq!(run.succeeded, vec!["EWJ", "IEV", "SPY"]);
    assert!(run.failed.is_empty());
    for ticker in ["EWJ", "IEV", "SPY"] {
        assert!(layout.processed_dir.join(format!("{ticker}.csv")).exists());
    }

    // The label row is gone and the extra raw columns are kept
    let processed = fs::read_to_string(layout.processed_dir.join("SPY.csv")).unwrap();
    let lines: Vec<&str> = processed.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Date,Close,High,Low,Open,Volume,Daily_Return"));
    assert!(lines[0].ends_with("Rolling_30D_Return"));

    let analysis = analyze_all_at(&layout, &layout.reporter(), run_at()).unwrap();
    assert_eq!(analysis.succeeded.len(), 3);
    assert!(analysis.failed.is_empty());
    assert!(analysis.chart_failures.is_empty());
    assert_eq!(
        analysis.summary_path,
        layout.results_dir.join("summary_metrics_20250131_080001.csv")
    );

    for ticker in ["EWJ", "IEV", "SPY"] {
        for kind in ChartKind::ALL {
            let path = layout.plots_dir.join(kind.file_name(ticker));
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    let records = &analysis.summary.records;
    let iev = records.iter().find(|r| r.ticker == "IEV").unwrap();
    let ewj = records.iter().find(|r| r.ticker == "EWJ").unwrap();
    assert!(iev.annual_volatility.is_some());
    assert!(ewj.annual_volatility.is_none());
    for record in records {
        assert!(record.max_drawdown.unwrap() <= 0.0);
        assert_eq!(record.timestamp, "2025-01-31 08:00:01");
    }
}

#[test]
fn test_analysis_isolates_bad_table() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::from_root(dir.path());
    write_raw(&layout, "GOOD", &prices(35, 1.5));
    process_all(&layout, &MetricEngine::new()).unwrap();

    // A processed table without the derived columns
    fs::write(
        layout.processed_dir.join("STALE.csv"),
        "Date,Close\n2024-01-02,10\n",
    )
    .unwrap();

    let analysis = analyze_all_at(&layout, &layout.reporter(), run_at()).unwrap();
    assert_eq!(analysis.succeeded, vec!["GOOD"]);
    assert_eq!(analysis.failed.len(), 1);
    assert_eq!(analysis.failed[0].ticker, "STALE");
    assert_eq!(analysis.failed[0].stage, Stage::Analyze);
    assert!(!analysis.all_failed());

    let summary = fs::read_to_string(&analysis.summary_path).unwrap();
    assert_eq!(summary.lines().count(), 2);
    assert!(!summary.contains("STALE"));
}

#[test]
fn test_analysis_of_empty_store_writes_header() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::from_root(dir.path());

    let analysis = analyze_all_at(&layout, &layout.reporter(), run_at()).unwrap();
    assert_eq!(analysis.attempted(), 0);
    assert!(!analysis.all_failed());

    let summary = fs::read_to_string(&analysis.summary_path).unwrap();
    assert_eq!(summary.lines().count(), 1);
    assert!(summary.starts_with("Ticker,"));
}

#[rstest]
#[case::missing_close("Date,Open\n,X\n2024-01-02,1\n")]
#[case::bad_date("Date,Close\n,X\n2024-13-45,1\n")]
fn test_every_instrument_failing(#[case] content: &str) {
    let dir = TempDir::new().unwrap();
    let layout = Layout::from_root(dir.path());
    fs::create_dir_all(&layout.raw_dir).unwrap();
    fs::write(layout.raw_dir.join("X.csv"), content).unwrap();

    let run = process_all(&layout, &MetricEngine::new()).unwrap();
    assert!(run.all_failed());
    assert_eq!(run.failed[0].ticker, "X");
    assert_eq!(run.failed[0].path, layout.raw_dir.join("X.csv"));
}

#[test]
fn test_reprocessing_overwrites() {
    let dir = TempDir::new().unwrap();
    let layout = Layout::from_root(dir.path());
    write_raw(&layout, "QQQ", &prices(50, 3.0));
    process_all(&layout, &MetricEngine::new()).unwrap();
    let first = fs::read_to_string(layout.processed_dir.join("QQQ.csv")).unwrap();

    write_raw(&layout, "QQQ", &prices(10, 3.0));
    process_all(&layout, &MetricEngine::new()).unwrap();
    let second = fs::read_to_string(layout.processed_dir.join("QQQ.csv")).unwrap();

    assert_ne!(first, second);
    assert_eq!(second.lines().count(), 11);
}
