//! Integration tests for summaries and charts built from processed tables.

use banksia_data::{PriceRecord, PriceSeries, ProcessedStore};
use banksia_metrics::MetricEngine;
use banksia_output::{ChartKind, ExportFormat, Exporter, Reporter, SummaryTable, summarize};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::TempDir;

fn run_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 30)
        .unwrap()
        .and_hms_opt(17, 5, 0)
        .unwrap()
}

fn store_series(store: &ProcessedStore, ticker: &str, closes: &[f64]) {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let records: Vec<PriceRecord> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceRecord::new(start + Duration::days(i as i64), c))
        .collect();
    let series = PriceSeries::from_records(ticker, &records).unwrap();
    let mut augmented = MetricEngine::new().augment(&series).unwrap();
    store.save(&mut augmented).unwrap();
}

#[test]
fn test_full_analysis_workflow() {
    let dir = TempDir::new().unwrap();
    let store = ProcessedStore::new(dir.path().join("data").join("processed"));
    store_series(&store, "SPY", &[100.0, 102.0, 101.0]);
    let long: Vec<f64> = (0..300)
        .map(|i| 50.0 + (i as f64) * 0.1 + ((i as f64) / 3.0).sin())
        .collect();
    store_series(&store, "QQQ", &long);

    let reporter = Reporter::new(dir.path().join("plots"), dir.path().join("results"));
    let mut table = SummaryTable::new();
    for instrument in store.list().unwrap() {
        let series = store.load_path(&instrument.path).unwrap();
        let outcome = reporter.render_charts(&series);
        assert!(outcome.is_complete());
        table.push(summarize(&series, run_at()).unwrap());
    }

    // Listing is sorted by ticker
    let tickers: Vec<&str> = table.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["QQQ", "SPY"]);

    let spy = &table.records[1];
    assert!((spy.final_cumulative_return.unwrap() - 0.01).abs() < 1e-9);
    assert!(spy.annual_volatility.is_none());
    assert!(table.records[0].annual_volatility.unwrap() > 0.0);

    let path = reporter.write_summary(&table, run_at()).unwrap();
    assert!(path.ends_with("summary_metrics_20250630_170500.csv"));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Ticker,Mean_Daily_Return,Final_Cumulative_Return,Max_Drawdown,Annual_Volatility,Timestamp"
    );
    // Missing annual volatility is an empty cell
    assert!(lines[2].starts_with("SPY,"));
    assert!(lines[2].ends_with(",,2025-06-30 17:05:00"));

    for ticker in ["QQQ", "SPY"] {
        for kind in ChartKind::ALL {
            assert!(reporter.chart_path(ticker, kind).exists());
        }
    }
}

#[test]
fn test_summary_csv_reads_back() {
    let dir = TempDir::new().unwrap();
    let store = ProcessedStore::new(dir.path());
    store_series(&store, "IWM", &[10.0, 9.0, 9.5, 11.0]);

    let series = store.load("IWM").unwrap();
    let table: SummaryTable = [summarize(&series, run_at()).unwrap()].into_iter().collect();
    let csv = table.export_to_string(ExportFormat::Csv).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let records: Vec<banksia_output::SummaryRecord> =
        reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(records, table.records);
    assert!((records[0].max_drawdown.unwrap() + 0.1).abs() < 1e-12);
}
