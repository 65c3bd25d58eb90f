//! Banksia CLI binary.
//!
//! Runs the processing and analysis stages over a directory layout.

use banksia::metrics::{MetricCategory, metrics_by_category};
use banksia::{AnalysisReport, Layout, MetricEngine, RunReport, analyze_all, process_all};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "banksia")]
#[command(about = "Banksia: return, volatility and drawdown metrics for daily price tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Root directory holding data/, plots/ and results/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log debug diagnostics
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metric columns for every raw table in data/
    Process,

    /// Draw charts and write the summary for every table in data/processed/
    Analyze,

    /// Process, then analyze
    Run,

    /// List the derived metric columns
    ListMetrics,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let layout = Layout::from_root(&cli.root);

    match cli.command {
        Commands::Process => {
            let report = process(&layout)?;
            if report.all_failed() {
                return Err("every instrument failed to process".into());
            }
        }
        Commands::Analyze => {
            let report = analyze(&layout)?;
            if report.all_failed() {
                return Err("every instrument failed to analyze".into());
            }
        }
        Commands::Run => {
            let processed = process(&layout)?;
            let analyzed = analyze(&layout)?;
            if processed.all_failed() || analyzed.all_failed() {
                return Err("every instrument failed".into());
            }
        }
        Commands::ListMetrics => list_metrics(),
    }

    Ok(())
}

fn process(layout: &Layout) -> Result<RunReport, Box<dyn std::error::Error>> {
    let report = process_all(layout, &MetricEngine::new())?;

    println!(
        "Processed {} of {} instruments into {}",
        report.succeeded.len(),
        report.attempted(),
        layout.processed_dir.display()
    );
    for failure in &report.failed {
        println!("  failed: {}", failure);
    }

    Ok(report)
}

fn analyze(layout: &Layout) -> Result<AnalysisReport, Box<dyn std::error::Error>> {
    layout.ensure_dirs()?;
    let report = analyze_all(layout, &layout.reporter())?;

    if !report.summary.is_empty() {
        print!("{}", report.summary.to_ascii_table());
    }
    for failure in &report.failed {
        println!("  failed: {}", failure);
    }
    for failure in &report.chart_failures {
        println!("  chart failed: {}", failure);
    }
    println!("Summary written: {}", report.summary_path.display());

    Ok(report)
}

fn list_metrics() {
    println!("Derived Metrics:");
    println!("================\n");

    for category in [
        MetricCategory::Return,
        MetricCategory::Volatility,
        MetricCategory::Drawdown,
    ] {
        println!("{:?}:", category);
        for metric in metrics_by_category(category) {
            println!("  {}", metric);
        }
        println!();
    }
}
