//! Options Trade-History Analyzer
//!
//! Serves brokerage statement uploads and reports realized P&L per closed
//! round trip.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradelog::{
    config::Config,
    pipeline,
    server::{self, AppState},
    types::{StatementReport, TradeOutcome},
};

#[derive(Parser)]
#[command(name = "tradelog")]
#[command(about = "Realized P&L from brokerage option trade history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the statement upload server
    Serve,
    /// Analyze a statement CSV on disk
    Analyze {
        /// Path to the exported statement
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve => run_server(config).await,
        Commands::Analyze { file } => analyze_file(&file).await,
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting statement upload server");

    let state = Arc::new(AppState::new());
    server::start_server(state, &config)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

async fn analyze_file(path: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path).await?;
    let report = pipeline::analyze_statement(&bytes)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &StatementReport) {
    println!(
        "\n📊 {} closed segment(s) from {} trade row(s)\n",
        report.segments.len(),
        report.rows
    );
    println!(
        "{:<28} {:>9} {:>10} {:>8} {:>12}",
        "Position", "Contracts", "Avg Price", "Fees", "Realized"
    );
    println!("{}", "-".repeat(72));

    for segment in &report.segments {
        println!(
            "{:<28} {:>9} {:>10} {:>8} {:>12}",
            segment.position,
            segment.total_contracts,
            segment.avg_contract_price,
            segment.total_fees,
            segment.realized_pnl
        );
        for close in &segment.closes {
            println!(
                "    {} {}  {} lot(s)  {:<4}  total P&L {}",
                close.date,
                close.time,
                close.quantity,
                match close.outcome {
                    TradeOutcome::Win => "WIN",
                    TradeOutcome::Loss => "LOSS",
                },
                close.total_pnl
            );
        }
    }

    if !report.skipped.is_empty() {
        println!("\n⚠️  {} row(s) excluded:", report.skipped.len());
        for skip in &report.skipped {
            println!(
                "  {} {}  {:?}  {}",
                skip.date, skip.time, skip.reason, skip.detail
            );
        }
    }

    println!(
        "\nWins: {}  Losses: {}  Net P&L: {}",
        report.wins, report.losses, report.realized_pnl
    );
}
