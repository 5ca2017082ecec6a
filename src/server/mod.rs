//! Statement upload API
//!
//! HTTP endpoints for uploading account-statement CSVs and reading the
//! totals accumulated across every upload this process has served.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::UploadError;
use crate::ingest;
use crate::pipeline;
use crate::types::StatementReport;

/// Server state shared across handlers.
pub struct AppState {
    pub totals: RwLock<RunningTotals>,
}

/// Totals folded across uploads.
///
/// `realized_pnl` accumulates each closing leg's cumulative snapshot, the
/// same quantity the per-upload report sums.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunningTotals {
    /// Statements processed
    pub uploads: u64,
    /// Closed round trips seen
    pub segments: u64,
    /// Closing legs booked
    pub closed_legs: u64,
    /// Closing legs with positive total P&L
    pub wins: u64,
    /// Closing legs at or below zero
    pub losses: u64,
    /// Win rate (0-100)
    pub win_rate: Decimal,
    /// Net realized P&L across uploads
    pub realized_pnl: Decimal,
    /// Last fold timestamp
    pub last_updated: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Self {
        let totals = RunningTotals {
            last_updated: Utc::now(),
            ..RunningTotals::default()
        };
        Self {
            totals: RwLock::new(totals),
        }
    }

    /// Fold one upload's report into the running totals.
    pub async fn record_report(&self, report: &StatementReport) {
        let mut totals = self.totals.write().await;
        totals.uploads += 1;
        totals.segments += report.segments.len() as u64;
        totals.closed_legs += report.wins + report.losses;
        totals.wins += report.wins;
        totals.losses += report.losses;
        totals.realized_pnl += report.realized_pnl;

        totals.win_rate = if totals.closed_legs > 0 {
            Decimal::from(totals.wins) / Decimal::from(totals.closed_legs) * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        totals.last_updated = Utc::now();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============ HTTP API Handlers ============

/// Upload response: this statement's report plus the updated totals.
#[derive(Serialize)]
struct UploadResponse {
    filename: String,
    report: StatementReport,
    totals: RunningTotals,
}

/// Accept a multipart statement upload and analyze it.
async fn upload_statement(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::ParseFailure(e.to_string()))?
    {
        if !matches!(field.name(), Some("trades_csv" | "file")) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        // Reject bad filenames before touching the body.
        ingest::validate_filename(&filename)?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| UploadError::ParseFailure(e.to_string()))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }
    let (filename, bytes) = upload.ok_or(UploadError::MissingFile)?;

    // The pipeline is pure CPU work; keep it off the runtime workers.
    let report = tokio::task::spawn_blocking(move || pipeline::analyze_statement(&bytes))
        .await
        .map_err(|e| UploadError::ParseFailure(e.to_string()))??;

    state.record_report(&report).await;
    let totals = state.totals.read().await.clone();

    tracing::info!(
        "Processed {}: {} segment(s), {} skip(s), net P&L {}",
        filename,
        report.segments.len(),
        report.skipped.len(),
        report.realized_pnl
    );

    Ok(Json(UploadResponse {
        filename,
        report,
        totals,
    }))
}

/// Get the running totals
async fn get_totals(State(state): State<Arc<AppState>>) -> Json<RunningTotals> {
    let totals = state.totals.read().await;
    Json(totals.clone())
}

/// Health check
async fn health_check() -> &'static str {
    "OK"
}

/// Create the service router
pub fn create_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/trades/upload", post(upload_statement))
        .route("/trades/totals", get(get_totals))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Start the upload server
pub async fn start_server(
    state: Arc<AppState>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let max_upload_bytes = config.upload.max_size_mb * 1024 * 1024;
    let app = create_router(state, max_upload_bytes);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Upload server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
