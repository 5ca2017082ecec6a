//! The statement-analysis pipeline
//!
//! Extract legs from statement rows, group them by instrument, split each
//! instrument's history into closed round trips, price the round trips.
//! The pipeline is pure CPU work over one parsed statement and touches no
//! shared state; every upload gets its own report.

mod grouper;
mod pnl;
mod segmenter;

pub use grouper::{group_by_instrument, InstrumentBuckets};
pub use pnl::price_segment;
pub use segmenter::{split_segments, SegmentedLegs};

use rust_decimal::Decimal;

use crate::error::Result;
use crate::extract;
use crate::ingest::{self, Statement};
use crate::types::{SkipReason, SkippedRow, StatementReport, TradeOutcome};

/// Parse and analyze raw statement bytes end to end.
pub fn analyze_statement(bytes: &[u8]) -> Result<StatementReport> {
    Ok(analyze(ingest::read_statement(bytes)?))
}

/// Run the pipeline over an already-parsed statement.
pub fn analyze(statement: Statement) -> StatementReport {
    let Statement { rows, mut skipped } = statement;

    let mut legs = Vec::with_capacity(rows.len());
    for row in &rows {
        match extract::extract_leg(row) {
            Some(leg) => legs.push(leg),
            None => skipped.push(SkippedRow {
                reason: SkipReason::UnmatchedDescription,
                date: row.date.clone(),
                time: row.time.clone(),
                detail: row.description.clone(),
            }),
        }
    }
    let leg_count = legs.len();

    let mut segments = Vec::new();
    for (position, position_legs) in group_by_instrument(legs).into_ordered() {
        let split = split_segments(position_legs);
        for segment_legs in &split.segments {
            segments.push(price_segment(&position, segment_legs));
        }
        for leg in split.residual {
            skipped.push(SkippedRow {
                reason: SkipReason::OpenPositionAtEnd,
                date: leg.date,
                time: leg.time,
                detail: position.clone(),
            });
        }
    }

    let mut wins = 0u64;
    let mut losses = 0u64;
    let mut realized_pnl = Decimal::ZERO;
    for segment in &segments {
        for close in &segment.closes {
            match close.outcome {
                TradeOutcome::Win => wins += 1,
                TradeOutcome::Loss => losses += 1,
            }
            realized_pnl += close.total_pnl;
        }
    }

    if !skipped.is_empty() {
        tracing::warn!("{} statement row(s) excluded from P&L", skipped.len());
    }
    tracing::info!(
        "Analyzed {} trade row(s): {} leg(s), {} closed segment(s), {} win(s) / {} loss(es)",
        rows.len(),
        leg_count,
        segments.len(),
        wins,
        losses
    );

    StatementReport {
        rows: rows.len(),
        legs: leg_count,
        segments,
        skipped,
        wins,
        losses,
        realized_pnl,
    }
}
