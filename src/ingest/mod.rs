//! Statement ingestion
//!
//! Reads a brokerage account-statement CSV into trade rows. The export
//! carries two banner rows above the real header, mixes trades with balance
//! and journal rows, and pads some lines with a different field count than
//! the header. Only `TYPE == "TRD"` rows survive ingestion.

#[cfg(test)]
mod tests;

use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;

use crate::error::{Result, UploadError};
use crate::types::{SkipReason, SkippedRow, TradeRow};

/// Columns the statement header must carry, in no particular order.
pub const EXPECTED_COLUMNS: [&str; 8] = [
    "DATE",
    "TIME",
    "TYPE",
    "DESCRIPTION",
    "Misc Fees",
    "Commissions & Fees",
    "AMOUNT",
    "BALANCE",
];

/// Banner rows the export places above the header.
const BANNER_ROWS: usize = 2;

const TRADE_TYPE: &str = "TRD";

/// Trade rows in file order, plus rows dropped for unparseable numbers.
#[derive(Debug, Default)]
pub struct Statement {
    pub rows: Vec<TradeRow>,
    pub skipped: Vec<SkippedRow>,
}

/// Reject uploads that are not named like a CSV export.
pub fn validate_filename(name: &str) -> Result<()> {
    if name.to_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err(UploadError::InvalidExtension(name.to_string()))
    }
}

/// Parse raw statement bytes: skip the banner, check the header, keep the
/// trade rows.
pub fn read_statement(bytes: &[u8]) -> Result<Statement> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    for _ in 0..BANNER_ROWS {
        match records.next() {
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(UploadError::ParseFailure(e.to_string())),
            None => {
                return Err(UploadError::ParseFailure(
                    "statement has no header row".to_string(),
                ))
            }
        }
    }
    let header = match records.next() {
        Some(Ok(record)) => record,
        Some(Err(e)) => return Err(UploadError::ParseFailure(e.to_string())),
        None => {
            return Err(UploadError::ParseFailure(
                "statement has no header row".to_string(),
            ))
        }
    };
    let cols = locate_columns(&header)?;

    let mut statement = Statement::default();
    for record in records {
        let record = record.map_err(|e| UploadError::ParseFailure(e.to_string()))?;
        // Footer and mangled lines carry a different field count.
        if record.len() != header.len() {
            continue;
        }
        if record.get(cols.trade_type).map(str::trim) != Some(TRADE_TYPE) {
            continue;
        }

        let date = field(&record, cols.date);
        let time = field(&record, cols.time);
        match parse_trade_row(&record, &cols, &date, &time) {
            Ok(row) => statement.rows.push(row),
            Err(detail) => statement.skipped.push(SkippedRow {
                reason: SkipReason::BadNumber,
                date,
                time,
                detail,
            }),
        }
    }

    tracing::debug!(
        "Read {} trade row(s) from statement ({} dropped for bad numbers)",
        statement.rows.len(),
        statement.skipped.len()
    );
    Ok(statement)
}

struct ColumnIndex {
    date: usize,
    time: usize,
    trade_type: usize,
    description: usize,
    misc_fees: usize,
    commissions_fees: usize,
    amount: usize,
}

fn locate_columns(header: &StringRecord) -> Result<ColumnIndex> {
    let position = |name: &str| header.iter().position(|h| h.trim() == name);

    let (
        Some(date),
        Some(time),
        Some(trade_type),
        Some(description),
        Some(misc_fees),
        Some(commissions_fees),
        Some(amount),
        Some(_balance),
    ) = (
        position("DATE"),
        position("TIME"),
        position("TYPE"),
        position("DESCRIPTION"),
        position("Misc Fees"),
        position("Commissions & Fees"),
        position("AMOUNT"),
        position("BALANCE"),
    )
    else {
        let missing: Vec<&str> = EXPECTED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(name).is_none())
            .collect();
        return Err(UploadError::SchemaMismatch(missing.join(", ")));
    };

    Ok(ColumnIndex {
        date,
        time,
        trade_type,
        description,
        misc_fees,
        commissions_fees,
        amount,
    })
}

fn parse_trade_row(
    record: &StringRecord,
    cols: &ColumnIndex,
    date: &str,
    time: &str,
) -> std::result::Result<TradeRow, String> {
    let misc_fees = money(record, cols.misc_fees).map_err(|raw| format!("Misc Fees: {raw:?}"))?;
    let commissions_fees = money(record, cols.commissions_fees)
        .map_err(|raw| format!("Commissions & Fees: {raw:?}"))?;
    let amount = money(record, cols.amount).map_err(|raw| format!("AMOUNT: {raw:?}"))?;

    Ok(TradeRow {
        date: date.to_string(),
        time: time.to_string(),
        description: field(record, cols.description),
        misc_fees: misc_fees.abs(),
        commissions_fees: commissions_fees.abs(),
        amount,
    })
}

/// Blank money fields read as zero; the export writes thousands separators.
fn money(record: &StringRecord, idx: usize) -> std::result::Result<Decimal, String> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&raw.replace(',', "")).map_err(|_| raw.to_string())
}

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").trim().to_string()
}
