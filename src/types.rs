//! Core domain types
//!
//! The pipeline moves through three shapes:
//! - `TradeRow`: one trade row lifted from the uploaded statement
//! - `TradeLeg`: the row's description parsed into an option execution
//! - `SegmentPnl` / `StatementReport`: priced round trips and the
//!   per-upload rollup returned to the caller

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One `TYPE == "TRD"` row from the statement, numeric fields already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRow {
    pub date: String,
    pub time: String,
    pub description: String,
    /// Absolute value of the `Misc Fees` column (blank reads as zero).
    pub misc_fees: Decimal,
    /// Absolute value of the `Commissions & Fees` column (blank reads as zero).
    pub commissions_fees: Decimal,
    /// Signed cash movement from the `AMOUNT` column.
    pub amount: Decimal,
}

impl TradeRow {
    /// Combined per-row cost: both fee columns.
    pub fn total_fees(&self) -> Decimal {
        self.misc_fees + self.commissions_fees
    }
}

/// Direction of a leg as written in the statement.
///
/// The grammar only distinguishes `BOT` and `SOLD`, and the segmenter treats
/// every `BOT` as opening and every `SOLD` as closing. Short-first positions
/// are not modeled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegAction {
    /// `BOT`: adds to the open position.
    Bot,
    /// `SOLD`: reduces the open position.
    Sold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionRight {
    Call,
    Put,
}

impl OptionRight {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionRight::Call => "CALL",
            OptionRight::Put => "PUT",
        }
    }
}

/// One option execution extracted from a statement row's description.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TradeLeg {
    pub action: LegAction,
    /// Contracts in this fill (sign stripped; direction lives in `action`).
    pub quantity: u32,
    pub symbol: String,
    /// Shares per contract, usually 100.
    pub multiplier: u32,
    pub expiry_day: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub strike: Decimal,
    pub right: OptionRight,
    /// Per-share premium after the `@`.
    pub premium: Decimal,
    pub exchange: Option<String>,
    /// Combined fees of the source row.
    pub fees: Decimal,
    /// Signed cash amount of the source row.
    pub amount: Decimal,
    pub date: String,
    pub time: String,
}

impl TradeLeg {
    /// Identity of the contract this leg traded. Legs with the same key are
    /// fills against the same position.
    pub fn instrument_key(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.symbol,
            self.strike,
            self.right.as_str(),
            self.expiry_day,
            self.expiry_month,
            self.expiry_year
        )
    }
}

/// Why a row or leg was excluded from P&L.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The description did not match the trade grammar.
    UnmatchedDescription,
    /// A numeric statement field could not be parsed.
    BadNumber,
    /// Legs still open when the instrument's history ended.
    OpenPositionAtEnd,
}

/// A dropped row or leg, with enough context to find it in the source file.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkippedRow {
    pub reason: SkipReason,
    pub date: String,
    pub time: String,
    /// The offending text: the description, the bad field, or the position.
    pub detail: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TradeOutcome {
    Win,
    Loss,
}

/// Realized result booked at one closing leg.
///
/// `total_pnl` is the segment's cumulative realized P&L minus its cumulative
/// fees as of this close, not the delta this close contributed on its own.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CloseEntry {
    pub date: String,
    pub time: String,
    pub position: String,
    pub quantity: u32,
    pub outcome: TradeOutcome,
    pub total_pnl: Decimal,
}

/// Priced summary of one sealed round trip.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SegmentPnl {
    pub position: String,
    /// Total contracts bought over the segment's life.
    pub total_contracts: u32,
    /// Weighted-average open premium, re-rounded to 2 dp after each fill.
    pub avg_contract_price: Decimal,
    /// Sum of |AMOUNT| over the opening legs.
    pub total_cost_basis: Decimal,
    pub total_fees: Decimal,
    /// Sum of `(premium - avg_contract_price) * 100` over the closing legs.
    pub realized_pnl: Decimal,
    pub closes: Vec<CloseEntry>,
}

/// Everything one statement produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatementReport {
    /// Trade rows read from the statement.
    pub rows: usize,
    /// Rows that parsed into option legs.
    pub legs: usize,
    pub segments: Vec<SegmentPnl>,
    pub skipped: Vec<SkippedRow>,
    pub wins: u64,
    pub losses: u64,
    /// Net of every closing leg's `total_pnl`.
    pub realized_pnl: Decimal,
}
