//! Weighted-average pricing and realized P&L for sealed segments.

use rust_decimal::Decimal;

use crate::types::{CloseEntry, LegAction, SegmentPnl, TradeLeg, TradeOutcome};

/// Price one sealed segment.
///
/// Opening legs build the weighted-average contract price, re-rounded to two
/// decimals after every fill, plus the cost basis. Fees accrue on every leg.
/// Each closing leg books `(premium - avg_contract_price) * 100` of realized
/// P&L. The 100 is the standard option share multiplier; the parsed
/// multiplier field is not consulted.
///
/// Each `CloseEntry.total_pnl` snapshots `realized_pnl - total_fees` as of
/// that close. With several closes in one segment the later snapshots
/// include the earlier realized amounts again; downstream totals sum these
/// snapshots as-is, so the semantics here must not be "corrected" to
/// per-leg deltas.
pub fn price_segment(position: &str, legs: &[TradeLeg]) -> SegmentPnl {
    let mut total_contracts: u32 = 0;
    let mut open_contracts: i64 = 0;
    let mut avg_contract_price = Decimal::ZERO;
    let mut total_cost_basis = Decimal::ZERO;
    let mut total_fees = Decimal::ZERO;
    let mut realized_pnl = Decimal::ZERO;
    let mut closes = Vec::new();

    for leg in legs {
        total_fees += leg.fees;
        match leg.action {
            LegAction::Bot => {
                let before = Decimal::from(total_contracts);
                total_contracts += leg.quantity;
                open_contracts += i64::from(leg.quantity);
                let after = Decimal::from(total_contracts);
                let fill = Decimal::from(leg.quantity) * leg.premium;
                avg_contract_price = ((avg_contract_price * before + fill) / after).round_dp(2);
                total_cost_basis += leg.amount.abs();
            }
            LegAction::Sold => {
                open_contracts -= i64::from(leg.quantity);
                realized_pnl += (leg.premium - avg_contract_price) * Decimal::ONE_HUNDRED;
                let total_pnl = realized_pnl - total_fees;
                let outcome = if total_pnl > Decimal::ZERO {
                    TradeOutcome::Win
                } else {
                    TradeOutcome::Loss
                };
                closes.push(CloseEntry {
                    date: leg.date.clone(),
                    time: leg.time.clone(),
                    position: position.to_string(),
                    quantity: leg.quantity,
                    outcome,
                    total_pnl,
                });
            }
        }
    }
    // Sealed segments net to zero by construction.
    debug_assert_eq!(open_contracts, 0);

    SegmentPnl {
        position: position.to_string(),
        total_contracts,
        avg_contract_price,
        total_cost_basis,
        total_fees,
        realized_pnl,
        closes,
    }
}
