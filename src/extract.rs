//! Parse option executions out of statement description text.
//!
//! The broker writes one fill per row as free text, e.g.
//! `BOT +2 SPXW 100 (Weeklys) 17 JAN 25 5900 CALL @1.05 CBOE`.
//! The pattern below is the whole parsing contract: a description either
//! matches it from the start, in this field order, or the row is not a
//! recognized option trade. Stock fills, dividends and journal entries all
//! fall out here.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::types::{LegAction, OptionRight, TradeLeg, TradeRow};

static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<action>BOT|SOLD)\s+
        (?P<quantity>[+-]?\d+)\s+          # signed fill size
        (?P<symbol>[A-Z]+)\s+
        (?P<multiplier>\d+)\s*             # shares per contract
        (?:\((?P<series>[^)]+)\)\s+)?      # optional series tag, e.g. (Weeklys)
        (?P<day>\d{1,2})\s+
        (?P<month>[A-Z]{3})\s+
        (?P<year>\d{2})\s+
        (?P<strike>\d+(?:\.\d+)?)\s+
        (?P<right>CALL|PUT)\s+
        @(?P<premium>[\d.]+)
        (?:\s+(?P<exchange>[A-Z]+))?       # venue, not always present
        ",
    )
    .unwrap()
});

/// Parse one statement row's description into a trade leg.
///
/// `None` means the row is not an option trade in the recognized shape; the
/// caller reports it as skipped rather than failing the upload.
pub fn extract_leg(row: &TradeRow) -> Option<TradeLeg> {
    let caps = DESCRIPTION.captures(row.description.trim())?;

    let action = match &caps["action"] {
        "BOT" => LegAction::Bot,
        _ => LegAction::Sold,
    };
    let quantity: i64 = caps["quantity"].parse().ok()?;
    if quantity == 0 {
        return None;
    }
    let multiplier: u32 = caps["multiplier"].parse().ok()?;
    let strike = parse_decimal(&caps["strike"])?;
    let premium = parse_decimal(&caps["premium"])?;
    let right = match &caps["right"] {
        "CALL" => OptionRight::Call,
        _ => OptionRight::Put,
    };
    let exchange = caps.name("exchange").map(|m| m.as_str().to_string());

    Some(TradeLeg {
        action,
        quantity: u32::try_from(quantity.unsigned_abs()).ok()?,
        symbol: caps["symbol"].to_string(),
        multiplier,
        expiry_day: caps["day"].to_string(),
        expiry_month: caps["month"].to_string(),
        expiry_year: caps["year"].to_string(),
        strike,
        right,
        premium,
        exchange,
        fees: row.total_fees(),
        amount: row.amount,
        date: row.date.clone(),
        time: row.time.clone(),
    })
}

/// Sub-dollar premia are written without a leading zero (`@.45`).
fn parse_decimal(raw: &str) -> Option<Decimal> {
    if let Some(rest) = raw.strip_prefix('.') {
        Decimal::from_str(&format!("0.{rest}")).ok()
    } else {
        Decimal::from_str(raw).ok()
    }
}
