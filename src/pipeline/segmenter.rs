//! Split one instrument's leg history into closed round trips.

use crate::types::{LegAction, TradeLeg};

/// Sealed round trips plus whatever was still open at end of history.
#[derive(Debug, Default)]
pub struct SegmentedLegs {
    pub segments: Vec<Vec<TradeLeg>>,
    /// Legs after the last return to zero. Never priced.
    pub residual: Vec<TradeLeg>,
}

/// Walk legs in file order keeping a running open-contract count; every
/// return to exactly zero seals the buffered legs as one segment.
///
/// `BOT` always adds and `SOLD` always subtracts, so a history that starts
/// with a sale goes negative and only seals once purchases bring the count
/// back to zero.
pub fn split_segments(legs: Vec<TradeLeg>) -> SegmentedLegs {
    let mut segments = Vec::new();
    let mut buffer: Vec<TradeLeg> = Vec::new();
    let mut open_contracts: i64 = 0;

    for leg in legs {
        match leg.action {
            LegAction::Bot => open_contracts += i64::from(leg.quantity),
            LegAction::Sold => open_contracts -= i64::from(leg.quantity),
        }
        buffer.push(leg);
        if open_contracts == 0 {
            segments.push(std::mem::take(&mut buffer));
        }
    }

    SegmentedLegs {
        segments,
        residual: buffer,
    }
}
