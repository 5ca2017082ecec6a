//! Group extracted legs by the option contract they traded.

use std::collections::HashMap;

use crate::types::TradeLeg;

/// Per-instrument leg buckets.
///
/// Keys keep first-seen order and each bucket keeps file order, so segment
/// boundaries and report ordering stay deterministic for a given statement.
#[derive(Debug, Default)]
pub struct InstrumentBuckets {
    order: Vec<String>,
    legs: HashMap<String, Vec<TradeLeg>>,
}

impl InstrumentBuckets {
    pub fn push(&mut self, leg: TradeLeg) {
        let key = leg.instrument_key();
        if !self.legs.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.legs.entry(key).or_default().push(leg);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume the buckets in first-seen key order.
    pub fn into_ordered(mut self) -> Vec<(String, Vec<TradeLeg>)> {
        self.order
            .into_iter()
            .map(|key| {
                let legs = self.legs.remove(&key).unwrap_or_default();
                (key, legs)
            })
            .collect()
    }
}

pub fn group_by_instrument(legs: Vec<TradeLeg>) -> InstrumentBuckets {
    let mut buckets = InstrumentBuckets::default();
    for leg in legs {
        buckets.push(leg);
    }
    buckets
}
