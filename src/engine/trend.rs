// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use super::{Period, period_totals};
use crate::models::Transaction;

/// Months reported on each side of the current one.
pub const TREND_RADIUS: i32 = 3;
/// Months reported when the current one has no data.
pub const TREND_FALLBACK_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub period: Period,
    pub expense_total: Decimal,
    pub income_total: Decimal,
    pub balance: Decimal,
}

/// Distinct months that hold at least one dated transaction, in order.
pub fn known_periods(txs: &[Transaction]) -> BTreeSet<Period> {
    txs.iter().filter_map(Transaction::period).collect()
}

pub fn trend_series(txs: &[Transaction], current: Period) -> Vec<TrendPoint> {
    let known = known_periods(txs);
    let window: Vec<Period> = if known.contains(&current) {
        known
            .range(current.shift(-TREND_RADIUS)..=current.shift(TREND_RADIUS))
            .copied()
            .collect()
    } else {
        let skip = known.len().saturating_sub(TREND_FALLBACK_LEN);
        known.iter().skip(skip).copied().collect()
    };

    window
        .into_iter()
        .map(|period| {
            let totals = period_totals(txs, period);
            TrendPoint {
                period,
                expense_total: totals.expense_total,
                income_total: totals.income_total,
                balance: totals.balance,
            }
        })
        .collect()
}
