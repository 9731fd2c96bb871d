// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::Period;
use crate::models::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    /// Share of the period's expenses, in percent with one decimal.
    pub percent: Decimal,
}

/// Expense totals per category for `period`, largest first.
///
/// Categories with equal totals keep the order in which they first appear
/// in `txs`. Returns an empty list when the period has no expenses.
pub fn category_breakdown(txs: &[Transaction], period: Period) -> Vec<CategoryShare> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut total = Decimal::ZERO;

    for tx in txs
        .iter()
        .filter(|tx| tx.is_expense() && tx.in_period(period))
    {
        total += tx.amount;
        match index.get(tx.category.as_str()) {
            Some(&i) => groups[i].1 += tx.amount,
            None => {
                index.insert(tx.category.as_str(), groups.len());
                groups.push((tx.category.clone(), tx.amount));
            }
        }
    }

    if total.is_zero() {
        return Vec::new();
    }

    let mut shares: Vec<CategoryShare> = groups
        .into_iter()
        .map(|(category, sum)| CategoryShare {
            percent: percent_of(sum, total, 1),
            category,
            total: sum,
        })
        .collect();
    shares.sort_by(|a, b| b.total.cmp(&a.total));
    shares
}

/// `part / whole * 100` rounded half away from zero. `whole` must be non-zero.
pub(crate) fn percent_of(part: Decimal, whole: Decimal, dp: u32) -> Decimal {
    round_percent(ratio_percent(part, whole), dp)
}

/// `part / whole * 100` unrounded. `whole` must be non-zero.
pub(crate) fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    part / whole * Decimal::ONE_HUNDRED
}

pub(crate) fn round_percent(percent: Decimal, dp: u32) -> Decimal {
    percent.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
