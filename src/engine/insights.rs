// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::breakdown::{ratio_percent, round_percent};
use super::{Period, category_breakdown, period_totals};
use crate::models::Transaction;

const SPENDING_CHANGE_MIN: i64 = 10;
const CATEGORY_GROWTH_MIN: i64 = 30;
const DOMINANT_SHARE_MIN: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Alert,
    Success,
    Info,
}

/// A month-over-month observation. Percentages are whole numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Insight {
    SpendingUp { percent: Decimal },
    SpendingDown { percent: Decimal },
    CategoryGrowth { category: String, percent: Decimal },
    BalanceImproved { difference: Decimal },
    DominantCategory { category: String, percent: Decimal },
    PendingBills { count: usize, total: Decimal },
}

impl Insight {
    pub fn tone(&self) -> Tone {
        match self {
            Insight::SpendingUp { .. }
            | Insight::CategoryGrowth { .. }
            | Insight::PendingBills { .. } => Tone::Alert,
            Insight::SpendingDown { .. } | Insight::BalanceImproved { .. } => Tone::Success,
            Insight::DominantCategory { .. } => Tone::Info,
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::SpendingUp { percent } => {
                write!(f, "You spent {}% more than last month", percent)
            }
            Insight::SpendingDown { percent } => {
                write!(f, "You spent {}% less than last month", percent)
            }
            Insight::CategoryGrowth { category, percent } => {
                write!(f, "Category \"{}\" grew {}% this month", category, percent)
            }
            Insight::BalanceImproved { difference } => {
                write!(f, "Balance is {:.2} higher than last month", difference)
            }
            Insight::DominantCategory { category, percent } => {
                write!(f, "\"{}\" accounts for {}% of your spending", category, percent)
            }
            Insight::PendingBills { count, total } => {
                write!(f, "{} pending bill(s) totalling {:.2}", count, total)
            }
        }
    }
}

/// Compares `period` with the month before it.
pub fn insights(txs: &[Transaction], period: Period) -> Vec<Insight> {
    let previous = period.prev();
    let now = period_totals(txs, period);
    let before = period_totals(txs, previous);
    let mut out = Vec::new();

    if before.expense_total > Decimal::ZERO {
        let change =
            ratio_percent(now.expense_total - before.expense_total, before.expense_total);
        if change.abs() >= Decimal::from(SPENDING_CHANGE_MIN) {
            let percent = round_percent(change.abs(), 0);
            out.push(if change > Decimal::ZERO {
                Insight::SpendingUp { percent }
            } else {
                Insight::SpendingDown { percent }
            });
        }
    }

    let shares = category_breakdown(txs, period);
    let current_by_category: HashMap<&str, Decimal> = shares
        .iter()
        .map(|s| (s.category.as_str(), s.total))
        .collect();
    let previous_by_category: HashMap<String, Decimal> = category_breakdown(txs, previous)
        .into_iter()
        .map(|s| (s.category, s.total))
        .collect();
    let mut fastest: Option<(&str, Decimal)> = None;
    for category in first_seen_expense_categories(txs, period) {
        let (Some(&total), Some(&prev_total)) = (
            current_by_category.get(category),
            previous_by_category.get(category),
        ) else {
            continue;
        };
        let growth = ratio_percent(total - prev_total, prev_total);
        let beats = fastest.is_none_or(|(_, best)| growth > best);
        if growth >= Decimal::from(CATEGORY_GROWTH_MIN) && beats {
            fastest = Some((category, growth));
        }
    }
    if let Some((category, percent)) = fastest {
        out.push(Insight::CategoryGrowth {
            category: category.to_string(),
            percent: round_percent(percent, 0),
        });
    }

    if now.balance > before.balance && now.balance > Decimal::ZERO {
        out.push(Insight::BalanceImproved {
            difference: now.balance - before.balance,
        });
    }

    if let Some(top) = shares.first() {
        let share = ratio_percent(top.total, now.expense_total);
        if share >= Decimal::from(DOMINANT_SHARE_MIN) {
            out.push(Insight::DominantCategory {
                category: top.category.clone(),
                percent: round_percent(share, 0),
            });
        }
    }

    let pending: Vec<&Transaction> = txs
        .iter()
        .filter(|tx| tx.is_expense() && !tx.is_settled && tx.in_period(period))
        .collect();
    if !pending.is_empty() {
        out.push(Insight::PendingBills {
            count: pending.len(),
            total: pending.iter().map(|tx| tx.amount).sum(),
        });
    }

    out
}

fn first_seen_expense_categories(txs: &[Transaction], period: Period) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for tx in txs.iter().filter(|tx| tx.is_expense() && tx.in_period(period)) {
        if !seen.contains(&tx.category.as_str()) {
            seen.push(tx.category.as_str());
        }
    }
    seen
}
