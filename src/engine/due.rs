// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::Period;
use crate::models::Transaction;

/// Unsettled expenses of a period, grouped by how close they are to `today`.
///
/// Boundaries: `overdue` is `date < today`, `due_within_3_days` is
/// `today <= date <= today+3`, `due_within_7_days` is
/// `today+3 < date <= today+7`. Anything later is left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DueBuckets {
    pub overdue: Vec<Transaction>,
    pub due_within_3_days: Vec<Transaction>,
    pub due_within_7_days: Vec<Transaction>,
    /// All unsettled expenses of the period, bucketed or not.
    pub pending_count: usize,
}

impl DueBuckets {
    /// Overdue plus due within three days.
    pub fn urgent_count(&self) -> usize {
        self.overdue.len() + self.due_within_3_days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty()
            && self.due_within_3_days.is_empty()
            && self.due_within_7_days.is_empty()
    }
}

pub fn due_buckets(txs: &[Transaction], period: Period, today: NaiveDate) -> DueBuckets {
    let in_3 = today.checked_add_days(Days::new(3)).unwrap_or(NaiveDate::MAX);
    let in_7 = today.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);

    let mut pending: Vec<(NaiveDate, &Transaction)> = txs
        .iter()
        .filter(|tx| tx.is_expense() && !tx.is_settled)
        .filter_map(|tx| tx.day().map(|d| (d, tx)))
        .filter(|(d, _)| period.contains(*d))
        .collect();
    pending.sort_by_key(|(d, _)| *d);

    let mut buckets = DueBuckets {
        pending_count: pending.len(),
        ..DueBuckets::default()
    };
    for (date, tx) in pending {
        if date < today {
            buckets.overdue.push(tx.clone());
        } else if date <= in_3 {
            buckets.due_within_3_days.push(tx.clone());
        } else if date <= in_7 {
            buckets.due_within_7_days.push(tx.clone());
        }
    }
    buckets
}
