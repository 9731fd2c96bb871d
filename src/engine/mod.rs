// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over a snapshot of transactions.
//!
//! Everything here is a pure function of its arguments. The month being
//! looked at and "today" are always passed in; nothing is read from the
//! clock or the database. Transactions whose date does not parse belong to
//! no month and are skipped by every view.

mod breakdown;
mod due;
mod forecast;
mod insights;
mod installments;
mod period;
mod progress;
mod totals;
mod trend;

pub use breakdown::{CategoryShare, category_breakdown};
pub use due::{DueBuckets, due_buckets};
pub use forecast::{FORECAST_HISTORY, Forecast, forecast};
pub use insights::{Insight, Tone, insights};
pub use installments::{expand_installments, roll_forward_fixed};
pub use period::Period;
pub use progress::{
    AccountAvailability, GoalProgress, account_availability, goal_progress, pay_installment,
};
pub use totals::{PeriodTotals, has_data, period_totals};
pub use trend::{TREND_FALLBACK_LEN, TREND_RADIUS, TrendPoint, known_periods, trend_series};

use crate::models::Transaction;

/// Records the engine will skip because their date does not parse.
pub fn undated(txs: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    txs.iter().filter(|tx| tx.day().is_none())
}
