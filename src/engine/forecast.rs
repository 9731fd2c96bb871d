// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Period, PeriodTotals, has_data, period_totals};
use crate::models::Transaction;

/// Months before today's month that feed the historical averages.
pub const FORECAST_HISTORY: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub period: Period,
    pub projected_fixed_expense: Decimal,
    pub projected_variable_expense: Decimal,
    pub projected_expense: Decimal,
    pub projected_income: Decimal,
    pub projected_balance: Decimal,
    pub is_at_risk: bool,
    /// Fixed expenses were taken from transactions already scheduled.
    pub fixed_from_schedule: bool,
    /// Income was taken from transactions already scheduled.
    pub income_from_schedule: bool,
    /// Number of past months that had data and were averaged.
    pub history_len: usize,
}

/// Projects the month after `current`.
///
/// Known obligations already entered for that month win over averages;
/// variable spending is always the average of the months before `today`'s
/// month that contain any data.
pub fn forecast(txs: &[Transaction], current: Period, today: NaiveDate) -> Forecast {
    let target = current.next();
    let base = Period::of(today);

    let history: Vec<PeriodTotals> = (1..=FORECAST_HISTORY)
        .map(|i| base.shift(-i))
        .filter(|p| has_data(txs, *p))
        .map(|p| period_totals(txs, p))
        .collect();

    let scheduled = period_totals(txs, target);
    let fixed_from_schedule = scheduled.fixed_total_count > 0;
    let income_from_schedule = txs
        .iter()
        .any(|tx| tx.is_income() && tx.in_period(target));

    let projected_fixed_expense = if fixed_from_schedule {
        scheduled.fixed_expense_total
    } else {
        mean(history.iter().map(|t| t.fixed_expense_total), history.len())
    };
    let projected_variable_expense =
        mean(history.iter().map(|t| t.variable_expense_total), history.len());
    let projected_income = if income_from_schedule {
        scheduled.income_total
    } else {
        mean(history.iter().map(|t| t.income_total), history.len())
    };

    let projected_expense = projected_fixed_expense + projected_variable_expense;
    tracing::debug!(
        %target,
        history = history.len(),
        fixed_from_schedule,
        income_from_schedule,
        "forecast computed"
    );

    Forecast {
        period: target,
        projected_fixed_expense,
        projected_variable_expense,
        projected_expense,
        projected_income,
        projected_balance: projected_income - projected_expense,
        is_at_risk: projected_expense > projected_income,
        fixed_from_schedule,
        income_from_schedule,
        history_len: history.len(),
    }
}

fn mean(values: impl Iterator<Item = Decimal>, len: usize) -> Decimal {
    if len == 0 {
        return Decimal::ZERO;
    }
    values.sum::<Decimal>() / Decimal::from(len)
}
