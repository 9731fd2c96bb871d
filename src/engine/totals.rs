// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use super::Period;
use crate::models::Transaction;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub expense_total: Decimal,
    pub income_total: Decimal,
    pub balance: Decimal,
    pub fixed_expense_total: Decimal,
    pub variable_expense_total: Decimal,
    pub unsettled_expense_total: Decimal,
    pub fixed_settled_count: usize,
    pub fixed_total_count: usize,
}

/// Sums the transactions dated inside `period`.
pub fn period_totals(txs: &[Transaction], period: Period) -> PeriodTotals {
    let mut t = PeriodTotals::default();
    for tx in txs.iter().filter(|tx| tx.in_period(period)) {
        if tx.is_income() {
            t.income_total += tx.amount;
            continue;
        }
        t.expense_total += tx.amount;
        if tx.is_recurring_fixed {
            t.fixed_expense_total += tx.amount;
            t.fixed_total_count += 1;
            if tx.is_settled {
                t.fixed_settled_count += 1;
            }
        } else {
            t.variable_expense_total += tx.amount;
        }
        if !tx.is_settled {
            t.unsettled_expense_total += tx.amount;
        }
    }
    t.balance = t.income_total - t.expense_total;
    t
}

/// Whether any transaction falls inside `period`.
pub fn has_data(txs: &[Transaction], period: Period) -> bool {
    txs.iter().any(|tx| tx.in_period(period))
}
