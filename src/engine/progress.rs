// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::breakdown::percent_of;
use crate::error::ValidationError;
use crate::models::{Account, AccountKind, SavingsGoal, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub percent: Decimal,
    pub installment_amount: Decimal,
    pub remaining_installments: u32,
    pub completed: bool,
}

pub fn goal_progress(goal: &SavingsGoal) -> GoalProgress {
    let percent = if goal.target_amount.is_zero() {
        Decimal::ZERO
    } else {
        percent_of(goal.paid_amount, goal.target_amount, 1)
    };
    GoalProgress {
        percent,
        installment_amount: installment_amount(goal),
        remaining_installments: goal.installments_total.saturating_sub(goal.installments_paid),
        completed: goal.installments_paid >= goal.installments_total,
    }
}

fn installment_amount(goal: &SavingsGoal) -> Decimal {
    if goal.installments_total == 0 {
        return goal.target_amount;
    }
    (goal.target_amount / Decimal::from(goal.installments_total))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the goal after one more installment is paid.
pub fn pay_installment(goal: &SavingsGoal) -> Result<SavingsGoal, ValidationError> {
    if goal.installments_paid >= goal.installments_total {
        return Err(ValidationError::GoalCompleted(goal.name.clone()));
    }
    let mut next = goal.clone();
    next.paid_amount += installment_amount(goal);
    next.installments_paid += 1;
    Ok(next)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountAvailability {
    /// Unsettled expenses minus unsettled income booked on the account.
    pub unpaid_total: Decimal,
    pub available: Decimal,
    /// Share of a card's limit in use; `None` for other accounts or a zero limit.
    pub percent_used: Option<Decimal>,
}

pub fn account_availability(account: &Account, txs: &[Transaction]) -> AccountAvailability {
    let unpaid_total: Decimal = txs
        .iter()
        .filter(|tx| !tx.is_settled && tx.account.as_deref() == Some(account.name.as_str()))
        .map(|tx| if tx.is_expense() { tx.amount } else { -tx.amount })
        .sum();

    match account.kind {
        AccountKind::CreditCard => AccountAvailability {
            unpaid_total,
            available: account.limit - unpaid_total,
            percent_used: (!account.limit.is_zero())
                .then(|| percent_of(unpaid_total, account.limit, 1)),
        },
        _ => AccountAvailability {
            unpaid_total,
            available: account.balance - unpaid_total,
            percent_used: None,
        },
    }
}
