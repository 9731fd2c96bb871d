// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Months};

use super::Period;
use crate::error::ValidationError;
use crate::models::{Transaction, TransactionDraft};

/// Splits `draft` into `count` monthly installments starting at its date.
///
/// Every installment carries the draft's amount and starts unsettled. A start
/// day that does not exist in a later month falls on that month's last day.
pub fn expand_installments(
    draft: TransactionDraft,
    count: u32,
) -> Result<Vec<TransactionDraft>, ValidationError> {
    if count == 0 {
        return Err(ValidationError::ZeroInstallments);
    }
    draft.validate()?;
    if count == 1 {
        return Ok(vec![draft]);
    }

    let start = Period::of(draft.date);
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count {
        let date = draft
            .date
            .checked_add_months(Months::new(i))
            .or_else(|| start.shift(i as i32).date(draft.date.day()))
            .ok_or_else(|| ValidationError::InvalidDate(draft.date.to_string()))?;
        let n = i + 1;
        let description = match draft.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => format!("{} ({}/{})", d, n, count),
            _ => format!("Installment {}/{}", n, count),
        };
        out.push(TransactionDraft {
            date,
            description: Some(description),
            is_settled: false,
            installment_count: Some(count),
            installment_index: Some(n),
            ..draft.clone()
        });
    }
    Ok(out)
}

/// Copies last month's fixed expenses into `target` when it has none yet.
///
/// Copies keep day of month (clamped to the month's length) and start
/// unsettled.
pub fn roll_forward_fixed(txs: &[Transaction], target: Period) -> Vec<TransactionDraft> {
    let is_fixed_expense = |tx: &&Transaction| tx.is_expense() && tx.is_recurring_fixed;
    if txs
        .iter()
        .filter(is_fixed_expense)
        .any(|tx| tx.in_period(target))
    {
        return Vec::new();
    }

    let source = target.prev();
    txs.iter()
        .filter(is_fixed_expense)
        .filter_map(|tx| {
            let day = tx.day().filter(|d| source.contains(*d))?;
            let date = target.date(day.day())?;
            Some(TransactionDraft {
                amount: tx.amount,
                category: tx.category.clone(),
                kind: tx.kind,
                date,
                description: tx.description.clone(),
                is_recurring_fixed: true,
                is_settled: false,
                installment_count: None,
                installment_index: None,
                account: tx.account.clone(),
            })
        })
        .collect()
}
