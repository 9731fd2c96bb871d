// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine;
use crate::models::{Kind, Transaction};
use crate::utils::{parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: &'static str,
    pub detail: String,
}

impl Issue {
    fn new(code: &'static str, detail: String) -> Self {
        Self { code, detail }
    }
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|i| vec![i.code.to_string(), i.detail]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Stored records that reports will skip or miscount.
pub fn find_issues(conn: &Connection) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    let mut stmt = conn.prepare(
        "SELECT id, date, amount, category, kind, installment_index, installment_count
         FROM transactions ORDER BY id",
    )?;
    let mut rows = stmt.query([])?;
    let mut txs = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(2)?;
        let kind_s: String = r.get(4)?;
        let Ok(amount) = parse_decimal(&amount_s) else {
            issues.push(Issue::new("invalid_amount", format!("#{}: '{}'", id, amount_s)));
            continue;
        };
        let Ok(kind) = kind_s.parse::<Kind>() else {
            issues.push(Issue::new("invalid_kind", format!("#{}: '{}'", id, kind_s)));
            continue;
        };
        txs.push(Transaction {
            id: id.to_string(),
            amount,
            category: r.get(3)?,
            kind,
            date: r.get(1)?,
            description: None,
            is_recurring_fixed: false,
            is_settled: false,
            installment_index: r.get(5)?,
            installment_count: r.get(6)?,
            account: None,
        });
    }

    for tx in engine::undated(&txs) {
        issues.push(Issue::new("undated", format!("#{}: '{}'", tx.id, tx.date)));
    }
    for tx in txs.iter().filter(|tx| tx.day().is_some()) {
        if let Err(e) = tx.validate() {
            issues.push(Issue::new("invalid_transaction", format!("#{}: {}", tx.id, e)));
        }
    }

    let mut stmt = conn.prepare(
        "SELECT name, installments_paid, installments_total FROM goals
         WHERE installments_paid > installments_total ORDER BY name",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let name: String = r.get(0)?;
        let paid: u32 = r.get(1)?;
        let total: u32 = r.get(2)?;
        issues.push(Issue::new(
            "goal_overpaid",
            format!("'{}': {}/{} installments", name, paid, total),
        ));
    }

    if !issues.is_empty() {
        tracing::warn!(count = issues.len(), "doctor found problems");
    }
    Ok(issues)
}
