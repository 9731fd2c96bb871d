// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine;
use crate::models::{Kind, Transaction, TransactionDraft};
use crate::utils::{parse_amount, parse_date, required};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Column order shared with `export transactions --format csv`.
pub const CSV_HEADER: [&str; 10] = [
    "date",
    "kind",
    "amount",
    "category",
    "description",
    "fixed",
    "settled",
    "installment_index",
    "installment_count",
    "account",
];

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = required(sub, "path")?.trim();
    let format = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".into());
    let drafts = match format.as_str() {
        "csv" => read_csv(Path::new(path))?,
        "json" => read_snapshot(Path::new(path))?
            .into_iter()
            .map(|t| draft_from_snapshot(&t))
            .collect::<Result<Vec<_>>>()?,
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    };
    let ids = db::insert_all(conn, &drafts)?;
    tracing::info!(count = ids.len(), path, "transactions imported");
    println!("Imported {} transaction(s) from {}", ids.len(), path);
    Ok(())
}

/// Reads a JSON array of transactions as exported by `export transactions`
/// or by the web API. Undated records are kept; reports skip them.
pub fn read_snapshot(path: &Path) -> Result<Vec<Transaction>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read snapshot {}", path.display()))?;
    let txs: Vec<Transaction> = serde_json::from_str(&raw)
        .with_context(|| format!("Parse snapshot {}", path.display()))?;
    let undated = engine::undated(&txs).count();
    if undated > 0 {
        tracing::warn!(
            undated,
            path = %path.display(),
            "snapshot has transactions without a valid date; they are left out of every report"
        );
    }
    tracing::debug!(count = txs.len(), "snapshot loaded");
    Ok(txs)
}

fn draft_from_snapshot(t: &Transaction) -> Result<TransactionDraft> {
    t.validate()
        .with_context(|| format!("Transaction '{}' cannot be imported", t.id))?;
    let date = parse_date(&t.date)?;
    Ok(TransactionDraft {
        amount: t.amount,
        category: t.category.trim().to_string(),
        kind: t.kind,
        date,
        description: t.description.clone(),
        is_recurring_fixed: t.is_recurring_fixed,
        is_settled: t.is_settled,
        installment_count: t.installment_count,
        installment_index: t.installment_index,
        account: t.account.clone(),
    })
}

fn read_csv(path: &Path) -> Result<Vec<TransactionDraft>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let rec = result?;
        let field = |idx: usize| rec.get(idx).map(str::trim).unwrap_or("");
        let text = |idx: usize| Some(field(idx)).filter(|s| !s.is_empty()).map(String::from);
        let number = |idx: usize| -> Result<Option<u32>> {
            text(idx)
                .map(|s| s.parse::<u32>())
                .transpose()
                .with_context(|| format!("Invalid {} on line {}", CSV_HEADER[idx], line))
        };

        let date = parse_date(field(0)).with_context(|| format!("Line {}", line))?;
        let kind = field(1).parse::<Kind>().with_context(|| format!("Line {}", line))?;
        let amount = parse_amount(field(2)).with_context(|| format!("Line {}", line))?;
        let draft = TransactionDraft {
            amount,
            category: field(3).to_string(),
            kind,
            date,
            description: text(4),
            is_recurring_fixed: parse_flag(field(5)).with_context(|| format!("Line {}", line))?,
            is_settled: parse_flag(field(6)).with_context(|| format!("Line {}", line))?,
            installment_index: number(7)?,
            installment_count: number(8)?,
            account: text(9),
        };
        draft.validate().with_context(|| format!("Line {}", line))?;
        out.push(draft);
    }
    Ok(out)
}

fn parse_flag(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        other => Err(anyhow!("Invalid flag '{}', expected true/false", other)),
    }
}
