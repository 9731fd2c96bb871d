// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::importer::CSV_HEADER;
use crate::db;
use crate::engine::{CategoryShare, Period, PeriodTotals, category_breakdown, period_totals};
use crate::models::Transaction;
use crate::utils::{local_today, parse_month, required};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

const STATEMENT_TOP_CATEGORIES: usize = 5;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("report", sub)) => export_report(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let txs = db::load_transactions(conn)?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(CSV_HEADER)?;
            for t in &txs {
                wtr.write_record([
                    t.date.clone(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.description.clone().unwrap_or_default(),
                    t.is_recurring_fixed.to_string(),
                    t.is_settled.to_string(),
                    t.installment_index.map(|i| i.to_string()).unwrap_or_default(),
                    t.installment_count.map(|n| n.to_string()).unwrap_or_default(),
                    t.account.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => std::fs::write(out, serde_json::to_string_pretty(&txs)?)?,
    }
    tracing::info!(count = txs.len(), format = %fmt, out, "transactions exported");
    println!("Exported {} transaction(s) to {}", txs.len(), out);
    Ok(())
}

/// Monthly statement written by `export report`.
#[derive(Debug, Serialize)]
pub struct Statement {
    pub period: Period,
    pub totals: PeriodTotals,
    pub top_categories: Vec<CategoryShare>,
    /// The month's transactions, newest first.
    pub transactions: Vec<Transaction>,
}

pub fn statement(txs: &[Transaction], period: Period) -> Statement {
    let mut top_categories = category_breakdown(txs, period);
    top_categories.truncate(STATEMENT_TOP_CATEGORIES);
    let mut transactions: Vec<Transaction> =
        txs.iter().filter(|t| t.in_period(period)).cloned().collect();
    transactions.reverse();
    transactions.sort_by(|a, b| b.day().cmp(&a.day()));
    Statement {
        period,
        totals: period_totals(txs, period),
        top_categories,
        transactions,
    }
}

fn export_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let out = required(sub, "out")?;
    let period = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => Period::of(local_today()),
    };
    let txs = db::load_transactions(conn)?;
    let report = statement(&txs, period);
    std::fs::write(out, serde_json::to_string_pretty(&report)?)?;
    tracing::info!(period = %period, out, "statement exported");
    println!("Exported {} statement to {}", period, out);
    Ok(())
}
