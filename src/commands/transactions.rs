// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::{expand_installments, roll_forward_fixed};
use crate::models::{DATE_FORMAT, Kind, TransactionDraft};
use crate::utils::{
    local_today, maybe_print_json, month_arg, optional_text, parse_amount, parse_date,
    parse_month, pretty_table, required, required_id, today_arg, yes_no,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("settle", sub)) => settle(conn, sub)?,
        Some(("dup", sub)) => duplicate(conn, sub)?,
        Some(("rm", sub)) => {
            let id = required_id(sub)?;
            db::delete_transaction(conn, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("roll-fixed", sub)) => roll_fixed(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Reads `tx add` arguments into a single draft (before installment expansion).
pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let amount = parse_amount(required(sub, "amount")?)?;
    let category = required(sub, "category")?.trim().to_string();
    let kind: Kind = sub
        .get_one::<String>("kind")
        .map(|k| k.parse::<Kind>())
        .transpose()?
        .unwrap_or(Kind::Expense);
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => local_today(),
    };
    let draft = TransactionDraft {
        amount,
        category,
        kind,
        date,
        description: optional_text(sub, "description").flatten(),
        is_recurring_fixed: sub.get_flag("fixed"),
        is_settled: sub.get_flag("settled"),
        installment_count: None,
        installment_index: None,
        account: optional_text(sub, "account").flatten(),
    };
    draft.validate()?;
    Ok(draft)
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let count = sub.get_one::<u32>("installments").copied().unwrap_or(1);
    let drafts = expand_installments(draft, count)?;
    let ids = db::insert_all(conn, &drafts)?;
    match drafts.as_slice() {
        [one] => println!(
            "Recorded {} {} in '{}' on {} (id {})",
            one.kind,
            one.amount,
            one.category,
            one.date,
            ids.first().copied().unwrap_or_default()
        ),
        [first, .., last] => println!(
            "Recorded {} installments of {} in '{}' from {} to {}",
            drafts.len(),
            first.amount,
            first.category,
            first.date,
            last.date
        ),
        [] => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    yes_no(r.fixed).to_string(),
                    yes_no(r.settled).to_string(),
                    r.installment.clone(),
                    r.account.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Date", "Kind", "Amount", "Category", "Description", "Fixed", "Settled",
                    "Inst.", "Account",
                ],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub fixed: bool,
    pub settled: bool,
    pub installment: String,
    pub account: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.kind, t.amount, t.category, t.description, t.fixed, t.settled,
                t.installment_index, t.installment_count, a.name
         FROM transactions t LEFT JOIN accounts a ON t.account_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(parse_month(month)?.to_string());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND t.category=?");
        params_vec.push(cat.trim().into());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        sql.push_str(" AND t.kind=?");
        params_vec.push(kind.parse::<Kind>()?.to_string());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let index: Option<u32> = r.get(8)?;
        let count: Option<u32> = r.get(9)?;
        let installment = match (index, count) {
            (Some(i), Some(n)) => format!("{}/{}", i, n),
            _ => String::new(),
        };
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            kind: r.get(2)?,
            amount: r.get(3)?,
            category: r.get(4)?,
            description: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
            fixed: r.get(6)?,
            settled: r.get(7)?,
            installment,
            account: r.get::<_, Option<String>>(10)?.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_id(sub)?;
    let mut tx = db::get_transaction(conn, id)?;

    if let Some(a) = sub.get_one::<String>("amount") {
        tx.amount = parse_amount(a)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        tx.category = c.trim().to_string();
    }
    if let Some(k) = sub.get_one::<String>("kind") {
        tx.kind = k.parse()?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        tx.date = parse_date(d)?.format(DATE_FORMAT).to_string();
    }
    if let Some(desc) = optional_text(sub, "description") {
        tx.description = desc;
    }
    if let Some(fixed) = sub.get_one::<bool>("fixed") {
        tx.is_recurring_fixed = *fixed;
    }
    if let Some(settled) = sub.get_one::<bool>("settled") {
        tx.is_settled = *settled;
    }
    if let Some(account) = optional_text(sub, "account") {
        tx.account = account;
    }

    tx.validate()
        .with_context(|| format!("Transaction {} would be invalid", id))?;
    db::update_transaction(conn, id, &tx)?;
    println!("Updated transaction {}", id);
    Ok(())
}

/// Flips paid/received.
fn settle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_id(sub)?;
    let n = conn.execute(
        "UPDATE transactions SET settled = 1 - settled WHERE id=?1",
        params![id],
    )?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    let tx = db::get_transaction(conn, id)?;
    tracing::info!(id, settled = tx.is_settled, "settled flag toggled");
    let state = match (tx.is_settled, tx.kind) {
        (true, Kind::Expense) => "paid",
        (true, Kind::Income) => "received",
        (false, _) => "pending",
    };
    println!("Transaction {} is now {}", id, state);
    Ok(())
}

/// Copies a transaction to a new date as a standalone, unsettled record.
fn duplicate(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_id(sub)?;
    let src = db::get_transaction(conn, id)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => local_today(),
    };
    let draft = TransactionDraft {
        amount: src.amount,
        category: src.category,
        kind: src.kind,
        date,
        description: src.description,
        is_recurring_fixed: src.is_recurring_fixed,
        is_settled: false,
        installment_count: None,
        installment_index: None,
        account: src.account,
    };
    draft.validate()?;
    let new_id = db::insert_transaction(conn, &draft)?;
    println!("Copied transaction {} to {} (id {})", id, date, new_id);
    Ok(())
}

fn roll_fixed(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = today_arg(sub)?;
    let target = month_arg(sub, today)?;
    let txs = db::load_transactions(conn)?;
    let drafts = roll_forward_fixed(&txs, target);
    if drafts.is_empty() {
        println!(
            "Nothing to copy: {} already has fixed expenses or {} has none",
            target,
            target.prev()
        );
        return Ok(());
    }
    db::insert_all(conn, &drafts)?;
    println!(
        "Copied {} fixed expense(s) from {} into {}",
        drafts.len(),
        target.prev(),
        target
    );
    Ok(())
}
