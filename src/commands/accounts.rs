// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::account_availability;
use crate::models::{Account, AccountKind};
use crate::utils::{
    fmt_money, get_currency, id_for_account, maybe_print_json, parse_decimal, pretty_table,
    required, yes_no,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim();
            let kind: AccountKind = required(sub, "type")?.parse()?;
            let limit = parse_decimal(required(sub, "limit")?)?;
            let balance = parse_decimal(required(sub, "balance")?)?;
            if limit < rust_decimal::Decimal::ZERO {
                return Err(anyhow!("Credit limit must not be negative"));
            }
            conn.execute(
                "INSERT INTO accounts(name, type, credit_limit, balance, color, icon)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    name,
                    kind.as_str(),
                    limit.to_string(),
                    balance.to_string(),
                    required(sub, "color")?,
                    required(sub, "icon")?
                ],
            )?;
            tracing::info!(name, kind = kind.as_str(), "account added");
            println!("Added account '{}' ({})", name, kind.as_str());
        }
        Some(("list", sub)) => {
            let accounts = list_accounts(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let ccy = get_currency(conn)?;
                let data = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.name.clone(),
                            a.kind.as_str().to_string(),
                            fmt_money(&a.limit, &ccy),
                            fmt_money(&a.balance, &ccy),
                            yes_no(a.active).to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Type", "Limit", "Balance", "Active"], data)
                );
            }
        }
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let name = required(sub, "name")?.trim();
            let id = id_for_account(conn, name)?;
            let used: i64 = conn.query_row(
                "SELECT COUNT(*) FROM transactions WHERE account_id=?1",
                params![id],
                |r| r.get(0),
            )?;
            if used > 0 {
                return Err(anyhow!(
                    "Account '{}' is used by {} transaction(s); move or delete them first",
                    name,
                    used
                ));
            }
            conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
            tracing::info!(name, "account removed");
            println!("Removed account '{}'", name);
        }
        Some(("balance", sub)) => balance(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, credit_limit, balance, color, icon, active
         FROM accounts ORDER BY name",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let name: String = r.get(1)?;
        let kind: String = r.get(2)?;
        let limit: String = r.get(3)?;
        let balance: String = r.get(4)?;
        out.push(Account {
            id: r.get(0)?,
            kind: kind
                .parse()
                .with_context(|| format!("Invalid type for account '{}'", name))?,
            limit: parse_decimal(&limit)?,
            balance: parse_decimal(&balance)?,
            color: r.get(5)?,
            icon: r.get(6)?,
            active: r.get(7)?,
            name,
        });
    }
    Ok(out)
}

pub fn get_account(conn: &Connection, name: &str) -> Result<Account> {
    list_accounts(conn)?
        .into_iter()
        .find(|a| a.name == name)
        .with_context(|| format!("Account '{}' not found", name))
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required(sub, "name")?.trim();
    let id = id_for_account(conn, name)?;
    let tx = conn.unchecked_transaction()?;
    if let Some(kind) = sub.get_one::<String>("type") {
        let kind: AccountKind = kind.parse()?;
        tx.execute("UPDATE accounts SET type=?1 WHERE id=?2", params![kind.as_str(), id])?;
    }
    if let Some(limit) = sub.get_one::<String>("limit") {
        let limit = parse_decimal(limit)?;
        if limit < rust_decimal::Decimal::ZERO {
            return Err(anyhow!("Credit limit must not be negative"));
        }
        tx.execute(
            "UPDATE accounts SET credit_limit=?1 WHERE id=?2",
            params![limit.to_string(), id],
        )?;
    }
    if let Some(balance) = sub.get_one::<String>("balance") {
        let balance = parse_decimal(balance)?;
        tx.execute(
            "UPDATE accounts SET balance=?1 WHERE id=?2",
            params![balance.to_string(), id],
        )?;
    }
    if let Some(color) = sub.get_one::<String>("color") {
        tx.execute("UPDATE accounts SET color=?1 WHERE id=?2", params![color, id])?;
    }
    if let Some(icon) = sub.get_one::<String>("icon") {
        tx.execute("UPDATE accounts SET icon=?1 WHERE id=?2", params![icon, id])?;
    }
    if let Some(active) = sub.get_one::<bool>("active") {
        tx.execute("UPDATE accounts SET active=?1 WHERE id=?2", params![active, id])?;
    }
    if let Some(new_name) = sub.get_one::<String>("rename").map(|s| s.trim()) {
        if new_name.is_empty() {
            return Err(anyhow!("New account name must not be empty"));
        }
        tx.execute("UPDATE accounts SET name=?1 WHERE id=?2", params![new_name, id])?;
    }
    tx.commit()?;
    tracing::info!(name, "account updated");
    println!("Updated account '{}'", name);
    Ok(())
}

fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account = get_account(conn, required(sub, "name")?.trim())?;
    let txs = db::load_transactions(conn)?;
    let avail = account_availability(&account, &txs);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &avail)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let mut rows = vec![vec!["Unpaid".to_string(), fmt_money(&avail.unpaid_total, &ccy)]];
    match account.kind {
        AccountKind::CreditCard => {
            rows.push(vec!["Limit".into(), fmt_money(&account.limit, &ccy)]);
            rows.push(vec!["Available".into(), fmt_money(&avail.available, &ccy)]);
            if let Some(p) = avail.percent_used {
                rows.push(vec!["Used".into(), format!("{}%", p)]);
            }
        }
        _ => {
            rows.push(vec!["Balance".into(), fmt_money(&account.balance, &ccy)]);
            rows.push(vec!["Available".into(), fmt_money(&avail.available, &ccy)]);
        }
    }
    println!("{}", account.name);
    println!("{}", pretty_table(&["", "Amount"], rows));
    Ok(())
}
