// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, DEFAULT_CATEGORIES};
use crate::models::{Kind, Transaction, TransactionDraft, DATE_FORMAT};
use crate::utils::{id_for_account, parse_decimal};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fintrack", "fintrack"));

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")
}

pub fn db_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.db_path {
        return Ok(p.clone());
    }
    let proj = project_dirs()?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintrack.sqlite"))
}

pub fn open_or_init(cfg: &Config) -> Result<Connection> {
    open_at(&db_path(cfg)?)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Creates missing tables and seeds the default categories.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        grp TEXT NOT NULL CHECK(grp IN ('fixed','variable','income')),
        color TEXT NOT NULL DEFAULT '#6B7280',
        icon TEXT NOT NULL DEFAULT 'tag',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL,
        credit_limit TEXT NOT NULL DEFAULT '0',
        balance TEXT NOT NULL DEFAULT '0',
        color TEXT NOT NULL DEFAULT '#3B82F6',
        icon TEXT NOT NULL DEFAULT 'credit-card',
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('expense','income')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT,
        fixed INTEGER NOT NULL DEFAULT 0,
        settled INTEGER NOT NULL DEFAULT 0,
        installment_count INTEGER,
        installment_index INTEGER,
        account_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        target_amount TEXT NOT NULL,
        paid_amount TEXT NOT NULL DEFAULT '0',
        installments_total INTEGER NOT NULL CHECK(installments_total >= 1),
        installments_paid INTEGER NOT NULL DEFAULT 0,
        start_date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    seed_categories(conn)?;
    Ok(())
}

fn seed_categories(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    for (name, group, color, icon) in DEFAULT_CATEGORIES {
        tx.execute(
            "INSERT OR IGNORE INTO categories(name, grp, color, icon) VALUES (?1,?2,?3,?4)",
            params![name, group.as_str(), color, icon],
        )?;
    }
    tx.commit()?;
    Ok(())
}

const SELECT_TRANSACTIONS: &str =
    "SELECT t.id, t.amount, t.category, t.kind, t.date, t.description, t.fixed, t.settled,
            t.installment_count, t.installment_index, a.name
     FROM transactions t LEFT JOIN accounts a ON t.account_id=a.id";

/// Every stored transaction, oldest first, in the shape the engine reads.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY t.date, t.id", SELECT_TRANSACTIONS))?;
    let rows = stmt.query([])?;
    collect_transactions(rows)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let mut stmt = conn.prepare(&format!("{} WHERE t.id=?1", SELECT_TRANSACTIONS))?;
    let rows = stmt.query(params![id])?;
    collect_transactions(rows)?
        .into_iter()
        .next()
        .with_context(|| format!("Transaction {} not found", id))
}

fn collect_transactions(mut rows: rusqlite::Rows<'_>) -> Result<Vec<Transaction>> {
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let kind_s: String = r.get(3)?;
        let amount = parse_decimal(&amount_s)
            .with_context(|| format!("Invalid amount in transaction {}", id))?;
        let kind: Kind = kind_s
            .parse()
            .with_context(|| format!("Invalid kind in transaction {}", id))?;
        out.push(Transaction {
            id: id.to_string(),
            amount,
            category: r.get(2)?,
            kind,
            date: r.get(4)?,
            description: r.get(5)?,
            is_recurring_fixed: r.get(6)?,
            is_settled: r.get(7)?,
            installment_count: r.get(8)?,
            installment_index: r.get(9)?,
            account: r.get(10)?,
        });
    }
    Ok(out)
}

pub fn insert_transaction(conn: &Connection, draft: &TransactionDraft) -> Result<i64> {
    let account_id = match draft.account.as_deref() {
        Some(name) => Some(id_for_account(conn, name)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO transactions(date, kind, amount, category, description, fixed, settled,
                                  installment_count, installment_index, account_id)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            draft.date.format(DATE_FORMAT).to_string(),
            draft.kind.to_string(),
            draft.amount.to_string(),
            draft.category,
            draft.description,
            draft.is_recurring_fixed,
            draft.is_settled,
            draft.installment_count,
            draft.installment_index,
            account_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, kind = %draft.kind, date = %draft.date, "transaction stored");
    Ok(id)
}

/// Stores every draft or none of them.
pub fn insert_all(conn: &mut Connection, drafts: &[TransactionDraft]) -> Result<Vec<i64>> {
    let tx = conn.transaction()?;
    let mut ids = Vec::with_capacity(drafts.len());
    for draft in drafts {
        ids.push(insert_transaction(&tx, draft)?);
    }
    tx.commit()?;
    Ok(ids)
}

pub fn update_transaction(conn: &Connection, id: i64, t: &Transaction) -> Result<()> {
    let account_id = match t.account.as_deref() {
        Some(name) => Some(id_for_account(conn, name)?),
        None => None,
    };
    let n = conn.execute(
        "UPDATE transactions SET date=?1, kind=?2, amount=?3, category=?4, description=?5,
                fixed=?6, settled=?7, installment_count=?8, installment_index=?9, account_id=?10
         WHERE id=?11",
        params![
            t.date,
            t.kind.to_string(),
            t.amount.to_string(),
            t.category,
            t.description,
            t.is_recurring_fixed,
            t.is_settled,
            t.installment_count,
            t.installment_index,
            account_id,
            id
        ],
    )?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    tracing::info!(id, "transaction updated");
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    tracing::info!(id, "transaction deleted");
    Ok(())
}
