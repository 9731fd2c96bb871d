// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::{cli, commands::transactions, db};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO accounts(id,name,type,credit_limit) VALUES (1,'Visa','credit_card','2000')",
        [],
    )
    .unwrap();
    for (date, amount, fixed) in [
        ("2025-01-01", "1200", true),
        ("2025-01-02", "35.50", false),
        ("2025-01-03", "80", false),
    ] {
        conn.execute(
            "INSERT INTO transactions(date,kind,amount,category,fixed,settled)
             VALUES (?1,'expense',?2,'Rent',?3,1)",
            params![date, amount, fixed],
        )
        .unwrap();
    }
    conn
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["fintrack", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m)
    } else {
        panic!("no tx subcommand");
    }
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from(["fintrack", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_splits_installments_across_months() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "add",
            "--amount",
            "150",
            "--category",
            "Shopping",
            "--date",
            "2025-01-31",
            "--description",
            "Phone",
            "--installments",
            "3",
            "--account",
            "Visa",
        ],
    )
    .unwrap();
    assert_eq!(count(&conn), 6);

    let matches = cli::build_cli().get_matches_from([
        "fintrack", "tx", "list", "--month", "2025-02", "--category", "Shopping",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2025-02-28");
    assert_eq!(rows[0].installment, "2/3");
    assert_eq!(rows[0].description, "Phone (2/3)");
    assert_eq!(rows[0].account, "Visa");
    assert!(!rows[0].settled);
}

#[test]
fn add_rejects_non_positive_amount_and_unknown_account() {
    let mut conn = setup();
    assert!(run(&mut conn, &["add", "--amount", "0", "--category", "Market"]).is_err());
    assert!(
        run(
            &mut conn,
            &["add", "--amount", "10", "--category", "Market", "--account", "Nope"]
        )
        .is_err()
    );
    assert_eq!(count(&conn), 3);
}

#[test]
fn settle_toggles_the_flag() {
    let mut conn = setup();
    run(&mut conn, &["settle", "--id", "2"]).unwrap();
    assert!(!db::get_transaction(&conn, 2).unwrap().is_settled);
    run(&mut conn, &["settle", "--id", "2"]).unwrap();
    assert!(db::get_transaction(&conn, 2).unwrap().is_settled);
    assert!(run(&mut conn, &["settle", "--id", "99"]).is_err());
}

#[test]
fn edit_updates_selected_fields() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "edit",
            "--id",
            "3",
            "--amount",
            "95.10",
            "--category",
            "Market",
            "--fixed",
            "true",
            "--description",
            "weekly",
        ],
    )
    .unwrap();
    let t = db::get_transaction(&conn, 3).unwrap();
    assert_eq!(t.amount.to_string(), "95.10");
    assert_eq!(t.category, "Market");
    assert!(t.is_recurring_fixed);
    assert!(t.is_settled);
    assert_eq!(t.description.as_deref(), Some("weekly"));
    assert_eq!(t.date, "2025-01-03");
}

#[test]
fn dup_copies_as_unsettled() {
    let mut conn = setup();
    run(&mut conn, &["dup", "--id", "1", "--date", "2025-02-01"]).unwrap();
    let t = db::get_transaction(&conn, 4).unwrap();
    assert_eq!(t.date, "2025-02-01");
    assert_eq!(t.category, "Rent");
    assert!(t.is_recurring_fixed);
    assert!(!t.is_settled);
}

#[test]
fn rm_deletes_once() {
    let mut conn = setup();
    run(&mut conn, &["rm", "--id", "2"]).unwrap();
    assert_eq!(count(&conn), 2);
    assert!(run(&mut conn, &["rm", "--id", "2"]).is_err());
}

#[test]
fn roll_fixed_copies_only_into_empty_months() {
    let mut conn = setup();
    run(&mut conn, &["roll-fixed", "--month", "2025-02"]).unwrap();
    assert_eq!(count(&conn), 4);
    let copy = db::get_transaction(&conn, 4).unwrap();
    assert_eq!(copy.date, "2025-02-01");
    assert!(copy.is_recurring_fixed);
    assert!(!copy.is_settled);

    run(&mut conn, &["roll-fixed", "--month", "2025-02"]).unwrap();
    assert_eq!(count(&conn), 4);
}
