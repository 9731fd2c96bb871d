// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::commands::{accounts, categories, doctor, goals, settings};
use fintrack::config::{Config, DEFAULT_CATEGORIES};
use fintrack::models::AccountKind;
use fintrack::{cli, db, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["fintrack"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("category", m)) => categories::handle(conn, m),
        Some(("account", m)) => accounts::handle(conn, m),
        Some(("goal", m)) => goals::handle(conn, m),
        Some(("settings", m)) => settings::handle(conn, m),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn schema_seeds_default_categories_once() {
    let mut conn = setup();
    db::init_schema(&mut conn).unwrap();
    let cats = categories::list_categories(&conn).unwrap();
    assert_eq!(cats.len(), DEFAULT_CATEGORIES.len());
    assert!(cats.iter().any(|c| c.name == "Rent" && c.icon == "home"));
}

#[test]
fn category_edit_renames_transactions_too() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date,kind,amount,category) VALUES ('2025-01-02','expense','10','Market')",
        [],
    )
    .unwrap();
    run(
        &conn,
        &["category", "edit", "--name", "Market", "--rename", "Groceries", "--color", "#00FF00"],
    )
    .unwrap();
    let t = db::get_transaction(&conn, 1).unwrap();
    assert_eq!(t.category, "Groceries");

    let styles = categories::load_styles(&conn, &Config::default()).unwrap();
    assert_eq!(styles.lookup("Groceries").color, "#00FF00");
}

#[test]
fn category_rm_refuses_while_in_use() {
    let conn = setup();
    run(&conn, &["category", "add", "--name", "Pets", "--group", "variable"]).unwrap();
    conn.execute(
        "INSERT INTO transactions(date,kind,amount,category) VALUES ('2025-01-02','expense','10','Pets')",
        [],
    )
    .unwrap();
    assert!(run(&conn, &["category", "rm", "--name", "Pets"]).is_err());
    conn.execute("DELETE FROM transactions", []).unwrap();
    run(&conn, &["category", "rm", "--name", "Pets"]).unwrap();
    assert!(utils::id_for_category(&conn, "Pets").is_err());
}

#[test]
fn account_lifecycle() {
    let conn = setup();
    run(
        &conn,
        &["account", "add", "--name", "Visa", "--type", "credit-card", "--limit", "2000"],
    )
    .unwrap();
    let visa = accounts::get_account(&conn, "Visa").unwrap();
    assert_eq!(visa.kind, AccountKind::CreditCard);
    assert_eq!(visa.limit, Decimal::from(2000));
    assert!(visa.active);

    conn.execute(
        "INSERT INTO transactions(date,kind,amount,category,account_id) VALUES ('2025-01-02','expense','10','Market',?1)",
        [visa.id],
    )
    .unwrap();
    assert!(run(&conn, &["account", "rm", "--name", "Visa"]).is_err());
    run(&conn, &["account", "balance", "--name", "Visa", "--json"]).unwrap();

    run(&conn, &["account", "edit", "--name", "Visa", "--active", "false", "--limit", "2500"])
        .unwrap();
    let visa = accounts::get_account(&conn, "Visa").unwrap();
    assert!(!visa.active);
    assert_eq!(visa.limit, Decimal::from(2500));

    assert!(run(&conn, &["account", "add", "--name", "X", "--type", "bitcoin"]).is_err());
}

#[test]
fn goal_pay_until_done() {
    let conn = setup();
    run(
        &conn,
        &[
            "goal",
            "add",
            "--name",
            "Trip",
            "--target",
            "900",
            "--installments",
            "3",
            "--start",
            "2025-01-01",
        ],
    )
    .unwrap();
    for _ in 0..3 {
        run(&conn, &["goal", "pay", "--name", "Trip"]).unwrap();
    }
    let trip = goals::get_goal(&conn, "Trip").unwrap();
    assert_eq!(trip.installments_paid, 3);
    assert_eq!(trip.paid_amount, Decimal::from(900));
    assert!(run(&conn, &["goal", "pay", "--name", "Trip"]).is_err());

    run(&conn, &["goal", "rm", "--name", "Trip"]).unwrap();
    assert!(goals::list_goals(&conn).unwrap().is_empty());
}

#[test]
fn goal_add_rejects_zero_target() {
    let conn = setup();
    assert!(
        run(&conn, &["goal", "add", "--name", "Car", "--target", "0", "--installments", "12"])
            .is_err()
    );
}

#[test]
fn goal_edit_updates_fields_and_keeps_payments() {
    let conn = setup();
    run(
        &conn,
        &["goal", "add", "--name", "Car", "--target", "1200", "--installments", "4"],
    )
    .unwrap();
    run(&conn, &["goal", "pay", "--name", "Car"]).unwrap();
    run(&conn, &["goal", "pay", "--name", "Car"]).unwrap();

    run(
        &conn,
        &[
            "goal",
            "edit",
            "--name",
            "Car",
            "--rename",
            "New car",
            "--target",
            "1500",
            "--installments",
            "5",
            "--start",
            "2025-03-01",
        ],
    )
    .unwrap();
    assert!(goals::get_goal(&conn, "Car").is_err());
    let car = goals::get_goal(&conn, "New car").unwrap();
    assert_eq!(car.target_amount, Decimal::from(1500));
    assert_eq!(car.installments_total, 5);
    assert_eq!(car.installments_paid, 2);
    assert_eq!(car.paid_amount, Decimal::from(600));
    assert_eq!(car.start_date.to_string(), "2025-03-01");
}

#[test]
fn goal_edit_rejects_invalid_changes() {
    let conn = setup();
    run(
        &conn,
        &["goal", "add", "--name", "Car", "--target", "1200", "--installments", "4"],
    )
    .unwrap();
    for _ in 0..3 {
        run(&conn, &["goal", "pay", "--name", "Car"]).unwrap();
    }

    assert!(run(&conn, &["goal", "edit", "--name", "Car", "--installments", "2"]).is_err());
    assert!(run(&conn, &["goal", "edit", "--name", "Car", "--installments", "0"]).is_err());
    assert!(run(&conn, &["goal", "edit", "--name", "Car", "--target", "0"]).is_err());
    assert!(run(&conn, &["goal", "edit", "--name", "Nope", "--target", "10"]).is_err());

    run(&conn, &["goal", "edit", "--name", "Car", "--installments", "3"]).unwrap();
    let car = goals::get_goal(&conn, "Car").unwrap();
    assert_eq!(car.installments_total, 3);
    assert_eq!(car.target_amount, Decimal::from(1200));
}

#[test]
fn currency_setting_round_trips() {
    let conn = setup();
    assert_eq!(utils::get_currency(&conn).unwrap(), "BRL");
    run(&conn, &["settings", "currency", "usd"]).unwrap();
    assert_eq!(utils::get_currency(&conn).unwrap(), "USD");
    assert!(run(&conn, &["settings", "currency", "dollars"]).is_err());
}

#[test]
fn doctor_lists_records_reports_skip() {
    let conn = setup();
    conn.execute_batch(
        "INSERT INTO transactions(date,kind,amount,category) VALUES
            ('2025-01-02','expense','10','Market'),
            ('2025-02-30','expense','10','Market'),
            ('2025-01-03','expense','ten','Market'),
            ('2025-01-04','expense','0','Market');
         INSERT INTO transactions(date,kind,amount,category,installment_index) VALUES
            ('2025-01-05','expense','5','Market',2);
         INSERT INTO goals(name,target_amount,installments_total,installments_paid,start_date) VALUES
            ('Trip','100',2,3,'2025-01-01');",
    )
    .unwrap();
    let codes: Vec<&str> = doctor::find_issues(&conn)
        .unwrap()
        .iter()
        .map(|i| i.code)
        .collect();
    assert_eq!(
        codes,
        ["invalid_amount", "undated", "invalid_transaction", "invalid_transaction", "goal_overpaid"]
    );
    doctor::handle(&conn).unwrap();
}

#[test]
fn doctor_is_quiet_on_clean_data() {
    let conn = setup();
    assert!(doctor::find_issues(&conn).unwrap().is_empty());
}

#[test]
fn config_file_overrides_styles() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r##"{{"log_filter": "debug", "category_styles": {{"Rent": {{"color": "#000000", "icon": "building"}}}}}}"##
    )
    .unwrap();
    file.flush().unwrap();

    let cfg = Config::from_path(file.path()).unwrap();
    assert_eq!(cfg.log_filter.as_deref(), Some("debug"));
    assert!(cfg.db_path.is_none());
    let styles = cfg.styles();
    assert_eq!(styles.lookup("Rent").icon, "building");
    assert_eq!(styles.lookup("Market").color, "#10B981");
    assert_eq!(styles.lookup("Unknown").icon, "dollar-sign");
}
