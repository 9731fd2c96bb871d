// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn flag(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).action(ArgAction::SetTrue).help(help)
}

fn opt(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help)
}

fn req(id: &'static str, help: &'static str) -> Arg {
    opt(id, help).required(true)
}

fn output_args() -> [Arg; 2] {
    [
        flag("json", "Print pretty JSON"),
        flag("jsonl", "Print one JSON document per line"),
    ]
}

/// Arguments shared by every report: which month, which day is today, and
/// where transactions come from.
fn report_args() -> [Arg; 3] {
    [
        opt("month", "Month to report (YYYY-MM), defaults to the current month"),
        opt("today", "Reference date (YYYY-MM-DD), defaults to the local date"),
        opt(
            "input",
            "Read transactions from a JSON snapshot instead of the database",
        ),
    ]
}

fn report_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .args(report_args())
        .args(output_args())
}

fn id_arg() -> Arg {
    req("id", "Transaction id").value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Personal finance tracker: transactions, dashboards, forecasts and savings goals")
        .version(crate_version!())
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(tx_cmd())
        .subcommand(category_cmd())
        .subcommand(account_cmd())
        .subcommand(goal_cmd())
        .subcommand(
            Command::new("report")
                .about("Dashboards and reports")
                .subcommand(report_cmd("summary", "Totals for a month"))
                .subcommand(
                    report_cmd("categories", "Expenses per category").arg(
                        opt("top", "Only show the largest N categories")
                            .value_parser(value_parser!(usize)),
                    ),
                )
                .subcommand(report_cmd("due", "Unpaid expenses by due date"))
                .subcommand(report_cmd("trend", "Income and expenses around a month"))
                .subcommand(report_cmd("forecast", "Projection for the following month"))
                .subcommand(
                    report_cmd("insights", "Comparisons with the previous month").arg(
                        opt("limit", "Maximum number of insights")
                            .value_parser(value_parser!(usize))
                            .default_value("2"),
                    ),
                )
                .subcommand(report_cmd("dashboard", "Everything for a month at once")),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("transactions")
                        .about("Import transactions from CSV or a JSON snapshot")
                        .arg(req("path", "File to read"))
                        .arg(
                            opt("format", "csv or json")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export all transactions")
                        .arg(req("format", "csv or json"))
                        .arg(req("out", "Output file")),
                )
                .subcommand(
                    Command::new("report")
                        .about("Write a monthly statement as JSON")
                        .arg(opt("month", "Month (YYYY-MM), defaults to the current month"))
                        .arg(req("out", "Output file")),
                ),
        )
        .subcommand(Command::new("doctor").about("Find records the reports cannot use"))
        .subcommand(
            Command::new("settings").about("Preferences").subcommand(
                Command::new("currency")
                    .about("Show or set the display currency")
                    .arg(Arg::new("code").help("Currency code, e.g. BRL")),
            ),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and manage transactions")
        .subcommand(
            Command::new("add")
                .about("Add a transaction (or an installment series)")
                .arg(req("amount", "Positive amount"))
                .arg(req("category", "Category label"))
                .arg(
                    opt("kind", "expense or income")
                        .value_parser(["expense", "income"])
                        .default_value("expense"),
                )
                .arg(opt("date", "Date (YYYY-MM-DD), defaults to today"))
                .arg(opt("description", "Free text"))
                .arg(flag("fixed", "Fixed monthly obligation"))
                .arg(flag("settled", "Already paid or received"))
                .arg(
                    opt("installments", "Split into N monthly installments")
                        .value_parser(value_parser!(u32))
                        .default_value("1"),
                )
                .arg(opt("account", "Account or card name")),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(opt("month", "Only this month (YYYY-MM)"))
                .arg(opt("category", "Only this category"))
                .arg(opt("kind", "expense or income").value_parser(["expense", "income"]))
                .arg(opt("limit", "Maximum rows").value_parser(value_parser!(usize)))
                .args(output_args()),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a transaction")
                .arg(id_arg())
                .arg(opt("amount", "Positive amount"))
                .arg(opt("category", "Category label"))
                .arg(opt("kind", "expense or income").value_parser(["expense", "income"]))
                .arg(opt("date", "Date (YYYY-MM-DD)"))
                .arg(opt("description", "Free text"))
                .arg(opt("fixed", "true or false").value_parser(value_parser!(bool)))
                .arg(opt("settled", "true or false").value_parser(value_parser!(bool)))
                .arg(opt("account", "Account or card name")),
        )
        .subcommand(
            Command::new("settle")
                .about("Toggle the paid/received flag")
                .arg(id_arg()),
        )
        .subcommand(
            Command::new("dup")
                .about("Copy a transaction to another date, unsettled")
                .arg(id_arg())
                .arg(opt("date", "Date of the copy, defaults to today")),
        )
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
        .subcommand(
            Command::new("roll-fixed")
                .about("Copy last month's fixed expenses into a month that has none")
                .arg(opt("month", "Target month (YYYY-MM), defaults to the current month"))
                .arg(opt("today", "Reference date (YYYY-MM-DD)")),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Category name"))
                .arg(
                    req("group", "fixed, variable or income")
                        .value_parser(["fixed", "variable", "income"]),
                )
                .arg(opt("color", "Hex colour").default_value("#6B7280"))
                .arg(opt("icon", "Icon name").default_value("tag")),
        )
        .subcommand(Command::new("list").args(output_args()))
        .subcommand(
            Command::new("edit")
                .arg(req("name", "Category name"))
                .arg(opt("rename", "New name"))
                .arg(
                    opt("group", "fixed, variable or income")
                        .value_parser(["fixed", "variable", "income"]),
                )
                .arg(opt("color", "Hex colour"))
                .arg(opt("icon", "Icon name")),
        )
        .subcommand(Command::new("rm").arg(req("name", "Category name")))
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Manage accounts and cards")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Account name"))
                .arg(req(
                    "type",
                    "checking, savings, credit_card, cash or investment",
                ))
                .arg(opt("limit", "Credit limit").default_value("0"))
                .arg(opt("balance", "Current balance").default_value("0"))
                .arg(opt("color", "Hex colour").default_value("#3B82F6"))
                .arg(opt("icon", "Icon name").default_value("credit-card")),
        )
        .subcommand(Command::new("list").args(output_args()))
        .subcommand(
            Command::new("edit")
                .arg(req("name", "Account name"))
                .arg(opt("rename", "New name"))
                .arg(opt(
                    "type",
                    "checking, savings, credit_card, cash or investment",
                ))
                .arg(opt("limit", "Credit limit"))
                .arg(opt("balance", "Current balance"))
                .arg(opt("color", "Hex colour"))
                .arg(opt("icon", "Icon name"))
                .arg(opt("active", "true or false").value_parser(value_parser!(bool))),
        )
        .subcommand(Command::new("rm").arg(req("name", "Account name")))
        .subcommand(
            Command::new("balance")
                .about("Balance or card limit left after unpaid transactions")
                .arg(req("name", "Account name"))
                .args(output_args()),
        )
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals paid in installments")
        .subcommand(
            Command::new("add")
                .arg(req("name", "Goal name"))
                .arg(req("target", "Target amount"))
                .arg(req("installments", "Number of installments").value_parser(value_parser!(u32)))
                .arg(opt("start", "Start date (YYYY-MM-DD), defaults to today")),
        )
        .subcommand(Command::new("list").args(output_args()))
        .subcommand(
            Command::new("edit")
                .arg(req("name", "Goal name"))
                .arg(opt("rename", "New name"))
                .arg(opt("target", "Target amount"))
                .arg(
                    opt("installments", "Number of installments")
                        .value_parser(value_parser!(u32)),
                )
                .arg(opt("start", "Start date (YYYY-MM-DD)")),
        )
        .subcommand(Command::new("pay").about("Pay one installment").arg(req("name", "Goal name")))
        .subcommand(Command::new("rm").arg(req("name", "Goal name")))
}
