// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{GoalProgress, goal_progress, pay_installment};
use crate::models::{DATE_FORMAT, SavingsGoal};
use crate::utils::{
    fmt_money, get_currency, id_for_goal, local_today, maybe_print_json, parse_amount,
    parse_date, parse_decimal, pretty_table, required, yes_no,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("pay", sub)) => {
            let goal = get_goal(conn, required(sub, "name")?.trim())?;
            let paid = pay(conn, &goal)?;
            let progress = goal_progress(&paid);
            let ccy = get_currency(conn)?;
            println!(
                "Paid installment {}/{} of '{}': {} of {} ({}%)",
                paid.installments_paid,
                paid.installments_total,
                paid.name,
                fmt_money(&paid.paid_amount, &ccy),
                fmt_money(&paid.target_amount, &ccy),
                progress.percent
            );
        }
        Some(("rm", sub)) => {
            let name = required(sub, "name")?.trim();
            let id = id_for_goal(conn, name)?;
            conn.execute("DELETE FROM goals WHERE id=?1", params![id])?;
            tracing::info!(name, "goal removed");
            println!("Removed goal '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required(sub, "name")?.trim();
    if name.is_empty() {
        return Err(anyhow!("Goal name must not be empty"));
    }
    let goal = SavingsGoal {
        id: 0,
        name: name.to_string(),
        target_amount: parse_amount(required(sub, "target")?)?,
        paid_amount: rust_decimal::Decimal::ZERO,
        installments_total: sub
            .get_one::<u32>("installments")
            .copied()
            .context("--installments is required")?,
        installments_paid: 0,
        start_date: match sub.get_one::<String>("start") {
            Some(d) => parse_date(d)?,
            None => local_today(),
        },
    };
    goal.validate()?;
    conn.execute(
        "INSERT INTO goals(name, target_amount, installments_total, start_date)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            goal.name,
            goal.target_amount.to_string(),
            goal.installments_total,
            goal.start_date.format(DATE_FORMAT).to_string()
        ],
    )?;
    let progress = goal_progress(&goal);
    tracing::info!(name, "goal added");
    println!(
        "Added goal '{}': {} installments of {}",
        goal.name, goal.installments_total, progress.installment_amount
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required(sub, "name")?.trim();
    let mut goal = get_goal(conn, name)?;
    if let Some(new_name) = sub.get_one::<String>("rename").map(|s| s.trim()) {
        if new_name.is_empty() {
            return Err(anyhow!("New goal name must not be empty"));
        }
        goal.name = new_name.to_string();
    }
    if let Some(target) = sub.get_one::<String>("target") {
        goal.target_amount = parse_amount(target)?;
    }
    if let Some(total) = sub.get_one::<u32>("installments") {
        goal.installments_total = *total;
    }
    if let Some(start) = sub.get_one::<String>("start") {
        goal.start_date = parse_date(start)?;
    }

    goal.validate()
        .with_context(|| format!("Goal '{}' would be invalid", name))?;
    if goal.installments_total < goal.installments_paid {
        return Err(anyhow!(
            "Goal '{}' already has {} installment(s) paid; cannot lower the total to {}",
            name,
            goal.installments_paid,
            goal.installments_total
        ));
    }
    conn.execute(
        "UPDATE goals SET name=?1, target_amount=?2, installments_total=?3, start_date=?4
         WHERE id=?5",
        params![
            goal.name,
            goal.target_amount.to_string(),
            goal.installments_total,
            goal.start_date.format(DATE_FORMAT).to_string(),
            goal.id
        ],
    )?;
    tracing::info!(name, "goal updated");
    println!("Updated goal '{}'", goal.name);
    Ok(())
}

#[derive(Serialize)]
struct GoalRow {
    #[serde(flatten)]
    goal: SavingsGoal,
    progress: GoalProgress,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<GoalRow> = list_goals(conn)?
        .into_iter()
        .map(|goal| GoalRow {
            progress: goal_progress(&goal),
            goal,
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.goal.name.clone(),
                fmt_money(&r.goal.paid_amount, &ccy),
                fmt_money(&r.goal.target_amount, &ccy),
                format!("{}%", r.progress.percent),
                format!("{}/{}", r.goal.installments_paid, r.goal.installments_total),
                fmt_money(&r.progress.installment_amount, &ccy),
                yes_no(r.progress.completed).to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Goal", "Paid", "Target", "Progress", "Installments", "Each", "Done"],
            rows
        )
    );
    Ok(())
}

pub fn list_goals(conn: &Connection) -> Result<Vec<SavingsGoal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, target_amount, paid_amount, installments_total, installments_paid,
                start_date
         FROM goals ORDER BY start_date, name",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let target: String = r.get(2)?;
        let paid: String = r.get(3)?;
        let start: String = r.get(6)?;
        out.push(SavingsGoal {
            id: r.get(0)?,
            name: r.get(1)?,
            target_amount: parse_decimal(&target)?,
            paid_amount: parse_decimal(&paid)?,
            installments_total: r.get(4)?,
            installments_paid: r.get(5)?,
            start_date: parse_date(&start)?,
        });
    }
    Ok(out)
}

pub fn get_goal(conn: &Connection, name: &str) -> Result<SavingsGoal> {
    list_goals(conn)?
        .into_iter()
        .find(|g| g.name == name)
        .with_context(|| format!("Goal '{}' not found", name))
}

/// Records one more installment and returns the updated goal.
pub fn pay(conn: &Connection, goal: &SavingsGoal) -> Result<SavingsGoal> {
    let next = pay_installment(goal)?;
    conn.execute(
        "UPDATE goals SET paid_amount=?1, installments_paid=?2 WHERE id=?3",
        params![next.paid_amount.to_string(), next.installments_paid, next.id],
    )?;
    tracing::info!(
        name = %next.name,
        paid = next.installments_paid,
        total = next.installments_total,
        "goal installment paid"
    );
    Ok(next)
}
