// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::commands::importer::read_snapshot;
use crate::config::CategoryStyles;
use crate::db;
use crate::engine::{
    self, DueBuckets, Forecast, Insight, Period, PeriodTotals, Tone, TrendPoint,
    category_breakdown, due_buckets, forecast, insights, period_totals, trend_series,
};
use crate::models::Transaction;
use crate::utils::{fmt_money, get_currency, maybe_print_json, month_arg, pretty_table, today_arg};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, styles: &CategoryStyles, m: &clap::ArgMatches) -> Result<()> {
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let ctx = ReportContext::from_args(conn, sub)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ccy = get_currency(conn)?;

    match name {
        "summary" => {
            let s = summary(&ctx);
            if !maybe_print_json(json_flag, jsonl_flag, &s)? {
                println!("{}", summary_table(&s, &ccy));
            }
        }
        "categories" => {
            let mut rows = category_rows(&ctx, styles);
            if let Some(top) = sub.get_one::<usize>("top") {
                rows.truncate(*top);
            }
            if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
                println!("{}", categories_table(&rows, &ccy));
            }
        }
        "due" => {
            let buckets = due_buckets(&ctx.txs, ctx.period, ctx.today);
            if !maybe_print_json(json_flag, jsonl_flag, &buckets)? {
                print_due(&buckets, &ccy);
            }
        }
        "trend" => {
            let series = trend_series(&ctx.txs, ctx.period);
            if !maybe_print_json(json_flag, jsonl_flag, &series)? {
                println!("{}", trend_table(&series, &ccy));
            }
        }
        "forecast" => {
            let f = forecast(&ctx.txs, ctx.period, ctx.today);
            if !maybe_print_json(json_flag, jsonl_flag, &f)? {
                println!("{}", forecast_table(&f, &ccy));
            }
        }
        "insights" => {
            let limit = sub.get_one::<usize>("limit").copied().unwrap_or(2);
            let rows = insight_rows(&ctx, limit);
            if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
                print_insights(&rows);
            }
        }
        "dashboard" => {
            let d = dashboard(&ctx, styles);
            if !maybe_print_json(json_flag, jsonl_flag, &d)? {
                println!("{}", ctx.period);
                println!("{}", summary_table(&d.summary, &ccy));
                if !d.categories.is_empty() {
                    println!("{}", categories_table(&d.categories, &ccy));
                }
                print_due(&d.due, &ccy);
                println!("{}", trend_table(&d.trend, &ccy));
                println!("{}", forecast_table(&d.forecast, &ccy));
                print_insights(&d.insights);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Inputs shared by every report.
pub struct ReportContext {
    pub txs: Vec<Transaction>,
    pub period: Period,
    pub today: NaiveDate,
}

impl ReportContext {
    pub fn from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<Self> {
        let today = today_arg(sub)?;
        let period = month_arg(sub, today)?;
        let txs = match sub.get_one::<String>("input") {
            Some(path) => read_snapshot(Path::new(path.trim()))?,
            None => db::load_transactions(conn)?,
        };
        let skipped = engine::undated(&txs).count();
        if skipped > 0 {
            tracing::debug!(skipped, "undated transactions ignored");
        }
        Ok(Self { txs, period, today })
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub period: Period,
    /// False when the month has no transactions at all.
    pub has_data: bool,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

pub fn summary(ctx: &ReportContext) -> Summary {
    Summary {
        period: ctx.period,
        has_data: engine::has_data(&ctx.txs, ctx.period),
        totals: period_totals(&ctx.txs, ctx.period),
    }
}

fn summary_table(s: &Summary, ccy: &str) -> comfy_table::Table {
    let t = &s.totals;
    let rows = vec![
        vec!["Income".to_string(), fmt_money(&t.income_total, ccy)],
        vec!["Expenses".to_string(), fmt_money(&t.expense_total, ccy)],
        vec!["Balance".to_string(), fmt_money(&t.balance, ccy)],
        vec!["Fixed".to_string(), fmt_money(&t.fixed_expense_total, ccy)],
        vec!["Variable".to_string(), fmt_money(&t.variable_expense_total, ccy)],
        vec!["Unpaid".to_string(), fmt_money(&t.unsettled_expense_total, ccy)],
        vec![
            "Fixed paid".to_string(),
            format!("{}/{}", t.fixed_settled_count, t.fixed_total_count),
        ],
    ];
    let title = s.period.to_string();
    pretty_table(&[title.as_str(), "Amount"], rows)
}

/// A breakdown entry with its display style.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub total: Decimal,
    pub percent: Decimal,
    pub color: String,
    pub icon: String,
}

pub fn category_rows(ctx: &ReportContext, styles: &CategoryStyles) -> Vec<CategoryRow> {
    category_breakdown(&ctx.txs, ctx.period)
        .into_iter()
        .map(|share| {
            let style = styles.lookup(&share.category);
            CategoryRow {
                color: style.color.clone(),
                icon: style.icon.clone(),
                category: share.category,
                total: share.total,
                percent: share.percent,
            }
        })
        .collect()
}

fn categories_table(rows: &[CategoryRow], ccy: &str) -> comfy_table::Table {
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.category.clone(),
                fmt_money(&r.total, ccy),
                format!("{}%", r.percent),
                r.color.clone(),
            ]
        })
        .collect();
    pretty_table(&["Category", "Spent", "Share", "Color"], data)
}

fn print_due(b: &DueBuckets, ccy: &str) {
    if b.is_empty() {
        println!("No bills due in the next 7 days ({} pending)", b.pending_count);
        return;
    }
    let mut rows = Vec::new();
    for (label, list) in [
        ("overdue", &b.overdue),
        ("3 days", &b.due_within_3_days),
        ("7 days", &b.due_within_7_days),
    ] {
        for t in list {
            rows.push(vec![
                label.to_string(),
                t.date.clone(),
                t.category.clone(),
                t.description.clone().unwrap_or_default(),
                fmt_money(&t.amount, ccy),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Due", "Date", "Category", "Description", "Amount"], rows)
    );
    println!("{} urgent, {} pending in total", b.urgent_count(), b.pending_count);
}

fn trend_table(series: &[TrendPoint], ccy: &str) -> comfy_table::Table {
    let rows = series
        .iter()
        .map(|p| {
            vec![
                p.period.to_string(),
                fmt_money(&p.income_total, ccy),
                fmt_money(&p.expense_total, ccy),
                fmt_money(&p.balance, ccy),
            ]
        })
        .collect();
    pretty_table(&["Month", "Income", "Expenses", "Balance"], rows)
}

fn forecast_table(f: &Forecast, ccy: &str) -> comfy_table::Table {
    let source = |scheduled: bool| if scheduled { "scheduled" } else { "average" };
    let rows = vec![
        vec![
            "Fixed".to_string(),
            fmt_money(&f.projected_fixed_expense, ccy),
            source(f.fixed_from_schedule).to_string(),
        ],
        vec![
            "Variable".to_string(),
            fmt_money(&f.projected_variable_expense, ccy),
            "average".to_string(),
        ],
        vec![
            "Expenses".to_string(),
            fmt_money(&f.projected_expense, ccy),
            String::new(),
        ],
        vec![
            "Income".to_string(),
            fmt_money(&f.projected_income, ccy),
            source(f.income_from_schedule).to_string(),
        ],
        vec![
            "Balance".to_string(),
            fmt_money(&f.projected_balance, ccy),
            if f.is_at_risk { "AT RISK" } else { "ok" }.to_string(),
        ],
    ];
    let title = format!("Forecast {}", f.period);
    pretty_table(&[title.as_str(), "Amount", "Source"], rows)
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightRow {
    pub tone: Tone,
    pub message: String,
    #[serde(flatten)]
    pub insight: Insight,
}

pub fn insight_rows(ctx: &ReportContext, limit: usize) -> Vec<InsightRow> {
    insights(&ctx.txs, ctx.period)
        .into_iter()
        .take(limit)
        .map(|insight| InsightRow {
            tone: insight.tone(),
            message: insight.to_string(),
            insight,
        })
        .collect()
}

fn print_insights(rows: &[InsightRow]) {
    for r in rows {
        let marker = match r.tone {
            Tone::Alert => "!",
            Tone::Success => "+",
            Tone::Info => "i",
        };
        println!("[{}] {}", marker, r.message);
    }
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub categories: Vec<CategoryRow>,
    pub due: DueBuckets,
    pub trend: Vec<TrendPoint>,
    pub forecast: Forecast,
    pub insights: Vec<InsightRow>,
}

/// Every view for one month, computed from the same snapshot.
pub fn dashboard(ctx: &ReportContext, styles: &CategoryStyles) -> Dashboard {
    Dashboard {
        summary: summary(ctx),
        categories: category_rows(ctx, styles),
        due: due_buckets(&ctx.txs, ctx.period, ctx.today),
        trend: trend_series(&ctx.txs, ctx.period),
        forecast: forecast(&ctx.txs, ctx.period, ctx.today),
        insights: insight_rows(ctx, 2),
    }
}
