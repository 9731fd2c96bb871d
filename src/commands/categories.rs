// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{CategoryStyle, CategoryStyles, Config};
use crate::models::{Category, CategoryGroup};
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim();
            let group: CategoryGroup = required(sub, "group")?.parse()?;
            let color = required(sub, "color")?;
            let icon = required(sub, "icon")?;
            conn.execute(
                "INSERT INTO categories(name, grp, color, icon) VALUES (?1, ?2, ?3, ?4)",
                params![name, group.as_str(), color, icon],
            )?;
            tracing::info!(name, group = group.as_str(), "category added");
            println!("Added category '{}' ({})", name, group.as_str());
        }
        Some(("list", sub)) => {
            let cats = list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| vec![c.name, c.group.as_str().to_string(), c.color, c.icon])
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Group", "Color", "Icon"], data)
                );
            }
        }
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let name = required(sub, "name")?.trim();
            let used = usage_count(conn, name)?;
            if used > 0 {
                return Err(anyhow!(
                    "Category '{}' is used by {} transaction(s); recategorize them first",
                    name,
                    used
                ));
            }
            let n = conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            if n == 0 {
                return Err(anyhow!("Category '{}' not found", name));
            }
            tracing::info!(name, "category removed");
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name, grp, color, icon FROM categories ORDER BY grp, name")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let grp: String = r.get(2)?;
        out.push(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            group: grp.parse()?,
            color: r.get(3)?,
            icon: r.get(4)?,
        });
    }
    Ok(out)
}

/// Built-in styles, then the config file, then what the store says.
pub fn load_styles(conn: &Connection, cfg: &Config) -> Result<CategoryStyles> {
    let mut styles = cfg.styles();
    styles.extend(
        list_categories(conn)?
            .into_iter()
            .map(|c| (c.name, CategoryStyle { color: c.color, icon: c.icon })),
    );
    Ok(styles)
}

fn usage_count(conn: &Connection, name: &str) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category=?1",
        params![name],
        |r| r.get(0),
    )?)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = required(sub, "name")?.trim();
    let id = crate::utils::id_for_category(conn, name)?;
    let tx = conn.unchecked_transaction()?;
    if let Some(group) = sub.get_one::<String>("group") {
        let group: CategoryGroup = group.parse()?;
        tx.execute("UPDATE categories SET grp=?1 WHERE id=?2", params![group.as_str(), id])?;
    }
    if let Some(color) = sub.get_one::<String>("color") {
        tx.execute("UPDATE categories SET color=?1 WHERE id=?2", params![color, id])?;
    }
    if let Some(icon) = sub.get_one::<String>("icon") {
        tx.execute("UPDATE categories SET icon=?1 WHERE id=?2", params![icon, id])?;
    }
    if let Some(new_name) = sub.get_one::<String>("rename").map(|s| s.trim()) {
        if new_name.is_empty() {
            return Err(anyhow!("New category name must not be empty"));
        }
        tx.execute("UPDATE categories SET name=?1 WHERE id=?2", params![new_name, id])?;
        let moved = tx.execute(
            "UPDATE transactions SET category=?1 WHERE category=?2",
            params![new_name, name],
        )?;
        tracing::info!(from = name, to = new_name, moved, "category renamed");
    }
    tx.commit()?;
    println!("Updated category '{}'", name);
    Ok(())
}
