// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_currency, set_currency};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("currency", sub)) = m.subcommand() {
        match sub.get_one::<String>("code") {
            Some(code) => {
                let code = code.trim().to_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(anyhow!("Currency must be a 3-letter code, got '{}'", code));
                }
                set_currency(conn, &code)?;
                tracing::info!(currency = %code, "display currency changed");
                println!("Display currency set to {}", code);
            }
            None => println!("{}", get_currency(conn)?),
        }
    }
    Ok(())
}
