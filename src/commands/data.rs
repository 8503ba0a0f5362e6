// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::reset_sequence;
use crate::models::Table;
use crate::store;
use crate::utils::required;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("clear", sub)) => {
            let table: Table = required(sub, "table")?.parse()?;
            let n = store::clear(conn, table.sql_name())?;
            println!("Deleted {} rows from {}; ids restart at 1", n, table.cli_name());
        }
        Some(("reset-seq", sub)) => {
            let table: Table = required(sub, "table")?.parse()?;
            if store::count(conn, table.sql_name())? > 0 {
                // rows remain, so the counter cannot drop below them
                let max = crate::db::rebase_sequence(conn, table.sql_name())?;
                println!("{} is not empty; counter rebased to {}", table.cli_name(), max);
            } else {
                reset_sequence(conn, table.sql_name())?;
                println!("Counter for {} reset", table.cli_name());
            }
        }
        _ => {}
    }
    Ok(())
}
