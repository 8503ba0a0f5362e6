// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CreditIn, CreditOut, Expense, Income, Table, UsdtTrade};
use crate::store::{self, ListFilter, ListOrder, Record};
use crate::utils::required;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some((name, sub)) = m.subcommand() {
        let table: Table = name.parse()?;
        let fmt = required(sub, "format")?.to_lowercase();
        let out = required(sub, "out")?;
        let n = export_table(conn, table, &fmt, Path::new(out))?;
        println!("Exported {} {} rows to {}", n, table.cli_name(), out);
    }
    Ok(())
}

pub fn export_table(conn: &Connection, table: Table, fmt: &str, out: &Path) -> Result<usize> {
    match table {
        Table::Income => export::<Income>(conn, fmt, out),
        Table::Expense => export::<Expense>(conn, fmt, out),
        Table::CreditIn => export::<CreditIn>(conn, fmt, out),
        Table::CreditOut => export::<CreditOut>(conn, fmt, out),
        Table::Usdt => export::<UsdtTrade>(conn, fmt, out),
    }
}

/// CSV output uses the importer's layout (`id` first, header row), oldest first.
fn export<T: Record>(conn: &Connection, fmt: &str, out: &Path) -> Result<usize> {
    let mut rows: Vec<T> = store::list(conn, ListOrder::Id, &ListFilter::default())?;
    rows.reverse();
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            let mut header = vec!["id"];
            header.extend_from_slice(T::COLUMNS);
            wtr.write_record(&header)?;
            for row in &rows {
                let mut rec = vec![row.id().unwrap_or_default().to_string()];
                rec.extend(row.to_fields());
                wtr.write_record(&rec)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    Ok(rows.len())
}
