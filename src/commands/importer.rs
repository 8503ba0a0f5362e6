// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::rebase_sequence;
use crate::models::{CreditIn, CreditOut, Expense, Income, Table, UsdtTrade};
use crate::store::{self, Record};
use crate::utils::{pretty_table, required};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    /// Sequence value after the rebase.
    pub max_id: i64,
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("seed", sub)) => {
            let dir = required(sub, "dir")?;
            let reports = seed_dir(conn, Path::new(dir))?;
            print_reports(&reports);
        }
        Some((name, sub)) => {
            let table: Table = name.parse()?;
            let path = required(sub, "path")?;
            let report = import_path(conn, table, Path::new(path))?;
            print_reports(&[(table, report)]);
        }
        _ => {}
    }
    Ok(())
}

fn print_reports(reports: &[(Table, ImportReport)]) {
    if reports.is_empty() {
        println!("Nothing imported.");
        return;
    }
    let rows = reports
        .iter()
        .map(|(t, r)| {
            vec![
                t.cli_name().to_string(),
                r.imported.to_string(),
                r.skipped.to_string(),
                r.max_id.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Table", "Imported", "Skipped", "Last id"], rows)
    );
}

/// Load rows `id,<columns...>` into `T`'s table. The first line is treated as
/// a header when its first field is not an integer. Bad rows are logged and
/// skipped. The id counter is rebased to the highest id afterwards.
pub fn import_reader<T: Record, R: Read>(conn: &mut Connection, rdr: R) -> Result<ImportReport> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);

    let tx = conn.transaction()?;
    let mut report = ImportReport::default();
    for (line, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(rec) => rec,
            Err(err) => {
                tracing::warn!(table = T::TABLE, line = line + 1, error = %err, "unreadable CSV row skipped");
                report.skipped += 1;
                continue;
            }
        };
        let id_raw = rec.get(0).unwrap_or("").trim();
        let id = if id_raw.is_empty() {
            None
        } else {
            match id_raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) if line == 0 => {
                    tracing::debug!(table = T::TABLE, "header row detected");
                    continue;
                }
                Err(_) => {
                    tracing::warn!(table = T::TABLE, line = line + 1, id = id_raw, "invalid id, row skipped");
                    report.skipped += 1;
                    continue;
                }
            }
        };
        let fields: Vec<&str> = rec.iter().skip(1).collect();
        let parsed = T::from_fields(id, &fields)
            .and_then(|row| store::insert(&tx, &row));
        match parsed {
            Ok(_) => report.imported += 1,
            Err(err) => {
                tracing::warn!(table = T::TABLE, line = line + 1, error = %format!("{err:#}"), "CSV row skipped");
                report.skipped += 1;
            }
        }
    }
    report.max_id = rebase_sequence(&tx, T::TABLE)?;
    tx.commit()?;
    tracing::info!(
        table = T::TABLE,
        imported = report.imported,
        skipped = report.skipped,
        "import finished"
    );
    Ok(report)
}

pub fn import_path(conn: &mut Connection, table: Table, path: &Path) -> Result<ImportReport> {
    let file = File::open(path).with_context(|| format!("Open CSV {}", path.display()))?;
    match table {
        Table::Income => import_reader::<Income, _>(conn, file),
        Table::Expense => import_reader::<Expense, _>(conn, file),
        Table::CreditIn => import_reader::<CreditIn, _>(conn, file),
        Table::CreditOut => import_reader::<CreditOut, _>(conn, file),
        Table::Usdt => import_reader::<UsdtTrade, _>(conn, file),
    }
}

/// First-launch load: import `<dir>/<table>.csv` into every table that is
/// still empty. Tables that already hold rows are left untouched.
pub fn seed_dir(conn: &mut Connection, dir: &Path) -> Result<Vec<(Table, ImportReport)>> {
    let mut out = Vec::new();
    for table in Table::ALL {
        let path = dir.join(format!("{}.csv", table.sql_name()));
        if !path.is_file() {
            continue;
        }
        if store::count(conn, table.sql_name())? > 0 {
            tracing::debug!(table = table.sql_name(), "table not empty, seed skipped");
            continue;
        }
        let report = import_path(conn, table, &path)?;
        out.push((table, report));
    }
    Ok(out)
}
