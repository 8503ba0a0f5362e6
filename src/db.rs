// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Exledger", "exledger"));

/// Default location inside the platform data dir. `--db` / `EXLEDGER_DB` take precedence.
pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("exledger.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create directory {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS income(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        counterparty TEXT NOT NULL,
        amount TEXT NOT NULL,
        rate TEXT NOT NULL,
        total TEXT NOT NULL,
        category TEXT NOT NULL,
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);

    CREATE TABLE IF NOT EXISTS expense(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        counterparty TEXT NOT NULL,
        amount TEXT NOT NULL,
        exchanged TEXT NOT NULL,
        rate TEXT NOT NULL,
        total TEXT NOT NULL,
        category TEXT NOT NULL,
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);

    -- prepaid credit bought; rate = total / amount
    CREATE TABLE IF NOT EXISTS credit_in(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        counterparty TEXT NOT NULL,
        amount TEXT NOT NULL,
        total TEXT NOT NULL,
        rate TEXT NOT NULL,
        category TEXT NOT NULL,
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_credit_in_date ON credit_in(date);

    CREATE TABLE IF NOT EXISTS credit_out(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        counterparty TEXT NOT NULL,
        amount TEXT NOT NULL,
        rate TEXT NOT NULL,
        total TEXT NOT NULL,
        profit TEXT NOT NULL DEFAULT '0',
        category TEXT NOT NULL,
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_credit_out_date ON credit_out(date);

    CREATE TABLE IF NOT EXISTS usdt_trade(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        counterparty TEXT NOT NULL,
        side TEXT NOT NULL CHECK(side IN ('buy','sell')),
        amount TEXT NOT NULL,
        rate TEXT NOT NULL,
        category TEXT NOT NULL,
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_usdt_trade_date ON usdt_trade(date);

    CREATE TABLE IF NOT EXISTS cash_tally(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        d10000 INTEGER NOT NULL DEFAULT 0,
        d5000 INTEGER NOT NULL DEFAULT 0,
        d1000 INTEGER NOT NULL DEFAULT 0,
        d500 INTEGER NOT NULL DEFAULT 0,
        d200 INTEGER NOT NULL DEFAULT 0,
        d100 INTEGER NOT NULL DEFAULT 0,
        d50 INTEGER NOT NULL DEFAULT 0
    );
    INSERT OR IGNORE INTO cash_tally(id) VALUES (1);

    CREATE TABLE IF NOT EXISTS balances(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        bank TEXT NOT NULL DEFAULT '0',
        wallet TEXT NOT NULL DEFAULT '0',
        credit TEXT NOT NULL DEFAULT '0',
        usdt TEXT NOT NULL DEFAULT '0',
        usdt_price TEXT NOT NULL DEFAULT '0',
        updated_at TEXT
    );
    INSERT OR IGNORE INTO balances(id) VALUES (1);

    -- position is dense over unchecked items; checked items hold -1
    CREATE TABLE IF NOT EXISTS checklist(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        checked INTEGER NOT NULL DEFAULT 0,
        position INTEGER NOT NULL
    );
    "#,
    )?;
    Ok(())
}

pub fn current_sequence(conn: &Connection, table: &str) -> Result<Option<i64>> {
    let seq: Option<i64> = conn
        .query_row(
            "SELECT seq FROM sqlite_sequence WHERE name=?1",
            params![table],
            |r| r.get(0),
        )
        .optional()
        .or_else(|err| match err {
            // sqlite_sequence is absent until some AUTOINCREMENT table exists
            rusqlite::Error::SqliteFailure(_, Some(ref msg)) if msg.contains("no such table") => {
                Ok(None)
            }
            other => Err(other),
        })?;
    Ok(seq)
}

/// Forget the AUTOINCREMENT counter; an empty table hands out id 1 next.
pub fn reset_sequence(conn: &Connection, table: &str) -> Result<()> {
    if current_sequence(conn, table)?.is_some() {
        conn.execute("DELETE FROM sqlite_sequence WHERE name=?1", params![table])?;
    }
    tracing::info!(table, "sequence reset");
    Ok(())
}

/// Move the counter to MAX(id) so later inserts never reuse an imported id.
pub fn rebase_sequence(conn: &Connection, table: &str) -> Result<i64> {
    let max_id: i64 = conn.query_row(
        &format!("SELECT IFNULL(MAX(id), 0) FROM {table}"),
        [],
        |r| r.get(0),
    )?;
    match current_sequence(conn, table)? {
        Some(_) => {
            conn.execute(
                "UPDATE sqlite_sequence SET seq=?1 WHERE name=?2",
                params![max_id, table],
            )?;
        }
        None if max_id > 0 => {
            conn.execute(
                "INSERT INTO sqlite_sequence(name, seq) VALUES (?1, ?2)",
                params![table, max_id],
            )?;
        }
        None => {}
    }
    tracing::debug!(table, max_id, "sequence rebased");
    Ok(max_id)
}
