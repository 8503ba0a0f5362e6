// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed CRUD over the five transaction tables and the two singleton rows.
//!
//! Every transaction type implements [`Record`]: its SQL table, its column
//! list (id excluded), and conversions to and from a SQLite row and a CSV
//! record. Derived fields are stored as they were computed at construction and
//! are read back verbatim.

use crate::db;
use crate::error::LedgerError;
use crate::models::{
    Balances, CashTally, Category, CreditIn, CreditOut, Expense, Income, Side, UsdtTrade,
    credit_rate,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub trait Record: Sized + Serialize {
    const TABLE: &'static str;
    /// Column order for SQL and CSV, id excluded.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<i64>;
    fn date(&self) -> NaiveDate;
    fn counterparty(&self) -> &str;
    /// Stored derived amount used for summaries (zero when the table has none).
    fn headline(&self) -> Decimal;
    /// True when the stored derived field differs from the construction formula.
    fn drifted(&self) -> bool;

    /// Values in `COLUMNS` order.
    fn values(&self) -> Vec<Value>;
    /// Row layout: `id` followed by `COLUMNS`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn to_fields(&self) -> Vec<String>;
    /// Build from CSV fields in `COLUMNS` order. A blank derived field is computed.
    fn from_fields(id: Option<i64>, fields: &[&str]) -> Result<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    Id,
    Date,
}

impl FromStr for ListOrder {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(ListOrder::Id),
            "date" => Ok(ListOrder::Date),
            _ => Err(LedgerError::InvalidChoice {
                field: "order",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct ListFilter {
    pub counterparty: Option<Regex>,
    pub limit: Option<usize>,
}

pub fn insert<T: Record>(conn: &Connection, rec: &T) -> Result<i64> {
    let mut cols: Vec<&str> = Vec::with_capacity(T::COLUMNS.len() + 1);
    let mut vals = rec.values();
    if let Some(id) = rec.id() {
        cols.push("id");
        vals.insert(0, Value::Integer(id));
    }
    cols.extend_from_slice(T::COLUMNS);
    let placeholders = (1..=cols.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!(
        "INSERT OR REPLACE INTO {}({}) VALUES ({})",
        T::TABLE,
        cols.join(","),
        placeholders
    );
    conn.execute(&sql, params_from_iter(vals))?;
    let id = rec.id().unwrap_or_else(|| conn.last_insert_rowid());
    tracing::debug!(table = T::TABLE, id, "row stored");
    Ok(id)
}

fn select_sql<T: Record>() -> String {
    format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

pub fn get<T: Record>(conn: &Connection, id: i64) -> Result<T> {
    let sql = format!("{} WHERE id=?1", select_sql::<T>());
    conn.query_row(&sql, params![id], T::from_row)
        .optional()?
        .ok_or(LedgerError::NotFound { table: T::TABLE, id })
        .map_err(Into::into)
}

/// Newest first, by id or by date (ties broken by id).
pub fn list<T: Record>(conn: &Connection, order: ListOrder, filter: &ListFilter) -> Result<Vec<T>> {
    let order_by = match order {
        ListOrder::Id => "id DESC",
        ListOrder::Date => "date DESC, id DESC",
    };
    let sql = format!("{} ORDER BY {}", select_sql::<T>(), order_by);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], T::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        if filter.limit.is_some_and(|n| out.len() >= n) {
            break;
        }
        let rec = row?;
        if let Some(re) = &filter.counterparty {
            if !re.is_match(rec.counterparty()) {
                continue;
            }
        }
        out.push(rec);
    }
    Ok(out)
}

pub fn delete<T: Record>(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE id=?1", T::TABLE),
        params![id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound { table: T::TABLE, id }.into());
    }
    Ok(())
}

pub fn count(conn: &Connection, table: &str) -> Result<i64> {
    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
}

pub fn delete_all(conn: &Connection, table: &str) -> Result<usize> {
    Ok(conn.execute(&format!("DELETE FROM {table}"), [])?)
}

/// Delete every row and reset the id counter.
pub fn clear(conn: &mut Connection, table: &str) -> Result<usize> {
    let tx = conn.transaction()?;
    let n = delete_all(&tx, table)?;
    db::reset_sequence(&tx, table)?;
    tx.commit()?;
    tracing::info!(table, rows = n, "table cleared");
    Ok(n)
}

// Column helpers

fn text_err(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn dec_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>().map_err(|e| text_err(idx, e))
}

fn date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| text_err(idx, e))
}

fn category_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Category> {
    let s: String = row.get(idx)?;
    s.parse::<Category>().map_err(|e| text_err(idx, e))
}

fn side_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Side> {
    let s: String = row.get(idx)?;
    s.parse::<Side>().map_err(|e| text_err(idx, e))
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn dec(d: Decimal) -> Value {
    Value::Text(d.to_string())
}

fn opt_text(s: &Option<String>) -> Value {
    match s {
        Some(v) => Value::Text(v.clone()),
        None => Value::Null,
    }
}

// CSV field helpers

fn field<'a>(fields: &[&'a str], idx: usize, name: &str) -> Result<&'a str> {
    fields
        .get(idx)
        .map(|s| s.trim())
        .with_context(|| format!("{name} missing"))
}

fn field_date(fields: &[&str], idx: usize) -> Result<NaiveDate> {
    let raw = field(fields, idx, "date")?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

fn field_dec(fields: &[&str], idx: usize, name: &str) -> Result<Decimal> {
    let raw = field(fields, idx, name)?;
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid {name} '{raw}'"))
}

fn field_opt_dec(fields: &[&str], idx: usize, name: &str) -> Result<Option<Decimal>> {
    match fields.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => Ok(Some(
            raw.parse::<Decimal>()
                .with_context(|| format!("Invalid {name} '{raw}'"))?,
        )),
        None => Ok(None),
    }
}

fn field_note(fields: &[&str], idx: usize) -> Option<String> {
    fields
        .get(idx)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn field_category(fields: &[&str], idx: usize) -> Result<Category> {
    Ok(field(fields, idx, "category")?.parse::<Category>()?)
}

impl Record for Income {
    const TABLE: &'static str = "income";
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "counterparty",
        "amount",
        "rate",
        "total",
        "category",
        "note",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn counterparty(&self) -> &str {
        &self.counterparty
    }
    fn headline(&self) -> Decimal {
        self.total
    }
    fn drifted(&self) -> bool {
        self.amount.checked_mul(self.rate) != Some(self.total)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.date.to_string()),
            text(&self.counterparty),
            dec(self.amount),
            dec(self.rate),
            dec(self.total),
            text(self.category.as_str()),
            opt_text(&self.note),
        ]
    }

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Income {
            id: Some(r.get(0)?),
            date: date_col(r, 1)?,
            counterparty: r.get(2)?,
            amount: dec_col(r, 3)?,
            rate: dec_col(r, 4)?,
            total: dec_col(r, 5)?,
            category: category_col(r, 6)?,
            note: r.get(7)?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.counterparty.clone(),
            self.amount.to_string(),
            self.rate.to_string(),
            self.total.to_string(),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }

    fn from_fields(id: Option<i64>, f: &[&str]) -> Result<Self> {
        let mut rec = Income::new(
            field_date(f, 0)?,
            field(f, 1, "counterparty")?,
            field_dec(f, 2, "amount")?,
            field_opt_dec(f, 3, "rate")?,
            field_category(f, 5)?,
            field_note(f, 6),
        )?;
        if let Some(total) = field_opt_dec(f, 4, "total")? {
            rec.total = total;
        }
        rec.id = id;
        Ok(rec)
    }
}

impl Record for Expense {
    const TABLE: &'static str = "expense";
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "counterparty",
        "amount",
        "exchanged",
        "rate",
        "total",
        "category",
        "note",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn counterparty(&self) -> &str {
        &self.counterparty
    }
    fn headline(&self) -> Decimal {
        self.total
    }
    fn drifted(&self) -> bool {
        self.exchanged.checked_mul(self.rate) != Some(self.total)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.date.to_string()),
            text(&self.counterparty),
            dec(self.amount),
            dec(self.exchanged),
            dec(self.rate),
            dec(self.total),
            text(self.category.as_str()),
            opt_text(&self.note),
        ]
    }

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Expense {
            id: Some(r.get(0)?),
            date: date_col(r, 1)?,
            counterparty: r.get(2)?,
            amount: dec_col(r, 3)?,
            exchanged: dec_col(r, 4)?,
            rate: dec_col(r, 5)?,
            total: dec_col(r, 6)?,
            category: category_col(r, 7)?,
            note: r.get(8)?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.counterparty.clone(),
            self.amount.to_string(),
            self.exchanged.to_string(),
            self.rate.to_string(),
            self.total.to_string(),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }

    fn from_fields(id: Option<i64>, f: &[&str]) -> Result<Self> {
        let mut rec = Expense::new(
            field_date(f, 0)?,
            field(f, 1, "counterparty")?,
            field_dec(f, 2, "amount")?,
            field_dec(f, 3, "exchanged")?,
            field_opt_dec(f, 4, "rate")?,
            field_category(f, 6)?,
            field_note(f, 7),
        )?;
        if let Some(total) = field_opt_dec(f, 5, "total")? {
            rec.total = total;
        }
        rec.id = id;
        Ok(rec)
    }
}

impl Record for CreditIn {
    const TABLE: &'static str = "credit_in";
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "counterparty",
        "amount",
        "total",
        "rate",
        "category",
        "note",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn counterparty(&self) -> &str {
        &self.counterparty
    }
    fn headline(&self) -> Decimal {
        self.total
    }
    fn drifted(&self) -> bool {
        credit_rate(self.amount, self.total).ok() != Some(self.rate)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.date.to_string()),
            text(&self.counterparty),
            dec(self.amount),
            dec(self.total),
            dec(self.rate),
            text(self.category.as_str()),
            opt_text(&self.note),
        ]
    }

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CreditIn {
            id: Some(r.get(0)?),
            date: date_col(r, 1)?,
            counterparty: r.get(2)?,
            amount: dec_col(r, 3)?,
            total: dec_col(r, 4)?,
            rate: dec_col(r, 5)?,
            category: category_col(r, 6)?,
            note: r.get(7)?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.counterparty.clone(),
            self.amount.to_string(),
            self.total.to_string(),
            self.rate.to_string(),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }

    fn from_fields(id: Option<i64>, f: &[&str]) -> Result<Self> {
        let mut rec = CreditIn::new(
            field_date(f, 0)?,
            field(f, 1, "counterparty")?,
            field_dec(f, 2, "amount")?,
            field_dec(f, 3, "total")?,
            field_category(f, 5)?,
            field_note(f, 6),
        )?;
        if let Some(rate) = field_opt_dec(f, 4, "rate")? {
            rec.rate = rate;
        }
        rec.id = id;
        Ok(rec)
    }
}

impl Record for CreditOut {
    const TABLE: &'static str = "credit_out";
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "counterparty",
        "amount",
        "rate",
        "total",
        "profit",
        "category",
        "note",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn counterparty(&self) -> &str {
        &self.counterparty
    }
    fn headline(&self) -> Decimal {
        self.total
    }
    fn drifted(&self) -> bool {
        self.amount.checked_mul(self.rate) != Some(self.total)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.date.to_string()),
            text(&self.counterparty),
            dec(self.amount),
            dec(self.rate),
            dec(self.total),
            dec(self.profit),
            text(self.category.as_str()),
            opt_text(&self.note),
        ]
    }

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CreditOut {
            id: Some(r.get(0)?),
            date: date_col(r, 1)?,
            counterparty: r.get(2)?,
            amount: dec_col(r, 3)?,
            rate: dec_col(r, 4)?,
            total: dec_col(r, 5)?,
            profit: dec_col(r, 6)?,
            category: category_col(r, 7)?,
            note: r.get(8)?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.counterparty.clone(),
            self.amount.to_string(),
            self.rate.to_string(),
            self.total.to_string(),
            self.profit.to_string(),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }

    fn from_fields(id: Option<i64>, f: &[&str]) -> Result<Self> {
        let mut rec = CreditOut::new(
            field_date(f, 0)?,
            field(f, 1, "counterparty")?,
            field_dec(f, 2, "amount")?,
            field_opt_dec(f, 3, "rate")?,
            field_opt_dec(f, 5, "profit")?.unwrap_or(Decimal::ZERO),
            field_category(f, 6)?,
            field_note(f, 7),
        )?;
        if let Some(total) = field_opt_dec(f, 4, "total")? {
            rec.total = total;
        }
        rec.id = id;
        Ok(rec)
    }
}

impl Record for UsdtTrade {
    const TABLE: &'static str = "usdt_trade";
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "counterparty",
        "side",
        "amount",
        "rate",
        "category",
        "note",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn counterparty(&self) -> &str {
        &self.counterparty
    }
    fn headline(&self) -> Decimal {
        Decimal::ZERO
    }
    fn drifted(&self) -> bool {
        false
    }

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.date.to_string()),
            text(&self.counterparty),
            text(self.side.as_str()),
            dec(self.amount),
            dec(self.rate),
            text(self.category.as_str()),
            opt_text(&self.note),
        ]
    }

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(UsdtTrade {
            id: Some(r.get(0)?),
            date: date_col(r, 1)?,
            counterparty: r.get(2)?,
            side: side_col(r, 3)?,
            amount: dec_col(r, 4)?,
            rate: dec_col(r, 5)?,
            category: category_col(r, 6)?,
            note: r.get(7)?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.counterparty.clone(),
            self.side.to_string(),
            self.amount.to_string(),
            self.rate.to_string(),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }

    fn from_fields(id: Option<i64>, f: &[&str]) -> Result<Self> {
        let mut rec = UsdtTrade::new(
            field_date(f, 0)?,
            field(f, 1, "counterparty")?,
            field(f, 2, "side")?.parse::<Side>()?,
            field_dec(f, 3, "amount")?,
            field_dec(f, 4, "rate")?,
            field_category(f, 5)?,
            field_note(f, 6),
        );
        rec.id = id;
        Ok(rec)
    }
}

// Singletons

pub fn load_tally(conn: &Connection) -> Result<CashTally> {
    let counts = conn.query_row(
        "SELECT d10000, d5000, d1000, d500, d200, d100, d50 FROM cash_tally WHERE id=1",
        [],
        |r| {
            Ok([
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
            ])
        },
    )?;
    Ok(CashTally { counts })
}

pub fn save_tally(conn: &Connection, tally: &CashTally) -> Result<()> {
    let c = &tally.counts;
    conn.execute(
        "INSERT OR REPLACE INTO cash_tally(id, d10000, d5000, d1000, d500, d200, d100, d50)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![c[0], c[1], c[2], c[3], c[4], c[5], c[6]],
    )?;
    Ok(())
}

pub fn load_balances(conn: &Connection) -> Result<Balances> {
    let b = conn.query_row(
        "SELECT bank, wallet, credit, usdt, usdt_price, updated_at FROM balances WHERE id=1",
        [],
        |r| {
            Ok(Balances {
                bank: dec_col(r, 0)?,
                wallet: dec_col(r, 1)?,
                credit: dec_col(r, 2)?,
                usdt: dec_col(r, 3)?,
                usdt_price: dec_col(r, 4)?,
                updated_at: r.get(5)?,
            })
        },
    )?;
    Ok(b)
}

pub fn save_balances(conn: &Connection, b: &Balances) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO balances(id, bank, wallet, credit, usdt, usdt_price, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, datetime('now'))",
        params![
            b.bank.to_string(),
            b.wallet.to_string(),
            b.credit.to_string(),
            b.usdt.to_string(),
            b.usdt_price.to_string()
        ],
    )?;
    Ok(())
}
