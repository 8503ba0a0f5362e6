// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! `income`, `expense`, `credit-in`, `credit-out` and `usdt` subcommands.

use crate::models::{Category, CreditIn, CreditOut, Expense, Income, Side, Table, UsdtTrade};
use crate::settings::Display;
use crate::store::{self, ListFilter, ListOrder, Record};
use crate::utils::{
    maybe_print_json, optional, optional_decimal, parse_date, pretty_table, required,
    required_decimal, required_id,
};
use anyhow::{Context, Result};
use regex::Regex;
use rusqlite::Connection;

/// Table rendering for list output.
trait Render: Record {
    const HEADERS: &'static [&'static str];
    fn cells(&self, d: &Display) -> Vec<String>;
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|i| i.to_string()).unwrap_or_default()
}

impl Render for Income {
    const HEADERS: &'static [&'static str] = &[
        "ID", "Date", "Counterparty", "Amount", "Rate", "Total", "Category", "Note",
    ];
    fn cells(&self, d: &Display) -> Vec<String> {
        vec![
            id_cell(self.id),
            d.date(self.date),
            self.counterparty.clone(),
            d.amount(&self.amount),
            self.rate.to_string(),
            d.amount(&self.total),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }
}

impl Render for Expense {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Date",
        "Counterparty",
        "Amount",
        "Exchanged",
        "Rate",
        "Total",
        "Category",
        "Note",
    ];
    fn cells(&self, d: &Display) -> Vec<String> {
        vec![
            id_cell(self.id),
            d.date(self.date),
            self.counterparty.clone(),
            d.amount(&self.amount),
            d.amount(&self.exchanged),
            self.rate.to_string(),
            d.amount(&self.total),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }
}

impl Render for CreditIn {
    const HEADERS: &'static [&'static str] = &[
        "ID", "Date", "Counterparty", "Amount", "Total", "Rate", "Category", "Note",
    ];
    fn cells(&self, d: &Display) -> Vec<String> {
        vec![
            id_cell(self.id),
            d.date(self.date),
            self.counterparty.clone(),
            d.amount(&self.amount),
            d.amount(&self.total),
            self.rate.round_dp(6).normalize().to_string(),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }
}

impl Render for CreditOut {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Date",
        "Counterparty",
        "Amount",
        "Rate",
        "Total",
        "Profit",
        "Category",
        "Note",
    ];
    fn cells(&self, d: &Display) -> Vec<String> {
        vec![
            id_cell(self.id),
            d.date(self.date),
            self.counterparty.clone(),
            d.amount(&self.amount),
            self.rate.to_string(),
            d.amount(&self.total),
            d.amount(&self.profit),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }
}

impl Render for UsdtTrade {
    const HEADERS: &'static [&'static str] = &[
        "ID", "Date", "Counterparty", "Side", "Amount", "Rate", "Category", "Note",
    ];
    fn cells(&self, d: &Display) -> Vec<String> {
        vec![
            id_cell(self.id),
            d.date(self.date),
            self.counterparty.clone(),
            self.side.to_string(),
            d.amount(&self.amount),
            self.rate.to_string(),
            self.category.to_string(),
            self.note.clone().unwrap_or_default(),
        ]
    }
}

pub fn handle(conn: &Connection, table: Table, m: &clap::ArgMatches) -> Result<()> {
    match table {
        Table::Income => dispatch::<Income>(conn, m, build_income),
        Table::Expense => dispatch::<Expense>(conn, m, build_expense),
        Table::CreditIn => dispatch::<CreditIn>(conn, m, build_credit_in),
        Table::CreditOut => dispatch::<CreditOut>(conn, m, build_credit_out),
        Table::Usdt => dispatch::<UsdtTrade>(conn, m, build_usdt),
    }
}

fn dispatch<T: Render>(
    conn: &Connection,
    m: &clap::ArgMatches,
    build: fn(&clap::ArgMatches) -> Result<T>,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let rec = build(sub)?;
            let id = store::insert(conn, &rec)?;
            // show what was stored, read back from the table
            let stored: T = store::get(conn, id)?;
            print_rows(conn, std::slice::from_ref(&stored))?;
        }
        Some(("list", sub)) => list::<T>(conn, sub)?,
        Some(("rm", sub)) => {
            let id = required_id(sub)?;
            store::delete::<T>(conn, id)?;
            println!("Removed {} row {}", T::TABLE, id);
        }
        _ => {}
    }
    Ok(())
}

fn print_rows<T: Render>(conn: &Connection, rows: &[T]) -> Result<()> {
    let display = Display::load(conn)?;
    let data = rows.iter().map(|r| r.cells(&display)).collect();
    println!("{}", pretty_table(T::HEADERS, data));
    Ok(())
}

fn list<T: Render>(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rows = query_rows::<T>(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        print_rows(conn, &rows)?;
    }
    Ok(())
}

/// Rows for `list`, honoring `--order`, `--match` and `--limit`.
pub fn query_rows<T: Record>(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<T>> {
    let order = match optional(sub, "order") {
        Some(o) => o.parse::<ListOrder>()?,
        None => Display::load(conn)?.list_order,
    };
    let counterparty = optional(sub, "match")
        .map(|p| Regex::new(p).with_context(|| format!("Invalid regex pattern '{}'", p)))
        .transpose()?;
    let filter = ListFilter {
        counterparty,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    store::list(conn, order, &filter)
}

fn category(sub: &clap::ArgMatches) -> Result<Category> {
    Ok(required(sub, "category")?.parse()?)
}

fn note(sub: &clap::ArgMatches) -> Option<String> {
    optional(sub, "note").map(str::to_string)
}

fn build_income(sub: &clap::ArgMatches) -> Result<Income> {
    Ok(Income::new(
        parse_date(required(sub, "date")?)?,
        required(sub, "counterparty")?,
        required_decimal(sub, "amount")?,
        optional_decimal(sub, "rate")?,
        category(sub)?,
        note(sub),
    )?)
}

fn build_expense(sub: &clap::ArgMatches) -> Result<Expense> {
    Ok(Expense::new(
        parse_date(required(sub, "date")?)?,
        required(sub, "counterparty")?,
        required_decimal(sub, "amount")?,
        required_decimal(sub, "exchanged")?,
        optional_decimal(sub, "rate")?,
        category(sub)?,
        note(sub),
    )?)
}

fn build_credit_in(sub: &clap::ArgMatches) -> Result<CreditIn> {
    Ok(CreditIn::new(
        parse_date(required(sub, "date")?)?,
        required(sub, "counterparty")?,
        required_decimal(sub, "amount")?,
        required_decimal(sub, "total")?,
        category(sub)?,
        note(sub),
    )?)
}

fn build_credit_out(sub: &clap::ArgMatches) -> Result<CreditOut> {
    Ok(CreditOut::new(
        parse_date(required(sub, "date")?)?,
        required(sub, "counterparty")?,
        required_decimal(sub, "amount")?,
        optional_decimal(sub, "rate")?,
        required_decimal(sub, "profit")?,
        category(sub)?,
        note(sub),
    )?)
}

fn build_usdt(sub: &clap::ArgMatches) -> Result<UsdtTrade> {
    Ok(UsdtTrade::new(
        parse_date(required(sub, "date")?)?,
        required(sub, "counterparty")?,
        required(sub, "side")?.parse::<Side>()?,
        required_decimal(sub, "amount")?,
        required_decimal(sub, "rate")?,
        category(sub)?,
        note(sub),
    ))
}
