// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CreditIn, CreditOut, Expense, Income, UsdtTrade, checked_sum};
use crate::settings::Display;
use crate::store::{self, ListFilter, ListOrder, Record, load_balances, load_tally};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TableTotal {
    pub table: &'static str,
    pub rows: usize,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub tables: Vec<TableTotal>,
    pub credit_profit: Decimal,
    pub cash: i64,
    pub balances: Decimal,
    /// Cash tally plus external balances.
    pub assets: Decimal,
}

fn table_total<T: Record>(conn: &Connection) -> Result<(TableTotal, Vec<T>)> {
    let rows: Vec<T> = store::list(conn, ListOrder::Id, &ListFilter::default())?;
    let total = checked_sum(rows.iter().map(T::headline), T::TABLE)?;
    Ok((
        TableTotal {
            table: T::TABLE,
            rows: rows.len(),
            total,
        },
        rows,
    ))
}

pub fn compute(conn: &Connection) -> Result<Summary> {
    let (income, _) = table_total::<Income>(conn)?;
    let (expense, _) = table_total::<Expense>(conn)?;
    let (credit_in, _) = table_total::<CreditIn>(conn)?;
    let (credit_out, sold) = table_total::<CreditOut>(conn)?;
    let (usdt, _) = table_total::<UsdtTrade>(conn)?;
    let credit_profit = checked_sum(sold.iter().map(|r| r.profit), "credit profit")?;

    let cash = load_tally(conn)?.total()?;
    let balances = load_balances(conn)?.total()?;
    Ok(Summary {
        tables: vec![income, expense, credit_in, credit_out, usdt],
        credit_profit,
        cash,
        balances,
        assets: checked_sum([Decimal::from(cash), balances], "assets")?,
    })
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let s = compute(conn)?;
    if maybe_print_json(m.get_flag("json"), false, &s)? {
        return Ok(());
    }
    let d = Display::load(conn)?;
    let rows = s
        .tables
        .iter()
        .map(|t| vec![t.table.to_string(), t.rows.to_string(), d.amount(&t.total)])
        .collect();
    println!("{}", pretty_table(&["Table", "Rows", "Total"], rows));
    println!(
        "{}",
        pretty_table(
            &["Figure", "Value"],
            vec![
                vec!["Credit profit".into(), d.amount(&s.credit_profit)],
                vec!["Cash tally".into(), s.cash.to_string()],
                vec!["Balances".into(), d.amount(&s.balances)],
                vec!["Assets".into(), d.amount(&s.assets)],
            ],
        )
    );
    Ok(())
}
