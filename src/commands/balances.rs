// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::quote::refresh_usdt_price;
use crate::settings::Display;
use crate::store::{load_balances, save_balances};
use crate::utils::{maybe_print_json, optional_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let mut b = load_balances(conn)?;
            if let Some(v) = optional_decimal(sub, "bank")? {
                b.bank = v;
            }
            if let Some(v) = optional_decimal(sub, "wallet")? {
                b.wallet = v;
            }
            if let Some(v) = optional_decimal(sub, "credit")? {
                b.credit = v;
            }
            if let Some(v) = optional_decimal(sub, "usdt")? {
                b.usdt = v;
            }
            save_balances(conn, &b)?;
            show(conn, false)?;
        }
        Some(("show", sub)) => show(conn, sub.get_flag("json"))?,
        Some(("fetch-price", _)) => match refresh_usdt_price(conn)? {
            Ok(price) => println!("Stablecoin price updated to {}", price),
            Err(msg) => eprintln!("{}", msg),
        },
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, json: bool) -> Result<()> {
    let b = load_balances(conn)?;
    if maybe_print_json(json, false, &b)? {
        return Ok(());
    }
    let d = Display::load(conn)?;
    let rows = vec![
        vec!["Bank".into(), d.amount(&b.bank)],
        vec!["Wallet".into(), d.amount(&b.wallet)],
        vec!["Prepaid credit".into(), d.amount(&b.credit)],
        vec!["USDT".into(), d.amount(&b.usdt)],
        vec!["USDT price".into(), b.usdt_price.to_string()],
        vec!["USDT value".into(), d.amount(&b.usdt_value()?)],
        vec!["Total".into(), d.amount(&b.total()?)],
        vec!["Updated".into(), b.updated_at.clone().unwrap_or_default()],
    ];
    println!("{}", pretty_table(&["Balance", "Value"], rows));
    Ok(())
}
