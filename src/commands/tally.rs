// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::DENOMINATION_ARGS;
use crate::models::DENOMINATIONS;
use crate::store::{load_tally, save_tally};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let mut tally = load_tally(conn)?;
            for (i, name) in DENOMINATION_ARGS.iter().enumerate() {
                if let Some(n) = sub.get_one::<i64>(name) {
                    tally.counts[i] = *n;
                }
            }
            save_tally(conn, &tally)?;
            show(conn, false)?;
        }
        Some(("show", sub)) => show(conn, sub.get_flag("json"))?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, json: bool) -> Result<()> {
    let tally = load_tally(conn)?;
    if maybe_print_json(json, false, &tally)? {
        return Ok(());
    }
    let values = tally.values()?;
    let mut rows: Vec<Vec<String>> = DENOMINATIONS
        .iter()
        .zip(tally.counts.iter())
        .zip(values.iter())
        .map(|((d, c), v)| vec![d.to_string(), c.to_string(), v.to_string()])
        .collect();
    rows.push(vec!["Total".into(), String::new(), tally.total()?.to_string()]);
    println!("{}", pretty_table(&["Note", "Count", "Value"], rows));
    Ok(())
}
