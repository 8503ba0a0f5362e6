// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::checklist;
use crate::utils::{maybe_print_json, pretty_table, required, required_id};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            checklist::add(conn, required(sub, "text")?)?;
            show(conn, false)?;
        }
        Some(("list", sub)) => show(conn, sub.get_flag("json"))?,
        Some(("toggle", sub)) => {
            checklist::toggle(conn, required_id(sub)?)?;
            show(conn, false)?;
        }
        Some(("move", sub)) => {
            let to = *sub.get_one::<usize>("to").context("--to is required")?;
            checklist::move_item(conn, required_id(sub)?, to)?;
            show(conn, false)?;
        }
        Some(("rm", sub)) => {
            checklist::delete(conn, required_id(sub)?)?;
            show(conn, false)?;
        }
        Some(("clear-checked", _)) => {
            let n = checklist::clear_checked(conn)?;
            println!("Removed {} checked items", n);
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, json: bool) -> Result<()> {
    let items = checklist::list(conn)?;
    if maybe_print_json(json, false, &items)? {
        return Ok(());
    }
    let rows = items
        .into_iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                if i.checked { "[x]".into() } else { "[ ]".into() },
                if i.checked { String::new() } else { i.position.to_string() },
                i.text,
            ]
        })
        .collect();
    println!("{}", pretty_table(&["ID", "Done", "Pos", "Item"], rows));
    Ok(())
}
