// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::checklist::position_gaps;
use crate::db::current_sequence;
use crate::models::{CreditIn, CreditOut, Expense, Income, UsdtTrade};
use crate::store::{self, ListFilter, ListOrder, Record};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

fn check_table<T: Record>(conn: &Connection, issues: &mut Vec<Vec<String>>) -> Result<()> {
    // 1) Counter below the highest id, e.g. after rows were loaded with explicit ids
    let max_id: i64 = conn.query_row(
        &format!("SELECT IFNULL(MAX(id), 0) FROM {}", T::TABLE),
        [],
        |r| r.get(0),
    )?;
    let seq = current_sequence(conn, T::TABLE)?.unwrap_or(0);
    if seq < max_id {
        issues.push(vec![
            "sequence_behind".into(),
            format!("{} seq {} < max id {}", T::TABLE, seq, max_id),
        ]);
    }

    // 2) Stored derived fields that no longer match the formula
    let rows: Vec<T> = store::list(conn, ListOrder::Id, &ListFilter::default())?;
    let drifted: Vec<String> = rows
        .iter()
        .filter(|r| r.drifted())
        .filter_map(|r| r.id().map(|id| id.to_string()))
        .collect();
    if !drifted.is_empty() {
        issues.push(vec![
            "derived_mismatch".into(),
            format!("{} ids {}", T::TABLE, drifted.join(",")),
        ]);
    }
    Ok(())
}

pub fn diagnose(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut issues = Vec::new();
    check_table::<Income>(conn, &mut issues)?;
    check_table::<Expense>(conn, &mut issues)?;
    check_table::<CreditIn>(conn, &mut issues)?;
    check_table::<CreditOut>(conn, &mut issues)?;
    check_table::<UsdtTrade>(conn, &mut issues)?;

    // 3) Checklist ordering
    for (id, pos) in position_gaps(conn)? {
        issues.push(vec![
            "checklist_gap".into(),
            format!("item {} at position {}", id, pos),
        ]);
    }
    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
