// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ordered to-do list. Unchecked items hold positions `0..n` with no gaps;
//! checked items hold `-1`. Every mutation renumbers inside one transaction.

use crate::error::LedgerError;
use crate::models::ChecklistItem;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Transaction, params};

const TABLE: &str = "checklist";

fn item_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<ChecklistItem> {
    Ok(ChecklistItem {
        id: r.get(0)?,
        text: r.get(1)?,
        checked: r.get(2)?,
        position: r.get(3)?,
    })
}

/// Unchecked items by position, then checked items by id.
pub fn list(conn: &Connection) -> Result<Vec<ChecklistItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, checked, position FROM checklist
         ORDER BY checked ASC, CASE WHEN checked=0 THEN position ELSE id END ASC, id ASC",
    )?;
    let rows = stmt.query_map([], item_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn find(conn: &Connection, id: i64) -> Result<ChecklistItem> {
    conn.query_row(
        "SELECT id, text, checked, position FROM checklist WHERE id=?1",
        params![id],
        item_from_row,
    )
    .optional()?
    .ok_or_else(|| LedgerError::NotFound { table: TABLE, id }.into())
}

fn unchecked_ids(tx: &Transaction<'_>) -> Result<Vec<i64>> {
    let mut stmt =
        tx.prepare("SELECT id FROM checklist WHERE checked=0 ORDER BY position ASC, id ASC")?;
    let ids = stmt
        .query_map([], |r| r.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

fn write_order(tx: &Transaction<'_>, ids: &[i64]) -> Result<()> {
    let mut stmt = tx.prepare("UPDATE checklist SET position=?1 WHERE id=?2")?;
    for (pos, id) in ids.iter().enumerate() {
        stmt.execute(params![pos as i64, id])?;
    }
    tx.execute("UPDATE checklist SET position=-1 WHERE checked=1", [])?;
    Ok(())
}

/// Renumber unchecked items densely, keeping their relative order.
pub fn normalize(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    let ids = unchecked_ids(&tx)?;
    write_order(&tx, &ids)?;
    tx.commit()?;
    Ok(())
}

/// Append a new unchecked item at the end.
pub fn add(conn: &mut Connection, text: &str) -> Result<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LedgerError::Validation("text").into());
    }
    let tx = conn.transaction()?;
    let next: i64 = tx.query_row(
        "SELECT COUNT(*) FROM checklist WHERE checked=0",
        [],
        |r| r.get(0),
    )?;
    tx.execute(
        "INSERT INTO checklist(text, checked, position) VALUES (?1, 0, ?2)",
        params![text, next],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// Flip the checked flag. Unchecking puts the item back at the end.
pub fn toggle(conn: &mut Connection, id: i64) -> Result<bool> {
    let item = find(conn, id)?;
    let checked = !item.checked;
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE checklist SET checked=?1 WHERE id=?2",
        params![checked, id],
    )?;
    let mut ids: Vec<i64> = unchecked_ids(&tx)?
        .into_iter()
        .filter(|x| *x != id)
        .collect();
    if !checked {
        ids.push(id);
    }
    write_order(&tx, &ids)?;
    tx.commit()?;
    Ok(checked)
}

/// Move an unchecked item to `to`, clamped to the end of the list.
pub fn move_item(conn: &mut Connection, id: i64, to: usize) -> Result<usize> {
    let item = find(conn, id)?;
    if item.checked {
        return Err(LedgerError::InvalidChoice {
            field: "checklist item (checked items cannot be moved)",
            value: id.to_string(),
        }
        .into());
    }
    let tx = conn.transaction()?;
    let mut ids: Vec<i64> = unchecked_ids(&tx)?
        .into_iter()
        .filter(|x| *x != id)
        .collect();
    let to = to.min(ids.len());
    ids.insert(to, id);
    write_order(&tx, &ids)?;
    tx.commit()?;
    Ok(to)
}

pub fn delete(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    let n = tx.execute("DELETE FROM checklist WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::NotFound { table: TABLE, id }.into());
    }
    let ids = unchecked_ids(&tx)?;
    write_order(&tx, &ids)?;
    tx.commit()?;
    Ok(())
}

pub fn clear_checked(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM checklist WHERE checked=1", [])?)
}

/// Positions of unchecked items that break the `0..n` sequence.
pub fn position_gaps(conn: &Connection) -> Result<Vec<(i64, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT id, position FROM checklist WHERE checked=0 ORDER BY position ASC, id ASC",
    )?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?;
    let mut gaps = Vec::new();
    for (expected, row) in rows.enumerate() {
        let (id, pos) = row?;
        if pos != expected as i64 {
            gaps.push((id, pos));
        }
    }
    Ok(gaps)
}
