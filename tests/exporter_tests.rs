// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use exledger::commands::exporter::export_table;
use exledger::commands::importer::import_path;
use exledger::db::init_schema;
use exledger::models::{Category, Expense, Table};
use exledger::store::{self, ListFilter, ListOrder};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[test]
fn csv_export_loads_back_through_importer() {
    let conn = setup();
    for (d, who) in [(1, "Rent"), (2, "Food, market")] {
        store::insert(
            &conn,
            &Expense::new(
                NaiveDate::from_ymd_opt(2025, 6, d).unwrap(),
                who,
                Decimal::from(300),
                Decimal::from(12),
                Some(Decimal::from(4400)),
                Category::Cash,
                Some("monthly".into()),
            ).unwrap(),
        )
        .unwrap();
    }
    let dir = tempdir().unwrap();
    let out = dir.path().join("expense.csv");
    assert_eq!(export_table(&conn, Table::Expense, "csv", &out).unwrap(), 2);
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("id,date,counterparty,amount,exchanged,rate,total,category,note"));

    let mut fresh = setup();
    let report = import_path(&mut fresh, Table::Expense, &out).unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 0);

    let original: Vec<Expense> = store::list(&conn, ListOrder::Id, &ListFilter::default()).unwrap();
    let loaded: Vec<Expense> = store::list(&fresh, ListOrder::Id, &ListFilter::default()).unwrap();
    assert_eq!(original, loaded);
}

#[test]
fn json_export_writes_array() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("usdt.json");
    assert_eq!(export_table(&conn, Table::Usdt, "json", &out).unwrap(), 0);
    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(v.as_array().unwrap().is_empty());
    assert!(export_table(&conn, Table::Usdt, "xml", &out).is_err());
}
