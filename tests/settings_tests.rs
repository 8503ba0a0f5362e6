// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use exledger::db::init_schema;
use exledger::settings::{self, Display};
use exledger::store::ListOrder;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[test]
fn defaults_then_overrides() {
    let conn = setup();
    assert_eq!(settings::get(&conn, "decimals").unwrap(), "2");
    assert_eq!(settings::get(&conn, "list_order").unwrap(), "date");

    settings::set(&conn, "decimals", "0").unwrap();
    settings::set(&conn, "list_order", "id").unwrap();
    settings::set(&conn, "date_format", "%d/%m/%Y").unwrap();

    let d = Display::load(&conn).unwrap();
    assert_eq!(d.list_order, ListOrder::Id);
    assert_eq!(d.date(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()), "04/07/2025");
    assert_eq!(d.amount(&"1234.56".parse::<Decimal>().unwrap()), "1235");
}

#[test]
fn unknown_and_invalid_values_rejected() {
    let conn = setup();
    assert!(settings::set(&conn, "theme", "dark").is_err());
    assert!(settings::get(&conn, "theme").is_err());
    assert!(settings::set(&conn, "decimals", "lots").is_err());
    assert!(settings::set(&conn, "list_order", "name").is_err());
    assert!(settings::set(&conn, "date_format", "%Q").is_err());
    assert_eq!(settings::get(&conn, "decimals").unwrap(), "2");
}

#[test]
fn all_lists_every_key() {
    let conn = setup();
    let keys: Vec<String> = settings::all(&conn)
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        keys,
        vec!["decimals", "date_format", "list_order", "price_url", "price_key"]
    );
}
