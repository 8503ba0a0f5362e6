// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use exledger::{checklist, cli};
use exledger::commands::{doctor, summary, tally};
use exledger::db::init_schema;
use exledger::models::{CashTally, Category, CreditOut, Income};
use exledger::store;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

#[test]
fn summary_adds_tables_cash_and_balances() {
    let conn = setup();
    store::insert(
        &conn,
        &Income::new(day(), "A", Decimal::from(2), Some(Decimal::from(100)), Category::Cash, None).unwrap(),
    )
    .unwrap();
    store::insert(
        &conn,
        &CreditOut::new(day(), "B", Decimal::from(10), None, Decimal::from(3), Category::Cash, None).unwrap(),
    )
    .unwrap();

    let tally = CashTally {
        counts: [1, 0, 2, 0, 0, 0, 1],
    };
    assert_eq!(tally.total().unwrap(), 12_050);
    store::save_tally(&conn, &tally).unwrap();

    let mut b = store::load_balances(&conn).unwrap();
    b.bank = Decimal::from(1000);
    b.usdt = Decimal::from(2);
    b.usdt_price = Decimal::from(50);
    store::save_balances(&conn, &b).unwrap();

    let s = summary::compute(&conn).unwrap();
    assert_eq!(s.tables[0].table, "income");
    assert_eq!(s.tables[0].total, Decimal::from(200));
    assert_eq!(s.tables[3].total, Decimal::from(10));
    assert_eq!(s.credit_profit, Decimal::from(3));
    assert_eq!(s.cash, 12_050);
    assert_eq!(s.balances, Decimal::from(1100));
    assert_eq!(s.assets, Decimal::from(13_150));
}

#[test]
fn doctor_reports_drift_and_gaps() {
    let mut conn = setup();
    assert!(doctor::diagnose(&conn).unwrap().is_empty());

    let id = store::insert(
        &conn,
        &Income::new(day(), "A", Decimal::from(2), Some(Decimal::from(3)), Category::Cash, None).unwrap(),
    )
    .unwrap();
    conn.execute("UPDATE income SET total='7' WHERE id=?1", [id])
        .unwrap();
    checklist::add(&mut conn, "a").unwrap();
    conn.execute("UPDATE checklist SET position=4", []).unwrap();

    let issues = doctor::diagnose(&conn).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(kinds.contains(&"derived_mismatch"));
    assert!(kinds.contains(&"checklist_gap"));
}

#[test]
fn tally_counts_outside_range_are_rejected() {
    let conn = setup();
    let too_many = cli::build_cli().try_get_matches_from([
        "exledger",
        "tally",
        "set",
        "--d10000",
        "1000000000000000000",
    ]);
    assert!(too_many.is_err());
    let negative =
        cli::build_cli().try_get_matches_from(["exledger", "tally", "set", "--d50=-1"]);
    assert!(negative.is_err());

    let top = cli::MAX_NOTE_COUNT.to_string();
    let mut argv = vec!["exledger".to_string(), "tally".into(), "set".into()];
    for name in cli::DENOMINATION_ARGS {
        argv.push(format!("--{name}"));
        argv.push(top.clone());
    }
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, sub) = matches.subcommand().expect("subcommand");
    tally::handle(&conn, sub).unwrap();
    let stored = store::load_tally(&conn).unwrap();
    assert_eq!(stored.total().unwrap(), 16_850 * cli::MAX_NOTE_COUNT);
}

#[test]
fn oversized_stored_figures_are_errors_not_panics() {
    let conn = setup();
    conn.execute("UPDATE cash_tally SET d10000=?1", [i64::MAX])
        .unwrap();
    assert!(store::load_tally(&conn).unwrap().total().is_err());
    assert!(summary::compute(&conn).is_err());

    conn.execute("UPDATE cash_tally SET d10000=0", []).unwrap();
    let mut b = store::load_balances(&conn).unwrap();
    b.usdt = Decimal::MAX;
    b.usdt_price = Decimal::from(2);
    store::save_balances(&conn, &b).unwrap();
    let err = b.total().unwrap_err();
    assert_eq!(err.to_string(), "USDT value is out of range");
    assert!(summary::compute(&conn).is_err());
}
