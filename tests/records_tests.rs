// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use exledger::commands::records;
use exledger::db::init_schema;
use exledger::models::{Income, Table, UsdtTrade};
use exledger::{cli, store};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["exledger"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (name, sub) = matches.subcommand().expect("subcommand");
    let table: Table = name.parse().unwrap();
    records::handle(conn, table, sub)
}

#[test]
fn add_stores_derived_total() {
    let conn = setup();
    run(
        &conn,
        &[
            "income",
            "add",
            "--date",
            "2025-04-01",
            "--counterparty",
            "Ko Aung",
            "--amount",
            "250",
            "--rate",
            "4400",
            "--category",
            "bank",
        ],
    )
    .unwrap();
    let row: Income = store::get(&conn, 1).unwrap();
    assert_eq!(row.total, Decimal::from(1_100_000));
    assert_eq!(row.category.as_str(), "bank");
}

#[test]
fn blank_counterparty_is_rejected() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "usdt",
            "add",
            "--date",
            "2025-04-01",
            "--counterparty",
            "   ",
            "--side",
            "buy",
            "--amount",
            "10",
            "--rate",
            "4400",
        ],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "counterparty is required");
    assert_eq!(store::count(&conn, "usdt_trade").unwrap(), 0);
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    for d in ["2025-01-01", "2025-01-03", "2025-01-02"] {
        run(
            &conn,
            &[
                "usdt", "add", "--date", d, "-c", "P2P", "--side", "sell", "--amount", "5",
                "--rate", "4410",
            ],
        )
        .unwrap();
    }
    let matches =
        cli::build_cli().get_matches_from(["exledger", "usdt", "list", "--limit", "2", "--order", "date"]);
    if let Some(("usdt", usdt_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = usdt_m.subcommand() {
            let rows = records::query_rows::<UsdtTrade>(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date.to_string(), "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no usdt subcommand");
    }
}

#[test]
fn rm_deletes_row() {
    let conn = setup();
    run(
        &conn,
        &[
            "expense", "add", "--date", "2025-04-01", "-c", "Rent", "--amount", "300",
            "--exchanged", "12",
        ],
    )
    .unwrap();
    run(&conn, &["expense", "rm", "--id", "1"]).unwrap();
    assert_eq!(store::count(&conn, "expense").unwrap(), 0);
    assert!(run(&conn, &["expense", "rm", "--id", "1"]).is_err());
}

#[test]
fn add_with_overflowing_total_fails_cleanly() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "income",
            "add",
            "--date",
            "2025-04-01",
            "-c",
            "Ko Aung",
            "--amount",
            "79228162514264337593543950335",
            "--rate",
            "2",
        ],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "total is out of range");
    assert_eq!(store::count(&conn, "income").unwrap(), 0);
}
