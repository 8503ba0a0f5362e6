// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use exledger::db::{current_sequence, init_schema};
use exledger::models::{Category, CreditIn, CreditOut, Expense, Income, Side, UsdtTrade};
use exledger::store::{self, ListFilter, ListOrder};
use regex::Regex;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn records_read_back_identical() {
    let conn = setup();

    let mut income = Income::new(
        day(1),
        "Ko Aung",
        dec("100.50"),
        Some(dec("4500")),
        Category::Bank,
        Some("morning".into()),
    ).unwrap();
    let id = store::insert(&conn, &income).unwrap();
    income.id = Some(id);
    assert_eq!(store::get::<Income>(&conn, id).unwrap(), income);

    let mut expense = Expense::new(
        day(2),
        "Rent",
        dec("300"),
        dec("12.5"),
        None,
        Category::Cash,
        None,
    ).unwrap();
    let id = store::insert(&conn, &expense).unwrap();
    expense.id = Some(id);
    assert_eq!(store::get::<Expense>(&conn, id).unwrap(), expense);

    let mut bought = CreditIn::new(day(3), "Shop", dec("1000"), dec("950"), Category::Wallet, None).unwrap();
    let id = store::insert(&conn, &bought).unwrap();
    bought.id = Some(id);
    assert_eq!(store::get::<CreditIn>(&conn, id).unwrap(), bought);

    let mut sold = CreditOut::new(
        day(4),
        "Daw Hla",
        dec("500"),
        Some(dec("1.02")),
        dec("10"),
        Category::Other,
        None,
    ).unwrap();
    let id = store::insert(&conn, &sold).unwrap();
    sold.id = Some(id);
    assert_eq!(store::get::<CreditOut>(&conn, id).unwrap(), sold);

    let mut trade = UsdtTrade::new(
        day(5),
        "P2P",
        Side::Sell,
        dec("250"),
        dec("4420.5"),
        Category::Bank,
        Some("binance".into()),
    );
    let id = store::insert(&conn, &trade).unwrap();
    trade.id = Some(id);
    assert_eq!(store::get::<UsdtTrade>(&conn, id).unwrap(), trade);
}

#[test]
fn derived_fields_follow_formula() {
    let samples = [("0", "3"), ("1", "1"), ("12.5", "4400"), ("-3", "2.25")];
    for (amount, rate) in samples {
        let (a, r) = (dec(amount), dec(rate));
        let i = Income::new(day(1), "x", a, Some(r), Category::Cash, None).unwrap();
        assert_eq!(i.total, a * r);
        let e = Expense::new(day(1), "x", dec("7"), a, Some(r), Category::Cash, None).unwrap();
        assert_eq!(e.total, a * r);
        let o = CreditOut::new(day(1), "x", a, Some(r), Decimal::ZERO, Category::Cash, None).unwrap();
        assert_eq!(o.total, a * r);
    }

    // missing rate defaults to 1
    let i = Income::new(day(1), "x", dec("42.5"), None, Category::Cash, None).unwrap();
    assert_eq!(i.rate, Decimal::ONE);
    assert_eq!(i.total, dec("42.5"));
    let e = Expense::new(day(1), "x", dec("9"), dec("8"), None, Category::Cash, None).unwrap();
    assert_eq!(e.total, dec("8"));
    let o = CreditOut::new(day(1), "x", dec("3"), None, dec("1"), Category::Cash, None).unwrap();
    assert_eq!(o.total, dec("3"));

    let c = CreditIn::new(day(1), "x", dec("1000"), dec("950"), Category::Cash, None).unwrap();
    assert_eq!(c.rate, dec("0.95"));
    let zero = CreditIn::new(day(1), "x", Decimal::ZERO, dec("10"), Category::Cash, None).unwrap();
    assert_eq!(zero.rate, Decimal::ZERO);
}

#[test]
fn stored_total_is_not_rederived_on_read() {
    let conn = setup();
    let rec = Income::new(day(1), "x", dec("2"), Some(dec("3")), Category::Cash, None).unwrap();
    let id = store::insert(&conn, &rec).unwrap();
    conn.execute("UPDATE income SET total='99' WHERE id=?1", [id])
        .unwrap();
    let back: Income = store::get(&conn, id).unwrap();
    assert_eq!(back.total, dec("99"));
}

#[test]
fn clear_then_next_id_is_one() {
    let mut conn = setup();
    for i in 1..=3 {
        store::insert(
            &conn,
            &Income::new(day(i), "x", dec("1"), None, Category::Cash, None).unwrap(),
        )
        .unwrap();
    }
    assert_eq!(current_sequence(&conn, "income").unwrap(), Some(3));

    let n = store::clear(&mut conn, "income").unwrap();
    assert_eq!(n, 3);
    assert_eq!(store::count(&conn, "income").unwrap(), 0);

    let id = store::insert(
        &conn,
        &Income::new(day(9), "y", dec("1"), None, Category::Cash, None).unwrap(),
    )
    .unwrap();
    assert_eq!(id, 1);
}

#[test]
fn list_orders_filters_and_limits() {
    let conn = setup();
    // inserted out of date order
    for (d, who) in [(5, "Alpha"), (1, "Beta"), (3, "Alpine")] {
        store::insert(
            &conn,
            &Income::new(day(d), who, dec("1"), None, Category::Cash, None).unwrap(),
        )
        .unwrap();
    }

    let by_id: Vec<Income> = store::list(&conn, ListOrder::Id, &ListFilter::default()).unwrap();
    let ids: Vec<i64> = by_id.iter().map(|r| r.id.unwrap()).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    let by_date: Vec<Income> =
        store::list(&conn, ListOrder::Date, &ListFilter::default()).unwrap();
    let days: Vec<NaiveDate> = by_date.iter().map(|r| r.date).collect();
    assert_eq!(days, vec![day(5), day(3), day(1)]);

    let filter = ListFilter {
        counterparty: Some(Regex::new("^Alp").unwrap()),
        limit: Some(1),
    };
    let rows: Vec<Income> = store::list(&conn, ListOrder::Date, &filter).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].counterparty, "Alpha");
}

#[test]
fn delete_missing_row_is_not_found() {
    let conn = setup();
    let err = store::delete::<Expense>(&conn, 7).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn insert_with_id_replaces_row() {
    let conn = setup();
    let mut rec = Income::new(day(1), "x", dec("1"), None, Category::Cash, None).unwrap();
    rec.id = Some(4);
    store::insert(&conn, &rec).unwrap();
    rec.counterparty = "renamed".into();
    store::insert(&conn, &rec).unwrap();
    assert_eq!(store::count(&conn, "income").unwrap(), 1);
    let back: Income = store::get(&conn, 4).unwrap();
    assert_eq!(back.counterparty, "renamed");
}

#[test]
fn overflowing_formula_is_an_error() {
    let max = Decimal::MAX;
    assert!(Income::new(day(1), "x", max, Some(dec("2")), Category::Cash, None).is_err());
    assert!(Expense::new(day(1), "x", dec("1"), max, Some(dec("2")), Category::Cash, None).is_err());
    assert!(CreditOut::new(day(1), "x", max, Some(dec("1.5")), dec("0"), Category::Cash, None).is_err());
    let err = CreditIn::new(day(1), "x", dec("0.1"), max, Category::Cash, None).unwrap_err();
    assert_eq!(err.to_string(), "rate is out of range");

    // the largest value still fits when the rate is left at 1
    let fits = Income::new(day(1), "x", max, None, Category::Cash, None).unwrap();
    assert_eq!(fits.total, max);
}
