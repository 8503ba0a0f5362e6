// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use exledger::db::init_schema;
use exledger::quote::{parse_quote, refresh_usdt_price};
use exledger::{settings, store};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

#[test]
fn numeric_string_and_number_accepted() {
    let body = json!({"symbol": "USDTMMK", "price": "4415.20"});
    assert_eq!(
        parse_quote(&body, "price").unwrap(),
        "4415.20".parse::<Decimal>().unwrap()
    );

    let nested = json!({"data": {"rate": 3.5}});
    assert_eq!(
        parse_quote(&nested, "data.rate").unwrap(),
        "3.5".parse::<Decimal>().unwrap()
    );
}

#[test]
fn missing_or_non_numeric_key_is_an_error() {
    let body = json!({"price": true, "label": "n/a"});
    assert!(parse_quote(&body, "last").is_err());
    assert!(parse_quote(&body, "price").is_err());
    assert!(parse_quote(&body, "label").is_err());
}

#[test]
fn failed_fetch_leaves_price_unchanged() {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let mut b = store::load_balances(&conn).unwrap();
    b.usdt_price = Decimal::from(4400);
    store::save_balances(&conn, &b).unwrap();

    // nothing listens on the discard port
    settings::set(&conn, "price_url", "http://127.0.0.1:9/quote").unwrap();
    let outcome = refresh_usdt_price(&conn).unwrap();
    let msg = outcome.unwrap_err();
    assert!(msg.starts_with("Could not fetch price"));
    assert_eq!(
        store::load_balances(&conn).unwrap().usdt_price,
        Decimal::from(4400)
    );
}

/// Serve one HTTP response with `body` on a local port, then close.
fn serve_once(body: &'static str) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/ticker", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
    });
    (url, handle)
}

#[test]
fn successful_fetch_stores_price() {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let (url, server) = serve_once(r#"{"data": {"last": "4431.75"}}"#);
    settings::set(&conn, "price_url", &url).unwrap();
    settings::set(&conn, "price_key", "data.last").unwrap();

    let price = refresh_usdt_price(&conn).unwrap().unwrap();
    server.join().unwrap();
    let expected = "4431.75".parse::<Decimal>().unwrap();
    assert_eq!(price, expected);
    assert_eq!(store::load_balances(&conn).unwrap().usdt_price, expected);
}
