// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-shot price quote used to value the stablecoin balance.

use crate::error::LedgerError;
use crate::{settings, store, utils::http_client};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Read a numeric field from a quote body. `key` may be a dotted path
/// (`data.price`); the value may be a JSON number or a numeric string.
pub fn parse_quote(body: &Value, key: &str) -> Result<Decimal, LedgerError> {
    let mut cur = body;
    for part in key.split('.') {
        cur = cur
            .get(part)
            .ok_or_else(|| LedgerError::Quote(format!("key '{}' not in response", key)))?;
    }
    let raw = match cur {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(LedgerError::Quote(format!(
                "key '{}' is not numeric: {}",
                key, other
            )));
        }
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| LedgerError::Quote(format!("cannot read '{}' as a number", raw)))
}

pub fn fetch_quote(client: &reqwest::blocking::Client, url: &str, key: &str) -> Result<Decimal> {
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?;
    let body: Value = resp.json().context("Quote response is not JSON")?;
    Ok(parse_quote(&body, key)?)
}

/// Fetch the configured quote and store it as the stablecoin price.
///
/// Failures are logged and returned as `Err(message)` for the user; the
/// stored price is left as it was.
pub fn refresh_usdt_price(conn: &Connection) -> Result<Result<Decimal, String>> {
    let url = settings::get(conn, "price_url")?;
    let key = settings::get(conn, "price_key")?;
    let fetched = http_client().and_then(|c| fetch_quote(&c, &url, &key));
    match fetched {
        Ok(price) => {
            let mut balances = store::load_balances(conn)?;
            balances.usdt_price = price;
            store::save_balances(conn, &balances)?;
            tracing::info!(%price, "stablecoin price updated");
            Ok(Ok(price))
        }
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), url = %url, "price fetch failed");
            Ok(Err(format!("Could not fetch price: {err:#}")))
        }
    }
}
