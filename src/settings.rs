// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display and price-fetch preferences kept in the `settings` table.

use crate::error::LedgerError;
use crate::store::ListOrder;
use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use rusqlite::{Connection, OptionalExtension, params};
use std::fmt::Write;

pub const DEFAULT_PRICE_URL: &str = "https://api.binance.com/api/v3/ticker/price?symbol=USDTTRY";

/// Known keys and their defaults.
pub const KEYS: [(&str, &str); 5] = [
    ("decimals", "2"),
    ("date_format", "%Y-%m-%d"),
    ("list_order", "date"),
    ("price_url", DEFAULT_PRICE_URL),
    ("price_key", "price"),
];

fn default_for(key: &str) -> Result<&'static str, LedgerError> {
    KEYS.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| LedgerError::UnknownSetting(key.to_string()))
}

fn validate(key: &str, value: &str) -> Result<(), LedgerError> {
    let invalid = || LedgerError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    };
    match key {
        "decimals" => match value.parse::<u32>() {
            Ok(n) if n <= 8 => Ok(()),
            _ => Err(invalid()),
        },
        "list_order" => value.parse::<ListOrder>().map(|_| ()).map_err(|_| invalid()),
        "date_format" => {
            let bad = value.trim().is_empty()
                || StrftimeItems::new(value).any(|item| matches!(item, Item::Error));
            if bad { Err(invalid()) } else { Ok(()) }
        }
        "price_key" | "price_url" if value.trim().is_empty() => Err(invalid()),
        _ => Ok(()),
    }
}

pub fn get(conn: &Connection, key: &str) -> Result<String> {
    let default = default_for(key)?;
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| default.to_string()))
}

pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    default_for(key)?;
    validate(key, value)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Every known key with its effective value.
pub fn all(conn: &Connection) -> Result<Vec<(String, String)>> {
    KEYS.iter()
        .map(|(k, _)| Ok((k.to_string(), get(conn, k)?)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Display {
    pub decimals: u32,
    pub date_format: String,
    pub list_order: ListOrder,
}

impl Display {
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Display {
            decimals: get(conn, "decimals")?.parse().unwrap_or(2),
            date_format: get(conn, "date_format")?,
            list_order: get(conn, "list_order")?
                .parse()
                .unwrap_or(ListOrder::Date),
        })
    }

    pub fn date(&self, d: chrono::NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", d.format(&self.date_format)).is_err() {
            return d.to_string();
        }
        out
    }

    pub fn amount(&self, d: &rust_decimal::Decimal) -> String {
        crate::utils::fmt_amount(d, self.decimals)
    }
}
