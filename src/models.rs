// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cash,
    Bank,
    Wallet,
    Other,
}

impl Category {
    pub const ALL: [&'static str; 4] = ["cash", "bank", "wallet", "other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cash => "cash",
            Category::Bank => "bank",
            Category::Wallet => "wallet",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Category::Cash),
            "bank" => Ok(Category::Bank),
            "wallet" => Ok(Category::Wallet),
            "other" => Ok(Category::Other),
            _ => Err(LedgerError::InvalidChoice {
                field: "category",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(LedgerError::InvalidChoice {
                field: "side",
                value: s.to_string(),
            }),
        }
    }
}

/// The five transaction tables, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Income,
    Expense,
    CreditIn,
    CreditOut,
    Usdt,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Income,
        Table::Expense,
        Table::CreditIn,
        Table::CreditOut,
        Table::Usdt,
    ];

    /// SQL table name; also the stem of the seed CSV file.
    pub fn sql_name(&self) -> &'static str {
        match self {
            Table::Income => "income",
            Table::Expense => "expense",
            Table::CreditIn => "credit_in",
            Table::CreditOut => "credit_out",
            Table::Usdt => "usdt_trade",
        }
    }

    pub fn cli_name(&self) -> &'static str {
        match self {
            Table::Income => "income",
            Table::Expense => "expense",
            Table::CreditIn => "credit-in",
            Table::CreditOut => "credit-out",
            Table::Usdt => "usdt",
        }
    }
}

impl FromStr for Table {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Table::ALL
            .into_iter()
            .find(|t| t.cli_name() == key || t.sql_name() == key)
            .ok_or(LedgerError::UnknownTable(s.to_string()))
    }
}

fn rate_or_one(rate: Option<Decimal>) -> Decimal {
    rate.unwrap_or(Decimal::ONE)
}

fn product(a: Decimal, b: Decimal, field: &'static str) -> Result<Decimal, LedgerError> {
    a.checked_mul(b).ok_or(LedgerError::Overflow(field))
}

/// Local-currency income / buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub counterparty: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub total: Decimal,
    pub category: Category,
    pub note: Option<String>,
}

impl Income {
    pub fn new(
        date: NaiveDate,
        counterparty: impl Into<String>,
        amount: Decimal,
        rate: Option<Decimal>,
        category: Category,
        note: Option<String>,
    ) -> Result<Self, LedgerError> {
        let rate = rate_or_one(rate);
        Ok(Income {
            id: None,
            date,
            counterparty: counterparty.into(),
            amount,
            rate,
            total: product(amount, rate, "total")?,
            category,
            note,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub counterparty: String,
    pub amount: Decimal,
    pub exchanged: Decimal,
    pub rate: Decimal,
    pub total: Decimal,
    pub category: Category,
    pub note: Option<String>,
}

impl Expense {
    pub fn new(
        date: NaiveDate,
        counterparty: impl Into<String>,
        amount: Decimal,
        exchanged: Decimal,
        rate: Option<Decimal>,
        category: Category,
        note: Option<String>,
    ) -> Result<Self, LedgerError> {
        let rate = rate_or_one(rate);
        Ok(Expense {
            id: None,
            date,
            counterparty: counterparty.into(),
            amount,
            exchanged,
            rate,
            total: product(exchanged, rate, "total")?,
            category,
            note,
        })
    }
}

/// Prepaid credit bought: the price paid is known, the unit rate is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditIn {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub counterparty: String,
    pub amount: Decimal,
    pub total: Decimal,
    pub rate: Decimal,
    pub category: Category,
    pub note: Option<String>,
}

impl CreditIn {
    pub fn new(
        date: NaiveDate,
        counterparty: impl Into<String>,
        amount: Decimal,
        total: Decimal,
        category: Category,
        note: Option<String>,
    ) -> Result<Self, LedgerError> {
        Ok(CreditIn {
            id: None,
            date,
            counterparty: counterparty.into(),
            amount,
            total,
            rate: credit_rate(amount, total)?,
            category,
            note,
        })
    }
}

/// `total / amount`, zero when nothing was bought.
pub fn credit_rate(amount: Decimal, total: Decimal) -> Result<Decimal, LedgerError> {
    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    total.checked_div(amount).ok_or(LedgerError::Overflow("rate"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditOut {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub counterparty: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub total: Decimal,
    pub profit: Decimal,
    pub category: Category,
    pub note: Option<String>,
}

impl CreditOut {
    pub fn new(
        date: NaiveDate,
        counterparty: impl Into<String>,
        amount: Decimal,
        rate: Option<Decimal>,
        profit: Decimal,
        category: Category,
        note: Option<String>,
    ) -> Result<Self, LedgerError> {
        let rate = rate_or_one(rate);
        Ok(CreditOut {
            id: None,
            date,
            counterparty: counterparty.into(),
            amount,
            rate,
            total: product(amount, rate, "total")?,
            profit,
            category,
            note,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsdtTrade {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub counterparty: String,
    pub side: Side,
    pub amount: Decimal,
    pub rate: Decimal,
    pub category: Category,
    pub note: Option<String>,
}

impl UsdtTrade {
    pub fn new(
        date: NaiveDate,
        counterparty: impl Into<String>,
        side: Side,
        amount: Decimal,
        rate: Decimal,
        category: Category,
        note: Option<String>,
    ) -> Self {
        UsdtTrade {
            id: None,
            date,
            counterparty: counterparty.into(),
            side,
            amount,
            rate,
            category,
            note,
        }
    }
}

pub const DENOMINATIONS: [i64; 7] = [10000, 5000, 1000, 500, 200, 100, 50];

/// Note counts per denomination, in `DENOMINATIONS` order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashTally {
    pub counts: [i64; 7],
}

impl CashTally {
    /// Value of each denomination's notes, in `DENOMINATIONS` order.
    pub fn values(&self) -> Result<[i64; 7], LedgerError> {
        let mut out = [0; 7];
        for (slot, (d, c)) in out.iter_mut().zip(DENOMINATIONS.iter().zip(self.counts.iter())) {
            *slot = d.checked_mul(*c).ok_or(LedgerError::Overflow("cash tally"))?;
        }
        Ok(out)
    }

    pub fn total(&self) -> Result<i64, LedgerError> {
        self.values()?
            .into_iter()
            .try_fold(0i64, |acc, v| acc.checked_add(v))
            .ok_or(LedgerError::Overflow("cash tally"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    pub bank: Decimal,
    pub wallet: Decimal,
    pub credit: Decimal,
    pub usdt: Decimal,
    pub usdt_price: Decimal,
    pub updated_at: Option<String>,
}

impl Balances {
    pub fn usdt_value(&self) -> Result<Decimal, LedgerError> {
        product(self.usdt, self.usdt_price, "USDT value")
    }

    pub fn total(&self) -> Result<Decimal, LedgerError> {
        checked_sum([self.bank, self.wallet, self.credit, self.usdt_value()?], "balances total")
    }
}

/// Sum that reports overflow instead of panicking.
pub fn checked_sum(
    values: impl IntoIterator<Item = Decimal>,
    field: &'static str,
) -> Result<Decimal, LedgerError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or(LedgerError::Overflow(field))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: i64,
    pub text: String,
    pub checked: bool,
    pub position: i64,
}
