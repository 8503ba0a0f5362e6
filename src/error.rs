// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Domain errors. Command handlers wrap these in `anyhow` with context.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// A required form field was missing or blank.
    #[error("{0} is required")]
    Validation(&'static str),

    #[error("{table} row {id} not found")]
    NotFound { table: &'static str, id: i64 },

    #[error("Unknown table '{0}' (use income|expense|credit-in|credit-out|usdt)")]
    UnknownTable(String),

    #[error("Invalid {field} '{value}'")]
    InvalidChoice { field: &'static str, value: String },

    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("Invalid value '{value}' for setting '{key}'")]
    InvalidSetting { key: String, value: String },

    /// A derived amount does not fit in a decimal.
    #[error("{0} is out of range")]
    Overflow(&'static str),

    /// Price quote could not be read from the response body.
    #[error("Quote error: {0}")]
    Quote(String),
}
