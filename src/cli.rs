// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Table};
use clap::{Arg, ArgAction, Command, value_parser};

/// One flag per entry of `models::DENOMINATIONS`, same order.
pub const DENOMINATION_ARGS: [&str; 7] =
    ["d10000", "d5000", "d1000", "d500", "d200", "d100", "d50"];

/// Upper bound for a single denomination count on `tally set`.
pub const MAX_NOTE_COUNT: i64 = 1_000_000_000;

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn common_record_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
        .arg(Arg::new("counterparty").long("counterparty").short('c').required(true))
        .arg(
            Arg::new("category")
                .long("category")
                .default_value("cash")
                .value_parser(Category::ALL),
        )
        .arg(Arg::new("note").long("note"))
}

fn list_cmd() -> Command {
    Command::new("list")
        .about("List rows, newest first")
        .arg(
            Arg::new("order")
                .long("order")
                .value_parser(["id", "date"])
                .help("Sort key (default: list_order setting)"),
        )
        .arg(Arg::new("match").long("match").help("Regex on counterparty"))
        .arg(
            Arg::new("limit")
                .long("limit")
                .value_parser(value_parser!(usize)),
        )
        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
        .arg(Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue))
}

fn add_cmd(table: Table) -> Command {
    let cmd = common_record_args(Command::new("add").about("Record a new row"));
    match table {
        Table::Income => cmd
            .arg(Arg::new("amount").long("amount").required(true))
            .arg(Arg::new("rate").long("rate").help("Defaults to 1")),
        Table::Expense => cmd
            .arg(Arg::new("amount").long("amount").required(true))
            .arg(Arg::new("exchanged").long("exchanged").required(true))
            .arg(Arg::new("rate").long("rate").help("Defaults to 1")),
        Table::CreditIn => cmd
            .arg(Arg::new("amount").long("amount").required(true))
            .arg(
                Arg::new("total")
                    .long("total")
                    .required(true)
                    .help("Price paid; rate = total / amount"),
            ),
        Table::CreditOut => cmd
            .arg(Arg::new("amount").long("amount").required(true))
            .arg(Arg::new("rate").long("rate").help("Defaults to 1"))
            .arg(Arg::new("profit").long("profit").required(true)),
        Table::Usdt => cmd
            .arg(
                Arg::new("side")
                    .long("side")
                    .required(true)
                    .value_parser(["buy", "sell"]),
            )
            .arg(Arg::new("amount").long("amount").required(true))
            .arg(Arg::new("rate").long("rate").required(true)),
    }
}

fn record_cmd(table: Table, about: &'static str) -> Command {
    Command::new(table.cli_name())
        .about(about)
        .subcommand(add_cmd(table))
        .subcommand(list_cmd())
        .subcommand(Command::new("rm").about("Delete one row").arg(id_arg()))
}

fn table_arg() -> Arg {
    Arg::new("table")
        .required(true)
        .value_parser(Table::ALL.map(|t| t.cli_name()))
}

fn tally_cmd() -> Command {
    let mut set = Command::new("set").about("Set note counts");
    for name in DENOMINATION_ARGS {
        set = set.arg(
            Arg::new(name)
                .long(name)
                .value_parser(value_parser!(i64).range(0..=MAX_NOTE_COUNT)),
        );
    }
    Command::new("tally")
        .about("Cash tally by denomination")
        .subcommand(set)
        .subcommand(
            Command::new("show").arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
}

pub fn build_cli() -> Command {
    let mut import = Command::new("import").about("Bulk load rows from CSV").subcommand(
        Command::new("seed")
            .about("Load <dir>/<table>.csv into every empty table")
            .arg(Arg::new("dir").long("dir").required(true)),
    );
    let mut export = Command::new("export").about("Write a table to CSV or JSON");
    for t in Table::ALL {
        import = import.subcommand(
            Command::new(t.cli_name()).arg(Arg::new("path").long("path").required(true)),
        );
        export = export.subcommand(
            Command::new(t.cli_name())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .value_parser(["csv", "json"]),
                )
                .arg(Arg::new("out").long("out").required(true)),
        );
    }

    Command::new("exledger")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Record book for currency exchange, prepaid credit and stablecoin trades")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("EXLEDGER_DB")
                .help("SQLite file (default: platform data dir)"),
        )
        .subcommand(
            Command::new("init")
                .about("Create the database and load seed CSVs into empty tables")
                .arg(Arg::new("seed_dir").long("seed-dir")),
        )
        .subcommand(record_cmd(Table::Income, "Local-currency income / buys"))
        .subcommand(record_cmd(Table::Expense, "Expenses"))
        .subcommand(record_cmd(Table::CreditIn, "Prepaid credit bought"))
        .subcommand(record_cmd(Table::CreditOut, "Prepaid credit sold"))
        .subcommand(record_cmd(Table::Usdt, "Stablecoin buys and sells"))
        .subcommand(tally_cmd())
        .subcommand(
            Command::new("balance")
                .about("External balances")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("bank").long("bank"))
                        .arg(Arg::new("wallet").long("wallet"))
                        .arg(Arg::new("credit").long("credit"))
                        .arg(Arg::new("usdt").long("usdt")),
                )
                .subcommand(
                    Command::new("show")
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("fetch-price").about("Refresh the stablecoin price quote"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Ordered checklist")
                .subcommand(Command::new("add").arg(Arg::new("text").required(true)))
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
                )
                .subcommand(Command::new("toggle").arg(id_arg()))
                .subcommand(
                    Command::new("move").arg(id_arg()).arg(
                        Arg::new("to")
                            .long("to")
                            .required(true)
                            .value_parser(value_parser!(usize)),
                    ),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("clear-checked")),
        )
        .subcommand(import)
        .subcommand(export)
        .subcommand(
            Command::new("data")
                .about("Data management")
                .subcommand(
                    Command::new("clear")
                        .about("Delete all rows and restart ids at 1")
                        .arg(table_arg()),
                )
                .subcommand(
                    Command::new("reset-seq")
                        .about("Reset or rebase the id counter")
                        .arg(table_arg()),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Display and price preferences")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("summary")
                .about("Totals per table, cash and balances")
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("doctor").about("Check counters, derived fields and checklist"))
}
