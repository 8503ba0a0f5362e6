// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use exledger::{cli, commands, db, models::Table};

fn init_logging() {
    let filter = EnvFilter::try_from_env("EXLEDGER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = match matches.get_one::<String>("db") {
        Some(p) => PathBuf::from(p),
        None => db::db_path()?,
    };
    let mut conn = db::open_or_init(&path)?;

    match matches.subcommand() {
        Some(("init", sub)) => {
            println!("Database initialized at {}", path.display());
            if let Some(dir) = sub.get_one::<String>("seed_dir") {
                let reports = commands::importer::seed_dir(&mut conn, Path::new(dir))?;
                for (table, r) in reports {
                    println!(
                        "Seeded {}: {} rows ({} skipped)",
                        table.cli_name(),
                        r.imported,
                        r.skipped
                    );
                }
            }
        }
        Some((name @ ("income" | "expense" | "credit-in" | "credit-out" | "usdt"), sub)) => {
            let table: Table = name.parse()?;
            commands::records::handle(&conn, table, sub)?
        }
        Some(("tally", sub)) => commands::tally::handle(&conn, sub)?,
        Some(("balance", sub)) => commands::balances::handle(&conn, sub)?,
        Some(("check", sub)) => commands::checklist::handle(&mut conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("data", sub)) => commands::data::handle(&mut conn, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
