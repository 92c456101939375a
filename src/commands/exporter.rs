// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::backup::{export_document, transactions_to_csv};
use crate::repo;
use crate::store::Store;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        Some(("backup", sub)) => export_backup(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    let transactions = repo::get_all(store);
    let csv = transactions_to_csv(&transactions)?;
    std::fs::write(out, csv).with_context(|| format!("Write {}", out))?;
    println!("Exported {} transaction(s) to {}", transactions.len(), out);
    Ok(())
}

fn export_backup(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    let doc = export_document(store);
    std::fs::write(out, serde_json::to_string_pretty(&doc)?)
        .with_context(|| format!("Write {}", out))?;
    println!("Exported backup (version {}) to {}", doc.version, out);
    Ok(())
}
