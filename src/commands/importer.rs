// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Context, Result};

use crate::backup::{apply_document, parse_document, ImportError};
use crate::store::Store;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("backup", sub)) => import_backup(store, sub),
        _ => Ok(()),
    }
}

/// All-or-nothing: nothing is written unless the whole document validates.
fn import_backup(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap();
    let raw = std::fs::read_to_string(path).with_context(|| format!("Read {}", path))?;

    let doc = match parse_document(&raw) {
        Ok(doc) => doc,
        Err(ImportError::Invalid(violations)) => {
            eprintln!("Import rejected; the backup document is invalid:");
            for v in &violations {
                eprintln!("  - {}", v);
            }
            return Err(anyhow!("{} validation error(s)", violations.len()));
        }
        Err(e) => return Err(e.into()),
    };

    let tx_count = doc.transactions.len();
    let budget_count = doc.budgets.len();
    let recurring_count = doc
        .recurring_transactions
        .as_ref()
        .map(|r| r.len())
        .unwrap_or(0);

    apply_document(store, doc)?;
    println!(
        "Imported {} transaction(s), {} budget(s), {} recurring template(s)",
        tx_count, budget_count, recurring_count
    );
    Ok(())
}
