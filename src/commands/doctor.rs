// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::Value;

use crate::backup::{
    validate_budget, validate_recurring_transaction, validate_settings, validate_transaction,
    BACKUP_VERSION,
};
use crate::store::{Store, BUDGETS_KEY, RECURRING_KEY, SETTINGS_KEY, TRANSACTIONS_KEY};
use crate::utils::pretty_table;

/// Run the import validators against the live store and report anything a
/// backup of the current data would be rejected for.
pub fn handle(store: &Store) -> Result<()> {
    let mut rows: Vec<Vec<String>> = Vec::new();

    let transactions: Vec<Value> = store.load(TRANSACTIONS_KEY);
    for (i, item) in transactions.iter().enumerate() {
        for v in validate_transaction(&format!("transactions[{}]", i), item) {
            rows.push(vec![v.path, v.message]);
        }
    }

    let budgets: Vec<Value> = store.load(BUDGETS_KEY);
    for (i, item) in budgets.iter().enumerate() {
        for v in validate_budget(&format!("budgets[{}]", i), item) {
            rows.push(vec![v.path, v.message]);
        }
    }

    let recurring: Vec<Value> = store.load(RECURRING_KEY);
    for (i, item) in recurring.iter().enumerate() {
        for v in validate_recurring_transaction(&format!("recurringTransactions[{}]", i), item) {
            rows.push(vec![v.path, v.message]);
        }
    }

    if let Some(settings) = store.load_value::<Value>(SETTINGS_KEY) {
        for v in validate_settings(BACKUP_VERSION, &settings) {
            rows.push(vec![v.path, v.message]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Field", "Issue"], rows));
    }
    Ok(())
}
