// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::warn;

use crate::models::{NewTransaction, Transaction, DEFAULT_USER_ID};
use crate::store::{Store, TRANSACTIONS_KEY};
use crate::utils::new_record_id;

/// Every stored transaction, in storage order. Callers sort as needed.
pub fn get_all(store: &Store) -> Vec<Transaction> {
    store.load(TRANSACTIONS_KEY)
}

/// Stamp an id and the owner marker, append, persist the full collection.
pub fn add(store: &Store, data: NewTransaction) -> Result<Transaction> {
    let mut transactions = get_all(store);
    let tx = Transaction {
        id: new_record_id("txn"),
        user_id: DEFAULT_USER_ID.to_string(),
        description: data.description,
        amount: data.amount,
        r#type: data.r#type,
        category: data.category,
        date: data.date,
        tags: data.tags,
    };
    transactions.push(tx.clone());
    store.save(TRANSACTIONS_KEY, &transactions)?;
    Ok(tx)
}

/// Remove by id. Missing ids are logged and ignored; returns whether a
/// record was removed.
pub fn delete(store: &Store, id: &str) -> Result<bool> {
    let mut transactions = get_all(store);
    let before = transactions.len();
    transactions.retain(|t| t.id != id);
    if transactions.len() == before {
        warn!("transaction '{}' not found for deletion", id);
        return Ok(false);
    }
    store.save(TRANSACTIONS_KEY, &transactions)?;
    Ok(true)
}
