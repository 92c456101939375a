// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Days;
use rust_decimal::Decimal;

use crate::ai::{self, AiError};
use crate::models::TransactionType;
use crate::repo;
use crate::store::Store;

pub fn handle(store: &Store) -> Result<()> {
    let transactions = repo::get_all(store);
    let mut balance = Decimal::ZERO;
    for t in &transactions {
        match t.r#type {
            TransactionType::Income => balance += t.amount,
            TransactionType::Expense => balance -= t.amount,
        }
    }
    let today = chrono::Utc::now().date_naive();
    let cutoff = today.checked_sub_days(Days::new(30)).unwrap_or(today);
    let recent_count = transactions.iter().filter(|t| t.date >= cutoff).count();

    let settings = store.settings();
    match ai::financial_tip(&settings, balance, recent_count) {
        Ok(tip) => println!("{}", tip),
        Err(AiError::MissingApiKey) => {
            println!("API key is not set; run 'settings set --api-key <KEY>' first")
        }
        Err(e) => {
            eprintln!("Could not fetch a tip: {}", e);
            if let Some(raw) = e.raw_response() {
                eprintln!("raw response: {}", raw);
            }
        }
    }
    Ok(())
}
