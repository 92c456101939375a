// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

use crate::models::{NewRecurringTransaction, RecurringFrequency};
use crate::recurring;
use crate::store::{Store, LAST_RECURRING_RUN_KEY};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_type, pretty_table};

const MIN_RUN_INTERVAL_MS: i64 = 12 * 60 * 60 * 1000;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("toggle", sub)) => toggle(store, sub)?,
        Some(("delete", sub)) => delete(store, sub)?,
        Some(("process", sub)) => process(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let description = sub.get_one::<String>("description").unwrap().clone();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Amount must be positive"));
    }
    let r#type = parse_type(sub.get_one::<String>("type").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().clone();
    let frequency_raw = sub.get_one::<String>("frequency").unwrap();
    let frequency = RecurringFrequency::parse(frequency_raw).ok_or_else(|| {
        anyhow!(
            "Invalid frequency '{}', expected daily, weekly, monthly, or yearly",
            frequency_raw
        )
    })?;
    let start_date = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end_date = sub
        .get_one::<String>("end")
        .map(|s| parse_date(s))
        .transpose()?;
    if let Some(end) = end_date {
        if end < start_date {
            return Err(anyhow!("End date must not precede the start date"));
        }
    }
    let tags: Vec<String> = sub
        .get_many::<String>("tag")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    let rtx = recurring::add(
        store,
        NewRecurringTransaction {
            description,
            amount,
            r#type,
            category,
            frequency,
            start_date,
            end_date,
            tags,
        },
    )?;
    println!(
        "Recurring '{}' added: {} {} {}, first due {}",
        rtx.description,
        rtx.frequency.as_str(),
        rtx.r#type.as_str(),
        rtx.amount,
        rtx.next_due_date
    );
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let templates = recurring::get_all(store);
    if !maybe_print_json(json_flag, jsonl_flag, &templates)? {
        let rows: Vec<Vec<String>> = templates
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.r#type.as_str().to_string(),
                    t.category.clone(),
                    t.frequency.as_str().to_string(),
                    t.next_due_date.to_string(),
                    t.end_date.map(|d| d.to_string()).unwrap_or_default(),
                    if t.is_active { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID",
                    "Description",
                    "Amount",
                    "Type",
                    "Category",
                    "Frequency",
                    "Next due",
                    "End",
                    "Active",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn toggle(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    match recurring::toggle(store, id)? {
        Some(true) => println!("Recurring {} is now active", id),
        Some(false) => println!("Recurring {} is now inactive", id),
        None => println!("Recurring transaction '{}' not found", id),
    }
    Ok(())
}

fn delete(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    if recurring::delete(store, id)? {
        println!("Deleted recurring transaction {}", id);
    } else {
        println!("Recurring transaction '{}' not found", id);
    }
    Ok(())
}

/// Session gate around the engine: at most one run per 12 hours unless
/// forced. The engine itself is unaware of gating.
fn process(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let today = match sub.get_one::<String>("today") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let force = sub.get_flag("force");
    let now_ms = chrono::Utc::now().timestamp_millis();

    if !force {
        if let Some(last_ms) = store.load_value::<i64>(LAST_RECURRING_RUN_KEY) {
            if now_ms - last_ms < MIN_RUN_INTERVAL_MS {
                println!("Recurring transactions were processed recently; use --force to run anyway");
                return Ok(());
            }
        }
    }

    let outcome = recurring::process_due(store, today)?;
    store.save_value(LAST_RECURRING_RUN_KEY, &now_ms)?;

    println!("Generated {} transaction(s)", outcome.created_count);
    for err in &outcome.errors {
        eprintln!("error: {}", err);
    }
    Ok(())
}
