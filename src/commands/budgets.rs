// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

use crate::budget::budgets_for_month;
use crate::models::{Budget, DEFAULT_USER_ID};
use crate::repo;
use crate::store::{Store, BUDGETS_KEY};
use crate::utils::{maybe_print_json, new_record_id, parse_decimal, parse_month, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("delete", sub)) => delete(store, sub)?,
        Some(("report", sub)) => report(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Upsert by (category, month). Uniqueness of that pair is this layer's
/// concern; the engine itself tolerates duplicates.
fn set(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().clone();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Budget target must be positive"));
    }
    let rollover = sub.get_flag("rollover");

    let mut budgets: Vec<Budget> = store.load(BUDGETS_KEY);
    match budgets
        .iter_mut()
        .find(|b| b.category == category && b.month_year == month)
    {
        Some(existing) => {
            existing.target_amount = amount;
            existing.allow_rollover = rollover;
        }
        None => budgets.push(Budget {
            id: new_record_id("budget"),
            user_id: DEFAULT_USER_ID.to_string(),
            category: category.clone(),
            target_amount: amount,
            month_year: month.clone(),
            allow_rollover: rollover,
        }),
    }
    store.save(BUDGETS_KEY, &budgets)?;
    println!(
        "Budget set for {} / {} = {}{}",
        month,
        category,
        amount,
        if rollover { " (rollover)" } else { "" }
    );
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut budgets: Vec<Budget> = store.load(BUDGETS_KEY);
    if let Some(month) = sub.get_one::<String>("month") {
        budgets.retain(|b| &b.month_year == month);
    }
    budgets.sort_by(|a, b| {
        b.month_year
            .cmp(&a.month_year)
            .then_with(|| a.category.cmp(&b.category))
    });
    if !maybe_print_json(json_flag, jsonl_flag, &budgets)? {
        let rows: Vec<Vec<String>> = budgets
            .iter()
            .map(|b| {
                vec![
                    b.id.clone(),
                    b.month_year.clone(),
                    b.category.clone(),
                    b.target_amount.to_string(),
                    if b.allow_rollover { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Month", "Category", "Target", "Rollover"], rows)
        );
    }
    Ok(())
}

fn delete(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let mut budgets: Vec<Budget> = store.load(BUDGETS_KEY);
    let before = budgets.len();
    budgets.retain(|b| &b.id != id);
    if budgets.len() == before {
        println!("Budget '{}' not found", id);
        return Ok(());
    }
    store.save(BUDGETS_KEY, &budgets)?;
    println!("Deleted budget {}", id);
    Ok(())
}

fn report(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let transactions = repo::get_all(store);
    let budgets: Vec<Budget> = store.load(BUDGETS_KEY);
    let details = budgets_for_month(&month, &transactions, &budgets);

    if !maybe_print_json(json_flag, jsonl_flag, &details)? {
        let rows: Vec<Vec<String>> = details
            .iter()
            .map(|d| {
                let remaining = d.effective_target_amount - d.spent_amount;
                vec![
                    d.budget.category.clone(),
                    format!("{:.2}", d.budget.target_amount),
                    format!("{:.2}", d.rollover_amount),
                    format!("{:.2}", d.effective_target_amount),
                    format!("{:.2}", d.spent_amount),
                    format!("{:.2}", remaining),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Target", "Rollover", "Effective", "Spent", "Remaining"],
                rows,
            )
        );
    }
    Ok(())
}
