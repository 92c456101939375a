// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::NewTransaction;
use crate::repo;
use crate::store::Store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_type, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("delete", sub)) => delete(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().clone();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Amount must be positive"));
    }
    let r#type = parse_type(sub.get_one::<String>("type").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().clone();
    let tags: Vec<String> = sub
        .get_many::<String>("tag")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    let tx = repo::add(
        store,
        NewTransaction {
            description,
            amount,
            r#type,
            category,
            date,
            tags,
        },
    )?;
    println!(
        "Recorded {} {} on {} '{}' ({})",
        tx.r#type.as_str(),
        tx.amount,
        tx.date,
        tx.description,
        tx.category
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub r#type: String,
    pub category: String,
    pub tags: String,
}

pub fn query_rows(store: &Store, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut transactions = repo::get_all(store);

    if let Some(month) = sub.get_one::<String>("month") {
        transactions.retain(|t| t.date.to_string().starts_with(month.as_str()));
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        transactions.retain(|t| &t.category == cat);
    }
    if let Some(ty) = sub.get_one::<String>("type") {
        let ty = parse_type(ty)?;
        transactions.retain(|t| t.r#type == ty);
    }
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        transactions.truncate(*limit);
    }

    Ok(transactions
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            description: t.description,
            amount: t.amount.to_string(),
            r#type: t.r#type.as_str().to_string(),
            category: t.category,
            tags: t.tags.join(";"),
        })
        .collect())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.tags.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Amount", "Type", "Category", "Tags"],
                rows,
            )
        );
    }
    Ok(())
}

fn delete(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    if repo::delete(store, id)? {
        println!("Deleted transaction {}", id);
    } else {
        println!("Transaction '{}' not found", id);
    }
    Ok(())
}
