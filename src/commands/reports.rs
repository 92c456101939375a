// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::TransactionType;
use crate::repo;
use crate::store::Store;
use crate::utils::{maybe_print_json, month_key, parse_month, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(store, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(store, sub)?,
        Some(("summary", sub)) => summary(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn cashflow(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);

    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in repo::get_all(store) {
        let entry = map
            .entry(month_key(t.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.r#type {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
        }
    }

    let mut data = Vec::new();
    for (m, (inc, exp)) in map.iter().rev().take(months) {
        data.push(vec![m.clone(), format!("{:.2}", inc), format!("{:.2}", exp)]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Month", "Income", "Expense"], data));
    }
    Ok(())
}

fn spend_by_category(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for t in repo::get_all(store) {
        if t.r#type == TransactionType::Expense && t.date.to_string().starts_with(&month) {
            *agg.entry(t.category).or_insert(Decimal::ZERO) += t.amount;
        }
    }
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));

    let data: Vec<Vec<String>> = items
        .into_iter()
        .map(|(cat, amt)| vec![cat, format!("{:.2}", amt)])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}

#[derive(Serialize)]
struct MonthSummary {
    month: String,
    income: Decimal,
    expense: Decimal,
    net: Decimal,
}

fn summary(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for t in repo::get_all(store) {
        if !t.date.to_string().starts_with(&month) {
            continue;
        }
        match t.r#type {
            TransactionType::Income => income += t.amount,
            TransactionType::Expense => expense += t.amount,
        }
    }
    let out = MonthSummary {
        month: month.clone(),
        income,
        expense,
        net: income - expense,
    };
    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        let rows = vec![vec![
            out.month,
            format!("{:.2}", out.income),
            format!("{:.2}", out.expense),
            format!("{:.2}", out.net),
        ]];
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}
