// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};

use crate::models::{DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_CATEGORIES};
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("remove", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "income" => Ok(true),
        "expense" => Ok(false),
        _ => Err(anyhow!("Invalid kind '{}', expected income or expense", s)),
    }
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let income = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        return Err(anyhow!("Category name must not be empty"));
    }

    let mut settings = store.settings();
    let (custom, defaults) = if income {
        (
            &mut settings.custom_income_categories,
            DEFAULT_INCOME_CATEGORIES,
        )
    } else {
        (
            &mut settings.custom_expense_categories,
            DEFAULT_EXPENSE_CATEGORIES,
        )
    };
    if defaults.contains(&name.as_str()) || custom.contains(&name) {
        println!("Category '{}' already exists", name);
        return Ok(());
    }
    custom.push(name.clone());
    store.save_settings(&settings)?;
    println!("Added custom category '{}'", name);
    Ok(())
}

fn remove(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let income = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let name = sub.get_one::<String>("name").unwrap();

    let mut settings = store.settings();
    let custom = if income {
        &mut settings.custom_income_categories
    } else {
        &mut settings.custom_expense_categories
    };
    let before = custom.len();
    custom.retain(|c| c != name);
    if custom.len() == before {
        println!("Custom category '{}' not found", name);
        return Ok(());
    }
    store.save_settings(&settings)?;
    println!("Removed custom category '{}'", name);
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let kind_filter = sub
        .get_one::<String>("kind")
        .map(|s| parse_kind(s))
        .transpose()?;
    let settings = store.settings();

    let mut data: Vec<Vec<String>> = Vec::new();
    if kind_filter != Some(false) {
        for c in DEFAULT_INCOME_CATEGORIES {
            data.push(vec!["income".into(), (*c).into(), "default".into()]);
        }
        for c in &settings.custom_income_categories {
            data.push(vec!["income".into(), c.clone(), "custom".into()]);
        }
    }
    if kind_filter != Some(true) {
        for c in DEFAULT_EXPENSE_CATEGORIES {
            data.push(vec!["expense".into(), (*c).into(), "default".into()]);
        }
        for c in &settings.custom_expense_categories {
            data.push(vec!["expense".into(), c.clone(), "custom".into()]);
        }
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Kind", "Category", "Source"], data));
    }
    Ok(())
}
