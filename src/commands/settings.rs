// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};

use crate::models::AVAILABLE_CURRENCIES;
use crate::store::Store;
use crate::utils::pretty_table;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("show", _)) => show(store)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let mut settings = store.settings();
    let mut changed = false;

    if let Some(key) = sub.get_one::<String>("api-key") {
        settings.api_key = key.clone();
        changed = true;
    }
    if let Some(model) = sub.get_one::<String>("model") {
        settings.model_name = model.clone();
        changed = true;
    }
    if let Some(model) = sub.get_one::<String>("ocr-model") {
        settings.ocr_model_name = model.clone();
        changed = true;
    }
    if let Some(ccy) = sub.get_one::<String>("currency") {
        let code = ccy.to_uppercase();
        if !AVAILABLE_CURRENCIES.iter().any(|c| c.code == code) {
            return Err(anyhow!("Unsupported currency '{}'", ccy));
        }
        settings.selected_currency = code;
        changed = true;
    }
    if let Some(lang) = sub.get_one::<String>("language") {
        if lang != "en" && lang != "zh-TW" {
            return Err(anyhow!("Unsupported language '{}', expected en or zh-TW", lang));
        }
        settings.language = lang.clone();
        changed = true;
    }
    if let Some(dark) = sub.get_one::<String>("dark-mode") {
        settings.dark_mode = match dark.to_lowercase().as_str() {
            "true" | "on" | "yes" => true,
            "false" | "off" | "no" => false,
            _ => return Err(anyhow!("Invalid dark-mode value '{}'", dark)),
        };
        changed = true;
    }

    if !changed {
        println!("Nothing to change; see 'settings set --help'");
        return Ok(());
    }
    store.save_settings(&settings)?;
    println!("Settings updated");
    Ok(())
}

fn show(store: &Store) -> Result<()> {
    let settings = store.settings();
    let api_key = if settings.api_key.trim().is_empty() {
        "(not set)".to_string()
    } else {
        "(set)".to_string()
    };
    let rows = vec![
        vec!["API key".to_string(), api_key],
        vec!["Model".to_string(), settings.model_name.clone()],
        vec!["OCR model".to_string(), settings.ocr_model_name.clone()],
        vec!["Language".to_string(), settings.language.clone()],
        vec!["Dark mode".to_string(), settings.dark_mode.to_string()],
        vec!["Currency".to_string(), settings.selected_currency.clone()],
        vec![
            "Custom income categories".to_string(),
            settings.custom_income_categories.join(", "),
        ],
        vec![
            "Custom expense categories".to_string(),
            settings.custom_expense_categories.join(", "),
        ],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
