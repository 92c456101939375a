// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    AppSettings, Budget, RecurringTransaction, Transaction, AVAILABLE_CURRENCIES,
    DEFAULT_USER_ID,
};
use crate::store::{Store, BUDGETS_KEY, RECURRING_KEY, TRANSACTIONS_KEY};
use crate::utils::new_record_id;

/// Version written by exports. Imports also accept the two prior layouts;
/// `recurringTransactions` is only meaningful at the latest one.
pub const BACKUP_VERSION: &str = "1.0.2";
pub const ACCEPTED_VERSIONS: &[&str] = &["1.0.0", "1.0.1", "1.0.2"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    pub settings: AppSettings,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_transactions: Option<Vec<RecurringTransaction>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("backup document is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("backup document failed validation ({} violation(s))", .0.len())]
    Invalid(Vec<Violation>),
}

static MONTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("month pattern"));

fn violation(path: &str, message: impl Into<String>) -> Violation {
    Violation {
        path: path.to_string(),
        message: message.into(),
    }
}

fn is_date_string(v: &Value) -> bool {
    v.as_str()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
        .unwrap_or(false)
}

fn is_string_array(v: &Value) -> bool {
    v.as_array()
        .map(|a| a.iter().all(Value::is_string))
        .unwrap_or(false)
}

fn check_optional_string(out: &mut Vec<Violation>, path: &str, item: &Value, field: &str) {
    if let Some(v) = item.get(field) {
        if !v.is_string() {
            out.push(violation(&format!("{}.{}", path, field), "must be a string"));
        }
    }
}

fn check_optional_tags(out: &mut Vec<Violation>, path: &str, item: &Value) {
    if let Some(tags) = item.get("tags") {
        if !is_string_array(tags) {
            out.push(violation(
                &format!("{}.tags", path),
                "must be an array of strings",
            ));
        }
    }
}

fn check_type_field(out: &mut Vec<Violation>, path: &str, item: &Value) {
    match item.get("type").and_then(Value::as_str) {
        Some("INCOME") | Some("EXPENSE") => {}
        _ => out.push(violation(
            &format!("{}.type", path),
            "must be INCOME or EXPENSE",
        )),
    }
}

pub fn validate_transaction(path: &str, item: &Value) -> Vec<Violation> {
    let mut out = Vec::new();
    if !item.is_object() {
        return vec![violation(path, "must be an object")];
    }
    check_optional_string(&mut out, path, item, "id");
    check_optional_string(&mut out, path, item, "userId");
    match item.get("description").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        _ => out.push(violation(
            &format!("{}.description", path),
            "must be a non-empty string",
        )),
    }
    match item.get("amount").and_then(Value::as_f64) {
        Some(n) if n >= 0.0 => {}
        _ => out.push(violation(
            &format!("{}.amount", path),
            "must be a non-negative number",
        )),
    }
    check_type_field(&mut out, path, item);
    match item.get("category").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        _ => out.push(violation(
            &format!("{}.category", path),
            "must be a non-empty string",
        )),
    }
    if !item.get("date").map(is_date_string).unwrap_or(false) {
        out.push(violation(
            &format!("{}.date", path),
            "must be a YYYY-MM-DD date",
        ));
    }
    check_optional_tags(&mut out, path, item);
    out
}

pub fn validate_budget(path: &str, item: &Value) -> Vec<Violation> {
    let mut out = Vec::new();
    if !item.is_object() {
        return vec![violation(path, "must be an object")];
    }
    check_optional_string(&mut out, path, item, "id");
    check_optional_string(&mut out, path, item, "userId");
    match item.get("category").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        _ => out.push(violation(
            &format!("{}.category", path),
            "must be a non-empty string",
        )),
    }
    match item.get("targetAmount").and_then(Value::as_f64) {
        Some(n) if n > 0.0 => {}
        _ => out.push(violation(
            &format!("{}.targetAmount", path),
            "must be a positive number",
        )),
    }
    match item.get("monthYear").and_then(Value::as_str) {
        Some(s) if MONTH_RE.is_match(s) => {}
        _ => out.push(violation(
            &format!("{}.monthYear", path),
            "must match YYYY-MM",
        )),
    }
    if let Some(v) = item.get("allowRollover") {
        if !v.is_boolean() {
            out.push(violation(
                &format!("{}.allowRollover", path),
                "must be a boolean",
            ));
        }
    }
    out
}

pub fn validate_recurring_transaction(path: &str, item: &Value) -> Vec<Violation> {
    let mut out = Vec::new();
    if !item.is_object() {
        return vec![violation(path, "must be an object")];
    }
    check_optional_string(&mut out, path, item, "id");
    check_optional_string(&mut out, path, item, "userId");
    if !item.get("description").map(Value::is_string).unwrap_or(false) {
        out.push(violation(
            &format!("{}.description", path),
            "must be a string",
        ));
    }
    match item.get("amount").and_then(Value::as_f64) {
        Some(n) if n > 0.0 => {}
        _ => out.push(violation(
            &format!("{}.amount", path),
            "must be a positive number",
        )),
    }
    check_type_field(&mut out, path, item);
    if !item.get("category").map(Value::is_string).unwrap_or(false) {
        out.push(violation(
            &format!("{}.category", path),
            "must be a string",
        ));
    }
    match item.get("frequency").and_then(Value::as_str) {
        Some("daily") | Some("weekly") | Some("monthly") | Some("yearly") => {}
        _ => out.push(violation(
            &format!("{}.frequency", path),
            "must be daily, weekly, monthly, or yearly",
        )),
    }
    if !item.get("startDate").map(is_date_string).unwrap_or(false) {
        out.push(violation(
            &format!("{}.startDate", path),
            "must be a YYYY-MM-DD date",
        ));
    }
    if let Some(end) = item.get("endDate") {
        if !end.is_null() && !is_date_string(end) {
            out.push(violation(
                &format!("{}.endDate", path),
                "must be null or a YYYY-MM-DD date",
            ));
        }
    }
    if !item.get("nextDueDate").map(is_date_string).unwrap_or(false) {
        out.push(violation(
            &format!("{}.nextDueDate", path),
            "must be a YYYY-MM-DD date",
        ));
    }
    if let Some(last) = item.get("lastGeneratedDate") {
        if !last.is_null() && !is_date_string(last) {
            out.push(violation(
                &format!("{}.lastGeneratedDate", path),
                "must be null or a YYYY-MM-DD date",
            ));
        }
    }
    if let Some(v) = item.get("isActive") {
        if !v.is_boolean() {
            out.push(violation(
                &format!("{}.isActive", path),
                "must be a boolean",
            ));
        }
    }
    check_optional_tags(&mut out, path, item);
    out
}

pub fn validate_settings(version: &str, settings: &Value) -> Vec<Violation> {
    let mut out = Vec::new();
    if !settings.is_object() {
        return vec![violation("settings", "must be an object")];
    }
    if !settings.get("apiKey").map(Value::is_string).unwrap_or(false) {
        out.push(violation("settings.apiKey", "must be a string"));
    }
    if !settings.get("modelName").map(Value::is_string).unwrap_or(false) {
        out.push(violation("settings.modelName", "must be a string"));
    }
    if version != "1.0.0" {
        if let Some(v) = settings.get("ocrModelName") {
            if !v.is_string() {
                out.push(violation("settings.ocrModelName", "must be a string"));
            }
        }
    }
    match settings.get("language").and_then(Value::as_str) {
        Some("en") | Some("zh-TW") => {}
        _ => out.push(violation("settings.language", "must be en or zh-TW")),
    }
    if !settings.get("darkMode").map(Value::is_boolean).unwrap_or(false) {
        out.push(violation("settings.darkMode", "must be a boolean"));
    }
    match settings.get("selectedCurrency").and_then(Value::as_str) {
        Some(code) if AVAILABLE_CURRENCIES.iter().any(|c| c.code == code) => {}
        _ => out.push(violation(
            "settings.selectedCurrency",
            "must be a supported currency code",
        )),
    }
    for field in ["customIncomeCategories", "customExpenseCategories"] {
        if !settings.get(field).map(is_string_array).unwrap_or(false) {
            out.push(violation(
                &format!("settings.{}", field),
                "must be an array of strings",
            ));
        }
    }
    out
}

/// Field-by-field validation of a whole backup document. Any violation
/// anywhere rejects the document; nothing is applied partially.
pub fn validate_document(doc: &Value) -> Vec<Violation> {
    if !doc.is_object() {
        return vec![violation("$", "backup document must be an object")];
    }

    let mut out = Vec::new();
    let version = match doc.get("version").and_then(Value::as_str) {
        Some(v) if ACCEPTED_VERSIONS.contains(&v) => v,
        _ => {
            out.push(violation(
                "version",
                format!("must be one of {}", ACCEPTED_VERSIONS.join(", ")),
            ));
            return out;
        }
    };

    match doc.get("settings") {
        Some(settings) => out.extend(validate_settings(version, settings)),
        None => out.push(violation("settings", "is required")),
    }

    match doc.get("transactions").and_then(Value::as_array) {
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                out.extend(validate_transaction(&format!("transactions[{}]", i), item));
            }
        }
        None => out.push(violation("transactions", "must be an array")),
    }

    match doc.get("budgets").and_then(Value::as_array) {
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                out.extend(validate_budget(&format!("budgets[{}]", i), item));
            }
        }
        None => out.push(violation("budgets", "must be an array")),
    }

    if version == BACKUP_VERSION {
        if let Some(recurring) = doc.get("recurringTransactions") {
            match recurring.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        out.extend(validate_recurring_transaction(
                            &format!("recurringTransactions[{}]", i),
                            item,
                        ));
                    }
                }
                None => out.push(violation("recurringTransactions", "must be an array")),
            }
        }
    }

    out
}

/// Parse and validate a raw backup document; all-or-nothing.
pub fn parse_document(raw: &str) -> Result<BackupDocument, ImportError> {
    let value: Value = serde_json::from_str(raw)?;
    let violations = validate_document(&value);
    if !violations.is_empty() {
        return Err(ImportError::Invalid(violations));
    }
    Ok(serde_json::from_value(value)?)
}

pub fn export_document(store: &Store) -> BackupDocument {
    BackupDocument {
        version: BACKUP_VERSION.to_string(),
        settings: store.settings(),
        transactions: store.load(TRANSACTIONS_KEY),
        budgets: store.load(BUDGETS_KEY),
        recurring_transactions: Some(store.load(RECURRING_KEY)),
    }
}

/// Replace every collection with the document's contents. Records missing
/// ids get fresh ones; the owner marker is re-stamped throughout. Importing
/// a pre-1.0.2 document clears the recurring collection rather than leaving
/// stale templates behind.
pub fn apply_document(store: &Store, doc: BackupDocument) -> Result<()> {
    store.save_settings(&doc.settings)?;

    let transactions: Vec<Transaction> = doc
        .transactions
        .into_iter()
        .map(|mut t| {
            if t.id.is_empty() {
                t.id = new_record_id("txn");
            }
            t.user_id = DEFAULT_USER_ID.to_string();
            t
        })
        .collect();
    store.save(TRANSACTIONS_KEY, &transactions)?;

    let budgets: Vec<Budget> = doc
        .budgets
        .into_iter()
        .map(|mut b| {
            if b.id.is_empty() {
                b.id = new_record_id("budget");
            }
            b.user_id = DEFAULT_USER_ID.to_string();
            b
        })
        .collect();
    store.save(BUDGETS_KEY, &budgets)?;

    let recurring: Vec<RecurringTransaction> = if doc.version == BACKUP_VERSION {
        doc.recurring_transactions
            .unwrap_or_default()
            .into_iter()
            .map(|mut r| {
                if r.id.is_empty() {
                    r.id = new_record_id("rectxn");
                }
                r.user_id = DEFAULT_USER_ID.to_string();
                r
            })
            .collect()
    } else {
        Vec::new()
    };
    store.save(RECURRING_KEY, &recurring)?;

    Ok(())
}

/// Fixed-column CSV of every transaction, RFC 4180 quoting, tags joined
/// with `;` inside the single Tags field.
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["ID", "Date", "Description", "Amount", "Type", "Category", "Tags"])?;
    for t in transactions {
        let date = t.date.to_string();
        let amount = t.amount.to_string();
        let tags = t.tags.join(";");
        wtr.write_record([
            t.id.as_str(),
            date.as_str(),
            t.description.as_str(),
            amount.as_str(),
            t.r#type.as_str(),
            t.category.as_str(),
            tags.as_str(),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Flush CSV writer: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}
