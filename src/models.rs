// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Single-user deployment; every record is stamped with this owner marker.
pub const DEFAULT_USER_ID: &str = "default_ledgerclip_user";

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat:free";
pub const DEFAULT_OCR_MODEL: &str = "qwen/qwen2.5-vl-72b-instruct:free";

pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Groceries",
    "Transport",
    "Utilities",
    "Housing",
    "Entertainment",
    "Health",
    "Shopping",
    "Education",
    "Travel",
    "Other",
];

pub const DEFAULT_INCOME_CATEGORIES: &[&str] = &["Salary", "Bonus", "Investment", "Gift", "Other"];

#[derive(Debug, Clone, Copy)]
pub struct CurrencyDef {
    pub code: &'static str,
    pub symbol: &'static str,
}

pub const AVAILABLE_CURRENCIES: &[CurrencyDef] = &[
    CurrencyDef { code: "USD", symbol: "$" },
    CurrencyDef { code: "EUR", symbol: "€" },
    CurrencyDef { code: "JPY", symbol: "¥" },
    CurrencyDef { code: "GBP", symbol: "£" },
    CurrencyDef { code: "AUD", symbol: "A$" },
    CurrencyDef { code: "CAD", symbol: "C$" },
    CurrencyDef { code: "CNY", symbol: "¥" },
    CurrencyDef { code: "TWD", symbol: "NT$" },
    CurrencyDef { code: "HKD", symbol: "HK$" },
];

pub const DEFAULT_CURRENCY_CODE: &str = "USD";

pub fn currency_symbol(code: &str) -> &'static str {
    AVAILABLE_CURRENCIES
        .iter()
        .find(|c| c.code == code)
        .map(|c| c.symbol)
        .unwrap_or("$")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "INCOME")]
    Income,
    #[serde(rename = "EXPENSE")]
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Transaction fields as supplied by callers; id and owner are stamped by the
/// repository on add.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub category: String,
    pub target_amount: Decimal,
    /// Calendar month key, YYYY-MM.
    pub month_year: String,
    #[serde(default)]
    pub allow_rollover: bool,
}

/// Budget plus computed amounts for one month. Derived on every query and
/// never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithDetails {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent_amount: Decimal,
    pub rollover_amount: Decimal,
    pub effective_target_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurringFrequency {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "yearly")]
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            RecurringFrequency::Daily => "daily",
            RecurringFrequency::Weekly => "weekly",
            RecurringFrequency::Monthly => "monthly",
            RecurringFrequency::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(RecurringFrequency::Daily),
            "weekly" => Some(RecurringFrequency::Weekly),
            "monthly" => Some(RecurringFrequency::Monthly),
            "yearly" => Some(RecurringFrequency::Yearly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: String,
    pub frequency: RecurringFrequency,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub next_due_date: NaiveDate,
    #[serde(default)]
    pub last_generated_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Recurring template fields as supplied by callers; id, owner, activation
/// and the initial due date are stamped on add.
#[derive(Debug, Clone)]
pub struct NewRecurringTransaction {
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: String,
    pub frequency: RecurringFrequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_ocr_model_name() -> String {
    DEFAULT_OCR_MODEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub api_key: String,
    pub model_name: String,
    #[serde(default = "default_ocr_model_name")]
    pub ocr_model_name: String,
    /// "en" or "zh-TW".
    pub language: String,
    pub dark_mode: bool,
    pub selected_currency: String,
    pub custom_income_categories: Vec<String>,
    pub custom_expense_categories: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            api_key: String::new(),
            model_name: DEFAULT_MODEL.to_string(),
            ocr_model_name: DEFAULT_OCR_MODEL.to_string(),
            language: "en".to_string(),
            dark_mode: false,
            selected_currency: DEFAULT_CURRENCY_CODE.to_string(),
            custom_income_categories: Vec::new(),
            custom_expense_categories: Vec::new(),
        }
    }
}
