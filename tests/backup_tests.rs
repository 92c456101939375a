// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::json;
use tempfile::tempdir;

use ledgerclip::backup::{
    apply_document, export_document, parse_document, transactions_to_csv, ImportError,
};
use ledgerclip::models::{NewTransaction, TransactionType, DEFAULT_USER_ID};
use ledgerclip::repo;
use ledgerclip::store::{Store, RECURRING_KEY};

fn sample_settings() -> serde_json::Value {
    json!({
        "apiKey": "",
        "modelName": "deepseek/deepseek-chat:free",
        "ocrModelName": "qwen/qwen2.5-vl-72b-instruct:free",
        "language": "en",
        "darkMode": false,
        "selectedCurrency": "USD",
        "customIncomeCategories": [],
        "customExpenseCategories": ["Pets"]
    })
}

fn sample_transaction() -> serde_json::Value {
    json!({
        "id": "txn_1",
        "userId": "someone_else",
        "description": "Coffee",
        "amount": 4.5,
        "type": "EXPENSE",
        "category": "Food",
        "date": "2025-08-01",
        "tags": ["morning"]
    })
}

#[test]
fn well_formed_document_imports() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let raw = json!({
        "version": "1.0.2",
        "settings": sample_settings(),
        "transactions": [sample_transaction()],
        "budgets": [{
            "description": "ignored",
            "category": "Food",
            "targetAmount": 200,
            "monthYear": "2025-08",
            "allowRollover": true
        }],
        "recurringTransactions": [{
            "description": "Rent",
            "amount": 1200,
            "type": "EXPENSE",
            "category": "Housing",
            "frequency": "monthly",
            "startDate": "2025-01-01",
            "nextDueDate": "2025-09-01",
            "lastGeneratedDate": "2025-08-01",
            "isActive": true
        }]
    })
    .to_string();

    let doc = parse_document(&raw).unwrap();
    apply_document(&store, doc).unwrap();

    let txs = repo::get_all(&store);
    assert_eq!(txs.len(), 1);
    // Owner marker is re-stamped on import.
    assert_eq!(txs[0].user_id, DEFAULT_USER_ID);
    assert_eq!(txs[0].amount, "4.5".parse().unwrap());

    let settings = store.settings();
    assert_eq!(settings.custom_expense_categories, vec!["Pets".to_string()]);

    let recurring: Vec<ledgerclip::models::RecurringTransaction> = store.load(RECURRING_KEY);
    assert_eq!(recurring.len(), 1);
    // Missing ids are minted during apply.
    assert!(!recurring[0].id.is_empty());
}

#[test]
fn one_bad_record_rejects_the_whole_document() {
    let bad_budget = json!({
        "category": "Food",
        "targetAmount": -5,
        "monthYear": "2025-08"
    });
    let raw = json!({
        "version": "1.0.2",
        "settings": sample_settings(),
        "transactions": [sample_transaction()],
        "budgets": [bad_budget]
    })
    .to_string();

    match parse_document(&raw) {
        Err(ImportError::Invalid(violations)) => {
            assert!(violations
                .iter()
                .any(|v| v.path == "budgets[0].targetAmount"));
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn unknown_version_is_rejected() {
    let raw = json!({
        "version": "2.0.0",
        "settings": sample_settings(),
        "transactions": [],
        "budgets": []
    })
    .to_string();
    assert!(matches!(
        parse_document(&raw),
        Err(ImportError::Invalid(_))
    ));
}

#[test]
fn old_version_import_clears_recurring() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    // Seed a recurring template, then import a 1.0.0 document.
    store
        .save(
            RECURRING_KEY,
            &[json!({
                "id": "rectxn_1",
                "userId": DEFAULT_USER_ID,
                "description": "Rent",
                "amount": 1200,
                "type": "EXPENSE",
                "category": "Housing",
                "frequency": "monthly",
                "startDate": "2025-01-01",
                "nextDueDate": "2025-09-01",
                "isActive": true
            })],
        )
        .unwrap();

    let raw = json!({
        "version": "1.0.0",
        "settings": {
            "apiKey": "k",
            "modelName": "m",
            "language": "en",
            "darkMode": true,
            "selectedCurrency": "TWD",
            "customIncomeCategories": [],
            "customExpenseCategories": []
        },
        "transactions": [],
        "budgets": []
    })
    .to_string();

    let doc = parse_document(&raw).unwrap();
    apply_document(&store, doc).unwrap();

    let recurring: Vec<serde_json::Value> = store.load(RECURRING_KEY);
    assert!(recurring.is_empty());
    assert_eq!(store.settings().selected_currency, "TWD");
}

#[test]
fn export_then_import_round_trips() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    repo::add(
        &store,
        NewTransaction {
            description: "Groceries run".to_string(),
            amount: "52.30".parse().unwrap(),
            r#type: TransactionType::Expense,
            category: "Groceries".to_string(),
            date: "2025-08-02".parse().unwrap(),
            tags: vec!["weekly".to_string()],
        },
    )
    .unwrap();

    let doc = export_document(&store);
    let raw = serde_json::to_string_pretty(&doc).unwrap();
    let parsed = parse_document(&raw).unwrap();
    assert_eq!(parsed.version, "1.0.2");
    assert_eq!(parsed.transactions.len(), 1);
    assert_eq!(parsed.transactions[0].description, "Groceries run");
}

#[test]
fn csv_escapes_commas_and_quotes() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    repo::add(
        &store,
        NewTransaction {
            description: "Lunch, with \"friends\"".to_string(),
            amount: "18.75".parse().unwrap(),
            r#type: TransactionType::Expense,
            category: "Food".to_string(),
            date: "2025-08-03".parse().unwrap(),
            tags: vec!["out".to_string(), "team".to_string()],
        },
    )
    .unwrap();

    let csv_text = transactions_to_csv(&repo::get_all(&store)).unwrap();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    // Field boundaries survive the embedded comma and quotes.
    assert_eq!(records[0].get(2).unwrap(), "Lunch, with \"friends\"");
    assert_eq!(records[0].get(4).unwrap(), "EXPENSE");
    // Multiple tags share one field, joined with semicolons.
    assert_eq!(records[0].get(6).unwrap(), "out;team");
}

#[test]
fn csv_header_order_is_fixed() {
    let csv_text = transactions_to_csv(&[]).unwrap();
    assert_eq!(
        csv_text.lines().next().unwrap(),
        "ID,Date,Description,Amount,Type,Category,Tags"
    );
}
