// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tempfile::tempdir;

use ledgerclip::store::Store;
use ledgerclip::{cli, commands, repo};

fn run(store: &Store, argv: &[&str]) {
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(store, sub).unwrap(),
        Some(("budget", sub)) => commands::budgets::handle(store, sub).unwrap(),
        Some(("recurring", sub)) => commands::recurring::handle(store, sub).unwrap(),
        Some(("report", sub)) => commands::reports::handle(store, sub).unwrap(),
        Some(("scan", sub)) => commands::scan::handle(store, sub).unwrap(),
        Some(("export", sub)) => commands::exporter::handle(store, sub).unwrap(),
        Some(("import", sub)) => commands::importer::handle(store, sub).unwrap(),
        Some(("category", sub)) => commands::categories::handle(store, sub).unwrap(),
        Some(("settings", sub)) => commands::settings::handle(store, sub).unwrap(),
        other => panic!("unhandled command {:?}", other.map(|(name, _)| name)),
    }
}

#[test]
fn tx_add_persists_through_the_cli() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    run(
        &store,
        &[
            "ledgerclip",
            "tx",
            "add",
            "--date",
            "2025-08-01",
            "--description",
            "Coffee",
            "--amount",
            "4.50",
            "--type",
            "expense",
            "--category",
            "Food",
            "--tag",
            "morning",
            "--tag",
            "work",
        ],
    );

    let txs = repo::get_all(&store);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].description, "Coffee");
    assert_eq!(txs[0].tags, vec!["morning", "work"]);
}

#[test]
fn budget_set_upserts_by_category_and_month() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    run(
        &store,
        &[
            "ledgerclip", "budget", "set", "--month", "2025-08", "--category", "Food",
            "--amount", "200",
        ],
    );
    run(
        &store,
        &[
            "ledgerclip", "budget", "set", "--month", "2025-08", "--category", "Food",
            "--amount", "250", "--rollover",
        ],
    );

    let budgets: Vec<ledgerclip::models::Budget> =
        store.load(ledgerclip::store::BUDGETS_KEY);
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].target_amount, "250".parse().unwrap());
    assert!(budgets[0].allow_rollover);
}

#[test]
fn recurring_process_is_gated_between_runs() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    run(
        &store,
        &[
            "ledgerclip", "recurring", "add", "--description", "Gym", "--amount", "30",
            "--type", "expense", "--category", "Health", "--frequency", "daily",
            "--start", "2025-08-01",
        ],
    );
    run(
        &store,
        &["ledgerclip", "recurring", "process", "--today", "2025-08-03"],
    );
    assert_eq!(repo::get_all(&store).len(), 3);

    // Within the 12-hour window nothing runs without --force.
    run(
        &store,
        &["ledgerclip", "recurring", "process", "--today", "2025-08-04"],
    );
    assert_eq!(repo::get_all(&store).len(), 3);

    run(
        &store,
        &[
            "ledgerclip", "recurring", "process", "--today", "2025-08-04", "--force",
        ],
    );
    assert_eq!(repo::get_all(&store).len(), 4);
}

#[test]
fn backup_export_import_round_trips_on_disk() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("data")).unwrap();

    run(
        &store,
        &[
            "ledgerclip", "tx", "add", "--date", "2025-08-01", "--description",
            "Groceries run", "--amount", "52.30", "--type", "expense", "--category",
            "Groceries",
        ],
    );

    let backup_path = dir.path().join("backup.json");
    let backup_str = backup_path.to_string_lossy().to_string();
    run(
        &store,
        &["ledgerclip", "export", "backup", "--out", &backup_str],
    );

    // Restore into a fresh store.
    let other = Store::open(dir.path().join("other")).unwrap();
    run(
        &other,
        &["ledgerclip", "import", "backup", "--path", &backup_str],
    );
    let txs = repo::get_all(&other);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].description, "Groceries run");
}

#[test]
fn csv_export_writes_the_fixed_header() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("data")).unwrap();

    let out_path = dir.path().join("txs.csv");
    let out_str = out_path.to_string_lossy().to_string();
    run(
        &store,
        &["ledgerclip", "export", "transactions", "--out", &out_str],
    );
    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert!(contents.starts_with("ID,Date,Description,Amount,Type,Category,Tags"));
}

#[test]
fn scan_parse_reads_a_text_file() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("data")).unwrap();

    let receipt = dir.path().join("receipt.txt");
    std::fs::write(&receipt, "Whole Foods Market\n2024-06-02\nTotal: $88.20\n").unwrap();
    let receipt_str = receipt.to_string_lossy().to_string();

    // Goes through the same handler the binary dispatches to.
    run(
        &store,
        &["ledgerclip", "scan", "parse", "--path", &receipt_str, "--json"],
    );
}

#[test]
fn custom_categories_persist_in_settings() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    run(
        &store,
        &[
            "ledgerclip", "category", "add", "--kind", "expense", "--name", "Pets",
        ],
    );
    assert_eq!(
        store.settings().custom_expense_categories,
        vec!["Pets".to_string()]
    );

    run(
        &store,
        &[
            "ledgerclip", "category", "remove", "--kind", "expense", "--name", "Pets",
        ],
    );
    assert!(store.settings().custom_expense_categories.is_empty());
}

#[test]
fn settings_set_validates_currency() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    run(
        &store,
        &["ledgerclip", "settings", "set", "--currency", "twd"],
    );
    assert_eq!(store.settings().selected_currency, "TWD");

    let matches = cli::build_cli().get_matches_from([
        "ledgerclip", "settings", "set", "--currency", "XXX",
    ]);
    let sub = matches.subcommand().unwrap().1;
    assert!(commands::settings::handle(&store, sub).is_err());
}
