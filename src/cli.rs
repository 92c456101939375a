// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Record id")
}

pub fn build_cli() -> Command {
    Command::new("ledgerclip")
        .about("Personal finance tracking: transactions, budgets, recurring templates, receipt scanning")
        .subcommand(Command::new("init").about("Initialize the data directory"))
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income or expense"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("tag")
                                .long("tag")
                                .action(ArgAction::Append)
                                .help("May be given multiple times"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("type").long("type").help("income or expense"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("delete")
                        .about("Delete a transaction")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage monthly category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Create or update the budget for a category and month")
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM"))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("rollover")
                                .long("rollover")
                                .action(ArgAction::SetTrue)
                                .help("Carry unspent (or overspent) amounts into the next month"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List budgets")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM")),
                ))
                .subcommand(
                    Command::new("delete")
                        .about("Delete a budget")
                        .arg(id_arg()),
                )
                .subcommand(json_flags(
                    Command::new("report")
                        .about("Spent, rollover, and effective target per budget for a month")
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
                )),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring transaction templates")
                .subcommand(
                    Command::new("add")
                        .about("Create a recurring template")
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income or expense"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .required(true)
                                .help("daily, weekly, monthly, or yearly"),
                        )
                        .arg(Arg::new("start").long("start").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("end").long("end").help("YYYY-MM-DD, inclusive"))
                        .arg(
                            Arg::new("tag")
                                .long("tag")
                                .action(ArgAction::Append)
                                .help("May be given multiple times"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List recurring templates"),
                ))
                .subcommand(
                    Command::new("toggle")
                        .about("Flip a template between active and inactive")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a template")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("process")
                        .about("Materialize every due instance up to today")
                        .arg(Arg::new("today").long("today").help("Override today (YYYY-MM-DD)"))
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .action(ArgAction::SetTrue)
                                .help("Run even if processed within the last 12 hours"),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Reports over recorded transactions")
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Income and expense per month")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("spend-by-category")
                        .about("Expense totals per category for a month")
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
                ))
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Income, expenses, and net for a month")
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
                )),
        )
        .subcommand(
            Command::new("scan")
                .about("Extract transaction details from receipt text or images")
                .subcommand(json_flags(
                    Command::new("parse")
                        .about("Run the extraction heuristics over recognized text")
                        .arg(
                            Arg::new("path")
                                .long("path")
                                .required(true)
                                .help("Text file, or - for stdin"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("image")
                        .about("Recognize an image locally, then run the heuristics")
                        .arg(Arg::new("path").long("path").required(true).help("Image file"))
                        .arg(
                            Arg::new("ocr-bin")
                                .long("ocr-bin")
                                .default_value("tesseract")
                                .help("OCR executable"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("ai")
                        .about("AI-assisted extraction from text and/or an image")
                        .arg(Arg::new("path").long("path").help("Recognized-text file"))
                        .arg(Arg::new("image").long("image").help("Image file to attach")),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Write all transactions as CSV")
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("backup")
                        .about("Write a full backup document")
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("backup")
                    .about("Restore a backup document, replacing all collections")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage custom categories")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income or expense"),
                        )
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("remove")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income or expense"),
                        )
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("kind").long("kind")),
                )),
        )
        .subcommand(
            Command::new("settings")
                .about("Configure the application")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("api-key").long("api-key"))
                        .arg(Arg::new("model").long("model"))
                        .arg(Arg::new("ocr-model").long("ocr-model"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("language").long("language").help("en or zh-TW"))
                        .arg(
                            Arg::new("dark-mode")
                                .long("dark-mode")
                                .help("true or false"),
                        ),
                )
                .subcommand(Command::new("show")),
        )
        .subcommand(Command::new("tip").about("One AI financial tip for the current balance"))
        .subcommand(Command::new("doctor").about("Validate stored collections"))
}
