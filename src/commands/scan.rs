// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::ai;
use crate::ocr::{OcrWorker, TesseractCli};
use crate::scan::{extract, ScanExtraction};
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("parse", sub)) => parse(sub)?,
        Some(("image", sub)) => image(sub)?,
        Some(("ai", sub)) => ai_extract(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn read_text(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Read {}", path))
    }
}

fn print_extraction(
    extraction: &ScanExtraction,
    json_flag: bool,
    jsonl_flag: bool,
) -> Result<()> {
    if !maybe_print_json(json_flag, jsonl_flag, extraction)? {
        let rows = vec![vec![
            extraction
                .amount
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            extraction
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            extraction
                .suggested_category
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        ]];
        println!("{}", pretty_table(&["Amount", "Date", "Category"], rows));
    }
    Ok(())
}

fn parse(sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let text = read_text(sub.get_one::<String>("path").unwrap())?;
    print_extraction(&extract(&text), json_flag, jsonl_flag)
}

fn image(sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let path = sub.get_one::<String>("path").unwrap();
    let bin = sub.get_one::<String>("ocr-bin").unwrap().clone();

    let mut worker = OcrWorker::new();
    worker.acquire(|| Ok(Box::new(TesseractCli::new(bin))))?;
    let mut on_progress = |pct: u8| {
        tracing::debug!("recognition progress {}%", pct);
    };
    let text = worker.recognize(Path::new(path), &mut on_progress)?;
    worker.release();

    print_extraction(&extract(&text), json_flag, jsonl_flag)
}

fn mime_for_path(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

fn ai_extract(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let text = match sub.get_one::<String>("path") {
        Some(path) => read_text(path)?,
        None => String::new(),
    };
    let image_bytes = match sub.get_one::<String>("image") {
        Some(path) => Some((
            mime_for_path(path),
            std::fs::read(path).with_context(|| format!("Read {}", path))?,
        )),
        None => None,
    };
    let settings = store.settings();

    match ai::extract_receipt(
        &settings,
        &text,
        image_bytes.as_ref().map(|(mime, bytes)| (*mime, bytes.as_slice())),
    ) {
        Ok(extraction) => {
            if !maybe_print_json(json_flag, jsonl_flag, &extraction)? {
                let rows = vec![vec![
                    extraction
                        .amount
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    extraction.date.clone().unwrap_or_else(|| "-".to_string()),
                    extraction.vendor.clone().unwrap_or_else(|| "-".to_string()),
                    extraction
                        .category
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                    extraction
                        .currency
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                ]];
                println!(
                    "{}",
                    pretty_table(&["Amount", "Date", "Vendor", "Category", "Currency"], rows)
                );
            }
        }
        Err(e) => {
            eprintln!("AI extraction failed: {}", e);
            if let Some(raw) = e.raw_response() {
                eprintln!("raw response: {}", raw);
            }
        }
    }
    Ok(())
}
