// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerclip::scan::{extract, parse_amount, parse_date_with_pivot, suggest_category};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn total_beats_subtotal_and_tax() {
    let text = "Subtotal: 45.00\nTax: 3.60\nTotal: $48.60";
    assert_eq!(parse_amount(text), Some(dec("48.60")));
}

#[test]
fn keyword_line_beats_bare_numbers() {
    let text = "Table 12\nAmount due: 27.50\n4";
    assert_eq!(parse_amount(text), Some(dec("27.50")));
}

#[test]
fn comma_decimal_convention_is_normalized() {
    // European style: period thousands, comma decimal.
    assert_eq!(parse_amount("Total 1.234,56 €"), Some(dec("1234.56")));
}

#[test]
fn period_decimal_convention_is_normalized() {
    assert_eq!(parse_amount("Total $1,234.56"), Some(dec("1234.56")));
}

#[test]
fn invoice_numbers_do_not_win() {
    // The long integer-only run is penalized; the scored line wins even
    // though the invoice number is larger.
    let text = "Invoice 20250810123\nTotal: $12.80";
    assert_eq!(parse_amount(text), Some(dec("12.80")));
}

#[test]
fn chinese_keywords_score_lines() {
    let text = "統一編號 12345678\n總計 NT$ 520";
    assert_eq!(parse_amount(text), Some(dec("520")));
}

#[test]
fn no_candidates_yields_none() {
    assert_eq!(parse_amount("thanks for visiting"), None);
}

#[test]
fn regional_date_formats_agree() {
    let expected = Some(date("2024-03-15"));
    assert_eq!(parse_date_with_pivot("2024年3月15日", 2025), expected);
    assert_eq!(parse_date_with_pivot("2024-03-15", 2025), expected);
    assert_eq!(parse_date_with_pivot("03/15/2024", 2025), expected);
    assert_eq!(parse_date_with_pivot("15-03-2024", 2025), expected);
    assert_eq!(parse_date_with_pivot("Mar 15, 2024", 2025), expected);
    assert_eq!(parse_date_with_pivot("15 Mar 2024", 2025), expected);
}

#[test]
fn bare_numeric_dates_resolve_month_first() {
    // 03-04-2024 is genuinely ambiguous; the fixed pattern order reads it
    // month-first. A known-lossy heuristic, kept deliberately.
    assert_eq!(
        parse_date_with_pivot("03-04-2024", 2025),
        Some(date("2024-03-04"))
    );
}

#[test]
fn two_digit_years_pivot_on_current_year() {
    // Within five years ahead of "now" stays in the current century.
    assert_eq!(
        parse_date_with_pivot("12/31/27", 2025),
        Some(date("2027-12-31"))
    );
    assert_eq!(
        parse_date_with_pivot("12/31/99", 2025),
        Some(date("1999-12-31"))
    );
}

#[test]
fn impossible_dates_are_rejected() {
    assert_eq!(parse_date_with_pivot("2023年2月30日", 2025), None);
    assert_eq!(parse_date_with_pivot("Feb 30, 2023", 2025), None);
    assert_eq!(parse_date_with_pivot("2023-13-01", 2025), None);
    // Feb 29 only parses in leap years.
    assert_eq!(
        parse_date_with_pivot("2024-02-29", 2025),
        Some(date("2024-02-29"))
    );
    assert_eq!(parse_date_with_pivot("2023年2月29日", 2025), None);
}

#[test]
fn specific_categories_outrank_generic_ones() {
    // "power" (Utilities) must win although "market" (Groceries) also hits.
    assert_eq!(
        suggest_category("City Power & Light\nsupermarket lane 4"),
        Some("Utilities")
    );
    assert_eq!(suggest_category("VISA statement enclosed"), Some("Credit Card"));
    assert_eq!(suggest_category("dinner at the cafe"), Some("Food"));
    assert_eq!(suggest_category("nothing recognizable here"), None);
}

#[test]
fn chinese_category_keywords_hit() {
    assert_eq!(suggest_category("台灣電力公司 電費通知"), Some("Utilities"));
    assert_eq!(suggest_category("全聯福利中心"), Some("Groceries"));
}

#[test]
fn extract_combines_all_three_fields() {
    let text = "Whole Foods Market\n2024-06-02\nTotal: $88.20";
    let result = extract(text);
    assert_eq!(result.amount, Some(dec("88.20")));
    assert_eq!(result.date, Some(date("2024-06-02")));
    assert_eq!(result.suggested_category.as_deref(), Some("Groceries"));
}
