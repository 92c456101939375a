// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

/// What the heuristics could pull out of recognized receipt text. Pure
/// function of the text; any field can be missing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanExtraction {
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub suggested_category: Option<String>,
}

pub fn extract(text: &str) -> ScanExtraction {
    ScanExtraction {
        amount: parse_amount(text),
        date: parse_date(text),
        suggested_category: suggest_category(text).map(str::to_string),
    }
}

const CURRENCY_SYMBOLS: &[&str] = &[
    "$", "€", "£", "¥", "NT$", "HK$", "元", "RM", "₹", "₱", "₩", "฿", "₫", "₪", "₽", "₺",
];

// Keywords that often precede or sit near the total amount.
const ENGLISH_AMOUNT_KEYWORDS: &[&str] = &[
    "total",
    "amount due",
    "balance due",
    "grand total",
    "subtotal",
    "total amount",
    "payment due",
    "invoice total",
    "receipt total",
];
const CHINESE_AMOUNT_KEYWORDS: &[&str] = &[
    "總計", "合計", "總金額", "應付金額", "金額", "款項", "費用總計", "发票总额", "小計",
    "总额", "合计金额",
];

fn currency_alternation() -> String {
    CURRENCY_SYMBOLS
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|")
}

static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?:{})", currency_alternation())).expect("currency pattern")
});

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    let sym = currency_alternation();
    Regex::new(&format!(
        r"(?:(?:{sym})\s*)?(\d{{1,3}}(?:[,.]\d{{3}})*(?:[.,]\d{{1,2}})?|\d+(?:[.,]\d{{1,2}})?)(?:\s*(?:{sym}))?"
    ))
    .expect("amount pattern")
});

static COMMA_DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\d\d$").expect("pattern"));
static PERIOD_DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\d\d$").expect("pattern"));
static PERIOD_THOUSANDS_COMMA_DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\d{3},\d\d$").expect("pattern"));

/// Regional date patterns, tried in order; the first structurally valid
/// match wins. Bare numeric DD-MM vs MM-DD is inherently ambiguous, so the
/// order itself is the policy (MM-DD first).
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // YYYY-MM-DD, YYYY/MM/DD, YYYY.MM.DD, YYYY年MM月DD日
        r"(?i)(?P<year>\d{4})[.\-/年](?P<month>\d{1,2})[.\-/月](?P<day>\d{1,2})日?",
        // MM-DD-YYYY, MM/DD/YY
        r"(?i)(?P<month>\d{1,2})[.\-/月](?P<day>\d{1,2})[.\-/年](?P<year>\d{2,4})日?",
        // DD-MM-YYYY (common outside the US)
        r"(?i)(?P<day>\d{1,2})[.\-/月](?P<month>\d{1,2})[.\-/年](?P<year>\d{2,4})日?",
        r"(?P<year>\d{4})年(?P<month>\d{1,2})月(?P<day>\d{1,2})",
        // Month DD, YYYY
        r"(?i)(?P<month_name>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(?P<day>\d{1,2}),?\s+(?P<year>\d{4})",
        // DD Month YYYY
        r"(?i)(?P<day>\d{1,2})\s+(?P<month_name>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec),?\s+(?P<year>\d{4})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("date pattern"))
    .collect()
});

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let key = lower.get(..3)?;
    let n = match key {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

/// Collapse regional thousands/decimal conventions into a plain decimal
/// string: `1.234,56` and `1,234.56` both become `1234.56`.
fn normalize_amount(raw: &str) -> String {
    let comma_decimal =
        COMMA_DECIMAL_RE.is_match(raw) && !PERIOD_DECIMAL_RE.is_match(raw);
    if PERIOD_THOUSANDS_COMMA_DECIMAL_RE.is_match(raw) {
        raw.replace('.', "").replace(',', ".")
    } else if comma_decimal && raw.contains('.') {
        raw.replace('.', "").replace(',', ".")
    } else if comma_decimal {
        raw.replacen(',', ".", 1)
    } else {
        raw.replace(',', "")
    }
}

/// Scan line by line for the most plausible total. Lines are scored by
/// total/amount keywords and currency symbols; candidates gain a bonus for
/// carrying a decimal fraction and lose points for looking like an invoice
/// or phone number (long digit runs on unscored, non-date lines). Ties
/// prefer the larger value, which picks a grand total over a tax line.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let ten = Decimal::from(10);
    let mut best: Option<(Decimal, i32)> = None;

    for line in text.lines() {
        let line_lower = line.to_lowercase();
        let mut line_score = 0;

        if ENGLISH_AMOUNT_KEYWORDS.iter().any(|k| line_lower.contains(k)) {
            line_score += 10;
        }
        if CHINESE_AMOUNT_KEYWORDS.iter().any(|k| line_lower.contains(k)) {
            line_score += 10;
        }
        let has_currency = CURRENCY_RE.is_match(line);
        if has_currency {
            line_score += 2;
        }

        for cap in AMOUNT_RE.captures_iter(line) {
            let Some(raw) = cap.get(1) else { continue };
            let normalized = normalize_amount(raw.as_str());
            let Ok(num) = normalized.parse::<Decimal>() else {
                continue;
            };
            if num <= Decimal::ZERO {
                continue;
            }

            let mut score = line_score;
            if (line_score > 0 || has_currency) && normalized.contains('.') {
                score += 5;
            }
            if line_score < 5
                && (normalized.len() > 7
                    || (normalized.len() >= 4 && !normalized.contains('.')))
                && !DATE_PATTERNS.iter().any(|p| p.is_match(line))
            {
                // Long integer-only runs without keywords are usually ids or
                // phone numbers, unless the line reads as a date.
                score -= 5;
            }

            if let Some((best_value, best_score)) = best {
                // Stray single-digit OCR noise must not beat a solid total.
                if num < Decimal::ONE && best_value > ten && score < best_score - 5 {
                    continue;
                }
                if score > best_score || (score == best_score && num > best_value) {
                    best = Some((num, score));
                }
            } else {
                best = Some((num, score));
            }
        }
    }

    best.map(|(value, _)| value)
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    parse_date_with_pivot(text, chrono::Utc::now().year())
}

/// Two-digit years expand against `current_year`: values more than five
/// years ahead of the current two-digit year are assumed to be in the prior
/// century. Candidates that do not construct into a real calendar date
/// (Feb 30, day 32) are rejected and the next pattern is tried.
pub fn parse_date_with_pivot(text: &str, current_year: i32) -> Option<NaiveDate> {
    for pattern in DATE_PATTERNS.iter() {
        let Some(cap) = pattern.captures(text) else {
            continue;
        };
        let day: Option<u32> = cap.name("day").and_then(|m| m.as_str().parse().ok());
        let year: Option<i32> = cap.name("year").and_then(|m| m.as_str().parse().ok());
        let month: Option<u32> = cap
            .name("month")
            .and_then(|m| m.as_str().parse().ok())
            .or_else(|| cap.name("month_name").and_then(|m| month_from_name(m.as_str())));

        let (Some(day), Some(month), Some(mut year)) = (day, month, year) else {
            continue;
        };

        if year < 100 {
            year += if year > current_year % 100 + 5 { 1900 } else { 2000 };
        }
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            continue;
        }
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => return Some(date),
            None => continue,
        }
    }
    None
}

/// Category keyword table, most specific first. The first category with any
/// substring hit wins, so billed services (Utilities, Credit Card, Tax)
/// outrank the generic spending buckets.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Utilities",
        &[
            "utility", "electric", "water", "gas", "power", "energy", "sanitation", "waste",
            "internet", "comcast", "xfinity", "verizon fios", "at&t u-verse", "pg&e",
            "con edison", "duke energy", "台電", "台灣電力", "自來水", "水費", "天然氣", "瓦斯",
            "中華電信", "網路費", "第四台", "電費", "能源賬單", "寬頻", "固網", "電力公司",
            "燃氣公司", "水務公司",
        ],
    ),
    (
        "Credit Card",
        &[
            "visa", "mastercard", "master card", "amex", "american express", "discover",
            "credit card payment", "信用卡費", "信用卡帳單", "信用咭月結單", "卡費", "銀行月結單",
        ],
    ),
    (
        "Tax",
        &[
            "tax", "irs", "internal revenue service", "revenue", "hmrc", "cra", "ato",
            "income tax", "property tax", "sales tax", "vat", "gst", "稅", "税单", "稅務",
            "所得稅", "營業稅", "地價稅", "房屋稅", "國稅局",
        ],
    ),
    (
        "Groceries",
        &[
            "grocery", "market", "supermarket", "whole foods", "trader joe", "safeway", "kroger",
            "walmart neighborhood market", "target market", "aldi", "lidl", "publix", "wegmans",
            "stop & shop", "giant", "food lion", "heb", "meijer", "sprouts", "fresh market",
            "全聯", "px mart", "頂好", "wellcome", "citysuper", "jasons", "carrefour", "rt-mart",
            "costco", "愛買", "松青", "惠康", "超市", "菜市場", "食品杂货", "生鮮食品", "日常用品",
        ],
    ),
    (
        "Food",
        &[
            "restaurant", "cafe", "food", "meal", "takeout", "delivery", "mcdonalds",
            "mcdonald's", "starbucks", "subway", "pizza hut", "dominos", "kfc", "burger king",
            "coffee", "lunch", "dinner", "breakfast", "brunch", "外賣", "餐廳", "咖啡廳", "膳食",
            "小吃", "速食", "便當", "飲料店", "手搖飲", "foodpanda", "ubereats", "grabfood",
        ],
    ),
    (
        "Transport",
        &[
            "transport", "uber", "lyft", "taxi", "bus", "train", "subway", "mrt", "gasoline",
            "petrol", "fuel", "parking", "toll", "flight", "airline", "交通", "公車", "火車",
            "地鐵", "捷運", "油費", "停車費", "過路費", "計程車", "高鐵", "台鐵", "機票", "油站",
            "加油",
        ],
    ),
    (
        "Housing",
        &[
            "rent", "mortgage", "housing", "strata", "hoa", "lease payment", "租金", "房貸",
            "住房費用", "管理費", "物業費",
        ],
    ),
    (
        "Health",
        &[
            "health", "pharmacy", "doctor", "dentist", "hospital", "clinic", "cvs", "walgreens",
            "rite aid", "medical", "vision", "insurance premium", "健康", "藥房", "診所", "醫院",
            "保健品", "醫藥費", "牙醫", "看醫生", "健保費",
        ],
    ),
    (
        "Shopping",
        &[
            "amazon", "target", "walmart", "best buy", "ebay", "clothing", "electronics",
            "books", "department store", "online shopping", "購物", "百貨公司", "網購", "服飾",
            "電器產品", "書店", "商場",
        ],
    ),
    (
        "Entertainment",
        &[
            "movie", "cinema", "concert", "netflix", "spotify", "hulu", "disney+",
            "youtube premium", "games", "steam", "playstation", "xbox", "nintendo", "tickets",
            "event", "娛樂", "電影院", "音樂會", "遊戲", "串流服務", "門票", "ktv",
        ],
    ),
    (
        "Education",
        &[
            "education", "school", "college", "university", "tuition", "books", "course",
            "udemy", "coursera", "student loan", "教育", "學費", "書本費", "課程費用", "補習班",
            "學貸",
        ],
    ),
    (
        "Travel",
        &[
            "travel", "airline ticket", "hotel", "accommodation", "airbnb", "expedia",
            "booking.com", "vacation", "trip", "tourism", "旅遊", "機票", "住宿費用", "旅行社",
            "度假",
        ],
    ),
    (
        "Other",
        &[
            "other", "miscellaneous", "fee", "service charge", "donation", "其他", "雜項",
            "手續費", "服務費", "捐款",
        ],
    ),
];

pub fn suggest_category(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(name, _)| *name)
}
