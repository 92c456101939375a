// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{currency_symbol, AppSettings, DEFAULT_MODEL, DEFAULT_OCR_MODEL};

pub const COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const UA: &str = concat!(
    "ledgerclip/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/ledgerclip)"
);

/// Model-name fragments assumed to accept image input.
const MULTIMODAL_MODEL_HINTS: &[&str] = &[
    "claude-3",
    "gpt-4o",
    "gpt-4-turbo",
    "gpt-4-vision",
    "llava",
    "gemini",
    "qwen",
];

/// Failures cross this boundary as values, each keeping the raw response
/// text for diagnostics.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("API key is not set")]
    MissingApiKey,
    #[error("no OCR text or image provided for AI analysis")]
    MissingInput,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("AI extraction failed: {status} {message}")]
    Status {
        status: u16,
        message: String,
        raw: String,
    },
    #[error("AI returned no content")]
    EmptyReply { raw: String },
    #[error("failed to parse the AI JSON reply")]
    BadReply { raw: String },
}

impl AiError {
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AiError::Status { raw, .. }
            | AiError::EmptyReply { raw }
            | AiError::BadReply { raw } => Some(raw),
            _ => None,
        }
    }
}

/// Structured fields extracted by the model. Every field is optional; the
/// raw reply rides along for diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiExtraction {
    pub amount: Option<Decimal>,
    /// YYYY-MM-DD as returned by the model; validated downstream.
    pub date: Option<String>,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub currency: Option<String>,
    #[serde(skip_deserializing)]
    pub raw_response: Option<String>,
}

pub fn is_multimodal(model: &str) -> bool {
    let lower = model.to_lowercase();
    MULTIMODAL_MODEL_HINTS.iter().any(|m| lower.contains(m))
}

/// OCR-specific model if configured, else the general model, else the
/// shipped default.
pub fn select_ocr_model(settings: &AppSettings) -> String {
    if !settings.ocr_model_name.trim().is_empty() {
        settings.ocr_model_name.clone()
    } else if !settings.model_name.trim().is_empty() {
        settings.model_name.clone()
    } else {
        DEFAULT_OCR_MODEL.to_string()
    }
}

fn language_instruction(language: &str) -> &'static str {
    if language == "zh-TW" {
        "請以繁體中文進行分析與回答。金額若為新臺幣，請明確標示 TWD 或 NT$。"
    } else {
        "Analyze and respond in English. If currency is USD, clearly mark it as USD or $."
    }
}

fn receipt_system_prompt(language: &str) -> String {
    format!(
        "You are an expert OCR data extraction and categorization AI.\n\
         Analyze the provided data (image and/or text) from a bill or receipt.\n\
         Extract the total amount, date, vendor/store name, a suitable category, and the currency.\n\
         {}\n\
         Respond ONLY with a valid JSON object containing these fields: \
         \"amount\" (numeric or null), \"date\" (\"YYYY-MM-DD\" or null), \"vendor\" (string or null), \
         \"category\" (string from list: Groceries, Utilities, Food, Transport, Shopping, Health, \
         Entertainment, Travel, Tax, Credit Card, Other, or null), \
         \"currency\" (string like \"USD\", \"TWD\", or null).\n\
         Example: {{\"amount\": 123.45, \"date\": \"2023-10-26\", \"vendor\": \"SuperMart\", \
         \"category\": \"Groceries\", \"currency\": \"USD\"}}",
        language_instruction(language)
    )
}

/// Build the chat-completion request body for receipt extraction. The image
/// is attached only when the selected model is assumed multimodal; text and
/// image are both optional but not both absent.
pub fn build_receipt_request(
    model: &str,
    language: &str,
    ocr_text: &str,
    image: Option<(&str, &[u8])>,
) -> Result<Value, AiError> {
    let mut user_content: Vec<Value> = Vec::new();

    if is_multimodal(model) {
        if let Some((mime, bytes)) = image {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            user_content.push(json!({
                "type": "image_url",
                "image_url": { "url": format!("data:{};base64,{}", mime, encoded) }
            }));
        }
    }

    let text_content = if !ocr_text.trim().is_empty() {
        format!(
            "Analyze the provided data.\n\
             Prioritize information from the image if available, but use the OCR text as a strong reference:\n\
             OCR Text:\n{}",
            ocr_text
        )
    } else if !user_content.is_empty() {
        "Analyze the provided image from a bill or receipt.".to_string()
    } else {
        return Err(AiError::MissingInput);
    };
    user_content.push(json!({ "type": "text", "text": text_content }));

    Ok(json!({
        "model": model,
        "messages": [
            { "role": "system", "content": receipt_system_prompt(language) },
            { "role": "user", "content": user_content }
        ],
        "max_tokens": 500,
        "temperature": 0.2,
        "response_format": { "type": "json_object" }
    }))
}

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("fence pattern"));

/// Some models wrap the JSON reply in a markdown code fence despite the
/// response-format request; strip it before parsing.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    match FENCE_RE.captures(trimmed).and_then(|c| c.get(2)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_choice_content(raw: &str) -> Result<String, AiError> {
    let envelope: ChatCompletion = serde_json::from_str(raw).map_err(|_| AiError::BadReply {
        raw: raw.to_string(),
    })?;
    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AiError::EmptyReply {
            raw: raw.to_string(),
        })
}

/// Decode a chat-completion envelope into the extraction schema.
pub fn parse_completion_reply(raw: &str) -> Result<AiExtraction, AiError> {
    let content = first_choice_content(raw)?;
    let stripped = strip_code_fence(&content);
    match serde_json::from_str::<AiExtraction>(stripped) {
        Ok(mut extraction) => {
            extraction.raw_response = Some(content.clone());
            Ok(extraction)
        }
        Err(_) => Err(AiError::BadReply { raw: content }),
    }
}

// No timeout on the AI calls; cancellation is the caller's affordance.
fn ai_client() -> Result<reqwest::blocking::Client, AiError> {
    Ok(reqwest::blocking::Client::builder()
        .user_agent(UA)
        .build()?)
}

fn post_completion(api_key: &str, body: &Value) -> Result<String, AiError> {
    let client = ai_client()?;
    let resp = client
        .post(COMPLETIONS_URL)
        .bearer_auth(api_key)
        .json(body)
        .send()?;
    let status = resp.status();
    let raw = resp.text()?;
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
        return Err(AiError::Status {
            status: status.as_u16(),
            message,
            raw,
        });
    }
    Ok(raw)
}

/// AI-assisted receipt extraction over OCR text and/or the captured image.
pub fn extract_receipt(
    settings: &AppSettings,
    ocr_text: &str,
    image: Option<(&str, &[u8])>,
) -> Result<AiExtraction, AiError> {
    if settings.api_key.trim().is_empty() {
        return Err(AiError::MissingApiKey);
    }
    let model = select_ocr_model(settings);
    let body = build_receipt_request(&model, &settings.language, ocr_text, image)?;
    let raw = post_completion(&settings.api_key, &body)?;
    parse_completion_reply(&raw)
}

/// One short actionable tip from the advisor prompt, banded by the user's
/// balance and recent activity.
pub fn tip_prompt(
    balance: Decimal,
    recent_count: usize,
    currency_code: &str,
    language: &str,
) -> String {
    let status = if balance < Decimal::ZERO {
        "currently in debt"
    } else if balance < Decimal::from(100) {
        "on the lower side"
    } else if balance > Decimal::from(5000) {
        "looking healthy"
    } else {
        "stable"
    };
    let activity = if recent_count < 5 {
        "low"
    } else if recent_count > 20 {
        "high"
    } else {
        "moderate"
    };
    let lang = if language == "zh-TW" {
        "請以繁體中文回答。"
    } else {
        "Please respond in English."
    };
    format!(
        "You are the friendly financial advisor inside the Ledgerclip personal finance tracker.\n\
         \n\
         User's current snapshot:\n\
         - Current balance: {}{:.2} {}\n\
         - Recent transaction activity: {} ({} transactions recently)\n\
         - Derived financial status: {}\n\
         \n\
         Based on this snapshot, provide ONE concise (2-3 sentences maximum), practical, and \
         encouraging financial tip, highly relevant to the situation described. Suggest a concrete \
         step the user can take, such as reviewing spending categories, setting a budget goal, or \
         building savings. Avoid generic advice. Plain text only, no markdown. {}",
        currency_symbol(currency_code),
        balance,
        currency_code,
        activity,
        recent_count,
        status,
        lang
    )
}

pub fn financial_tip(
    settings: &AppSettings,
    balance: Decimal,
    recent_count: usize,
) -> Result<String, AiError> {
    if settings.api_key.trim().is_empty() {
        return Err(AiError::MissingApiKey);
    }
    let model = if settings.model_name.trim().is_empty() {
        DEFAULT_MODEL
    } else {
        settings.model_name.as_str()
    };
    let prompt = tip_prompt(
        balance,
        recent_count,
        &settings.selected_currency,
        &settings.language,
    );
    let body = json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "max_tokens": 150,
        "temperature": 0.7
    });
    let raw = post_completion(&settings.api_key, &body)?;
    let content = first_choice_content(&raw)?;
    Ok(content.trim().to_string())
}
