// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::json;

use ledgerclip::ai::{
    build_receipt_request, is_multimodal, parse_completion_reply, select_ocr_model,
    strip_code_fence, tip_prompt, AiError,
};
use ledgerclip::models::{AppSettings, DEFAULT_OCR_MODEL};

#[test]
fn multimodal_models_are_detected_by_name_fragment() {
    assert!(is_multimodal("qwen/qwen2.5-vl-72b-instruct:free"));
    assert!(is_multimodal("anthropic/claude-3-haiku"));
    assert!(is_multimodal("openai/GPT-4o"));
    assert!(!is_multimodal("deepseek/deepseek-chat:free"));
    assert!(!is_multimodal("mistralai/mistral-7b-instruct"));
}

#[test]
fn ocr_model_selection_falls_back() {
    let mut settings = AppSettings::default();
    settings.ocr_model_name = "vision-model".to_string();
    assert_eq!(select_ocr_model(&settings), "vision-model");

    settings.ocr_model_name = "  ".to_string();
    settings.model_name = "general-model".to_string();
    assert_eq!(select_ocr_model(&settings), "general-model");

    settings.model_name = String::new();
    assert_eq!(select_ocr_model(&settings), DEFAULT_OCR_MODEL);
}

#[test]
fn request_attaches_image_only_for_multimodal_models() {
    let req = build_receipt_request("gemini-pro-vision", "en", "TOTAL 5.00", Some(("image/png", &b"png"[..])))
        .unwrap();
    let content = req["messages"][1]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0]["type"], "image_url");
    assert!(content[0]["image_url"]["url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    let req = build_receipt_request("deepseek/deepseek-chat:free", "en", "TOTAL 5.00", Some(("image/png", &b"png"[..])))
        .unwrap();
    let content = req["messages"][1]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["type"], "text");
}

#[test]
fn request_carries_schema_instruction_and_knobs() {
    let req = build_receipt_request("deepseek/deepseek-chat:free", "zh-TW", "總計 100", None).unwrap();
    assert_eq!(req["max_tokens"], 500);
    assert_eq!(req["response_format"]["type"], "json_object");
    let system = req["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("\"amount\""));
    assert!(system.contains("繁體中文"));
    let user = req["messages"][1]["content"][0]["text"].as_str().unwrap();
    assert!(user.contains("總計 100"));
}

#[test]
fn request_without_text_or_image_is_an_error() {
    assert!(matches!(
        build_receipt_request("deepseek/deepseek-chat:free", "en", "  ", None),
        Err(AiError::MissingInput)
    ));
}

#[test]
fn code_fences_are_stripped() {
    assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
}

#[test]
fn fenced_reply_parses() {
    let envelope = json!({
        "choices": [{
            "message": {
                "content": "```json\n{\"amount\": 48.60, \"date\": \"2024-03-15\", \"vendor\": \"SuperMart\", \"category\": \"Groceries\", \"currency\": \"USD\"}\n```"
            }
        }]
    })
    .to_string();

    let extraction = parse_completion_reply(&envelope).unwrap();
    assert_eq!(extraction.amount, Some("48.60".parse().unwrap()));
    assert_eq!(extraction.date.as_deref(), Some("2024-03-15"));
    assert_eq!(extraction.category.as_deref(), Some("Groceries"));
    assert!(extraction.raw_response.is_some());
}

#[test]
fn empty_choices_surface_as_empty_reply() {
    let envelope = json!({ "choices": [] }).to_string();
    match parse_completion_reply(&envelope) {
        Err(AiError::EmptyReply { raw }) => assert!(raw.contains("choices")),
        other => panic!("expected EmptyReply, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn unparsable_reply_keeps_the_raw_text() {
    let envelope = json!({
        "choices": [{ "message": { "content": "sorry, here is prose not JSON" } }]
    })
    .to_string();
    match parse_completion_reply(&envelope) {
        Err(AiError::BadReply { raw }) => assert!(raw.contains("prose")),
        other => panic!("expected BadReply, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn tip_prompt_bands_balance_and_activity() {
    let low = tip_prompt("-20".parse().unwrap(), 2, "USD", "en");
    assert!(low.contains("currently in debt"));
    assert!(low.contains("low"));

    let healthy = tip_prompt("9000".parse().unwrap(), 25, "TWD", "en");
    assert!(healthy.contains("looking healthy"));
    assert!(healthy.contains("high"));
    assert!(healthy.contains("NT$"));

    let zh = tip_prompt("500".parse().unwrap(), 10, "USD", "zh-TW");
    assert!(zh.contains("繁體中文"));
}
