use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::decode::candidate::decode_candidate;
use crate::decode::fallback;
use crate::decode::fields::Object;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{GeminiError, Result};
use crate::gemini::response::{BlockReason, GenerateContentResponse, PromptFeedback, UsageMetadata};

/// Decodes a raw `generateContent` response document.
pub fn decode_response(
    bytes: &[u8],
    sink: &mut dyn DiagnosticSink,
) -> Result<GenerateContentResponse> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode_response_value(&value, sink)
}

/// Decodes an already parsed response document.
pub fn decode_response_value(
    value: &Value,
    sink: &mut dyn DiagnosticSink,
) -> Result<GenerateContentResponse> {
    let obj = Object::new(value, "")?;

    if !obj.contains("candidates") && !obj.contains("promptFeedback") {
        return Err(GeminiError::DataCorrupted {
            path: String::new(),
            reason: "response has neither `candidates` nor `promptFeedback`".to_string(),
        });
    }

    let candidates = obj
        .optional_array_with("candidates", |value, path| decode_candidate(value, path, sink))?
        .unwrap_or_default();
    let prompt_feedback = obj.optional_with("promptFeedback", |value, path| {
        decode_prompt_feedback(value, path, sink)
    })?;

    let response = GenerateContentResponse {
        candidates,
        prompt_feedback,
        usage_metadata: obj.optional_with("usageMetadata", decode_usage)?,
    };

    debug!(
        "Decoded response: {} candidates, prompt feedback: {}",
        response.candidates.len(),
        response.prompt_feedback.is_some()
    );

    Ok(response)
}

fn decode_prompt_feedback(
    value: &Value,
    path: String,
    sink: &mut dyn DiagnosticSink,
) -> Result<PromptFeedback> {
    let obj = Object::new(value, path)?;
    let block_reason = obj.optional_with("blockReason", |value, path| {
        fallback::decode::<BlockReason>(value, path, sink)
    })?;
    Ok(PromptFeedback {
        block_reason,
        safety_ratings: obj.or_default("safetyRatings")?,
    })
}

// The API omits counts that are zero.
fn decode_usage(value: &Value, path: String) -> Result<UsageMetadata> {
    let obj = Object::new(value, path)?;
    Ok(UsageMetadata {
        prompt_token_count: obj.or_default("promptTokenCount")?,
        candidates_token_count: obj.or_default("candidatesTokenCount")?,
        total_token_count: obj.or_default("totalTokenCount")?,
    })
}

impl<'de> Deserialize<'de> for GenerateContentResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_response_value(&value, &mut TracingSink).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLog;
    use crate::gemini::types::HarmCategory;

    fn decode(json: &str) -> Result<GenerateContentResponse> {
        let mut log = DiagnosticLog::new();
        decode_response(json.as_bytes(), &mut log)
    }

    #[test]
    fn test_presence_invariant() {
        let err = decode(r#"{"usageMetadata": {"totalTokenCount": 3}}"#).unwrap_err();
        assert!(matches!(err, GeminiError::DataCorrupted { .. }));
        assert!(err.is_structural());
    }

    #[test]
    fn test_not_json() {
        let err = decode("candidates").unwrap_err();
        assert!(matches!(err, GeminiError::JsonParse(_)));
    }

    #[test]
    fn test_feedback_only_document() {
        let json = r#"{
            "promptFeedback": {
                "blockReason": "SAFETY",
                "safetyRatings": [{"category": "HARM_CATEGORY_HARASSMENT", "probability": "MEDIUM"}]
            }
        }"#;
        let response = decode(json).unwrap();
        assert!(response.candidates.is_empty());
        let feedback = response.prompt_feedback.unwrap();
        assert_eq!(feedback.block_reason, Some(BlockReason::Safety));
        assert_eq!(feedback.safety_ratings[0].category, HarmCategory::Harassment);
    }

    #[test]
    fn test_unknown_block_reason() {
        let mut log = DiagnosticLog::new();
        let response = decode_response(
            br#"{"promptFeedback": {"blockReason": "BLOCKLIST"}}"#,
            &mut log,
        )
        .unwrap();
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason,
            Some(BlockReason::Unknown)
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_usage_metadata() {
        let response = decode(r#"{"candidates": []}"#).unwrap();
        assert_eq!(response.usage_metadata, None);

        let response = decode(r#"{"candidates": [], "usageMetadata": {}}"#).unwrap();
        assert_eq!(response.usage_metadata, Some(UsageMetadata::default()));

        let response =
            decode(r#"{"candidates": [], "usageMetadata": {"promptTokenCount": 5, "totalTokenCount": 5}}"#)
                .unwrap();
        let usage = response.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, 5);
        assert_eq!(usage.candidates_token_count, 0);

        let err = decode(r#"{"candidates": [], "usageMetadata": {"totalTokenCount": "5"}}"#).unwrap_err();
        assert_eq!(err.path(), Some("usageMetadata.totalTokenCount"));
    }

    #[test]
    fn test_candidate_failure_fails_document() {
        let err = decode(r#"{"candidates": [{"content": {"parts": []}}, {"content": {}}]}"#).unwrap_err();
        assert!(matches!(err, GeminiError::EmptyContent { ref path, .. } if path == "candidates[1].content"));
    }

    #[test]
    fn test_deserialize_impl() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "hi"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.candidates.len(), 1);

        let err = serde_json::from_str::<GenerateContentResponse>("{}").unwrap_err();
        assert!(err.to_string().contains("candidates"));
    }
}
