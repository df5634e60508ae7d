use serde::Deserialize;
use serde_json::{Map, Value};

use crate::decode::fallback;
use crate::decode::fields::Object;
use crate::decode::grounding;
use crate::diagnostics::DiagnosticSink;
use crate::error::{GeminiError, Result};
use crate::gemini::response::{CandidateResponse, Citation, CitationMetadata, FinishReason};
use crate::gemini::types::Content;

pub(crate) fn decode_candidate(
    value: &Value,
    path: String,
    sink: &mut dyn DiagnosticSink,
) -> Result<CandidateResponse> {
    let obj = Object::new(value, path)?;

    // A candidate without content is valid, e.g. when it was blocked for safety.
    let content = obj
        .optional_with("content", decode_content)?
        .unwrap_or_default();

    let finish_reason = obj.optional_with("finishReason", |value, path| {
        fallback::decode::<FinishReason>(value, path, sink)
    })?;

    let grounding_attributions = obj
        .optional_array_with("groundingAttributions", |value, path| {
            grounding::decode_attribution(value, path, sink)
        })?
        .unwrap_or_default();

    Ok(CandidateResponse {
        index: obj.optional("index")?,
        content,
        safety_ratings: obj.or_default("safetyRatings")?,
        finish_reason,
        citation_metadata: obj.optional_with("citationMetadata", decode_citation_metadata)?,
        grounding_attributions,
        grounding_metadata: obj.optional_with("groundingMetadata", grounding::decode_metadata)?,
    })
}

/// Decodes a present `content` value.
///
/// When the primary decode fails the raw value is probed as a plain map only to
/// tell the upstream `"content": {}` anomaly apart from other malformed shapes.
pub(crate) fn decode_content(raw: &Value, path: String) -> Result<Content> {
    let source = match Content::deserialize(raw) {
        Ok(content) => return Ok(content),
        Err(source) => source,
    };
    match Map::<String, Value>::deserialize(raw) {
        Ok(map) if map.is_empty() => Err(GeminiError::EmptyContent { path, source }),
        _ => Err(GeminiError::MalformedContent { path, source }),
    }
}

fn decode_citation_metadata(value: &Value, path: String) -> Result<CitationMetadata> {
    let obj = Object::new(value, path)?;
    Ok(CitationMetadata {
        citation_sources: obj
            .optional_array_with("citationSources", decode_citation)?
            .unwrap_or_default(),
    })
}

fn decode_citation(value: &Value, path: String) -> Result<Citation> {
    let obj = Object::new(value, path)?;
    let license = obj
        .optional::<String>("license")?
        .filter(|license| !license.is_empty());
    Ok(Citation {
        start_index: obj.or_default("startIndex")?,
        end_index: obj.required("endIndex")?,
        uri: obj.required("uri")?,
        license,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLog;
    use crate::gemini::types::{HarmCategory, HarmProbability, Part};
    use serde_json::json;

    fn decode(value: Value) -> Result<CandidateResponse> {
        let mut log = DiagnosticLog::new();
        decode_candidate(&value, "candidates[0]".to_string(), &mut log)
    }

    #[test]
    fn test_minimal_candidate_defaults() {
        let candidate = decode(json!({})).unwrap();
        assert_eq!(candidate, CandidateResponse::default());
        assert!(candidate.safety_ratings.is_empty());
        assert!(candidate.grounding_attributions.is_empty());
        assert!(candidate.finish_reason.is_none());
    }

    #[test]
    fn test_safety_blocked_candidate() {
        let candidate = decode(json!({
            "finishReason": "SAFETY",
            "safetyRatings": [
                {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "probability": "HIGH", "blocked": true}
            ]
        }))
        .unwrap();
        assert_eq!(candidate.content, Content::default());
        assert_eq!(candidate.finish_reason, Some(FinishReason::Safety));
        assert_eq!(candidate.safety_ratings[0].category, HarmCategory::DangerousContent);
        assert_eq!(candidate.safety_ratings[0].probability, HarmProbability::High);
        assert!(candidate.safety_ratings[0].blocked);
    }

    #[test]
    fn test_empty_content_anomaly() {
        let err = decode(json!({"content": {}})).unwrap_err();
        assert!(matches!(err, GeminiError::EmptyContent { ref path, .. } if path == "candidates[0].content"));
    }

    #[test]
    fn test_malformed_content() {
        let err = decode(json!({"content": {"parts": "nope"}})).unwrap_err();
        assert!(matches!(err, GeminiError::MalformedContent { .. }));

        let err = decode(json!({"content": "text"})).unwrap_err();
        assert!(matches!(err, GeminiError::MalformedContent { .. }));
    }

    #[test]
    fn test_content_parts() {
        let candidate = decode(json!({
            "content": {"role": "model", "parts": [{"text": "hi"}]},
            "finishReason": "STOP",
            "index": 0
        }))
        .unwrap();
        assert_eq!(candidate.content, Content::model(vec![Part::text("hi")]));
        assert_eq!(candidate.index, Some(0));
    }

    #[test]
    fn test_unrecognized_part_kind_decodes() {
        let candidate = decode(json!({
            "content": {"role": "model", "parts": [{"thought": true}, {"text": "answer"}]}
        }))
        .unwrap();
        assert_eq!(candidate.content.parts.len(), 2);
        assert!(matches!(candidate.content.parts[0], Part::Other(_)));
    }

    #[test]
    fn test_unknown_finish_reason() {
        let mut log = DiagnosticLog::new();
        let candidate = decode_candidate(
            &json!({"finishReason": "NEW_REASON_X"}),
            "candidates[0]".to_string(),
            &mut log,
        )
        .unwrap();
        assert_eq!(candidate.finish_reason, Some(FinishReason::Unknown));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_wrong_type_safety_ratings_fails() {
        let err = decode(json!({"safetyRatings": {}})).unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.path(), Some("candidates[0].safetyRatings"));
    }

    #[test]
    fn test_citation_defaults() {
        let candidate = decode(json!({
            "citationMetadata": {"citationSources": [
                {"endIndex": 13, "uri": "https://example.com", "license": ""},
                {"startIndex": 2, "endIndex": 5, "uri": "https://example.org", "license": "mit"}
            ]}
        }))
        .unwrap();
        let sources = candidate.citation_metadata.unwrap().citation_sources;
        assert_eq!(sources[0].start_index, 0);
        assert_eq!(sources[0].end_index, 13);
        assert_eq!(sources[0].license, None);
        assert_eq!(sources[1].start_index, 2);
        assert_eq!(sources[1].license.as_deref(), Some("mit"));
    }

    #[test]
    fn test_citation_requires_end_index() {
        let err = decode(json!({
            "citationMetadata": {"citationSources": [{"startIndex": 1, "uri": "https://example.com"}]}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            GeminiError::MissingField { ref path }
                if path == "candidates[0].citationMetadata.citationSources[0].endIndex"
        ));
    }

    #[test]
    fn test_malformed_grounding_metadata_propagates() {
        let err = decode(json!({"groundingMetadata": {"groundingChunks": [{"maps": {}}]}})).unwrap_err();
        assert!(err.is_structural());
    }
}
