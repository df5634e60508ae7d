//! Server-sent-events transcripts of `streamGenerateContent?alt=sse`.

use serde_json::Value;
use tracing::debug;

use crate::decode::decode_response_value;
use crate::diagnostics::DiagnosticSink;
use crate::error::{GeminiError, Result};
use crate::gemini::response::{CandidateResponse, GenerateContentResponse};
use crate::gemini::types::Part;

/// Decodes every `data:` event of a transcript, in order.
pub fn decode_stream(
    transcript: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<GenerateContentResponse>> {
    let mut chunks = Vec::new();
    let mut event_data = String::new();

    for raw_line in transcript.lines() {
        let line = raw_line.trim_end_matches('\r');

        if line.trim().is_empty() {
            finish_event(&mut event_data, &mut chunks, sink)?;
            continue;
        }

        let trimmed = line.trim();
        if trimmed.starts_with(':') {
            continue;
        }

        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            finish_event(&mut event_data, &mut chunks, sink)?;
            event_data.push_str(trimmed);
            finish_event(&mut event_data, &mut chunks, sink)?;
            continue;
        }

        // Only the `data` field carries payload; `event`, `id`, `retry` and unknown fields are dropped.
        let Some(data) = trimmed.strip_prefix("data:").map(str::trim_start) else {
            continue;
        };
        if data == "[DONE]" {
            finish_event(&mut event_data, &mut chunks, sink)?;
            break;
        }
        if !event_data.is_empty() {
            event_data.push('\n');
        }
        event_data.push_str(data);
    }
    finish_event(&mut event_data, &mut chunks, sink)?;

    debug!("Decoded {} stream chunks", chunks.len());
    Ok(chunks)
}

fn finish_event(
    event_data: &mut String,
    chunks: &mut Vec<GenerateContentResponse>,
    sink: &mut dyn DiagnosticSink,
) -> Result<()> {
    if event_data.trim().is_empty() {
        event_data.clear();
        return Ok(());
    }
    let data = std::mem::take(event_data);
    let prefix = format!("events[{}]", chunks.len());
    let value: Value = serde_json::from_str(&data).map_err(|e| GeminiError::DataCorrupted {
        path: prefix.clone(),
        reason: format!("event is not valid JSON: {}", e),
    })?;
    let chunk = decode_response_value(&value, sink).map_err(|err| err.within(&prefix))?;
    chunks.push(chunk);
    Ok(())
}

/// Folds stream chunks into a single response.
///
/// Parts are appended per candidate index, with adjacent text joined. The last
/// finish reason, usage, and prompt feedback seen win.
pub fn merge_chunks(chunks: impl IntoIterator<Item = GenerateContentResponse>) -> GenerateContentResponse {
    let mut merged = GenerateContentResponse::default();

    for chunk in chunks {
        for (position, candidate) in chunk.candidates.into_iter().enumerate() {
            merge_candidate(&mut merged.candidates, candidate, position);
        }
        if chunk.prompt_feedback.is_some() {
            merged.prompt_feedback = chunk.prompt_feedback;
        }
        if chunk.usage_metadata.is_some() {
            merged.usage_metadata = chunk.usage_metadata;
        }
    }

    merged
}

fn merge_candidate(target: &mut Vec<CandidateResponse>, mut candidate: CandidateResponse, position: usize) {
    let index = candidate.index.unwrap_or(position as u32);

    let existing = match target.iter().position(|existing| existing.index == Some(index)) {
        Some(slot) => &mut target[slot],
        None => {
            candidate.index = Some(index);
            target.push(candidate);
            return;
        }
    };

    if existing.content.role.is_none() {
        existing.content.role = candidate.content.role;
    }
    merge_parts(&mut existing.content.parts, candidate.content.parts);

    if candidate.finish_reason.is_some() {
        existing.finish_reason = candidate.finish_reason;
    }
    if !candidate.safety_ratings.is_empty() {
        existing.safety_ratings = candidate.safety_ratings;
    }
    if candidate.citation_metadata.is_some() {
        existing.citation_metadata = candidate.citation_metadata;
    }
    if candidate.grounding_metadata.is_some() {
        existing.grounding_metadata = candidate.grounding_metadata;
    }
    existing
        .grounding_attributions
        .append(&mut candidate.grounding_attributions);
}

fn merge_parts(target: &mut Vec<Part>, parts: Vec<Part>) {
    for part in parts {
        match (target.last_mut(), &part) {
            (Some(Part::Text { text: existing }), Part::Text { text }) => existing.push_str(text),
            _ => target.push(part),
        }
    }
}
