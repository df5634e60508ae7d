use serde_json::Value;

use crate::decode::fields::Object;
use crate::decode::union::{self, VariantDecoder};
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::gemini::response::{
    AttributionSourceId, GroundingAttribution, GroundingChunk, GroundingMetadata,
    GroundingPassageId, GroundingSupport, SemanticRetrieverChunk, WebChunk,
};

const SOURCE_ID_VARIANTS: &[(&str, VariantDecoder<AttributionSourceId>)] = &[
    (AttributionSourceId::GROUNDING_PASSAGE_KEY, grounding_passage),
    (AttributionSourceId::SEMANTIC_RETRIEVER_CHUNK_KEY, semantic_retriever_chunk),
];

const CHUNK_VARIANTS: &[(&str, VariantDecoder<GroundingChunk>)] = &[("web", web_chunk)];

pub(crate) fn decode_attribution(
    value: &Value,
    path: String,
    sink: &mut dyn DiagnosticSink,
) -> Result<GroundingAttribution> {
    let obj = Object::new(value, path)?;
    let source_id = obj.required_with("sourceId", |value, path| decode_source_id(value, path, sink))?;
    Ok(GroundingAttribution {
        source_id,
        content: obj.required("content")?,
    })
}

pub(crate) fn decode_source_id(
    value: &Value,
    path: String,
    sink: &mut dyn DiagnosticSink,
) -> Result<AttributionSourceId> {
    let obj = Object::new(value, path)?;
    Ok(union::resolve_open(
        &obj,
        "AttributionSourceId",
        SOURCE_ID_VARIANTS,
        AttributionSourceId::Unknown,
        sink,
    ))
}

fn grounding_passage(value: &Value, path: String) -> Result<AttributionSourceId> {
    let obj = Object::new(value, path)?;
    Ok(AttributionSourceId::GroundingPassage(GroundingPassageId {
        passage_id: obj.required("passageId")?,
        part_index: obj.required("partIndex")?,
    }))
}

fn semantic_retriever_chunk(value: &Value, path: String) -> Result<AttributionSourceId> {
    let obj = Object::new(value, path)?;
    Ok(AttributionSourceId::SemanticRetrieverChunk(SemanticRetrieverChunk {
        source: obj.required("source")?,
        chunk: obj.required("chunk")?,
    }))
}

pub(crate) fn decode_metadata(value: &Value, path: String) -> Result<GroundingMetadata> {
    let obj = Object::new(value, path)?;
    Ok(GroundingMetadata {
        grounding_chunks: obj
            .optional_array_with("groundingChunks", decode_chunk)?
            .unwrap_or_default(),
        grounding_supports: obj
            .optional_array_with("groundingSupports", decode_support)?
            .unwrap_or_default(),
        web_search_queries: obj.or_default("webSearchQueries")?,
        retrieval_metadata: obj.optional("retrievalMetadata")?,
        search_entry_point: obj.optional("searchEntryPoint")?,
    })
}

pub(crate) fn decode_chunk(value: &Value, path: String) -> Result<GroundingChunk> {
    let obj = Object::new(value, path)?;
    union::resolve_closed(&obj, "GroundingChunk", CHUNK_VARIANTS)
}

fn web_chunk(value: &Value, path: String) -> Result<GroundingChunk> {
    let obj = Object::new(value, path)?;
    Ok(GroundingChunk::Web(WebChunk {
        uri: obj.required("uri")?,
        title: obj.optional("title")?,
    }))
}

fn decode_support(value: &Value, path: String) -> Result<GroundingSupport> {
    let obj = Object::new(value, path)?;
    Ok(GroundingSupport {
        segment: obj.required("segment")?,
        grounding_chunk_indices: obj.or_default("groundingChunkIndices")?,
        confidence_scores: obj.or_default("confidenceScores")?,
    })
}
