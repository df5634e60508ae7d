use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::decode::fallback::FallbackEnum;
use crate::gemini::types::{Content, SafetyRating};

/// Top-level `generateContent` response envelope.
///
/// Decoded with [`crate::decode_response`]; the `Deserialize` impl routes through
/// the same decoder and reports diagnostics to `tracing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Ranked best to worst.
    pub candidates: Vec<CandidateResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: u32,
    pub candidates_token_count: u32,
    pub total_token_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub content: Content,
    pub safety_ratings: Vec<SafetyRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_metadata: Option<CitationMetadata>,
    pub grounding_attributions: Vec<GroundingAttribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishReason {
    Unknown,
    Unspecified,
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other,
}

impl FallbackEnum for FinishReason {
    const TYPE_NAME: &'static str = "FinishReason";
    const KNOWN: &'static [(&'static str, Self)] = &[
        ("FINISH_REASON_UNSPECIFIED", Self::Unspecified),
        ("STOP", Self::Stop),
        ("MAX_TOKENS", Self::MaxTokens),
        ("SAFETY", Self::Safety),
        ("RECITATION", Self::Recitation),
        ("OTHER", Self::Other),
    ];
    const UNKNOWN: (&'static str, Self) = ("FINISH_REASON_UNKNOWN", Self::Unknown);
}

impl Serialize for FinishReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<BlockReason>,
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockReason {
    Unknown,
    Unspecified,
    Safety,
    Other,
}

impl FallbackEnum for BlockReason {
    const TYPE_NAME: &'static str = "BlockReason";
    const KNOWN: &'static [(&'static str, Self)] = &[
        ("BLOCK_REASON_UNSPECIFIED", Self::Unspecified),
        ("SAFETY", Self::Safety),
        ("OTHER", Self::Other),
    ];
    const UNKNOWN: (&'static str, Self) = ("BLOCK_REASON_UNKNOWN", Self::Unknown);
}

impl Serialize for BlockReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    pub citation_sources: Vec<Citation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub start_index: u32,
    pub end_index: u32,
    pub uri: String,
    /// Never `Some("")`; an empty license decodes as `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingAttribution {
    pub source_id: AttributionSourceId,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributionSourceId {
    GroundingPassage(GroundingPassageId),
    SemanticRetrieverChunk(SemanticRetrieverChunk),
    /// None of the known source keys was present.
    Unknown,
}

impl AttributionSourceId {
    pub const GROUNDING_PASSAGE_KEY: &'static str = "groundingPassageId";
    pub const SEMANTIC_RETRIEVER_CHUNK_KEY: &'static str = "semanticRetrieverChunk";
}

impl Serialize for AttributionSourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::GroundingPassage(passage) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(Self::GROUNDING_PASSAGE_KEY, passage)?;
                map.end()
            }
            Self::SemanticRetrieverChunk(chunk) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(Self::SEMANTIC_RETRIEVER_CHUNK_KEY, chunk)?;
                map.end()
            }
            Self::Unknown => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingPassageId {
    pub passage_id: String,
    pub part_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticRetrieverChunk {
    pub source: String,
    pub chunk: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    pub grounding_chunks: Vec<GroundingChunk>,
    pub grounding_supports: Vec<GroundingSupport>,
    pub web_search_queries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_metadata: Option<RetrievalMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_entry_point: Option<SearchEntryPoint>,
}

/// Closed union: an object without a `web` key fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GroundingChunk {
    Web(WebChunk),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebChunk {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// `confidence_scores` runs parallel to `grounding_chunk_indices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingSupport {
    pub segment: Segment,
    pub grounding_chunk_indices: Vec<u32>,
    pub confidence_scores: Vec<f32>,
}

impl GroundingSupport {
    /// Pairs each referenced chunk index with its confidence score.
    pub fn scored_chunks(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.grounding_chunk_indices
            .iter()
            .copied()
            .zip(self.confidence_scores.iter().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Segment {
    pub part_index: u32,
    pub start_index: u32,
    pub end_index: u32,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_search_dynamic_retrieval_score: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntryPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_content: Option<String>,
}
