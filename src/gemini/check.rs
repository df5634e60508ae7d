use crate::error::{GeminiError, Result};
use crate::gemini::response::{FinishReason, GenerateContentResponse};

impl GenerateContentResponse {
    /// Fails when the prompt was blocked or the first candidate did not finish normally.
    pub fn check(&self) -> Result<()> {
        let Some(candidate) = self.candidates.first() else {
            if let Some(reason) = self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason)
            {
                return Err(GeminiError::PromptBlocked { reason });
            }
            return Ok(());
        };

        match candidate.finish_reason {
            Some(reason) if reason != FinishReason::Stop => {
                Err(GeminiError::ResponseStoppedEarly { reason })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::response::{BlockReason, CandidateResponse, PromptFeedback};

    #[test]
    fn test_prompt_blocked() {
        let response = GenerateContentResponse {
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some(BlockReason::Safety),
                safety_ratings: vec![],
            }),
            ..Default::default()
        };
        assert!(matches!(
            response.check(),
            Err(GeminiError::PromptBlocked {
                reason: BlockReason::Safety
            })
        ));
    }

    #[test]
    fn test_stopped_early() {
        let response = GenerateContentResponse {
            candidates: vec![CandidateResponse {
                finish_reason: Some(FinishReason::MaxTokens),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(matches!(
            response.check(),
            Err(GeminiError::ResponseStoppedEarly {
                reason: FinishReason::MaxTokens
            })
        ));
    }

    #[test]
    fn test_normal_responses_pass() {
        let stopped = GenerateContentResponse {
            candidates: vec![CandidateResponse {
                finish_reason: Some(FinishReason::Stop),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(stopped.check().is_ok());

        let streaming_chunk = GenerateContentResponse {
            candidates: vec![CandidateResponse::default()],
            ..Default::default()
        };
        assert!(streaming_chunk.check().is_ok());
        assert!(GenerateContentResponse::default().check().is_ok());
    }
}
