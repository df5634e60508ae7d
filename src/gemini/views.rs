//! Read-only views computed from a decoded response.

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::gemini::response::GenerateContentResponse;
use crate::gemini::types::{FunctionCall, Part};

impl GenerateContentResponse {
    /// Text of the first candidate, reporting to `tracing` when there is none.
    pub fn text(&self) -> Option<String> {
        self.text_with(&mut TracingSink)
    }

    /// Joins the renderable parts of the first candidate with newlines.
    ///
    /// Executable code and non-empty execution output are rendered as fenced
    /// blocks. Media, file, and function parts contribute nothing.
    pub fn text_with(&self, sink: &mut dyn DiagnosticSink) -> Option<String> {
        let Some(candidate) = self.candidates.first() else {
            sink.report(Diagnostic::NoCandidates);
            return None;
        };

        let fragments: Vec<String> = candidate
            .content
            .parts
            .iter()
            .filter_map(text_fragment)
            .collect();

        if fragments.is_empty() {
            sink.report(Diagnostic::NoText);
            return None;
        }
        Some(fragments.join("\n"))
    }

    /// Function calls in the first candidate, in part order.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::FunctionCall { function_call } => Some(function_call),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn text_fragment(part: &Part) -> Option<String> {
    match part {
        Part::Text { text } => Some(text.clone()),
        Part::ExecutableCode { executable_code } => Some(format!(
            "```{}\n{}\n```",
            executable_code.fence_tag(),
            executable_code.code
        )),
        Part::CodeExecutionResult {
            code_execution_result,
        } if !code_execution_result.output.is_empty() => {
            Some(format!("```\n{}\n```", code_execution_result.output))
        }
        _ => None,
    }
}
