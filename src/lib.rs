//! Typed decoding of Gemini `generateContent` response documents.
//!
//! Raw JSON is validated field by field into [`GenerateContentResponse`].
//! Values the decoder does not recognize in enumerations and open unions are
//! tolerated and reported through a [`DiagnosticSink`] rather than failing.

pub mod decode;
pub mod diagnostics;
pub mod error;
pub mod gemini;

pub use decode::{decode_response, decode_response_value};
pub use diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink, TracingSink};
pub use error::{GeminiError, Result};
pub use gemini::{decode_stream, merge_chunks, GenerateContentResponse};
