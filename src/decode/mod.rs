//! Turns an untyped JSON response tree into the typed response model.

pub(crate) mod candidate;
pub(crate) mod envelope;
pub mod fallback;
pub(crate) mod fields;
pub(crate) mod grounding;
pub(crate) mod union;

pub use envelope::{decode_response, decode_response_value};
pub use fallback::FallbackEnum;
