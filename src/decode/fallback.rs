//! Closed string enumerations that tolerate values added to the API later.

use serde_json::Value;
use tracing::debug;

use crate::decode::fields::leaf;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::Result;

pub trait FallbackEnum: Copy + PartialEq + 'static {
    const TYPE_NAME: &'static str;
    /// Wire literals and their members, in declaration order.
    const KNOWN: &'static [(&'static str, Self)];
    /// Literal written for the catch-all member, and the member itself.
    const UNKNOWN: (&'static str, Self);

    fn as_str(self) -> &'static str {
        Self::KNOWN
            .iter()
            .find(|(_, member)| *member == self)
            .map(|(literal, _)| *literal)
            .unwrap_or(Self::UNKNOWN.0)
    }

    fn from_wire(raw: &str) -> Option<Self> {
        Self::KNOWN
            .iter()
            .find(|(literal, _)| *literal == raw)
            .map(|(_, member)| *member)
    }
}

/// Maps `raw` to its member, falling back to the unknown member with a diagnostic.
pub fn resolve<E: FallbackEnum>(raw: &str, path: &str, sink: &mut dyn DiagnosticSink) -> E {
    if let Some(member) = E::from_wire(raw) {
        return member;
    }
    if raw == E::UNKNOWN.0 {
        debug!("{} at `{}` re-read as unknown", E::TYPE_NAME, path);
        return E::UNKNOWN.1;
    }
    sink.report(Diagnostic::UnrecognizedEnumValue {
        type_name: E::TYPE_NAME,
        value: raw.to_string(),
        path: path.to_string(),
    });
    E::UNKNOWN.1
}

/// Decodes a present value; anything other than a string fails.
pub(crate) fn decode<E: FallbackEnum>(
    value: &Value,
    path: String,
    sink: &mut dyn DiagnosticSink,
) -> Result<E> {
    let raw: String = leaf(value, path.clone())?;
    Ok(resolve(&raw, &path, sink))
}
