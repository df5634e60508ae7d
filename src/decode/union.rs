//! Unions identified by which of their mutually exclusive keys is present.

use serde_json::Value;
use tracing::debug;

use crate::decode::fields::Object;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{GeminiError, Result};

pub(crate) type VariantDecoder<T> = fn(&Value, String) -> Result<T>;

pub(crate) enum Resolution<T> {
    Matched(T),
    /// No key matched; holds the first failure from a key that was present.
    Unmatched(Option<GeminiError>),
}

/// Probes `variants` in order; the first present key that decodes wins.
pub(crate) fn probe<T>(obj: &Object<'_>, variants: &[(&'static str, VariantDecoder<T>)]) -> Resolution<T> {
    let mut failure = None;
    for (key, decode) in variants {
        let Some(value) = obj.get(key) else {
            continue;
        };
        match decode(value, obj.field_path(key)) {
            Ok(variant) => return Resolution::Matched(variant),
            Err(err) => {
                debug!("Variant `{}` at `{}` did not decode: {}", key, obj.path(), err);
                failure.get_or_insert(err);
            }
        }
    }
    Resolution::Unmatched(failure)
}

/// Resolves a union that has a catch-all member; never fails.
pub(crate) fn resolve_open<T>(
    obj: &Object<'_>,
    type_name: &'static str,
    variants: &[(&'static str, VariantDecoder<T>)],
    unknown: T,
    sink: &mut dyn DiagnosticSink,
) -> T {
    match probe(obj, variants) {
        Resolution::Matched(variant) => variant,
        Resolution::Unmatched(_) => {
            sink.report(Diagnostic::UnresolvedUnionVariant {
                type_name,
                keys: obj.keys(),
                path: obj.path().to_string(),
            });
            unknown
        }
    }
}

/// Resolves a union with no catch-all member; an unmatched object fails.
pub(crate) fn resolve_closed<T>(
    obj: &Object<'_>,
    type_name: &'static str,
    variants: &[(&'static str, VariantDecoder<T>)],
) -> Result<T> {
    match probe(obj, variants) {
        Resolution::Matched(variant) => Ok(variant),
        Resolution::Unmatched(Some(err)) => Err(err),
        Resolution::Unmatched(None) => {
            let expected: Vec<&str> = variants.iter().map(|(key, _)| *key).collect();
            Err(GeminiError::DataCorrupted {
                path: obj.path().to_string(),
                reason: format!("{} has none of the keys [{}]", type_name, expected.join(", ")),
            })
        }
    }
}
