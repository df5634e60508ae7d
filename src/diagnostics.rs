//! Side channel for non-fatal conditions found while decoding or reading a response.

use std::fmt;

use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A closed string enumeration carried a value this crate does not know.
    UnrecognizedEnumValue {
        type_name: &'static str,
        value: String,
        path: String,
    },
    /// A union object matched none of its known keys and decoded to `Unknown`.
    UnresolvedUnionVariant {
        type_name: &'static str,
        keys: Vec<String>,
        path: String,
    },
    /// Text was requested from a response that has no candidates.
    NoCandidates,
    /// The first candidate has no part that renders as text.
    NoText,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedEnumValue {
                type_name,
                value,
                path,
            } => write!(
                f,
                "unrecognized {} value {:?} at `{}`, decoded as unknown",
                type_name, value, path
            ),
            Self::UnresolvedUnionVariant {
                type_name,
                keys,
                path,
            } => write!(
                f,
                "unrecognized {} at `{}` (keys: {}), decoded as unknown",
                type_name,
                path,
                keys.join(", ")
            ),
            Self::NoCandidates => write!(f, "could not get text from a response with no candidates"),
            Self::NoText => write!(f, "could not get a text part from the first candidate"),
        }
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
    }
}

/// Collects diagnostics in the order they were reported.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}
