//! Error types for the processor module of the NEARFS pipeline.
//! Defines the errors raised while decoding actions and extracting payloads.
use thiserror::Error;

/// A malformed or unrecognized action encoding.
///
/// Actions arrive as externally tagged values: either a bare tag string or an
/// object with exactly one key. Anything else is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown action kind: {0}")]
    UnknownActionKind(String),
    #[error("Ambiguous action variant with {0} keys")]
    AmbiguousVariant(usize),
    #[error("Malformed action variant: {0}")]
    MalformedVariant(String),
    #[error("Action {kind} is missing field '{field}'")]
    MissingField { kind: String, field: &'static str },
    #[error("Invalid field '{field}' in action {kind}: {message}")]
    InvalidField {
        kind: String,
        field: &'static str,
        message: String,
    },
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Represents errors that can occur within the payload processor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Failed to decode action {index} of receipt {receipt_id}: {source}")]
    Decode {
        receipt_id: String,
        index: usize,
        #[source]
        source: DecodeError,
    },
    #[error("Invalid account pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
