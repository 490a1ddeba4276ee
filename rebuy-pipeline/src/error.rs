use rebuy_types::{field::Field, value::Value};
use thiserror::Error;

use crate::PipelineStepKind;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure inside a single stage. Always carries the offending document;
/// malformed input is never silently coerced.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("document is missing required field '{field}': {doc}")]
    MissingField { field: Field, doc: Value },

    #[error("expected field '{field}' to be {expected}, got {actual}: {doc}")]
    UnexpectedType {
        field: Field,
        expected: &'static str,
        actual: &'static str,
        doc: Value,
    },

    #[error("expression '{expr}' did not evaluate to a boolean: {doc}")]
    NotBoolean { expr: String, doc: Value },

    #[error("cannot sort over differing types (key '{field}'): {left} != {right}")]
    MixedSortTypes {
        field: Field,
        left: &'static str,
        right: &'static str,
    },
}

/// A run-level failure. A failed run produces no results, there is no
/// partial output and no retrying inside the core.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} step failed")]
    Stage {
        stage: PipelineStepKind,
        #[source]
        source: StageError,
    },

    #[error("clock unavailable")]
    ClockUnavailable(#[source] BoxError),

    #[error("fetching '{collection}' collection failed")]
    Fetch {
        collection: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("result document is missing field '{field}': {doc}")]
    MalformedResult { field: Field, doc: Value },
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// The document as attached to error messages.
pub(crate) fn error_doc(log: &rebuy_types::value::Log) -> Value {
    Value::Object(log.clone())
}
