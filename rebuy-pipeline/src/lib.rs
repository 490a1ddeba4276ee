//! Batch document pipeline: ordered, pure transformation stages threaded
//! over a collection of schemaless documents
//! ([`Log`](rebuy_types::value::Log)s), plus the fixed repeat-buyers
//! report built from them.

use std::fmt;

use kinded::Kinded;
use rebuy_types::{
    expand::Expand, expr::Expr, lookup::Lookup, project::ProjectField, sort::Sort,
    summarize::Summarize, value::Log,
};
use tracing::debug;

use crate::error::{PipelineError, Result, StageError};

pub mod error;
pub mod expand;
pub mod filter;
pub mod interpreter;
pub mod lookup;
pub mod project;
pub mod report;
pub mod sort;
pub mod source;
pub mod summarize;

#[cfg(test)]
mod test_utils;

#[derive(Kinded, Clone, Debug, PartialEq)]
#[kinded(display = "snake_case")]
pub enum PipelineStep {
    /// Flatten a nested array field, one document per element.
    Expand(Expand),

    /// Keep only documents satisfying a predicate.
    Filter(Expr),

    /// Group by keys and reduce each group to one document.
    Summarize(Summarize),

    /// Stable multi-key ordering of the whole batch.
    Sort(Vec<Sort>),

    /// Attach matching documents from a second collection.
    Lookup(Lookup, Vec<Log>),

    /// Select the output shape, discarding everything else.
    Project(Vec<ProjectField>),
}

impl PipelineStep {
    fn apply(&self, input: Vec<Log>) -> std::result::Result<Vec<Log>, StageError> {
        match self {
            PipelineStep::Expand(config) => expand::apply(input, config),
            PipelineStep::Filter(predicate) => filter::apply(input, predicate),
            PipelineStep::Summarize(config) => summarize::apply(input, config),
            PipelineStep::Sort(sorts) => sort::apply(input, sorts),
            PipelineStep::Lookup(config, right) => lookup::apply(input, config, right),
            PipelineStep::Project(fields) => project::apply(input, fields),
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStep::Expand(config) => write!(f, "expand({config})"),
            PipelineStep::Filter(predicate) => write!(f, "filter({predicate})"),
            PipelineStep::Summarize(config) => write!(f, "summarize({config})"),
            PipelineStep::Sort(sorts) => {
                write!(f, "sort(")?;
                for (i, sort) in sorts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{sort}")?;
                }
                write!(f, ")")
            }
            PipelineStep::Lookup(config, right) => {
                write!(f, "lookup({config}, right_docs={})", right.len())
            }
            PipelineStep::Project(fields) => {
                write!(f, "project(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// An ordered list of stages. Each stage's complete output is the next
/// stage's complete input; the first stage failure aborts the run with no
/// partial results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
}

impl Pipeline {
    pub fn new(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn execute(&self, input: Vec<Log>) -> Result<Vec<Log>> {
        let mut docs = input;

        for step in &self.steps {
            let rows_in = docs.len();
            docs = step.apply(docs).map_err(|source| PipelineError::Stage {
                stage: step.kind(),
                source,
            })?;
            debug!(step = %step, rows_in, rows_out = docs.len(), "executed pipeline step");
        }

        Ok(docs)
    }
}
