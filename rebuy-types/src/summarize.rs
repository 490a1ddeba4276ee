use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// One grouping key: the source field in the input documents and the name
/// it is emitted under in the grouped output.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct GroupBy {
    pub from: Field,
    pub to: Field,
}

impl GroupBy {
    /// Group by a field, keeping its name in the output.
    pub fn field(field: Field) -> Self {
        Self {
            from: field.clone(),
            to: field,
        }
    }

    /// Group by a field, emitting it under a different name.
    pub fn aliased(from: Field, to: Field) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}={}", self.to, self.from)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Number of input documents in the group.
    Count,
    /// Number of distinct values of a field in the group.
    #[serde(rename = "dcount")]
    DCount(Field),
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Count => write!(f, "count()"),
            Aggregation::DCount(field) => write!(f, "dcount({field})"),
        }
    }
}

/// Partitions documents by the `by` keys and reduces each partition to one
/// document holding the keys and the aggregate values.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Summarize {
    pub by: Vec<GroupBy>,
    pub aggs: Vec<(Field, Aggregation)>,
}

impl fmt::Display for Summarize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "by=[")?;
        for (i, by) in self.by.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{by}")?;
        }
        write!(f, "], aggs=[")?;
        for (i, (field, agg)) in self.aggs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}={agg}")?;
        }
        write!(f, "]")
    }
}
