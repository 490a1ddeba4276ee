use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Flattens a nested array field: one output document per element, the
/// element replacing the named slot. Parents with a missing or empty slot
/// produce no output.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Expand {
    pub field: Field,
}

impl Expand {
    pub fn new(field: Field) -> Self {
        Self { field }
    }
}

impl fmt::Display for Expand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field={}", self.field)
    }
}
