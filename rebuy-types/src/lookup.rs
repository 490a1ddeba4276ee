use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Equality enrichment from a second collection: for each left document,
/// the array of matching right documents is attached under `as_`. Left
/// documents with no match get an empty array (left-outer at this step).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lookup {
    /// (left key, right key).
    pub on: (Field, Field),

    #[serde(rename = "as")]
    pub as_: Field,
}

impl Lookup {
    pub fn new(left_on: Field, right_on: Field, as_: Field) -> Self {
        Self {
            on: (left_on, right_on),
            as_,
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "on=({}, {}), as={}", self.on.0, self.on.1, self.as_)
    }
}
