use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{expr::Expr, field::Field};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ProjectField {
    pub from: Expr,
    pub to: Field,
}

impl ProjectField {
    pub fn new(from: Expr, to: Field) -> Self {
        Self { from, to }
    }

    /// Keeps a field under its own name.
    pub fn keep(field: Field) -> Self {
        Self {
            from: Expr::Field(field.clone()),
            to: field,
        }
    }
}

impl fmt::Display for ProjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.to, self.from)
    }
}
