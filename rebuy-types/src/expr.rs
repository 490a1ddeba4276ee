use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{field::Field, value::Value};

/// Predicate / selection expression evaluated against a single document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Field(Field),
    Literal(Value),
    Exists(Field),

    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),

    #[serde(rename = "==")]
    Eq(Box<Expr>, Box<Expr>),
    #[serde(rename = "!=")]
    Ne(Box<Expr>, Box<Expr>),
    #[serde(rename = ">")]
    Gt(Box<Expr>, Box<Expr>),
    #[serde(rename = ">=")]
    Gte(Box<Expr>, Box<Expr>),
    #[serde(rename = "<")]
    Lt(Box<Expr>, Box<Expr>),
    #[serde(rename = "<=")]
    Lte(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn field(field: Field) -> Self {
        Expr::Field(field)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn gte(lhs: Expr, rhs: Expr) -> Self {
        Expr::Gte(Box::new(lhs), Box::new(rhs))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Field(field) => write!(f, "{field}"),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Exists(field) => write!(f, "exists({field})"),

            Expr::Or(lhs, rhs) => write!(f, "({lhs} or {rhs})"),
            Expr::And(lhs, rhs) => write!(f, "({lhs} and {rhs})"),
            Expr::Not(expr) => write!(f, "not({expr})"),

            Expr::Eq(lhs, rhs) => write!(f, "({lhs} == {rhs})"),
            Expr::Ne(lhs, rhs) => write!(f, "({lhs} != {rhs})"),
            Expr::Gt(lhs, rhs) => write!(f, "({lhs} > {rhs})"),
            Expr::Gte(lhs, rhs) => write!(f, "({lhs} >= {rhs})"),
            Expr::Lt(lhs, rhs) => write!(f, "({lhs} < {rhs})"),
            Expr::Lte(lhs, rhs) => write!(f, "({lhs} <= {rhs})"),
        }
    }
}
