//! Dotted-path access into documents and predicate evaluation.

use std::borrow::Cow;

use rebuy_types::{
    expr::Expr,
    field::Field,
    value::{Log, Map, Value},
};

use crate::error::{StageError, error_doc};

pub fn get_field_value<'a>(log: &'a Log, field: &Field) -> Option<&'a Value> {
    let (last, init) = field.split_last()?;

    let mut obj = log;
    for key in init {
        obj = match obj.get(key) {
            Some(Value::Object(map)) => map,
            _ => return None,
        };
    }

    obj.get(last)
}

/// Inserts at a dotted path, creating (or overwriting) intermediate objects.
pub fn insert_field_value(log: &mut Log, field: &Field, value: Value) {
    let Some((last, init)) = field.split_last() else {
        return;
    };

    let mut obj = log;
    for key in init {
        let slot = obj
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        obj = map;
    }

    obj.insert(last.clone(), value);
}

/// Removes and returns the value at a dotted path.
pub fn extract_field(log: &mut Log, field: &Field) -> Option<Value> {
    let (last, init) = field.split_last()?;

    let mut obj = log;
    for key in init {
        obj = match obj.get_mut(key) {
            Some(Value::Object(map)) => map,
            _ => return None,
        };
    }

    obj.remove(last)
}

pub struct LogInterpreter<'a> {
    pub log: &'a Log,
}

impl<'a> LogInterpreter<'a> {
    /// Evaluates an expression to the value it selects. A referenced field
    /// that is absent from the document fails the evaluation, it is not
    /// treated as null.
    pub fn eval_value(&self, expr: &'a Expr) -> Result<Cow<'a, Value>, StageError> {
        match expr {
            Expr::Field(field) => match get_field_value(self.log, field) {
                Some(value) => Ok(Cow::Borrowed(value)),
                None => Err(StageError::MissingField {
                    field: field.clone(),
                    doc: error_doc(self.log),
                }),
            },
            Expr::Literal(value) => Ok(Cow::Borrowed(value)),
            other => self.eval_bool(other).map(|b| Cow::Owned(Value::Bool(b))),
        }
    }

    pub fn eval_bool(&self, expr: &'a Expr) -> Result<bool, StageError> {
        Ok(match expr {
            Expr::Exists(field) => get_field_value(self.log, field).is_some(),

            Expr::Or(lhs, rhs) => self.eval_bool(lhs)? || self.eval_bool(rhs)?,
            Expr::And(lhs, rhs) => self.eval_bool(lhs)? && self.eval_bool(rhs)?,
            Expr::Not(inner) => !self.eval_bool(inner)?,

            Expr::Eq(lhs, rhs) => self.eval_value(lhs)? == self.eval_value(rhs)?,
            Expr::Ne(lhs, rhs) => self.eval_value(lhs)? != self.eval_value(rhs)?,
            Expr::Gt(lhs, rhs) => self.eval_value(lhs)? > self.eval_value(rhs)?,
            Expr::Gte(lhs, rhs) => self.eval_value(lhs)? >= self.eval_value(rhs)?,
            Expr::Lt(lhs, rhs) => self.eval_value(lhs)? < self.eval_value(rhs)?,
            Expr::Lte(lhs, rhs) => self.eval_value(lhs)? <= self.eval_value(rhs)?,

            Expr::Field(..) | Expr::Literal(..) => match self.eval_value(expr)?.as_ref() {
                Value::Bool(b) => *b,
                _ => {
                    return Err(StageError::NotBoolean {
                        expr: expr.to_string(),
                        doc: error_doc(self.log),
                    });
                }
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use rebuy_types::field;
    use rebuy_types::value::log_from_json;
    use serde_json::json;

    use super::*;

    #[test]
    fn get_nested_field() {
        let log = log_from_json(json!({"a": {"b": {"c": 3}}}));
        assert_eq!(
            get_field_value(&log, &field!("a.b.c")),
            Some(&Value::UInt(3))
        );
        assert_eq!(get_field_value(&log, &field!("a.b.missing")), None);
        assert_eq!(get_field_value(&log, &field!("a.b.c.d")), None);
    }

    #[test]
    fn insert_creates_intermediate_objects() {
        let mut log = Log::new();
        insert_field_value(&mut log, &field!("a.b"), Value::from(1u64));
        assert_eq!(log, log_from_json(json!({"a": {"b": 1}})));
    }

    #[test]
    fn extract_removes_the_slot() {
        let mut log = log_from_json(json!({"a": {"b": 1, "c": 2}}));
        assert_eq!(extract_field(&mut log, &field!("a.b")), Some(Value::UInt(1)));
        assert_eq!(log, log_from_json(json!({"a": {"c": 2}})));
    }

    #[test]
    fn comparison_on_missing_field_errors() {
        let log = log_from_json(json!({"x": 1}));
        let expr = Expr::gte(Expr::field(field!("y")), Expr::literal(0i64));
        let err = LogInterpreter { log: &log }.eval_bool(&expr).unwrap_err();
        assert!(matches!(err, StageError::MissingField { .. }));
    }

    #[test]
    fn exists_on_missing_field_is_false() {
        let log = log_from_json(json!({"x": 1}));
        let interpreter = LogInterpreter { log: &log };
        assert!(interpreter.eval_bool(&Expr::Exists(field!("x"))).unwrap());
        assert!(!interpreter.eval_bool(&Expr::Exists(field!("y"))).unwrap());
    }
}
