use rebuy_types::{expr::Expr, value::Log};

use crate::{error::StageError, interpreter::LogInterpreter};

/// Retains documents satisfying the predicate, preserving their relative
/// order. A document missing a field the predicate compares against fails
/// the stage.
pub fn apply(input: Vec<Log>, predicate: &Expr) -> Result<Vec<Log>, StageError> {
    let mut output = Vec::with_capacity(input.len());

    for log in input {
        let keep = LogInterpreter { log: &log }.eval_bool(predicate)?;
        if keep {
            output.push(log);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use rebuy_types::{field, value::log_from_json};
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    #[test_case(1, false; "below threshold")]
    #[test_case(2, true; "at threshold")]
    #[test_case(3, true; "above threshold")]
    fn count_threshold(count: i64, kept: bool) {
        let predicate = Expr::gte(Expr::field(field!("order_count")), Expr::literal(2i64));
        let input = vec![log_from_json(json!({"order_count": count}))];

        let output = apply(input, &predicate).unwrap();
        assert_eq!(!output.is_empty(), kept);
    }

    #[test]
    fn survivors_keep_input_order() {
        let predicate = Expr::gte(Expr::field(field!("n")), Expr::literal(2i64));
        let input: Vec<Log> = (0..6)
            .map(|n| log_from_json(json!({"n": n})))
            .collect();

        let output = apply(input, &predicate).unwrap();
        let ns: Vec<u64> = output.iter().map(|log| log["n"].as_u64().unwrap()).collect();
        assert_eq!(ns, vec![2, 3, 4, 5]);
    }

    #[test]
    fn missing_field_fails_the_stage() {
        let predicate = Expr::gte(Expr::field(field!("order_count")), Expr::literal(2i64));
        let input = vec![log_from_json(json!({"something_else": 1}))];

        let err = apply(input, &predicate).unwrap_err();
        assert!(matches!(err, StageError::MissingField { .. }));
    }
}
