use hashbrown::{HashMap, HashSet};
use rebuy_types::{
    field::Field,
    summarize::{Aggregation, Summarize},
    value::{Log, Value},
};

use crate::{
    error::{StageError, error_doc},
    interpreter::{get_field_value, insert_field_value},
};

enum AggregateState {
    Count(u64),
    DCount { field: Field, seen: HashSet<Value> },
}

impl AggregateState {
    fn new(agg: &Aggregation) -> Self {
        match agg {
            Aggregation::Count => AggregateState::Count(0),
            Aggregation::DCount(field) => AggregateState::DCount {
                field: field.clone(),
                seen: HashSet::new(),
            },
        }
    }

    fn input(&mut self, log: &Log) {
        match self {
            AggregateState::Count(count) => *count += 1,
            AggregateState::DCount { field, seen } => {
                // Documents without the counted field contribute nothing.
                if let Some(value) = get_field_value(log, field)
                    && !seen.contains(value)
                {
                    seen.insert(value.clone());
                }
            }
        }
    }

    fn value(&self) -> Value {
        match self {
            AggregateState::Count(count) => Value::from(*count),
            AggregateState::DCount { seen, .. } => Value::from(seen.len()),
        }
    }
}

/// One output document per distinct key: the group-by values under their
/// output names plus the accumulated aggregates. Keys that never occur in
/// the input are never synthesized. A document missing (or null at) a
/// group-by field fails the stage.
pub fn apply(input: Vec<Log>, config: &Summarize) -> Result<Vec<Log>, StageError> {
    let mut groups: HashMap<Vec<Value>, Vec<AggregateState>> = HashMap::new();

    for log in &input {
        let mut keys = Vec::with_capacity(config.by.len());
        for by in &config.by {
            let value = get_field_value(log, &by.from).filter(|v| !v.is_null());
            let Some(value) = value else {
                return Err(StageError::MissingField {
                    field: by.from.clone(),
                    doc: error_doc(log),
                });
            };
            keys.push(value.clone());
        }

        let states = groups
            .entry(keys)
            .or_insert_with(|| config.aggs.iter().map(|(_, agg)| AggregateState::new(agg)).collect());

        for state in states.iter_mut() {
            state.input(log);
        }
    }

    let mut output = Vec::with_capacity(groups.len());
    for (keys, states) in groups {
        let mut log = Log::new();
        for (by, key) in config.by.iter().zip(keys) {
            insert_field_value(&mut log, &by.to, key);
        }
        for ((field, _), state) in config.aggs.iter().zip(states) {
            insert_field_value(&mut log, field, state.value());
        }
        output.push(log);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use rebuy_types::{field, summarize::GroupBy, value::log_from_json};
    use serde_json::json;

    use super::*;

    fn count_by(by: Vec<GroupBy>, out: &str) -> Summarize {
        Summarize {
            by,
            aggs: vec![(field!(out), Aggregation::Count)],
        }
    }

    fn sorted(mut logs: Vec<Log>) -> Vec<Log> {
        logs.sort();
        logs
    }

    #[test]
    fn counts_rows_per_composite_key() {
        let input = vec![
            log_from_json(json!({"product": "p1", "user": "u1"})),
            log_from_json(json!({"product": "p1", "user": "u1"})),
            log_from_json(json!({"product": "p1", "user": "u2"})),
            log_from_json(json!({"product": "p2", "user": "u1"})),
        ];
        let config = count_by(
            vec![GroupBy::field(field!("product")), GroupBy::field(field!("user"))],
            "order_count",
        );

        let output = sorted(apply(input, &config).unwrap());
        assert_eq!(
            output,
            sorted(vec![
                log_from_json(json!({"product": "p1", "user": "u1", "order_count": 2})),
                log_from_json(json!({"product": "p1", "user": "u2", "order_count": 1})),
                log_from_json(json!({"product": "p2", "user": "u1", "order_count": 1})),
            ])
        );
    }

    #[test]
    fn group_key_can_be_renamed() {
        let input = vec![log_from_json(json!({"orders": {"product_id": "p1"}}))];
        let config = count_by(
            vec![GroupBy::aliased(field!("orders.product_id"), field!("product_id"))],
            "order_count",
        );

        let output = apply(input, &config).unwrap();
        assert_eq!(
            output,
            vec![log_from_json(json!({"product_id": "p1", "order_count": 1}))]
        );
    }

    #[test]
    fn equal_numeric_keys_share_a_group_across_kinds() {
        let mut int_keyed = Log::new();
        int_keyed.insert("product".to_string(), Value::Int(2));
        let mut float_keyed = Log::new();
        float_keyed.insert("product".to_string(), Value::Float(2.0));

        let config = count_by(vec![GroupBy::field(field!("product"))], "order_count");

        let output = apply(vec![int_keyed, float_keyed], &config).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0]["order_count"], Value::UInt(2));
    }

    #[test]
    fn missing_group_key_fails_the_stage() {
        let input = vec![log_from_json(json!({"user": "u1"}))];
        let config = count_by(vec![GroupBy::field(field!("product"))], "order_count");

        let err = apply(input, &config).unwrap_err();
        assert!(matches!(err, StageError::MissingField { .. }));
    }

    #[test]
    fn null_group_key_is_treated_as_missing() {
        let input = vec![log_from_json(json!({"product": null}))];
        let config = count_by(vec![GroupBy::field(field!("product"))], "order_count");

        assert!(apply(input, &config).is_err());
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let config = count_by(vec![GroupBy::field(field!("product"))], "order_count");
        assert!(apply(Vec::new(), &config).unwrap().is_empty());
    }

    #[test]
    fn dcount_counts_distinct_values() {
        let input = vec![
            log_from_json(json!({"product": "p1", "user": "u1"})),
            log_from_json(json!({"product": "p1", "user": "u1"})),
            log_from_json(json!({"product": "p1", "user": "u2"})),
        ];
        let config = Summarize {
            by: vec![GroupBy::field(field!("product"))],
            aggs: vec![(field!("buyers"), Aggregation::DCount(field!("user")))],
        };

        let output = apply(input, &config).unwrap();
        assert_eq!(
            output,
            vec![log_from_json(json!({"product": "p1", "buyers": 2}))]
        );
    }
}
