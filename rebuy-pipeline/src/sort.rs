use std::cmp::Ordering;

use rayon::slice::ParallelSliceMut;
use rebuy_types::{
    sort::{NullsOrder, Sort, SortOrder},
    value::{Log, Value},
};

use crate::{error::StageError, interpreter::get_field_value};

/// Below this, sorting in parallel costs more than it saves.
const PARALLEL_SORT_THRESHOLD: usize = 5000;

/// Comparable family of a sort key value; all numeric kinds order against
/// each other so they share one family.
fn sort_family(value: &Value) -> &'static str {
    match value {
        Value::Int(..) | Value::UInt(..) | Value::Float(..) => "number",
        other => other.kind(),
    }
}

fn cmp_logs(a: &Log, b: &Log, sorts: &[Sort]) -> Ordering {
    for sort in sorts {
        let a_val = get_field_value(a, &sort.by).unwrap_or(&Value::Null);
        let b_val = get_field_value(b, &sort.by).unwrap_or(&Value::Null);

        let mut any_null = true;
        let ordering = match (a_val, b_val, &sort.nulls) {
            (Value::Null, Value::Null, _) => Ordering::Equal,
            (Value::Null, _, NullsOrder::First) => Ordering::Less,
            (_, Value::Null, NullsOrder::First) => Ordering::Greater,
            (Value::Null, _, NullsOrder::Last) => Ordering::Greater,
            (_, Value::Null, NullsOrder::Last) => Ordering::Less,
            _ => {
                any_null = false;
                a_val.cmp(b_val)
            }
        };

        if ordering == Ordering::Equal {
            continue;
        }

        // Nulls keep their configured end regardless of asc/desc.
        if any_null {
            return ordering;
        }

        return if sort.order == SortOrder::Asc {
            ordering
        } else {
            ordering.reverse()
        };
    }

    Ordering::Equal
}

fn check_key_types(input: &[Log], sorts: &[Sort]) -> Result<(), StageError> {
    let mut tracked = vec![None; sorts.len()];

    for log in input {
        for (tracked_family, sort) in tracked.iter_mut().zip(sorts) {
            let Some(value) = get_field_value(log, &sort.by) else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            let family = sort_family(value);
            match tracked_family {
                Some(seen) if *seen != family => {
                    return Err(StageError::MixedSortTypes {
                        field: sort.by.clone(),
                        left: *seen,
                        right: family,
                    });
                }
                Some(_) => {}
                None => *tracked_family = Some(family),
            }
        }
    }

    Ok(())
}

/// Stable multi-key sort of the whole batch. Key values of differing
/// non-null type families fail the stage, the output order would otherwise
/// depend on an arbitrary cross-type ranking.
pub fn apply(mut input: Vec<Log>, sorts: &[Sort]) -> Result<Vec<Log>, StageError> {
    check_key_types(&input, sorts)?;

    if input.len() < PARALLEL_SORT_THRESHOLD {
        input.sort_by(|a, b| cmp_logs(a, b, sorts));
    } else {
        input.par_sort_by(|a, b| cmp_logs(a, b, sorts));
    }

    Ok(input)
}

#[cfg(test)]
mod tests {
    use rebuy_types::{field, value::log_from_json};
    use serde_json::json;

    use super::*;

    fn counts(logs: &[Log]) -> Vec<(u64, &str)> {
        logs.iter()
            .map(|log| {
                (
                    log["count"].as_u64().unwrap(),
                    log["id"].as_str().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn desc_count_then_asc_id() {
        let input = vec![
            log_from_json(json!({"id": "p3", "count": 1})),
            log_from_json(json!({"id": "p2", "count": 2})),
            log_from_json(json!({"id": "p1", "count": 2})),
        ];
        let sorts = [Sort::desc(field!("count")), Sort::asc(field!("id"))];

        let output = apply(input, &sorts).unwrap();
        assert_eq!(counts(&output), vec![(2, "p1"), (2, "p2"), (1, "p3")]);
    }

    #[test]
    fn nulls_last_even_when_descending() {
        let input = vec![
            log_from_json(json!({"id": "a"})),
            log_from_json(json!({"id": "b", "count": 1})),
        ];
        let sorts = [Sort::desc(field!("count"))];

        let output = apply(input, &sorts).unwrap();
        assert_eq!(output[0]["id"].as_str(), Some("b"));
        assert_eq!(output[1]["id"].as_str(), Some("a"));
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let input: Vec<Log> = (0..10)
            .map(|i| log_from_json(json!({"id": format!("p{i}"), "count": 7})))
            .collect();
        let expected = input.clone();

        let output = apply(input, &[Sort::desc(field!("count"))]).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn mixed_key_types_fail_the_stage() {
        let input = vec![
            log_from_json(json!({"count": 1})),
            log_from_json(json!({"count": "one"})),
        ];

        let err = apply(input, &[Sort::asc(field!("count"))]).unwrap_err();
        assert!(matches!(err, StageError::MixedSortTypes { .. }));
    }

    #[test]
    fn int_and_uint_share_a_family() {
        let input = vec![
            log_from_json(json!({"count": -1})),
            log_from_json(json!({"count": 3})),
        ];

        let output = apply(input, &[Sort::asc(field!("count"))]).unwrap();
        assert_eq!(output[0]["count"], Value::Int(-1));
    }
}
