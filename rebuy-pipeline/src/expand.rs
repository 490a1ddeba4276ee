use rebuy_types::{expand::Expand, value::{Log, Value}};

use crate::{
    error::{StageError, error_doc},
    interpreter::{extract_field, insert_field_value},
};

/// One output document per element of the expanded array, the element
/// replacing the slot on a shallow copy of the parent. Documents whose slot
/// is missing, null or an empty array produce nothing (inner-flatten).
pub fn apply(input: Vec<Log>, config: &Expand) -> Result<Vec<Log>, StageError> {
    let mut output = Vec::with_capacity(input.len());

    for mut log in input {
        match extract_field(&mut log, &config.field) {
            None | Some(Value::Null) => {}
            Some(Value::Array(elements)) => {
                let mut elements = elements.into_iter().peekable();
                while let Some(element) = elements.next() {
                    // The parent is reused for the last element instead of
                    // cloned.
                    let mut expanded = if elements.peek().is_some() {
                        log.clone()
                    } else {
                        std::mem::take(&mut log)
                    };
                    insert_field_value(&mut expanded, &config.field, element);
                    output.push(expanded);
                }
            }
            Some(other) => {
                let actual = other.kind();
                insert_field_value(&mut log, &config.field, other);
                return Err(StageError::UnexpectedType {
                    field: config.field.clone(),
                    expected: "array",
                    actual,
                    doc: error_doc(&log),
                });
            }
        }
    }

    Ok(output)
}
