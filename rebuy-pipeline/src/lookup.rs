use hashbrown::HashMap;
use rebuy_types::{
    lookup::Lookup,
    value::{Log, Value},
};
use tracing::debug;

use crate::{
    error::{StageError, error_doc},
    interpreter::{get_field_value, insert_field_value},
};

/// Hash join of the batch against the right collection; each left document
/// gets the array of matching right documents attached under the configured
/// slot. No match attaches an empty array (left-outer), the caller decides
/// whether to drop such rows by expanding the slot afterwards.
pub fn apply(input: Vec<Log>, config: &Lookup, right: &[Log]) -> Result<Vec<Log>, StageError> {
    let (left_key, right_key) = &config.on;

    let mut table: HashMap<&Value, Vec<&Log>> = HashMap::new();
    for doc in right {
        // Right documents without the key can never match.
        let Some(value) = get_field_value(doc, right_key) else {
            continue;
        };
        table.entry(value).or_default().push(doc);
    }

    let mut output = Vec::with_capacity(input.len());
    for mut log in input {
        let matches = {
            let Some(value) = get_field_value(&log, left_key) else {
                return Err(StageError::MissingField {
                    field: left_key.clone(),
                    doc: error_doc(&log),
                });
            };

            match table.get(value) {
                Some(docs) => docs
                    .iter()
                    .map(|doc| Value::Object((*doc).clone()))
                    .collect(),
                None => {
                    debug!(key = %value, "no match in right collection");
                    Vec::new()
                }
            }
        };

        insert_field_value(&mut log, &config.as_, Value::Array(matches));
        output.push(log);
    }

    Ok(output)
}
