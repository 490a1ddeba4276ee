use rebuy_types::{project::ProjectField, value::Log};

use crate::{error::StageError, interpreter::{LogInterpreter, insert_field_value}};

/// Output documents contain exactly the projected fields; everything else
/// is discarded. Missing source fields fail the stage.
pub fn apply(input: Vec<Log>, fields: &[ProjectField]) -> Result<Vec<Log>, StageError> {
    let mut output = Vec::with_capacity(input.len());

    for log in input {
        let mut projected = Log::new();

        let interpreter = LogInterpreter { log: &log };
        for field in fields {
            let value = interpreter.eval_value(&field.from)?.into_owned();
            insert_field_value(&mut projected, &field.to, value);
        }

        output.push(projected);
    }

    Ok(output)
}
