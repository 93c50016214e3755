pub mod impact;
pub mod regulatory;
pub mod stress;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Set `doc[path[0]][path[1]]...` to `value`, creating objects on the way.
pub(crate) fn set_field(doc: &mut Value, path: &[&str], value: Value) -> Result<(), String> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };
    let mut node = doc;
    for key in parents {
        let map = node
            .as_object_mut()
            .ok_or_else(|| format!("expected an object above '{}'", key))?;
        node = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    node.as_object_mut()
        .ok_or_else(|| format!("expected an object above '{}'", last))?
        .insert(last.to_string(), value);
    Ok(())
}

/// Apply an optional decimal override from a command-line flag.
pub(crate) fn override_decimal(
    doc: &mut Value,
    path: &[&str],
    value: Option<Decimal>,
) -> Result<(), String> {
    match value {
        Some(v) => set_field(doc, path, Value::String(v.to_string())),
        None => Ok(()),
    }
}
