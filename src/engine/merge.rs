use serde_json::{Number, Value};

use super::MergeError;

/// Fold `from` into `into`.
///
/// Numbers are summed and objects and arrays are merged key by key, with
/// entries missing from `into` copied over. A null on either side keeps the
/// other side. Strings are left as they are in `into`. Any other pair of
/// values is an error.
///
/// ```
/// use rs_video_poker::engine::merge_values;
/// use serde_json::json;
///
/// let mut total = json!({"trial_count": 10, "main": {"FLUSH": 1}});
/// merge_values(&mut total, &json!({"trial_count": 5, "main": {"FLUSH": 2, "STRAIGHT": 1}})).unwrap();
/// assert_eq!(json!({"trial_count": 15, "main": {"FLUSH": 3, "STRAIGHT": 1}}), total);
/// ```
pub fn merge_values(into: &mut Value, from: &Value) -> Result<(), MergeError> {
    merge_at(into, from, "$")
}

fn merge_at(into: &mut Value, from: &Value, path: &str) -> Result<(), MergeError> {
    if from.is_null() {
        return Ok(());
    }
    if into.is_null() {
        *into = from.clone();
        return Ok(());
    }
    match (into, from) {
        (Value::Number(a), Value::Number(b)) => {
            *a = add_numbers(a, b, path)?;
        }
        (Value::Object(a), Value::Object(b)) => {
            for (key, value) in b {
                match a.get_mut(key) {
                    Some(slot) => merge_at(slot, value, &format!("{path}.{key}"))?,
                    None => {
                        a.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for (i, value) in b.iter().enumerate() {
                match a.get_mut(i) {
                    Some(slot) => merge_at(slot, value, &format!("{path}[{i}]"))?,
                    None => a.push(value.clone()),
                }
            }
        }
        (Value::String(_), Value::String(_)) => {}
        (Value::Bool(_), Value::Bool(_)) => {
            return Err(MergeError::UnsupportedLeaf {
                path: path.to_string(),
                kind: "bool",
            });
        }
        (into, from) => {
            return Err(MergeError::TypeMismatch {
                path: path.to_string(),
                into: kind(into),
                from: kind(from),
            });
        }
    }
    Ok(())
}

/// Unsigned when both sides are, then signed, then floating point.
fn add_numbers(a: &Number, b: &Number, path: &str) -> Result<Number, MergeError> {
    let overflow = || MergeError::Overflow {
        path: path.to_string(),
    };
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.checked_add(y).map(Number::from).ok_or_else(overflow);
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.checked_add(y).map(Number::from).ok_or_else(overflow);
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Number::from_f64(x + y).ok_or_else(overflow),
        _ => Err(overflow()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
