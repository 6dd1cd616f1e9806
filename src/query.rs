//! Query string construction for list endpoints

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::{Error, Result};

/// Serialize `params` into a `?key=value&...` query string.
///
/// Keys whose value is missing, `null` or the empty string are dropped. The
/// remaining values are stringified: strings verbatim, numbers and booleans
/// through their JSON text, arrays as comma-separated elements. Returns an
/// empty string when nothing is left.
pub fn to_query<T: Serialize + ?Sized>(params: &T) -> Result<String> {
    let map = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        Value::Null => return Ok(String::new()),
        other => {
            return Err(Error::general(format!(
                "query parameters must be an object, got {}",
                other
            )))
        }
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut appended = 0;
    for (key, value) in &map {
        if let Some(text) = stringify(value) {
            serializer.append_pair(key, &text);
            appended += 1;
        }
    }

    if appended == 0 {
        return Ok(String::new());
    }
    Ok(format!("?{}", serializer.finish()))
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}
