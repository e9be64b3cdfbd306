//! Mustache templates filled from the JSON data record.
//!
//! Keys holding `null` are left out of the template context, so they render
//! empty and skip their sections. Numbers are rendered as text.

use std::collections::HashMap;

use mustache::Data;
use serde_json::Value;

use crate::ports::RenderError;

/// Converts the data record into a mustache context.
pub fn to_context(value: &Value) -> Data {
    match value {
        Value::Null => Data::Map(HashMap::new()),
        Value::Bool(b) => Data::Bool(*b),
        Value::Number(n) => Data::String(n.to_string()),
        Value::String(s) => Data::String(s.clone()),
        Value::Array(items) => Data::Vec(
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(to_context)
                .collect(),
        ),
        Value::Object(map) => Data::Map(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), to_context(v)))
                .collect(),
        ),
    }
}

/// Compiles `source` and renders it against `data`.
pub fn render_template(source: &str, data: &Value) -> Result<String, RenderError> {
    let template =
        mustache::compile_str(source).map_err(|e| RenderError::Template(e.to_string()))?;

    let mut out = Vec::new();
    template
        .render_data(&mut out, &to_context(data))
        .map_err(|e| RenderError::Template(e.to_string()))?;

    String::from_utf8(out).map_err(|e| RenderError::Template(e.to_string()))
}
