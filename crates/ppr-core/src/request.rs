//! Render request body accepted by the preview/print collaborator
//!
//! The body is `{ "data": { "<key>": "<value>", ... }, "outputName": "..." }`.
//! `data` must be a flat mapping; scalar values are stringified, nested
//! objects and arrays are rejected.

use serde_json::Value;

use crate::error::{RequestError, Result};
use crate::flatten::FlatVariableMap;
use crate::naming::DEFAULT_STEM;

/// A validated render request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    pub data: FlatVariableMap,
    pub output_name: Option<String>,
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl RenderRequest {
    /// Parse and validate a request body
    ///
    /// # Errors
    ///
    /// Returns `RequestError` if the body is not JSON, has no `data` member,
    /// `data` is not an object, or any `data` value is an object or array.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Validate an already-parsed request body
    ///
    /// # Errors
    ///
    /// See [`RenderRequest::from_json`].
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut body) = value else {
            return Err(RequestError::MissingData);
        };
        let data = match body.remove("data") {
            None => return Err(RequestError::MissingData),
            Some(Value::Object(map)) => map,
            Some(other) => return Err(RequestError::NotAMapping(json_type(&other))),
        };

        let mut vars = FlatVariableMap::new();
        for (key, value) in data {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                nested @ (Value::Array(_) | Value::Object(_)) => {
                    return Err(RequestError::NestedValue {
                        key,
                        found: json_type(&nested),
                    })
                }
            };
            vars.insert(key, text);
        }

        let output_name = match body.remove("outputName") {
            Some(Value::String(name)) if !name.trim().is_empty() => Some(name),
            _ => None,
        };

        Ok(Self {
            data: vars,
            output_name,
        })
    }

    /// Download name for the rendered output: `outputName` if given, else `Report`
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        let stem = self.output_name.as_deref().unwrap_or(DEFAULT_STEM);
        format!("{stem}.{extension}")
    }
}
