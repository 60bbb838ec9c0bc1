// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde_json::{Number, Value};
use smallvec::SmallVec;

/// A caller-supplied, schema-less value.
///
/// This is the universal JSON shape closed over before any coercion happens, so coercion can be a
/// pure function of `(ArgValue, ParamType)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Sequence(Vec<ArgValue>),
    /// Keys keep the caller's order.
    Mapping(Vec<(String, ArgValue)>),
}

impl ArgValue {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Sequence(_) => "array",
            Self::Mapping(_) => "object",
        }
    }

    /// Parses raw text as JSON, falling back to a plain string when it is not valid JSON.
    pub fn from_loose_text(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from(&value),
            Err(_) => Self::Text(raw.to_owned()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Number(value) => Value::Number(value.clone()),
            Self::Text(value) => Value::String(value.clone()),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Mapping(entries) => Value::Object(
                entries.iter().map(|(key, value)| (key.clone(), value.to_json())).collect(),
            ),
        }
    }
}

impl From<&Value> for ArgValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(*value),
            Value::Number(value) => Self::Number(value.clone()),
            Value::String(value) => Self::Text(value.clone()),
            Value::Array(items) => Self::Sequence(items.iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Mapping(
                entries.iter().map(|(key, value)| (key.clone(), Self::from(value))).collect(),
            ),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentsError {
    #[error("arguments must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("arguments are not valid JSON: {0}")]
    InvalidJson(String),
}

/// Named call arguments in the order the caller declared them.
///
/// Order matters: the generic invocation tier passes values positionally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: SmallVec<[(String, ArgValue); 6]>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a JSON object, JSON text holding an object, or null/empty text for no arguments.
    pub fn from_json(value: &Value) -> Result<Self, ArgumentsError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(entries) => Ok(entries
                .iter()
                .map(|(name, value)| (name.clone(), ArgValue::from(value)))
                .collect()),
            Value::String(raw) => Self::parse(raw),
            other => Err(ArgumentsError::NotAnObject(ArgValue::from(other).kind_label())),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ArgumentsError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::new());
        }
        let value = serde_json::from_str::<Value>(trimmed)
            .map_err(|err| ArgumentsError::InvalidJson(err.to_string()))?;
        match value {
            Value::String(_) => Err(ArgumentsError::NotAnObject("string")),
            other => Self::from_json(&other),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: ArgValue) {
        self.entries.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by parameter name; the first declaration wins.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &ArgValue> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl FromIterator<(String, ArgValue)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ArgValue, Arguments, ArgumentsError};

    #[test]
    fn arguments_preserve_declared_order() {
        let args =
            Arguments::from_json(&json!({ "z": 1, "a": 2, "m": 3 })).expect("arguments from json");
        let names = args.iter().map(|(name, _)| name.to_owned()).collect::<Vec<_>>();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn arguments_accept_json_text_and_empty_text() {
        let args = Arguments::from_json(&json!("{\"x1\": 0, \"y1\": 1}")).expect("parse text");
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("Y1"), Some(&ArgValue::Number(1.into())));

        assert!(Arguments::parse("   ").expect("empty text").is_empty());
        assert!(Arguments::from_json(&json!(null)).expect("null").is_empty());
    }

    #[test]
    fn arguments_reject_non_objects() {
        assert_eq!(Arguments::from_json(&json!([1, 2])), Err(ArgumentsError::NotAnObject("array")));
        assert_eq!(Arguments::parse("\"x\""), Err(ArgumentsError::NotAnObject("string")));
        assert!(matches!(Arguments::parse("{nope"), Err(ArgumentsError::InvalidJson(_))));
    }

    #[test]
    fn loose_text_falls_back_to_string() {
        assert_eq!(ArgValue::from_loose_text("false"), ArgValue::Bool(false));
        assert_eq!(ArgValue::from_loose_text("Part1"), ArgValue::Text("Part1".to_owned()));
    }
}
