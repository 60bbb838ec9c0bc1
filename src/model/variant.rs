// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::Arc;

use crate::session::LiveObject;

use super::value::ArgValue;

/// Weak, non-owning reference into the external object graph.
///
/// The external application owns the object's lifetime; every call through the handle may fail
/// because the object went away between two requests.
pub type ObjectHandle = Arc<dyn LiveObject>;

/// A value exchanged with the external application.
#[derive(Clone)]
pub enum Variant {
    Empty,
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(String),
    Array(Vec<Variant>),
    /// A live external object. Never decomposed structurally.
    Object(ObjectHandle),
    /// Anything the backend could not map onto the other variants.
    Other { type_name: String, text: String },
}

impl Variant {
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Bool(_) => "bool",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Text(_) => "text",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Other { .. } => "other",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::I16(value) => Some(f64::from(*value)),
            Self::I32(value) => Some(f64::from(*value)),
            Self::I64(value) => Some(*value as f64),
            Self::F32(value) => Some(f64::from(*value)),
            Self::F64(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Self::Object(handle) => Some(handle),
            _ => None,
        }
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::I16(value) => f.debug_tuple("I16").field(value).finish(),
            Self::I32(value) => f.debug_tuple("I32").field(value).finish(),
            Self::I64(value) => f.debug_tuple("I64").field(value).finish(),
            Self::F32(value) => f.debug_tuple("F32").field(value).finish(),
            Self::F64(value) => f.debug_tuple("F64").field(value).finish(),
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
            // Only the shape name: formatting must not walk the external object.
            Self::Object(handle) => write!(f, "Object({})", handle.shape_name()),
            Self::Other { type_name, text } => {
                f.debug_struct("Other").field("type_name", type_name).field("text", text).finish()
            }
        }
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (
                Self::Other { type_name: a_type, text: a_text },
                Self::Other { type_name: b_type, text: b_text },
            ) => a_type == b_type && a_text == b_text,
            _ => false,
        }
    }
}

/// Uncoerced conversion used when no target type is known.
impl From<&ArgValue> for Variant {
    fn from(value: &ArgValue) -> Self {
        match value {
            ArgValue::Null => Self::Empty,
            ArgValue::Bool(value) => Self::Bool(*value),
            ArgValue::Number(number) => {
                if let Some(int) = number.as_i64() {
                    match i32::try_from(int) {
                        Ok(narrow) => Self::I32(narrow),
                        Err(_) => Self::I64(int),
                    }
                } else {
                    Self::F64(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            ArgValue::Text(value) => Self::Text(value.clone()),
            ArgValue::Sequence(items) => Self::Array(items.iter().map(Self::from).collect()),
            ArgValue::Mapping(_) => Self::Text(value.to_json().to_string()),
        }
    }
}
