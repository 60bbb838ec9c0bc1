// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lossy, total conversion of call results into transport-safe JSON.

use serde_json::{json, Map, Number, Value};

use crate::model::Variant;

/// Arrays are previewed, never dumped whole.
pub const ARRAY_PREVIEW_LIMIT: usize = 10;

pub const OPAQUE_NOTE: &str = "opaque; use a dedicated inspection operation";

/// Nested arrays deeper than this are summarized instead of expanded.
const MAX_DEPTH: usize = 16;

/// Never fails and never follows an object handle.
pub fn serialize(value: &Variant) -> Value {
    serialize_at(value, 0)
}

fn serialize_at(value: &Variant, depth: usize) -> Value {
    match value {
        Variant::Empty => Value::Null,
        Variant::Bool(flag) => Value::Bool(*flag),
        Variant::I16(int) => Value::from(*int),
        Variant::I32(int) => Value::from(*int),
        Variant::I64(int) => Value::from(*int),
        Variant::F32(float) => float_value(f64::from(*float)),
        Variant::F64(float) => float_value(*float),
        Variant::Text(text) => Value::String(text.clone()),
        Variant::Array(items) => {
            let mut out = Map::new();
            out.insert("kind".to_owned(), Value::from("array"));
            out.insert("length".to_owned(), Value::from(items.len()));
            if depth >= MAX_DEPTH {
                out.insert("note".to_owned(), Value::from("nesting too deep to expand"));
            } else {
                let preview = items
                    .iter()
                    .take(ARRAY_PREVIEW_LIMIT)
                    .map(|item| serialize_at(item, depth + 1))
                    .collect();
                out.insert("items".to_owned(), Value::Array(preview));
            }
            Value::Object(out)
        }
        Variant::Object(handle) => json!({ "kind": handle.shape_name(), "note": OPAQUE_NOTE }),
        Variant::Other { type_name, text } => json!({ "kind": type_name, "value": text }),
    }
}

fn float_value(float: f64) -> Value {
    Number::from_f64(float).map(Value::Number).unwrap_or_else(|| Value::String(float.to_string()))
}
