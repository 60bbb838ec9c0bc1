// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Best-effort conversion of schema-less arguments into the types call sites expect.

use serde_json::Number;

use crate::model::{ArgValue, ParamType, Variant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot coerce parameter '{parameter}' from {found} to {expected}")]
pub struct CoercionError {
    pub parameter: String,
    pub expected: String,
    pub found: String,
}

impl CoercionError {
    fn new(parameter: &str, expected: &ParamType, found: impl Into<String>) -> Self {
        Self {
            parameter: parameter.to_owned(),
            expected: expected.to_string(),
            found: found.into(),
        }
    }
}

/// Converts `value` into `target`.
///
/// Null maps to `Variant::Empty` for every target. `Object` and `Any` targets pass the value
/// through uncoerced; incompatible values then fail at invocation time.
pub fn coerce(
    parameter: &str,
    value: &ArgValue,
    target: &ParamType,
) -> Result<Variant, CoercionError> {
    if matches!(value, ArgValue::Null) {
        return Ok(Variant::Empty);
    }

    match target {
        ParamType::Object | ParamType::Any => Ok(Variant::from(value)),
        numeric if numeric.is_numeric() => match value {
            ArgValue::Number(number) => coerce_number(parameter, number, numeric),
            ArgValue::Text(raw) => match serde_json::from_str::<Number>(raw.trim()) {
                Ok(number) => coerce_number(parameter, &number, numeric),
                Err(_) => Err(CoercionError::new(parameter, numeric, format!("string {raw:?}"))),
            },
            other => Err(CoercionError::new(parameter, numeric, other.kind_label())),
        },
        ParamType::Bool => match value {
            ArgValue::Bool(flag) => Ok(Variant::Bool(*flag)),
            ArgValue::Text(raw) if raw.trim().eq_ignore_ascii_case("true") => {
                Ok(Variant::Bool(true))
            }
            ArgValue::Text(raw) if raw.trim().eq_ignore_ascii_case("false") => {
                Ok(Variant::Bool(false))
            }
            other => Err(CoercionError::new(parameter, target, other.kind_label())),
        },
        ParamType::Text => match value {
            ArgValue::Text(text) => Ok(Variant::Text(text.clone())),
            ArgValue::Bool(_) | ArgValue::Number(_) => Ok(Variant::Text(value.to_string())),
            other => Err(CoercionError::new(parameter, target, other.kind_label())),
        },
        ParamType::Array(inner) => match value {
            ArgValue::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| coerce(&format!("{parameter}[{index}]"), item, inner))
                .collect::<Result<Vec<_>, _>>()
                .map(Variant::Array),
            other => Err(CoercionError::new(parameter, target, other.kind_label())),
        },
        _ => Ok(Variant::from(value)),
    }
}

fn coerce_number(
    parameter: &str,
    number: &Number,
    target: &ParamType,
) -> Result<Variant, CoercionError> {
    let out_of_range = || CoercionError::new(parameter, target, format!("number {number}"));

    match target {
        ParamType::F64 => number.as_f64().map(Variant::F64).ok_or_else(out_of_range),
        ParamType::F32 => {
            let wide = number.as_f64().ok_or_else(out_of_range)?;
            let narrow = wide as f32;
            if narrow.is_finite() {
                Ok(Variant::F32(narrow))
            } else {
                Err(out_of_range())
            }
        }
        ParamType::I16 => integral(number)
            .and_then(|int| i16::try_from(int).ok())
            .map(Variant::I16)
            .ok_or_else(out_of_range),
        ParamType::I32 => integral(number)
            .and_then(|int| i32::try_from(int).ok())
            .map(Variant::I32)
            .ok_or_else(out_of_range),
        ParamType::I64 => integral(number).map(Variant::I64).ok_or_else(out_of_range),
        _ => Err(out_of_range()),
    }
}

/// The number as an `i64` when it has no fractional part and fits.
fn integral(number: &Number) -> Option<i64> {
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    let float = number.as_f64()?;
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{coerce, CoercionError};
    use crate::model::{ArgValue, ParamType, Variant};

    fn arg(value: serde_json::Value) -> ArgValue {
        ArgValue::from(&value)
    }

    #[test]
    fn integer_widens_to_float() {
        assert_eq!(coerce("radius", &arg(json!(5)), &ParamType::F64), Ok(Variant::F64(5.0)));
        assert_eq!(coerce("radius", &arg(json!(5)), &ParamType::F32), Ok(Variant::F32(5.0)));
    }

    #[test]
    fn number_to_bool_is_a_coercion_error() {
        assert_eq!(
            coerce("Append", &arg(json!(5)), &ParamType::Bool),
            Err(CoercionError {
                parameter: "Append".to_owned(),
                expected: "bool".to_owned(),
                found: "number".to_owned(),
            })
        );
    }

    #[rstest]
    #[case(json!(7), ParamType::I16, Variant::I16(7))]
    #[case(json!(7.0), ParamType::I32, Variant::I32(7))]
    #[case(json!(-3), ParamType::I64, Variant::I64(-3))]
    #[case(json!("12"), ParamType::I32, Variant::I32(12))]
    #[case(json!(" 2.5 "), ParamType::F64, Variant::F64(2.5))]
    #[case(json!("TRUE"), ParamType::Bool, Variant::Bool(true))]
    #[case(json!(false), ParamType::Bool, Variant::Bool(false))]
    #[case(json!("Line1"), ParamType::Text, Variant::Text("Line1".to_owned()))]
    #[case(json!(42), ParamType::Text, Variant::Text("42".to_owned()))]
    #[case(json!(null), ParamType::F64, Variant::Empty)]
    #[case(json!(3), ParamType::Any, Variant::I32(3))]
    fn coerces_supported_shapes(
        #[case] value: serde_json::Value,
        #[case] target: ParamType,
        #[case] expected: Variant,
    ) {
        assert_eq!(coerce("p", &arg(value), &target), Ok(expected));
    }

    #[rstest]
    #[case(json!(2.5), ParamType::I32)]
    #[case(json!(70000), ParamType::I16)]
    #[case(json!(1e300), ParamType::F32)]
    #[case(json!("abc"), ParamType::F64)]
    #[case(json!("yes"), ParamType::Bool)]
    #[case(json!([1, 2]), ParamType::Text)]
    #[case(json!({ "x": 1 }), ParamType::F64)]
    #[case(json!(1), ParamType::Array(Box::new(ParamType::F64)))]
    fn rejects_incompatible_shapes(#[case] value: serde_json::Value, #[case] target: ParamType) {
        let err = coerce("p", &arg(value), &target).expect_err("coercion should fail");
        assert_eq!(err.parameter, "p");
        assert_eq!(err.expected, target.to_string());
    }

    #[test]
    fn sequences_coerce_elementwise_and_name_the_failing_element() {
        let target = ParamType::Array(Box::new(ParamType::F64));
        assert_eq!(
            coerce("points", &arg(json!([0, 1.5, "2"])), &target),
            Ok(Variant::Array(vec![Variant::F64(0.0), Variant::F64(1.5), Variant::F64(2.0)]))
        );

        let err = coerce("points", &arg(json!([0, true])), &target).expect_err("bad element");
        assert_eq!(err.parameter, "points[1]");
    }
}
