// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smol_str::SmolStr;

use super::variant::Variant;

/// Target type descriptor for a parameter or property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    I16,
    I32,
    I64,
    F32,
    F64,
    Text,
    Array(Box<ParamType>),
    Object,
    Any,
}

impl ParamType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::I16 | Self::I32 | Self::I64 | Self::F32 | Self::F64)
    }

    /// Whether `value` already has this shape; `Empty` is accepted everywhere.
    pub fn admits(&self, value: &Variant) -> bool {
        match (self, value) {
            (_, Variant::Empty) | (Self::Any, _) => true,
            (Self::Bool, Variant::Bool(_))
            | (Self::I16, Variant::I16(_))
            | (Self::I32, Variant::I32(_))
            | (Self::I64, Variant::I64(_))
            | (Self::F32, Variant::F32(_))
            | (Self::F64, Variant::F64(_))
            | (Self::Text, Variant::Text(_))
            | (Self::Object, Variant::Object(_)) => true,
            (Self::Array(inner), Variant::Array(items)) => {
                items.iter().all(|item| inner.admits(item))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::Text => f.write_str("text"),
            Self::Array(inner) => write!(f, "array<{inner}>"),
            Self::Object => f.write_str("object"),
            Self::Any => f.write_str("any"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSignature {
    pub name: SmolStr,
    pub ty: ParamType,
    pub default: Option<Variant>,
}

impl ParamSignature {
    pub fn required(name: impl Into<SmolStr>, ty: ParamType) -> Self {
        Self { name: name.into(), ty, default: None }
    }

    pub fn optional(name: impl Into<SmolStr>, ty: ParamType, default: Variant) -> Self {
        Self { name: name.into(), ty, default: Some(default) }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// One enumerable method overload.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: SmolStr,
    pub params: Vec<ParamSignature>,
    pub returns: ParamType,
}

impl MethodSignature {
    pub fn new(name: impl Into<SmolStr>, params: Vec<ParamSignature>, returns: ParamType) -> Self {
        Self { name: name.into(), params, returns }
    }

    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|param| param.is_required()).count()
    }

    pub fn total_count(&self) -> usize {
        self.params.len()
    }

    /// `required ≤ supplied ≤ total`.
    pub fn accepts(&self, supplied: usize) -> bool {
        self.required_count() <= supplied && supplied <= self.total_count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySignature {
    pub name: SmolStr,
    pub ty: ParamType,
    pub writable: bool,
}

impl PropertySignature {
    pub fn new(name: impl Into<SmolStr>, ty: ParamType, writable: bool) -> Self {
        Self { name: name.into(), ty, writable }
    }
}
