// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::InvocationOutcome;
use crate::docs::DocRecord;

/// Uniform tool result: `result` on success, `error` (and maybe `detail`) on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentation: Vec<DocRecord>,
}

impl Envelope {
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            detail: None,
            documentation: vec![],
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            detail: None,
            documentation: vec![],
        }
    }
}

impl From<InvocationOutcome> for Envelope {
    fn from(outcome: InvocationOutcome) -> Self {
        match outcome {
            InvocationOutcome::Success { value, documentation } => {
                Self { documentation, ..Self::ok(value) }
            }
            InvocationOutcome::Failure { message, detail, documentation } => {
                Self { detail, documentation, ..Self::failed(message) }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InvokeMemberParams {
    /// Well-known object name or alias, e.g. `ISketchManager`, `FeatureManager` or `App`.
    pub object: String,
    pub member: String,
    /// Name-to-value map, or the same map as JSON text. Omit for no arguments.
    #[serde(default)]
    pub arguments: Option<Value>,
    /// Attach matching reference documentation to the result.
    #[serde(default)]
    pub include_documentation: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AccessPropertyParams {
    pub object: String,
    pub property: String,
    /// New value; omit (or null) to read the property.
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub include_documentation: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InspectObjectParams {
    pub object: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DocsSearchParams {
    pub query: String,
    /// Defaults to 5, capped at 50.
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DocsInterfaceParams {
    /// Interface name, e.g. `IFeatureManager`.
    pub interface: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DocsMemberParams {
    pub interface: String,
    pub member: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DocsExamplesParams {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}
