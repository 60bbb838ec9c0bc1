// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions: parameter checks, result limits and envelope mapping.
const DEFAULT_MAX_RESULTS: usize = 5;
const MAX_RESULTS_CAP: usize = 50;

fn result_limit(max_results: Option<usize>) -> usize {
    max_results.unwrap_or(DEFAULT_MAX_RESULTS).min(MAX_RESULTS_CAP)
}

fn require_name(field: &'static str, value: &str) -> Result<(), ErrorData> {
    if value.trim().is_empty() {
        return Err(ErrorData::invalid_params(
            format!("`{field}` must not be empty"),
            Some(serde_json::json!({ field: value })),
        ));
    }
    Ok(())
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, ErrorData> {
    serde_json::to_value(value).map_err(|err| {
        ErrorData::internal_error(format!("failed to encode tool result: {err}"), None)
    })
}

fn dispatch_failure(err: &DispatchError) -> Envelope {
    Envelope { detail: err.detail(), ..Envelope::failed(err.to_string()) }
}
