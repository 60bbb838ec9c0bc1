// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::docs::{DocIndex, DocRecord};
use crate::model::{ArgValue, Arguments, ArgumentsError, ObjectHandle};
use crate::session::{Application, LiveObject, Session};

use super::invoke::{access_property, InvokeError, MethodInvoker};
use super::resolver::{resolve, ResolveError, WellKnownObject};
use super::serialize::serialize;

const DOC_SEARCH_FALLBACK_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Invoke(#[from] InvokeError),
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] ArgumentsError),
    /// The backend panicked while handling the call.
    #[error("{object} panicked during the call")]
    Panicked { object: String, payload: String },
}

impl DispatchError {
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Invoke(err) => err.detail(),
            Self::Panicked { payload, .. } => Some(payload.clone()),
            _ => None,
        }
    }
}

/// Exactly one of success or failure, with documentation attached on request.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    Success { value: Value, documentation: Vec<DocRecord> },
    Failure { message: String, detail: Option<String>, documentation: Vec<DocRecord> },
}

impl InvocationOutcome {
    fn from_result(result: Result<Value, DispatchError>, documentation: Vec<DocRecord>) -> Self {
        match result {
            Ok(value) => Self::Success { value, documentation },
            Err(err) => {
                Self::Failure { message: err.to_string(), detail: err.detail(), documentation }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn documentation(&self) -> &[DocRecord] {
        match self {
            Self::Success { documentation, .. } | Self::Failure { documentation, .. } => {
                documentation
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub application: Option<String>,
    pub active_document: Option<String>,
    pub documentation_root: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MethodDescription {
    pub name: String,
    /// `name: type` or `name: type = default` per formal parameter.
    pub parameters: Vec<String>,
    pub returns: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PropertyDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub writable: bool,
}

/// What introspection reveals about a resolved object; hidden members are not listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectDescription {
    pub object: String,
    pub shape: String,
    pub methods: Vec<MethodDescription>,
    pub properties: Vec<PropertyDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KnownObject {
    pub name: String,
    pub aliases: Vec<String>,
}

/// Entry point for symbolic calls: resolve, coerce, invoke, serialize, attach docs.
pub struct Dispatcher {
    session: Arc<Session>,
    docs: Arc<DocIndex>,
    invoker: MethodInvoker,
}

impl Dispatcher {
    pub fn new(session: Arc<Session>, docs: Arc<DocIndex>) -> Self {
        Self::with_invoker(session, docs, MethodInvoker::default())
    }

    pub fn with_invoker(
        session: Arc<Session>,
        docs: Arc<DocIndex>,
        invoker: MethodInvoker,
    ) -> Self {
        Self { session, docs, invoker }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn docs(&self) -> &Arc<DocIndex> {
        &self.docs
    }

    pub fn invoke_member(
        &self,
        object: &str,
        member: &str,
        arguments: &Value,
        want_documentation: bool,
    ) -> InvocationOutcome {
        let result = Arguments::from_json(arguments)
            .map_err(DispatchError::from)
            .and_then(|args| {
                self.with_target(object, |target| {
                    let value = self.invoker.invoke(target.as_ref(), member, &args)?;
                    Ok(serialize(&value))
                })
            });
        self.finish(object, member, result, want_documentation)
    }

    /// Gets the property when `value` is absent or null, sets it otherwise.
    ///
    /// A JSON string value is parsed loosely: `"false"` becomes a boolean, `"Part1"` stays text.
    /// Text properties always receive the string as given, so `"123"` stays text there.
    pub fn access_property(
        &self,
        object: &str,
        property: &str,
        value: Option<&Value>,
        want_documentation: bool,
    ) -> InvocationOutcome {
        let value = value.filter(|value| !value.is_null()).map(ArgValue::from);
        let result = self.with_target(object, |target| {
            let applied = access_property(target.as_ref(), property, value.as_ref())?;
            Ok(serialize(&applied))
        });
        self.finish(object, property, result, want_documentation)
    }

    /// Lists the enumerable members of a resolved object without invoking any of them.
    pub fn inspect(&self, object: &str) -> Result<ObjectDescription, DispatchError> {
        self.with_target(object, |target| Ok(describe(object, target.as_ref())))
    }

    pub fn status(&self) -> ConnectionStatus {
        let shapes = self.session.with_connection(|application| {
            let shape = |handle: Option<ObjectHandle>| {
                handle.map(|handle| handle.shape_name().to_owned())
            };
            (shape(application.root()), shape(application.active_document()))
        });
        let connected = shapes.is_some();
        let (application, active_document) = shapes.unwrap_or_default();
        ConnectionStatus {
            connected,
            application,
            active_document,
            documentation_root: self.docs.root().map(|root| root.display().to_string()),
        }
    }

    pub fn known_objects(&self) -> Vec<KnownObject> {
        WellKnownObject::ALL
            .into_iter()
            .map(|object| KnownObject {
                name: object.canonical_name().to_owned(),
                aliases: object.aliases().map(str::to_owned).collect(),
            })
            .collect()
    }

    /// Runs `f` against the resolved object while holding the session lock.
    ///
    /// A panic inside the backend is caught here and reported as [`DispatchError::Panicked`].
    fn with_target<R>(
        &self,
        object: &str,
        f: impl FnOnce(ObjectHandle) -> Result<R, DispatchError>,
    ) -> Result<R, DispatchError> {
        self.session
            .with_connection(|application: &dyn Application| {
                let run = AssertUnwindSafe(|| f(resolve(application, object)?));
                panic::catch_unwind(run).unwrap_or_else(|payload| {
                    let payload = panic_message(payload.as_ref());
                    tracing::error!(object, %payload, "backend panicked during dispatch");
                    Err(DispatchError::Panicked { object: object.trim().to_owned(), payload })
                })
            })
            .unwrap_or_else(|| Err(ResolveError::NotConnected.into()))
    }

    fn finish(
        &self,
        object: &str,
        member: &str,
        result: Result<Value, DispatchError>,
        want_documentation: bool,
    ) -> InvocationOutcome {
        if let Err(err) = &result {
            tracing::debug!(object, member, error = %err, "dispatch failed");
        }
        let documentation =
            if want_documentation { self.documentation(object, member) } else { Vec::new() };
        InvocationOutcome::from_result(result, documentation)
    }

    /// Best-effort: the member page by convention, else a small search.
    fn documentation(&self, object: &str, member: &str) -> Vec<DocRecord> {
        let interface = WellKnownObject::from_name(object)
            .map_or_else(|| object.trim().to_owned(), |known| known.canonical_name().to_owned());
        if let Some(record) = self.docs.lookup(&interface, Some(member)) {
            return vec![record];
        }
        self.docs.search(&format!("{interface} {member}"), DOC_SEARCH_FALLBACK_LIMIT)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

fn describe(object: &str, target: &dyn LiveObject) -> ObjectDescription {
    let methods = target
        .methods()
        .into_iter()
        .map(|method| MethodDescription {
            name: method.name.to_string(),
            parameters: method
                .params
                .iter()
                .map(|param| match &param.default {
                    None => format!("{}: {}", param.name, param.ty),
                    Some(default) => {
                        format!("{}: {} = {}", param.name, param.ty, serialize(default))
                    }
                })
                .collect(),
            returns: method.returns.to_string(),
        })
        .collect();
    let properties = target
        .properties()
        .into_iter()
        .map(|property| PropertyDescription {
            name: property.name.to_string(),
            ty: property.ty.to_string(),
            writable: property.writable,
        })
        .collect();
    ObjectDescription {
        object: object.to_owned(),
        shape: target.shape_name().to_owned(),
        methods,
        properties,
    }
}
