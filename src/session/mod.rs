// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The single live connection to the external CAD application.
//!
//! `Session` owns the connection exclusively. Everything that touches the external object graph
//! runs inside [`Session::with_connection`], which holds the session lock for the whole operation:
//! the external application has no safe concurrent-call contract, so at most one dispatch is in
//! flight and later callers queue behind it.
//!
//! There is no timeout and no cancellation. A hang inside the external application blocks every
//! queued dispatch until it returns; a caller-side timeout can only stop waiting, it cannot
//! interrupt the external call.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::{MethodSignature, ObjectHandle, PropertySignature, Variant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    /// The object has no member of that name (the "tier inapplicable" signal).
    #[error("unknown member '{0}'")]
    UnknownMember(String),
    /// The handle no longer refers to a live object (document closed, feature deleted).
    #[error("object handle is no longer valid")]
    InvalidHandle,
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Raw failure reported by the external application.
    #[error("{0}")]
    External(String),
}

/// An object in the external application's graph.
///
/// Implementations wrap whatever automation mechanism the backend uses. Two call paths exist
/// because the graph is only partially introspectable: bound calls against an enumerated
/// signature, and generic invoke-by-name dispatch for members the tables do not list.
pub trait LiveObject: Send + Sync {
    /// Concrete interface name, e.g. `ISketchManager`.
    fn shape_name(&self) -> &str;

    fn methods(&self) -> Vec<MethodSignature> {
        Vec::new()
    }

    fn properties(&self) -> Vec<PropertySignature> {
        Vec::new()
    }

    /// Calls an enumerated method; `args` holds exactly one value per formal parameter.
    fn call_method(
        &self,
        signature: &MethodSignature,
        args: Vec<Variant>,
    ) -> Result<Variant, CallError>;

    /// Generic dispatch by name with positional arguments.
    fn invoke_by_name(&self, name: &str, args: Vec<Variant>) -> Result<Variant, CallError>;

    /// Reads an enumerated property.
    fn get_property(&self, name: &str) -> Result<Variant, CallError>;

    fn set_property(&self, name: &str, value: Variant) -> Result<(), CallError>;

    /// Generic property read by name.
    fn invoke_get(&self, name: &str) -> Result<Variant, CallError> {
        Err(CallError::UnknownMember(name.to_owned()))
    }

    fn invoke_put(&self, name: &str, _value: Variant) -> Result<(), CallError> {
        Err(CallError::UnknownMember(name.to_owned()))
    }
}

/// A live connection to the external application.
pub trait Application: Send {
    /// Whether the connection still reaches a running application.
    fn is_alive(&self) -> bool {
        true
    }

    fn root(&self) -> Option<ObjectHandle>;

    fn active_document(&self) -> Option<ObjectHandle>;
}

/// Process-wide holder of at most one connection.
pub struct Session {
    connection: Mutex<Option<Box<dyn Application>>>,
}

impl Session {
    pub fn disconnected() -> Self {
        Self { connection: Mutex::new(None) }
    }

    pub fn connected(application: impl Application + 'static) -> Self {
        Self { connection: Mutex::new(Some(Box::new(application))) }
    }

    /// Installs a connection, replacing any previous one.
    pub fn connect(&self, application: impl Application + 'static) {
        *self.lock() = Some(Box::new(application));
        tracing::info!("CAD application connected");
    }

    /// Drops the connection; returns whether one was present.
    pub fn disconnect(&self) -> bool {
        let dropped = self.lock().take().is_some();
        if dropped {
            tracing::info!("CAD application disconnected");
        }
        dropped
    }

    pub fn is_live(&self) -> bool {
        self.lock().as_deref().is_some_and(|application| application.is_alive())
    }

    pub fn root(&self) -> Option<ObjectHandle> {
        self.with_connection(|application| application.root()).flatten()
    }

    pub fn active_document(&self) -> Option<ObjectHandle> {
        self.with_connection(|application| application.active_document()).flatten()
    }

    /// Runs `f` against the live connection while holding the session lock.
    ///
    /// Returns `None` when no connection is installed or the application is gone.
    pub fn with_connection<R>(&self, f: impl FnOnce(&dyn Application) -> R) -> Option<R> {
        let guard = self.lock();
        let application = guard.as_deref()?;
        if !application.is_alive() {
            tracing::warn!("CAD application connection lost");
            return None;
        }
        Some(f(application))
    }

    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn Application>>> {
        // A panic inside an earlier external call must not wedge the session.
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
