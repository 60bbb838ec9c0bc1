// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Generic dynamic invocation against the live object graph.
//!
//! A call names an object, a member and a bag of schema-less arguments. The pipeline resolves the
//! object ([`resolver`]), coerces arguments and picks a call path ([`coerce`], [`invoke`]), makes
//! the result transport-safe ([`serialize`]) and wraps everything into one
//! [`InvocationOutcome`] ([`facade`]). No failure escapes as a panic.

pub mod coerce;
pub mod facade;
pub mod invoke;
pub mod resolver;
pub mod serialize;


pub use coerce::{coerce, CoercionError};
pub use facade::{
    ConnectionStatus, DispatchError, Dispatcher, InvocationOutcome, KnownObject,
    MethodDescription, ObjectDescription, PropertyDescription,
};
pub use invoke::{
    access_property, Attempt, GenericInvocation, IntrospectiveMethodMatch, InvokeError,
    MethodInvoker, PropertyGetterFallback, ResolutionStrategy,
};
pub use resolver::{
    known_object_names, resolve, ResolveError, WellKnownObject, NOT_CONNECTED_MESSAGE,
};
pub use serialize::{serialize, ARRAY_PREVIEW_LIMIT, OPAQUE_NOTE};
