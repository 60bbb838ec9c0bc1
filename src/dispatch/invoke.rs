// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tiered member resolution against partially-introspectable objects.
//!
//! Some members are visible in an object's enumerable tables, others only through generic
//! invoke-by-name dispatch. Resolution walks an ordered list of strategies and stops at the first
//! one that commits (success or a definitive error). A strategy that does not apply is skipped.
//! When every tier skips, the caller gets one synthesized error; the per-tier skip reasons are
//! kept as diagnostic detail only.
//!
//! Overloads are not disambiguated beyond parameter count: the first enumerated overload whose
//! `required..=total` range fits the supplied argument count wins, even when a later overload
//! would match the argument names better.

use crate::model::{
    ArgValue, Arguments, MethodSignature, ParamType, PropertySignature, Variant,
};
use crate::session::{CallError, LiveObject};

use super::coerce::{coerce, CoercionError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    #[error("missing required parameter '{parameter}' for {shape}.{member}")]
    MissingParameter { shape: String, member: String, parameter: String },
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error("{shape}.{member} failed")]
    External {
        shape: String,
        member: String,
        #[source]
        source: CallError,
    },
    #[error("property {shape}.{property} is read-only")]
    ReadOnly { shape: String, property: String },
    #[error("could not invoke '{member}' on {shape} with {argument_count} argument(s)")]
    Exhausted { shape: String, member: String, argument_count: usize, tried: Vec<String> },
    #[error("could not {action} property '{property}' on {shape}")]
    NoSuchProperty { shape: String, property: String, action: &'static str, tried: Vec<String> },
}

impl InvokeError {
    /// Raw detail that is not part of the primary message.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::External { source, .. } => Some(source.to_string()),
            Self::Exhausted { tried, .. } | Self::NoSuchProperty { tried, .. } => {
                (!tried.is_empty()).then(|| tried.join("; "))
            }
            _ => None,
        }
    }

    fn external(target: &dyn LiveObject, member: &str, source: CallError) -> Self {
        tracing::warn!(
            shape = target.shape_name(),
            member,
            error = %source,
            "external call failed"
        );
        Self::External { shape: target.shape_name().to_owned(), member: member.to_owned(), source }
    }
}

/// Outcome of one resolution tier.
#[derive(Debug)]
pub enum Attempt {
    /// The tier made the call (or found a definitive error); resolution stops here.
    Committed(Result<Variant, InvokeError>),
    /// The tier does not apply; the reason is kept for diagnostics.
    Skipped(String),
}

pub trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_resolve(&self, target: &dyn LiveObject, member: &str, args: &Arguments) -> Attempt;
}

/// Tier 1: match against the enumerable method table and bind arguments by name.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntrospectiveMethodMatch;

impl ResolutionStrategy for IntrospectiveMethodMatch {
    fn name(&self) -> &'static str {
        "introspective"
    }

    fn try_resolve(&self, target: &dyn LiveObject, member: &str, args: &Arguments) -> Attempt {
        let candidates = target
            .methods()
            .into_iter()
            .filter(|method| method.name.eq_ignore_ascii_case(member))
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return Attempt::Skipped(format!("no enumerable method named '{member}'"));
        }

        let supplied = args.len();
        let Some(signature) = candidates.iter().find(|method| method.accepts(supplied)) else {
            let ranges = candidates
                .iter()
                .map(|method| format!("{}..={}", method.required_count(), method.total_count()))
                .collect::<Vec<_>>();
            return Attempt::Skipped(format!(
                "{} overload(s) of '{member}' accept {} argument(s), not {supplied}",
                candidates.len(),
                ranges.join(", ")
            ));
        };

        let frame = match bind_frame(target, signature, args) {
            Ok(frame) => frame,
            Err(err) => return Attempt::Committed(Err(err)),
        };
        tracing::debug!(
            shape = target.shape_name(),
            member = %signature.name,
            arity = frame.len(),
            "invoking enumerated method"
        );
        Attempt::Committed(
            target
                .call_method(signature, frame)
                .map_err(|source| InvokeError::external(target, member, source)),
        )
    }
}

fn bind_frame(
    target: &dyn LiveObject,
    signature: &MethodSignature,
    args: &Arguments,
) -> Result<Vec<Variant>, InvokeError> {
    let mut frame = Vec::with_capacity(signature.total_count());
    for param in &signature.params {
        let value = match (args.get(&param.name), &param.default) {
            (Some(value), _) => coerce(&param.name, value, &param.ty)?,
            (None, Some(default)) => default.clone(),
            (None, None) => {
                return Err(InvokeError::MissingParameter {
                    shape: target.shape_name().to_owned(),
                    member: signature.name.to_string(),
                    parameter: param.name.to_string(),
                });
            }
        };
        frame.push(value);
    }
    Ok(frame)
}

/// Tier 2: generic invoke-by-name with the raw arguments in declared order.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericInvocation;

impl ResolutionStrategy for GenericInvocation {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn try_resolve(&self, target: &dyn LiveObject, member: &str, args: &Arguments) -> Attempt {
        let positional = args.values().map(Variant::from).collect::<Vec<_>>();
        match target.invoke_by_name(member, positional) {
            Ok(value) => Attempt::Committed(Ok(value)),
            Err(CallError::UnknownMember(_)) => {
                Attempt::Skipped(format!("generic dispatch does not know '{member}'"))
            }
            Err(source) => Attempt::Committed(Err(InvokeError::external(target, member, source))),
        }
    }
}

/// Tier 3: with no arguments, treat the member as a property read.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyGetterFallback;

impl ResolutionStrategy for PropertyGetterFallback {
    fn name(&self) -> &'static str {
        "property-getter"
    }

    fn try_resolve(&self, target: &dyn LiveObject, member: &str, args: &Arguments) -> Attempt {
        if !args.is_empty() {
            return Attempt::Skipped("property fallback needs zero arguments".to_owned());
        }
        let read = match target.get_property(member) {
            Err(CallError::UnknownMember(_)) => target.invoke_get(member),
            other => other,
        };
        match read {
            Ok(value) => Attempt::Committed(Ok(value)),
            Err(CallError::UnknownMember(_)) => {
                Attempt::Skipped(format!("no property named '{member}'"))
            }
            Err(source) => Attempt::Committed(Err(InvokeError::external(target, member, source))),
        }
    }
}

/// Runs the resolution tiers in order.
pub struct MethodInvoker {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl MethodInvoker {
    pub fn with_strategies(strategies: Vec<Box<dyn ResolutionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    pub fn invoke(
        &self,
        target: &dyn LiveObject,
        member: &str,
        args: &Arguments,
    ) -> Result<Variant, InvokeError> {
        let mut tried = Vec::new();
        for strategy in &self.strategies {
            match strategy.try_resolve(target, member, args) {
                Attempt::Committed(result) => {
                    tracing::debug!(
                        tier = strategy.name(),
                        member,
                        ok = result.is_ok(),
                        "tier committed"
                    );
                    return result;
                }
                Attempt::Skipped(reason) => {
                    tracing::debug!(tier = strategy.name(), member, %reason, "tier skipped");
                    tried.push(format!("{}: {reason}", strategy.name()));
                }
            }
        }

        Err(InvokeError::Exhausted {
            shape: target.shape_name().to_owned(),
            member: member.to_owned(),
            argument_count: args.len(),
            tried,
        })
    }
}

impl Default for MethodInvoker {
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(IntrospectiveMethodMatch),
            Box::new(GenericInvocation),
            Box::new(PropertyGetterFallback),
        ])
    }
}

/// Reads a property, or writes it when `value` is given, returning the current/applied value.
///
/// Two tiers: the enumerable property table (with coercion to the declared type), then generic
/// get/put by name with the value passed uncoerced.
///
/// A text value is parsed loosely (`"false"`, `"5"`, `"[1,2]"`) unless the target wants text.
/// The structural tier hands `Text` properties the string as given. The generic tier tries the
/// parsed value first and retries with the original string when the backend reports a type
/// mismatch.
pub fn access_property(
    target: &dyn LiveObject,
    property: &str,
    value: Option<&ArgValue>,
) -> Result<Variant, InvokeError> {
    let mut tried = Vec::new();

    let declared = target
        .properties()
        .into_iter()
        .find(|candidate| candidate.name.eq_ignore_ascii_case(property));
    match declared {
        Some(signature) => match structural_access(target, &signature, value) {
            Attempt::Committed(result) => return result,
            Attempt::Skipped(reason) => tried.push(format!("structural: {reason}")),
        },
        None => tried.push(format!("structural: no enumerable property named '{property}'")),
    }

    match generic_access(target, property, value) {
        Attempt::Committed(result) => return result,
        Attempt::Skipped(reason) => tried.push(format!("generic: {reason}")),
    }

    Err(InvokeError::NoSuchProperty {
        shape: target.shape_name().to_owned(),
        property: property.to_owned(),
        action: if value.is_some() { "set" } else { "get" },
        tried,
    })
}

fn structural_access(
    target: &dyn LiveObject,
    signature: &PropertySignature,
    value: Option<&ArgValue>,
) -> Attempt {
    let name = signature.name.as_str();
    let Some(value) = value else {
        return match target.get_property(name) {
            Ok(current) => Attempt::Committed(Ok(current)),
            Err(CallError::UnknownMember(_)) => {
                Attempt::Skipped(format!("'{name}' is not readable"))
            }
            Err(source) => Attempt::Committed(Err(InvokeError::external(target, name, source))),
        };
    };

    if !signature.writable {
        return Attempt::Committed(Err(InvokeError::ReadOnly {
            shape: target.shape_name().to_owned(),
            property: name.to_owned(),
        }));
    }
    let loose = match (value, &signature.ty) {
        (ArgValue::Text(raw), ty) if *ty != ParamType::Text => ArgValue::from_loose_text(raw),
        _ => value.clone(),
    };
    let applied = match coerce(name, &loose, &signature.ty) {
        Ok(applied) => applied,
        Err(err) => return Attempt::Committed(Err(err.into())),
    };
    match target.set_property(name, applied.clone()) {
        Ok(()) => Attempt::Committed(Ok(applied)),
        Err(CallError::UnknownMember(_)) => Attempt::Skipped(format!("'{name}' is not writable")),
        Err(source) => Attempt::Committed(Err(InvokeError::external(target, name, source))),
    }
}

fn generic_access(target: &dyn LiveObject, property: &str, value: Option<&ArgValue>) -> Attempt {
    let result = match value {
        None => target.invoke_get(property),
        Some(ArgValue::Text(raw)) => {
            let verbatim = ArgValue::Text(raw.clone());
            let loose = ArgValue::from_loose_text(raw);
            if loose == verbatim {
                generic_put(target, property, Variant::from(&verbatim))
            } else {
                match generic_put(target, property, Variant::from(&loose)) {
                    Err(CallError::TypeMismatch(reason)) => {
                        tracing::debug!(property, %reason, "retrying generic put as text");
                        generic_put(target, property, Variant::from(&verbatim))
                    }
                    other => other,
                }
            }
        }
        Some(value) => generic_put(target, property, Variant::from(value)),
    };
    match result {
        Ok(value) => Attempt::Committed(Ok(value)),
        Err(CallError::UnknownMember(_)) => {
            Attempt::Skipped(format!("generic dispatch does not know '{property}'"))
        }
        Err(source) => Attempt::Committed(Err(InvokeError::external(target, property, source))),
    }
}

fn generic_put(
    target: &dyn LiveObject,
    property: &str,
    applied: Variant,
) -> Result<Variant, CallError> {
    target.invoke_put(property, applied.clone()).map(|()| applied)
}
