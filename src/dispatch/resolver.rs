// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Maps well-known object names onto live objects.
//!
//! Nothing is cached: the active document can change between two requests, so every resolution
//! re-reads the live pointer from the connection.

use crate::model::{ObjectHandle, Variant};
use crate::session::{Application, CallError, LiveObject};

pub const NOT_CONNECTED_MESSAGE: &str = "Not connected to the CAD application. Connect first.";

const SUGGESTION_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownObject {
    Application,
    ActiveDocument,
    DocumentExtension,
    SketchManager,
    FeatureManager,
    SelectionManager,
}

const WELL_KNOWN_NAMES: &[(&str, WellKnownObject)] = &[
    ("ISldWorks", WellKnownObject::Application),
    ("SldWorks", WellKnownObject::Application),
    ("Application", WellKnownObject::Application),
    ("App", WellKnownObject::Application),
    ("IModelDoc2", WellKnownObject::ActiveDocument),
    ("ModelDoc2", WellKnownObject::ActiveDocument),
    ("ModelDoc", WellKnownObject::ActiveDocument),
    ("ActiveDoc", WellKnownObject::ActiveDocument),
    ("Document", WellKnownObject::ActiveDocument),
    ("IPartDoc", WellKnownObject::ActiveDocument),
    ("IAssemblyDoc", WellKnownObject::ActiveDocument),
    ("IDrawingDoc", WellKnownObject::ActiveDocument),
    ("IModelDocExtension", WellKnownObject::DocumentExtension),
    ("ModelDocExtension", WellKnownObject::DocumentExtension),
    ("Extension", WellKnownObject::DocumentExtension),
    ("ISketchManager", WellKnownObject::SketchManager),
    ("SketchManager", WellKnownObject::SketchManager),
    ("IFeatureManager", WellKnownObject::FeatureManager),
    ("FeatureManager", WellKnownObject::FeatureManager),
    ("ISelectionMgr", WellKnownObject::SelectionManager),
    ("SelectionMgr", WellKnownObject::SelectionManager),
    ("SelectionManager", WellKnownObject::SelectionManager),
];

impl WellKnownObject {
    pub const ALL: [Self; 6] = [
        Self::Application,
        Self::ActiveDocument,
        Self::DocumentExtension,
        Self::SketchManager,
        Self::FeatureManager,
        Self::SelectionManager,
    ];

    /// Case-insensitive lookup of a caller-supplied name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        WELL_KNOWN_NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, object)| *object)
    }

    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Application => "ISldWorks",
            Self::ActiveDocument => "IModelDoc2",
            Self::DocumentExtension => "IModelDocExtension",
            Self::SketchManager => "ISketchManager",
            Self::FeatureManager => "IFeatureManager",
            Self::SelectionManager => "ISelectionMgr",
        }
    }

    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        WELL_KNOWN_NAMES
            .iter()
            .filter(move |(_, object)| *object == self)
            .map(|(name, _)| *name)
    }

    /// Property of the active document that yields this object, if it hangs off the document.
    fn document_property(self) -> Option<&'static str> {
        match self {
            Self::Application | Self::ActiveDocument => None,
            Self::DocumentExtension => Some("Extension"),
            Self::SketchManager => Some("SketchManager"),
            Self::FeatureManager => Some("FeatureManager"),
            Self::SelectionManager => Some("SelectionManager"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Not connected to the CAD application. Connect first.")]
    NotConnected,
    #[error("no active document is open (required for '{0}')")]
    NoActiveDocument(String),
    #[error("unknown object '{name}'{}", suggestion_suffix(.suggestion.as_deref()))]
    UnknownObject { name: String, suggestion: Option<String> },
    #[error("object '{name}' is unavailable: {reason}")]
    Unavailable { name: String, reason: String },
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map(|name| format!("; did you mean '{name}'?")).unwrap_or_default()
}

/// The canonical names callers can pass to [`resolve`].
pub fn known_object_names() -> Vec<&'static str> {
    WellKnownObject::ALL.iter().map(|object| object.canonical_name()).collect()
}

pub fn resolve(application: &dyn Application, name: &str) -> Result<ObjectHandle, ResolveError> {
    let Some(object) = WellKnownObject::from_name(name) else {
        return Err(ResolveError::UnknownObject {
            name: name.to_owned(),
            suggestion: suggest_object_name(name),
        });
    };

    if object == WellKnownObject::Application {
        return application.root().ok_or_else(|| ResolveError::Unavailable {
            name: name.to_owned(),
            reason: "the application root is not reachable".to_owned(),
        });
    }

    let document = application
        .active_document()
        .ok_or_else(|| ResolveError::NoActiveDocument(name.to_owned()))?;
    let Some(property) = object.document_property() else {
        return Ok(document);
    };

    match read_property(document.as_ref(), property) {
        Ok(Variant::Object(handle)) => Ok(handle),
        Ok(other) => Err(ResolveError::Unavailable {
            name: name.to_owned(),
            reason: format!("'{property}' returned {} instead of an object", other.type_label()),
        }),
        Err(err) => Err(ResolveError::Unavailable {
            name: name.to_owned(),
            reason: format!("reading '{property}' failed: {err}"),
        }),
    }
}

fn read_property(document: &dyn LiveObject, property: &str) -> Result<Variant, CallError> {
    match document.get_property(property) {
        Err(CallError::UnknownMember(_)) => document.invoke_get(property),
        other => other,
    }
}

/// Closest well-known name by fuzzy ratio, if any is close enough to be a likely typo.
pub fn suggest_object_name(name: &str) -> Option<String> {
    let needle = name.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }

    WELL_KNOWN_NAMES
        .iter()
        .map(|(candidate, object)| {
            let ratio =
                rapidfuzz::fuzz::ratio(needle.chars(), candidate.to_ascii_lowercase().chars());
            (ratio, object.canonical_name())
        })
        .filter(|(ratio, _)| *ratio >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, canonical)| canonical.to_owned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{known_object_names, resolve, ResolveError, WellKnownObject};
    use crate::demo::DemoApplication;

    #[rstest]
    #[case("ISldWorks", "ISldWorks")]
    #[case("app", "ISldWorks")]
    #[case("IModelDoc2", "IModelDoc2")]
    #[case("ipartdoc", "IModelDoc2")]
    #[case("IAssemblyDoc", "IModelDoc2")]
    #[case("  ActiveDoc  ", "IModelDoc2")]
    #[case("IModelDocExtension", "IModelDocExtension")]
    #[case("ISKETCHMANAGER", "ISketchManager")]
    #[case("FeatureManager", "IFeatureManager")]
    #[case("ISelectionMgr", "ISelectionMgr")]
    fn resolves_well_known_names(#[case] name: &str, #[case] shape: &str) {
        let application = DemoApplication::new();
        let handle = resolve(&application, name).expect("resolve");
        assert_eq!(handle.shape_name(), shape);
    }

    #[test]
    fn every_alias_resolves_while_connected() {
        let application = DemoApplication::new();
        for object in WellKnownObject::ALL {
            for alias in object.aliases() {
                assert!(resolve(&application, alias).is_ok(), "alias {alias} should resolve");
            }
        }
        assert_eq!(known_object_names().len(), WellKnownObject::ALL.len());
    }

    #[rstest]
    #[case("")]
    #[case("IBody2")]
    #[case("ISketchManager.CreateLine")]
    #[case("🙂")]
    fn unknown_names_are_not_found(#[case] name: &str) {
        let application = DemoApplication::new();
        let err = resolve(&application, name).err().expect("unknown name");
        assert!(matches!(err, ResolveError::UnknownObject { .. }), "got {err:?}");
    }

    #[test]
    fn typo_gets_a_suggestion() {
        let application = DemoApplication::new();
        let err = resolve(&application, "ISketchManger").err().expect("typo");
        assert_eq!(
            err,
            ResolveError::UnknownObject {
                name: "ISketchManger".to_owned(),
                suggestion: Some("ISketchManager".to_owned()),
            }
        );
        assert!(err.to_string().contains("did you mean 'ISketchManager'"));
    }

    #[test]
    fn document_scoped_names_need_an_open_document() {
        let application = DemoApplication::new();
        application.handles().close_document();

        assert!(resolve(&application, "ISldWorks").is_ok());
        assert_eq!(
            resolve(&application, "ISketchManager").map(|_| ()),
            Err(ResolveError::NoActiveDocument("ISketchManager".to_owned()))
        );
    }

    #[test]
    fn each_resolution_rereads_the_live_document() {
        let application = DemoApplication::new();
        let handles = application.handles();
        let before = handles.document.call_count();
        resolve(&application, "SketchManager").expect("first");
        resolve(&application, "SketchManager").expect("second");
        assert_eq!(handles.document.call_count(), before + 2);
    }

    #[test]
    fn invalid_document_reports_unavailable() {
        let application = DemoApplication::new();
        application.handles().document.invalidate();
        let err = resolve(&application, "IFeatureManager").err().expect("invalid document");
        assert!(matches!(err, ResolveError::Unavailable { .. }), "got {err:?}");
    }
}
