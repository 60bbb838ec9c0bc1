// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-process stand-in for a CAD application.
//!
//! Backs `--demo`, the tests, and the benches. Objects are table-driven: each has enumerable
//! methods/properties (visible to introspection) and hidden ones reachable only through the
//! generic invoke-by-name path, mirroring how real automation objects behave.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use smol_str::SmolStr;

use crate::model::{
    MethodSignature, ObjectHandle, ParamSignature, ParamType, PropertySignature, Variant,
};
use crate::session::{Application, CallError, LiveObject};

type MethodHandler = Box<dyn Fn(&[Variant]) -> Result<Variant, CallError> + Send + Sync>;

struct DemoMethod {
    signature: MethodSignature,
    enumerable: bool,
    handler: MethodHandler,
}

#[derive(Debug)]
struct DemoProperty {
    signature: PropertySignature,
    enumerable: bool,
    value: Variant,
}

/// A table-driven external object.
pub struct DemoObject {
    shape: SmolStr,
    methods: Vec<DemoMethod>,
    properties: Mutex<Vec<DemoProperty>>,
    valid: AtomicBool,
    calls: AtomicUsize,
}

impl DemoObject {
    pub fn builder(shape: impl Into<SmolStr>) -> DemoObjectBuilder {
        DemoObjectBuilder {
            shape: shape.into(),
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Simulates the external application deleting the object.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::SeqCst);
    }

    /// Number of calls that reached this object, across every call path.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn property_value(&self, name: &str) -> Option<Variant> {
        let properties = self.properties.lock().unwrap_or_else(PoisonError::into_inner);
        properties
            .iter()
            .find(|property| property.signature.name.eq_ignore_ascii_case(name))
            .map(|property| property.value.clone())
    }

    fn enter(&self) -> Result<(), CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.valid.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CallError::InvalidHandle)
        }
    }

    fn read(&self, name: &str, include_hidden: bool) -> Result<Variant, CallError> {
        self.enter()?;
        self.property_value_where(name, include_hidden)
            .ok_or_else(|| CallError::UnknownMember(name.to_owned()))
    }

    fn property_value_where(&self, name: &str, include_hidden: bool) -> Option<Variant> {
        let properties = self.properties.lock().unwrap_or_else(PoisonError::into_inner);
        properties
            .iter()
            .find(|property| {
                (include_hidden || property.enumerable)
                    && property.signature.name.eq_ignore_ascii_case(name)
            })
            .map(|property| property.value.clone())
    }

    fn write(&self, name: &str, value: Variant, include_hidden: bool) -> Result<(), CallError> {
        self.enter()?;
        let mut properties = self.properties.lock().unwrap_or_else(PoisonError::into_inner);
        let property = properties
            .iter_mut()
            .find(|property| {
                (include_hidden || property.enumerable)
                    && property.signature.name.eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| CallError::UnknownMember(name.to_owned()))?;
        if !property.signature.writable {
            return Err(CallError::External(format!("property '{name}' is read-only")));
        }
        if !property.signature.ty.admits(&value) {
            return Err(CallError::TypeMismatch(format!(
                "property '{name}' expects {}, got {}",
                property.signature.ty,
                value.type_label()
            )));
        }
        property.value = value;
        Ok(())
    }
}

impl LiveObject for DemoObject {
    fn shape_name(&self) -> &str {
        &self.shape
    }

    fn methods(&self) -> Vec<MethodSignature> {
        self.methods
            .iter()
            .filter(|method| method.enumerable)
            .map(|method| method.signature.clone())
            .collect()
    }

    fn properties(&self) -> Vec<PropertySignature> {
        let properties = self.properties.lock().unwrap_or_else(PoisonError::into_inner);
        properties
            .iter()
            .filter(|property| property.enumerable)
            .map(|property| property.signature.clone())
            .collect()
    }

    fn call_method(
        &self,
        signature: &MethodSignature,
        args: Vec<Variant>,
    ) -> Result<Variant, CallError> {
        self.enter()?;
        let method = self
            .methods
            .iter()
            .find(|method| method.enumerable && method.signature == *signature)
            .ok_or_else(|| CallError::UnknownMember(signature.name.to_string()))?;
        if args.len() != method.signature.total_count() {
            return Err(CallError::External(format!(
                "{} expects {} argument(s), got {}",
                signature.name,
                method.signature.total_count(),
                args.len()
            )));
        }
        for (param, arg) in method.signature.params.iter().zip(&args) {
            if !param.ty.admits(arg) {
                return Err(CallError::TypeMismatch(format!(
                    "parameter '{}' expects {}, got {}",
                    param.name,
                    param.ty,
                    arg.type_label()
                )));
            }
        }
        (method.handler)(&args)
    }

    fn invoke_by_name(&self, name: &str, args: Vec<Variant>) -> Result<Variant, CallError> {
        self.enter()?;
        let Some(method) = self.methods.iter().find(|method| {
            method.signature.name.eq_ignore_ascii_case(name)
                && method.signature.accepts(args.len())
        }) else {
            // Late-bound dispatch also reaches properties when called without arguments.
            if args.is_empty() {
                if let Some(value) = self.property_value_where(name, true) {
                    return Ok(value);
                }
            }
            return Err(CallError::UnknownMember(name.to_owned()));
        };

        let mut frame = args;
        for param in method.signature.params.iter().skip(frame.len()) {
            frame.push(param.default.clone().unwrap_or(Variant::Empty));
        }
        (method.handler)(&frame)
    }

    fn get_property(&self, name: &str) -> Result<Variant, CallError> {
        self.read(name, false)
    }

    fn set_property(&self, name: &str, value: Variant) -> Result<(), CallError> {
        self.write(name, value, false)
    }

    fn invoke_get(&self, name: &str) -> Result<Variant, CallError> {
        self.read(name, true)
    }

    fn invoke_put(&self, name: &str, value: Variant) -> Result<(), CallError> {
        self.write(name, value, true)
    }
}

pub struct DemoObjectBuilder {
    shape: SmolStr,
    methods: Vec<DemoMethod>,
    properties: Vec<DemoProperty>,
}

impl DemoObjectBuilder {
    pub fn method(
        mut self,
        signature: MethodSignature,
        handler: impl Fn(&[Variant]) -> Result<Variant, CallError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.push(DemoMethod { signature, enumerable: true, handler: Box::new(handler) });
        self
    }

    /// A method only reachable through `invoke_by_name`.
    pub fn hidden_method(
        mut self,
        signature: MethodSignature,
        handler: impl Fn(&[Variant]) -> Result<Variant, CallError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.push(DemoMethod { signature, enumerable: false, handler: Box::new(handler) });
        self
    }

    pub fn property(
        mut self,
        name: impl Into<SmolStr>,
        ty: ParamType,
        writable: bool,
        value: Variant,
    ) -> Self {
        self.properties.push(DemoProperty {
            signature: PropertySignature::new(name, ty, writable),
            enumerable: true,
            value,
        });
        self
    }

    /// A property only reachable through `invoke_get`/`invoke_put`.
    pub fn hidden_property(
        mut self,
        name: impl Into<SmolStr>,
        ty: ParamType,
        writable: bool,
        value: Variant,
    ) -> Self {
        self.properties.push(DemoProperty {
            signature: PropertySignature::new(name, ty, writable),
            enumerable: false,
            value,
        });
        self
    }

    pub fn build(self) -> Arc<DemoObject> {
        Arc::new(DemoObject {
            shape: self.shape,
            methods: self.methods,
            properties: Mutex::new(self.properties),
            valid: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        })
    }
}

/// Sketch geometry recorded by the demo sketch manager.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchEntity {
    Line { start: [f64; 3], end: [f64; 3] },
    Circle { center: [f64; 3], radius: f64 },
}

/// Handles into a running demo application, for inspecting and steering it from tests.
#[derive(Clone)]
pub struct DemoHandles {
    pub root: Arc<DemoObject>,
    pub document: Arc<DemoObject>,
    pub sketch_manager: Arc<DemoObject>,
    pub feature_manager: Arc<DemoObject>,
    pub selection_manager: Arc<DemoObject>,
    pub extension: Arc<DemoObject>,
    pub sketch: Arc<Mutex<Vec<SketchEntity>>>,
    alive: Arc<AtomicBool>,
    document_open: Arc<AtomicBool>,
}

impl DemoHandles {
    pub fn sketch_entities(&self) -> Vec<SketchEntity> {
        self.sketch.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn close_document(&self) {
        self.document_open.store(false, Ordering::SeqCst);
    }

    pub fn open_document(&self) {
        self.document_open.store(true, Ordering::SeqCst);
    }

    /// Simulates the application process going away.
    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

pub struct DemoApplication {
    handles: DemoHandles,
}

impl DemoApplication {
    pub fn new() -> Self {
        Self { handles: build_demo_graph() }
    }

    pub fn handles(&self) -> DemoHandles {
        self.handles.clone()
    }
}

impl Default for DemoApplication {
    fn default() -> Self {
        Self::new()
    }
}

impl Application for DemoApplication {
    fn is_alive(&self) -> bool {
        self.handles.alive.load(Ordering::SeqCst)
    }

    fn root(&self) -> Option<ObjectHandle> {
        Some(self.handles.root.clone())
    }

    fn active_document(&self) -> Option<ObjectHandle> {
        if self.handles.document_open.load(Ordering::SeqCst) {
            Some(self.handles.document.clone())
        } else {
            None
        }
    }
}

fn f64_params(names: &[&str]) -> Vec<ParamSignature> {
    names.iter().map(|name| ParamSignature::required(*name, ParamType::F64)).collect()
}

fn point(args: &[Variant], offset: usize) -> [f64; 3] {
    let coord = |index: usize| args.get(offset + index).and_then(Variant::as_f64).unwrap_or(0.0);
    [coord(0), coord(1), coord(2)]
}

fn segment(kind: &str) -> Variant {
    let object: ObjectHandle = DemoObject::builder("ISketchSegment")
        .property("Type", ParamType::Text, false, Variant::Text(kind.to_owned()))
        .build();
    Variant::Object(object)
}

fn build_sketch_manager(sketch: Arc<Mutex<Vec<SketchEntity>>>) -> Arc<DemoObject> {
    let lines = sketch.clone();
    let circles = sketch.clone();
    let rectangles = sketch.clone();
    let edges = sketch;

    DemoObject::builder("ISketchManager")
        .method(
            MethodSignature::new(
                "CreateLine",
                f64_params(&["X1", "Y1", "Z1", "X2", "Y2", "Z2"]),
                ParamType::Object,
            ),
            move |args| {
                let (start, end) = (point(args, 0), point(args, 3));
                if start == end {
                    return Err(CallError::External("zero-length line".to_owned()));
                }
                lines
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(SketchEntity::Line { start, end });
                Ok(segment("line"))
            },
        )
        .method(
            MethodSignature::new(
                "CreateCircleByRadius",
                f64_params(&["Xc", "Yc", "Zc", "Radius"]),
                ParamType::Object,
            ),
            move |args| {
                let radius = args.get(3).and_then(Variant::as_f64).unwrap_or(0.0);
                if radius <= 0.0 {
                    return Err(CallError::External("radius must be positive".to_owned()));
                }
                circles
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(SketchEntity::Circle { center: point(args, 0), radius });
                Ok(segment("arc"))
            },
        )
        .method(
            MethodSignature::new(
                "CreateCornerRectangle",
                f64_params(&["X1", "Y1", "Z1", "X2", "Y2", "Z2"]),
                ParamType::Array(Box::new(ParamType::Object)),
            ),
            move |args| {
                let ([x1, y1, z1], [x2, y2, _]) = (point(args, 0), point(args, 3));
                let corners = [[x1, y1, z1], [x2, y1, z1], [x2, y2, z1], [x1, y2, z1]];
                let mut sketch = rectangles.lock().unwrap_or_else(PoisonError::into_inner);
                for index in 0..4 {
                    sketch.push(SketchEntity::Line {
                        start: corners[index],
                        end: corners[(index + 1) % 4],
                    });
                }
                Ok(Variant::Array((0..4).map(|_| segment("line")).collect()))
            },
        )
        .method(
            MethodSignature::new(
                "InsertSketch",
                vec![ParamSignature::optional(
                    "UpdateEditRebuild",
                    ParamType::Bool,
                    Variant::Bool(true),
                )],
                ParamType::Any,
            ),
            |_| Ok(Variant::Empty),
        )
        .hidden_method(
            MethodSignature::new(
                "SketchUseEdge3",
                vec![
                    ParamSignature::required("Chain", ParamType::Bool),
                    ParamSignature::required("InnerLoops", ParamType::Bool),
                ],
                ParamType::Bool,
            ),
            move |_| {
                let sketch = edges.lock().unwrap_or_else(PoisonError::into_inner);
                Ok(Variant::Bool(!sketch.is_empty()))
            },
        )
        .property("AddToDB", ParamType::Bool, true, Variant::Bool(false))
        .property("DisplayWhenAdded", ParamType::Bool, true, Variant::Bool(true))
        .build()
}

fn build_feature_manager() -> Arc<DemoObject> {
    let features = Arc::new(AtomicUsize::new(3));
    let counted = features.clone();

    DemoObject::builder("IFeatureManager")
        .method(
            MethodSignature::new(
                "GetFeatureCount",
                vec![ParamSignature::optional(
                    "TopLevelOnly",
                    ParamType::Bool,
                    Variant::Bool(false),
                )],
                ParamType::I32,
            ),
            move |_| Ok(Variant::I32(counted.load(Ordering::SeqCst) as i32)),
        )
        .method(
            MethodSignature::new(
                "FeatureFillet3",
                vec![
                    ParamSignature::required("Options", ParamType::I32),
                    ParamSignature::required("R1", ParamType::F64),
                    ParamSignature::optional("Ftyp", ParamType::I32, Variant::I32(0)),
                    ParamSignature::optional("OverflowType", ParamType::I32, Variant::I32(0)),
                ],
                ParamType::Object,
            ),
            move |args| {
                let radius = args.get(1).and_then(Variant::as_f64).unwrap_or(0.0);
                if radius <= 0.0 {
                    return Err(CallError::External("fillet radius must be positive".to_owned()));
                }
                features.fetch_add(1, Ordering::SeqCst);
                let feature: ObjectHandle = DemoObject::builder("IFeature")
                    .property("Name", ParamType::Text, true, Variant::Text("Fillet1".to_owned()))
                    .build();
                Ok(Variant::Object(feature))
            },
        )
        .property("EnableFeatureTree", ParamType::Bool, true, Variant::Bool(true))
        .build()
}

fn build_selection_manager() -> Arc<DemoObject> {
    DemoObject::builder("ISelectionMgr")
        .method(
            MethodSignature::new(
                "GetSelectedObjectCount2",
                vec![ParamSignature::required("Mark", ParamType::I32)],
                ParamType::I32,
            ),
            |_| Ok(Variant::I32(0)),
        )
        .build()
}

fn build_extension() -> Arc<DemoObject> {
    DemoObject::builder("IModelDocExtension")
        .method(
            MethodSignature::new(
                "SelectByID2",
                vec![
                    ParamSignature::required("Name", ParamType::Text),
                    ParamSignature::required("Type", ParamType::Text),
                    ParamSignature::required("X", ParamType::F64),
                    ParamSignature::required("Y", ParamType::F64),
                    ParamSignature::required("Z", ParamType::F64),
                    ParamSignature::optional("Append", ParamType::Bool, Variant::Bool(false)),
                    ParamSignature::optional("Mark", ParamType::I32, Variant::I32(0)),
                    ParamSignature::optional("Callout", ParamType::Object, Variant::Empty),
                    ParamSignature::optional("SelectOption", ParamType::I32, Variant::I32(0)),
                ],
                ParamType::Bool,
            ),
            |args| {
                let name = args.first().and_then(Variant::as_text).unwrap_or_default();
                Ok(Variant::Bool(!name.is_empty()))
            },
        )
        .method(
            MethodSignature::new(
                "GetMassProperties2",
                vec![ParamSignature::optional("Accuracy", ParamType::I32, Variant::I32(1))],
                ParamType::Array(Box::new(ParamType::F64)),
            ),
            |_| {
                let values = (0..12).map(|index| Variant::F64(f64::from(index) * 0.5));
                Ok(Variant::Array(values.collect()))
            },
        )
        .build()
}

fn build_demo_graph() -> DemoHandles {
    let sketch = Arc::new(Mutex::new(Vec::new()));
    let sketch_manager = build_sketch_manager(sketch.clone());
    let feature_manager = build_feature_manager();
    let selection_manager = build_selection_manager();
    let extension = build_extension();

    let document = DemoObject::builder("IModelDoc2")
        .method(MethodSignature::new("GetTitle", Vec::new(), ParamType::Text), |_| {
            Ok(Variant::Text("Part1".to_owned()))
        })
        .method(MethodSignature::new("GetType", Vec::new(), ParamType::I32), |_| {
            Ok(Variant::I32(1))
        })
        .method(MethodSignature::new("EditRebuild3", Vec::new(), ParamType::Bool), |_| {
            Ok(Variant::Bool(true))
        })
        .hidden_method(
            MethodSignature::new(
                "ForceRebuild3",
                vec![ParamSignature::required("TopOnly", ParamType::Bool)],
                ParamType::Bool,
            ),
            |_| Ok(Variant::Bool(true)),
        )
        .property("Visible", ParamType::Bool, true, Variant::Bool(true))
        .property(
            "SketchManager",
            ParamType::Object,
            false,
            Variant::Object(sketch_manager.clone()),
        )
        .property(
            "FeatureManager",
            ParamType::Object,
            false,
            Variant::Object(feature_manager.clone()),
        )
        .property(
            "SelectionManager",
            ParamType::Object,
            false,
            Variant::Object(selection_manager.clone()),
        )
        .property("Extension", ParamType::Object, false, Variant::Object(extension.clone()))
        .hidden_property("MaterialIdName", ParamType::Text, true, Variant::Text(String::new()))
        .build();

    let root = DemoObject::builder("ISldWorks")
        .method(MethodSignature::new("RevisionNumber", Vec::new(), ParamType::Text), |_| {
            Ok(Variant::Text("32.1.0".to_owned()))
        })
        .hidden_method(MethodSignature::new("GetProcessID", Vec::new(), ParamType::I32), |_| {
            Ok(Variant::I32(4242))
        })
        .property("Visible", ParamType::Bool, true, Variant::Bool(true))
        .property("FrameState", ParamType::I32, true, Variant::I32(1))
        .build();

    DemoHandles {
        root,
        document,
        sketch_manager,
        feature_manager,
        selection_manager,
        extension,
        sketch,
        alive: Arc::new(AtomicBool::new(true)),
        document_open: Arc::new(AtomicBool::new(true)),
    }
}

#[cfg(test)]
mod tests {
    use super::{DemoApplication, SketchEntity};
    use crate::model::{MethodSignature, ParamType, Variant};
    use crate::session::{Application, CallError, LiveObject};

    #[test]
    fn hidden_members_are_not_enumerable() {
        let handles = DemoApplication::new().handles();
        let names = handles
            .sketch_manager
            .methods()
            .into_iter()
            .map(|method| method.name.to_string())
            .collect::<Vec<_>>();
        assert!(names.contains(&"CreateLine".to_owned()));
        assert!(!names.iter().any(|name| name == "SketchUseEdge3"));

        let result = handles
            .sketch_manager
            .invoke_by_name("sketchuseedge3", vec![Variant::Bool(true), Variant::Bool(false)]);
        assert_eq!(result, Ok(Variant::Bool(false)));
    }

    #[test]
    fn call_method_records_geometry() {
        let handles = DemoApplication::new().handles();
        let signature = handles
            .sketch_manager
            .methods()
            .into_iter()
            .find(|method| method.name == "CreateLine")
            .expect("CreateLine signature");
        let args = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0].into_iter().map(Variant::F64).collect();
        let created = handles.sketch_manager.call_method(&signature, args).expect("create line");
        let shape = created.as_object().map(|handle| handle.shape_name().to_owned());
        assert_eq!(shape.as_deref(), Some("ISketchSegment"));
        assert_eq!(
            handles.sketch_entities(),
            vec![SketchEntity::Line { start: [0.0, 0.0, 0.0], end: [1.0, 0.0, 0.0] }]
        );
    }

    #[test]
    fn invalidated_objects_reject_calls() {
        let handles = DemoApplication::new().handles();
        handles.selection_manager.invalidate();
        let signature =
            MethodSignature::new("GetSelectedObjectCount2", Vec::new(), ParamType::I32);
        assert_eq!(
            handles.selection_manager.call_method(&signature, Vec::new()),
            Err(CallError::InvalidHandle)
        );
    }

    #[test]
    fn closing_the_document_clears_active_document() {
        let application = DemoApplication::new();
        let handles = application.handles();
        assert!(application.active_document().is_some());
        handles.close_document();
        assert!(application.active_document().is_none());
        assert!(application.root().is_some());
    }
}
