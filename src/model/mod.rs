// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Value and signature types shared by the dispatch pipeline.
//!
//! Incoming arguments are `ArgValue`s, values crossing into the external application are
//! `Variant`s, and member tables are described by `MethodSignature`/`PropertySignature`.

pub mod member;
pub mod value;
pub mod variant;

pub use member::{MethodSignature, ParamSignature, ParamType, PropertySignature};
pub use value::{ArgValue, Arguments, ArgumentsError};
pub use variant::{ObjectHandle, Variant};
