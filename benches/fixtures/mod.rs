// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::fmt::Write as _;
use std::path::Path;

use tempfile::TempDir;

const INTERFACES: [&str; 6] = [
    "IFeatureManager",
    "ISketchManager",
    "IModelDoc2",
    "IModelDocExtension",
    "ISelectionMgr",
    "ISldWorks",
];

const VERBS: [&str; 8] =
    ["Create", "Insert", "Feature", "Get", "Set", "Select", "Delete", "Edit"];

const NOUNS: [&str; 10] = [
    "Line", "Arc", "Fillet", "Chamfer", "Extrusion", "Cut", "Plane", "Sketch", "Body", "Face",
];

const FILLER: &str = "The return value is a handle to the created object or null on failure. \
Use the selection manager to pick the entities before calling this method. ";

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// Roughly a hundred pages.
    CorpusSmall,
    /// Roughly the size of a full API reference export.
    CorpusLarge,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::CorpusSmall => "small",
            Self::CorpusLarge => "large",
        }
    }

    fn members_per_interface(self) -> usize {
        match self {
            Self::CorpusSmall => 16,
            Self::CorpusLarge => 400,
        }
    }
}

/// Writes a reference corpus of member pages, overview pages and examples.
pub fn corpus(case: Case) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (index, interface) in INTERFACES.iter().enumerate() {
        write_page(
            dir.path(),
            &format!("{interface}.htm"),
            &page(&format!("{interface} Interface"), "Provides access to related members.", ""),
        );
        for member_index in 0..case.members_per_interface() {
            let seed = index * 31 + member_index;
            let member = format!(
                "{}{}{}",
                VERBS[seed % VERBS.len()],
                NOUNS[(seed / VERBS.len()) % NOUNS.len()],
                member_index
            );
            let description = format!(
                "{} a {} in the active document.",
                VERBS[seed % VERBS.len()],
                NOUNS[seed % NOUNS.len()].to_lowercase()
            );
            let syntax = format!("value = instance.{member}(Options, R1, Ftyp)");
            write_page(
                dir.path(),
                &format!("{interface}_{member}.htm"),
                &page(&format!("{member} Method ({interface})"), &description, &syntax),
            );
            if member_index % 8 == 0 {
                write_page(
                    dir.path(),
                    &format!("samples/{member}_Example_VB.htm"),
                    &page(&format!("{member} Example (VBA)"), &description, &syntax),
                );
            }
        }
    }
    dir
}

fn page(title: &str, description: &str, syntax: &str) -> String {
    let mut html = String::new();
    let _ = write!(html, "<html><body><h1>{title}</h1><h2>Description</h2><p>{description}</p>");
    if !syntax.is_empty() {
        let _ = write!(html, "<h2>Syntax (OLE Automation)</h2><pre>{syntax}</pre>");
    }
    let _ = write!(html, "<h2>Remarks</h2><p>{}</p></body></html>", FILLER.repeat(4));
    html
}

fn write_page(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write page");
}
