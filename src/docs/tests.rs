// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::sync::Barrier;
use std::thread;

use tempfile::TempDir;

use super::DocIndex;

const FILLET_PAGE: &str = r#"<html><body>
<h1>FeatureFillet3 Method (IFeatureManager)</h1>
<h2>Description</h2>
<p>Creates a constant radius fillet on the selected edges.</p>
<h2>Syntax (OLE Automation)</h2>
<pre>value = instance.FeatureFillet3(Options, R1, Ftyp, OverflowType)</pre>
<h2>Parameters</h2>
<p>R1: fillet radius in meters</p>
<h2>Remarks</h2>
<p>Select the edges first.</p>
</body></html>"#;

const SKETCH_EXAMPLE: &str = r#"<html><body>
<h1>Sketch Example (VBA)</h1>
<p>Draws a sketch, then applies a fillet of the given radius using the ISketchManager Interface.
Fillet radius and fillet options are set below; the radius is in meters.</p>
<pre>Set swSketchMgr = swModel.SketchManager
swSketchMgr.InsertSketch True
' fillet radius: 0.01</pre>
</body></html>"#;

fn corpus(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write page");
    }
    dir
}

fn index(dir: &TempDir) -> DocIndex {
    DocIndex::new(Some(dir.path().to_path_buf()))
}

fn locators(index: &DocIndex, query: &str, max: usize) -> Vec<String> {
    index.search(query, max).into_iter().map(|record| record.source_locator).collect()
}

#[test]
fn interface_page_outranks_example_with_terms_only_in_body() {
    let dir = corpus(&[
        ("IFeatureManager_FeatureFillet3.htm", FILLET_PAGE),
        ("Sketch_Example_VB.htm", SKETCH_EXAMPLE),
    ]);
    let index = index(&dir);

    let results = index.search("fillet radius", 5);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].source_locator, "IFeatureManager_FeatureFillet3.htm");
    assert_eq!(results[1].source_locator, "Sketch_Example_VB.htm");
    assert!(results[0].relevance_score > results[1].relevance_score);

    let top = &results[0];
    assert_eq!(top.interface_name, "IFeatureManager");
    assert_eq!(top.member_name.as_deref(), Some("FeatureFillet3"));
    assert_eq!(top.description, "Creates a constant radius fillet on the selected edges.");
    assert_eq!(top.remarks, "Select the edges first.");

    // No file-name interface; the content mention is used instead.
    assert_eq!(results[1].interface_name, "ISketchManager");
    assert_eq!(results[1].member_name, None);
}

#[test]
fn file_name_hit_outranks_body_only_hit() {
    let dir = corpus(&[
        ("body_only.txt", "extrude extrude extrude extrude"),
        ("extrude_notes.txt", "unrelated text"),
    ]);
    let results = index(&dir).search("extrude", 5);
    assert_eq!(results[0].source_locator, "extrude_notes.txt");
    assert_eq!(results[0].relevance_score, 10.0);
    assert_eq!(results[1].relevance_score, 2.0);
}

#[test]
fn content_matches_ignore_case_and_records_keep_it() {
    let dir = corpus(&[("notes.txt", "Ébauche then ÉBAUCHE, Extrude once")]);
    let results = index(&dir).search("ébauche", 5);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].relevance_score, 1.0);
    assert_eq!(results[0].description, "Ébauche then ÉBAUCHE, Extrude once");
}

#[test]
fn interface_pages_get_a_multiplier_but_examples_do_not() {
    let dir = corpus(&[
        ("Foo_Bar.txt", "bar bar"),
        ("IFoo_Bar.txt", "bar bar"),
        ("IFoo_Bar_Example.txt", "bar bar"),
    ]);
    let results = index(&dir).search("bar", 5);
    let score_of = |locator: &str| {
        results
            .iter()
            .find(|record| record.source_locator == locator)
            .map(|record| record.relevance_score)
            .expect("result present")
    };
    assert_eq!(score_of("IFoo_Bar.txt"), 16.5);
    assert_eq!(score_of("Foo_Bar.txt"), 11.0);
    assert_eq!(score_of("IFoo_Bar_Example.txt"), 11.0);
    assert_eq!(results[0].source_locator, "IFoo_Bar.txt");
}

#[test]
fn equal_scores_keep_enumeration_order() {
    let dir = corpus(&[("c.txt", "loft"), ("a.txt", "loft"), ("b.txt", "loft")]);
    assert_eq!(locators(&index(&dir), "loft", 3), vec!["a.txt", "b.txt", "c.txt"]);
}

#[test]
fn early_cutoff_can_miss_a_later_better_match() {
    let dir = corpus(&[
        ("a1.txt", "sweep"),
        ("a2.txt", "sweep"),
        ("a3.txt", "sweep"),
        ("a4.txt", "sweep"),
        ("zz_sweep.txt", "sweep sweep"),
    ]);
    let index = index(&dir);

    // Three candidates fill the budget for one result; `zz_sweep.txt` is never scored.
    assert_eq!(locators(&index, "sweep", 1), vec!["a1.txt"]);
    assert_eq!(locators(&index, "sweep", 2)[0], "zz_sweep.txt");
}

#[test]
fn empty_queries_and_zero_limits_return_nothing() {
    let dir = corpus(&[("IFoo.txt", "foo")]);
    let index = index(&dir);
    assert!(index.search("   ", 5).is_empty());
    assert!(index.search("foo", 0).is_empty());
    assert!(index.search("nothing-matches-this", 5).is_empty());
}

#[test]
fn missing_root_is_an_empty_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    let index = DocIndex::new(Some(dir.path().join("does-not-exist")));
    assert!(index.search("fillet", 5).is_empty());
    assert!(index.lookup("IFeatureManager", None).is_none());
    assert!(index.is_empty());
    assert_eq!(index.scan_count(), 1);

    let unconfigured = DocIndex::empty();
    assert!(unconfigured.examples("fillet", 5).is_empty());
    assert_eq!(unconfigured.root(), None);
}

#[test]
fn concurrent_first_access_scans_once() {
    let dir = corpus(&[
        ("IFeatureManager_FeatureFillet3.htm", FILLET_PAGE),
        ("Sketch_Example_VB.htm", SKETCH_EXAMPLE),
    ]);
    let index = index(&dir);
    let workers = 8;
    let barrier = Barrier::new(workers);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                barrier.wait();
                assert_eq!(index.search("fillet", 5).len(), 2);
            });
        }
    });

    assert_eq!(index.scan_count(), 1);
    index.search("radius", 5);
    assert_eq!(index.scan_count(), 1);
}

#[test]
fn nested_directories_are_indexed_with_relative_locators() {
    let dir = corpus(&[("api/sketch/ISketchManager_CreateLine.htm", "<p>Creates a line.</p>")]);
    let index = index(&dir);
    assert_eq!(index.len(), 1);
    assert_eq!(
        locators(&index, "createline", 5),
        vec!["api/sketch/ISketchManager_CreateLine.htm"]
    );
}

fn lookup_corpus() -> TempDir {
    corpus(&[
        ("A_samples/IFeatureManager_FeatureFillet3_Example.htm", SKETCH_EXAMPLE),
        ("IFeatureManager.htm", "<h1>IFeatureManager Interface</h1><p>Creates features.</p>"),
        ("IFeatureManager_FeatureFillet3.htm", FILLET_PAGE),
        ("IFeatureManager_GetFeatureCount.htm", "<p>Counts features.</p>"),
        ("IFeatureManager_members.htm", "<p>All members.</p>"),
        ("ISketchManager_members.htm", "<p>ISketchManager members.</p>"),
    ])
}

#[test]
fn member_lookup_prefers_reference_pages_over_examples() {
    let dir = lookup_corpus();
    let record = index(&dir)
        .lookup("ifeaturemanager", Some("featurefillet3"))
        .expect("member page");
    assert_eq!(record.source_locator, "IFeatureManager_FeatureFillet3.htm");
    assert_eq!(
        record.syntax,
        "value = instance.FeatureFillet3(Options, R1, Ftyp, OverflowType)"
    );
}

#[test]
fn interface_lookup_finds_the_overview_page() {
    let dir = lookup_corpus();
    let index = index(&dir);

    let overview = index.lookup("IFeatureManager", None).expect("overview");
    assert_eq!(overview.source_locator, "IFeatureManager.htm");

    let members_page = index.lookup("ISketchManager", None).expect("members page");
    assert_eq!(members_page.source_locator, "ISketchManager_members.htm");

    assert!(index.lookup("IBody2", None).is_none());
    assert!(index.lookup("IFeatureManager", Some("FeatureExtrusion3")).is_none());
}

#[test]
fn members_lists_documented_names_once() {
    let dir = lookup_corpus();
    assert_eq!(
        index(&dir).members("IFeatureManager"),
        vec!["FeatureFillet3".to_owned(), "GetFeatureCount".to_owned()]
    );
    assert!(index(&dir).members("IBody2").is_empty());
}

#[test]
fn examples_carry_code_and_a_short_description() {
    let dir = corpus(&[
        ("IFeatureManager_FeatureFillet3.htm", FILLET_PAGE),
        ("Sketch_Example_VB.htm", SKETCH_EXAMPLE),
    ]);
    let examples = index(&dir).examples("fillet", 5);
    assert_eq!(examples.len(), 1);

    let example = &examples[0];
    assert_eq!(example.title, "Sketch Example VB");
    assert_eq!(example.source_locator, "Sketch_Example_VB.htm");
    assert!(example.description.starts_with("Sketch Example (VBA)"));
    assert!(example.description.chars().count() <= 303);
    let code = example.code.as_deref().expect("code block");
    assert!(code.starts_with("Set swSketchMgr = swModel.SketchManager"));
    assert!(code.ends_with("' fillet radius: 0.01"));
}
