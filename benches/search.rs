// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use cadbridge::docs::DocIndex;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

mod fixtures;
mod profiler;

use fixtures::Case;

// Benchmark identity (keep stable):
// - Group names in this file: `docs.build`, `docs.search`, `docs.examples`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `small`, `fillet_radius_large`).
fn benches_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("docs.build");
    for case in [Case::CorpusSmall, Case::CorpusLarge] {
        let corpus = fixtures::corpus(case);
        let root = corpus.path().to_path_buf();
        group.bench_function(case.id(), move |b| {
            b.iter_batched(
                || DocIndex::new(Some(root.clone())),
                |index| black_box(index.len()),
                BatchSize::SmallInput,
            )
        });
        drop(corpus);
    }
    group.finish();
}

fn benches_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("docs.search");
    for case in [Case::CorpusSmall, Case::CorpusLarge] {
        let corpus = fixtures::corpus(case);
        let index = DocIndex::new(Some(corpus.path().to_path_buf()));
        // Pay for the scan outside the measured loop.
        assert!(!index.is_empty());

        for (query, id) in [("fillet radius", "fillet_radius"), ("CreateLine", "create_line")] {
            group.bench_function(format!("{id}_{}", case.id()), |b| {
                b.iter(|| black_box(index.search(black_box(query), 5)))
            });
        }
    }
    group.finish();
}

fn benches_examples(c: &mut Criterion) {
    let mut group = c.benchmark_group("docs.examples");
    let corpus = fixtures::corpus(Case::CorpusLarge);
    let index = DocIndex::new(Some(corpus.path().to_path_buf()));
    assert!(!index.is_empty());
    group.bench_function("extrusion_large", |b| {
        b.iter(|| black_box(index.examples(black_box("extrusion"), 5)))
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_build, benches_search, benches_examples
}
criterion_main!(benches);
