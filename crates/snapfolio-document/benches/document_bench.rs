// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the snapfolio-document crate: planning a tall
// snapshot and emitting it into a recording writer.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use snapfolio_core::{
    ExportMode, FooterFormat, MarginSet, Orientation, PageGeometry, PaperSize, RasterSnapshot,
    SnapshotSize,
};
use snapfolio_document::{EmitOptions, RecordingWriter, compute_plan, emit};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Plan a long report (roughly 40 A4 pages) in both modes.
fn bench_compute_plan(c: &mut Criterion) {
    let geometry = PageGeometry::new(PaperSize::A4, Orientation::Portrait, MarginSet::default());
    let size = SnapshotSize::new(1588, 90_000);

    c.bench_function("compute_plan flow-fit (1588x90000)", |b| {
        b.iter(|| compute_plan(black_box(size), black_box(&geometry), ExportMode::FlowFit));
    });

    let fixed = ExportMode::fixed(2).unwrap_or(ExportMode::FlowFit);
    c.bench_function("compute_plan fixed-2 (1588x90000)", |b| {
        b.iter(|| compute_plan(black_box(size), black_box(&geometry), fixed));
    });
}

/// Emit the same plan with footers and margin masks.
fn bench_emit(c: &mut Criterion) {
    let geometry = PageGeometry::new(PaperSize::A4, Orientation::Portrait, MarginSet::default());
    // Small pixel buffer; the plan is computed for the tall size.
    let snapshot = RasterSnapshot::blank(16, 16);
    let plan = compute_plan(SnapshotSize::new(1588, 90_000), &geometry, ExportMode::FlowFit)
        .expect("valid geometry");
    let footer = FooterFormat::default();
    let options = EmitOptions::default();

    c.bench_function("emit 40 pages (recording writer)", |b| {
        b.iter(|| {
            let mut writer = RecordingWriter::new();
            emit(&mut writer, &snapshot, black_box(&plan), Some(&footer), &options)
                .expect("recording writer accepts everything");
            black_box(writer.into_calls());
        });
    });
}

criterion_group!(benches, bench_compute_plan, bench_emit);
criterion_main!(benches);
