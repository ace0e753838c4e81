//! Benchmarks for CPU-side field evaluation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use plasma::field::FieldKind;
use plasma::palette::PaletteKind;
use plasma::scene::{ColorCycling, FieldPlasma};

fn bench_field_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_frame");

    for (width, height) in [(128, 128), (320, 240), (640, 480)] {
        for (name, kind) in [
            ("classic", FieldKind::Classic),
            ("rgb", FieldKind::Rgb),
            (
                "interactive",
                FieldKind::Interactive {
                    cursor: glam::DVec2::ZERO,
                },
            ),
        ] {
            let mut scene = FieldPlasma::new(kind, width, height);
            group.bench_with_input(BenchmarkId::new(name, format!("{}x{}", width, height)), &1.5, |b, &t| {
                b.iter(|| scene.render(black_box(t)))
            });
        }
    }

    group.finish();
}

fn bench_palette_cycle(c: &mut Criterion) {
    let mut scene = ColorCycling::new(640, 480, PaletteKind::Rainbow);
    let mut ms = 0.0;
    c.bench_function("color_cycling_640x480", |b| {
        b.iter(|| {
            ms += 16.0;
            scene.render(black_box(ms))
        })
    });
}

criterion_group!(benches, bench_field_frame, bench_palette_cycle);
criterion_main!(benches);
