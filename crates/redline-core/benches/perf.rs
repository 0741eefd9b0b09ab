use criterion::{black_box, criterion_group, criterion_main, Criterion};
use redline_core::{find_citation, visible_range, ViewportState, WindowConfig};

fn large_diff(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 7 {
            0 => format!("+ Section {i}: Service Credit increased to 25% (est.)"),
            1 => format!("- Section {i}: Service Credit of 10%"),
            _ => format!("  Clause {i} remains unchanged for the purposes of this agreement."),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_visible_range(c: &mut Criterion) {
    let config = WindowConfig::default();
    c.bench_function("visible_range", |b| {
        let mut offset = 0.0;
        b.iter(|| {
            offset = (offset + 137.0) % 2_400_000.0;
            visible_range(
                black_box(ViewportState {
                    scroll_offset: offset,
                    viewport_height: 900.0,
                }),
                black_box(100_000),
                config,
            )
        })
    });
}

fn bench_find_citation(c: &mut Criterion) {
    let text = large_diff(50_000);
    c.bench_function("find_citation_late_match", |b| {
        b.iter(|| find_citation(black_box("Clause 49999 remains"), black_box(&text)))
    });
    c.bench_function("find_citation_miss", |b| {
        b.iter(|| find_citation(black_box("nonexistent phrase"), black_box(&text)))
    });
}

criterion_group!(benches, bench_visible_range, bench_find_citation);
criterion_main!(benches);
