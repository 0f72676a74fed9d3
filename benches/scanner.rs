//! Benchmarks for the connectivity scanner.
//!
//! Vein-sized and tree-sized scans are the hot path for block-break modules.

#![allow(missing_docs)]

use std::collections::BTreeSet;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use uhc::core::{BlockPos, Connectivity, scan};

/// Blocks of a rough oak: a trunk with a leafy crown.
fn tree() -> BTreeSet<BlockPos> {
    let mut blocks: BTreeSet<BlockPos> = (0..8).map(|y| BlockPos::new(0, y, 0)).collect();
    for x in -3..=3 {
        for y in 5..10 {
            for z in -3..=3 {
                blocks.insert(BlockPos::new(x, y, z));
            }
        }
    }
    blocks
}

fn bench_patterns(c: &mut Criterion) {
    let blocks = tree();

    for (name, connectivity) in [
        ("scan_six_256", Connectivity::Six),
        ("scan_eighteen_256", Connectivity::Eighteen),
        ("scan_twenty_six_256", Connectivity::TwentySix),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let found = scan(black_box(BlockPos::ORIGIN), 256, connectivity, |p| blocks.contains(&p));
                black_box(found)
            });
        });
    }
}

fn bench_open_field(c: &mut Criterion) {
    // Always-true predicate: cost is dominated by bookkeeping
    c.bench_function("scan_twenty_six_open_1024", |b| {
        b.iter(|| {
            let found = scan(black_box(BlockPos::ORIGIN), 1024, Connectivity::TwentySix, |_| true);
            black_box(found)
        });
    });
}

criterion_group!(benches, bench_patterns, bench_open_field);
criterion_main!(benches);
