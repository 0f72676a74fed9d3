//! Connectivity scanner tests against concrete block shapes.
//!
//! Run with: cargo test scanner

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use uhc::core::{find_eighteen, find_six, find_twenty_six, scan, BlockPos, Connectivity};

/// Solid cube of side `2 * radius + 1` centred on the origin.
fn cube(radius: i32) -> BTreeSet<BlockPos> {
    let mut blocks = BTreeSet::new();
    for x in -radius..=radius {
        for y in -radius..=radius {
            for z in -radius..=radius {
                blocks.insert(BlockPos::new(x, y, z));
            }
        }
    }
    blocks
}

#[test]
fn test_budget_one_is_origin_only() {
    for connectivity in [Connectivity::Six, Connectivity::Eighteen, Connectivity::TwentySix] {
        let found = scan(BlockPos::new(4, -2, 9), 1, connectivity, |_| true);
        assert_eq!(found.len(), 1);
        assert!(found.contains(&BlockPos::new(4, -2, 9)));
    }
}

#[test]
fn test_six_budget_seven_is_origin_and_faces() {
    let origin = BlockPos::new(10, 64, -3);
    let found = find_six(origin, 7, |_| true);
    let expected: BTreeSet<BlockPos> = [
        origin,
        origin.add(0, -1, 0),
        origin.add(0, 1, 0),
        origin.add(0, 0, -1),
        origin.add(0, 0, 1),
        origin.add(-1, 0, 0),
        origin.add(1, 0, 0),
    ]
    .into_iter()
    .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_whole_cube_found_with_enough_budget() {
    let blocks = cube(2);
    for connectivity in [Connectivity::Six, Connectivity::Eighteen, Connectivity::TwentySix] {
        let found = scan(BlockPos::ORIGIN, 1000, connectivity, |p| blocks.contains(&p));
        assert_eq!(found, blocks, "{:?}", connectivity);
    }
}

#[test]
fn test_budget_caps_result() {
    let blocks = cube(2);
    let found = find_twenty_six(BlockPos::ORIGIN, 40, |p| blocks.contains(&p));
    assert_eq!(found.len(), 40);
    assert!(found.is_subset(&blocks));
}

#[test]
fn test_shape_reachability_depends_on_connectivity() {
    // A staircase: each step touches the next only along an edge
    let stairs: BTreeSet<BlockPos> = (0..5).map(|i| BlockPos::new(i, i, 0)).collect();
    assert_eq!(find_six(BlockPos::ORIGIN, 64, |p| stairs.contains(&p)).len(), 1);
    assert_eq!(find_eighteen(BlockPos::ORIGIN, 64, |p| stairs.contains(&p)).len(), 5);

    // A body diagonal: each block touches the next only at a corner
    let diagonal: BTreeSet<BlockPos> = (0..5).map(|i| BlockPos::new(i, i, i)).collect();
    assert_eq!(find_eighteen(BlockPos::ORIGIN, 64, |p| diagonal.contains(&p)).len(), 1);
    assert_eq!(find_twenty_six(BlockPos::ORIGIN, 64, |p| diagonal.contains(&p)).len(), 5);
}

#[test]
fn test_origin_not_filtered() {
    // The caller decided the origin matters; the predicate only gates neighbours
    let found = find_six(BlockPos::new(1, 1, 1), 10, |p| p.y == 0);
    assert!(found.contains(&BlockPos::new(1, 1, 1)));
    assert!(found.contains(&BlockPos::new(1, 0, 1)));
}

#[test]
fn test_results_stay_connected() {
    let blocks = cube(3);
    let found = find_six(BlockPos::ORIGIN, 60, |p| blocks.contains(&p));
    for pos in &found {
        if *pos == BlockPos::ORIGIN {
            continue;
        }
        let touches = Connectivity::Six.neighbours(*pos).any(|n| found.contains(&n));
        assert!(touches, "{} is detached", pos);
    }
}
