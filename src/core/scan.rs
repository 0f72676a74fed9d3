//! Connectivity Scanner
//!
//! Bounded flood fill over the block lattice, used by content modules that
//! break whole veins or pools at once.
//!
//! ## Algorithm
//!
//! ```text
//! frontier <- [origin]
//! while budget > 0 and frontier not empty:
//!     pos <- oldest entry of frontier
//!     for each neighbour n of pos (per connectivity pattern):
//!         if accept(n) and n not visited and n not queued:
//!             queue n
//!     visited += pos; budget -= 1
//! ```
//!
//! The origin is always visited (it is not tested against the predicate).
//! Nothing is visited twice, and the result never holds more than `budget`
//! positions.

use std::collections::{BTreeSet, VecDeque};

use crate::core::pos::BlockPos;

/// The 6 face-adjacent offsets.
const FACES: [(i32, i32, i32); 6] = [
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
    (-1, 0, 0),
    (1, 0, 0),
];

/// The 12 edge-adjacent offsets (exactly two non-zero axes).
const EDGES: [(i32, i32, i32); 12] = [
    (-1, -1, 0),
    (0, -1, -1),
    (-1, 0, -1),
    (-1, 1, 0),
    (0, -1, 1),
    (1, 0, -1),
    (1, -1, 0),
    (0, 1, -1),
    (-1, 0, 1),
    (1, 1, 0),
    (0, 1, 1),
    (1, 0, 1),
];

/// The 8 corner-adjacent offsets (all three axes non-zero).
const CORNERS: [(i32, i32, i32); 8] = [
    (-1, -1, -1),
    (-1, -1, 1),
    (-1, 1, -1),
    (-1, 1, 1),
    (1, -1, -1),
    (1, -1, 1),
    (1, 1, -1),
    (1, 1, 1),
];

/// Which lattice neighbours count as adjacent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// Face-adjacent (6 neighbours)
    Six,
    /// Face and edge adjacent (18 neighbours)
    Eighteen,
    /// Full Moore neighbourhood (26 neighbours)
    TwentySix,
}

impl Connectivity {
    /// Number of neighbours in this pattern.
    pub const fn neighbour_count(self) -> usize {
        match self {
            Connectivity::Six => 6,
            Connectivity::Eighteen => 18,
            Connectivity::TwentySix => 26,
        }
    }

    /// Neighbour offsets, faces first, then edges, then corners.
    pub fn offsets(self) -> impl Iterator<Item = (i32, i32, i32)> {
        let edges: &'static [(i32, i32, i32)] = match self {
            Connectivity::Six => &[],
            _ => &EDGES,
        };
        let corners: &'static [(i32, i32, i32)] = match self {
            Connectivity::TwentySix => &CORNERS,
            _ => &[],
        };
        FACES.iter().chain(edges).chain(corners).copied()
    }

    /// Neighbours of `pos` under this pattern.
    pub fn neighbours(self, pos: BlockPos) -> impl Iterator<Item = BlockPos> {
        self.offsets().map(move |delta| pos.offset(delta))
    }
}

/// Flood fill from `origin`, visiting at most `budget` positions.
///
/// `accept` is evaluated on each candidate neighbour by value; it never sees
/// the origin.
pub fn scan<F>(origin: BlockPos, budget: usize, connectivity: Connectivity, mut accept: F) -> BTreeSet<BlockPos>
where
    F: FnMut(BlockPos) -> bool,
{
    let mut visited = BTreeSet::new();
    let mut queued = BTreeSet::new();
    let mut frontier = VecDeque::new();

    frontier.push_back(origin);
    queued.insert(origin);

    let mut remaining = budget;
    while remaining > 0 {
        let Some(pos) = frontier.pop_front() else {
            break;
        };
        queued.remove(&pos);

        for neighbour in connectivity.neighbours(pos) {
            if visited.contains(&neighbour) || queued.contains(&neighbour) {
                continue;
            }
            if accept(neighbour) {
                frontier.push_back(neighbour);
                queued.insert(neighbour);
            }
        }

        visited.insert(pos);
        remaining -= 1;
    }

    visited
}

/// Find 6-connected positions.
pub fn find_six<F>(origin: BlockPos, budget: usize, accept: F) -> BTreeSet<BlockPos>
where
    F: FnMut(BlockPos) -> bool,
{
    scan(origin, budget, Connectivity::Six, accept)
}

/// Find 18-connected positions.
pub fn find_eighteen<F>(origin: BlockPos, budget: usize, accept: F) -> BTreeSet<BlockPos>
where
    F: FnMut(BlockPos) -> bool,
{
    scan(origin, budget, Connectivity::Eighteen, accept)
}

/// Find 26-connected positions.
pub fn find_twenty_six<F>(origin: BlockPos, budget: usize, accept: F) -> BTreeSet<BlockPos>
where
    F: FnMut(BlockPos) -> bool,
{
    scan(origin, budget, Connectivity::TwentySix, accept)
}
