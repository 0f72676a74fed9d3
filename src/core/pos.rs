//! Block Lattice Coordinates
//!
//! Integer 3-D coordinates for block positions in the world.
//! Passed by copy everywhere; there is no shared mutable cursor.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A block position on the integer lattice.
///
/// Implements Ord (x, then y, then z) so sets of positions iterate
/// deterministically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    /// X coordinate
    pub x: i32,
    /// Y coordinate (height)
    pub y: i32,
    /// Z coordinate
    pub z: i32,
}

impl BlockPos {
    /// The world origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset this position by a delta on each axis.
    #[inline]
    pub const fn add(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            z: self.z.wrapping_add(dz),
        }
    }

    /// Offset this position by a packed `(dx, dy, dz)` delta.
    #[inline]
    pub const fn offset(self, delta: (i32, i32, i32)) -> Self {
        self.add(delta.0, delta.1, delta.2)
    }
}

impl fmt::Debug for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockPos({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}
