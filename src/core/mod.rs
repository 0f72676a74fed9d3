//! Core deterministic primitives.
//!
//! Lattice coordinates, the bounded connectivity scanner used by content
//! modules, and state hashing for replay verification.

pub mod pos;
pub mod scan;
pub mod hash;

// Re-export core types
pub use pos::BlockPos;
pub use scan::{Connectivity, scan, find_six, find_eighteen, find_twenty_six};
pub use hash::{StateDigest, StateHash, StateHasher, compute_state_hash};
