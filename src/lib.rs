//! # UHC Match Engine
//!
//! Phase-driven engine for one Ultra Hardcore match: timed phases, a
//! shrinking world border, elimination and win detection, and pluggable
//! content modules that can take over block breaks and mob loot.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      UHC MATCH ENGINE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── pos.rs        - Block lattice coordinates               │
//! │  ├── scan.rs       - Bounded connectivity scanner            │
//! │  └── hash.rs       - State hashing for replay checks         │
//! │                                                              │
//! │  game/             - The match                               │
//! │  ├── config.rs     - Durations, diameters, validation        │
//! │  ├── phase.rs      - Phase clock                             │
//! │  ├── player.rs     - Participant registry                    │
//! │  ├── border.rs     - World border controller                 │
//! │  ├── command.rs    - Outbound command stream                 │
//! │  ├── module.rs     - Content-extension filters               │
//! │  ├── elimination.rs- Elimination and win detection           │
//! │  ├── engine.rs     - Lifecycle and per-tick transition       │
//! │  └── router.rs     - Gameplay event hooks                    │
//! └─────────────────────────────────────────────────────────────┘
//!
//!   host ──hooks──▶ MatchEngine ──Command stream──▶ host
//!                      │   ▲
//!                      ▼   │ time()
//!                    GameWorld
//! ```
//!
//! ## Determinism
//!
//! The engine never reads wall-clock time. Every decision derives from
//! [`game::GameWorld::time`] and the order hooks are called in, and every
//! collection it iterates has a fixed order (open order for players,
//! `BTreeSet` for scanned coordinates). Two runs fed the same tick and
//! event sequence produce the same commands and the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::pos::BlockPos;
pub use core::scan::{Connectivity, scan};
pub use game::config::{ConfigError, MatchConfig, PhaseDurations};
pub use game::engine::{MatchEngine, TickResult};
pub use game::phase::Phase;
pub use game::player::{Player, PlayerId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Host tick rate (Hz)
pub const TICK_RATE: u64 = 20;

/// Milliseconds per host tick
pub const TICK_MILLIS: u64 = 1000 / TICK_RATE;

/// Ticks between the last player standing and the match closing (10 seconds)
pub const CLOSE_DELAY_TICKS: u64 = 10 * TICK_RATE;
