//! Match Logic Module
//!
//! Everything that runs inside one match. Deterministic given the world
//! clock and the hook sequence.
//!
//! ## Module Structure
//!
//! - `config`: Durations, diameters, validation
//! - `phase`: Phase clock and boundary schedule
//! - `player`: Player identity and the participant registry
//! - `border`: World border controller
//! - `command`: Outbound command stream and the spawner seam
//! - `world`: Host world handle
//! - `module`: Content-extension filters and the module listing
//! - `elimination`: Elimination and win detection
//! - `engine`: Lifecycle hooks and the per-tick transition
//! - `router`: Gameplay hooks (damage, death, blocks, loot)

pub mod config;
pub mod phase;
pub mod player;
pub mod border;
pub mod command;
pub mod world;
pub mod module;
pub mod elimination;
pub mod engine;
pub mod router;

// Re-export key types
pub use config::{ConfigError, MatchConfig, PhaseDurations};
pub use phase::{Phase, PhaseSchedule};
pub use player::{GameMode, Player, PlayerId, Role};
pub use command::{Command, SpawnRequest, Spawner, Text};
pub use world::GameWorld;
pub use module::{BlockBreakFilter, BucketBreakFilter, EntityLootFilter, IndividualBreaks, Module, ModuleInfo, ModuleSet};
pub use elimination::Elimination;
pub use engine::{MatchEngine, TickResult};
pub use router::{dispatch, HostEvent, LootDecision, Verdict};
