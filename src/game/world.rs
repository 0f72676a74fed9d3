//! Host World Handle
//!
//! The playable world is produced by map generation and owned by the engine
//! for the duration of the match. The engine only reads the clock from it;
//! everything else is passed through to content modules.

/// A ready-to-use match world supplied by the host.
pub trait GameWorld {
    /// Host entity type (mobs offered to loot modules)
    type Entity;
    /// Host item stack type (drops produced by loot modules)
    type ItemStack;

    /// Current world tick.
    fn time(&self) -> u64;
}
