//! Content Modules
//!
//! Optional gameplay modules that intercept block breaking, bucket-style
//! multi-block breaking, and mob loot before the host's default behaviour.
//! A module groups one or more pieces under a display name and icon.

use std::fmt;

use crate::core::pos::BlockPos;
use crate::game::command::{Color, Text};
use crate::game::phase::Phase;
use crate::game::player::PlayerId;
use crate::game::world::GameWorld;

/// Slots per row in the module listing.
pub const SLOTS_PER_ROW: usize = 9;

/// Maximum rows in the module listing.
pub const MAX_ROWS: usize = 6;

/// Errors surfaced to callers querying modules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    /// The match runs without any content module.
    #[error("no modules enabled")]
    NoModulesEnabled,
}

/// Read-only view of the match handed to filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterContext {
    /// Current world tick
    pub tick: u64,
    /// Active phase
    pub phase: Phase,
}

/// Intercepts a block break. Returns true when the break was handled and the
/// default breakage must not happen.
pub trait BlockBreakFilter<W: GameWorld> {
    /// Handle the break of the single block at `pos`.
    fn break_block(&mut self, ctx: &FilterContext, world: &mut W, player: Option<PlayerId>, pos: BlockPos) -> bool;
}

/// Intercepts a block break and breaks several blocks at once.
///
/// Each block it removes should first be offered to `individual`, so
/// block-loot modules still produce their drops for it.
pub trait BucketBreakFilter<W: GameWorld> {
    /// Handle a break starting at `pos`. True when handled.
    fn break_blocks(
        &mut self,
        ctx: &FilterContext,
        world: &mut W,
        player: Option<PlayerId>,
        pos: BlockPos,
        individual: &mut IndividualBreaks<'_, W>,
    ) -> bool;
}

/// The block-loot filters, handed to bucket filters during a break.
pub struct IndividualBreaks<'a, W: GameWorld> {
    ctx: FilterContext,
    filters: &'a mut [Box<dyn BlockBreakFilter<W>>],
}

impl<W: GameWorld> IndividualBreaks<'_, W> {
    /// Offer one block to the block-loot filters, stopping at the first that
    /// handles it. False means the caller breaks it the default way.
    pub fn break_block(&mut self, world: &mut W, player: Option<PlayerId>, pos: BlockPos) -> bool {
        let ctx = self.ctx;
        self.filters.iter_mut().any(|filter| filter.break_block(&ctx, world, player, pos))
    }
}

/// Replaces the drops of matching entities.
pub trait EntityLootFilter<W: GameWorld> {
    /// Whether this filter applies to `entity`.
    fn test(&self, entity: &W::Entity) -> bool;
    /// Drops to produce for a matching entity.
    fn loot(&mut self, world: &mut W, entity: &W::Entity) -> Vec<W::ItemStack>;
}

/// One behaviour contributed by a module.
pub enum ModulePiece<W: GameWorld> {
    /// Breaks connected blocks at once (e.g. whole veins)
    BucketBreak(Box<dyn BucketBreakFilter<W>>),
    /// Custom drops for a single broken block
    BlockLoot(Box<dyn BlockBreakFilter<W>>),
    /// Custom drops for killed mobs
    EntityLoot(Box<dyn EntityLootFilter<W>>),
}

/// Display data for a module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Translation key of the module name
    pub translation: String,
    /// Icon item identifier
    pub icon: String,
    /// Name colour (RGB)
    pub color: u32,
    /// Translation keys of the description lines
    pub description: Vec<String>,
}

impl ModuleInfo {
    /// Create display data with no description lines.
    pub fn new(translation: impl Into<String>, icon: impl Into<String>, color: u32) -> Self {
        Self {
            translation: translation.into(),
            icon: icon.into(),
            color,
            description: Vec::new(),
        }
    }

    /// Add a description line.
    pub fn with_line(mut self, key: impl Into<String>) -> Self {
        self.description.push(key.into());
        self
    }

    /// Key of the hover text shown in chat.
    pub fn description_key(&self) -> String {
        format!("{}.description", self.translation)
    }
}

/// A content module.
pub struct Module<W: GameWorld> {
    /// Display data
    pub info: ModuleInfo,
    /// Behaviours
    pub pieces: Vec<ModulePiece<W>>,
}

impl<W: GameWorld> Module<W> {
    /// Create a module with no pieces.
    pub fn new(info: ModuleInfo) -> Self {
        Self { info, pieces: Vec::new() }
    }

    /// Add a piece.
    pub fn with_piece(mut self, piece: ModulePiece<W>) -> Self {
        self.pieces.push(piece);
        self
    }
}

/// One slot of the module listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleSlot {
    /// Slot index
    pub slot: usize,
    /// Name translation key
    pub name_key: String,
    /// Icon item identifier
    pub icon: String,
    /// Name colour
    pub color: u32,
    /// Lore lines (translation keys)
    pub lore: Vec<String>,
}

/// Contents of the module listing screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleListing {
    /// Title translation key
    pub title_key: &'static str,
    /// Number of 9-slot rows
    pub rows: usize,
    /// Filled slots
    pub slots: Vec<ModuleSlot>,
}

/// Enabled modules, with their pieces split by hook.
pub struct ModuleSet<W: GameWorld> {
    infos: Vec<ModuleInfo>,
    bucket_break: Vec<Box<dyn BucketBreakFilter<W>>>,
    block_loot: Vec<Box<dyn BlockBreakFilter<W>>>,
    entity_loot: Vec<Box<dyn EntityLootFilter<W>>>,
}

impl<W: GameWorld> Default for ModuleSet<W> {
    fn default() -> Self {
        Self {
            infos: Vec::new(),
            bucket_break: Vec::new(),
            block_loot: Vec::new(),
            entity_loot: Vec::new(),
        }
    }
}

impl<W: GameWorld> fmt::Debug for ModuleSet<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSet")
            .field("modules", &self.infos.iter().map(|m| m.translation.as_str()).collect::<Vec<_>>())
            .field("bucket_break", &self.bucket_break.len())
            .field("block_loot", &self.block_loot.len())
            .field("entity_loot", &self.entity_loot.len())
            .finish()
    }
}

impl<W: GameWorld> ModuleSet<W> {
    /// Split modules into per-hook piece lists, keeping module order.
    pub fn new(modules: Vec<Module<W>>) -> Self {
        let mut set = Self::default();
        for module in modules {
            for piece in module.pieces {
                match piece {
                    ModulePiece::BucketBreak(filter) => set.bucket_break.push(filter),
                    ModulePiece::BlockLoot(filter) => set.block_loot.push(filter),
                    ModulePiece::EntityLoot(filter) => set.entity_loot.push(filter),
                }
            }
            set.infos.push(module.info);
        }
        set
    }

    /// Whether no module is enabled.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Display data of every enabled module.
    pub fn infos(&self) -> &[ModuleInfo] {
        &self.infos
    }

    /// Offer a block break to bucket filters, then block-loot filters.
    ///
    /// Stops at the first filter that handles it. Bucket filters may re-offer
    /// every block they break to the block-loot filters.
    pub fn break_block(&mut self, ctx: &FilterContext, world: &mut W, player: Option<PlayerId>, pos: BlockPos) -> bool {
        let mut individual = IndividualBreaks { ctx: *ctx, filters: &mut self.block_loot };
        for filter in &mut self.bucket_break {
            if filter.break_blocks(ctx, world, player, pos, &mut individual) {
                return true;
            }
        }
        individual.break_block(world, player, pos)
    }

    /// Collect loot from every matching entity filter.
    ///
    /// `None` when no filter matches and default drops apply.
    pub fn mob_loot(&mut self, world: &mut W, entity: &W::Entity) -> Option<Vec<W::ItemStack>> {
        let mut matched = false;
        let mut stacks = Vec::new();
        for filter in &mut self.entity_loot {
            if filter.test(entity) {
                matched = true;
                stacks.extend(filter.loot(world, entity));
            }
        }
        matched.then_some(stacks)
    }

    /// Chat announcement of the enabled modules, if any.
    pub fn announcement(&self) -> Option<Text> {
        if self.is_empty() {
            return None;
        }
        let mut text = Text::literal("\n").append(Text::translatable("text.uhc.modules_enabled").color(Color::Gold));
        for info in &self.infos {
            text = text
                .append(Text::literal("\n  - ").color(Color::White))
                .append(
                    Text::translatable(info.translation.clone())
                        .color(Color::Green)
                        .bracketed()
                        .hover(info.description_key()),
                );
        }
        Some(text.append(Text::literal("\n")))
    }

    /// Slot layout of the module listing screen.
    ///
    /// Rows are `ceil(n / 9)` clamped to 1..=6; modules past the last slot
    /// are left out.
    pub fn listing(&self) -> Result<ModuleListing, ModuleError> {
        if self.is_empty() {
            return Err(ModuleError::NoModulesEnabled);
        }

        let rows = self.infos.len().div_ceil(SLOTS_PER_ROW).clamp(1, MAX_ROWS);
        let slots = self
            .infos
            .iter()
            .enumerate()
            .take(rows * SLOTS_PER_ROW)
            .map(|(slot, info)| ModuleSlot {
                slot,
                name_key: info.translation.clone(),
                icon: info.icon.clone(),
                color: info.color,
                lore: info.description.clone(),
            })
            .collect();

        Ok(ModuleListing {
            title_key: "ui.uhc.modules.title",
            rows,
            slots,
        })
    }
}
