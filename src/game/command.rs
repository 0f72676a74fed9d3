//! Outbound Commands
//!
//! Everything the engine wants the host to do, as plain values. Hooks push
//! commands in the order they must be applied; the host drains them after
//! each callback and delivers them (chat, sounds, packets, spawner calls).

use serde::{Serialize, Deserialize};

use crate::game::border::BorderState;
use crate::game::phase::Phase;
use crate::game::player::{GameMode, PlayerId};

// =============================================================================
// TEXT
// =============================================================================

/// Chat colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Calm phase-end notices
    Aqua,
    /// Phase-end warnings
    Red,
    /// Eliminations
    DarkRed,
    /// Headers and winners
    Gold,
    /// Module names
    Green,
    /// Plain separators
    White,
}

/// Body of a text component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextContent {
    /// Localised on the client from a translation key
    Translatable {
        /// Translation key
        key: String,
        /// Positional arguments
        args: Vec<String>,
    },
    /// Sent verbatim
    Literal(String),
}

/// A chat message component tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    /// This component's content
    pub content: TextContent,
    /// Colour, inherited by siblings when unset
    pub color: Option<Color>,
    /// Bold flag
    pub bold: bool,
    /// Wrap in square brackets
    pub bracketed: bool,
    /// Translation key shown on hover
    pub hover: Option<String>,
    /// Components appended after this one
    pub siblings: Vec<Text>,
}

impl Text {
    fn from_content(content: TextContent) -> Self {
        Self {
            content,
            color: None,
            bold: false,
            bracketed: false,
            hover: None,
            siblings: Vec::new(),
        }
    }

    /// Translatable text without arguments.
    pub fn translatable(key: impl Into<String>) -> Self {
        Self::translatable_with(key, Vec::new())
    }

    /// Translatable text with positional arguments.
    pub fn translatable_with(key: impl Into<String>, args: Vec<String>) -> Self {
        Self::from_content(TextContent::Translatable { key: key.into(), args })
    }

    /// Literal text.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::from_content(TextContent::Literal(text.into()))
    }

    /// Set the colour.
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Make bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Wrap in brackets.
    pub fn bracketed(mut self) -> Self {
        self.bracketed = true;
        self
    }

    /// Attach a hover translation key.
    pub fn hover(mut self, key: impl Into<String>) -> Self {
        self.hover = Some(key.into());
        self
    }

    /// Append a sibling component.
    pub fn append(mut self, sibling: Text) -> Self {
        self.siblings.push(sibling);
        self
    }

    /// Translation key of this component, if any.
    pub fn key(&self) -> Option<&str> {
        match &self.content {
            TextContent::Translatable { key, .. } => Some(key),
            TextContent::Literal(_) => None,
        }
    }

    /// Flatten to a plain string (keys stand in for translations).
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        if self.bracketed {
            out.push('[');
        }
        match &self.content {
            TextContent::Literal(text) => out.push_str(text),
            TextContent::Translatable { key, args } => {
                out.push_str(key);
                if !args.is_empty() {
                    out.push('(');
                    out.push_str(&args.join(", "));
                    out.push(')');
                }
            }
        }
        if self.bracketed {
            out.push(']');
        }
        for sibling in &self.siblings {
            sibling.write_plain(out);
        }
    }
}

// =============================================================================
// SMALL ENUMS
// =============================================================================

/// Sounds broadcast to the whole match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    /// Played on elimination
    WitherSpawn,
    /// Played with the enabled-modules list
    ItemPickup,
}

/// Host game rules set when the match opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameRule {
    /// Crafting tables and the 2x2 grid
    Crafting,
    /// Nether and end portal use
    Portals,
    /// Player versus player damage
    Pvp,
    /// Items dropped by broken blocks
    BlockDrops,
    /// Fall damage
    FallDamage,
    /// Hunger drain
    Hunger,
}

/// Whether a rule is allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleResult {
    /// The rule's behaviour is on
    Allow,
    /// The rule's behaviour is off
    Deny,
}

/// The fixed rule policy every match runs with.
pub const RULE_POLICY: [(GameRule, RuleResult); 6] = [
    (GameRule::Crafting, RuleResult::Allow),
    (GameRule::Portals, RuleResult::Deny),
    (GameRule::Pvp, RuleResult::Allow),
    (GameRule::BlockDrops, RuleResult::Allow),
    (GameRule::FallDamage, RuleResult::Allow),
    (GameRule::Hunger, RuleResult::Allow),
];

/// Kind of world-border packet sent to one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorderPacket {
    /// Full border state
    Initialize,
    /// Size interpolation
    LerpSize,
}

/// Status bar update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarUpdate {
    /// Countdown through a timed phase
    Progress {
        /// Phase being counted down
        phase: Phase,
        /// Ticks until its boundary
        remaining: u64,
        /// Configured length of the phase
        total: u64,
    },
    /// Switch the bar to deathmatch display
    Deathmatch,
}

/// Why the match closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloseReason {
    /// Ran to completion (timer or winner)
    Finished,
}

// =============================================================================
// SPAWNER
// =============================================================================

/// Player placement primitives implemented by the host.
pub trait Spawner {
    /// Clear inventory and effects, heal, and set the game mode.
    fn reset_player(&mut self, player: PlayerId, mode: GameMode);
    /// Build a cage at `(x, z)` and put the player inside it.
    fn spawn_in_cage(&mut self, player: PlayerId, x: i32, z: i32);
    /// Teleport the player to the map centre.
    fn spawn_at_center(&mut self, player: PlayerId);
    /// Remove every spawn cage.
    fn clear_cages(&mut self);
    /// Apply the match's timed effects, lasting until `expiry_tick`.
    fn apply_effects(&mut self, player: PlayerId, expiry_tick: u64);
}

/// A deferred call on the host's [`Spawner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnRequest {
    /// [`Spawner::reset_player`]
    Reset {
        /// Target player
        player: PlayerId,
        /// Mode to leave them in
        mode: GameMode,
    },
    /// [`Spawner::spawn_in_cage`]
    InCage {
        /// Target player
        player: PlayerId,
        /// Cage X
        x: i32,
        /// Cage Z
        z: i32,
    },
    /// [`Spawner::spawn_at_center`]
    AtCenter {
        /// Target player
        player: PlayerId,
    },
    /// [`Spawner::clear_cages`]
    ClearCages,
    /// [`Spawner::apply_effects`]
    ApplyEffects {
        /// Target player
        player: PlayerId,
        /// Tick the effects run out
        expiry_tick: u64,
    },
}

impl SpawnRequest {
    /// Forward this request to a spawner.
    pub fn apply_to<S: Spawner + ?Sized>(&self, spawner: &mut S) {
        match *self {
            SpawnRequest::Reset { player, mode } => spawner.reset_player(player, mode),
            SpawnRequest::InCage { player, x, z } => spawner.spawn_in_cage(player, x, z),
            SpawnRequest::AtCenter { player } => spawner.spawn_at_center(player),
            SpawnRequest::ClearCages => spawner.clear_cages(),
            SpawnRequest::ApplyEffects { player, expiry_tick } => spawner.apply_effects(player, expiry_tick),
        }
    }
}

// =============================================================================
// COMMAND
// =============================================================================

/// One outbound effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Set a host game rule
    SetRule(GameRule, RuleResult),
    /// Chat message to everyone present
    Broadcast(Text),
    /// Sound to everyone present
    PlaySound(Sound),
    /// Change a player's game mode directly
    SetGameMode {
        /// Target player
        player: PlayerId,
        /// New mode
        mode: GameMode,
    },
    /// Spawner call
    Spawn(SpawnRequest),
    /// Drop a player's inventory at their current position
    ScatterInventory(PlayerId),
    /// The world border changed
    UpdateBorder(BorderState),
    /// Send a border packet to one player
    SendBorder {
        /// Recipient
        player: PlayerId,
        /// Packet kind
        packet: BorderPacket,
        /// Border state the packet carries
        state: BorderState,
    },
    /// Status bar update
    Bar(BarUpdate),
    /// Close the match space
    Close(CloseReason),
}

impl Command {
    /// Translation key of a broadcast, for filtering in logs and tests.
    pub fn broadcast_key(&self) -> Option<&str> {
        match self {
            Command::Broadcast(text) => text.key(),
            _ => None,
        }
    }
}
