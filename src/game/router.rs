//! Event Router
//!
//! Gameplay hooks the host calls into, plus [`dispatch`] for hosts that
//! deliver everything as one [`HostEvent`] stream.
//!
//! | Event        | Result                                              |
//! |--------------|-----------------------------------------------------|
//! | damage       | veto while invulnerable, allow otherwise            |
//! | death        | eliminate, then veto default death handling         |
//! | block break  | veto when a module filter handles it                |
//! | explosion    | one block-break dispatch per position, no player    |
//! | mob loot     | module drops replace defaults when any filter hits  |

use tracing::{debug, warn};

use crate::core::pos::BlockPos;
use crate::game::command::Command;
use crate::game::engine::{MatchEngine, TickResult};
use crate::game::player::{Player, PlayerId};
use crate::game::world::GameWorld;

/// Answer to a vetoable host event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Let the host's default behaviour run
    Allow,
    /// Handled here; the host must not apply its default
    Veto,
}

/// Answer to a mob-loot event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LootDecision<I> {
    /// Drop the host's default loot
    Keep(Vec<I>),
    /// Drop these stacks instead
    Replace(Vec<I>),
}

impl<I> LootDecision<I> {
    /// The stacks that will actually drop.
    pub fn into_stacks(self) -> Vec<I> {
        match self {
            LootDecision::Keep(stacks) | LootDecision::Replace(stacks) => stacks,
        }
    }
}

/// An event delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent<E, I> {
    /// One game tick elapsed
    Tick,
    /// A player joined the match space
    PlayerAdd(Player),
    /// A player left the match space
    PlayerRemove(PlayerId),
    /// A player is about to take damage
    PlayerDamage {
        /// Player taking damage
        player: PlayerId,
        /// Damage amount
        amount: f32,
    },
    /// A player died
    PlayerDeath {
        /// Player who died
        player: PlayerId,
    },
    /// A block is being broken (no player for indirect breaks)
    BlockBreak {
        /// Breaking player, if any
        player: Option<PlayerId>,
        /// Broken block
        pos: BlockPos,
    },
    /// An explosion is destroying blocks
    Explosion {
        /// Blocks the explosion destroys
        positions: Vec<BlockPos>,
    },
    /// A mob died and is about to drop loot
    MobLoot {
        /// The dead mob
        entity: E,
        /// Loot the host would drop by default
        drops: Vec<I>,
    },
}

/// Per-event answer from [`dispatch`].
#[derive(Debug, PartialEq)]
pub enum EventResponse<I> {
    /// Lifecycle event, nothing to answer
    Done,
    /// Tick outcome
    Tick {
        /// Whether the match is closed after this tick
        closed: bool,
    },
    /// Vetoable event outcome
    Verdict(Verdict),
    /// Explosion outcome: how many positions a module consumed
    Explosion {
        /// Positions a module consumed
        consumed: usize,
    },
    /// Mob loot outcome
    Loot(LootDecision<I>),
}

/// Response plus the commands the event produced.
#[derive(Debug)]
pub struct Dispatch<I> {
    /// Event answer
    pub response: EventResponse<I>,
    /// Commands to deliver, in order
    pub commands: Vec<Command>,
}

impl<W: GameWorld> MatchEngine<W> {
    /// Damage hook: vetoed while the invulnerability flag is set.
    pub fn on_player_damage(&mut self, player: &PlayerId, amount: f32) -> Verdict {
        if self.is_closed() {
            warn!(player = %player.short(), "damage after close");
            return Verdict::Allow;
        }
        if self.is_invulnerable() {
            debug!(player = %player.short(), amount, "damage vetoed");
            Verdict::Veto
        } else {
            Verdict::Allow
        }
    }

    /// Death hook: the match eliminates the player and owns the respawn.
    pub fn on_player_death(&mut self, player: &PlayerId) -> Verdict {
        if self.is_closed() {
            warn!(player = %player.short(), "death after close");
            return Verdict::Allow;
        }
        self.eliminate(player);
        Verdict::Veto
    }

    /// Block-break hook: bucket filters first, then block-loot filters.
    pub fn on_block_broken(&mut self, player: Option<PlayerId>, pos: BlockPos) -> Verdict {
        if self.is_closed() {
            return Verdict::Allow;
        }
        let ctx = self.filter_context();
        let (modules, world) = self.modules_and_world();
        if modules.break_block(&ctx, world, player, pos) {
            debug!(%pos, "block break handled by module");
            Verdict::Veto
        } else {
            Verdict::Allow
        }
    }

    /// Explosion hook. Returns how many positions a module consumed.
    pub fn on_explosion(&mut self, positions: &[BlockPos]) -> usize {
        positions
            .iter()
            .filter(|pos| self.on_block_broken(None, **pos) == Verdict::Veto)
            .count()
    }

    /// Mob-loot hook: matching module filters replace the default drops.
    pub fn on_mob_loot(&mut self, entity: &W::Entity, drops: Vec<W::ItemStack>) -> LootDecision<W::ItemStack> {
        if self.is_closed() {
            return LootDecision::Keep(drops);
        }
        let (modules, world) = self.modules_and_world();
        match modules.mob_loot(world, entity) {
            Some(stacks) => LootDecision::Replace(stacks),
            None => LootDecision::Keep(drops),
        }
    }
}

/// Route one host event to its hook and collect the resulting commands.
pub fn dispatch<W: GameWorld>(
    engine: &mut MatchEngine<W>,
    event: HostEvent<W::Entity, W::ItemStack>,
) -> Dispatch<W::ItemStack> {
    let response = match event {
        HostEvent::Tick => {
            let TickResult { commands, closed, .. } = engine.tick();
            return Dispatch {
                response: EventResponse::Tick { closed },
                commands,
            };
        }
        HostEvent::PlayerAdd(player) => {
            engine.add_player(player);
            EventResponse::Done
        }
        HostEvent::PlayerRemove(id) => {
            engine.remove_player(&id);
            EventResponse::Done
        }
        HostEvent::PlayerDamage { player, amount } => EventResponse::Verdict(engine.on_player_damage(&player, amount)),
        HostEvent::PlayerDeath { player } => EventResponse::Verdict(engine.on_player_death(&player)),
        HostEvent::BlockBreak { player, pos } => EventResponse::Verdict(engine.on_block_broken(player, pos)),
        HostEvent::Explosion { positions } => EventResponse::Explosion {
            consumed: engine.on_explosion(&positions),
        },
        HostEvent::MobLoot { entity, drops } => EventResponse::Loot(engine.on_mob_loot(&entity, drops)),
    };

    Dispatch {
        response,
        commands: engine.take_commands(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::MatchConfig;
    use crate::game::module::{BlockBreakFilter, EntityLootFilter, FilterContext, Module, ModuleInfo, ModulePiece, ModuleSet};

    struct World {
        time: u64,
        broken: Vec<BlockPos>,
    }

    impl GameWorld for World {
        type Entity = String;
        type ItemStack = String;

        fn time(&self) -> u64 {
            self.time
        }
    }

    /// Handles blocks at y == 0 by recording them in the world.
    struct GroundLayer;

    impl BlockBreakFilter<World> for GroundLayer {
        fn break_block(&mut self, _: &FilterContext, world: &mut World, _: Option<PlayerId>, pos: BlockPos) -> bool {
            if pos.y == 0 {
                world.broken.push(pos);
                return true;
            }
            false
        }
    }

    struct ZombieFlesh;

    impl EntityLootFilter<World> for ZombieFlesh {
        fn test(&self, entity: &String) -> bool {
            entity == "zombie"
        }

        fn loot(&mut self, _: &mut World, _: &String) -> Vec<String> {
            vec!["leather".into()]
        }
    }

    fn engine() -> MatchEngine<World> {
        let module = Module::new(ModuleInfo::new("module.uhc.test", "minecraft:dirt", 0))
            .with_piece(ModulePiece::BlockLoot(Box::new(GroundLayer)))
            .with_piece(ModulePiece::EntityLoot(Box::new(ZombieFlesh)));
        let players = (1..=3).map(|i| Player::new(PlayerId::new([i; 16]), format!("p{}", i)));
        let mut engine = MatchEngine::open(
            World { time: 0, broken: Vec::new() },
            MatchConfig::default(),
            players,
            ModuleSet::new(vec![module]),
        )
        .unwrap();
        engine.take_commands();
        engine
    }

    #[test]
    fn test_damage_vetoed_while_invulnerable() {
        let mut engine = engine();
        let id = PlayerId::new([1; 16]);
        assert_eq!(engine.on_player_damage(&id, 4.0), Verdict::Veto);

        let invulnerability_end = engine.schedule().invulnerability_end;
        engine.world_mut().time = invulnerability_end;
        engine.tick();
        assert_eq!(engine.on_player_damage(&id, 4.0), Verdict::Allow);
    }

    #[test]
    fn test_death_eliminates_and_vetoes() {
        let mut engine = engine();
        let id = PlayerId::new([2; 16]);
        assert_eq!(engine.on_player_death(&id), Verdict::Veto);
        assert_eq!(engine.alive_count(), 2);
    }

    #[test]
    fn test_block_break_routing() {
        let mut engine = engine();
        assert_eq!(engine.on_block_broken(None, BlockPos::new(3, 0, 3)), Verdict::Veto);
        assert_eq!(engine.on_block_broken(None, BlockPos::new(3, 5, 3)), Verdict::Allow);
        assert_eq!(engine.world().broken, [BlockPos::new(3, 0, 3)]);
    }

    #[test]
    fn test_explosion_dispatches_each_position() {
        let mut engine = engine();
        let positions = [BlockPos::new(0, 0, 0), BlockPos::new(0, 1, 0), BlockPos::new(1, 0, 0)];
        assert_eq!(engine.on_explosion(&positions), 2);
        assert_eq!(engine.world().broken.len(), 2);
    }

    #[test]
    fn test_mob_loot_replace_or_keep() {
        let mut engine = engine();
        let replaced = engine.on_mob_loot(&"zombie".to_string(), vec!["rotten_flesh".into()]);
        assert_eq!(replaced, LootDecision::Replace(vec!["leather".into()]));

        let kept = engine.on_mob_loot(&"cow".to_string(), vec!["beef".into()]);
        assert_eq!(kept.into_stacks(), vec!["beef".to_string()]);
    }

    #[test]
    fn test_dispatch_collects_commands() {
        let mut engine = engine();
        let result = dispatch(&mut engine, HostEvent::PlayerDeath { player: PlayerId::new([1; 16]) });
        assert_eq!(result.response, EventResponse::Verdict(Verdict::Veto));
        assert!(result.commands.iter().any(|c| matches!(c, Command::ScatterInventory(_))));

        engine.world_mut().time = 1;
        let result = dispatch(&mut engine, HostEvent::Tick);
        assert_eq!(result.response, EventResponse::Tick { closed: false });
        assert!(!result.commands.is_empty());
    }

    #[test]
    fn test_late_join_is_spectator() {
        let mut engine = engine();
        let late = Player::new(PlayerId::new([9; 16]), "late");
        let result = dispatch(&mut engine, HostEvent::PlayerAdd(late));
        assert_eq!(result.response, EventResponse::Done);
        assert_eq!(engine.registry().participant_count(), 3);
        assert_eq!(engine.registry().len(), 4);

        // A late joiner dying is not an elimination
        let before = engine.alive_count();
        engine.on_player_death(&PlayerId::new([9; 16]));
        assert_eq!(engine.alive_count(), before);
    }
}
