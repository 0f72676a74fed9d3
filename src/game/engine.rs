//! Match Engine
//!
//! Owns all match state and is its only mutator. The host calls the
//! lifecycle hooks (`open`, `tick`, `add_player`, `remove_player`, `close`)
//! and the gameplay hooks in `router.rs`, serialised, from one thread.
//! Every hook queues [`Command`]s; the host drains them with
//! [`MatchEngine::take_commands`] (or receives them in a [`TickResult`]).
//!
//! ## Determinism
//!
//! Given the same world clock readings and the same hook sequence, the
//! engine produces the same commands and the same [`MatchEngine::state_hash`].
//! Time only ever comes from [`GameWorld::time`].

use std::f64::consts::PI;

use tracing::{debug, info};

use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::border::BorderController;
use crate::game::command::{
    BarUpdate, BorderPacket, CloseReason, Color, Command, Sound, SpawnRequest, Text, RULE_POLICY,
};
use crate::game::config::{ConfigError, MatchConfig};
use crate::game::elimination::{self, Elimination};
use crate::game::module::{FilterContext, ModuleError, ModuleListing, ModuleSet};
use crate::game::phase::{ClockStep, Phase, PhaseSchedule};
use crate::game::player::{GameMode, ParticipantRegistry, Player, PlayerId, Role};
use crate::game::world::GameWorld;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Commands generated this tick
    pub commands: Vec<Command>,
    /// Phase active at this tick
    pub phase: Option<Phase>,
    /// Whether the match closed this tick (or earlier)
    pub closed: bool,
}

/// Spawn cage position for participant `index` of `count`, on a circle of
/// `radius` around the origin.
pub fn spawn_position(index: usize, count: usize, radius: f64) -> (i32, i32) {
    if count == 0 {
        return (0, 0);
    }
    let theta = (index as f64 / count as f64) * 2.0 * PI;
    let x = (theta.cos() * radius).floor() as i32;
    let z = (theta.sin() * radius).floor() as i32;
    (x, z)
}

/// A running match.
pub struct MatchEngine<W: GameWorld> {
    world: W,
    config: MatchConfig,
    schedule: PhaseSchedule,
    registry: ParticipantRegistry,
    border: BorderController,
    modules: ModuleSet<W>,
    invulnerable: bool,
    closed: bool,
    winner: Option<PlayerId>,
    pending: Vec<Command>,
}

impl<W: GameWorld> MatchEngine<W> {
    /// Open a match on `world` with the initial player set.
    ///
    /// Fails without side effects if the configuration is invalid.
    pub fn open(
        world: W,
        config: MatchConfig,
        players: impl IntoIterator<Item = Player>,
        modules: ModuleSet<W>,
    ) -> Result<Self, ConfigError> {
        let now = world.time();
        let schedule = config.schedule(now)?;
        let border = BorderController::new(config.start_diameter, config.end_diameter);
        let registry = ParticipantRegistry::from_initial(players);

        let mut engine = Self {
            world,
            config,
            schedule,
            registry,
            border,
            modules,
            invulnerable: true,
            closed: false,
            winner: None,
            pending: Vec::new(),
        };
        engine.start(now);
        Ok(engine)
    }

    fn start(&mut self, now: u64) {
        for (rule, result) in RULE_POLICY {
            self.pending.push(Command::SetRule(rule, result));
        }

        let border = self.border.initialize();
        self.pending.push(Command::UpdateBorder(border));

        let radius = self.config.spawn_radius();
        let ids: Vec<PlayerId> = self.registry.participants().map(|p| p.player.id).collect();
        let count = ids.len();
        for (index, id) in ids.into_iter().enumerate() {
            self.pending.push(Command::SendBorder {
                player: id,
                packet: BorderPacket::Initialize,
                state: border,
            });

            let (x, z) = spawn_position(index, count, radius);
            self.set_mode(id, GameMode::Adventure);
            self.pending.push(Command::Spawn(SpawnRequest::InCage { player: id, x, z }));
        }

        info!(
            tick = now,
            participants = count,
            modules = self.modules.infos().len(),
            close_tick = self.schedule.close_tick,
            "match opened"
        );
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The match world.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// The match world, mutably (host-side bookkeeping such as the clock).
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Current world tick.
    pub fn now(&self) -> u64 {
        self.world.time()
    }

    /// Configuration the match opened with.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Boundary ticks.
    pub fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    /// Everyone present.
    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    /// The border schedule.
    pub fn border(&self) -> &BorderController {
        &self.border
    }

    /// Enabled content modules.
    pub fn modules(&self) -> &ModuleSet<W> {
        &self.modules
    }

    /// Phase active right now.
    pub fn phase(&self) -> Phase {
        self.schedule.phase_at(self.now())
    }

    /// Whether damage is currently vetoed.
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    /// Whether the match has closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Announced winner, if any.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Module listing for the `/modules` screen.
    pub fn module_listing(&self) -> Result<ModuleListing, ModuleError> {
        self.modules.listing()
    }

    /// Drain queued commands.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn filter_context(&self) -> FilterContext {
        let tick = self.now();
        FilterContext { tick, phase: self.schedule.phase_at(tick) }
    }

    pub(crate) fn modules_and_world(&mut self) -> (&mut ModuleSet<W>, &mut W) {
        (&mut self.modules, &mut self.world)
    }

    fn set_mode(&mut self, id: PlayerId, mode: GameMode) {
        self.registry.set_mode(&id, mode);
        self.pending.push(Command::Spawn(SpawnRequest::Reset { player: id, mode }));
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Advance the match by one host tick.
    ///
    /// Performs at most one of: a phase progress update, or one boundary's
    /// one-time actions. The close check runs afterwards regardless.
    pub fn tick(&mut self) -> TickResult {
        if self.closed {
            return TickResult { closed: true, ..TickResult::default() };
        }

        let now = self.now();
        match self.schedule.step(now) {
            ClockStep::Within { phase, remaining, total } => {
                self.pending.push(Command::Bar(BarUpdate::Progress { phase, remaining, total }));
                if phase == Phase::Caging && self.is_announcement_tick(now, total) {
                    self.announce_modules();
                }
            }
            ClockStep::Boundary(ended) => self.end_phase(ended, now),
            ClockStep::Idle => {}
        }

        if self.schedule.is_past_close(now) {
            self.finish(CloseReason::Finished);
        }

        TickResult {
            commands: self.take_commands(),
            phase: Some(self.schedule.phase_at(now)),
            closed: self.closed,
        }
    }

    /// The caging tick with 80% of the caging time left.
    fn is_announcement_tick(&self, now: u64, caging_total: u64) -> bool {
        let scaled = caging_total.saturating_mul(4);
        scaled % 5 == 0 && now.saturating_add(scaled / 5) == self.schedule.cages_end
    }

    fn announce_modules(&mut self) {
        if let Some(text) = self.modules.announcement() {
            self.pending.push(Command::Broadcast(text));
            self.pending.push(Command::PlaySound(Sound::ItemPickup));
        }
    }

    fn broadcast(&mut self, key: &str, color: Color) {
        self.pending.push(Command::Broadcast(Text::translatable(key).color(color)));
    }

    fn end_phase(&mut self, ended: Phase, now: u64) {
        info!(tick = now, phase = %ended, "phase ended");

        match ended {
            Phase::Caging => {
                self.broadcast("text.uhc.cages_end", Color::Aqua);
                self.pending.push(Command::Spawn(SpawnRequest::ClearCages));
                let expiry_tick = self.schedule.shrinking_end;
                for id in self.registry.alive_ids() {
                    self.set_mode(id, GameMode::Survival);
                    self.pending.push(Command::Spawn(SpawnRequest::ApplyEffects { player: id, expiry_tick }));
                }
            }
            Phase::Invulnerable => {
                self.broadcast("text.uhc.invulnerability_end", Color::Red);
                self.invulnerable = false;
            }
            Phase::Peaceful => {
                self.broadcast("text.uhc.peaceful_end", Color::Red);
                self.invulnerable = false;
            }
            Phase::Wild => {
                self.broadcast("text.uhc.wild_end", Color::Red);
                let state = self.border.begin_shrink(self.schedule.duration(Phase::Shrinking));
                self.pending.push(Command::UpdateBorder(state));
                for id in self.registry.present_ids() {
                    self.pending.push(Command::SendBorder {
                        player: id,
                        packet: BorderPacket::LerpSize,
                        state,
                    });
                }
            }
            Phase::Shrinking => {
                self.broadcast("text.uhc.shrinking_end", Color::Aqua);
                let state = self.border.enter_deathmatch();
                self.pending.push(Command::UpdateBorder(state));
                self.pending.push(Command::Bar(BarUpdate::Deathmatch));
                let expiry_tick = self.schedule.deathmatch_end;
                for id in self.registry.alive_ids() {
                    self.pending.push(Command::Spawn(SpawnRequest::ApplyEffects { player: id, expiry_tick }));
                }
            }
            Phase::Deathmatch | Phase::Closing => {}
        }
    }

    fn finish(&mut self, reason: CloseReason) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.pending.push(Command::Close(reason));
        info!(tick = self.now(), ?reason, winner = ?self.winner, "match finished");
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Host close hook: return everyone present to Adventure mode.
    pub fn close(&mut self) -> Vec<Command> {
        for id in self.registry.present_ids() {
            self.registry.set_mode(&id, GameMode::Adventure);
            self.pending.push(Command::SetGameMode { player: id, mode: GameMode::Adventure });
        }
        self.closed = true;
        self.take_commands()
    }

    /// A player joined after the match opened. Always a spectator.
    pub fn add_player(&mut self, player: Player) {
        if self.closed {
            debug!(player = %player.id.short(), "join after close ignored");
            return;
        }
        let id = player.id;
        if !self.registry.add_spectator(player) {
            debug!(player = %id.short(), "known player rejoined as spectator");
        }
        self.pending.push(Command::SendBorder {
            player: id,
            packet: BorderPacket::Initialize,
            state: self.border.state(),
        });
        self.set_mode(id, GameMode::Spectator);
        self.pending.push(Command::Spawn(SpawnRequest::AtCenter { player: id }));
    }

    /// A player left. Participants are eliminated and marked absent;
    /// spectators are forgotten.
    pub fn remove_player(&mut self, id: &PlayerId) {
        if self.closed {
            return;
        }
        self.eliminate(id);
        self.registry.depart(id);
    }

    /// Eliminate a participant. Returns what happened.
    pub fn eliminate(&mut self, id: &PlayerId) -> Elimination {
        if self.closed {
            return Elimination::Ignored;
        }
        let now = self.now();
        let result = elimination::eliminate(&mut self.registry, &mut self.schedule, now, id, &mut self.pending);
        if let Elimination::Eliminated { winner: Some(winner) } = result {
            self.winner = Some(winner);
        }
        result
    }

    // =========================================================================
    // VERIFICATION
    // =========================================================================

    /// Hash of the match state for replay comparison.
    pub fn state_hash(&self) -> StateHash {
        compute_state_hash(self.now(), |hasher| {
            hasher.put_all(self.schedule.boundaries().iter());
            hasher.put(&self.invulnerable).put(&self.closed);

            let border = self.border.state();
            hasher
                .put(&border.size)
                .put(&border.damage_per_block)
                .put(&border.buffer)
                .put(&border.lerp.map(|lerp| lerp.millis));

            hasher.put_all(self.registry.entries().iter());
            hasher.put(&self.winner);
        })
    }

    /// Number of Alive participants.
    pub fn alive_count(&self) -> usize {
        self.registry.iter().filter(|p| p.role == Role::Alive).count()
    }
}
