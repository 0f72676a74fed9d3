//! UHC Match Demo Host
//!
//! Runs a scripted match against an in-memory world, logs what the engine
//! asks the host to do, and verifies determinism by replaying the same
//! script and comparing state hashes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use uhc::{
    VERSION, TICK_RATE,
    core::{find_six, BlockPos, StateHash, StateHasher},
    game::{
        command::{Command, Spawner},
        dispatch, BlockBreakFilter, BucketBreakFilter, EntityLootFilter, GameMode, GameWorld, HostEvent,
        IndividualBreaks, MatchConfig, MatchEngine, Module, ModuleInfo, ModuleSet, Player, PlayerId,
        module::{FilterContext, ModulePiece},
    },
};

#[derive(Parser, Debug)]
#[command(name = "uhc-match")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Match configuration (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of participants
    #[arg(short, long, default_value = "8")]
    players: u8,

    /// Seed for the scripted elimination order
    #[arg(short, long, default_value = "12345")]
    seed: u64,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    let args = Args::parse();
    ensure!(args.players >= 2, "a match needs at least two players");

    info!("UHC Match v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            MatchConfig::from_json_str(&json).with_context(|| format!("loading {}", path.display()))?
        }
        None => MatchConfig::default(),
    };

    demo_match(&config, args.players, args.seed)
}

// =============================================================================
// IN-MEMORY HOST
// =============================================================================

/// World with a clock and a patch of ore the vein miner can clear.
struct DemoWorld {
    time: u64,
    ores: BTreeSet<BlockPos>,
    mined: Vec<BlockPos>,
    smelted: Vec<BlockPos>,
}

impl DemoWorld {
    fn new() -> Self {
        let mut ores = BTreeSet::new();
        for x in 0..4 {
            for y in 10..13 {
                ores.insert(BlockPos::new(x, y, 0));
            }
        }
        Self { time: 0, ores, mined: Vec::new(), smelted: Vec::new() }
    }
}

impl GameWorld for DemoWorld {
    type Entity = String;
    type ItemStack = String;

    fn time(&self) -> u64 {
        self.time
    }
}

/// Breaks a whole face-connected ore vein at once.
struct VeinMiner {
    budget: usize,
}

impl BucketBreakFilter<DemoWorld> for VeinMiner {
    fn break_blocks(
        &mut self,
        ctx: &FilterContext,
        world: &mut DemoWorld,
        player: Option<PlayerId>,
        pos: BlockPos,
        individual: &mut IndividualBreaks<'_, DemoWorld>,
    ) -> bool {
        if !world.ores.contains(&pos) {
            return false;
        }
        let vein = find_six(pos, self.budget, |p| world.ores.contains(&p));
        for block in &vein {
            if !individual.break_block(world, player, *block) {
                world.mined.push(*block);
            }
            world.ores.remove(block);
        }
        debug!(tick = ctx.tick, %pos, blocks = vein.len(), "vein mined");
        true
    }
}

/// Ore in the top layer of the patch drops ingots instead of raw ore.
struct AutoSmelt {
    layer: i32,
}

impl BlockBreakFilter<DemoWorld> for AutoSmelt {
    fn break_block(&mut self, _: &FilterContext, world: &mut DemoWorld, _: Option<PlayerId>, pos: BlockPos) -> bool {
        if pos.y != self.layer || !world.ores.contains(&pos) {
            return false;
        }
        world.smelted.push(pos);
        true
    }
}

/// Zombies drop leather.
struct Leatherworks;

impl EntityLootFilter<DemoWorld> for Leatherworks {
    fn test(&self, entity: &String) -> bool {
        entity == "zombie"
    }

    fn loot(&mut self, _: &mut DemoWorld, _: &String) -> Vec<String> {
        vec!["leather".to_string()]
    }
}

fn demo_modules() -> ModuleSet<DemoWorld> {
    ModuleSet::new(vec![
        Module::new(
            ModuleInfo::new("module.uhc.vein_miner", "minecraft:iron_pickaxe", 0xA0A0A0)
                .with_line("module.uhc.vein_miner.description"),
        )
        .with_piece(ModulePiece::BucketBreak(Box::new(VeinMiner { budget: 64 }))),
        Module::new(ModuleInfo::new("module.uhc.auto_smelt", "minecraft:furnace", 0xFF8C00))
            .with_piece(ModulePiece::BlockLoot(Box::new(AutoSmelt { layer: 12 }))),
        Module::new(ModuleInfo::new("module.uhc.leatherworks", "minecraft:leather", 0x8B5A2B))
            .with_piece(ModulePiece::EntityLoot(Box::new(Leatherworks))),
    ])
}

/// Records spawner calls instead of moving real players.
#[derive(Default)]
struct LoggingSpawner {
    calls: usize,
}

impl Spawner for LoggingSpawner {
    fn reset_player(&mut self, player: PlayerId, mode: GameMode) {
        self.calls += 1;
        debug!(player = %player.short(), ?mode, "reset");
    }

    fn spawn_in_cage(&mut self, player: PlayerId, x: i32, z: i32) {
        self.calls += 1;
        debug!(player = %player.short(), x, z, "caged");
    }

    fn spawn_at_center(&mut self, player: PlayerId) {
        self.calls += 1;
        debug!(player = %player.short(), "sent to centre");
    }

    fn clear_cages(&mut self) {
        self.calls += 1;
        debug!("cages cleared");
    }

    fn apply_effects(&mut self, player: PlayerId, expiry_tick: u64) {
        self.calls += 1;
        debug!(player = %player.short(), expiry_tick, "effects applied");
    }
}

/// Host side of the command stream.
#[derive(Default)]
struct DemoHost {
    spawner: LoggingSpawner,
    delivered: usize,
}

impl DemoHost {
    fn deliver(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.delivered += 1;
            match &command {
                Command::Spawn(request) => request.apply_to(&mut self.spawner),
                Command::Broadcast(text) => info!("[chat] {}", text.to_plain()),
                Command::Close(reason) => info!(?reason, "host closing match space"),
                other => debug!(?other, "command"),
            }
        }
    }
}

// =============================================================================
// SCRIPT
// =============================================================================

/// Participants sorted by a seed-keyed digest of their id.
fn elimination_order(seed: u64, ids: &[PlayerId]) -> Vec<PlayerId> {
    let mut keyed: Vec<(StateHash, PlayerId)> = ids
        .iter()
        .map(|id| {
            let mut hasher = StateHasher::new(b"UHC_DEMO_SCRIPT");
            hasher.put(&seed).put(id);
            (hasher.finalize(), *id)
        })
        .collect();
    keyed.sort();
    keyed.into_iter().map(|(_, id)| id).collect()
}

struct MatchSummary {
    hash: StateHash,
    final_tick: u64,
    winner: Option<PlayerId>,
    commands: usize,
    spawner_calls: usize,
    mined: usize,
    smelted: usize,
}

/// Play one full match. Everyone but the last player in the elimination
/// order dies, evenly spaced between the end of peaceful and the end of
/// deathmatch.
fn run_match(config: &MatchConfig, players: u8, seed: u64) -> Result<MatchSummary> {
    let roster: Vec<Player> = (0..players)
        .map(|i| Player::new(PlayerId::new([i + 1; 16]), format!("player{}", i + 1)))
        .collect();
    let ids: Vec<PlayerId> = roster.iter().map(|p| p.id).collect();

    let mut engine = MatchEngine::open(DemoWorld::new(), config.clone(), roster, demo_modules())
        .context("opening match")?;
    let mut host = DemoHost::default();
    host.deliver(engine.take_commands());

    if let Ok(listing) = engine.module_listing() {
        info!(rows = listing.rows, modules = listing.slots.len(), "module listing ready");
    }

    let schedule = *engine.schedule();
    let order = elimination_order(seed, &ids);
    let victims = &order[..order.len() - 1];
    let window = schedule.deathmatch_end.saturating_sub(schedule.peaceful_end);
    let spacing = (window / (victims.len() as u64 + 1)).max(1);
    let death_ticks: Vec<u64> = (1..=victims.len() as u64)
        .map(|k| schedule.peaceful_end + k * spacing)
        .collect();

    let ore = BlockPos::new(0, 10, 0);
    let late = Player::new(PlayerId::new([0xEE; 16]), "latecomer");
    let last_tick = schedule.close_tick + 1;

    for now in schedule.open_tick + 1..=last_tick {
        engine.world_mut().time = now;

        // Early damage is vetoed while invulnerable
        if now == schedule.open_tick + 1 {
            let first = ids[0];
            host.deliver(dispatch(&mut engine, HostEvent::PlayerDamage { player: first, amount: 4.0 }).commands);
            host.deliver(dispatch(&mut engine, HostEvent::PlayerAdd(late.clone())).commands);
        }
        if now == schedule.wild_end.saturating_sub(1) {
            host.deliver(dispatch(&mut engine, HostEvent::BlockBreak { player: Some(ids[0]), pos: ore }).commands);
            host.deliver(
                dispatch(
                    &mut engine,
                    HostEvent::MobLoot { entity: "zombie".to_string(), drops: vec!["rotten_flesh".to_string()] },
                )
                .commands,
            );
        }
        if let Some(index) = death_ticks.iter().position(|&t| t == now) {
            let victim = victims[index];
            host.deliver(dispatch(&mut engine, HostEvent::PlayerDeath { player: victim }).commands);
        }

        let result = dispatch(&mut engine, HostEvent::Tick);
        host.deliver(result.commands);

        if now % (TICK_RATE * 300) == 0 {
            info!(tick = now, phase = %engine.phase(), alive = engine.alive_count(), "progress");
        }
        if engine.is_closed() {
            break;
        }
    }

    let final_tick = engine.now();
    let winner = engine.winner();
    let hash = engine.state_hash();
    host.deliver(engine.close());

    Ok(MatchSummary {
        hash,
        final_tick,
        winner,
        commands: host.delivered,
        spawner_calls: host.spawner.calls,
        mined: engine.world().mined.len(),
        smelted: engine.world().smelted.len(),
    })
}

fn demo_match(config: &MatchConfig, players: u8, seed: u64) -> Result<()> {
    info!("=== Starting Demo Match ===");
    info!("Players: {}", players);
    info!("Seed: {}", seed);

    let summary = run_match(config, players, seed)?;

    info!("=== Match Results ===");
    info!("Closed at tick {}", summary.final_tick);
    match summary.winner {
        Some(winner) => info!("Winner: {}", winner.short()),
        None => info!("No winner"),
    }
    info!("Commands delivered: {} ({} spawner calls)", summary.commands, summary.spawner_calls);
    info!("Blocks mined by modules: {} ({} smelted)", summary.mined, summary.smelted);
    info!("Final State Hash: {}", hex::encode(summary.hash));

    info!("=== Verifying Determinism ===");
    let replay = run_match(config, players, seed)?;
    info!("Replay State Hash: {}", hex::encode(replay.hash));

    ensure!(summary.hash == replay.hash, "DETERMINISM FAILURE: hashes differ");
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
