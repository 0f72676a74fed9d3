//! Elimination Tracking
//!
//! Knocks participants out and detects the last one standing.

use tracing::{debug, info};

use crate::game::command::{Color, Command, Sound, SpawnRequest, Text};
use crate::game::phase::PhaseSchedule;
use crate::game::player::{GameMode, ParticipantRegistry, PlayerId, Role};

/// Result of an elimination request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Elimination {
    /// Unknown player, spectator, or already eliminated: nothing happened.
    Ignored,
    /// The player was eliminated.
    Eliminated {
        /// Set when exactly one contender remains afterwards.
        winner: Option<PlayerId>,
    },
}

/// The sole remaining contender, if there is exactly one.
///
/// With several contenders left this returns `None`; with exactly one it
/// returns the first found in open order.
pub fn sole_contender(registry: &ParticipantRegistry) -> Option<PlayerId> {
    if registry.contender_count() != 1 {
        return None;
    }
    registry
        .iter()
        .find(|p| p.is_contender())
        .map(|p| p.player.id)
}

/// Eliminate `id` at tick `now`, pushing the resulting commands onto `out`.
///
/// Idempotent: only an Alive participant can be eliminated, once.
pub fn eliminate(
    registry: &mut ParticipantRegistry,
    schedule: &mut PhaseSchedule,
    now: u64,
    id: &PlayerId,
    out: &mut Vec<Command>,
) -> Elimination {
    let Some(entry) = registry.get_mut(id) else {
        debug!(player = %id.short(), "elimination of unknown player ignored");
        return Elimination::Ignored;
    };
    if entry.role != Role::Alive {
        debug!(player = %id.short(), role = ?entry.role, "elimination ignored");
        return Elimination::Ignored;
    }

    entry.role = Role::Eliminated;
    entry.eliminated_tick = Some(now);
    entry.mode = GameMode::Spectator;
    let name = entry.player.name.clone();

    out.push(Command::Broadcast(
        Text::literal("\n")
            .append(
                Text::translatable_with("text.uhc.player_eliminated", vec![name.clone()])
                    .bold()
                    .color(Color::DarkRed),
            )
            .append(Text::literal("\n")),
    ));
    out.push(Command::PlaySound(Sound::WitherSpawn));
    out.push(Command::ScatterInventory(*id));
    out.push(Command::Spawn(SpawnRequest::Reset { player: *id, mode: GameMode::Spectator }));
    out.push(Command::Spawn(SpawnRequest::AtCenter { player: *id }));

    debug!(player = %id.short(), %name, tick = now, "player eliminated");

    let winner = sole_contender(registry);
    if let Some(winner_id) = winner {
        let winner_name = registry
            .get(&winner_id)
            .map(|p| p.player.name.clone())
            .unwrap_or_default();
        out.push(Command::Broadcast(
            Text::translatable_with("text.uhc.player_win", vec![winner_name.clone()]).color(Color::Gold),
        ));
        schedule.schedule_close(now);
        info!(winner = %winner_name, close_tick = schedule.close_tick, "last player standing");
    }

    Elimination::Eliminated { winner }
}
