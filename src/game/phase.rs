//! Phase Clock
//!
//! Converts world ticks into the active match phase.
//!
//! ## Timeline
//!
//! ```text
//! open ── Caging ── cages_end ── Invulnerable ── invulnerability_end ── Peaceful ── peaceful_end
//!      ── Wild ── wild_end ── Shrinking ── shrinking_end ── Deathmatch ── deathmatch_end
//!      ── Closing ── close_tick
//! ```
//!
//! A tick equal to a boundary is the transition tick of the phase that just
//! ended. Transitions are matched with `==`, so a boundary tick the host
//! never delivers is never acted on.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::CLOSE_DELAY_TICKS;
use crate::game::config::PhaseDurations;

/// Phase of a running match, in chronological order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    /// Players held in cages at their spawn points
    Caging = 0,
    /// Released, but all damage is vetoed
    Invulnerable = 1,
    /// Damage allowed, hostile world still calm
    Peaceful = 2,
    /// Open play at full border size
    Wild = 3,
    /// Border interpolating towards the end diameter
    Shrinking = 4,
    /// Border at minimum, high border damage
    Deathmatch = 5,
    /// Waiting for the close tick
    Closing = 6,
}

impl Phase {
    /// All phases in order.
    pub const ALL: [Phase; 7] = [
        Phase::Caging,
        Phase::Invulnerable,
        Phase::Peaceful,
        Phase::Wild,
        Phase::Shrinking,
        Phase::Deathmatch,
        Phase::Closing,
    ];

    /// Stable lowercase name, used in logs and status keys.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Caging => "caging",
            Phase::Invulnerable => "invulnerable",
            Phase::Peaceful => "peaceful",
            Phase::Wild => "wild",
            Phase::Shrinking => "shrinking",
            Phase::Deathmatch => "deathmatch",
            Phase::Closing => "closing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the clock says about a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockStep {
    /// Strictly inside a phase that has a progress display.
    Within {
        /// Active phase
        phase: Phase,
        /// Ticks until the phase boundary
        remaining: u64,
        /// Configured length of the phase
        total: u64,
    },
    /// Exactly on the boundary ending `ended`.
    Boundary(Phase),
    /// Deathmatch or later; nothing scheduled.
    Idle,
}

/// Absolute boundary ticks, derived once when the match opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSchedule {
    /// Tick the match opened at
    pub open_tick: u64,
    /// End of Caging
    pub cages_end: u64,
    /// End of Invulnerable
    pub invulnerability_end: u64,
    /// End of Peaceful
    pub peaceful_end: u64,
    /// End of Wild
    pub wild_end: u64,
    /// End of Shrinking
    pub shrinking_end: u64,
    /// End of Deathmatch
    pub deathmatch_end: u64,
    /// Tick after which the match closes (may be pulled in by a win)
    pub close_tick: u64,
}

impl PhaseSchedule {
    /// Derive boundaries additively from `open_tick`.
    ///
    /// Returns `None` if any duration is negative or a boundary overflows.
    pub fn derive(open_tick: u64, durations: &PhaseDurations) -> Option<Self> {
        let step = |from: u64, ticks: i64| -> Option<u64> {
            from.checked_add(u64::try_from(ticks).ok()?)
        };

        let cages_end = step(open_tick, durations.caging)?;
        let invulnerability_end = step(cages_end, durations.invulnerability)?;
        let peaceful_end = step(invulnerability_end, durations.peaceful)?;
        let wild_end = step(peaceful_end, durations.wild)?;
        let shrinking_end = step(wild_end, durations.shrinking)?;
        let deathmatch_end = step(shrinking_end, durations.deathmatch)?;
        let close_tick = deathmatch_end.checked_add(CLOSE_DELAY_TICKS)?;

        Some(Self {
            open_tick,
            cages_end,
            invulnerability_end,
            peaceful_end,
            wild_end,
            shrinking_end,
            deathmatch_end,
            close_tick,
        })
    }

    /// Boundary ticks in order, ending with the close tick.
    pub fn boundaries(&self) -> [u64; 7] {
        [
            self.cages_end,
            self.invulnerability_end,
            self.peaceful_end,
            self.wild_end,
            self.shrinking_end,
            self.deathmatch_end,
            self.close_tick,
        ]
    }

    /// Start and end tick of a phase.
    pub fn span(&self, phase: Phase) -> (u64, u64) {
        match phase {
            Phase::Caging => (self.open_tick, self.cages_end),
            Phase::Invulnerable => (self.cages_end, self.invulnerability_end),
            Phase::Peaceful => (self.invulnerability_end, self.peaceful_end),
            Phase::Wild => (self.peaceful_end, self.wild_end),
            Phase::Shrinking => (self.wild_end, self.shrinking_end),
            Phase::Deathmatch => (self.shrinking_end, self.deathmatch_end),
            Phase::Closing => (self.deathmatch_end, self.close_tick.max(self.deathmatch_end)),
        }
    }

    /// Configured length of a phase in ticks.
    pub fn duration(&self, phase: Phase) -> u64 {
        let (start, end) = self.span(phase);
        end - start
    }

    /// Active phase at `now`. Total and non-decreasing in `now`.
    ///
    /// Ticks before `open_tick` report Caging.
    pub fn phase_at(&self, now: u64) -> Phase {
        if now < self.cages_end {
            Phase::Caging
        } else if now < self.invulnerability_end {
            Phase::Invulnerable
        } else if now < self.peaceful_end {
            Phase::Peaceful
        } else if now < self.wild_end {
            Phase::Wild
        } else if now < self.shrinking_end {
            Phase::Shrinking
        } else if now < self.deathmatch_end {
            Phase::Deathmatch
        } else {
            Phase::Closing
        }
    }

    /// Ticks left in the phase active at `now`.
    pub fn remaining(&self, now: u64) -> u64 {
        let (_, end) = self.span(self.phase_at(now));
        end.saturating_sub(now)
    }

    /// Classify `now` for the per-tick transition pass.
    ///
    /// Phases are tested in boundary order; the first match wins.
    pub fn step(&self, now: u64) -> ClockStep {
        // Deathmatch and Closing have no progress display
        let timed = Phase::ALL.into_iter().take_while(|&phase| phase != Phase::Deathmatch);

        for phase in timed {
            let (_, end) = self.span(phase);
            if now < end {
                return ClockStep::Within {
                    phase,
                    remaining: end - now,
                    total: self.duration(phase),
                };
            }
            if now == end {
                return ClockStep::Boundary(phase);
            }
        }

        ClockStep::Idle
    }

    /// Pull the close tick in to `now + CLOSE_DELAY_TICKS`.
    pub fn schedule_close(&mut self, now: u64) {
        self.close_tick = now.saturating_add(CLOSE_DELAY_TICKS);
    }

    /// Whether the match should close at `now`.
    #[inline]
    pub fn is_past_close(&self, now: u64) -> bool {
        now > self.close_tick
    }
}
