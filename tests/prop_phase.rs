//! Property-based tests for the phase clock and the scanner.
//!
//! Run with: cargo test --release prop_phase

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use uhc::core::{scan, BlockPos, Connectivity};
use uhc::game::phase::{ClockStep, PhaseSchedule};
use uhc::game::{Phase, PhaseDurations};
use uhc::CLOSE_DELAY_TICKS;

fn durations() -> impl Strategy<Value = PhaseDurations> {
    (0i64..2000, 0i64..2000, 0i64..2000, 0i64..2000, 0i64..2000, 0i64..2000).prop_map(
        |(caging, invulnerability, peaceful, wild, shrinking, deathmatch)| PhaseDurations {
            caging,
            invulnerability,
            peaceful,
            wild,
            shrinking,
            deathmatch,
        },
    )
}

fn connectivity() -> impl Strategy<Value = Connectivity> {
    prop_oneof![
        Just(Connectivity::Six),
        Just(Connectivity::Eighteen),
        Just(Connectivity::TwentySix),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Boundaries are ordered and spaced by the configured durations.
    #[test]
    fn prop_boundaries_follow_durations(open in 0u64..1_000_000, d in durations()) {
        let schedule = PhaseSchedule::derive(open, &d).unwrap();
        let bounds = schedule.boundaries();

        prop_assert_eq!(bounds[0], open + d.caging as u64);
        for (i, (_, ticks)) in d.in_order().iter().enumerate().skip(1) {
            prop_assert_eq!(bounds[i] - bounds[i - 1], *ticks as u64);
        }
        prop_assert_eq!(bounds[6] - bounds[5], CLOSE_DELAY_TICKS);
        prop_assert!(bounds.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Phase lookup is total and never goes backwards.
    #[test]
    fn prop_phase_monotonic(open in 0u64..10_000, d in durations()) {
        let schedule = PhaseSchedule::derive(open, &d).unwrap();
        let mut previous = Phase::Caging;
        let step = ((schedule.close_tick - open) / 500).max(1);
        let mut now = open;
        while now <= schedule.close_tick {
            let phase = schedule.phase_at(now);
            prop_assert!(phase >= previous, "{} after {} at {}", phase, previous, now);
            previous = phase;
            now += step;
        }
    }

    /// A boundary step is reported exactly on the boundary tick.
    #[test]
    fn prop_boundary_only_on_boundary(open in 0u64..10_000, d in durations(), offset in 0u64..12_000) {
        let schedule = PhaseSchedule::derive(open, &d).unwrap();
        let now = open + offset;
        if let ClockStep::Boundary(phase) = schedule.step(now) {
            let (_, end) = schedule.span(phase);
            prop_assert_eq!(end, now);
        }
    }

    /// Negative durations never produce a schedule.
    #[test]
    fn prop_negative_duration_rejected(open in 0u64..10_000, d in durations(), bad in -5000i64..0) {
        let config = uhc::MatchConfig {
            durations: PhaseDurations { shrinking: bad, ..d },
            ..uhc::MatchConfig::default()
        };
        prop_assert!(config.schedule(open).is_err());
    }

    /// Scans never exceed their budget and always hold the origin.
    #[test]
    fn prop_scan_within_budget(
        budget in 1usize..200,
        c in connectivity(),
        ox in -50i32..50,
        oy in -50i32..50,
        oz in -50i32..50,
        modulus in 2i32..5,
    ) {
        let origin = BlockPos::new(ox, oy, oz);
        let found = scan(origin, budget, c, |p| (p.x + p.y + p.z).rem_euclid(modulus) != 0);
        prop_assert!(found.len() <= budget);
        prop_assert!(found.contains(&origin));
        for pos in &found {
            prop_assert!(*pos == origin || (pos.x + pos.y + pos.z).rem_euclid(modulus) != 0);
        }
    }
}
