//! Match Configuration
//!
//! Per-phase durations and border geometry, supplied once when a match
//! opens. Invalid configurations are rejected before any state exists.

use serde::{Serialize, Deserialize};

use crate::game::phase::{Phase, PhaseSchedule};

/// Errors raised while loading or validating a [`MatchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A phase was configured with a negative length.
    #[error("{phase} duration must not be negative (got {ticks} ticks)")]
    NegativeDuration {
        /// The offending phase
        phase: Phase,
        /// The configured value
        ticks: i64,
    },

    /// Boundary ticks could not be derived in increasing order.
    #[error("phase boundaries overflow the tick range when opened at tick {open_tick}")]
    NonMonotonicBoundaries {
        /// World tick the match was opened at
        open_tick: u64,
    },

    /// A border diameter is not a usable size.
    #[error("invalid {which} border diameter: {value}")]
    InvalidDiameter {
        /// "start" or "end"
        which: &'static str,
        /// The configured value
        value: f64,
    },

    /// Spawn cages would not fit inside the starting border.
    #[error("spawn offset {offset} must be within 0..={half_diameter} (half the start diameter)")]
    SpawnOffset {
        /// The configured offset
        offset: f64,
        /// Half the start diameter
        half_diameter: f64,
    },

    /// The config document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Length of each timed phase, in ticks.
///
/// Signed so that negative input survives deserialization and is rejected
/// by [`MatchConfig::validate`] rather than wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    /// Players held in spawn cages
    pub caging: i64,
    /// Damage fully disabled
    pub invulnerability: i64,
    /// Peaceful phase (damage allowed from here on)
    pub peaceful: i64,
    /// Full-size border, open play
    pub wild: i64,
    /// Border shrinks from start to end diameter
    pub shrinking: i64,
    /// Final phase at minimum border size
    pub deathmatch: i64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            caging: 600,         // 30 seconds @ 20 Hz
            invulnerability: 600,
            peaceful: 6000,      // 5 minutes
            wild: 12000,         // 10 minutes
            shrinking: 12000,
            deathmatch: 6000,
        }
    }
}

impl PhaseDurations {
    /// Durations in phase order, paired with the phase they belong to.
    pub fn in_order(&self) -> [(Phase, i64); 6] {
        [
            (Phase::Caging, self.caging),
            (Phase::Invulnerable, self.invulnerability),
            (Phase::Peaceful, self.peaceful),
            (Phase::Wild, self.wild),
            (Phase::Shrinking, self.shrinking),
            (Phase::Deathmatch, self.deathmatch),
        ]
    }
}

/// Configuration for a single match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Per-phase durations
    pub durations: PhaseDurations,
    /// Border diameter while the match opens (blocks)
    pub start_diameter: f64,
    /// Border diameter once shrinking completes (blocks)
    pub end_diameter: f64,
    /// Distance kept between spawn cages and the starting border (blocks)
    pub spawn_offset: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            durations: PhaseDurations::default(),
            start_diameter: 1000.0,
            end_diameter: 50.0,
            spawn_offset: 10.0,
        }
    }
}

impl MatchConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant that does not depend on the open tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (phase, ticks) in self.durations.in_order() {
            if ticks < 0 {
                return Err(ConfigError::NegativeDuration { phase, ticks });
            }
        }

        if !self.start_diameter.is_finite() || self.start_diameter <= 0.0 {
            return Err(ConfigError::InvalidDiameter { which: "start", value: self.start_diameter });
        }
        if !self.end_diameter.is_finite() || self.end_diameter < 0.0 {
            return Err(ConfigError::InvalidDiameter { which: "end", value: self.end_diameter });
        }

        let half_diameter = self.start_diameter / 2.0;
        if !(0.0..=half_diameter).contains(&self.spawn_offset) {
            return Err(ConfigError::SpawnOffset { offset: self.spawn_offset, half_diameter });
        }

        Ok(())
    }

    /// Derive absolute boundary ticks for a match opened at `open_tick`.
    pub fn schedule(&self, open_tick: u64) -> Result<PhaseSchedule, ConfigError> {
        self.validate()?;
        PhaseSchedule::derive(open_tick, &self.durations)
            .ok_or(ConfigError::NonMonotonicBoundaries { open_tick })
    }

    /// Radius of the circle spawn cages are placed on. Never negative for a
    /// validated config.
    pub fn spawn_radius(&self) -> f64 {
        self.start_diameter / 2.0 - self.spawn_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let mut config = MatchConfig::default();
        config.durations.wild = -1;
        match config.validate() {
            Err(ConfigError::NegativeDuration { phase, ticks }) => {
                assert_eq!(phase, Phase::Wild);
                assert_eq!(ticks, -1);
            }
            other => panic!("expected NegativeDuration, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_durations_allowed() {
        let config = MatchConfig {
            durations: PhaseDurations {
                caging: 0,
                invulnerability: 0,
                peaceful: 0,
                wild: 0,
                shrinking: 0,
                deathmatch: 0,
            },
            ..MatchConfig::default()
        };
        let schedule = config.schedule(10).unwrap();
        assert_eq!(schedule.cages_end, 10);
        assert_eq!(schedule.deathmatch_end, 10);
        assert_eq!(schedule.close_tick, 210);
    }

    #[test]
    fn test_overflow_is_non_monotonic() {
        let mut config = MatchConfig::default();
        config.durations.deathmatch = i64::MAX;
        let result = config.schedule(u64::MAX - 10);
        assert!(matches!(result, Err(ConfigError::NonMonotonicBoundaries { .. })));
    }

    #[test]
    fn test_invalid_diameter_rejected() {
        let config = MatchConfig { start_diameter: 0.0, ..MatchConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDiameter { which: "start", .. })));

        let config = MatchConfig { end_diameter: f64::NAN, ..MatchConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDiameter { which: "end", .. })));
    }

    #[test]
    fn test_spawn_offset_must_fit_inside_border() {
        let config = MatchConfig { start_diameter: 100.0, spawn_offset: 60.0, ..MatchConfig::default() };
        match config.validate() {
            Err(ConfigError::SpawnOffset { offset, half_diameter }) => {
                assert_eq!(offset, 60.0);
                assert_eq!(half_diameter, 50.0);
            }
            other => panic!("expected SpawnOffset, got {:?}", other),
        }

        let config = MatchConfig { spawn_offset: -1.0, ..MatchConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::SpawnOffset { .. })));
        let config = MatchConfig { spawn_offset: f64::NAN, ..MatchConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::SpawnOffset { .. })));

        // Cages exactly at the centre are fine
        let config = MatchConfig { start_diameter: 100.0, spawn_offset: 50.0, ..MatchConfig::default() };
        assert!(config.validate().is_ok());
        assert_eq!(config.spawn_radius(), 0.0);
    }

    #[test]
    fn test_json_partial_document_uses_defaults() {
        let config = MatchConfig::from_json_str(r#"{ "durations": { "caging": 100 }, "start_diameter": 500.0 }"#).unwrap();
        assert_eq!(config.durations.caging, 100);
        assert_eq!(config.durations.wild, PhaseDurations::default().wild);
        assert_eq!(config.start_diameter, 500.0);
        assert_eq!(config.spawn_offset, 10.0);
    }

    #[test]
    fn test_json_negative_rejected() {
        let result = MatchConfig::from_json_str(r#"{ "durations": { "peaceful": -20 } }"#);
        assert!(matches!(result, Err(ConfigError::NegativeDuration { phase: Phase::Peaceful, .. })));
    }

    #[test]
    fn test_json_garbage_is_parse_error() {
        assert!(matches!(MatchConfig::from_json_str("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_spawn_radius() {
        let config = MatchConfig { start_diameter: 200.0, spawn_offset: 20.0, ..MatchConfig::default() };
        assert_eq!(config.spawn_radius(), 80.0);
    }
}
