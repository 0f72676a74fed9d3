//! World Border Controller
//!
//! Holds the border the match wants and produces the state snapshots sent
//! to the host at each border-affecting boundary.

use serde::{Serialize, Deserialize};

use crate::TICK_MILLIS;

/// Damage per block outside the border until deathmatch.
pub const INITIAL_DAMAGE_PER_BLOCK: f64 = 0.5;

/// Damage per block outside the border during deathmatch.
pub const DEATHMATCH_DAMAGE_PER_BLOCK: f64 = 2.5;

/// Safe distance past the border during deathmatch.
pub const DEATHMATCH_BUFFER: f64 = 0.125;

/// Host default safe distance past the border.
pub const DEFAULT_BUFFER: f64 = 5.0;

/// A border size interpolation in progress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeLerp {
    /// Diameter at the start of the interpolation
    pub from: f64,
    /// Diameter at the end
    pub to: f64,
    /// Real-time length of the interpolation
    pub millis: u64,
}

/// Snapshot of the world border.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderState {
    /// Centre X
    pub center_x: f64,
    /// Centre Z
    pub center_z: f64,
    /// Current diameter
    pub size: f64,
    /// Damage per block outside the border
    pub damage_per_block: f64,
    /// Safe distance past the border before damage starts
    pub buffer: f64,
    /// Active interpolation, if any
    pub lerp: Option<SizeLerp>,
}

/// Border schedule for one match.
#[derive(Clone, Debug)]
pub struct BorderController {
    start_diameter: f64,
    end_diameter: f64,
    state: BorderState,
}

impl BorderController {
    /// Create a controller; the border is not initialised until [`Self::initialize`].
    pub fn new(start_diameter: f64, end_diameter: f64) -> Self {
        Self {
            start_diameter,
            end_diameter,
            state: BorderState {
                center_x: 0.0,
                center_z: 0.0,
                size: start_diameter,
                damage_per_block: INITIAL_DAMAGE_PER_BLOCK,
                buffer: DEFAULT_BUFFER,
                lerp: None,
            },
        }
    }

    /// Current border state.
    pub fn state(&self) -> BorderState {
        self.state
    }

    /// Centre the border at the origin at full size.
    pub fn initialize(&mut self) -> BorderState {
        self.state.center_x = 0.0;
        self.state.center_z = 0.0;
        self.state.size = self.start_diameter;
        self.state.damage_per_block = INITIAL_DAMAGE_PER_BLOCK;
        self.state.lerp = None;
        self.state
    }

    /// Start shrinking to the end diameter over `duration_ticks`.
    pub fn begin_shrink(&mut self, duration_ticks: u64) -> BorderState {
        self.state.lerp = Some(SizeLerp {
            from: self.start_diameter,
            to: self.end_diameter,
            millis: duration_ticks.saturating_mul(TICK_MILLIS),
        });
        self.state.size = self.start_diameter;
        self.state
    }

    /// Raise border damage for the deathmatch.
    pub fn enter_deathmatch(&mut self) -> BorderState {
        self.state.damage_per_block = DEATHMATCH_DAMAGE_PER_BLOCK;
        self.state.buffer = DEATHMATCH_BUFFER;
        self.state
    }
}
