//! Data-driven game balance
//!
//! Every field falls back to the reference constants, so a tuning file only
//! needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from reading or checking a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Player movement and scrolling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub jump_force: f32,
    pub player_size: f32,
    pub player_x: f32,
    pub scroll_speed: f32,
    pub ship_thrust: f32,
    pub ship_gravity: f32,
    pub ship_min_velocity: f32,
    pub ship_max_velocity: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            player_size: PLAYER_SIZE,
            player_x: PLAYER_X,
            scroll_speed: SCROLL_SPEED,
            ship_thrust: SHIP_THRUST,
            ship_gravity: SHIP_GRAVITY,
            ship_min_velocity: SHIP_MIN_VELOCITY,
            ship_max_velocity: SHIP_MAX_VELOCITY,
        }
    }
}

/// Level layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorTuning {
    /// Level length = base_length + level * length_step
    pub base_length: f32,
    pub length_step: f32,
    /// Cursor advance after an obstacle slot: base_gap + [0, gap_jitter)
    pub base_gap: f32,
    pub gap_jitter: f32,
    /// Cursor advance after a portal
    pub portal_gap: f32,
    /// Chance a cube-phase slot holds a block instead of a spike
    pub cube_block_chance: f32,
    /// Chance a ship-phase slot holds a wall
    pub ship_wall_chance: f32,
    /// Portal trigger distances past the viewport edge; entry `i` requires level > i
    pub portal_thresholds: Vec<f32>,
    pub decor_count: usize,
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            base_length: 4000.0,
            length_step: 600.0,
            base_gap: 100.0,
            gap_jitter: 90.0,
            portal_gap: 150.0,
            cube_block_chance: 0.25,
            ship_wall_chance: 0.22,
            portal_thresholds: vec![1000.0, 2500.0, 4000.0],
            decor_count: DECOR_COUNT,
        }
    }
}

impl GeneratorTuning {
    /// Largest cursor advance a single obstacle slot can produce
    pub fn max_step(&self) -> f32 {
        self.base_gap + self.gap_jitter
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub generator: GeneratorTuning,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.physics;
        let g = &self.generator;

        let finite = [
            ("physics.gravity", p.gravity),
            ("physics.jump_force", p.jump_force),
            ("physics.player_x", p.player_x),
            ("physics.ship_thrust", p.ship_thrust),
            ("physics.ship_gravity", p.ship_gravity),
            ("generator.base_length", g.base_length),
            ("generator.length_step", g.length_step),
            ("generator.gap_jitter", g.gap_jitter),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not finite")));
            }
        }

        let positive = [
            ("physics.player_size", p.player_size),
            ("physics.scroll_speed", p.scroll_speed),
            ("generator.base_gap", g.base_gap),
            ("generator.portal_gap", g.portal_gap),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("{value} must be > 0")));
            }
        }

        if !(p.ship_min_velocity < p.ship_max_velocity) {
            return Err(invalid(
                "physics.ship_min_velocity",
                format!(
                    "clamp range [{}, {}] is empty",
                    p.ship_min_velocity, p.ship_max_velocity
                ),
            ));
        }
        if g.gap_jitter < 0.0 {
            return Err(invalid("generator.gap_jitter", "must be >= 0".into()));
        }
        for (field, chance) in [
            ("generator.cube_block_chance", g.cube_block_chance),
            ("generator.ship_wall_chance", g.ship_wall_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(field, format!("{chance} is not a probability")));
            }
        }
        if g.portal_thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid(
                "generator.portal_thresholds",
                "must be strictly increasing".into(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> TuningError {
    TuningError::Invalid { field, reason }
}
