//! Simulation module
//!
//! All gameplay logic lives here. This module has no rendering, audio or
//! platform dependencies:
//! - Level layout comes from an injected RNG
//! - One `step` per frame, scaled by a time factor
//! - Outcomes are returned and queued as events, never pushed to a UI

pub mod autopilot;
pub mod collision;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{first_obstacle_hit, obstacle_hit, portal_hit};
pub use level::{LevelLayout, LevelStyle, clamp_level, generate, level_length};
pub use rect::Rect;
pub use state::{
    Decor, GameEvent, GamePhase, Mode, Obstacle, ObstacleKind, Particle, Player, Portal,
    SimulationState,
};
pub use tick::{Outcome, sanitize_time_factor, step};
