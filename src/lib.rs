//! Neon Dash - simulation core for a side-scrolling neon runner
//!
//! Core modules:
//! - `sim`: Level generation, physics integration and collision outcomes
//! - `session`: Shell-facing driver (level flow, input edges, frame clock)
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{FrameClock, GameListener, Session};
pub use tuning::{Tuning, TuningError};

use serde::{Deserialize, Serialize};

/// Game configuration constants (reference values, see `Tuning` for overrides)
pub mod consts {
    /// Reference frame interval in milliseconds (time factor 1.0)
    pub const FRAME_MS: f64 = 16.5;
    /// Largest time factor a single frame may apply
    pub const MAX_TIME_FACTOR: f32 = 4.0;

    /// Cube physics
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_FORCE: f32 = -12.0;
    /// Rotation speed (degrees per reference frame) while airborne / grounded
    pub const SPIN_AIRBORNE: f32 = 12.0;
    pub const SPIN_GROUNDED: f32 = 4.0;

    /// Ship physics (thrust is upward, i.e. negative y)
    pub const SHIP_THRUST: f32 = -1.7;
    pub const SHIP_GRAVITY: f32 = 0.15;
    pub const SHIP_MIN_VELOCITY: f32 = -7.0;
    pub const SHIP_MAX_VELOCITY: f32 = 6.0;
    /// Ship moves vertically at double rate
    pub const SHIP_VERTICAL_RATE: f32 = 2.0;
    /// Cosmetic tilt per unit of ship velocity
    pub const SHIP_TILT: f32 = 5.0;

    /// Player
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const PLAYER_X: f32 = 120.0;
    pub const SCROLL_SPEED: f32 = 7.0;
    pub const TRAIL_LENGTH: usize = 10;

    /// Vertical layout, measured up from the bottom of the viewport
    pub const GROUND_OFFSET: f32 = 110.0; // cube ground line and ground obstacle top
    pub const SHIP_FLOOR_OFFSET: f32 = 130.0;
    pub const PORTAL_OFFSET: f32 = 170.0;

    /// Portal hit zone (square) and prune edge
    pub const PORTAL_SIZE: f32 = 44.0;
    pub const PORTAL_PRUNE_X: f32 = -50.0;

    /// Saw collisions forgive this much overlap
    pub const SAW_MARGIN: f32 = 3.0;

    /// Number of levels a session walks through before returning to the menu
    pub const LEVEL_COUNT: u32 = 3;
    /// Highest level number the generator accepts; larger numbers are clamped
    pub const MAX_LEVEL: u32 = 1000;

    /// Particle bursts
    pub const JUMP_PARTICLES: usize = 7;
    pub const DEATH_PARTICLES: usize = 22;
    pub const PARTICLE_SPREAD: f32 = 5.0;
    pub const PARTICLE_DECAY: f32 = 0.025;
    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 256;

    /// Background decor: count and parallax divisor
    pub const DECOR_COUNT: usize = 25;
    pub const DECOR_PARALLAX: f32 = 3.0;

    /// Neon palette (0xRRGGBB)
    pub mod colors {
        pub const BLOCK: u32 = 0x32f8ff;
        pub const PLAYER: u32 = 0x36e200;
        pub const SPIKE: u32 = 0xfffa32;
        pub const PORTAL: u32 = 0xff32d2;
        pub const SAW: u32 = 0xff7b00;
        pub const GROUND: u32 = 0xa100ff;
        pub const BACKGROUND: u32 = 0x1a1844;
        pub const SHIP: u32 = 0x00d4ff;
        pub const DECOR_ALT: u32 = 0x2b69fc;
        pub const DEATH: u32 = 0xff0032;
    }
}

/// Playfield size reported by the shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 620.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Resting y of the cube (top edge of the player box)
    #[inline]
    pub fn ground_line(&self) -> f32 {
        self.height - consts::GROUND_OFFSET
    }

    /// Lowest y the ship may reach
    #[inline]
    pub fn ship_floor(&self) -> f32 {
        (self.height - consts::SHIP_FLOOR_OFFSET).max(0.0)
    }

    /// Vertical position of generated portals
    #[inline]
    pub fn portal_line(&self) -> f32 {
        self.height - consts::PORTAL_OFFSET
    }
}
