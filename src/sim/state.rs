//! Simulation state and core entity types
//!
//! Everything the shell needs to render a frame lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{LevelLayout, clamp_level};
use super::rect::Rect;
use crate::Viewport;
use crate::consts::*;
use crate::tuning::Tuning;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level running (before the first start or after leaving a level)
    #[default]
    Menu,
    /// Level in progress
    Playing,
    /// Player hit an obstacle
    GameOver,
    /// Player reached the end of the level
    Victory,
}

/// Player movement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Gravity plus a single jump impulse
    #[default]
    Cube,
    /// Hold-to-thrust flight
    Ship,
}

impl Mode {
    /// Icon color the player takes after entering this mode
    pub fn color(self) -> u32 {
        match self {
            Mode::Cube => colors::PLAYER,
            Mode::Ship => colors::SHIP,
        }
    }
}

/// The controllable entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub velocity_y: f32,
    /// Degrees, cosmetic
    pub rotation: f32,
    pub jumping: bool,
    pub mode: Mode,
    pub icon_color: u32,
    pub size: f32,
    /// Recent positions for rendering (newest last)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            y: 0.0,
            velocity_y: 0.0,
            rotation: 0.0,
            jumping: false,
            mode: Mode::Cube,
            icon_color: colors::PLAYER,
            size: PLAYER_SIZE,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }
}

impl Player {
    /// Put the player back on the ground in cube mode
    pub fn reset(&mut self, x: f32, ground: f32, size: f32) {
        self.x = x;
        self.y = ground;
        self.velocity_y = 0.0;
        self.rotation = 0.0;
        self.jumping = false;
        self.mode = Mode::Cube;
        self.icon_color = Mode::Cube.color();
        self.size = size;
        self.trail.clear();
    }

    /// Hit box
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::square(self.x, self.y, self.size)
    }

    /// Apply the jump impulse. Returns false when airborne or not a cube.
    pub fn try_jump(&mut self, jump_force: f32) -> bool {
        if self.mode != Mode::Cube || self.jumping {
            return false;
        }
        self.velocity_y = jump_force;
        self.jumping = true;
        true
    }

    /// Record current position to the trail
    pub fn record_trail(&mut self) {
        self.trail.push(Vec2::new(self.x, self.y));
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    /// Switch mode and take the portal color
    pub fn enter_mode(&mut self, mode: Mode, color: u32) {
        self.mode = mode;
        self.icon_color = color;
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObstacleKind {
    /// Solid ground block
    Cube,
    /// Ground spike (collides as its full bounding box)
    Spike,
    /// Vertical wall in ship sections
    ShipWall,
    /// Classic-layout block
    Block,
    /// Classic-layout raised platform
    Platform,
    /// Spinning saw, collides as a circle
    Saw,
}

impl ObstacleKind {
    /// Render color
    pub fn color(self) -> u32 {
        match self {
            ObstacleKind::Cube | ObstacleKind::Block | ObstacleKind::Platform => colors::BLOCK,
            ObstacleKind::Spike => colors::SPIKE,
            ObstacleKind::ShipWall => colors::SHIP,
            ObstacleKind::Saw => colors::SAW,
        }
    }
}

/// A static hazard in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            kind,
            rect: Rect::new(x, y, w, h),
        }
    }

    /// Fully past the left edge
    #[inline]
    pub fn off_screen(&self) -> bool {
        self.rect.x <= -self.rect.w
    }
}

/// A mode-switch trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub x: f32,
    pub y: f32,
    pub target: Mode,
    pub color: u32,
}

impl Portal {
    pub fn new(x: f32, y: f32, target: Mode) -> Self {
        Self {
            x,
            y,
            target,
            color: target.color(),
        }
    }

    /// Hit zone
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::square(self.x, self.y, PORTAL_SIZE)
    }

    #[inline]
    pub fn off_screen(&self) -> bool {
        self.x <= PORTAL_PRUNE_X
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
    pub color: u32,
}

/// Background circle, scrolls with parallax
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decor {
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
}

/// Things that happened during an input edge or step, for audio/UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    Jumped,
    /// Ship thrust applied this step
    Thrust,
    PortalEntered { mode: Mode },
    Died { distance: f32 },
    Won { level: u32 },
}

fn effects_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub portals: Vec<Portal>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub decor: Vec<Decor>,
    /// Scrolled distance since level start
    pub distance: f32,
    /// Distance at which the level is won
    pub level_length: f32,
    /// Whether the press is currently held
    pub input_active: bool,
    pub viewport: Viewport,
    pub tuning: Tuning,
    /// Pending events (drained by the shell)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Cosmetic randomness (particle spread)
    #[serde(skip, default = "effects_rng")]
    fx_rng: Pcg32,
}

impl SimulationState {
    pub fn new(viewport: Viewport, tuning: Tuning) -> Self {
        let mut player = Player::default();
        player.reset(
            tuning.physics.player_x,
            viewport.ground_line(),
            tuning.physics.player_size,
        );
        Self {
            phase: GamePhase::Menu,
            level: 1,
            player,
            obstacles: Vec::new(),
            portals: Vec::new(),
            particles: Vec::new(),
            decor: Vec::new(),
            distance: 0.0,
            level_length: tuning.generator.base_length + tuning.generator.length_step,
            input_active: false,
            viewport,
            tuning,
            events: Vec::new(),
            fx_rng: effects_rng(),
        }
    }

    /// Reset everything and load a generated level
    ///
    /// Levels below 1 are treated as level 1.
    pub fn start_level(&mut self, level: u32, layout: LevelLayout) {
        let level = clamp_level(level);
        self.level = level;
        self.phase = GamePhase::Playing;
        self.distance = 0.0;
        self.particles.clear();
        self.events.clear();

        let LevelLayout {
            obstacles,
            portals,
            decor,
            length,
        } = layout;
        self.obstacles = obstacles;
        self.portals = portals;
        self.decor = decor;
        self.level_length = length;

        self.player.reset(
            self.tuning.physics.player_x,
            self.viewport.ground_line(),
            self.tuning.physics.player_size,
        );

        // Reseed cosmetics from the layout so replays look the same
        let seed = (level as u64) ^ (self.obstacles.len() as u64).rotate_left(17);
        self.fx_rng = Pcg32::seed_from_u64(seed);

        self.events.push(GameEvent::LevelStarted { level });
        log::info!(
            "Level {} started: length={}, obstacles={}, portals={}",
            level,
            self.level_length,
            self.obstacles.len(),
            self.portals.len()
        );
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Fraction of the level covered, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.level_length <= 0.0 {
            return 1.0;
        }
        (self.distance / self.level_length).clamp(0.0, 1.0)
    }

    /// Press began. Sets the input flag and, in cube mode, tries to jump.
    /// Returns true when a jump impulse was applied.
    pub fn press_start(&mut self) -> bool {
        self.input_active = true;
        if !self.is_playing() {
            return false;
        }
        if !self.player.try_jump(self.tuning.physics.jump_force) {
            return false;
        }
        let feet = Vec2::new(self.player.x, self.player.y + self.player.size);
        self.burst(feet, JUMP_PARTICLES, self.player.icon_color);
        self.events.push(GameEvent::Jumped);
        true
    }

    /// Press released
    pub fn press_end(&mut self) {
        self.input_active = false;
    }

    /// Leave the current level
    pub fn back_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.input_active = false;
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a burst of particles
    pub fn burst(&mut self, at: Vec2, count: usize, color: u32) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                (self.fx_rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
                (self.fx_rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                life: 1.0,
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> SimulationState {
        let mut state = SimulationState::new(Viewport::default(), Tuning::default());
        state.start_level(1, LevelLayout::empty(5000.0));
        state
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = SimulationState::new(Viewport::default(), Tuning::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(!state.is_playing());
        assert_eq!(state.player.mode, Mode::Cube);
        assert_eq!(state.player.y, Viewport::default().ground_line());
    }

    #[test]
    fn test_start_level_clamps_zero() {
        let mut state = SimulationState::new(Viewport::default(), Tuning::default());
        state.start_level(0, LevelLayout::empty(100.0));
        assert_eq!(state.level, 1);
        assert!(state.is_playing());
        assert_eq!(state.drain_events(), vec![GameEvent::LevelStarted { level: 1 }]);
    }

    #[test]
    fn test_start_level_resets_player() {
        let mut state = playing_state();
        state.player.enter_mode(Mode::Ship, colors::SHIP);
        state.player.y = 12.0;
        state.distance = 300.0;
        state.start_level(2, LevelLayout::empty(6000.0));
        assert_eq!(state.player.mode, Mode::Cube);
        assert_eq!(state.player.icon_color, colors::PLAYER);
        assert_eq!(state.player.y, state.viewport.ground_line());
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.level_length, 6000.0);
    }

    #[test]
    fn test_jump_only_once_while_airborne() {
        let mut state = playing_state();
        assert!(state.press_start());
        let after_first = (state.player.velocity_y, state.player.jumping);
        state.press_end();
        assert!(!state.press_start());
        assert_eq!((state.player.velocity_y, state.player.jumping), after_first);
        assert_eq!(state.particles.len(), JUMP_PARTICLES);
    }

    #[test]
    fn test_press_when_not_playing_only_sets_flag() {
        let mut state = SimulationState::new(Viewport::default(), Tuning::default());
        assert!(!state.press_start());
        assert!(state.input_active);
        assert!(!state.player.jumping);
        state.press_end();
        assert!(!state.input_active);
    }

    #[test]
    fn test_ship_does_not_jump() {
        let mut state = playing_state();
        state.player.enter_mode(Mode::Ship, colors::SHIP);
        assert!(!state.press_start());
        assert!(state.input_active);
        assert_eq!(state.player.velocity_y, 0.0);
    }

    #[test]
    fn test_portal_color_follows_target() {
        assert_eq!(Portal::new(0.0, 0.0, Mode::Ship).color, colors::SHIP);
        assert_eq!(Portal::new(0.0, 0.0, Mode::Cube).color, colors::PLAYER);
        assert_eq!(ObstacleKind::Saw.color(), colors::SAW);
        assert_eq!(ObstacleKind::Spike.color(), colors::SPIKE);
    }

    #[test]
    fn test_trail_is_capped() {
        let mut player = Player::default();
        for i in 0..(TRAIL_LENGTH + 5) {
            player.y = i as f32;
            player.record_trail();
        }
        assert_eq!(player.trail.len(), TRAIL_LENGTH);
        assert_eq!(player.trail.last().unwrap().y, (TRAIL_LENGTH + 4) as f32);
    }

    #[test]
    fn test_progress_clamped() {
        let mut state = playing_state();
        state.distance = 2500.0;
        assert!((state.progress() - 0.5).abs() < 1e-6);
        state.distance = 9000.0;
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = playing_state();
        let json = serde_json::to_string(&state).unwrap();
        let back: SimulationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.level_length, state.level_length);
        assert_eq!(back.player.mode, Mode::Cube);
        assert!(json.contains("\"Playing\""));
    }
}
