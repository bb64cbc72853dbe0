//! Procedural level layout
//!
//! Levels are laid out along a cursor that starts one viewport width in (the
//! opening screen is always clear) and runs until it passes the level length.
//! The cursor overshoots the nominal length by at most one step.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Decor, Mode, Obstacle, ObstacleKind, Portal};
use crate::Viewport;
use crate::consts::*;
use crate::tuning::{GeneratorTuning, Tuning};

/// Ground obstacle sizes
const CUBE_SIZE: f32 = 38.0;
const SPIKE_WIDTH: f32 = 30.0;
const SPIKE_HEIGHT: f32 = 45.0;
/// Ship wall size and vertical placement band
const WALL_WIDTH: f32 = 19.0;
const WALL_HEIGHT: f32 = 90.0;
const WALL_TOP_MARGIN: f32 = 50.0;
const WALL_BAND_INSET: f32 = 220.0;
/// Decor sits above this inset from the bottom
const DECOR_BAND_INSET: f32 = 180.0;

/// Classic layout: unit tile, length and spacing
const TILE: f32 = 30.0;
const CLASSIC_BASE_LENGTH: f32 = 3000.0;
const CLASSIC_LENGTH_STEP: f32 = 500.0;
const CLASSIC_BASE_GAP: f32 = 200.0;
const CLASSIC_GAP_JITTER: f32 = 200.0;

/// Layout family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelStyle {
    /// Cube/ship sections separated by mode portals
    #[default]
    Portal,
    /// Cube-only patterns that get denser by level
    Classic,
}

/// A generated level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelLayout {
    pub obstacles: Vec<Obstacle>,
    pub portals: Vec<Portal>,
    pub decor: Vec<Decor>,
    pub length: f32,
}

impl LevelLayout {
    /// A level with nothing in it
    pub fn empty(length: f32) -> Self {
        Self {
            length,
            ..Default::default()
        }
    }
}

/// Level numbers outside [1, MAX_LEVEL] are clamped into it
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(1, MAX_LEVEL)
}

/// Length of a portal-style level
pub fn level_length(level: u32, tuning: &GeneratorTuning) -> f32 {
    tuning.base_length + clamp_level(level) as f32 * tuning.length_step
}

/// Advance the cursor, or `None` once f32 can no longer represent the step
fn advance(x: f32, step: f32) -> Option<f32> {
    let next = x + step;
    if next > x && next.is_finite() {
        Some(next)
    } else {
        log::warn!("Level cursor stalled at {x}, ending layout");
        None
    }
}

/// Generate a level. Levels are clamped to [1, MAX_LEVEL].
///
/// Pure: the only input besides the arguments is `rng`, so a seeded RNG
/// reproduces the same layout.
pub fn generate<R: Rng + ?Sized>(
    level: u32,
    style: LevelStyle,
    viewport: Viewport,
    tuning: &Tuning,
    rng: &mut R,
) -> LevelLayout {
    let level = clamp_level(level);
    let mut layout = match style {
        LevelStyle::Portal => portal_layout(level, viewport, &tuning.generator, rng),
        LevelStyle::Classic => classic_layout(level, viewport, rng),
    };
    layout.decor = generate_decor(viewport, tuning.generator.decor_count, rng);

    log::debug!(
        "Generated {:?} level {}: length={}, obstacles={}, portals={}",
        style,
        level,
        layout.length,
        layout.obstacles.len(),
        layout.portals.len()
    );
    layout
}

fn start_cursor(viewport: Viewport) -> f32 {
    if viewport.width.is_finite() {
        viewport.width.max(0.0)
    } else {
        0.0
    }
}

fn portal_layout<R: Rng + ?Sized>(
    level: u32,
    viewport: Viewport,
    g: &GeneratorTuning,
    rng: &mut R,
) -> LevelLayout {
    let length = level_length(level, g);
    let ground = viewport.ground_line();
    let start = start_cursor(viewport);
    let min_step = g.base_gap.max(1.0);
    let portal_step = g.portal_gap.max(1.0);

    // One more portal per level, up to the schedule length
    let portal_budget = (level as usize).min(g.portal_thresholds.len());
    let mut portals_placed = 0;
    let mut ship_phase = false;

    let mut obstacles = Vec::new();
    let mut portals = Vec::new();
    let mut x = start;

    while x < length {
        if portals_placed < portal_budget && x > start + g.portal_thresholds[portals_placed] {
            let target = if ship_phase { Mode::Cube } else { Mode::Ship };
            portals.push(Portal::new(x, viewport.portal_line(), target));
            ship_phase = !ship_phase;
            portals_placed += 1;
            match advance(x, portal_step) {
                Some(next) => x = next,
                None => break,
            }
            continue;
        }

        if !ship_phase {
            if rng.random::<f32>() < g.cube_block_chance {
                obstacles.push(Obstacle::new(ObstacleKind::Cube, x, ground, CUBE_SIZE, CUBE_SIZE));
            } else {
                obstacles.push(Obstacle::new(
                    ObstacleKind::Spike,
                    x,
                    ground,
                    SPIKE_WIDTH,
                    SPIKE_HEIGHT,
                ));
            }
        } else if rng.random::<f32>() < g.ship_wall_chance {
            let band = (viewport.height - WALL_BAND_INSET).max(0.0);
            let y = rng.random::<f32>() * band + WALL_TOP_MARGIN;
            obstacles.push(Obstacle::new(
                ObstacleKind::ShipWall,
                x,
                y,
                WALL_WIDTH,
                WALL_HEIGHT,
            ));
        }

        match advance(x, min_step + rng.random::<f32>() * g.gap_jitter.max(0.0)) {
            Some(next) => x = next,
            None => break,
        }
    }

    LevelLayout {
        obstacles,
        portals,
        decor: Vec::new(),
        length,
    }
}

/// Pattern tiers of the classic layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Basic,
    Intermediate,
    Advanced,
}

impl Tier {
    /// Levels past the last tier fall back to the basic patterns
    fn for_level(level: u32) -> Self {
        match level {
            2 => Tier::Intermediate,
            3 => Tier::Advanced,
            _ => Tier::Basic,
        }
    }
}

fn classic_layout<R: Rng + ?Sized>(level: u32, viewport: Viewport, rng: &mut R) -> LevelLayout {
    let length = CLASSIC_BASE_LENGTH + level as f32 * CLASSIC_LENGTH_STEP;
    // Ground surface the cube's feet rest on
    let floor = viewport.ground_line() + PLAYER_SIZE;
    let tier = Tier::for_level(level);

    let mut obstacles = Vec::new();
    let mut x = start_cursor(viewport);
    while x < length {
        let end = match tier {
            Tier::Basic => basic_pattern(x, floor, rng, &mut obstacles),
            Tier::Intermediate => intermediate_pattern(x, floor, rng, &mut obstacles),
            Tier::Advanced => advanced_pattern(x, floor, rng, &mut obstacles),
        };
        match advance(end, CLASSIC_BASE_GAP + rng.random::<f32>() * CLASSIC_GAP_JITTER) {
            Some(next) => x = next,
            None => break,
        }
    }

    LevelLayout {
        obstacles,
        portals: Vec::new(),
        decor: Vec::new(),
        length,
    }
}

fn ground_tile(kind: ObstacleKind, x: f32, floor: f32, rows_up: f32) -> Obstacle {
    Obstacle::new(kind, x, floor - TILE * rows_up, TILE, TILE)
}

/// A single spike or block
fn basic_pattern<R: Rng + ?Sized>(
    x: f32,
    floor: f32,
    rng: &mut R,
    out: &mut Vec<Obstacle>,
) -> f32 {
    let kind = if rng.random::<f32>() > 0.5 {
        ObstacleKind::Spike
    } else {
        ObstacleKind::Block
    };
    out.push(ground_tile(kind, x, floor, 1.0));
    x
}

/// Double spike, a raised block, or a high platform
fn intermediate_pattern<R: Rng + ?Sized>(
    x: f32,
    floor: f32,
    rng: &mut R,
    out: &mut Vec<Obstacle>,
) -> f32 {
    match rng.random_range(0..3) {
        0 => {
            for i in 0..2 {
                out.push(ground_tile(ObstacleKind::Spike, x + i as f32 * 60.0, floor, 1.0));
            }
        }
        1 => out.push(ground_tile(ObstacleKind::Block, x, floor, 2.0)),
        _ => out.push(Obstacle::new(
            ObstacleKind::Platform,
            x,
            floor - TILE * 3.0,
            TILE * 3.0,
            TILE,
        )),
    }
    x + 60.0
}

/// Stairs, a spike tunnel, or a spike wave
fn advanced_pattern<R: Rng + ?Sized>(
    x: f32,
    floor: f32,
    rng: &mut R,
    out: &mut Vec<Obstacle>,
) -> f32 {
    match rng.random_range(0..3) {
        0 => {
            for i in 0..3 {
                let step = i as f32;
                out.push(ground_tile(ObstacleKind::Block, x + step * 50.0, floor, step + 1.0));
            }
        }
        1 => {
            let ceiling_height = (floor - TILE * 4.0).max(1.0);
            out.push(Obstacle::new(ObstacleKind::Spike, x, 0.0, TILE, ceiling_height));
            out.push(ground_tile(ObstacleKind::Spike, x, floor, 1.0));
        }
        _ => {
            for i in 0..4 {
                let lift = (i as f32).sin() * 50.0;
                let mut spike = ground_tile(ObstacleKind::Spike, x + i as f32 * 60.0, floor, 1.0);
                spike.rect.y -= lift;
                out.push(spike);
            }
        }
    }
    x + 200.0
}

fn generate_decor<R: Rng + ?Sized>(viewport: Viewport, count: usize, rng: &mut R) -> Vec<Decor> {
    let width = start_cursor(viewport);
    let band = (viewport.height - DECOR_BAND_INSET).max(0.0);
    (0..count)
        .map(|i| Decor {
            pos: Vec2::new(rng.random::<f32>() * width * 2.0, rng.random::<f32>() * band),
            radius: 14.0 + rng.random::<f32>() * 24.0,
            color: if i % 2 == 0 {
                colors::BLOCK
            } else {
                colors::DECOR_ALT
            },
        })
        .collect()
}
