//! Demo controller
//!
//! Decides whether the press should be held this frame, from the state alone.
//! Used by the headless runner and attract-mode shells. It is not a solver:
//! it reacts to the nearest obstacle ahead and can still die.

use super::state::{Mode, ObstacleKind, SimulationState};

/// How far ahead of the player's front edge the cube reacts to an obstacle
const CUBE_LOOKAHEAD: f32 = 60.0;
/// How far ahead the ship looks for walls
const SHIP_LOOKAHEAD: f32 = 260.0;
/// Clearance kept between the ship and a wall's edge
const SHIP_CLEARANCE: f32 = 45.0;

/// Whether the press should be held this frame
pub fn wants_press(state: &SimulationState) -> bool {
    if !state.is_playing() {
        return false;
    }
    match state.player.mode {
        Mode::Cube => cube_wants_jump(state),
        Mode::Ship => state.player.y > ship_target_y(state),
    }
}

fn cube_wants_jump(state: &SimulationState) -> bool {
    let player = &state.player;
    if player.jumping {
        return false;
    }
    let front = player.x + player.size;
    state.obstacles.iter().any(|o| {
        let gap = o.rect.x - front;
        o.kind != ObstacleKind::ShipWall && (0.0..CUBE_LOOKAHEAD).contains(&gap)
    })
}

/// Height the ship steers toward: around the nearest wall ahead, else mid-band
fn ship_target_y(state: &SimulationState) -> f32 {
    let player = &state.player;
    let floor = state.viewport.ship_floor();
    let mid = floor / 2.0;

    let wall = state
        .obstacles
        .iter()
        .filter(|o| {
            let gap = o.rect.right() - player.x;
            gap >= 0.0 && gap < SHIP_LOOKAHEAD
        })
        .min_by(|a, b| a.rect.x.total_cmp(&b.rect.x));

    let Some(wall) = wall else {
        return mid;
    };

    // Pass on whichever side of the wall has more room
    let room_above = wall.rect.y;
    let room_below = floor - wall.rect.bottom();
    if room_above > room_below {
        (wall.rect.y - SHIP_CLEARANCE - player.size).max(0.0)
    } else {
        (wall.rect.bottom() + SHIP_CLEARANCE).min(floor)
    }
}
