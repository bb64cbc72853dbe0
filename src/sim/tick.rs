//! Per-frame simulation step
//!
//! Advances the world by one time factor (1.0 = one reference frame):
//! player physics, scrolling, portals, obstacle hits, then the victory check.

use serde::{Deserialize, Serialize};

use super::collision::{first_obstacle_hit, portal_hit};
use super::state::{GameEvent, GamePhase, Mode, SimulationState};
use crate::Viewport;
use crate::consts::*;
use crate::tuning::PhysicsTuning;

/// Result of a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Level still running (or no level running)
    Continue,
    /// Player hit an obstacle after scrolling `distance`
    Death { distance: f32 },
    /// Level `level` completed
    Victory { level: u32 },
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

/// Non-finite or negative time factors become 0 (no movement)
pub fn sanitize_time_factor(time_factor: f32) -> f32 {
    if time_factor.is_finite() && time_factor > 0.0 {
        time_factor
    } else {
        0.0
    }
}

/// Advance the simulation by one frame
pub fn step(state: &mut SimulationState, time_factor: f32, input_active: bool) -> Outcome {
    state.input_active = input_active;
    if !state.is_playing() {
        return Outcome::Continue;
    }

    let tf = sanitize_time_factor(time_factor);
    if tf != time_factor {
        log::warn!("Ignoring time factor {time_factor}, stepping with {tf}");
    }

    integrate_player(state, tf, input_active);
    scroll_world(state, tf);
    update_particles(state, tf);

    // Portals: only a portal whose target differs from the current mode acts
    let player = &mut state.player;
    for portal in &state.portals {
        if portal.target != player.mode && portal_hit(player, portal) {
            player.enter_mode(portal.target, portal.color);
            state.events.push(GameEvent::PortalEntered {
                mode: portal.target,
            });
            log::debug!("Portal at {:.0}: now {:?}", state.distance, portal.target);
        }
    }

    // Obstacles: the first hit ends the step
    if let Some(obstacle) = first_obstacle_hit(&state.player, &state.obstacles) {
        log::info!(
            "Died on {:?} at distance {:.0} (level {})",
            obstacle.kind,
            state.distance,
            state.level
        );
        return die(state);
    }

    if state.distance >= state.level_length {
        log::info!("Level {} complete", state.level);
        state.phase = GamePhase::Victory;
        state.events.push(GameEvent::Won { level: state.level });
        return Outcome::Victory { level: state.level };
    }

    Outcome::Continue
}

fn die(state: &mut SimulationState) -> Outcome {
    state.phase = GamePhase::GameOver;
    let center = state.player.bounds().center();
    state.burst(center, DEATH_PARTICLES, colors::DEATH);
    let distance = state.distance;
    state.events.push(GameEvent::Died { distance });
    Outcome::Death { distance }
}

fn integrate_player(state: &mut SimulationState, tf: f32, input_active: bool) {
    let viewport = state.viewport;
    match state.player.mode {
        Mode::Cube => integrate_cube(state, tf),
        Mode::Ship => {
            if input_active {
                state.events.push(GameEvent::Thrust);
            }
            integrate_ship(state, tf, input_active)
        }
    }
    repair_non_finite(state, viewport);
    state.player.record_trail();
}

fn integrate_cube(state: &mut SimulationState, tf: f32) {
    let gravity = state.tuning.physics.gravity;
    let ground = state.viewport.ground_line();
    let player = &mut state.player;

    player.velocity_y += gravity * tf;
    player.y += player.velocity_y * tf;
    let spin = if player.jumping {
        SPIN_AIRBORNE
    } else {
        SPIN_GROUNDED
    };
    player.rotation += spin * tf;

    if player.y > ground {
        player.y = ground;
        player.velocity_y = 0.0;
        player.jumping = false;
        player.rotation = 0.0;
    }
}

fn integrate_ship(state: &mut SimulationState, tf: f32, input_active: bool) {
    let PhysicsTuning {
        ship_thrust,
        ship_gravity,
        ship_min_velocity,
        ship_max_velocity,
        ..
    } = state.tuning.physics;
    let floor = state.viewport.ship_floor();
    let player = &mut state.player;

    let accel = if input_active { ship_thrust } else { ship_gravity };
    player.velocity_y =
        (player.velocity_y + accel * tf).clamp(ship_min_velocity, ship_max_velocity);
    player.y += player.velocity_y * tf * SHIP_VERTICAL_RATE;
    player.rotation = player.velocity_y * SHIP_TILT;

    if player.y < 0.0 {
        player.y = 0.0;
        player.velocity_y = 0.0;
    }
    if player.y > floor {
        player.y = floor;
        player.velocity_y = 0.0;
    }
}

/// Keep NaN/inf out of the player pose
fn repair_non_finite(state: &mut SimulationState, viewport: Viewport) {
    let player = &mut state.player;
    if !player.velocity_y.is_finite() {
        log::warn!("Non-finite velocity repaired");
        player.velocity_y = 0.0;
    }
    if !player.y.is_finite() {
        log::warn!("Non-finite position repaired");
        player.y = match player.mode {
            Mode::Cube => viewport.ground_line(),
            Mode::Ship => viewport.ship_floor(),
        };
    }
    if !player.rotation.is_finite() {
        player.rotation = 0.0;
    }
}

fn scroll_world(state: &mut SimulationState, tf: f32) {
    let dx = state.tuning.physics.scroll_speed * tf;
    state.distance += dx;

    for obstacle in &mut state.obstacles {
        obstacle.rect.x -= dx;
    }
    for portal in &mut state.portals {
        portal.x -= dx;
    }
    for decor in &mut state.decor {
        decor.pos.x -= dx / DECOR_PARALLAX;
    }

    state.obstacles.retain(|o| !o.off_screen());
    state.portals.retain(|p| !p.off_screen());
    state.decor.retain(|d| d.pos.x > -d.radius);
}

fn update_particles(state: &mut SimulationState, tf: f32) {
    for particle in &mut state.particles {
        particle.pos += particle.vel * tf;
        particle.life -= PARTICLE_DECAY * tf;
    }
    state.particles.retain(|p| p.life > 0.0);
}
