//! Player integrator
//!
//! Horizontal movement at constant speed, per-tick gravity accumulation and
//! an edge-triggered double jump.

use super::state::{JumpState, Player};
use crate::consts::SIM_DT;
use crate::settings::Settings;

/// Horizontal input direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held direction. Setting a new one replaces the old, so opposing keys
    /// can never both be active.
    pub horizontal: Option<Direction>,
    /// One-shot jump request, cleared when the integrator consumes it
    pub jump: bool,
}

/// Physics constants used by [`advance`]
#[derive(Debug, Clone, Copy)]
pub struct PhysicsParams {
    pub speed: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub ground_y: f32,
    pub max_x: f32,
}

impl PhysicsParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            speed: settings.player_speed,
            gravity: settings.gravity,
            jump_force: settings.jump_force,
            ground_y: settings.ground_y(),
            max_x: settings.max_player_x(),
        }
    }
}

/// Advance the player by one tick.
///
/// Horizontal speed is scaled by `dt / SIM_DT`; gravity is a flat per-tick
/// accumulation. A pending jump is consumed after the ground clamp so a jump
/// from the ground always starts with exactly `-jump_force`.
pub fn advance(player: &mut Player, input: &mut TickInput, params: &PhysicsParams, dt: f32) {
    // Horizontal
    let step = params.speed * (dt / SIM_DT);
    match input.horizontal {
        Some(Direction::Left) => player.pos.x -= step,
        Some(Direction::Right) => player.pos.x += step,
        None => {}
    }
    player.pos.x = player.pos.x.clamp(0.0, params.max_x);

    // Vertical
    player.vel_y += params.gravity;
    player.pos.y += player.vel_y;

    if player.pos.y >= params.ground_y {
        player.pos.y = params.ground_y;
        player.vel_y = 0.0;
        player.jump = JumpState::Grounded;
    }

    // Jump (edge-triggered)
    if std::mem::take(&mut input.jump) {
        match player.jump {
            JumpState::Grounded => {
                player.vel_y = -params.jump_force;
                player.jump = JumpState::AirborneSingle;
            }
            JumpState::AirborneSingle => {
                player.vel_y = -params.jump_force;
                player.jump = JumpState::AirborneDouble;
            }
            JumpState::AirborneDouble => {}
        }
    }
}
