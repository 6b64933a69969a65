//! Simulation settings
//!
//! World geometry and physics constants. Loaded from a JSON file by the
//! native runner; any field left out falls back to the built-in default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// World and physics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal movement per tick
    pub player_speed: f32,

    // === Physics ===
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Jump sets vertical velocity to -jump_force
    pub jump_force: f32,

    // === Falling objects ===
    pub object_width: f32,
    pub object_height: f32,
    /// Score awarded per pickup
    pub pickup_points: u64,

    // === Determinism ===
    /// Base RNG seed for spawning
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,

            gravity: GRAVITY,
            jump_force: JUMP_FORCE,

            object_width: OBJECT_WIDTH,
            object_height: OBJECT_HEIGHT,
            pickup_points: PICKUP_POINTS,

            seed: DEFAULT_SEED,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Lowest y the player can occupy (the ground line)
    pub fn ground_y(&self) -> f32 {
        self.world_height - self.player_height
    }

    /// Largest x the player can occupy
    pub fn max_player_x(&self) -> f32 {
        (self.world_width - self.player_width).max(0.0)
    }

    /// Largest x a falling object can spawn at
    pub fn max_object_x(&self) -> f32 {
        (self.world_width - self.object_width).max(0.0)
    }

    /// Player start position: horizontally centered, standing on the ground
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(self.max_player_x() / 2.0, self.ground_y())
    }

    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    pub fn object_size(&self) -> Vec2 {
        Vec2::new(self.object_width, self.object_height)
    }
}
