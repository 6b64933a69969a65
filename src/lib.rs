//! Candy Drop - dodge falling bananas, collect candy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, session state)
//! - `tuning`: Data-driven difficulty tiers
//! - `settings`: World geometry and physics configuration
//!
//! Rendering, menus and input devices live outside this crate. They read
//! [`sim::Snapshot`]s and forward intents into [`sim::Session`].

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{DifficultyTier, TierParams};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per pump to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock gap a single pump will account for (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 400.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Horizontal speed (world units per tick)
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Downward acceleration added to vertical velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Upward impulse applied by a jump (velocity becomes -JUMP_FORCE)
    pub const JUMP_FORCE: f32 = 10.0;

    /// Falling object defaults
    pub const OBJECT_WIDTH: f32 = 40.0;
    pub const OBJECT_HEIGHT: f32 = 40.0;

    /// Points awarded per collected pickup
    pub const PICKUP_POINTS: u64 = 10;

    /// Default RNG seed
    pub const DEFAULT_SEED: u64 = 0xC0FF_EE00;
}

/// Convert a fixed timestep to milliseconds
#[inline]
pub fn dt_to_ms(dt: f32) -> f64 {
    f64::from(dt) * 1000.0
}
