//! Game state and core simulation types

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::settings::Settings;
use crate::tuning::DifficultyTier;

/// Vertical movement state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpState {
    /// Standing on the ground line
    #[default]
    Grounded,
    /// First jump used, double jump still available
    AirborneSingle,
    /// Both jumps used until the next landing
    AirborneDouble,
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner (y grows downward, ground is the largest y)
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (negative = upward)
    pub vel_y: f32,
    pub jump: JumpState,
}

impl Player {
    /// Player standing centered on the ground
    pub fn spawn(settings: &Settings) -> Self {
        Self {
            pos: settings.player_start(),
            size: settings.player_size(),
            vel_y: 0.0,
            jump: JumpState::Grounded,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn is_grounded(&self) -> bool {
        self.jump == JumpState::Grounded
    }
}

/// What a falling object does on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Banana: counts toward the hazard limit
    Hazard,
    /// Candy: adds to the score
    Pickup,
}

/// A falling object entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub kind: ObjectKind,
    /// Top-left corner. x is fixed at spawn, y decreases every tick.
    pub pos: Vec2,
    pub size: Vec2,
}

impl FallingObject {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// True once the object has scrolled fully past the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y <= -self.size.y
    }
}

/// Session phase with its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum SessionState {
    /// Title screen
    #[default]
    NotStarted,
    /// Waiting for a tier choice
    SelectingDifficulty,
    /// Active gameplay
    Playing {
        tier: DifficultyTier,
        score: u64,
        hazard_hits: u32,
    },
    /// Run ended
    GameOver {
        tier: DifficultyTier,
        final_score: u64,
    },
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionState::Playing { .. })
    }

    pub fn tier(&self) -> Option<DifficultyTier> {
        match *self {
            SessionState::Playing { tier, .. } | SessionState::GameOver { tier, .. } => Some(tier),
            _ => None,
        }
    }

    /// Current score (final score once the run is over)
    pub fn score(&self) -> u64 {
        match *self {
            SessionState::Playing { score, .. } => score,
            SessionState::GameOver { final_score, .. } => final_score,
            _ => 0,
        }
    }
}

/// Something that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Spawned { id: u32, kind: ObjectKind },
    PickupCollected { id: u32, score: u64 },
    HazardHit { id: u32, hazard_hits: u32 },
    /// Scrolled off screen without touching the player
    Expired { id: u32 },
    GameOver { final_score: u64 },
}

/// Read-only view of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: SessionState,
    /// Hazard limit of the current tier
    pub max_hazard_hits: Option<u32>,
    pub player: Option<Player>,
    pub objects: Vec<FallingObject>,
}

/// RNG seed wrapper, one fresh stream per session
#[derive(Debug, Clone, Copy)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}
