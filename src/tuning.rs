//! Difficulty tiers
//!
//! Static table mapping each tier to its tuning parameters. The table is
//! immutable; changing balance means changing this file.

use serde::{Deserialize, Serialize};

/// Tuning parameters for a single tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierParams {
    /// How far every falling object moves per tick (world units)
    pub scroll_speed: f32,
    /// Time between spawns (milliseconds)
    pub spawn_interval_ms: u32,
    /// Probability that a spawned object is a hazard (0-1)
    pub hazard_chance: f32,
    /// Hazard hits that end the session (>= 1)
    pub max_hazard_hits: u32,
}

/// Selectable difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "easy" => Some(DifficultyTier::Easy),
            "medium" | "med" => Some(DifficultyTier::Medium),
            "hard" => Some(DifficultyTier::Hard),
            _ => None,
        }
    }

    /// Look up a tier by name, panicking on an unknown key.
    ///
    /// Tier names come from a fixed menu, so an unknown name is a broken
    /// contract between caller and core rather than user input.
    pub fn named(name: &str) -> Self {
        match Self::from_name(name) {
            Some(tier) => tier,
            None => panic!("unknown difficulty tier {name:?} (expected easy, medium or hard)"),
        }
    }

    pub fn params(&self) -> TierParams {
        match self {
            DifficultyTier::Easy => TierParams {
                scroll_speed: 2.0,
                spawn_interval_ms: 1000,
                hazard_chance: 0.3,
                max_hazard_hits: 5,
            },
            DifficultyTier::Medium => TierParams {
                scroll_speed: 3.0,
                spawn_interval_ms: 800,
                hazard_chance: 0.5,
                max_hazard_hits: 3,
            },
            DifficultyTier::Hard => TierParams {
                scroll_speed: 4.5,
                spawn_interval_ms: 600,
                hazard_chance: 0.7,
                max_hazard_hits: 2,
            },
        }
    }
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
