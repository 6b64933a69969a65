//! Collision detection and scoring
//!
//! Axis-aligned boxes only. Every tick each falling object scrolls up by the
//! tier's speed, then is either discarded off screen, consumed by the player,
//! or kept for the next tick.

use glam::Vec2;

use super::state::{FallingObject, GameEvent, ObjectKind};

/// Axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Strict overlap test; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.min.x + other.size.x
            && self.min.x + self.size.x > other.min.x
            && self.min.y < other.min.y + other.size.y
            && self.min.y + self.size.y > other.min.y
    }
}

/// Per-tier rules the engine applies
#[derive(Debug, Clone, Copy)]
pub struct ScoringRules {
    pub scroll_speed: f32,
    pub max_hazard_hits: u32,
    pub pickup_points: u64,
}

/// Outcome of one engine pass
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub events: Vec<GameEvent>,
    /// Hazard count reached the tier limit during this pass
    pub hazard_limit_reached: bool,
}

/// Advance every object one tick and apply contact effects.
///
/// Off-screen discard is checked before overlap, so an object leaving the
/// screen never scores. Processing stops at the hit that reaches the hazard
/// limit; objects after it are left untouched.
pub fn resolve_objects(
    objects: &mut Vec<FallingObject>,
    player: &Aabb,
    rules: &ScoringRules,
    score: &mut u64,
    hazard_hits: &mut u32,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    let mut i = 0;
    while i < objects.len() {
        let obj = &mut objects[i];
        obj.pos.y -= rules.scroll_speed;

        if obj.is_off_screen() {
            let gone = objects.remove(i);
            report.events.push(GameEvent::Expired { id: gone.id });
            continue;
        }

        if !player.overlaps(&obj.bounds()) {
            i += 1;
            continue;
        }

        let hit = objects.remove(i);
        match hit.kind {
            ObjectKind::Pickup => {
                *score += rules.pickup_points;
                log::debug!("Pickup {} collected, score {}", hit.id, score);
                report.events.push(GameEvent::PickupCollected {
                    id: hit.id,
                    score: *score,
                });
            }
            ObjectKind::Hazard => {
                *hazard_hits += 1;
                log::debug!(
                    "Hazard {} hit ({}/{})",
                    hit.id,
                    hazard_hits,
                    rules.max_hazard_hits
                );
                report.events.push(GameEvent::HazardHit {
                    id: hit.id,
                    hazard_hits: *hazard_hits,
                });
                if *hazard_hits >= rules.max_hazard_hits {
                    report.hazard_limit_reached = true;
                    break;
                }
            }
        }
    }

    report
}
