//! Fixed timestep simulation tick
//!
//! One tick: absorb pending spawns, integrate the player, then run the
//! collision and scoring pass.

use glam::Vec2;

use super::collision::{ScoringRules, resolve_objects};
use super::physics::{PhysicsParams, TickInput, advance};
use super::spawner::Spawner;
use super::state::{FallingObject, GameEvent, ObjectKind, Player, RngState};
use crate::settings::Settings;
use crate::tuning::TierParams;

/// Everything that lives only while a tier is being played
pub struct Playfield {
    pub player: Player,
    /// Live falling objects (spawn order)
    pub objects: Vec<FallingObject>,
    pub spawner: Spawner,
    physics: PhysicsParams,
    rules: ScoringRules,
}

impl Playfield {
    pub fn new(settings: &Settings, params: &TierParams, rng: RngState, now_ms: f64) -> Self {
        Self {
            player: Player::spawn(settings),
            objects: Vec::new(),
            spawner: Spawner::new(settings, params, rng, now_ms),
            physics: PhysicsParams::from_settings(settings),
            rules: ScoringRules {
                scroll_speed: params.scroll_speed,
                max_hazard_hits: params.max_hazard_hits,
                pickup_points: settings.pickup_points,
            },
        }
    }

    /// Place an object directly into the spawn queue
    pub fn inject(&mut self, kind: ObjectKind, pos: Vec2) -> u32 {
        self.spawner.queue(kind, pos)
    }

    pub fn max_hazard_hits(&self) -> u32 {
        self.rules.max_hazard_hits
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    /// The tier's hazard limit was reached this tick
    pub game_over: bool,
}

/// Advance the playfield by one fixed timestep
pub fn tick(
    field: &mut Playfield,
    input: &mut TickInput,
    score: &mut u64,
    hazard_hits: &mut u32,
    dt: f32,
) -> TickOutcome {
    let mut events = Vec::new();

    // Spawns that landed since the last tick join before movement
    for obj in field.spawner.drain() {
        events.push(GameEvent::Spawned {
            id: obj.id,
            kind: obj.kind,
        });
        field.objects.push(obj);
    }

    advance(&mut field.player, input, &field.physics, dt);

    let report = resolve_objects(
        &mut field.objects,
        &field.player.bounds(),
        &field.rules,
        score,
        hazard_hits,
    );
    events.extend(report.events);

    TickOutcome {
        events,
        game_over: report.hazard_limit_reached,
    }
}
