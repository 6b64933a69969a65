//! Falling object spawner
//!
//! Runs on its own interval timer, independent of the frame tick. Spawned
//! objects wait in a pending queue until the next tick drains them.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::schedule::IntervalTimer;
use super::state::{FallingObject, ObjectKind, RngState};
use crate::settings::Settings;
use crate::tuning::TierParams;

pub struct Spawner {
    rng: Pcg32,
    timer: IntervalTimer,
    hazard_chance: f32,
    max_x: f32,
    spawn_y: f32,
    object_size: Vec2,
    next_id: u32,
    pending: Vec<FallingObject>,
}

impl Spawner {
    pub fn new(settings: &Settings, params: &TierParams, rng: RngState, now_ms: f64) -> Self {
        Self {
            rng: rng.to_rng(),
            timer: IntervalTimer::start(f64::from(params.spawn_interval_ms), now_ms),
            hazard_chance: params.hazard_chance,
            max_x: settings.max_object_x(),
            spawn_y: settings.world_height,
            object_size: settings.object_size(),
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Spawn one object if the interval has elapsed at `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> Option<&FallingObject> {
        if !self.timer.poll(now_ms) {
            return None;
        }
        let kind = self.roll_kind();
        let x = self.rng.random_range(0.0..=self.max_x);
        let id = self.queue(kind, Vec2::new(x, self.spawn_y));
        log::debug!("Spawned {:?} #{} at x={:.1}", kind, id, x);
        self.pending.last()
    }

    /// Hazard when the draw lands below the tier's hazard chance
    fn roll_kind(&mut self) -> ObjectKind {
        let draw: f32 = self.rng.random();
        if draw < self.hazard_chance {
            ObjectKind::Hazard
        } else {
            ObjectKind::Pickup
        }
    }

    /// Queue an object at an explicit position, returning its id
    pub fn queue(&mut self, kind: ObjectKind, pos: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(FallingObject {
            id,
            kind,
            pos,
            size: self.object_size,
        });
        id
    }

    /// Take everything spawned since the last drain
    pub fn drain(&mut self) -> std::vec::Drain<'_, FallingObject> {
        self.pending.drain(..)
    }

    pub fn pending(&self) -> &[FallingObject] {
        &self.pending
    }

    pub fn stop(&mut self) {
        self.timer.stop();
        self.pending.clear();
    }
}
