//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Single mutator (the session), no rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod schedule;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionReport, ScoringRules, resolve_objects};
pub use physics::{Direction, PhysicsParams, TickInput, advance};
pub use schedule::{IntervalTimer, Ticket};
pub use session::{Session, Trigger, next_state};
pub use spawner::Spawner;
pub use state::{
    FallingObject, GameEvent, JumpState, ObjectKind, Player, RngState, SessionState, Snapshot,
};
pub use tick::{Playfield, TickOutcome, tick};
