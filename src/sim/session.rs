//! Session state machine and tick pump
//!
//! The session owns the playfield and both periodic drivers. Intents from the
//! presentation layer arrive as method calls; ones that make no sense in the
//! current state are ignored. All transitions go through [`next_state`].

use glam::Vec2;

use super::physics::{Direction, TickInput};
use super::schedule::{IntervalTimer, Ticket};
use super::state::{GameEvent, ObjectKind, RngState, SessionState, Snapshot};
use super::tick::{Playfield, tick};
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT};
use crate::dt_to_ms;
use crate::settings::Settings;
use crate::tuning::DifficultyTier;

/// Anything that can move the session between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    ChooseTier(DifficultyTier),
    HazardLimitReached,
    Restart,
    ReturnToTitle,
}

/// The transition table. `None` means the trigger does not apply.
pub fn next_state(state: SessionState, trigger: Trigger) -> Option<SessionState> {
    use SessionState::*;

    match (state, trigger) {
        (NotStarted, Trigger::Start) => Some(SelectingDifficulty),
        (SelectingDifficulty, Trigger::ChooseTier(tier)) => Some(Playing {
            tier,
            score: 0,
            hazard_hits: 0,
        }),
        (Playing { tier, score, .. }, Trigger::HazardLimitReached) => Some(GameOver {
            tier,
            final_score: score,
        }),
        (GameOver { .. }, Trigger::Restart) => Some(SelectingDifficulty),
        (GameOver { .. }, Trigger::ReturnToTitle) => Some(NotStarted),
        _ => None,
    }
}

pub struct Session {
    settings: Settings,
    state: SessionState,
    /// Present while Playing, kept frozen through GameOver
    playfield: Option<Playfield>,
    /// Frame driver, only exists while Playing
    frame_timer: Option<IntervalTimer>,
    input: TickInput,
    /// Bumped on every entry to and exit from Playing
    generation: u64,
    /// Session clock (ms), advanced by [`Session::pump`] and [`Session::spawn_due`]
    clock_ms: f64,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: SessionState::NotStarted,
            playfield: None,
            frame_timer: None,
            input: TickInput::default(),
            generation: 0,
            clock_ms: 0.0,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    // === Intents ===

    pub fn start_selecting_difficulty(&mut self) -> bool {
        self.apply(Trigger::Start)
    }

    pub fn choose_tier(&mut self, tier: DifficultyTier) -> bool {
        self.apply(Trigger::ChooseTier(tier))
    }

    pub fn restart(&mut self) -> bool {
        self.apply(Trigger::Restart)
    }

    pub fn return_to_title(&mut self) -> bool {
        self.apply(Trigger::ReturnToTitle)
    }

    pub fn set_horizontal_input(&mut self, direction: Option<Direction>) {
        if self.state.is_playing() {
            self.input.horizontal = direction;
        }
    }

    pub fn request_jump(&mut self) {
        if self.state.is_playing() {
            self.input.jump = true;
        } else {
            log::debug!("Ignoring jump in {:?}", self.state);
        }
    }

    /// Place an object into the live collection before the next tick
    pub fn inject_object(&mut self, kind: ObjectKind, pos: Vec2) -> Option<u32> {
        if !self.state.is_playing() {
            return None;
        }
        self.playfield.as_mut().map(|field| field.inject(kind, pos))
    }

    // === Driving ===

    /// Ticket for callbacks scheduled against the current Playing session
    pub fn ticket(&self) -> Option<Ticket> {
        self.state.is_playing().then_some(Ticket {
            generation: self.generation,
        })
    }

    fn accepts(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation && self.state.is_playing()
    }

    /// Run one simulation tick for `ticket`. Returns false if it was stale.
    pub fn frame(&mut self, ticket: Ticket, dt: f32) -> bool {
        if !self.accepts(ticket) {
            log::debug!("Dropping stale frame (generation {})", ticket.generation);
            return false;
        }
        let (Some(field), SessionState::Playing { score, hazard_hits, .. }) =
            (self.playfield.as_mut(), &mut self.state)
        else {
            return false;
        };

        let outcome = tick(field, &mut self.input, score, hazard_hits, dt);
        self.events.extend(outcome.events);

        if outcome.game_over {
            self.apply(Trigger::HazardLimitReached);
        }
        true
    }

    /// Fire the spawn timer for `ticket` if it is due at `now_ms` (session
    /// clock). The clock never runs backwards. Returns true on spawn.
    pub fn spawn_due(&mut self, ticket: Ticket, now_ms: f64) -> bool {
        if !self.accepts(ticket) {
            log::debug!("Dropping stale spawn (generation {})", ticket.generation);
            return false;
        }
        if now_ms.is_finite() {
            self.clock_ms = self.clock_ms.max(now_ms);
        }
        let now = self.clock_ms;
        self.playfield
            .as_mut()
            .is_some_and(|field| field.spawner.tick(now).is_some())
    }

    /// One fixed tick of the current session, bypassing the spawn timer
    pub fn step(&mut self, dt: f32) -> bool {
        match self.ticket() {
            Some(ticket) => self.frame(ticket, dt),
            None => false,
        }
    }

    /// Advance the session clock and run whatever spawns and frames are due.
    /// Returns the number of frames simulated.
    pub fn pump(&mut self, elapsed_ms: f64) -> u32 {
        let elapsed_ms = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.clock_ms += elapsed_ms;
        let Some(ticket) = self.ticket() else {
            return 0;
        };

        let now = self.clock_ms;
        let mut spawns = 0;
        while spawns < MAX_SUBSTEPS && self.spawn_due(ticket, now) {
            spawns += 1;
        }

        let mut substeps = 0;
        while substeps < MAX_SUBSTEPS
            && self.frame_timer.as_mut().is_some_and(|timer| timer.poll(now))
        {
            if !self.frame(ticket, SIM_DT) {
                break;
            }
            substeps += 1;
        }
        substeps
    }

    // === Observation ===

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            max_hazard_hits: self.state.tier().map(|tier| tier.params().max_hazard_hits),
            player: self.playfield.as_ref().map(|field| field.player.clone()),
            objects: self
                .playfield
                .as_ref()
                .map(|field| field.objects.clone())
                .unwrap_or_default(),
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Transitions ===

    fn apply(&mut self, trigger: Trigger) -> bool {
        let Some(next) = next_state(self.state, trigger) else {
            log::debug!("Ignoring {:?} in {:?}", trigger, self.state);
            return false;
        };

        if self.state.is_playing() {
            self.stop_drivers();
        }
        let previous = self.state;
        self.state = next;

        match next {
            SessionState::Playing { tier, .. } => self.enter_playing(tier),
            SessionState::GameOver { final_score, .. } => {
                self.events.push(GameEvent::GameOver { final_score });
            }
            SessionState::NotStarted | SessionState::SelectingDifficulty => {
                self.playfield = None;
            }
        }

        log::info!("Session {:?} -> {:?}", previous, next);
        true
    }

    fn enter_playing(&mut self, tier: DifficultyTier) {
        self.generation += 1;
        self.input = TickInput::default();

        let params = tier.params();
        let rng = RngState::new(self.settings.seed, self.generation);
        self.playfield = Some(Playfield::new(&self.settings, &params, rng, self.clock_ms));
        self.frame_timer = Some(IntervalTimer::start(dt_to_ms(SIM_DT), self.clock_ms));

        log::info!(
            "Playing {} (speed {}, spawn every {} ms, {} hits allowed)",
            tier,
            params.scroll_speed,
            params.spawn_interval_ms,
            params.max_hazard_hits
        );
    }

    fn stop_drivers(&mut self) {
        self.generation += 1;
        self.frame_timer = None;
        if let Some(field) = self.playfield.as_mut() {
            field.spawner.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::JumpState;

    fn playing(tier: DifficultyTier) -> Session {
        let mut session = Session::new(Settings::default());
        assert!(session.start_selecting_difficulty());
        assert!(session.choose_tier(tier));
        session
    }

    fn player_pos(session: &Session) -> Vec2 {
        session.snapshot().player.unwrap().pos
    }

    fn hit_with(session: &mut Session, kind: ObjectKind) {
        let pos = player_pos(session);
        session.inject_object(kind, pos).unwrap();
        session.step(SIM_DT);
    }

    #[test]
    fn test_transition_table() {
        use SessionState::*;
        let tier = DifficultyTier::Easy;

        assert_eq!(next_state(NotStarted, Trigger::Start), Some(SelectingDifficulty));
        assert_eq!(
            next_state(SelectingDifficulty, Trigger::ChooseTier(tier)),
            Some(Playing { tier, score: 0, hazard_hits: 0 })
        );
        assert_eq!(
            next_state(Playing { tier, score: 40, hazard_hits: 5 }, Trigger::HazardLimitReached),
            Some(GameOver { tier, final_score: 40 })
        );
        assert_eq!(
            next_state(GameOver { tier, final_score: 0 }, Trigger::Restart),
            Some(SelectingDifficulty)
        );
        assert_eq!(
            next_state(GameOver { tier, final_score: 0 }, Trigger::ReturnToTitle),
            Some(NotStarted)
        );

        assert_eq!(next_state(NotStarted, Trigger::ChooseTier(tier)), None);
        assert_eq!(next_state(NotStarted, Trigger::HazardLimitReached), None);
        assert_eq!(next_state(Playing { tier, score: 0, hazard_hits: 0 }, Trigger::Restart), None);
        assert_eq!(next_state(SelectingDifficulty, Trigger::Start), None);
    }

    #[test]
    fn test_out_of_state_intents_are_noops() {
        let mut session = Session::new(Settings::default());
        session.request_jump();
        session.set_horizontal_input(Some(Direction::Left));
        assert!(!session.choose_tier(DifficultyTier::Hard));
        assert!(!session.restart());
        assert!(!session.step(SIM_DT));
        assert_eq!(session.pump(1000.0), 0);
        assert!(session.inject_object(ObjectKind::Hazard, Vec2::ZERO).is_none());
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(session.snapshot().player.is_none());
    }

    #[test]
    fn test_pickup_scores_and_keeps_playing() {
        let mut session = playing(DifficultyTier::Easy);
        hit_with(&mut session, ObjectKind::Pickup);

        let snap = session.snapshot();
        assert_eq!(
            snap.state,
            SessionState::Playing { tier: DifficultyTier::Easy, score: 10, hazard_hits: 0 }
        );
        assert!(snap.objects.is_empty());
    }

    #[test]
    fn test_easy_game_over_after_five_hazards() {
        let mut session = playing(DifficultyTier::Easy);
        for hit in 1..=4 {
            hit_with(&mut session, ObjectKind::Hazard);
            assert_eq!(
                session.state(),
                SessionState::Playing { tier: DifficultyTier::Easy, score: 0, hazard_hits: hit }
            );
        }
        hit_with(&mut session, ObjectKind::Hazard);
        assert_eq!(
            session.state(),
            SessionState::GameOver { tier: DifficultyTier::Easy, final_score: 0 }
        );
        let events = session.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::GameOver { final_score: 0 }));
    }

    #[test]
    fn test_medium_third_hit_ends_same_tick() {
        let mut session = playing(DifficultyTier::Medium);
        hit_with(&mut session, ObjectKind::Pickup);
        hit_with(&mut session, ObjectKind::Hazard);
        hit_with(&mut session, ObjectKind::Hazard);
        assert!(session.state().is_playing());

        hit_with(&mut session, ObjectKind::Hazard);
        assert_eq!(
            session.state(),
            SessionState::GameOver { tier: DifficultyTier::Medium, final_score: 10 }
        );
    }

    #[test]
    fn test_game_over_stops_drivers() {
        let mut session = playing(DifficultyTier::Hard);
        let ticket = session.ticket().unwrap();
        hit_with(&mut session, ObjectKind::Hazard);
        hit_with(&mut session, ObjectKind::Hazard);
        assert!(matches!(session.state(), SessionState::GameOver { .. }));
        session.drain_events();

        assert!(session.ticket().is_none());
        assert!(!session.frame(ticket, SIM_DT));
        assert!(!session.spawn_due(ticket, 60_000.0));
        assert_eq!(session.pump(100.0), 0);
        assert!(session.drain_events().is_empty());
        // Last frame remains visible
        assert!(session.snapshot().player.is_some());
    }

    #[test]
    fn test_stale_ticket_cannot_touch_next_session() {
        let mut session = playing(DifficultyTier::Hard);
        let old = session.ticket().unwrap();
        hit_with(&mut session, ObjectKind::Hazard);
        hit_with(&mut session, ObjectKind::Hazard);

        assert!(session.restart());
        assert!(session.choose_tier(DifficultyTier::Easy));
        let fresh = session.ticket().unwrap();
        assert_ne!(old, fresh);

        session.set_horizontal_input(Some(Direction::Right));
        let before = player_pos(&session);
        assert!(!session.frame(old, SIM_DT));
        assert_eq!(player_pos(&session), before);
        assert!(session.frame(fresh, SIM_DT));
        assert!(player_pos(&session).x > before.x);
    }

    #[test]
    fn test_restart_resets_everything() {
        let settings = Settings::default();
        let mut session = playing(DifficultyTier::Medium);
        hit_with(&mut session, ObjectKind::Pickup);
        session.inject_object(ObjectKind::Pickup, Vec2::new(0.0, 100.0));
        session.set_horizontal_input(Some(Direction::Left));
        session.request_jump();
        for _ in 0..3 {
            session.step(SIM_DT);
        }
        for _ in 0..3 {
            hit_with(&mut session, ObjectKind::Hazard);
        }
        assert!(matches!(session.state(), SessionState::GameOver { final_score: 10, .. }));

        assert!(session.restart());
        assert_eq!(session.state(), SessionState::SelectingDifficulty);
        assert!(session.snapshot().objects.is_empty());
        assert!(session.choose_tier(DifficultyTier::Medium));

        let snap = session.snapshot();
        assert_eq!(
            snap.state,
            SessionState::Playing { tier: DifficultyTier::Medium, score: 0, hazard_hits: 0 }
        );
        let player = snap.player.unwrap();
        assert_eq!(player.pos, settings.player_start());
        assert_eq!(player.vel_y, 0.0);
        assert_eq!(player.jump, JumpState::Grounded);
        assert!(snap.objects.is_empty());

        // Held input from the previous run does not carry over
        session.step(SIM_DT);
        assert_eq!(player_pos(&session), settings.player_start());
    }

    #[test]
    fn test_return_to_title() {
        let mut session = playing(DifficultyTier::Hard);
        hit_with(&mut session, ObjectKind::Hazard);
        hit_with(&mut session, ObjectKind::Hazard);
        assert!(session.return_to_title());
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(session.snapshot().player.is_none());
    }

    #[test]
    fn test_jump_is_edge_triggered_through_session() {
        let mut session = playing(DifficultyTier::Easy);
        session.request_jump();
        session.step(SIM_DT);
        let player = session.snapshot().player.unwrap();
        assert_eq!(player.jump, JumpState::AirborneSingle);

        session.step(SIM_DT);
        let player = session.snapshot().player.unwrap();
        assert_eq!(player.jump, JumpState::AirborneSingle);
    }

    #[test]
    fn test_pump_spawns_on_interval() {
        let mut session = playing(DifficultyTier::Easy);
        let mut frames = 0;
        for _ in 0..11 {
            frames += session.pump(100.0);
        }
        let spawned = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 1);
        assert!(frames >= 60, "expected about 66 frames, got {frames}");
    }

    #[test]
    fn test_external_driver_spawns_on_interval() {
        // Wide world so random spawns practically never reach the player
        let settings = Settings {
            world_width: 100_000.0,
            ..Settings::default()
        };
        let mut session = Session::new(settings);
        session.start_selecting_difficulty();
        session.choose_tier(DifficultyTier::Easy);
        let ticket = session.ticket().unwrap();
        let frame_ms = dt_to_ms(SIM_DT);
        let mut spawn_times = Vec::new();

        // 10 seconds of frames and spawn timer callbacks, no pump
        for i in 1..=600 {
            let now = f64::from(i) * frame_ms;
            if session.spawn_due(ticket, now) {
                spawn_times.push(now);
            }
            assert!(session.frame(ticket, SIM_DT));
        }

        let spawned = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 10);
        assert_eq!(spawn_times.len(), 10);
        for pair in spawn_times.windows(2) {
            assert!((pair[1] - pair[0] - 1000.0).abs() <= frame_ms + 1e-6);
        }
        assert!((session.clock_ms() - 10_000.0).abs() < frame_ms);
    }

    #[test]
    fn test_spawn_due_clock_never_runs_backwards() {
        let mut session = playing(DifficultyTier::Easy);
        let ticket = session.ticket().unwrap();
        assert!(session.spawn_due(ticket, 1000.0));
        assert!(!session.spawn_due(ticket, 500.0));
        assert_eq!(session.clock_ms(), 1000.0);
        assert!(!session.spawn_due(ticket, f64::NAN));
        assert_eq!(session.clock_ms(), 1000.0);
    }

    #[test]
    fn test_pump_ignores_non_finite_elapsed() {
        let mut session = playing(DifficultyTier::Easy);
        session.pump(50.0);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(session.pump(bad), 0);
            assert_eq!(session.clock_ms(), 50.0);
        }
        assert!(session.state().is_playing());
        assert!(session.pump(50.0) > 0);
    }

    #[test]
    fn test_pump_clamps_long_gaps() {
        let mut session = playing(DifficultyTier::Easy);
        let frames = session.pump(10_000.0);
        assert!(frames <= MAX_SUBSTEPS);
        assert_eq!(session.clock_ms(), MAX_FRAME_MS);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut session = playing(DifficultyTier::Hard);
            for i in 0..300 {
                let dir = if (i / 40) % 2 == 0 { Direction::Left } else { Direction::Right };
                session.set_horizontal_input(Some(dir));
                if i % 25 == 0 {
                    session.request_jump();
                }
                session.pump(16.0);
            }
            session.snapshot()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_generation_advances_per_session() {
        let mut session = playing(DifficultyTier::Hard);
        let first = session.generation();
        hit_with(&mut session, ObjectKind::Hazard);
        hit_with(&mut session, ObjectKind::Hazard);
        assert!(session.generation() > first);
        session.restart();
        session.choose_tier(DifficultyTier::Hard);
        assert!(session.generation() > first + 1);
    }
}
