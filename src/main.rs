//! Candy Drop headless runner
//!
//! Plays one session with a simple autopilot and prints the final snapshot
//! as JSON. Usage: `candy-drop [tier] [settings.json]`

use candy_drop::{DifficultyTier, Settings};
use candy_drop::sim::{Direction, GameEvent, ObjectKind, Session, Snapshot};

/// Wall-clock frame length fed to the pump (ms)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after this much simulated time (ms)
const RUN_LIMIT_MS: f64 = 120_000.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tier = match parse_tier(args.next().as_deref()) {
        Ok(tier) => tier,
        Err(name) => {
            log::error!("Unknown tier {:?}", name);
            eprintln!("usage: candy-drop [easy|medium|hard] [settings.json]");
            std::process::exit(2);
        }
    };
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    log::info!("Candy Drop (headless) starting, seed {}", settings.seed);

    let mut session = Session::new(settings);
    session.start_selecting_difficulty();
    session.choose_tier(tier);

    let mut pickups = 0u32;
    let mut hazards = 0u32;
    while session.state().is_playing() && session.clock_ms() < RUN_LIMIT_MS {
        let (direction, jump) = autopilot(&session.snapshot());
        session.set_horizontal_input(direction);
        if jump {
            session.request_jump();
        }
        session.pump(FRAME_MS);

        for event in session.drain_events() {
            match event {
                GameEvent::PickupCollected { .. } => pickups += 1,
                GameEvent::HazardHit { .. } => hazards += 1,
                GameEvent::GameOver { final_score } => {
                    log::info!("Game over with {} points", final_score);
                }
                _ => {}
            }
        }
    }

    log::info!(
        "Run finished after {:.1}s: {} candy, {} bananas",
        session.clock_ms() / 1000.0,
        pickups,
        hazards
    );

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize snapshot: {}", e),
    }
}

/// Tier from the first CLI argument, defaulting to easy
fn parse_tier(arg: Option<&str>) -> Result<DifficultyTier, String> {
    match arg {
        None => Ok(DifficultyTier::Easy),
        Some(name) => DifficultyTier::from_name(name).ok_or_else(|| name.to_string()),
    }
}

/// Dodge the closest incoming banana, otherwise drift toward candy
fn autopilot(snap: &Snapshot) -> (Option<Direction>, bool) {
    let Some(player) = &snap.player else {
        return (None, false);
    };
    let center = player.pos.x + player.size.x / 2.0;
    let feet = player.pos.y + player.size.y;

    // Objects scroll toward y = 0, so anything below the player's head is incoming
    let incoming = snap
        .objects
        .iter()
        .filter(|o| o.pos.y + o.size.y > player.pos.y)
        .map(|o| (o, o.pos.x + o.size.x / 2.0));

    let threat = incoming
        .clone()
        .filter(|(o, x)| {
            o.kind == ObjectKind::Hazard && (x - center).abs() < (o.size.x + player.size.x) / 2.0
        })
        .min_by(|a, b| a.0.pos.y.total_cmp(&b.0.pos.y));

    if let Some((hazard, x)) = threat {
        let direction = if x > center { Direction::Left } else { Direction::Right };
        // Hop over it when it is about to reach the player
        let jump = player.is_grounded() && hazard.pos.y - feet < 30.0;
        return (Some(direction), jump);
    }

    let target = incoming
        .filter(|(o, _)| o.kind == ObjectKind::Pickup)
        .min_by(|a, b| a.0.pos.y.total_cmp(&b.0.pos.y))
        .map(|(_, x)| x);

    match target {
        Some(x) if (x - center).abs() > 4.0 => {
            let direction = if x > center { Direction::Right } else { Direction::Left };
            (Some(direction), false)
        }
        _ => (None, false),
    }
}
