//! Rainbow Snake headless driver
//!
//! Plays one run with the autopilot on a simulated clock and prints the final
//! snapshot as JSON. Pass a settings file path to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
use rainbow_snake::sim::{Session, SessionStatus, Snapshot, TickInput};
#[cfg(not(target_arch = "wasm32"))]
use rainbow_snake::{LogReporter, ManualClock, Settings};

/// Give up on runs the autopilot never finishes
#[cfg(not(target_arch = "wasm32"))]
const MAX_STEPS: u64 = 20_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rainbow Snake (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let snapshot = match play(settings) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn play(settings: Settings) -> Result<Snapshot, rainbow_snake::SettingsError> {
    let clock = ManualClock::new(0);
    let mut session =
        Session::new(settings, Box::new(clock.clone()))?.with_reporter(Box::new(LogReporter));
    session.begin();

    let input = TickInput {
        autopilot: true,
        shoot: true,
        ..Default::default()
    };
    let mut snapshot = session.snapshot();
    while session.status() == SessionStatus::Running && session.steps() < MAX_STEPS {
        let ms = session.current_tick_ms();
        clock.advance(ms);
        snapshot = session.tick(ms, &input);
    }

    if session.status() == SessionStatus::Running {
        log::warn!("Stopping after {} steps", session.steps());
        session.force_game_over();
        snapshot = session.snapshot();
    }
    log::info!(
        "Final score {} after {} steps ({} segments)",
        snapshot.score,
        session.steps(),
        snapshot.segments.len()
    );
    Ok(snapshot)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}
