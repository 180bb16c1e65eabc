//! RPS Arena entry point
//!
//! Native: headless demo match, logged through `env_logger`.
//! Web: installs logging; the page drives `WebSimulation` from JavaScript.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("RPS Arena starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
const PLAYERS: usize = 3;
#[cfg(not(target_arch = "wasm32"))]
const TOKENS_PER_PLAYER: usize = 16;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_STEPS: u64 = 3600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rps_arena::render::Scoreboard;
    use rps_arena::sim::{Driver, IntersectionProtocol, PlayerKind, SimState};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let max_steps = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_STEPS);

    log::info!("RPS Arena (native) starting with seed {}", seed);

    let mut state = SimState::new(seed);
    for _ in 0..PLAYERS {
        let player = state.add_player(PlayerKind::Random);
        for _ in 0..TOKENS_PER_PLAYER {
            let pos = state.random_position();
            if let Err(e) = state.spawn_token(player, pos, None, IntersectionProtocol::Capture) {
                log::error!("Failed to place token: {}", e);
                return;
            }
        }
    }

    state.start();
    let mut driver = Driver::new();
    let frame = state.settings().step_interval();
    'run: while state.step_count < max_steps {
        for report in driver.advance(&mut state, frame) {
            if !report.resolutions.is_empty() {
                log::debug!("step {}: {} contacts resolved", report.step, report.resolutions.len());
            }

            let scores = Scoreboard::from_state(&state);
            if report.step % 600 == 0 {
                for entry in &scores.entries {
                    log::info!(
                        "step {}: {} holds {} (R{} P{} S{})",
                        report.step,
                        entry.label,
                        entry.total,
                        entry.rock,
                        entry.paper,
                        entry.scissors
                    );
                }
            }
            if scores.is_decided() {
                if let Some(winner) = scores.leader() {
                    log::info!("{} took the board after {} steps", winner.label, report.step);
                }
                break 'run;
            }
        }
    }
    state.stop();

    for entry in Scoreboard::from_state(&state).entries {
        log::info!("final: {} holds {} tokens", entry.label, entry.total);
    }
}
