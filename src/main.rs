//! Starfall headless demo driver
//!
//! Runs a scripted session of the simulation core at a fixed timestep and
//! prints an end-of-run summary. Useful for profiling the sim and for eyeball
//! checks of the event stream without any renderer attached.
//!
//! Usage: `starfall [seed] [max-seconds]` (RUST_LOG=debug for the firehose)

use glam::Vec2;

use starfall::consts::*;
use starfall::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let max_secs: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(300.0);

    log::info!("starfall demo: seed {seed}, up to {max_secs}s of simulation");

    let mut state = GameState::new(ARENA_WIDTH, ARENA_HEIGHT, seed);
    let mut sounds = 0u64;
    let mut explosions = 0u64;

    let mut elapsed = 0.0f32;
    while state.phase != GamePhase::GameOver && elapsed < max_secs {
        // Scripted pilot: sweep the lower third of the arena
        let t = elapsed * 0.4;
        let target = Vec2::new(
            ARENA_WIDTH / 2.0 + t.sin() * ARENA_WIDTH * 0.4,
            ARENA_HEIGHT - 250.0,
        );
        let input = TickInput {
            target: Some(target),
            auto_fire: true,
        };
        tick(&mut state, &input, SIM_DT);
        elapsed += SIM_DT;

        for event in state.drain_events() {
            match event {
                GameEvent::Sound(_) => sounds += 1,
                GameEvent::Explosion { .. } => explosions += 1,
                GameEvent::BossIncoming => log::info!("boss incoming"),
                GameEvent::BossDefeated => log::info!("boss defeated"),
                GameEvent::PowerUpCollected { kind } => {
                    log::info!("power-up collected: {kind:?}");
                }
                GameEvent::HeartLost { remaining } => {
                    log::info!("hit! {remaining} lives left");
                }
                GameEvent::GameOver { score } => log::info!("game over, final score {score}"),
                other => log::debug!("{other:?}"),
            }
        }
    }

    let summary = serde_json::json!({
        "seed": state.seed,
        "elapsed_ms": state.clock.now(),
        "score": state.score,
        "lives": state.lives,
        "combo_tier": state.combo.tier(),
        "game_speed": state.clock.game_speed,
        "sound_cues": sounds,
        "explosions": explosions,
        "finished": state.phase == GamePhase::GameOver,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).expect("summary is plain JSON data")
    );
}
