//! Per-frame simulation tick
//!
//! One call advances the whole world by `dt` seconds. Two ordered passes run
//! each frame: the normal pass (movement, spawning, power-up expiry, boss AI,
//! particles, combo decay, screen shake) and then collision resolution, so
//! entities spawned this frame are collision-checked this frame but movement
//! always precedes collision. The scheduled timeline drains even while the
//! damage choreography has the world paused; nothing else runs then.

use glam::Vec2;

use super::boss;
use super::collision;
use super::events::{GameEvent, Scheduled, SoundCue};
use super::spawn;
use super::state::{EnemyKind, GamePhase, GameState};
use crate::consts::*;

/// Input snapshot for a single tick, polled from the host's input collaborator
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Latest pointer/touch target, if any input arrived yet
    pub target: Option<Vec2>,
    /// Auto-fire toggle
    pub auto_fire: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            target: None,
            auto_fire: true,
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Non-positive delta is a no-op tick
    if dt <= 0.0 {
        return;
    }
    state.clock.advance(dt);

    // Delayed choreography fires even while the world is frozen
    for action in state.timeline.drain_due(state.clock.now()) {
        apply_scheduled(state, action);
    }

    if state.paused || state.phase == GamePhase::GameOver {
        return;
    }

    if state.lives == 0 {
        game_over(state);
        return;
    }

    move_ship(state, input, dt);
    move_bullets(state, dt);
    move_benefits(state, dt);
    move_enemies(state, dt);
    update_particles(state, dt);
    spawn::update(state);
    boss::update(state, dt);
    expire_godmode(state);
    if state.combo.tick(dt) {
        state.push_event(GameEvent::ComboDropped);
    }
    handle_fire(state, input);
    state.clock.maybe_escalate();
    state.shake.update(&mut state.rng);

    // Second pass: collisions see everything the first pass spawned
    collision::resolve(state);
}

/// Permanent halt: one last explosion, the game-over cue, and the score hook
fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    let pos = state.ship.pos;
    state.explosion_at(pos);
    state.push_event(GameEvent::Sound(SoundCue::GameOver));
    state.push_event(GameEvent::GameOver { score: state.score });
    // TODO: score persistence hook (host-side, intentionally unimplemented)
    log::info!(
        "game over at {}ms, score {}",
        state.clock.now(),
        state.score
    );
}

fn apply_scheduled(state: &mut GameState, action: Scheduled) {
    match action {
        Scheduled::SweepExplosion { pos } => state.explosion_at(pos),
        Scheduled::SweepFinish => finish_sweep(state),
        Scheduled::ShieldExpire => {
            // A fresher shield pickup may have pushed the deadline out
            if state.clock.now() >= state.effects.shield_until_ms {
                state.effects.shield_active = false;
            }
        }
        other => boss::on_scheduled(state, other),
    }
}

/// End of the damage freeze: queue the staggered cascade from the captured
/// positions, drop every live entity, unpause, and arm godmode if the run
/// continues.
fn finish_sweep(state: &mut GameState) {
    let now = state.clock.now();
    let mut positions: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
    positions.extend(state.benefits.iter().map(|b| b.pos));
    for (i, pos) in positions.into_iter().enumerate() {
        state.timeline.schedule(
            now + SWEEP_STAGGER_MS * i as u64,
            Scheduled::SweepExplosion { pos },
        );
    }
    state.enemies.clear();
    state.bullets.clear();
    state.benefits.clear();
    state.paused = false;
    if state.lives > 0 {
        state.start_godmode();
    }
}

/// Steer toward the input target with clamped banking; clamp to the arena
fn move_ship(state: &mut GameState, input: &TickInput, dt: f32) {
    let half = state.ship.half_extent();

    if let Some(target) = input.target {
        let step = SHIP_SPEED * state.clock.ship_speed * dt;
        let dx = target.x - state.ship.pos.x;
        let dy = target.y - state.ship.pos.y;

        state.ship.pos.x += dx.clamp(-step, step);
        state.ship.pos.y += dy.clamp(-step, step);

        // Bank while steering sideways; the angle holds when input settles
        let lean = SHIP_ROTATION_SPEED * dt;
        if dx < 0.0 {
            state.ship.rotation = (state.ship.rotation - lean).max(-SHIP_MAX_ROTATION);
        } else if dx > 0.0 {
            state.ship.rotation = (state.ship.rotation + lean).min(SHIP_MAX_ROTATION);
        }
    }

    state.ship.pos.x = state.ship.pos.x.clamp(half.x, state.arena.x - half.x);
    state.ship.pos.y = state.ship.pos.y.clamp(half.y, state.arena.y - half.y);
}

fn move_bullets(state: &mut GameState, dt: f32) {
    let step = BULLET_SPEED * state.clock.game_speed * dt;
    for bullet in &mut state.bullets {
        bullet.pos.y -= step;
    }
    // Gone once past the top bound
    state.bullets.retain(|bullet| bullet.pos.y > 0.0);
}

fn move_benefits(state: &mut GameState, dt: f32) {
    let scale = state.clock.game_speed * dt;
    let arena = state.arena;
    for benefit in &mut state.benefits {
        benefit.pos.y += benefit.fall_speed * scale;

        let half = benefit.size / 2.0;
        if benefit.pos.x > arena.x - half {
            benefit.drift = super::state::Drift::Left;
        } else if benefit.pos.x < half {
            benefit.drift = super::state::Drift::Right;
        }
        benefit.pos.x += benefit.drift_speed * scale * benefit.drift.sign();
    }
    state.benefits.retain(|benefit| benefit.pos.y <= arena.y);
}

/// Advance enemies; bottom leavers damage the ship on their way out
fn move_enemies(state: &mut GameState, dt: f32) {
    let scale = state.clock.game_speed * dt;
    let arena = state.arena;

    let mut escaped = 0u32;
    let mut keep = Vec::with_capacity(state.enemies.len());
    for mut enemy in state.enemies.drain(..) {
        match enemy.kind {
            EnemyKind::Normal => {
                enemy.pos.y += enemy.fall_speed * scale;

                let half = enemy.size / 2.0;
                if enemy.pos.x > arena.x - half {
                    enemy.drift = super::state::Drift::Left;
                } else if enemy.pos.x < half {
                    enemy.drift = super::state::Drift::Right;
                }
                enemy.pos.x += enemy.drift_speed * scale * enemy.drift.sign();
            }
            EnemyKind::BossProjectile { vel } => {
                enemy.pos += vel * scale;
            }
        }

        if enemy.pos.y > arena.y {
            escaped += 1;
        } else if enemy.pos.x < -enemy.size || enemy.pos.x > arena.x + enemy.size {
            // Projectiles that sail off the sides just despawn
        } else {
            keep.push(enemy);
        }
    }
    state.enemies = keep;

    for _ in 0..escaped {
        state.decrease_health(1);
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    for particle in &mut state.particles {
        particle.pos += particle.vel * dt;
        particle.vel *= 0.98;
        particle.life -= dt * particle.fade;
    }
    state.particles.retain(|p| p.life > 0.0);
}

fn expire_godmode(state: &mut GameState) {
    if state.godmode
        && state.clock.now().saturating_sub(state.godmode_started_ms) >= GODMODE_COOLDOWN_MS
    {
        state.godmode = false;
        state.push_event(GameEvent::GodmodeEnded);
    }
}

/// Auto-fire once the current delay (rapid fire shortens it) has elapsed
fn handle_fire(state: &mut GameState, input: &TickInput) {
    if !input.auto_fire {
        return;
    }
    let now = state.clock.now();
    if now.saturating_sub(state.last_shot_ms) < state.fire_delay_ms() {
        return;
    }
    state.last_shot_ms = now;

    let cue = if state.laser_flip {
        SoundCue::Laser1
    } else {
        SoundCue::Laser2
    };
    state.laser_flip = !state.laser_flip;
    state.push_event(GameEvent::Sound(cue));

    let pos = state.ship.pos;
    let id = state.next_entity_id();
    state.bullets.push(super::state::Bullet { id, pos });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Drift, Enemy};

    fn test_state() -> GameState {
        GameState::new(ARENA_WIDTH, ARENA_HEIGHT, 11)
    }

    fn no_input() -> TickInput {
        TickInput {
            target: None,
            auto_fire: false,
        }
    }

    fn enemy_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            size: 60.0,
            fall_speed: 150.0,
            drift_speed: 0.0,
            drift: Drift::Right,
            kind: EnemyKind::Normal,
        });
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut state = test_state();
        let before = state.clock.now();
        tick(&mut state, &TickInput::default(), 0.0);
        tick(&mut state, &TickInput::default(), -1.0);
        assert_eq!(state.clock.now(), before);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_ship_steers_toward_target_with_clamped_bank() {
        let mut state = test_state();
        let start = state.ship.pos;
        let input = TickInput {
            target: Some(Vec2::new(0.0, start.y)),
            auto_fire: false,
        };
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.ship.pos.x < start.x);
        assert!(state.ship.rotation >= -SHIP_MAX_ROTATION);
        assert!(state.ship.rotation < 0.0);

        // Bounds clamp: the ship never leaves the arena
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.ship.pos.x >= SHIP_SIZE / 2.0);
        assert_eq!(state.ship.rotation, -SHIP_MAX_ROTATION);
    }

    #[test]
    fn test_auto_fire_respects_delay_and_alternates_cues() {
        let mut state = test_state();
        let input = TickInput {
            target: None,
            auto_fire: true,
        };
        // Walk just past one full delay; exactly one shot fires
        let ticks = (SHOOT_DELAY_MS as f32 / 1000.0 / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.bullets.len(), 1);

        let cues: Vec<SoundCue> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Sound(cue @ (SoundCue::Laser1 | SoundCue::Laser2)) => Some(cue),
                _ => None,
            })
            .collect();
        assert_eq!(cues, vec![SoundCue::Laser2]);

        for _ in 0..ticks {
            tick(&mut state, &input, SIM_DT);
        }
        let cues: Vec<SoundCue> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Sound(cue @ (SoundCue::Laser1 | SoundCue::Laser2)) => Some(cue),
                _ => None,
            })
            .collect();
        assert_eq!(cues, vec![SoundCue::Laser1]);
    }

    #[test]
    fn test_rapid_fire_triples_rate() {
        let mut state = test_state();
        let input = TickInput {
            target: None,
            auto_fire: true,
        };
        state.apply_benefit(crate::sim::state::BenefitKind::RapidFire);

        // Over one second of rapid fire, the shortened delay fits ~3x the shots
        let mut shots = 0;
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
            if !state.bullets.is_empty() {
                shots += 1;
                state.bullets.clear();
            }
        }
        let base_shots = 1_000 / SHOOT_DELAY_MS;
        assert!(
            shots as u64 >= base_shots * 2,
            "expected a much faster cadence, got {shots}"
        );
    }

    #[test]
    fn test_enemy_bottom_exit_damages_and_sweeps() {
        let mut state = test_state();
        enemy_at(&mut state, Vec2::new(400.0, ARENA_HEIGHT - 1.0));
        enemy_at(&mut state, Vec2::new(200.0, 300.0));

        tick(&mut state, &no_input(), SIM_DT);

        assert_eq!(state.lives, MAX_LIVES - 1);
        assert!(state.paused, "damage freezes the world");

        // Frozen: nothing advances while the choreography plays
        let held = state.enemies[0].pos;
        tick(&mut state, &no_input(), SIM_DT);
        assert_eq!(state.enemies[0].pos, held);

        // Ride the clock past the freeze; the sweep clears the field
        let ticks = (SWEEP_PAUSE_MS as f32 / 1000.0 / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &no_input(), SIM_DT);
        }
        assert!(!state.paused);
        assert!(state.enemies.is_empty());
        assert!(state.godmode, "surviving the hit arms godmode");
    }

    #[test]
    fn test_godmode_expires_on_schedule() {
        let mut state = test_state();
        state.start_godmode();

        let ticks = (GODMODE_COOLDOWN_MS as f32 / 1000.0 / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &no_input(), SIM_DT);
        }
        assert!(!state.godmode);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::GodmodeEnded)
        );
    }

    #[test]
    fn test_bullets_despawn_past_top() {
        let mut state = test_state();
        let id = state.next_entity_id();
        state.bullets.push(super::super::state::Bullet {
            id,
            pos: Vec2::new(400.0, 5.0),
        });
        tick(&mut state, &no_input(), SIM_DT);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_game_over_halts_permanently() {
        let mut state = test_state();
        state.lives = 0;

        tick(&mut state, &no_input(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::GameOver)));
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));

        // Inert from here on: time passes, nothing happens
        let now = state.clock.now();
        enemy_at(&mut state, Vec2::new(100.0, 100.0));
        let held = state.enemies[0].pos;
        for _ in 0..10 {
            tick(&mut state, &no_input(), SIM_DT);
        }
        assert_eq!(state.enemies[0].pos, held);
        assert!(state.clock.now() > now, "the clock alone keeps moving");
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_speed_escalation_through_tick() {
        let mut state = test_state();
        // Keep the field quiet so the run survives long enough
        state.godmode = true;
        let input = no_input();
        let ticks = (SPEED_UP_INTERVAL_MS as f32 / 1000.0 / SIM_DT).ceil() as usize + 2;
        for _ in 0..ticks {
            state.godmode = true; // re-arm against expiry
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.clock.game_speed > BASE_SPEED_MULTIPLIER);
        assert!(state.clock.ship_speed > BASE_SPEED_MULTIPLIER);
    }

    #[test]
    fn test_two_pass_ordering_sees_fresh_spawns() {
        // An enemy spawned by the scheduler this frame must be collision
        // checked this frame. In a ship-wide arena every spawn position
        // overlaps a ship parked on the top edge, so the very first spawn
        // has to connect in its own frame.
        let mut state = GameState::new(SHIP_SIZE, ARENA_HEIGHT, 3);
        state.ship.pos = Vec2::new(SHIP_SIZE / 2.0, SHIP_SIZE / 2.0);
        state.clock.set_now_ms((ENEMY_SPAWN_DELAY_MS + 1) as f64);

        tick(&mut state, &no_input(), SIM_DT);

        assert_eq!(state.lives, MAX_LIVES - 1);
        assert!(state.enemies.is_empty());
    }
}
