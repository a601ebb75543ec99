//! Spawn scheduling
//!
//! Enemies and benefits arrive on independent delays measured on the
//! simulation clock. Spawned attributes (size, fall speed, horizontal drift)
//! are drawn from independent uniform ranges. The scheduler also owns the
//! elapsed-time checkpoints that hand off to the boss encounter.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Benefit, BenefitKind, Drift, Enemy, EnemyKind, GameState};
use crate::consts::*;

/// Last-spawn bookkeeping plus the boss checkpoint cursor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub last_enemy_ms: u64,
    pub last_benefit_ms: u64,
    /// Index into BOSS_CHECKPOINTS_MS; a passed checkpoint never re-fires
    pub next_checkpoint: usize,
}

/// Emit anything whose delay has elapsed. Each kind is tracked independently.
pub fn update(state: &mut GameState) {
    let now = state.clock.now();

    if now.saturating_sub(state.spawner.last_enemy_ms) > ENEMY_SPAWN_DELAY_MS {
        state.spawner.last_enemy_ms = now;
        let x = state.rng.random_range(0.0..state.arena.x);
        spawn_enemy_at(state, Vec2::new(x, 0.0));
    }

    if now.saturating_sub(state.spawner.last_benefit_ms) > BENEFIT_SPAWN_DELAY_MS {
        state.spawner.last_benefit_ms = now;
        spawn_benefit(state);
    }
}

fn random_drift(state: &mut GameState) -> Drift {
    if state.rng.random_bool(0.5) {
        Drift::Right
    } else {
        Drift::Left
    }
}

/// Spawn a normal enemy at an explicit position (top edge or boss escort)
pub fn spawn_enemy_at(state: &mut GameState, pos: Vec2) {
    let size = state.rng.random_range(ENEMY_MIN_SIZE..=ENEMY_MAX_SIZE);
    let fall_speed = state.rng.random_range(ENEMY_MIN_SPEED..=ENEMY_MAX_SPEED);
    let drift_speed = state.rng.random_range(ENEMY_MIN_X_SPEED..=ENEMY_MAX_X_SPEED);
    let drift = random_drift(state);
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos,
        size,
        fall_speed,
        drift_speed,
        drift,
        kind: EnemyKind::Normal,
    });
}

/// Aimed boss shot; a degenerate aim vector falls back to zero velocity
pub fn spawn_boss_projectile(state: &mut GameState, from: Vec2, toward: Vec2) {
    let vel = (toward - from).normalize_or_zero() * BOSS_PROJECTILE_SPEED;
    let drift = random_drift(state);
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos: from,
        size: BOSS_PROJECTILE_SIZE,
        fall_speed: 0.0,
        drift_speed: 0.0,
        drift,
        kind: EnemyKind::BossProjectile { vel },
    });
}

fn spawn_benefit(state: &mut GameState) {
    let kind = if state.rng.random_bool(COIN_CHANCE) {
        BenefitKind::Coin
    } else {
        // Remaining chance splits evenly over the four power-ups
        match state.rng.random_range(0..4) {
            0 => BenefitKind::Shield,
            1 => BenefitKind::RapidFire,
            2 => BenefitKind::Bomb,
            _ => BenefitKind::ExtraLife,
        }
    };
    let x = state.rng.random_range(0.0..state.arena.x);
    let size = state.rng.random_range(BENEFIT_MIN_SIZE..=BENEFIT_MAX_SIZE);
    let fall_speed = state.rng.random_range(BENEFIT_MIN_SPEED..=BENEFIT_MAX_SPEED);
    let drift_speed = state
        .rng
        .random_range(BENEFIT_MIN_X_SPEED..=BENEFIT_MAX_X_SPEED);
    let drift = random_drift(state);
    let id = state.next_entity_id();
    state.benefits.push(Benefit {
        id,
        pos: Vec2::new(x, 0.0),
        size,
        fall_speed,
        drift_speed,
        drift,
        kind,
    });
}
