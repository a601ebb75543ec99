//! Boss encounter state machine
//!
//! Inactive → Incoming → Active → Defeated → Inactive. Encounters trigger at
//! fixed elapsed-time checkpoints, gated on the single boss slot being free.
//! While active the boss sways on a sinusoidal path around a fixed anchor and
//! rolls its attacks every tick; defeat plays a staggered blast cascade
//! through the timeline before freeing the slot.

use glam::Vec2;
use rand::Rng;

use super::events::{GameEvent, Scheduled};
use super::spawn;
use super::state::{BossPhase, GameState};
use crate::consts::*;

/// Screen anchor the sway oscillates around
fn anchor(state: &GameState) -> Vec2 {
    Vec2::new(state.arena.x / 2.0, BOSS_ANCHOR_Y)
}

/// Per-tick boss work: checkpoint triggers, sway movement, attack rolls
pub fn update(state: &mut GameState, _dt: f32) {
    maybe_trigger(state);

    // Everything below only applies to a live encounter
    if state.boss.phase != BossPhase::Active {
        return;
    }

    let t = state
        .clock
        .now()
        .saturating_sub(state.boss.spawned_at_ms) as f32
        / 1000.0;
    let base = anchor(state);
    state.boss.pos = Vec2::new(
        base.x + (t * BOSS_SWAY_FREQ_X).sin() * BOSS_SWAY_X,
        base.y + (t * BOSS_SWAY_FREQ_Y).sin() * BOSS_SWAY_Y,
    );

    if state.rng.random_bool(BOSS_PROJECTILE_CHANCE) {
        let from = state.boss.pos;
        let toward = state.ship.pos;
        spawn::spawn_boss_projectile(state, from, toward);
    }

    if state.rng.random_bool(BOSS_ESCORT_CHANCE) {
        let from = state.boss.pos;
        for _ in 0..BOSS_ESCORT_COUNT {
            spawn::spawn_enemy_at(state, from);
        }
    }
}

/// Fire a checkpoint once its timestamp passes. The slot gate means a still
/// live encounter swallows the checkpoint rather than deferring it.
fn maybe_trigger(state: &mut GameState) {
    let Some(&checkpoint) = BOSS_CHECKPOINTS_MS.get(state.spawner.next_checkpoint) else {
        return;
    };
    if state.clock.now() < checkpoint {
        return;
    }
    state.spawner.next_checkpoint += 1;

    if state.boss.phase != BossPhase::Inactive {
        log::debug!("boss checkpoint at {checkpoint}ms skipped, encounter already live");
        return;
    }

    let now = state.clock.now();
    state.boss.phase = BossPhase::Incoming;
    state.boss.health = BOSS_MAX_HEALTH;
    state.boss.spawned_at_ms = now;
    state.boss.pos = anchor(state);
    state.push_event(GameEvent::BossIncoming);
    state
        .timeline
        .schedule(now + BOSS_ANNOUNCE_MS, Scheduled::BossActivate);
    log::info!("boss incoming at {now}ms");
}

/// A qualifying bullet hit. No-op unless the encounter is live.
pub fn hit(state: &mut GameState) {
    if state.boss.phase != BossPhase::Active {
        return;
    }
    state.boss.health = state.boss.health.saturating_sub(1);
    let health = state.boss.health;
    state.push_event(GameEvent::BossHit { health });
    let pos = state.boss.pos;
    state.particle_burst(pos, BOSS_HIT_PARTICLE_COUNT);

    if state.boss.health == 0 {
        defeat(state);
    }
}

fn defeat(state: &mut GameState) {
    state.boss.phase = BossPhase::Defeated;
    state.add_score(BOSS_DEFEAT_POINTS, true);
    state.shake.trigger(SHAKE_BIG_INTENSITY, SHAKE_BIG_DECAY);
    state.push_event(GameEvent::BossDefeated);

    // Blast positions are captured now; the boss sprite is already done for
    let now = state.clock.now();
    let half = state.boss.half_extent();
    for i in 0..BOSS_DEFEAT_BLASTS {
        let offset = Vec2::new(
            state.rng.random_range(-half.x..=half.x),
            state.rng.random_range(-half.y..=half.y),
        );
        let pos = state.boss.pos + offset;
        state
            .timeline
            .schedule(now + BOSS_DEFEAT_STAGGER_MS * i as u64, Scheduled::BossBlast { pos });
    }
    state.timeline.schedule(
        now + BOSS_DEFEAT_STAGGER_MS * BOSS_DEFEAT_BLASTS as u64,
        Scheduled::BossClear,
    );
    log::info!("boss defeated at {now}ms, score {}", state.score);
}

/// Timeline callbacks owned by the encounter
pub fn on_scheduled(state: &mut GameState, action: Scheduled) {
    match action {
        Scheduled::BossActivate => {
            if state.boss.phase == BossPhase::Incoming {
                state.boss.phase = BossPhase::Active;
                log::info!("boss active at {}ms", state.clock.now());
            }
        }
        Scheduled::BossBlast { pos } => {
            if state.boss.phase == BossPhase::Defeated {
                state.explosion_at(pos);
            }
        }
        Scheduled::BossClear => {
            if state.boss.phase == BossPhase::Defeated {
                state.boss.phase = BossPhase::Inactive;
                state.boss.health = 0;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyKind;

    fn test_state() -> GameState {
        GameState::new(ARENA_WIDTH, ARENA_HEIGHT, 99)
    }

    /// Drive the timeline the way the tick loop does
    fn drain(state: &mut GameState) {
        let due = state.timeline.drain_due(state.clock.now());
        for action in due {
            on_scheduled(state, action);
        }
    }

    #[test]
    fn test_checkpoint_triggers_encounter() {
        let mut state = test_state();

        state.clock.set_now_ms((BOSS_CHECKPOINTS_MS[0] - 1) as f64);
        update(&mut state, 0.016);
        assert_eq!(state.boss.phase, BossPhase::Inactive);

        state.clock.set_now_ms(BOSS_CHECKPOINTS_MS[0] as f64);
        update(&mut state, 0.016);
        assert_eq!(state.boss.phase, BossPhase::Incoming);
        assert_eq!(state.boss.health, BOSS_MAX_HEALTH);
        assert!(state.events().contains(&GameEvent::BossIncoming));

        // Announcement runs out, encounter goes live
        state
            .clock
            .set_now_ms((BOSS_CHECKPOINTS_MS[0] + BOSS_ANNOUNCE_MS) as f64);
        drain(&mut state);
        assert_eq!(state.boss.phase, BossPhase::Active);
    }

    #[test]
    fn test_live_encounter_swallows_checkpoint() {
        let mut state = test_state();
        state.clock.set_now_ms(BOSS_CHECKPOINTS_MS[0] as f64);
        update(&mut state, 0.016);
        let first_spawn = state.boss.spawned_at_ms;

        // Second checkpoint passes while the first encounter is still up
        state.clock.set_now_ms(BOSS_CHECKPOINTS_MS[1] as f64);
        update(&mut state, 0.016);
        assert_eq!(state.boss.spawned_at_ms, first_spawn);
        assert_eq!(state.spawner.next_checkpoint, BOSS_CHECKPOINTS_MS.len());
    }

    #[test]
    fn test_hit_decrements_until_defeat() {
        let mut state = test_state();
        state.clock.set_now_ms(BOSS_CHECKPOINTS_MS[0] as f64);
        update(&mut state, 0.016);
        state
            .clock
            .set_now_ms((BOSS_CHECKPOINTS_MS[0] + BOSS_ANNOUNCE_MS) as f64);
        drain(&mut state);
        assert_eq!(state.boss.phase, BossPhase::Active);

        hit(&mut state);
        assert_eq!(state.boss.health, BOSS_MAX_HEALTH - 1);

        for _ in 0..BOSS_MAX_HEALTH {
            hit(&mut state);
        }
        assert_eq!(state.boss.phase, BossPhase::Defeated);
        assert_eq!(state.score, BOSS_DEFEAT_POINTS);

        // Extra hits after defeat change nothing
        hit(&mut state);
        assert_eq!(state.score, BOSS_DEFEAT_POINTS);

        // Cascade: one blast per stagger step, then the slot frees up
        let base = state.clock.now();
        for i in 0..BOSS_DEFEAT_BLASTS {
            state
                .clock
                .set_now_ms((base + BOSS_DEFEAT_STAGGER_MS * i as u64) as f64);
            drain(&mut state);
            assert_eq!(state.boss.phase, BossPhase::Defeated);
        }
        state
            .clock
            .set_now_ms((base + BOSS_DEFEAT_STAGGER_MS * BOSS_DEFEAT_BLASTS as u64) as f64);
        drain(&mut state);
        assert_eq!(state.boss.phase, BossPhase::Inactive);
    }

    #[test]
    fn test_hit_is_noop_when_inactive() {
        let mut state = test_state();
        hit(&mut state);
        assert_eq!(state.boss.health, 0);
        assert_eq!(state.boss.phase, BossPhase::Inactive);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_active_boss_sways_and_attacks() {
        let mut state = test_state();
        state.clock.set_now_ms(BOSS_CHECKPOINTS_MS[0] as f64);
        update(&mut state, 0.016);
        state
            .clock
            .set_now_ms((BOSS_CHECKPOINTS_MS[0] + BOSS_ANNOUNCE_MS) as f64);
        drain(&mut state);

        // Over enough ticks the attack rolls must land some projectiles
        let mut saw_projectile = false;
        for i in 0..600u64 {
            state
                .clock
                .set_now_ms((BOSS_CHECKPOINTS_MS[0] + BOSS_ANNOUNCE_MS + i * 16) as f64);
            update(&mut state, 0.016);
            let base = anchor(&state);
            assert!((state.boss.pos.x - base.x).abs() <= BOSS_SWAY_X + 0.001);
            assert!((state.boss.pos.y - base.y).abs() <= BOSS_SWAY_Y + 0.001);
            if state
                .enemies
                .iter()
                .any(|e| matches!(e.kind, EnemyKind::BossProjectile { .. }))
            {
                saw_projectile = true;
            }
        }
        assert!(saw_projectile, "no projectile in 600 attack rolls");
    }
}
