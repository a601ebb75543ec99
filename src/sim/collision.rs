//! Collision detection and outcome dispatch
//!
//! Everything is an axis-aligned box test on sprite half-extents; no rotated
//! or sub-pixel precision. Resolution runs as the frame's second pass, after
//! movement and spawning, so entities added this frame are already visible.
//! Scans run back to front so removals can never skip a sibling.

use glam::Vec2;

use super::boss;
use super::state::{BossPhase, GameState};
use crate::consts::*;

/// Axis-aligned box overlap on half-extents
pub fn aabb_overlap(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    (a_pos.x - b_pos.x).abs() <= a_half.x + b_half.x
        && (a_pos.y - b_pos.y).abs() <= a_half.y + b_half.y
}

/// Resolve all overlap outcomes for this frame
pub fn resolve(state: &mut GameState) {
    resolve_benefits(state);
    resolve_enemies(state);
    resolve_boss(state);
}

/// Ship picks up anything it touches; the kind decides what happens
fn resolve_benefits(state: &mut GameState) {
    let ship_pos = state.ship.pos;
    let ship_half = state.ship.half_extent();

    let mut collected = Vec::new();
    state.benefits.retain(|benefit| {
        if aabb_overlap(ship_pos, ship_half, benefit.pos, benefit.half_extent()) {
            collected.push(benefit.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        state.apply_benefit(kind);
    }
}

fn resolve_enemies(state: &mut GameState) {
    let ship_pos = state.ship.pos;
    let ship_half = state.ship.half_extent();
    // Shield and godmode suppress contact damage for every enemy kind,
    // boss projectiles included
    let invulnerable = state.godmode || state.effects.shield_active;

    let mut i = state.enemies.len();
    while i > 0 {
        i -= 1;

        let enemy_pos = state.enemies[i].pos;
        let enemy_half = state.enemies[i].half_extent();

        if !invulnerable && aabb_overlap(ship_pos, ship_half, enemy_pos, enemy_half) {
            state.enemies.remove(i);
            state.explosion_at(enemy_pos);
            state.decrease_health(1);
            state
                .shake
                .trigger(SHAKE_DAMAGE_INTENSITY, SHAKE_DAMAGE_DECAY);
            continue;
        }

        let hit = state
            .bullets
            .iter()
            .position(|bullet| {
                aabb_overlap(bullet.pos, bullet.half_extent(), enemy_pos, enemy_half)
            });
        if let Some(bullet_idx) = hit {
            state.bullets.remove(bullet_idx);
            state.enemies.remove(i);
            state.explosion_at(enemy_pos);
            let multiplier = state.increment_combo();
            state.add_score(ENEMY_POINT * u64::from(multiplier), multiplier > 1);
            state.particle_burst(enemy_pos, KILL_PARTICLE_COUNT);
            state.shake.trigger(SHAKE_KILL_INTENSITY, SHAKE_KILL_DECAY);
        }
    }
}

/// Bullets striking a live boss chip health instead of scoring
fn resolve_boss(state: &mut GameState) {
    if state.boss.phase != BossPhase::Active {
        return;
    }
    let boss_pos = state.boss.pos;
    let boss_half = state.boss.half_extent();

    let mut i = state.bullets.len();
    while i > 0 {
        i -= 1;
        let bullet = &state.bullets[i];
        if aabb_overlap(bullet.pos, bullet.half_extent(), boss_pos, boss_half) {
            state.bullets.remove(i);
            state.explosion_at(boss_pos);
            boss::hit(state);
            if state.boss.phase != BossPhase::Active {
                // Defeat mid-pass: remaining bullets fly on
                return;
            }
        }
    }
}
