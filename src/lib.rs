//! Starfall - a vertical-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, scoring, boss AI)
//!
//! Rendering, audio and input capture are host concerns. The host feeds a
//! [`sim::TickInput`] each frame, reads [`sim::GameState`] for drawing, and
//! drains [`sim::GameEvent`]s for sound/VFX cues.

pub mod sim;

pub use sim::{GameEvent, GameState, SoundCue, TickInput, tick};

/// Game configuration constants
///
/// Motion constants are px/s at speed multiplier 1.0; durations are
/// simulation milliseconds.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 1280.0;

    /// Ship defaults
    pub const SHIP_SIZE: f32 = 150.0;
    pub const SHIP_SPEED: f32 = 600.0;
    pub const SHIP_ROTATION_SPEED: f32 = 3.0; // radians/sec while steering
    pub const SHIP_MAX_ROTATION: f32 = 0.6;
    /// Cosmetic idle bob (render-only, never touches collision)
    pub const SHIP_BOB_RANGE: f32 = 5.0;
    pub const SHIP_BOB_HZ: f32 = 1.5;

    /// Lives and damage reaction
    pub const MAX_LIVES: u32 = 3;
    pub const GODMODE_COOLDOWN_MS: u64 = 5_000;
    /// Length of the giga-explosion freeze after taking damage
    pub const SWEEP_PAUSE_MS: u64 = 550;
    /// Per-entity stagger of the destroy-all explosion cascade
    pub const SWEEP_STAGGER_MS: u64 = 25;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 3.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 720.0;
    pub const SHOOT_DELAY_MS: u64 = 250;

    /// Power-up effects
    pub const SHIELD_DURATION_MS: u64 = 10_000;
    pub const RAPID_FIRE_DURATION_MS: u64 = 5_000;
    pub const RAPID_FIRE_DIVISOR: u64 = 3;

    /// Spawn cadence
    pub const ENEMY_SPAWN_DELAY_MS: u64 = 1_000;
    pub const BENEFIT_SPAWN_DELAY_MS: u64 = 3_000;

    /// Enemy attribute ranges
    pub const ENEMY_MIN_SIZE: f32 = 50.0;
    pub const ENEMY_MAX_SIZE: f32 = 110.0;
    pub const ENEMY_MIN_SPEED: f32 = 120.0;
    pub const ENEMY_MAX_SPEED: f32 = 300.0;
    pub const ENEMY_MIN_X_SPEED: f32 = 0.0;
    pub const ENEMY_MAX_X_SPEED: f32 = 120.0;
    pub const ENEMY_POINT: u64 = 100;

    /// Benefit attribute ranges
    pub const BENEFIT_MIN_SIZE: f32 = 40.0;
    pub const BENEFIT_MAX_SIZE: f32 = 70.0;
    pub const BENEFIT_MIN_SPEED: f32 = 90.0;
    pub const BENEFIT_MAX_SPEED: f32 = 210.0;
    pub const BENEFIT_MIN_X_SPEED: f32 = 0.0;
    pub const BENEFIT_MAX_X_SPEED: f32 = 90.0;
    pub const BENEFIT_POINT: u64 = 50;
    /// Plain coin probability; the remainder splits evenly over the power-ups
    pub const COIN_CHANCE: f64 = 0.8;

    /// Speed escalation
    pub const BASE_SPEED_MULTIPLIER: f32 = 1.0;
    pub const SPEED_UP_INTERVAL_MS: u64 = 15_000;
    pub const SPEED_UP_MULTIPLIER: f32 = 0.1;
    pub const SHIP_SPEED_UP_MULTIPLIER: f32 = 0.05;

    /// Combo
    pub const COMBO_WINDOW_SECS: f32 = 2.0;
    pub const COMBO_MULTIPLIER_CAP: u32 = 10;

    /// Boss encounter
    pub const BOSS_CHECKPOINTS_MS: [u64; 2] = [60_000, 180_000];
    pub const BOSS_ANNOUNCE_MS: u64 = 2_500;
    pub const BOSS_MAX_HEALTH: u32 = 100;
    pub const BOSS_SIZE: f32 = 180.0;
    pub const BOSS_ANCHOR_Y: f32 = 200.0;
    pub const BOSS_SWAY_X: f32 = 140.0;
    pub const BOSS_SWAY_Y: f32 = 40.0;
    pub const BOSS_SWAY_FREQ_X: f32 = 0.9;
    pub const BOSS_SWAY_FREQ_Y: f32 = 1.7;
    pub const BOSS_PROJECTILE_SPEED: f32 = 300.0;
    pub const BOSS_PROJECTILE_SIZE: f32 = 36.0;
    pub const BOSS_PROJECTILE_CHANCE: f64 = 0.05;
    pub const BOSS_ESCORT_CHANCE: f64 = 0.01;
    pub const BOSS_ESCORT_COUNT: usize = 3;
    pub const BOSS_DEFEAT_POINTS: u64 = 5_000;
    pub const BOSS_DEFEAT_BLASTS: usize = 10;
    pub const BOSS_DEFEAT_STAGGER_MS: u64 = 200;

    /// Screen shake presets
    pub const SHAKE_DAMAGE_INTENSITY: f32 = 15.0;
    pub const SHAKE_DAMAGE_DECAY: f32 = 0.9;
    pub const SHAKE_KILL_INTENSITY: f32 = 3.0;
    pub const SHAKE_KILL_DECAY: f32 = 0.8;
    pub const SHAKE_BIG_INTENSITY: f32 = 20.0;
    pub const SHAKE_BIG_DECAY: f32 = 0.9;
    pub const SHAKE_CUTOFF: f32 = 0.5;

    /// Particles
    pub const KILL_PARTICLE_COUNT: usize = 15;
    pub const BOSS_HIT_PARTICLE_COUNT: usize = 10;
    pub const MAX_PARTICLES: usize = 512;
}
