//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and host-free:
//! - Fixed-shape entity records, dispatched on their kind
//! - Seeded RNG only
//! - Timed effects keyed to the simulation clock, never the wall clock
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod collision;
pub mod events;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::aabb_overlap;
pub use events::{GameEvent, Scheduled, SoundCue, Timeline};
pub use state::{
    ActiveEffects, Benefit, BenefitKind, BossPhase, BossState, Bullet, Combo, Drift, Enemy,
    EnemyKind, GameClock, GamePhase, GameState, Particle, ScreenShake, Ship,
};
pub use tick::{TickInput, tick};
