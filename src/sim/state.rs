//! Game state and core simulation types
//!
//! One `GameState` value owns all simulation truth: the ship, the entity
//! collections, score/combo, health, the boss slot, the clock and the
//! scheduled-action timeline. Subsystems mutate it through the methods here;
//! the presentation layer only reads it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, Scheduled, Timeline};
use super::spawn::SpawnScheduler;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Run ended; the tick body is inert from here on
    GameOver,
}

/// Horizontal bounce direction for falling entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Drift {
    Left,
    Right,
}

impl Drift {
    pub fn sign(self) -> f32 {
        match self {
            Drift::Left => -1.0,
            Drift::Right => 1.0,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// Banking angle, clamped to ±SHIP_MAX_ROTATION
    pub rotation: f32,
}

impl Ship {
    pub fn half_extent(&self) -> Vec2 {
        Vec2::splat(SHIP_SIZE / 2.0)
    }
}

/// A player bullet; velocity is fixed upward at BULLET_SPEED
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
}

impl Bullet {
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(BULLET_WIDTH / 2.0, BULLET_HEIGHT / 2.0)
    }
}

/// Discriminator for the enemy collection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Falls straight down while bouncing horizontally
    Normal,
    /// Boss shot aimed at the ship's position at launch time
    BossProjectile { vel: Vec2 },
}

/// A descending enemy (or boss projectile)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub fall_speed: f32,
    pub drift_speed: f32,
    pub drift: Drift,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn half_extent(&self) -> Vec2 {
        Vec2::splat(self.size / 2.0)
    }
}

/// What a falling collectible does on pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitKind {
    Coin,
    Shield,
    RapidFire,
    Bomb,
    ExtraLife,
}

/// A falling collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benefit {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub fall_speed: f32,
    pub drift_speed: f32,
    pub drift: Drift,
    pub kind: BenefitKind,
}

impl Benefit {
    pub fn half_extent(&self) -> Vec2 {
        Vec2::splat(self.size / 2.0)
    }
}

/// A cosmetic particle; never collides with anything
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    /// Life decay rate multiplier
    pub fade: f32,
}

/// Consecutive-kill counter with a decaying window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Seconds left before the streak drops
    pub countdown: f32,
}

impl Combo {
    /// Register a kill; returns the score multiplier for it
    pub fn increment(&mut self) -> u32 {
        self.count += 1;
        self.countdown = COMBO_WINDOW_SECS;
        self.multiplier()
    }

    /// Score multiplier, capped even though the streak itself is unbounded
    pub fn multiplier(&self) -> u32 {
        self.count.clamp(1, COMBO_MULTIPLIER_CAP)
    }

    /// Cosmetic escalation tier for the indicator (thresholds 5 and 10)
    pub fn tier(&self) -> u8 {
        match self.count {
            0..=4 => 0,
            5..=9 => 1,
            _ => 2,
        }
    }

    /// Advance the window; returns true when the streak just dropped
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.count == 0 {
            return false;
        }
        self.countdown -= dt;
        if self.countdown <= 0.0 {
            self.count = 0;
            self.countdown = 0.0;
            return true;
        }
        false
    }
}

/// Timed power-up effects, compared against simulation time every tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield_active: bool,
    pub shield_until_ms: u64,
    pub rapid_fire_until_ms: u64,
}

/// Decaying random offset applied to the whole scene on impacts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub intensity: f32,
    pub decay: f32,
    pub offset: Vec2,
}

impl ScreenShake {
    /// New triggers overwrite the current shake rather than compounding
    pub fn trigger(&mut self, intensity: f32, decay: f32) {
        self.intensity = intensity;
        self.decay = decay;
    }

    pub fn active(&self) -> bool {
        self.intensity >= SHAKE_CUTOFF
    }

    pub fn update(&mut self, rng: &mut Pcg32) {
        if !self.active() {
            self.intensity = 0.0;
            self.offset = Vec2::ZERO;
            return;
        }
        let half = self.intensity / 2.0;
        self.offset = Vec2::new(
            rng.random_range(-half..=half),
            rng.random_range(-half..=half),
        );
        self.intensity *= self.decay;
    }
}

/// Simulation clock: monotonic time plus the escalating speed multipliers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    now_ms: f64,
    pub game_speed: f32,
    pub ship_speed: f32,
    pub last_speed_up_ms: u64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            game_speed: BASE_SPEED_MULTIPLIER,
            ship_speed: BASE_SPEED_MULTIPLIER,
            last_speed_up_ms: 0,
        }
    }
}

impl GameClock {
    /// Advance simulation time; non-positive deltas are a no-op tick
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.now_ms += f64::from(dt) * 1000.0;
    }

    pub fn now(&self) -> u64 {
        self.now_ms as u64
    }

    pub fn now_secs(&self) -> f32 {
        (self.now_ms / 1000.0) as f32
    }

    /// Test helper and save/restore hook; gameplay only moves time forward
    pub fn set_now_ms(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    /// Bump both multipliers once per SPEED_UP_INTERVAL of elapsed time
    pub fn maybe_escalate(&mut self) -> bool {
        if self.now().saturating_sub(self.last_speed_up_ms) >= SPEED_UP_INTERVAL_MS {
            self.game_speed += SPEED_UP_MULTIPLIER;
            self.ship_speed += SHIP_SPEED_UP_MULTIPLIER;
            self.last_speed_up_ms = self.now();
            log::debug!(
                "speed up: game {:.2}, ship {:.2}",
                self.game_speed,
                self.ship_speed
            );
            return true;
        }
        false
    }
}

/// Boss encounter lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Inactive,
    /// Announced, waiting out the banner before going live
    Incoming,
    Active,
    /// Dying; the defeat cascade is still playing out
    Defeated,
}

/// The single boss slot; at most one encounter exists at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    pub phase: BossPhase,
    pub health: u32,
    pub pos: Vec2,
    pub spawned_at_ms: u64,
}

impl Default for BossState {
    fn default() -> Self {
        Self {
            phase: BossPhase::Inactive,
            health: 0,
            pos: Vec2::ZERO,
            spawned_at_ms: 0,
        }
    }
}

impl BossState {
    pub fn half_extent(&self) -> Vec2 {
        Vec2::splat(BOSS_SIZE / 2.0)
    }
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Arena dimensions (width, height)
    pub arena: Vec2,
    pub phase: GamePhase,
    /// Frozen during the giga-explosion choreography
    pub paused: bool,
    pub clock: GameClock,
    pub ship: Ship,
    pub lives: u32,
    pub godmode: bool,
    pub godmode_started_ms: u64,
    pub effects: ActiveEffects,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub benefits: Vec<Benefit>,
    /// Cosmetic particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub combo: Combo,
    pub score: u64,
    pub boss: BossState,
    pub shake: ScreenShake,
    pub spawner: SpawnScheduler,
    pub timeline: Timeline,
    /// Pending notifications for the host, drained once per frame
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
    pub last_shot_ms: u64,
    /// Alternates the two laser cues
    pub laser_flip: bool,
}

impl GameState {
    /// Create a new run. The ship starts centered at the bottom edge.
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena: Vec2::new(width, height),
            phase: GamePhase::Running,
            paused: false,
            clock: GameClock::default(),
            ship: Ship {
                pos: Vec2::new(width / 2.0, height - SHIP_SIZE / 2.0),
                rotation: 0.0,
            },
            lives: MAX_LIVES,
            godmode: false,
            godmode_started_ms: 0,
            effects: ActiveEffects::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            benefits: Vec::new(),
            particles: Vec::new(),
            combo: Combo::default(),
            score: 0,
            boss: BossState::default(),
            shake: ScreenShake::default(),
            spawner: SpawnScheduler::default(),
            timeline: Timeline::default(),
            events: Vec::new(),
            next_id: 1,
            last_shot_ms: 0,
            laser_flip: false,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the frame's notifications to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[cfg(test)]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Queue an explosion effect (and its cue) at a position
    pub fn explosion_at(&mut self, pos: Vec2) {
        let scale = self.rng.random_range(0.75..=1.25);
        self.events.push(GameEvent::Sound(super::SoundCue::Explosion));
        self.events.push(GameEvent::Explosion { pos, scale });
    }

    /// Scatter cosmetic particles from a point. Oldest get dropped at the cap.
    pub fn particle_burst(&mut self, pos: Vec2, count: usize) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(60.0..=240.0);
            let life = self.rng.random_range(0.5..=1.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life,
                fade: 1.5,
            });
        }
    }

    pub fn add_score(&mut self, points: u64, big: bool) {
        self.score += points;
        self.events.push(GameEvent::ScoreAwarded {
            points,
            total: self.score,
            big,
        });
    }

    /// Register a kill toward the streak; returns the score multiplier
    pub fn increment_combo(&mut self) -> u32 {
        let multiplier = self.combo.increment();
        self.events.push(GameEvent::ComboAdvanced {
            count: self.combo.count,
            multiplier,
        });
        multiplier
    }

    /// Apply damage. No-op under godmode; floors at zero. A fresh hit kicks
    /// off the paused giga-explosion choreography, resolved by the timeline.
    pub fn decrease_health(&mut self, n: u32) {
        if self.godmode {
            return;
        }
        self.lives = self.lives.saturating_sub(n);
        self.events.push(GameEvent::HeartLost {
            remaining: self.lives,
        });
        if !self.paused {
            self.paused = true;
            self.events.push(GameEvent::GigaExplosion);
            self.timeline
                .schedule(self.clock.now() + SWEEP_PAUSE_MS, Scheduled::SweepFinish);
        }
    }

    pub fn start_godmode(&mut self) {
        self.godmode = true;
        self.godmode_started_ms = self.clock.now();
        self.events.push(GameEvent::GodmodeStarted);
    }

    pub fn rapid_fire_active(&self) -> bool {
        self.clock.now() < self.effects.rapid_fire_until_ms
    }

    /// Current delay between shots; rapid fire divides the base delay
    pub fn fire_delay_ms(&self) -> u64 {
        if self.rapid_fire_active() {
            SHOOT_DELAY_MS / RAPID_FIRE_DIVISOR
        } else {
            SHOOT_DELAY_MS
        }
    }

    /// Kind-specific pickup effects
    pub fn apply_benefit(&mut self, kind: BenefitKind) {
        match kind {
            BenefitKind::Coin => {
                self.events.push(GameEvent::Sound(super::SoundCue::Coin));
                self.add_score(BENEFIT_POINT, false);
            }
            BenefitKind::Shield => {
                let until = self.clock.now() + SHIELD_DURATION_MS;
                self.effects.shield_active = true;
                self.effects.shield_until_ms = until;
                self.timeline.schedule(until, Scheduled::ShieldExpire);
                self.events.push(GameEvent::PowerUpCollected { kind });
            }
            BenefitKind::RapidFire => {
                self.effects.rapid_fire_until_ms = self.clock.now() + RAPID_FIRE_DURATION_MS;
                self.events.push(GameEvent::PowerUpCollected { kind });
            }
            BenefitKind::Bomb => {
                let blasted: Vec<Vec2> = self.enemies.iter().map(|e| e.pos).collect();
                self.enemies.clear();
                for pos in blasted {
                    self.explosion_at(pos);
                    self.add_score(ENEMY_POINT, true);
                }
                self.shake.trigger(SHAKE_BIG_INTENSITY, SHAKE_BIG_DECAY);
                self.events.push(GameEvent::PowerUpCollected { kind });
            }
            BenefitKind::ExtraLife => {
                if self.lives < MAX_LIVES {
                    self.lives += 1;
                    self.events.push(GameEvent::HeartRestored {
                        index: self.lives - 1,
                    });
                }
                self.events.push(GameEvent::PowerUpCollected { kind });
            }
        }
    }

    /// Ship draw position: simulation truth plus the cosmetic idle bob
    pub fn ship_render_pos(&self) -> Vec2 {
        let bob =
            (self.clock.now_secs() * std::f32::consts::TAU * SHIP_BOB_HZ).sin() * SHIP_BOB_RANGE;
        self.ship.pos + Vec2::new(0.0, bob)
    }

    /// Scene offset the host applies while the shake is live
    pub fn shake_offset(&self) -> Vec2 {
        self.shake.offset
    }
}
