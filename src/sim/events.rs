//! Outbound events and the scheduled-action timeline
//!
//! The simulation never calls the presentation layer directly. Sounds, VFX
//! and UI cues are queued as [`GameEvent`]s for the host to drain once per
//! frame. Delayed choreography (the destroy-all cascade, shield expiry, boss
//! activation and defeat blasts) is queued on a [`Timeline`] keyed by
//! simulation time and drained at the top of every tick, so the whole core
//! runs without wall-clock timers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::BenefitKind;

/// Named audio cues the host is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Laser1,
    Laser2,
    Explosion,
    Coin,
    GameOver,
}

/// One-shot notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    /// Explosion effect at a position, with a random visual scale
    Explosion { pos: Vec2, scale: f32 },
    /// The full-screen damage-reaction choreography
    GigaExplosion,
    ScoreAwarded { points: u64, total: u64, big: bool },
    ComboAdvanced { count: u32, multiplier: u32 },
    ComboDropped,
    HeartLost { remaining: u32 },
    HeartRestored { index: u32 },
    GodmodeStarted,
    GodmodeEnded,
    PowerUpCollected { kind: BenefitKind },
    BossIncoming,
    BossHit { health: u32 },
    BossDefeated,
    GameOver { score: u64 },
}

/// Actions that fire at a future simulation timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scheduled {
    /// One explosion of the staggered destroy-all cascade
    SweepExplosion { pos: Vec2 },
    /// End of the damage freeze: clear entities, unpause, maybe godmode
    SweepFinish,
    ShieldExpire,
    /// Boss announcement is over, encounter goes live
    BossActivate,
    /// One blast of the boss defeat cascade
    BossBlast { pos: Vec2 },
    /// Defeat cascade done, boss slot frees up
    BossClear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry {
    at_ms: u64,
    seq: u64,
    action: Scheduled,
}

/// Pending scheduled actions, ordered by fire time then insertion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Timeline {
    pub fn schedule(&mut self, at_ms: u64, action: Scheduled) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { at_ms, seq, action });
    }

    /// Remove and return every action due at `now_ms`, in fire order
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<Scheduled> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|entry| {
            if entry.at_ms <= now_ms {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|entry| (entry.at_ms, entry.seq));
        due.into_iter().map(|entry| entry.action).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_respects_fire_order() {
        let mut timeline = Timeline::default();
        timeline.schedule(200, Scheduled::SweepFinish);
        timeline.schedule(100, Scheduled::ShieldExpire);
        timeline.schedule(100, Scheduled::BossActivate);

        // Nothing due yet
        assert!(timeline.drain_due(50).is_empty());
        assert_eq!(timeline.len(), 3);

        let due = timeline.drain_due(150);
        assert_eq!(due, vec![Scheduled::ShieldExpire, Scheduled::BossActivate]);

        let due = timeline.drain_due(1_000);
        assert_eq!(due, vec![Scheduled::SweepFinish]);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_same_timestamp_keeps_insertion_order() {
        let mut timeline = Timeline::default();
        for i in 0..5 {
            timeline.schedule(
                40,
                Scheduled::SweepExplosion {
                    pos: Vec2::new(i as f32, 0.0),
                },
            );
        }
        let due = timeline.drain_due(40);
        for (i, action) in due.iter().enumerate() {
            match action {
                Scheduled::SweepExplosion { pos } => assert_eq!(pos.x, i as f32),
                other => panic!("unexpected action {other:?}"),
            }
        }
    }
}
