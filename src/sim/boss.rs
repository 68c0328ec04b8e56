//! Boss encounter state machine
//!
//! Entering -> Phase1 -> Phase2 -> Defeated, with Interrupted reachable from any
//! live phase when the session ends around the boss. All cadences are
//! accumulator driven so a delta sequence replays exactly.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::ItemKind;
use crate::tuning::BossTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Flying in; no combat
    Entering,
    /// Target-seeking drift plus item spam
    Phase1,
    /// Oscillating, disguised spam, aimed fire
    Phase2,
    Defeated,
    /// Session ended (timeout or player down) before the boss fell
    Interrupted,
}

impl BossPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BossPhase::Defeated | BossPhase::Interrupted)
    }
}

/// Spawn requests raised by the boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossIntent {
    SpawnItem {
        pos: Vec2,
        kind: ItemKind,
        fall_speed: f32,
    },
    Fire {
        pos: Vec2,
        vel: Vec2,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BossTick {
    pub intents: Vec<BossIntent>,
    pub phase_changed: Option<BossPhase>,
}

#[derive(Debug, Clone)]
pub struct Boss {
    tuning: BossTuning,
    arena_width: f32,
    good_ratio: f64,
    pos: Vec2,
    health: i32,
    phase: BossPhase,
    entry_elapsed_ms: u32,
    target_x: f32,
    retarget_accumulator: u32,
    spam_accumulator: u32,
    bullet_accumulator: u32,
    osc_elapsed_ms: u32,
    osc_phase_offset: f32,
}

impl Boss {
    /// New boss at its off-screen spawn point, entering
    pub fn new(tuning: BossTuning, arena_width: f32, good_ratio: f64) -> Self {
        let pos = tuning.spawn_pos;
        Self {
            health: tuning.max_health,
            target_x: pos.x,
            tuning,
            arena_width,
            good_ratio,
            pos,
            phase: BossPhase::Entering,
            entry_elapsed_ms: 0,
            retarget_accumulator: 0,
            spam_accumulator: 0,
            bullet_accumulator: 0,
            osc_elapsed_ms: 0,
            osc_phase_offset: 0.0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.tuning.max_health
    }

    pub fn is_alive(&self) -> bool {
        !self.phase.is_terminal()
    }

    pub fn entry_complete(&self) -> bool {
        self.phase != BossPhase::Entering
    }

    /// Can be hit by player bullets
    pub fn is_vulnerable(&self) -> bool {
        matches!(self.phase, BossPhase::Phase1 | BossPhase::Phase2)
    }

    /// Health fraction for the health bar, clamped to [0, 1]
    pub fn health_ratio(&self) -> f32 {
        (self.health as f32 / self.tuning.max_health as f32).clamp(0.0, 1.0)
    }

    /// Remove one health point. Returns true only for the lethal hit.
    pub fn take_damage(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= 1;
        if self.health <= 0 {
            self.health = 0;
            self.phase = BossPhase::Defeated;
            log::info!("Boss defeated");
            return true;
        }
        false
    }

    /// Debug shortcut straight into phase 2 (from Entering or Phase1)
    pub fn force_phase2(&mut self) -> bool {
        if !matches!(self.phase, BossPhase::Entering | BossPhase::Phase1) {
            return false;
        }
        if self.phase == BossPhase::Entering {
            self.pos = self.tuning.entry_pos;
        }
        let threshold_health = (self.tuning.max_health as f32 * self.tuning.phase2_threshold).floor() as i32;
        self.health = self.health.min(threshold_health.max(1));
        self.enter_phase2();
        true
    }

    /// Session ended around the boss
    pub fn interrupt(&mut self) {
        if self.is_alive() {
            self.phase = BossPhase::Interrupted;
        }
    }

    fn enter_phase2(&mut self) {
        self.phase = BossPhase::Phase2;
        self.spam_accumulator = 0;
        self.bullet_accumulator = 0;
        self.osc_elapsed_ms = 0;
        // Start the x oscillation where the boss already is
        let center_x = self.arena_width / 2.0;
        let amplitude = self.tuning.osc_amplitude.x.max(f32::EPSILON);
        self.osc_phase_offset = ((self.pos.x - center_x) / amplitude).clamp(-1.0, 1.0).asin();
        log::info!("Boss entered phase 2 at {} hp", self.health);
    }

    pub fn tick<R: Rng>(&mut self, delta_ms: u32, player_pos: Vec2, rng: &mut R) -> BossTick {
        let mut out = BossTick::default();
        let dt = delta_ms as f32 / 1000.0;

        match self.phase {
            BossPhase::Entering => {
                self.entry_elapsed_ms = self.entry_elapsed_ms.saturating_add(delta_ms);
                let t = if self.tuning.entry_duration_ms == 0 {
                    1.0
                } else {
                    (self.entry_elapsed_ms as f32 / self.tuning.entry_duration_ms as f32).min(1.0)
                };
                self.pos = self.tuning.spawn_pos.lerp(self.tuning.entry_pos, t);
                if t >= 1.0 {
                    self.phase = BossPhase::Phase1;
                    self.target_x = self.pos.x;
                    out.phase_changed = Some(BossPhase::Phase1);
                }
                return out;
            }
            BossPhase::Defeated | BossPhase::Interrupted => return out,
            BossPhase::Phase1 | BossPhase::Phase2 => {}
        }

        if self.phase == BossPhase::Phase1 && self.health_ratio() <= self.tuning.phase2_threshold {
            self.enter_phase2();
            out.phase_changed = Some(BossPhase::Phase2);
        }

        match self.phase {
            BossPhase::Phase1 => self.run_phase1(delta_ms, dt, rng, &mut out),
            BossPhase::Phase2 => self.run_phase2(delta_ms, player_pos, rng, &mut out),
            _ => {}
        }
        out
    }

    fn run_phase1<R: Rng>(&mut self, delta_ms: u32, dt: f32, rng: &mut R, out: &mut BossTick) {
        self.retarget_accumulator += delta_ms;
        if self.retarget_accumulator >= self.tuning.retarget_interval_ms {
            self.retarget_accumulator = 0;
            let lo = self.tuning.side_margin;
            let hi = (self.arena_width - self.tuning.side_margin).max(lo);
            self.target_x = rng.random_range(lo..=hi);
        }

        let max_step = self.tuning.drift_speed * dt;
        self.pos.x += (self.target_x - self.pos.x).clamp(-max_step, max_step);

        self.spam_accumulator += delta_ms;
        if self.spam_accumulator >= self.tuning.spam_interval_ms {
            self.spam_accumulator = 0;
            let kind = if rng.random_bool(self.good_ratio) {
                ItemKind::Good
            } else {
                ItemKind::Bad
            };
            out.intents.push(self.spawn_item(kind));
        }
    }

    fn run_phase2<R: Rng>(&mut self, delta_ms: u32, player_pos: Vec2, rng: &mut R, out: &mut BossTick) {
        self.osc_elapsed_ms += delta_ms;
        let t = self.osc_elapsed_ms as f32;
        let amp = self.tuning.osc_amplitude;
        let freq = self.tuning.osc_frequency;
        self.pos = Vec2::new(
            self.arena_width / 2.0 + amp.x * (freq.x * t + self.osc_phase_offset).sin(),
            self.tuning.entry_pos.y + amp.y * (freq.y * t).sin(),
        );

        self.spam_accumulator += delta_ms;
        let spam_interval = (self.tuning.spam_interval_ms as f32 * self.tuning.phase2_spam_factor).round() as u32;
        if self.spam_accumulator >= spam_interval {
            self.spam_accumulator = 0;
            let kind = if rng.random_bool(self.tuning.disguise_chance) {
                ItemKind::Disguised
            } else if rng.random_bool(self.good_ratio) {
                ItemKind::Good
            } else {
                ItemKind::Bad
            };
            out.intents.push(self.spawn_item(kind));
        }

        self.bullet_accumulator += delta_ms;
        if self.bullet_accumulator >= self.tuning.fire_interval_ms {
            self.bullet_accumulator = 0;
            let aim = (player_pos - self.pos).normalize_or(Vec2::Y);
            out.intents.push(BossIntent::Fire {
                pos: self.pos,
                vel: aim * self.tuning.projectile_speed,
            });
        }
    }

    fn spawn_item(&self, kind: ItemKind) -> BossIntent {
        BossIntent::SpawnItem {
            pos: self.pos,
            kind,
            fall_speed: self.tuning.item_fall_speed,
        }
    }
}
