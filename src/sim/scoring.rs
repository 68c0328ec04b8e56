//! Score and combo bookkeeping
//!
//! Pure event -> points mapping. Rewards grow the combo and are scaled by the
//! combo multiplier table; penalties reset the combo and are applied flat.

use serde::{Deserialize, Serialize};

use crate::tuning::ScoringTuning;

/// Running totals for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub good_caught: u32,
    pub bad_shot: u32,
    pub unicorns_caught: u32,
    pub enemies_defeated: u32,
}

/// Everything that can move the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEvent {
    CatchGood,
    ShootBad,
    CatchUnicorn,
    MissGood,
    BadReachesBottom,
    BadHitsPlayer,
    CaughtDisguised,
    EnemyKill,
    BossHit,
}

impl ScoreEvent {
    /// Penalty events reset the combo
    pub fn is_penalty(self) -> bool {
        matches!(
            self,
            ScoreEvent::MissGood
                | ScoreEvent::BadReachesBottom
                | ScoreEvent::BadHitsPlayer
                | ScoreEvent::CaughtDisguised
        )
    }
}

/// Result of applying one event, for floating-score display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub points: i64,
    pub combo: u32,
}

/// Scoring engine: owns the score state and the point table
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    table: ScoringTuning,
    state: ScoreState,
}

impl ScoringEngine {
    pub fn new(table: ScoringTuning) -> Self {
        Self {
            table,
            state: ScoreState::default(),
        }
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    /// Practice reset: drop everything earned so far
    pub fn reset(&mut self) {
        self.state = ScoreState::default();
    }

    /// First tier whose threshold the combo reaches
    pub fn multiplier_for(&self, combo: u32) -> f32 {
        self.table
            .combo_table
            .iter()
            .find(|tier| combo >= tier.threshold)
            .map(|tier| tier.multiplier)
            .unwrap_or(1.0)
    }

    /// Apply a base delta; positive deltas are combo-scaled, negative ones are not.
    /// Returns the points actually added (before clamping the total at zero).
    pub fn add_score(&mut self, base_delta: i64) -> i64 {
        let points = if base_delta > 0 {
            (base_delta as f64 * self.multiplier_for(self.state.combo) as f64).round() as i64
        } else {
            base_delta
        };
        self.state.score = (self.state.score as i64).saturating_add(points).max(0) as u64;
        points
    }

    fn bump_combo(&mut self) {
        self.state.combo += 1;
        self.state.max_combo = self.state.max_combo.max(self.state.combo);
    }

    fn break_combo(&mut self, penalty: i64) -> i64 {
        self.state.combo = 0;
        self.add_score(penalty)
    }

    pub fn on_catch_good(&mut self) -> i64 {
        self.bump_combo();
        self.state.good_caught += 1;
        self.add_score(self.table.catch_good)
    }

    pub fn on_shoot_bad(&mut self) -> i64 {
        self.bump_combo();
        self.state.bad_shot += 1;
        self.add_score(self.table.shoot_bad)
    }

    pub fn on_catch_unicorn(&mut self) -> i64 {
        self.bump_combo();
        self.state.unicorns_caught += 1;
        self.add_score(self.table.catch_unicorn())
    }

    pub fn on_miss_good(&mut self) -> i64 {
        self.break_combo(self.table.miss_good)
    }

    pub fn on_bad_reaches_bottom(&mut self) -> i64 {
        self.break_combo(self.table.bad_reaches_bottom)
    }

    pub fn on_bad_hits_player(&mut self) -> i64 {
        self.break_combo(self.table.bad_hits_player)
    }

    pub fn on_caught_disguised(&mut self) -> i64 {
        self.break_combo(self.table.caught_disguised)
    }

    /// Combo-neutral, but still scaled by the current multiplier
    pub fn on_enemy_kill(&mut self) -> i64 {
        self.state.enemies_defeated += 1;
        self.add_score(self.table.enemy_kill)
    }

    pub fn on_boss_hit(&mut self) -> i64 {
        self.add_score(self.table.boss_hit)
    }

    /// Time bonus for finishing the boss: linear from max (instant) to min (at the limit)
    pub fn on_boss_kill(&mut self, elapsed_ms: u32, time_limit_ms: u32) -> i64 {
        let fraction = if time_limit_ms == 0 {
            1.0
        } else {
            (elapsed_ms as f64 / time_limit_ms as f64).clamp(0.0, 1.0)
        };
        let max = self.table.boss_bonus_max as f64;
        let min = self.table.boss_bonus_min as f64;
        let bonus = (max + (min - max) * fraction).round() as i64;
        self.state.score = (self.state.score as i64).saturating_add(bonus).max(0) as u64;
        bonus
    }

    /// Dispatch a scoring event
    pub fn apply(&mut self, event: ScoreEvent) -> ScoreOutcome {
        let points = match event {
            ScoreEvent::CatchGood => self.on_catch_good(),
            ScoreEvent::ShootBad => self.on_shoot_bad(),
            ScoreEvent::CatchUnicorn => self.on_catch_unicorn(),
            ScoreEvent::MissGood => self.on_miss_good(),
            ScoreEvent::BadReachesBottom => self.on_bad_reaches_bottom(),
            ScoreEvent::BadHitsPlayer => self.on_bad_hits_player(),
            ScoreEvent::CaughtDisguised => self.on_caught_disguised(),
            ScoreEvent::EnemyKill => self.on_enemy_kill(),
            ScoreEvent::BossHit => self.on_boss_hit(),
        };
        ScoreOutcome {
            points,
            combo: self.state.combo,
        }
    }
}
