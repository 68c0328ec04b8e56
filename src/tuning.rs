//! Data-driven game balance
//!
//! Every numeric tunable lives here. The shipped values come from playtesting;
//! a JSON file can override any subset of them (missing fields keep defaults).

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating a tuning file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// One row of the combo multiplier table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboTier {
    pub threshold: u32,
    pub multiplier: f32,
}

impl ComboTier {
    pub const fn new(threshold: u32, multiplier: f32) -> Self {
        Self {
            threshold,
            multiplier,
        }
    }
}

/// Play area and player geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
    /// Top edge of the player body
    pub player_y: f32,
    pub player_half_width: f32,
    pub player_height: f32,
    /// Height of the catch strip sitting on top of the body
    pub catch_zone_height: f32,
    /// Pixels per second at full axis deflection
    pub player_speed: f32,
    pub player_max_health: u8,
    pub bullet_speed: f32,
    pub fire_cooldown_ms: u32,
    pub item_radius: f32,
    pub bullet_radius: f32,
    pub projectile_radius: f32,
    pub enemy_half_size: f32,
    pub boss_radius: f32,
    /// Extra room beyond the edges before an entity counts as out of bounds
    pub bounds_margin: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            player_y: 540.0,
            player_half_width: 40.0,
            player_height: 30.0,
            catch_zone_height: 14.0,
            player_speed: 420.0,
            player_max_health: 5,
            bullet_speed: 600.0,
            fire_cooldown_ms: 250,
            item_radius: 18.0,
            bullet_radius: 4.0,
            projectile_radius: 6.0,
            enemy_half_size: 18.0,
            boss_radius: 60.0,
            bounds_margin: 40.0,
        }
    }
}

/// Point values and combo table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Descending by threshold, terminated by a threshold-0 tier
    pub combo_table: Vec<ComboTier>,
    pub catch_good: i64,
    pub shoot_bad: i64,
    pub miss_good: i64,
    pub bad_reaches_bottom: i64,
    pub bad_hits_player: i64,
    pub caught_disguised: i64,
    pub enemy_kill: i64,
    pub boss_hit: i64,
    pub boss_bonus_max: i64,
    pub boss_bonus_min: i64,
    pub boss_time_limit_ms: u32,
}

impl ScoringTuning {
    /// Unicorns are worth twice a regular catch
    pub fn catch_unicorn(&self) -> i64 {
        self.catch_good * 2
    }
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            combo_table: vec![
                ComboTier::new(20, 3.0),
                ComboTier::new(10, 2.0),
                ComboTier::new(5, 1.5),
                ComboTier::new(0, 1.0),
            ],
            catch_good: 100,
            shoot_bad: 75,
            miss_good: -50,
            bad_reaches_bottom: -25,
            bad_hits_player: -100,
            caught_disguised: -150,
            enemy_kill: 150,
            boss_hit: 20,
            boss_bonus_max: 2500,
            boss_bonus_min: 1000,
            boss_time_limit_ms: 25_000,
        }
    }
}

/// Enemy squad declared by a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub count: u32,
    pub fire_rate_ms: u32,
}

/// Immutable configuration for one wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    pub duration_ms: u32,
    pub spawn_interval_ms: u32,
    /// Pixels per second
    pub item_fall_speed: f32,
    pub max_concurrent_items: usize,
    #[serde(default)]
    pub enemies: Option<EnemySpec>,
    /// Offsets from wave start, ascending
    #[serde(default)]
    pub unicorn_offsets_ms: Vec<u32>,
}

impl WaveSpec {
    /// Plain wave with no enemies and no unicorns
    pub fn new(
        duration_ms: u32,
        spawn_interval_ms: u32,
        item_fall_speed: f32,
        max_concurrent_items: usize,
    ) -> Self {
        Self {
            duration_ms,
            spawn_interval_ms,
            item_fall_speed,
            max_concurrent_items,
            enemies: None,
            unicorn_offsets_ms: Vec::new(),
        }
    }

    pub fn with_enemies(mut self, count: u32, fire_rate_ms: u32) -> Self {
        self.enemies = Some(EnemySpec {
            count,
            fire_rate_ms,
        });
        self
    }

    pub fn with_unicorns(mut self, offsets_ms: &[u32]) -> Self {
        self.unicorn_offsets_ms = offsets_ms.to_vec();
        self
    }
}

/// Default wave sequence (two minutes of play before the boss)
pub fn default_waves() -> Vec<WaveSpec> {
    vec![
        WaveSpec::new(30_000, 1100, 120.0, 6).with_unicorns(&[15_000]),
        WaveSpec::new(30_000, 950, 150.0, 8)
            .with_enemies(6, 2200)
            .with_unicorns(&[10_000, 22_000]),
        WaveSpec::new(30_000, 850, 175.0, 9).with_unicorns(&[8_000, 20_000]),
        WaveSpec::new(30_000, 750, 200.0, 10)
            .with_enemies(8, 1800)
            .with_unicorns(&[12_000, 24_000]),
    ]
}

/// Wave director knobs shared by every wave
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorTuning {
    /// Probability that a spawned item is good
    pub good_ratio: f64,
    /// Final-wave window (remaining time) with doubled spawn rate
    pub frenzy_window_ms: u32,
    /// Items allowed over the wave cap during frenzy
    pub frenzy_extra_items: usize,
    /// Unicorns fall this much faster than regular items
    pub unicorn_speed_factor: f32,
}

impl Default for DirectorTuning {
    fn default() -> Self {
        Self {
            good_ratio: 0.3,
            frenzy_window_ms: 7000,
            frenzy_extra_items: 3,
            unicorn_speed_factor: 1.4,
        }
    }
}

/// Boss encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub max_health: i32,
    /// Health ratio at or below which phase 2 starts
    pub phase2_threshold: f32,
    pub spawn_pos: Vec2,
    pub entry_pos: Vec2,
    pub entry_duration_ms: u32,
    pub retarget_interval_ms: u32,
    /// Phase 1 lateral drift, pixels per second
    pub drift_speed: f32,
    /// Horizontal keep-out from the arena sides
    pub side_margin: f32,
    pub spam_interval_ms: u32,
    /// Phase 2 spam cadence is this much slower
    pub phase2_spam_factor: f32,
    pub disguise_chance: f64,
    pub fire_interval_ms: u32,
    pub projectile_speed: f32,
    pub item_fall_speed: f32,
    /// Phase 2 oscillation amplitudes (x, y) in pixels
    pub osc_amplitude: Vec2,
    /// Phase 2 oscillation angular speeds (x, y) in radians per millisecond
    pub osc_frequency: Vec2,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            max_health: 14,
            phase2_threshold: 0.5,
            spawn_pos: Vec2::new(400.0, -120.0),
            entry_pos: Vec2::new(400.0, 120.0),
            entry_duration_ms: 2000,
            retarget_interval_ms: 3000,
            drift_speed: 140.0,
            side_margin: 100.0,
            spam_interval_ms: 900,
            phase2_spam_factor: 1.5,
            disguise_chance: 0.4,
            fire_interval_ms: 1600,
            projectile_speed: 260.0,
            item_fall_speed: 190.0,
            osc_amplitude: Vec2::new(260.0, 50.0),
            osc_frequency: Vec2::new(0.0011, 0.0023),
        }
    }
}

/// Enemy squad behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Lateral march speed, pixels per second
    pub march_speed: f32,
    pub step_down: f32,
    pub spacing: f32,
    pub formation_y: f32,
    pub side_margin: f32,
    pub projectile_speed: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            march_speed: 70.0,
            step_down: 24.0,
            spacing: 70.0,
            formation_y: 80.0,
            side_margin: 30.0,
            projectile_speed: 220.0,
        }
    }
}

/// Fixed pool capacities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTuning {
    pub bullets: usize,
    pub items: usize,
    pub projectiles: usize,
    pub enemies: usize,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            bullets: 30,
            items: 40,
            projectiles: 30,
            enemies: 16,
        }
    }
}

/// Session sequencing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub tutorial_duration_ms: u32,
    pub tutorial_spawn_interval_ms: u32,
    pub tutorial_fall_speed: f32,
    pub tutorial_max_items: usize,
    /// Offsets into the tutorial at which hints are announced
    pub tutorial_hint_offsets_ms: Vec<u32>,
    /// Gap between the last wave and the boss arriving
    pub boss_intro_ms: u32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            tutorial_duration_ms: 15_000,
            tutorial_spawn_interval_ms: 1500,
            tutorial_fall_speed: 100.0,
            tutorial_max_items: 4,
            tutorial_hint_offsets_ms: vec![0, 5000, 10_000],
            boss_intro_ms: 3000,
        }
    }
}

/// Final-score grade thresholds (minimum score per grade)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeThresholds {
    pub s: u64,
    pub a: u64,
    pub b: u64,
    pub c: u64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            s: 15_000,
            a: 10_000,
            b: 6000,
            c: 3000,
        }
    }
}

/// Complete tunable surface, loaded once per session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub scoring: ScoringTuning,
    pub director: DirectorTuning,
    pub waves: Vec<WaveSpec>,
    pub boss: BossTuning,
    pub enemies: EnemyTuning,
    pub pools: PoolTuning,
    pub session: SessionTuning,
    pub grades: GradeThresholds,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena: ArenaTuning::default(),
            scoring: ScoringTuning::default(),
            director: DirectorTuning::default(),
            waves: default_waves(),
            boss: BossTuning::default(),
            enemies: EnemyTuning::default(),
            pools: PoolTuning::default(),
            session: SessionTuning::default(),
            grades: GradeThresholds::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Total length of the wave sequence
    pub fn total_wave_ms(&self) -> u64 {
        self.waves.iter().map(|w| w.duration_ms as u64).sum()
    }

    /// Reject configurations the simulation cannot run on
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| Err(TuningError::Invalid(msg));

        if self.waves.is_empty() {
            return invalid("at least one wave is required".into());
        }
        for (i, wave) in self.waves.iter().enumerate() {
            if wave.duration_ms == 0 || wave.spawn_interval_ms == 0 {
                return invalid(format!("wave {i} has a zero duration or spawn interval"));
            }
            if !wave.unicorn_offsets_ms.is_sorted() {
                return invalid(format!("wave {i} unicorn offsets are not ascending"));
            }
        }

        let table = &self.scoring.combo_table;
        if !table.windows(2).all(|w| w[0].threshold > w[1].threshold) {
            return invalid("combo table must be strictly descending by threshold".into());
        }
        match table.last() {
            Some(tier) if tier.threshold == 0 => {}
            _ => return invalid("combo table needs a threshold-0 catch-all".into()),
        }
        if self.scoring.boss_bonus_min > self.scoring.boss_bonus_max {
            return invalid("boss bonus minimum exceeds maximum".into());
        }

        if !(self.boss.phase2_threshold > 0.0 && self.boss.phase2_threshold < 1.0) {
            return invalid("boss phase2_threshold must be inside (0, 1)".into());
        }
        if self.boss.max_health <= 0 {
            return invalid("boss max_health must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.director.good_ratio)
            || !(0.0..=1.0).contains(&self.boss.disguise_chance)
        {
            return invalid("probabilities must lie in [0, 1]".into());
        }

        let pools = &self.pools;
        if pools.bullets == 0 || pools.items == 0 || pools.projectiles == 0 || pools.enemies == 0
        {
            return invalid("pool sizes must be non-zero".into());
        }

        Ok(())
    }
}
