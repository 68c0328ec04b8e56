//! Wave director
//!
//! Time-driven state machine over a fixed sequence of waves. It never touches
//! pools itself: each tick returns spawn intents and the caller decides what to
//! instantiate.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::{DirectorTuning, EnemySpec, WaveSpec};

/// Director lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorPhase {
    Idle,
    WaveActive(usize),
    /// Terminal
    AllDone,
}

/// Per-wave counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveDirectorState {
    pub current_wave_index: usize,
    pub elapsed_in_wave: u32,
    pub spawn_accumulator: u32,
    pub unicorns_spawned: usize,
    pub enemies_spawned: bool,
    pub active: bool,
}

/// Something the director wants to appear this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnIntent {
    Item { good: bool, fall_speed: f32 },
    Unicorn { fall_speed: f32 },
    Enemies(EnemySpec),
}

/// Output of one director tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectorTick {
    pub intents: Vec<SpawnIntent>,
    /// Index of a wave that began on this tick
    pub wave_started: Option<usize>,
    /// Raised exactly once, on the tick the final wave runs out
    pub all_done: bool,
}

#[derive(Debug, Clone)]
pub struct WaveDirector {
    waves: Vec<WaveSpec>,
    tuning: DirectorTuning,
    phase: DirectorPhase,
    state: WaveDirectorState,
}

impl WaveDirector {
    pub fn new(waves: Vec<WaveSpec>, tuning: DirectorTuning) -> Self {
        Self {
            waves,
            tuning,
            phase: DirectorPhase::Idle,
            state: WaveDirectorState::default(),
        }
    }

    pub fn phase(&self) -> DirectorPhase {
        self.phase
    }

    pub fn state(&self) -> &WaveDirectorState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    pub fn current_wave(&self) -> Option<&WaveSpec> {
        if self.state.active {
            self.waves.get(self.state.current_wave_index)
        } else {
            None
        }
    }

    /// Begin wave `index` with fresh counters. Out-of-range indices finish the director.
    pub fn start_wave(&mut self, index: usize) {
        if self.phase == DirectorPhase::AllDone {
            return;
        }
        if index >= self.waves.len() {
            self.finish();
            return;
        }
        self.state = WaveDirectorState {
            current_wave_index: index,
            active: true,
            ..Default::default()
        };
        self.phase = DirectorPhase::WaveActive(index);
        log::info!(
            "Wave {} started ({} ms)",
            index + 1,
            self.waves[index].duration_ms
        );
    }

    /// Stop without signalling completion (skip-to-encounter)
    pub fn halt(&mut self) {
        if self.phase != DirectorPhase::AllDone {
            log::info!("Wave director halted at wave {}", self.state.current_wave_index + 1);
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.state.active = false;
        self.phase = DirectorPhase::AllDone;
    }

    fn is_last_wave(&self) -> bool {
        self.state.current_wave_index + 1 == self.waves.len()
    }

    fn remaining_in_wave(&self) -> u32 {
        self.current_wave()
            .map(|w| w.duration_ms.saturating_sub(self.state.elapsed_in_wave))
            .unwrap_or(0)
    }

    /// Final wave with (0, frenzy_window] ms left
    pub fn in_frenzy(&self) -> bool {
        if !self.state.active || !self.is_last_wave() {
            return false;
        }
        let remaining = self.remaining_in_wave();
        remaining > 0 && remaining <= self.tuning.frenzy_window_ms
    }

    pub fn effective_spawn_interval(&self) -> u32 {
        let Some(wave) = self.current_wave() else {
            return 0;
        };
        if self.in_frenzy() {
            wave.spawn_interval_ms / 2
        } else {
            wave.spawn_interval_ms
        }
    }

    pub fn effective_item_cap(&self) -> usize {
        let Some(wave) = self.current_wave() else {
            return 0;
        };
        if self.in_frenzy() {
            wave.max_concurrent_items + self.tuning.frenzy_extra_items
        } else {
            wave.max_concurrent_items
        }
    }

    /// Time left in the current wave plus every wave after it
    pub fn remaining_total_ms(&self) -> u64 {
        if !self.state.active {
            return 0;
        }
        let later: u64 = self.waves[self.state.current_wave_index + 1..]
            .iter()
            .map(|w| w.duration_ms as u64)
            .sum();
        self.remaining_in_wave() as u64 + later
    }

    /// Advance by `delta_ms`. `active_items` is the number of items currently falling.
    pub fn tick<R: Rng>(&mut self, delta_ms: u32, active_items: usize, rng: &mut R) -> DirectorTick {
        let mut out = DirectorTick::default();
        if !self.state.active {
            return out;
        }

        let index = self.state.current_wave_index;
        let wave = &self.waves[index];
        let duration_ms = wave.duration_ms;
        let fall_speed = wave.item_fall_speed;
        let enemies = wave.enemies;

        self.state.elapsed_in_wave = self.state.elapsed_in_wave.saturating_add(delta_ms);
        self.state.spawn_accumulator = self.state.spawn_accumulator.saturating_add(delta_ms);

        if !self.state.enemies_spawned {
            if let Some(spec) = enemies {
                self.state.enemies_spawned = true;
                out.intents.push(SpawnIntent::Enemies(spec));
            }
        }

        let offsets = &self.waves[index].unicorn_offsets_ms;
        while let Some(&offset) = offsets.get(self.state.unicorns_spawned) {
            if self.state.elapsed_in_wave < offset {
                break;
            }
            self.state.unicorns_spawned += 1;
            out.intents.push(SpawnIntent::Unicorn {
                fall_speed: fall_speed * self.tuning.unicorn_speed_factor,
            });
        }

        let interval = self.effective_spawn_interval();
        if self.state.spawn_accumulator >= interval {
            self.state.spawn_accumulator = 0;
            if active_items < self.effective_item_cap() {
                out.intents.push(SpawnIntent::Item {
                    good: rng.random_bool(self.tuning.good_ratio),
                    fall_speed,
                });
            } else {
                log::debug!("Item spawn dropped: {active_items} items already falling");
            }
        }

        if self.state.elapsed_in_wave >= duration_ms {
            if index + 1 < self.waves.len() {
                self.start_wave(index + 1);
                out.wave_started = Some(index + 1);
            } else {
                self.finish();
                out.all_done = true;
                log::info!("All {} waves complete", self.waves.len());
            }
        }

        out
    }
}
