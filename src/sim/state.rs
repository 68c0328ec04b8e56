//! Session state and the events it reports to the presentation layer
//!
//! The session owns every simulation component. Nothing here is global: a host
//! creates a [`Session`], feeds it ticks and drains [`GameEvent`]s.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::{Boss, BossPhase};
use super::collision::Rect;
use super::enemies::EnemySquad;
use super::pool::{Bounds, Bullet, Enemy, Item, ItemKind, Pool, Projectile, ProjectileSource};
use super::schedule::{Announcement, CancelHandle, ScheduledAction, Scheduler};
use super::scoring::ScoringEngine;
use super::waves::WaveDirector;
use crate::tuning::Tuning;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Practice round; its score is discarded
    Tutorial,
    Waves,
    /// Gap between the last wave and the boss arriving
    BossIntro,
    Boss,
    /// Terminal
    GameOver,
}

/// How the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    BossDefeated,
    TimeUp,
    PlayerDown,
}

/// Entity categories the presentation layer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Item(ItemKind),
    Bullet,
    Projectile(ProjectileSource),
    Enemy,
    Boss,
}

/// Fire-and-forget effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Catch,
    UnicornCatch,
    CaughtDisguised,
    ItemShot,
    Miss,
    PlayerHit,
    EnemyDestroyed,
    BossHit,
    BossDefeated,
    Shoot,
}

/// HUD values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DisplayUpdate {
    Score(u64),
    Combo(u32),
    /// Milliseconds left in the current timed segment
    Countdown(u64),
    /// Boss health ratio in [0, 1]
    BossHealth(f32),
    PlayerHealth(u8),
}

/// Everything the simulation tells the outside world, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned {
        kind: EntityKind,
        slot: usize,
        pos: Vec2,
        vel: Vec2,
    },
    Effect(Effect),
    Display(DisplayUpdate),
    /// Floating score text
    ScorePopup { points: i64, pos: Vec2 },
    Announce(Announcement),
    PhaseChanged(GamePhase),
    WaveStarted(usize),
    BossPhaseChanged(BossPhase),
    BossDefeated { bonus: i64 },
    GameOver { outcome: GameOutcome, score: u64 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Horizontal center
    pub x: f32,
    pub health: u8,
    pub fire_cooldown_ms: u32,
}

/// One complete play session (tutorial through game over)
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Arc<Tuning>,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Bumped on every phase change; scheduled actions from older generations are ignored
    pub generation: u32,
    /// Total simulated time, reported in the run summary
    pub elapsed_ms: u64,
    /// Time spent in the current timed phase (tutorial or boss fight)
    pub phase_elapsed_ms: u32,
    pub player: Player,
    pub scoring: ScoringEngine,
    pub director: WaveDirector,
    pub boss: Option<Boss>,
    pub squad: EnemySquad,
    pub items: Pool<Item>,
    pub bullets: Pool<Bullet>,
    pub projectiles: Pool<Projectile>,
    pub enemies: Pool<Enemy>,
    pub scheduler: Scheduler,
    pub outcome: Option<GameOutcome>,
    pub(crate) tutorial_spawn_accumulator: u32,
    pub(crate) boss_defeat_signaled: bool,
    pub(crate) frenzy_announced: bool,
    pub(crate) last_countdown_secs: Option<u64>,
    /// Pending `BeginBossFight` during the boss intro
    pub(crate) boss_fight_handle: Option<CancelHandle>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Start a new session in the tutorial
    pub fn new(tuning: Arc<Tuning>, seed: u64) -> Self {
        let arena = &tuning.arena;
        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Tutorial,
            generation: 0,
            elapsed_ms: 0,
            phase_elapsed_ms: 0,
            player: Player {
                x: arena.width / 2.0,
                health: arena.player_max_health,
                fire_cooldown_ms: 0,
            },
            scoring: ScoringEngine::new(tuning.scoring.clone()),
            director: WaveDirector::new(tuning.waves.clone(), tuning.director.clone()),
            boss: None,
            squad: EnemySquad::new(tuning.enemies.clone(), arena.enemy_half_size),
            items: Pool::new(tuning.pools.items),
            bullets: Pool::new(tuning.pools.bullets),
            projectiles: Pool::new(tuning.pools.projectiles),
            enemies: Pool::new(tuning.pools.enemies),
            scheduler: Scheduler::new(),
            outcome: None,
            tutorial_spawn_accumulator: 0,
            boss_defeat_signaled: false,
            frenzy_announced: false,
            last_countdown_secs: None,
            boss_fight_handle: None,
            events: Vec::new(),
            tuning,
        };

        let hints = session.tuning.session.tutorial_hint_offsets_ms.clone();
        for (i, offset) in hints.into_iter().enumerate() {
            session.scheduler.schedule(
                offset,
                session.generation,
                ScheduledAction::Announce(Announcement::TutorialHint(i as u8)),
            );
        }
        session.push_event(GameEvent::PhaseChanged(GamePhase::Tutorial));
        session.push_display();
        log::info!("Session started (seed {seed})");
        session
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score(&self) -> u64 {
        self.scoring.score()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Score, combo and player health in one go
    pub(crate) fn push_display(&mut self) {
        let score = self.scoring.score();
        let combo = self.scoring.combo();
        let health = self.player.health;
        self.push_event(GameEvent::Display(DisplayUpdate::Score(score)));
        self.push_event(GameEvent::Display(DisplayUpdate::Combo(combo)));
        self.push_event(GameEvent::Display(DisplayUpdate::PlayerHealth(health)));
    }

    /// Out-of-bounds region for pooled entities
    pub fn bounds(&self) -> Bounds {
        let arena = &self.tuning.arena;
        Bounds::arena(arena.width, arena.height, arena.bounds_margin)
    }

    pub fn player_body(&self) -> Rect {
        let arena = &self.tuning.arena;
        Rect::new(
            Vec2::new(self.player.x - arena.player_half_width, arena.player_y),
            Vec2::new(
                self.player.x + arena.player_half_width,
                arena.player_y + arena.player_height,
            ),
        )
    }

    /// Thin strip on top of the body where good items are caught
    pub fn catch_zone(&self) -> Rect {
        let arena = &self.tuning.arena;
        Rect::new(
            Vec2::new(
                self.player.x - arena.player_half_width,
                arena.player_y - arena.catch_zone_height,
            ),
            Vec2::new(self.player.x + arena.player_half_width, arena.player_y),
        )
    }

    pub fn player_center(&self) -> Vec2 {
        let arena = &self.tuning.arena;
        Vec2::new(self.player.x, arena.player_y + arena.player_height / 2.0)
    }

    /// Milliseconds left in whatever segment is currently timed
    pub fn countdown_ms(&self) -> u64 {
        let limit = |total: u32| total.saturating_sub(self.phase_elapsed_ms) as u64;
        match self.phase {
            GamePhase::Tutorial => limit(self.tuning.session.tutorial_duration_ms),
            GamePhase::Waves => self.director.remaining_total_ms(),
            GamePhase::BossIntro => self.tuning.scoring.boss_time_limit_ms as u64,
            GamePhase::Boss => limit(self.tuning.scoring.boss_time_limit_ms),
            GamePhase::GameOver => 0,
        }
    }

    /// Drop an item from the top edge at a random column
    pub(crate) fn spawn_item_from_top(&mut self, kind: ItemKind, fall_speed: f32) -> Option<usize> {
        let radius = self.tuning.arena.item_radius;
        let width = self.tuning.arena.width;
        let x = self.rng.random_range(radius..=(width - radius).max(radius));
        self.spawn_item(kind, Vec2::new(x, -radius), fall_speed)
    }

    pub(crate) fn spawn_item(&mut self, kind: ItemKind, pos: Vec2, fall_speed: f32) -> Option<usize> {
        let vel = Vec2::new(0.0, fall_speed);
        let slot = self.items.spawn(|item| {
            item.active = true;
            item.pos = pos;
            item.vel = vel;
            item.kind = kind;
        });
        match slot {
            Some(slot) => self.push_event(GameEvent::Spawned {
                kind: EntityKind::Item(kind),
                slot,
                pos,
                vel,
            }),
            None => log::debug!("Item pool exhausted, {kind:?} dropped"),
        }
        slot
    }

    pub(crate) fn spawn_bullet(&mut self) -> Option<usize> {
        let arena = &self.tuning.arena;
        let pos = Vec2::new(self.player.x, arena.player_y - arena.catch_zone_height);
        let vel = Vec2::new(0.0, -arena.bullet_speed);
        let slot = self.bullets.spawn(|bullet| {
            bullet.active = true;
            bullet.pos = pos;
            bullet.vel = vel;
        })?;
        self.push_event(GameEvent::Spawned {
            kind: EntityKind::Bullet,
            slot,
            pos,
            vel,
        });
        self.push_event(GameEvent::Effect(Effect::Shoot));
        Some(slot)
    }

    pub(crate) fn spawn_projectile(
        &mut self,
        source: ProjectileSource,
        pos: Vec2,
        vel: Vec2,
    ) -> Option<usize> {
        let slot = self.projectiles.spawn(|p| {
            p.active = true;
            p.pos = pos;
            p.vel = vel;
            p.source = source;
        });
        match slot {
            Some(slot) => self.push_event(GameEvent::Spawned {
                kind: EntityKind::Projectile(source),
                slot,
                pos,
                vel,
            }),
            None => log::debug!("Projectile pool exhausted"),
        }
        slot
    }

    /// Recycle every pooled entity
    pub(crate) fn clear_entities(&mut self) {
        self.items.recycle_all();
        self.bullets.recycle_all();
        self.projectiles.recycle_all();
        self.enemies.recycle_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Arc::new(Tuning::default()), 42)
    }

    #[test]
    fn test_new_session_starts_in_tutorial() {
        let mut s = session();
        assert_eq!(s.phase, GamePhase::Tutorial);
        assert_eq!(s.player.health, 5);
        assert_eq!(s.player.x, 400.0);
        assert_eq!(s.items.capacity(), 40);
        assert_eq!(s.scheduler.pending(), 3);
        assert_eq!(s.countdown_ms(), 15_000);

        let events = s.drain_events();
        assert_eq!(events[0], GameEvent::PhaseChanged(GamePhase::Tutorial));
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_player_zones_stack() {
        let s = session();
        let body = s.player_body();
        let catch = s.catch_zone();
        assert_eq!(catch.max.y, body.min.y);
        assert_eq!(body.min.x, 360.0);
        assert_eq!(body.max.x, 440.0);
        assert!(catch.min.y < catch.max.y);
    }

    #[test]
    fn test_item_spawn_reports_event() {
        let mut s = session();
        s.drain_events();
        let slot = s.spawn_item_from_top(ItemKind::Bad, 120.0).unwrap();
        let item = s.items.get(slot).unwrap();
        assert!(item.pos.x >= 18.0 && item.pos.x <= 782.0);
        assert_eq!(item.vel, Vec2::new(0.0, 120.0));
        let events = s.drain_events();
        assert!(matches!(
            events[0],
            GameEvent::Spawned {
                kind: EntityKind::Item(ItemKind::Bad),
                ..
            }
        ));
    }

    #[test]
    fn test_full_item_pool_drops_spawn() {
        let mut tuning = Tuning::default();
        tuning.pools.items = 2;
        let mut s = Session::new(Arc::new(tuning), 1);
        assert!(s.spawn_item_from_top(ItemKind::Good, 100.0).is_some());
        assert!(s.spawn_item_from_top(ItemKind::Good, 100.0).is_some());
        assert!(s.spawn_item_from_top(ItemKind::Good, 100.0).is_none());
        assert_eq!(s.items.active_count(), 2);
    }
}
