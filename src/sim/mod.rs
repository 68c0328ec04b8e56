//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer millisecond timers only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering, audio or platform dependencies; the host drains [`GameEvent`]s

pub mod boss;
pub mod collision;
pub mod enemies;
pub mod pool;
pub mod schedule;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod waves;

pub use boss::{Boss, BossIntent, BossPhase};
pub use collision::{Overlap, Rect, detect_overlaps, resolve};
pub use enemies::EnemySquad;
pub use pool::{Bounds, Bullet, Enemy, Item, ItemKind, Pool, Poolable, Projectile, ProjectileSource};
pub use schedule::{Announcement, CancelHandle, ScheduledAction, Scheduler};
pub use scoring::{ScoreEvent, ScoreOutcome, ScoreState, ScoringEngine};
pub use state::{
    DisplayUpdate, Effect, EntityKind, GameEvent, GameOutcome, GamePhase, Player, Session,
};
pub use tick::{TickInput, tick};
pub use waves::{DirectorPhase, DirectorTick, SpawnIntent, WaveDirector, WaveDirectorState};
