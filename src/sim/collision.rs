//! Overlap detection and resolution
//!
//! Detection is a plain geometric pass over the active pool slots in index
//! order. Resolution turns each overlap into exactly one scoring call, recycles
//! whatever transient entity was consumed and forwards damage. Resolving an
//! overlap whose entities are already gone is a no-op, so a bullet touching two
//! items in the same tick only ever counts once.

use glam::Vec2;

use super::pool::ItemKind;
use super::scoring::{ScoreEvent, ScoreOutcome};
use super::state::{DisplayUpdate, Effect, GameEvent, GameOutcome, Session};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square of half-size `half` around `center`
    pub fn around(center: Vec2, half: f32) -> Self {
        Self {
            min: center - Vec2::splat(half),
            max: center + Vec2::splat(half),
        }
    }

    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Circle touching or overlapping a rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance_squared(rect.closest_point(center)) <= radius * radius
}

pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// A contact between two things the resolver cares about (slot indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    BulletItem { bullet: usize, item: usize },
    CatchItem { item: usize },
    BodyItem { item: usize },
    BodyProjectile { projectile: usize },
    BulletEnemy { bullet: usize, enemy: usize },
    BulletBoss { bullet: usize },
}

/// Find every relevant overlap this tick, in a stable order
pub fn detect_overlaps(session: &Session) -> Vec<Overlap> {
    let arena = &session.tuning.arena;
    let mut found = Vec::new();

    for (b, bullet) in session.bullets.iter_active() {
        for (i, item) in session.items.iter_active() {
            // Good items and unicorns let bullets through
            if item.kind.is_shootable()
                && circles_overlap(bullet.pos, arena.bullet_radius, item.pos, arena.item_radius)
            {
                found.push(Overlap::BulletItem { bullet: b, item: i });
            }
        }
        for (e, enemy) in session.enemies.iter_active() {
            let rect = Rect::around(enemy.pos, arena.enemy_half_size);
            if circle_rect_overlap(bullet.pos, arena.bullet_radius, &rect) {
                found.push(Overlap::BulletEnemy { bullet: b, enemy: e });
            }
        }
        if let Some(boss) = session.boss.as_ref().filter(|boss| boss.is_vulnerable()) {
            if circles_overlap(bullet.pos, arena.bullet_radius, boss.pos(), arena.boss_radius) {
                found.push(Overlap::BulletBoss { bullet: b });
            }
        }
    }

    let catch_zone = session.catch_zone();
    let body = session.player_body();
    for (i, item) in session.items.iter_active() {
        if item.kind.is_catchable() && circle_rect_overlap(item.pos, arena.item_radius, &catch_zone) {
            found.push(Overlap::CatchItem { item: i });
        } else if item.kind.is_harmful() && circle_rect_overlap(item.pos, arena.item_radius, &body) {
            found.push(Overlap::BodyItem { item: i });
        }
    }

    for (p, projectile) in session.projectiles.iter_active() {
        if circle_rect_overlap(projectile.pos, arena.projectile_radius, &body) {
            found.push(Overlap::BodyProjectile { projectile: p });
        }
    }

    found
}

/// Apply one overlap. Returns the scoring outcome, or `None` if it was stale.
pub fn resolve(session: &mut Session, overlap: Overlap) -> Option<ScoreOutcome> {
    match overlap {
        Overlap::BulletItem { bullet, item } => {
            let (pos, kind) = session.items.get(item).map(|it| (it.pos, it.kind))?;
            if !kind.is_shootable() || session.bullets.get(bullet).is_none() {
                return None;
            }
            session.bullets.recycle(bullet);
            session.items.recycle(item);
            session.push_event(GameEvent::Effect(Effect::ItemShot));
            Some(score(session, ScoreEvent::ShootBad, pos))
        }

        Overlap::CatchItem { item } => {
            let (pos, kind) = session.items.get(item).map(|it| (it.pos, it.kind))?;
            let (event, effect) = match kind {
                ItemKind::Good => (ScoreEvent::CatchGood, Effect::Catch),
                ItemKind::Unicorn => (ScoreEvent::CatchUnicorn, Effect::UnicornCatch),
                ItemKind::Disguised => (ScoreEvent::CaughtDisguised, Effect::CaughtDisguised),
                ItemKind::Bad => return None,
            };
            session.items.recycle(item);
            session.push_event(GameEvent::Effect(effect));
            Some(score(session, event, pos))
        }

        Overlap::BodyItem { item } => {
            let (pos, kind) = session.items.get(item).map(|it| (it.pos, it.kind))?;
            if !kind.is_harmful() {
                return None;
            }
            session.items.recycle(item);
            let outcome = score(session, ScoreEvent::BadHitsPlayer, pos);
            damage_player(session);
            Some(outcome)
        }

        Overlap::BodyProjectile { projectile } => {
            let pos = session.projectiles.get(projectile)?.pos;
            session.projectiles.recycle(projectile);
            let outcome = score(session, ScoreEvent::BadHitsPlayer, pos);
            damage_player(session);
            Some(outcome)
        }

        Overlap::BulletEnemy { bullet, enemy } => {
            session.bullets.get(bullet)?;
            let target = session.enemies.get_mut(enemy)?;
            target.health = target.health.saturating_sub(1);
            let (pos, destroyed) = (target.pos, target.health == 0);
            session.bullets.recycle(bullet);
            if !destroyed {
                return None;
            }
            session.enemies.recycle(enemy);
            session.push_event(GameEvent::Effect(Effect::EnemyDestroyed));
            Some(score(session, ScoreEvent::EnemyKill, pos))
        }

        Overlap::BulletBoss { bullet } => {
            session.bullets.get(bullet)?;
            let boss = session.boss.as_mut().filter(|b| b.is_vulnerable())?;
            session.bullets.recycle(bullet);
            let lethal = boss.take_damage();
            let (pos, ratio) = (boss.pos(), boss.health_ratio());
            session.push_event(GameEvent::Effect(Effect::BossHit));
            session.push_event(GameEvent::Display(DisplayUpdate::BossHealth(ratio)));
            let outcome = score(session, ScoreEvent::BossHit, pos);
            if lethal {
                session.on_boss_defeated();
            }
            Some(outcome)
        }
    }
}

/// Route one scoring event and report it to the HUD
fn score(session: &mut Session, event: ScoreEvent, pos: Vec2) -> ScoreOutcome {
    let outcome = session.scoring.apply(event);
    session.push_event(GameEvent::ScorePopup {
        points: outcome.points,
        pos,
    });
    session.push_event(GameEvent::Display(DisplayUpdate::Score(session.scoring.score())));
    session.push_event(GameEvent::Display(DisplayUpdate::Combo(outcome.combo)));
    outcome
}

fn damage_player(session: &mut Session) {
    session.player.health = session.player.health.saturating_sub(1);
    let health = session.player.health;
    session.push_event(GameEvent::Effect(Effect::PlayerHit));
    session.push_event(GameEvent::Display(DisplayUpdate::PlayerHealth(health)));
    if health == 0 {
        session.end_session(GameOutcome::PlayerDown);
    }
}
