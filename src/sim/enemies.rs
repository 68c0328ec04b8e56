//! Enemy squads
//!
//! Classic invader march: the whole squad slides sideways, and when any member
//! touches a side margin the squad drops one step and reverses.

use glam::Vec2;

use super::pool::{Enemy, Pool};
use crate::tuning::{EnemySpec, EnemyTuning};

#[derive(Debug, Clone)]
pub struct EnemySquad {
    tuning: EnemyTuning,
    half_size: f32,
    /// +1 marching right, -1 marching left
    direction: f32,
}

impl EnemySquad {
    pub fn new(tuning: EnemyTuning, half_size: f32) -> Self {
        Self {
            tuning,
            half_size,
            direction: 1.0,
        }
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Lay out `spec.count` enemies in centered rows. Returns the slots filled;
    /// members that do not fit in the pool are skipped.
    pub fn spawn_formation(
        &mut self,
        pool: &mut Pool<Enemy>,
        spec: EnemySpec,
        arena_width: f32,
    ) -> Vec<usize> {
        // Survivors of an earlier squad keep their heading
        if pool.active_count() == 0 {
            self.direction = 1.0;
        }
        let spacing = self.tuning.spacing.max(1.0);
        let usable = (arena_width - 2.0 * (self.tuning.side_margin + self.half_size)).max(0.0);
        // Leave at least one spacing of corridor to march in
        let per_row = (((usable - spacing).max(0.0) / spacing).floor() as u32 + 1).max(1);

        let mut slots = Vec::with_capacity(spec.count as usize);
        for i in 0..spec.count {
            let row = i / per_row;
            let col = i % per_row;
            let in_row = (spec.count - row * per_row).min(per_row);
            let row_width = (in_row - 1) as f32 * spacing;
            let pos = Vec2::new(
                (arena_width - row_width) / 2.0 + col as f32 * spacing,
                self.tuning.formation_y + row as f32 * spacing,
            );
            // Stagger the first volley across the squad
            let stagger = (spec.fire_rate_ms as u64 * i as u64 / spec.count.max(1) as u64) as u32;
            let slot = pool.spawn(|enemy| {
                enemy.active = true;
                enemy.pos = pos;
                enemy.health = 1;
                enemy.fire_rate_ms = spec.fire_rate_ms;
                enemy.fire_accumulator_ms = stagger;
            });
            match slot {
                Some(slot) => slots.push(slot),
                None => log::debug!("Enemy pool full, squad member {i} dropped"),
            }
        }
        slots
    }

    /// March the squad and run fire timers. Returns muzzle positions of shots fired.
    pub fn advance(&mut self, pool: &mut Pool<Enemy>, delta_ms: u32, arena_width: f32) -> Vec<Vec2> {
        let dt = delta_ms as f32 / 1000.0;
        let dx = self.direction * self.tuning.march_speed * dt;
        let lo = self.tuning.side_margin + self.half_size;
        let hi = arena_width - self.tuning.side_margin - self.half_size;

        let blocked = pool
            .iter_active()
            .any(|(_, e)| e.pos.x + dx < lo || e.pos.x + dx > hi);

        let mut shots = Vec::new();
        for (_, enemy) in pool.iter_active_mut() {
            if blocked {
                enemy.pos.y += self.tuning.step_down;
            } else {
                enemy.pos.x += dx;
            }

            if enemy.fire_rate_ms > 0 {
                enemy.fire_accumulator_ms += delta_ms;
                if enemy.fire_accumulator_ms >= enemy.fire_rate_ms {
                    enemy.fire_accumulator_ms -= enemy.fire_rate_ms;
                    shots.push(enemy.pos + Vec2::new(0.0, self.half_size));
                }
            }
        }

        if blocked {
            self.direction = -self.direction;
        }
        shots
    }

    /// Projectile velocity for an enemy shot
    pub fn shot_velocity(&self) -> Vec2 {
        Vec2::new(0.0, self.tuning.projectile_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squad() -> EnemySquad {
        EnemySquad::new(EnemyTuning::default(), 18.0)
    }

    #[test]
    fn test_formation_is_centered() {
        let mut pool: Pool<Enemy> = Pool::new(16);
        let mut squad = squad();
        let slots = squad.spawn_formation(&mut pool, EnemySpec { count: 3, fire_rate_ms: 1000 }, 800.0);
        assert_eq!(slots, vec![0, 1, 2]);
        let xs: Vec<f32> = pool.iter_active().map(|(_, e)| e.pos.x).collect();
        assert_eq!(xs, vec![330.0, 400.0, 470.0]);
        assert!(pool.iter_active().all(|(_, e)| e.health == 1));
    }

    #[test]
    fn test_formation_wraps_rows_and_respects_pool() {
        let mut pool: Pool<Enemy> = Pool::new(12);
        let mut squad = squad();
        let slots = squad.spawn_formation(&mut pool, EnemySpec { count: 14, fire_rate_ms: 1000 }, 800.0);
        assert_eq!(slots.len(), 12);
        let rows: std::collections::BTreeSet<i32> =
            pool.iter_active().map(|(_, e)| e.pos.y as i32).collect();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_march_steps_down_and_reverses_at_edge() {
        let mut pool: Pool<Enemy> = Pool::new(4);
        let mut squad = squad();
        squad.spawn_formation(&mut pool, EnemySpec { count: 1, fire_rate_ms: 0 }, 800.0);
        pool.get_mut(0).unwrap().pos.x = 752.0;

        squad.advance(&mut pool, 16, 800.0);
        let enemy = pool.get(0).unwrap();
        assert_eq!(enemy.pos.x, 752.0);
        assert_eq!(enemy.pos.y, 80.0 + 24.0);
        assert_eq!(squad.direction(), -1.0);

        squad.advance(&mut pool, 1000, 800.0);
        assert!((pool.get(0).unwrap().pos.x - 682.0).abs() < 0.001);
    }

    #[test]
    fn test_full_row_marches_before_stepping_down() {
        let mut pool: Pool<Enemy> = Pool::new(16);
        let mut squad = squad();
        squad.spawn_formation(&mut pool, EnemySpec { count: 11, fire_rate_ms: 0 }, 800.0);
        let rows: std::collections::BTreeSet<i32> =
            pool.iter_active().map(|(_, e)| e.pos.y as i32).collect();
        assert_eq!(rows.len(), 2);

        let mut prev_y = pool.get(0).unwrap().pos.y;
        let mut prev_stepped = false;
        let mut step_downs = 0;
        for _ in 0..188 {
            squad.advance(&mut pool, 16, 800.0);
            let y = pool.get(0).unwrap().pos.y;
            let stepped = y > prev_y;
            assert!(!(stepped && prev_stepped), "stepped down on consecutive ticks");
            if stepped {
                step_downs += 1;
            }
            prev_stepped = stepped;
            prev_y = y;
        }
        // Three seconds: right edge, left edge, right edge
        assert!(step_downs <= 3, "{step_downs} step-downs");
        assert!(pool.get(0).unwrap().pos.y <= 80.0 + 3.0 * 24.0);
    }

    #[test]
    fn test_new_squad_keeps_survivors_heading() {
        let mut pool: Pool<Enemy> = Pool::new(16);
        let mut squad = squad();
        squad.spawn_formation(&mut pool, EnemySpec { count: 1, fire_rate_ms: 0 }, 800.0);
        pool.get_mut(0).unwrap().pos.x = 752.0;
        squad.advance(&mut pool, 16, 800.0);
        assert_eq!(squad.direction(), -1.0);

        squad.spawn_formation(&mut pool, EnemySpec { count: 2, fire_rate_ms: 0 }, 800.0);
        assert_eq!(squad.direction(), -1.0);

        pool.recycle_all();
        squad.spawn_formation(&mut pool, EnemySpec { count: 2, fire_rate_ms: 0 }, 800.0);
        assert_eq!(squad.direction(), 1.0);
    }

    #[test]
    fn test_fire_cadence_per_enemy() {
        let mut pool: Pool<Enemy> = Pool::new(4);
        let mut squad = squad();
        squad.spawn_formation(&mut pool, EnemySpec { count: 2, fire_rate_ms: 1000 }, 800.0);
        // Staggered: slot 1 starts half-loaded
        assert_eq!(pool.get(1).unwrap().fire_accumulator_ms, 500);

        let mut fired = 0;
        for _ in 0..10 {
            fired += squad.advance(&mut pool, 100, 800.0).len();
        }
        assert_eq!(fired, 2);
        assert_eq!(squad.shot_velocity(), Vec2::new(0.0, 220.0));
    }
}
