//! Fixed-capacity entity pools
//!
//! Every transient entity (player bullet, falling item, hostile projectile,
//! enemy) lives in a slot that is allocated once at warm-up. Spawning takes the
//! lowest free slot; recycling marks the slot free and wipes its state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned play area used for out-of-bounds checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Arena of the given size, grown by `margin` on every side
    pub fn arena(width: f32, height: f32, margin: f32) -> Self {
        Self {
            min: Vec2::splat(-margin),
            max: Vec2::new(width + margin, height + margin),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Data record that can live in a [`Pool`]
pub trait Poolable: Default {
    fn is_active(&self) -> bool;

    /// Back to the inactive default; no motion or behavior state survives
    fn recycle(&mut self) {
        *self = Self::default();
    }

    /// Whether the entity has left the play area
    fn out_of_bounds(&self, bounds: &Bounds) -> bool;
}

/// Fixed-size slot pool
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Poolable> Pool<T> {
    /// Warm the pool up with `capacity` inactive slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::default()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|e| e.is_active()).count()
    }

    /// Initialize the lowest-index free slot. `None` when the pool is full.
    /// The initializer must mark the entity active.
    pub fn spawn(&mut self, init: impl FnOnce(&mut T)) -> Option<usize> {
        let index = self.slots.iter().position(|e| !e.is_active())?;
        let slot = &mut self.slots[index];
        *slot = T::default();
        init(slot);
        debug_assert!(slot.is_active(), "spawn initializer left the slot inactive");
        Some(index)
    }

    /// Free a slot. Returns false if it was already free (or out of range).
    pub fn recycle(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_active() => {
                slot.recycle();
                true
            }
            _ => false,
        }
    }

    pub fn recycle_all(&mut self) {
        for slot in self.slots.iter_mut().filter(|e| e.is_active()) {
            slot.recycle();
        }
    }

    /// Recycle every active entity that left `bounds`, returning what was removed
    pub fn sweep_out_of_bounds(&mut self, bounds: &Bounds) -> Vec<T>
    where
        T: Clone,
    {
        let mut removed = Vec::new();
        for slot in self.slots.iter_mut() {
            if slot.is_active() && slot.out_of_bounds(bounds) {
                removed.push(slot.clone());
                slot.recycle();
            }
        }
        removed
    }

    /// Active entity at `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).filter(|e| e.is_active())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).filter(|e| e.is_active())
    }

    /// Active entities with their slot indices, lowest index first
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter(|(_, e)| e.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, e)| e.is_active())
    }

    /// Raw slots, active or not
    pub fn slots(&self) -> &[T] {
        &self.slots
    }
}

/// Falling item variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    Good,
    Bad,
    /// Looks good, scores as a penalty when caught
    Disguised,
    /// Rare bonus item worth a double catch
    Unicorn,
}

impl ItemKind {
    /// Bullets stop on these; everything else lets them pass
    pub fn is_shootable(self) -> bool {
        matches!(self, ItemKind::Bad | ItemKind::Disguised)
    }

    pub fn is_catchable(self) -> bool {
        matches!(self, ItemKind::Good | ItemKind::Disguised | ItemKind::Unicorn)
    }

    /// Hurts the player on contact with the body
    pub fn is_harmful(self) -> bool {
        matches!(self, ItemKind::Bad | ItemKind::Disguised)
    }
}

/// A falling CV
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ItemKind,
}

impl Item {
    pub fn step(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

impl Poolable for Item {
    fn is_active(&self) -> bool {
        self.active
    }

    /// Items only leave through the bottom edge
    fn out_of_bounds(&self, bounds: &Bounds) -> bool {
        self.pos.y > bounds.max.y
    }
}

/// Player shot travelling upward
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bullet {
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Bullet {
    pub fn step(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

impl Poolable for Bullet {
    fn is_active(&self) -> bool {
        self.active
    }

    fn out_of_bounds(&self, bounds: &Bounds) -> bool {
        !bounds.contains(self.pos)
    }
}

/// Who fired a hostile projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileSource {
    #[default]
    Enemy,
    Boss,
}

/// Hostile shot aimed at the player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub source: ProjectileSource,
}

impl Projectile {
    pub fn step(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn out_of_bounds(&self, bounds: &Bounds) -> bool {
        !bounds.contains(self.pos)
    }
}

/// Squad member
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enemy {
    pub active: bool,
    pub pos: Vec2,
    pub health: u8,
    pub fire_rate_ms: u32,
    pub fire_accumulator_ms: u32,
}

impl Poolable for Enemy {
    fn is_active(&self) -> bool {
        self.active
    }

    fn out_of_bounds(&self, bounds: &Bounds) -> bool {
        self.pos.y > bounds.max.y
    }
}
