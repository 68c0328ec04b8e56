//! Session tick
//!
//! Sequences tutorial -> waves -> boss -> game over and drives every component
//! from a single millisecond delta per call.

use rand::Rng;

use super::boss::{Boss, BossIntent, BossPhase};
use super::collision::{detect_overlaps, resolve};
use super::pool::{ItemKind, ProjectileSource};
use super::schedule::{Announcement, ScheduledAction};
use super::state::{DisplayUpdate, Effect, EntityKind, GameEvent, GameOutcome, GamePhase, Session};
use super::waves::SpawnIntent;

/// Abstract controls for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal movement in [-1, 1]
    pub move_axis: f32,
    /// Fire held
    pub fire: bool,
    /// Leave the tutorial early
    pub skip_tutorial: bool,
    /// Jump straight to the boss (debug/testing); forces phase 2 during the fight
    pub skip_to_encounter: bool,
}

/// Advance the session by `delta_ms`
pub fn tick(session: &mut Session, input: &TickInput, delta_ms: u32) {
    if session.is_over() {
        return;
    }
    session.elapsed_ms += delta_ms as u64;

    if input.skip_to_encounter {
        session.skip_to_encounter();
    } else if input.skip_tutorial && session.phase == GamePhase::Tutorial {
        session.begin_waves();
    }

    for due in session.scheduler.advance(delta_ms) {
        // Stale actions belong to a phase that has already been torn down
        if due.generation != session.generation {
            continue;
        }
        session.run_scheduled(due.action);
    }

    update_player(session, input, delta_ms);

    match session.phase {
        GamePhase::Tutorial => tick_tutorial(session, delta_ms),
        GamePhase::Waves => tick_waves(session, delta_ms),
        GamePhase::BossIntro => {}
        GamePhase::Boss => tick_boss(session, delta_ms),
        GamePhase::GameOver => return,
    }

    step_entities(session, delta_ms);
    sweep_out_of_bounds(session);

    for overlap in detect_overlaps(session) {
        if session.is_over() {
            break;
        }
        resolve(session, overlap);
    }

    if session.phase == GamePhase::Boss
        && session.phase_elapsed_ms >= session.tuning.scoring.boss_time_limit_ms
    {
        session.end_session(GameOutcome::TimeUp);
    }

    report_countdown(session);
}

fn update_player(session: &mut Session, input: &TickInput, delta_ms: u32) {
    let arena = &session.tuning.arena;
    let dt = delta_ms as f32 / 1000.0;
    let axis = if input.move_axis.is_finite() {
        input.move_axis.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let lo = arena.player_half_width;
    let hi = (arena.width - arena.player_half_width).max(lo);
    session.player.x = (session.player.x + axis * arena.player_speed * dt).clamp(lo, hi);

    let cooldown = arena.fire_cooldown_ms;
    session.player.fire_cooldown_ms = session.player.fire_cooldown_ms.saturating_sub(delta_ms);
    if input.fire && session.player.fire_cooldown_ms == 0 && session.spawn_bullet().is_some() {
        session.player.fire_cooldown_ms = cooldown;
    }
}

fn tick_tutorial(session: &mut Session, delta_ms: u32) {
    session.phase_elapsed_ms = session.phase_elapsed_ms.saturating_add(delta_ms);
    let tutorial = session.tuning.session.clone();

    session.tutorial_spawn_accumulator += delta_ms;
    if session.tutorial_spawn_accumulator >= tutorial.tutorial_spawn_interval_ms {
        session.tutorial_spawn_accumulator = 0;
        if session.items.active_count() < tutorial.tutorial_max_items {
            let kind = if session.rng.random_bool(0.5) {
                ItemKind::Good
            } else {
                ItemKind::Bad
            };
            session.spawn_item_from_top(kind, tutorial.tutorial_fall_speed);
        }
    }

    if session.phase_elapsed_ms >= tutorial.tutorial_duration_ms {
        session.begin_waves();
    }
}

fn tick_waves(session: &mut Session, delta_ms: u32) {
    let active_items = session.items.active_count();
    let out = session.director.tick(delta_ms, active_items, &mut session.rng);

    for intent in out.intents {
        match intent {
            SpawnIntent::Item { good, fall_speed } => {
                let kind = if good { ItemKind::Good } else { ItemKind::Bad };
                session.spawn_item_from_top(kind, fall_speed);
            }
            SpawnIntent::Unicorn { fall_speed } => {
                session.spawn_item_from_top(ItemKind::Unicorn, fall_speed);
            }
            SpawnIntent::Enemies(spec) => {
                let width = session.tuning.arena.width;
                let slots = session.squad.spawn_formation(&mut session.enemies, spec, width);
                log::debug!("Enemy squad of {} deployed", slots.len());
                for slot in slots {
                    if let Some(pos) = session.enemies.get(slot).map(|e| e.pos) {
                        session.push_event(GameEvent::Spawned {
                            kind: EntityKind::Enemy,
                            slot,
                            pos,
                            vel: glam::Vec2::ZERO,
                        });
                    }
                }
            }
        }
    }

    if let Some(index) = out.wave_started {
        session.push_event(GameEvent::WaveStarted(index));
        session.push_event(GameEvent::Announce(Announcement::WaveIncoming(index)));
    }

    if !session.frenzy_announced && session.director.in_frenzy() {
        session.frenzy_announced = true;
        session.push_event(GameEvent::Announce(Announcement::Frenzy));
    }

    if out.all_done {
        session.enter_boss_intro();
    }
}

fn tick_boss(session: &mut Session, delta_ms: u32) {
    session.phase_elapsed_ms = session.phase_elapsed_ms.saturating_add(delta_ms);
    let player = session.player_center();
    let Some(boss) = session.boss.as_mut() else {
        return;
    };
    let out = boss.tick(delta_ms, player, &mut session.rng);

    if let Some(phase) = out.phase_changed {
        session.push_event(GameEvent::BossPhaseChanged(phase));
        if phase == BossPhase::Phase2 {
            session.push_event(GameEvent::Announce(Announcement::BossEnraged));
        }
    }

    for intent in out.intents {
        match intent {
            BossIntent::SpawnItem {
                pos,
                kind,
                fall_speed,
            } => {
                session.spawn_item(kind, pos, fall_speed);
            }
            BossIntent::Fire { pos, vel } => {
                session.spawn_projectile(ProjectileSource::Boss, pos, vel);
            }
        }
    }
}

fn step_entities(session: &mut Session, delta_ms: u32) {
    let dt = delta_ms as f32 / 1000.0;
    for (_, item) in session.items.iter_active_mut() {
        item.step(dt);
    }
    for (_, bullet) in session.bullets.iter_active_mut() {
        bullet.step(dt);
    }
    for (_, projectile) in session.projectiles.iter_active_mut() {
        projectile.step(dt);
    }

    let width = session.tuning.arena.width;
    let muzzles = session.squad.advance(&mut session.enemies, delta_ms, width);
    let vel = session.squad.shot_velocity();
    for pos in muzzles {
        session.spawn_projectile(ProjectileSource::Enemy, pos, vel);
    }
}

/// Recycle everything that left the play area; fallen items carry penalties
fn sweep_out_of_bounds(session: &mut Session) {
    let bounds = session.bounds();
    session.bullets.sweep_out_of_bounds(&bounds);
    session.projectiles.sweep_out_of_bounds(&bounds);
    session.enemies.sweep_out_of_bounds(&bounds);

    for item in session.items.sweep_out_of_bounds(&bounds) {
        let points = match item.kind {
            ItemKind::Good => session.scoring.on_miss_good(),
            ItemKind::Bad | ItemKind::Disguised => session.scoring.on_bad_reaches_bottom(),
            ItemKind::Unicorn => continue,
        };
        session.push_event(GameEvent::Effect(Effect::Miss));
        session.push_event(GameEvent::ScorePopup {
            points,
            pos: item.pos,
        });
        session.push_event(GameEvent::Display(DisplayUpdate::Score(session.scoring.score())));
        session.push_event(GameEvent::Display(DisplayUpdate::Combo(0)));
    }
}

/// Countdown HUD changes once per displayed second
fn report_countdown(session: &mut Session) {
    let remaining = session.countdown_ms();
    let secs = remaining.div_ceil(1000);
    if session.last_countdown_secs != Some(secs) {
        session.last_countdown_secs = Some(secs);
        session.push_event(GameEvent::Display(DisplayUpdate::Countdown(remaining)));
    }
}

impl Session {
    /// Practice is over: wipe it and start wave 1
    pub fn begin_waves(&mut self) {
        if self.phase != GamePhase::Tutorial {
            return;
        }
        self.enter_phase(GamePhase::Waves);
        self.scheduler.cancel_all();
        self.clear_entities();
        self.scoring.reset();
        self.player.health = self.tuning.arena.player_max_health;
        self.push_event(GameEvent::Announce(Announcement::TutorialComplete));

        self.director.start_wave(0);
        self.push_event(GameEvent::WaveStarted(0));
        self.push_event(GameEvent::Announce(Announcement::WaveIncoming(0)));
        self.push_display();
    }

    /// Waves are exhausted; the boss arrives after a short announcement
    pub(crate) fn enter_boss_intro(&mut self) {
        if self.phase != GamePhase::Waves {
            return;
        }
        self.enter_phase(GamePhase::BossIntro);
        self.enemies.recycle_all();
        self.scheduler.schedule(
            0,
            self.generation,
            ScheduledAction::Announce(Announcement::BossIncoming),
        );
        self.boss_fight_handle = Some(self.scheduler.schedule(
            self.tuning.session.boss_intro_ms,
            self.generation,
            ScheduledAction::BeginBossFight,
        ));
    }

    pub(crate) fn run_scheduled(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::Announce(announcement) => {
                self.push_event(GameEvent::Announce(announcement));
            }
            ScheduledAction::BeginBossFight => self.begin_boss_fight(),
        }
    }

    fn begin_boss_fight(&mut self) {
        if matches!(self.phase, GamePhase::Boss | GamePhase::GameOver) {
            return;
        }
        // Still pending when the intro was skipped
        if let Some(handle) = self.boss_fight_handle.take() {
            if self.scheduler.cancel(handle) {
                log::debug!("Scheduled boss arrival cancelled");
            }
        }
        self.enter_phase(GamePhase::Boss);
        let boss = Boss::new(
            self.tuning.boss.clone(),
            self.tuning.arena.width,
            self.tuning.director.good_ratio,
        );
        let pos = boss.pos();
        self.boss = Some(boss);
        self.push_event(GameEvent::Spawned {
            kind: EntityKind::Boss,
            slot: 0,
            pos,
            vel: glam::Vec2::ZERO,
        });
        self.push_event(GameEvent::BossPhaseChanged(BossPhase::Entering));
        self.push_event(GameEvent::Display(DisplayUpdate::BossHealth(1.0)));
    }

    /// Debug entry point: jump to the boss from anywhere before it, or force
    /// phase 2 once the fight is on
    pub fn skip_to_encounter(&mut self) {
        match self.phase {
            GamePhase::Tutorial | GamePhase::Waves | GamePhase::BossIntro => {
                log::info!("Skipping to boss encounter from {:?}", self.phase);
                if self.phase == GamePhase::Tutorial {
                    self.scheduler.cancel_all();
                    self.scoring.reset();
                    self.push_display();
                }
                self.director.halt();
                self.clear_entities();
                self.begin_boss_fight();
            }
            GamePhase::Boss => {
                let Some(boss) = self.boss.as_mut() else {
                    return;
                };
                if boss.force_phase2() {
                    let ratio = boss.health_ratio();
                    self.push_event(GameEvent::BossPhaseChanged(BossPhase::Phase2));
                    self.push_event(GameEvent::Announce(Announcement::BossEnraged));
                    self.push_event(GameEvent::Display(DisplayUpdate::BossHealth(ratio)));
                }
            }
            GamePhase::GameOver => {}
        }
    }

    /// Lethal boss hit: award the time bonus and finish, once
    pub(crate) fn on_boss_defeated(&mut self) {
        if self.boss_defeat_signaled {
            return;
        }
        self.boss_defeat_signaled = true;
        let limit = self.tuning.scoring.boss_time_limit_ms;
        let bonus = self.scoring.on_boss_kill(self.phase_elapsed_ms, limit);
        log::info!("Boss down after {} ms, bonus {bonus}", self.phase_elapsed_ms);
        self.push_event(GameEvent::Effect(Effect::BossDefeated));
        self.push_event(GameEvent::BossPhaseChanged(BossPhase::Defeated));
        self.push_event(GameEvent::BossDefeated { bonus });
        self.end_session(GameOutcome::BossDefeated);
    }

    /// Terminal transition. Later calls are ignored.
    pub(crate) fn end_session(&mut self, outcome: GameOutcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.enter_phase(GamePhase::GameOver);
        self.scheduler.cancel_all();
        self.boss_fight_handle = None;
        self.director.halt();
        if let Some(boss) = self.boss.as_mut() {
            boss.interrupt();
        }
        self.clear_entities();
        let score = self.scoring.score();
        log::info!("Game over: {outcome:?}, score {score}");
        self.push_display();
        self.push_event(GameEvent::GameOver { outcome, score });
    }

    fn enter_phase(&mut self, phase: GamePhase) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.generation += 1;
        self.phase_elapsed_ms = 0;
        self.push_event(GameEvent::PhaseChanged(phase));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Tuning, WaveSpec};
    use std::sync::Arc;

    const DT: u32 = 16;

    fn tuning_with_waves(waves: Vec<WaveSpec>) -> Arc<Tuning> {
        let mut tuning = Tuning::default();
        tuning.waves = waves;
        Arc::new(tuning)
    }

    fn skip_tutorial() -> TickInput {
        TickInput {
            skip_tutorial: true,
            ..Default::default()
        }
    }

    fn run_until_over(session: &mut Session, max_ticks: usize) {
        let idle = TickInput::default();
        for _ in 0..max_ticks {
            if session.is_over() {
                return;
            }
            tick(session, &idle, DT);
        }
    }

    #[test]
    fn test_tutorial_times_out_into_waves() {
        let mut s = Session::new(Arc::new(Tuning::default()), 1);
        let idle = TickInput::default();
        let ticks = 15_000 / DT as usize + 1;
        for _ in 0..ticks {
            tick(&mut s, &idle, DT);
        }
        assert_eq!(s.phase, GamePhase::Waves);
        assert_eq!(s.director.state().current_wave_index, 0);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::Announce(Announcement::TutorialHint(2))));
        assert!(events.contains(&GameEvent::WaveStarted(0)));
    }

    #[test]
    fn test_practice_score_is_reset() {
        let mut s = Session::new(Arc::new(Tuning::default()), 2);
        s.scoring.on_catch_good();
        s.scoring.on_catch_good();
        s.spawn_item_from_top(ItemKind::Good, 100.0);
        tick(&mut s, &skip_tutorial(), DT);
        assert_eq!(s.phase, GamePhase::Waves);
        assert_eq!(s.score(), 0);
        assert_eq!(s.scoring.state().max_combo, 0);
    }

    #[test]
    fn test_tutorial_skip_cancels_pending_hints() {
        let mut s = Session::new(Arc::new(Tuning::default()), 3);
        tick(&mut s, &skip_tutorial(), DT);
        s.drain_events();
        for _ in 0..1000 {
            tick(&mut s, &TickInput::default(), DT);
        }
        let hints = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Announce(Announcement::TutorialHint(_))))
            .count();
        assert_eq!(hints, 0);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut s = Session::new(Arc::new(Tuning::default()), 4);
        tick(&mut s, &skip_tutorial(), DT);
        // Simulate a callback that survived cancellation from the tutorial
        s.scheduler.schedule(0, 0, ScheduledAction::BeginBossFight);
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase, GamePhase::Waves);
        assert!(s.boss.is_none());
    }

    #[test]
    fn test_first_wave_advances_on_exact_tick() {
        let waves = vec![
            WaveSpec::new(10_000, 1100, 120.0, 6),
            WaveSpec::new(15_000, 950, 150.0, 8),
        ];
        let mut s = Session::new(tuning_with_waves(waves), 0x5EED);
        tick(&mut s, &skip_tutorial(), 0);
        assert_eq!(s.phase, GamePhase::Waves);
        s.player.health = u8::MAX;

        let idle = TickInput::default();
        let mut elapsed = 0;
        while elapsed < 10_000 {
            assert_eq!(s.director.state().current_wave_index, 0);
            tick(&mut s, &idle, DT);
            elapsed += DT;
        }
        assert_eq!(s.director.state().current_wave_index, 1);
        assert_eq!(s.director.state().elapsed_in_wave, 0);
        assert_eq!(s.director.state().spawn_accumulator, 0);
        assert!(s.drain_events().contains(&GameEvent::WaveStarted(1)));
    }

    #[test]
    fn test_waves_lead_to_boss_after_intro() {
        let waves = vec![WaveSpec::new(1000, 400, 120.0, 4)];
        let mut s = Session::new(tuning_with_waves(waves), 5);
        tick(&mut s, &skip_tutorial(), 0);
        let idle = TickInput::default();
        for _ in 0..63 {
            tick(&mut s, &idle, DT);
        }
        assert_eq!(s.phase, GamePhase::BossIntro);
        assert!(s.boss.is_none());

        let ticks = 3000 / DT as usize + 1;
        for _ in 0..ticks {
            tick(&mut s, &idle, DT);
        }
        assert_eq!(s.phase, GamePhase::Boss);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::Announce(Announcement::BossIncoming)));
        assert!(events.contains(&GameEvent::BossPhaseChanged(BossPhase::Entering)));
    }

    #[test]
    fn test_skip_to_encounter_then_force_phase2() {
        let mut s = Session::new(Arc::new(Tuning::default()), 6);
        s.spawn_item_from_top(ItemKind::Bad, 100.0);
        let skip = TickInput {
            skip_to_encounter: true,
            ..Default::default()
        };
        tick(&mut s, &skip, DT);
        assert_eq!(s.phase, GamePhase::Boss);
        assert!(!s.director.is_active());
        assert_eq!(s.items.active_count(), 0);
        assert_eq!(s.boss.as_ref().map(|b| b.phase()), Some(BossPhase::Entering));

        tick(&mut s, &skip, DT);
        assert_eq!(s.boss.as_ref().map(|b| b.phase()), Some(BossPhase::Phase2));
    }

    #[test]
    fn test_boss_timeout_interrupts() {
        let mut s = Session::new(Arc::new(Tuning::default()), 7);
        s.skip_to_encounter();
        // Park the player out of the boss's reach
        s.player.x = 40.0;
        s.player.health = u8::MAX;
        run_until_over(&mut s, 25_000 / DT as usize + 10);
        assert_eq!(s.outcome, Some(GameOutcome::TimeUp));
        assert_eq!(s.boss.as_ref().map(|b| b.phase()), Some(BossPhase::Interrupted));
        assert_eq!(s.scheduler.pending(), 0);
        assert_eq!(s.items.active_count() + s.projectiles.active_count(), 0);
    }

    #[test]
    fn test_boss_kill_awards_bonus_once() {
        let mut s = Session::new(Arc::new(Tuning::default()), 8);
        s.skip_to_encounter();
        // Let the entry finish
        for _ in 0..(2000 / DT as usize + 1) {
            tick(&mut s, &TickInput::default(), DT);
        }
        assert!(s.boss.as_ref().is_some_and(|b| b.is_vulnerable()));

        for _ in 0..13 {
            s.boss.as_mut().unwrap().take_damage();
        }
        let before = s.score();
        let boss_pos = s.boss.as_ref().unwrap().pos();
        let slot = s.spawn_bullet().unwrap();
        s.bullets.get_mut(slot).unwrap().pos = boss_pos;
        resolve(&mut s, crate::sim::collision::Overlap::BulletBoss { bullet: slot });

        assert_eq!(s.outcome, Some(GameOutcome::BossDefeated));
        let events = s.drain_events();
        let bonuses: Vec<i64> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BossDefeated { bonus } => Some(*bonus),
                _ => None,
            })
            .collect();
        assert_eq!(bonuses.len(), 1);
        assert!(bonuses[0] <= 2500 && bonuses[0] >= 1000);
        assert_eq!(s.score(), before + 20 + bonuses[0] as u64);

        // Terminal: nothing else happens
        s.on_boss_defeated();
        s.end_session(GameOutcome::TimeUp);
        assert_eq!(s.outcome, Some(GameOutcome::BossDefeated));
        let game_overs = events
            .iter()
            .chain(s.drain_events().iter())
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_fallen_items_cost_points() {
        let mut s = Session::new(Arc::new(Tuning::default()), 9);
        tick(&mut s, &skip_tutorial(), 0);
        for _ in 0..10 {
            s.scoring.on_catch_good();
        }
        s.spawn_item(ItemKind::Good, glam::Vec2::new(20.0, 639.0), 200.0);
        s.spawn_item(ItemKind::Unicorn, glam::Vec2::new(60.0, 639.0), 200.0);
        let before = s.score();
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.score(), before - 50);
        assert_eq!(s.scoring.combo(), 0);
        assert_eq!(s.items.active_count(), 0);
    }

    #[test]
    fn test_player_moves_and_fires_with_cooldown() {
        let mut s = Session::new(Arc::new(Tuning::default()), 10);
        let input = TickInput {
            move_axis: 1.0,
            fire: true,
            ..Default::default()
        };
        tick(&mut s, &input, 100);
        assert!((s.player.x - 442.0).abs() < 0.001);
        assert_eq!(s.bullets.active_count(), 1);
        tick(&mut s, &input, 100);
        assert_eq!(s.bullets.active_count(), 1);
        tick(&mut s, &input, 100);
        tick(&mut s, &input, 100);
        assert_eq!(s.bullets.active_count(), 2);

        let far = TickInput {
            move_axis: 5.0,
            ..Default::default()
        };
        for _ in 0..50 {
            tick(&mut s, &far, 100);
        }
        assert_eq!(s.player.x, 760.0);
    }

    #[test]
    fn test_skip_during_intro_cancels_boss_arrival() {
        let waves = vec![WaveSpec::new(1000, 400, 120.0, 4)];
        let mut s = Session::new(tuning_with_waves(waves), 11);
        tick(&mut s, &skip_tutorial(), 0);
        for _ in 0..63 {
            tick(&mut s, &TickInput::default(), DT);
        }
        assert_eq!(s.phase, GamePhase::BossIntro);
        // Let the announcement fire; only the boss arrival stays queued
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.scheduler.pending(), 1);
        assert!(s.boss_fight_handle.is_some());

        s.skip_to_encounter();
        assert_eq!(s.phase, GamePhase::Boss);
        assert!(s.boss_fight_handle.is_none());
        assert_eq!(s.scheduler.pending(), 0);

        // The boss is not spawned a second time once the intro delay would have run out
        s.drain_events();
        for _ in 0..(3000 / DT as usize + 1) {
            tick(&mut s, &TickInput::default(), DT);
        }
        let fights = s
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::PhaseChanged(GamePhase::Boss))
            .count();
        assert_eq!(fights, 0);
    }

    #[test]
    fn test_player_down_interrupts_boss() {
        let mut s = Session::new(Arc::new(Tuning::default()), 12);
        s.skip_to_encounter();
        s.player.health = 1;
        let center = s.player_center();
        s.spawn_projectile(ProjectileSource::Boss, center, glam::Vec2::ZERO);
        tick(&mut s, &TickInput::default(), DT);

        assert_eq!(s.outcome, Some(GameOutcome::PlayerDown));
        assert_eq!(s.boss.as_ref().map(|b| b.phase()), Some(BossPhase::Interrupted));
        assert!(s.is_over());
        assert_eq!(s.projectiles.active_count(), 0);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                skip_tutorial: true,
                ..Default::default()
            },
            TickInput {
                move_axis: -0.5,
                fire: true,
                ..Default::default()
            },
            TickInput {
                move_axis: 1.0,
                ..Default::default()
            },
        ];
        let mut a = Session::new(Arc::new(Tuning::default()), 99);
        let mut b = Session::new(Arc::new(Tuning::default()), 99);
        for i in 0..3000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, DT);
            tick(&mut b, input, DT);
        }
        assert_eq!(a.drain_events(), b.drain_events());
        assert_eq!(a.score(), b.score());
        assert_eq!(a.player.x, b.player.x);
    }
}
