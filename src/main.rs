//! CV Blaster entry point
//!
//! Runs a headless session driven by a simple autopilot, then grades the run
//! and submits it to the leaderboard.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cv_blaster::consts::{MAX_STEPS, SIM_STEP_MS};
use cv_blaster::highscores::{
    Grade, HighScores, JsonFileLeaderboard, RunResult, submit_with_fallback,
};
use cv_blaster::sim::{
    DisplayUpdate, GameEvent, GamePhase, ItemKind, Session, TickInput, tick,
};
use cv_blaster::tuning::{Tuning, TuningError};

#[derive(Parser, Debug)]
#[command(name = "cv-blaster")]
#[command(about = "Headless CV Blaster run driven by a built-in autopilot")]
struct Cli {
    /// Run seed; the same seed replays the same run
    #[arg(long, default_value_t = 0x00C0_FFEE)]
    seed: u64,
    /// Tuning JSON overriding the shipped balance values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leaderboard file the result is submitted to
    #[arg(long, default_value = "leaderboard.json")]
    leaderboard: PathBuf,
    #[arg(long, default_value = "Anonymous")]
    name: String,
    /// Jump straight to the boss encounter
    #[arg(long)]
    skip_to_boss: bool,
}

/// Chase catchable items, otherwise line up under whatever can be shot
fn autopilot(session: &Session) -> TickInput {
    let x = session.player.x;
    let lowest = |want: fn(ItemKind) -> bool| {
        session
            .items
            .iter_active()
            .filter(|(_, it)| want(it.kind))
            .max_by(|(_, a), (_, b)| a.pos.y.total_cmp(&b.pos.y))
            .map(|(_, it)| it.pos.x)
    };

    let target = lowest(|k| matches!(k, ItemKind::Good | ItemKind::Unicorn))
        .or_else(|| session.boss.as_ref().filter(|b| b.is_vulnerable()).map(|b| b.pos().x))
        .or_else(|| session.enemies.iter_active().next().map(|(_, e)| e.pos.x))
        .or_else(|| lowest(ItemKind::is_shootable));

    let move_axis = target.map(|t| ((t - x) / 40.0).clamp(-1.0, 1.0)).unwrap_or(0.0);
    TickInput {
        move_axis,
        fire: session.phase != GamePhase::Tutorial || session.items.active_count() > 0,
        ..Default::default()
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::PhaseChanged(phase) => log::info!("== {phase:?} =="),
        GameEvent::WaveStarted(i) => log::info!("Wave {} started", i + 1),
        GameEvent::Announce(a) => log::info!("Announcement: {a:?}"),
        GameEvent::BossPhaseChanged(p) => log::info!("Boss phase: {p:?}"),
        GameEvent::BossDefeated { bonus } => log::info!("Boss defeated! Time bonus {bonus}"),
        GameEvent::GameOver { outcome, score } => {
            log::info!("Game over ({outcome:?}) with {score} points");
        }
        GameEvent::Display(DisplayUpdate::PlayerHealth(h)) => log::debug!("Health {h}"),
        GameEvent::Display(DisplayUpdate::Countdown(ms)) => log::trace!("Countdown {ms} ms"),
        GameEvent::ScorePopup { points, .. } => log::debug!("{points:+}"),
        other => log::trace!("{other:?}"),
    }
}

fn run(cli: Cli) -> Result<(), TuningError> {
    let tuning = match &cli.config {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let tuning = Arc::new(tuning);

    let mut session = Session::new(tuning.clone(), cli.seed);
    log::info!("CV Blaster starting (seed {})", cli.seed);
    if cli.skip_to_boss {
        session.skip_to_encounter();
    }

    let mut steps = 0;
    while !session.is_over() && steps < MAX_STEPS {
        let input = autopilot(&session);
        tick(&mut session, &input, SIM_STEP_MS);
        for event in session.drain_events() {
            report(&event);
        }
        steps += 1;
    }
    if !session.is_over() {
        log::warn!("Stopped after {steps} steps without reaching game over");
    }

    let stats = session.scoring.state().clone();
    let score = session.score();
    let grade = Grade::for_score(score, &tuning.grades);
    println!("Outcome:          {:?}", session.outcome);
    println!("Run time:         {:.1} s", session.elapsed_ms as f64 / 1000.0);
    println!("Score:            {score} ({grade:?})");
    println!("Max combo:        {}", stats.max_combo);
    println!("Good caught:      {}", stats.good_caught);
    println!("Bad shot:         {}", stats.bad_shot);
    println!("Unicorns caught:  {}", stats.unicorns_caught);
    println!("Enemies defeated: {}", stats.enemies_defeated);

    let result = RunResult {
        name: cli.name,
        company: String::new(),
        team: String::new(),
        score,
        grade,
    };
    let mut file = JsonFileLeaderboard::new(cli.leaderboard);
    let mut memory = HighScores::new();
    let standings = submit_with_fallback(&mut file, &mut memory, &result);

    println!("\nLeaderboard");
    for entry in standings {
        println!(
            "{:>2}. {:<16} {:>7} {:?}",
            entry.rank, entry.result.name, entry.result.score, entry.result.grade
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
