//! CV Blaster - A falling-item arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scoring, waves, boss, pools, collisions, session)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Grading and leaderboard submission

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::{
    Grade, HighScores, JsonFileLeaderboard, LeaderboardEntry, LeaderboardError, LeaderboardStore,
    RunResult, submit_with_fallback,
};
pub use sim::{GameEvent, Session, TickInput, tick};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step used by the headless runner (~60 Hz)
    pub const SIM_STEP_MS: u32 = 16;
    /// Hard stop for a single run, in steps
    pub const MAX_STEPS: u32 = 20_000;
}
