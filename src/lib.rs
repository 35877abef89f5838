//! Playoff Core - Monte Carlo championship odds for a two-conference
//! basketball league.
//!
//! Each trial optionally replays the regular season from sampled scores,
//! seeds eight teams per conference with tie-breaking, and plays out
//! best-of-seven brackets to a champion. Python bindings are available with
//! the `python` feature.

pub mod bracket;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod report;
pub mod scoring;
pub mod season;
pub mod seeding;
pub mod simulation;
pub mod standings;
pub mod team;
pub mod tiebreak;

#[cfg(feature = "python")]
mod python;

pub use bracket::{play_order, play_playoffs, play_series, PlayoffOutcome, SeriesResult};
pub use config::{validate_seasons, SeasonMode, SimulationConfig};
pub use error::{Error, Result};
pub use scoring::{GameResult, NormalScoring, ScoringModel};
pub use season::Fixture;
pub use seeding::{seed_conference, ConferenceSeeds};
pub use simulation::{ChampionHistogram, Simulation, SimulationReport};
pub use standings::{Standings, TeamDirectory};
pub use team::{Roster, TeamStats};
pub use tiebreak::{Criterion, TieBreakRules};
