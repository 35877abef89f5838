use crate::constants::DEFAULT_SEED;
use crate::error::{Error, Result};
use crate::tiebreak::TieBreakRules;

/// Whether each trial replays the regular season.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeasonMode {
    /// Simulate every regular-season game, then reseed the playoffs.
    FullSeason,
    /// Keep a fixed playoff seeding and only simulate the playoffs.
    PlayoffsOnly,
}

/// Parameters of a simulation run.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Number of independent trials
    pub n_iter: usize,
    /// Master seed. `None` draws one from entropy.
    pub seed: Option<u64>,
    pub mode: SeasonMode,
    pub tie_break: TieBreakRules,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            n_iter: 1000,
            seed: Some(DEFAULT_SEED),
            mode: SeasonMode::FullSeason,
            tie_break: TieBreakRules::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_iter == 0 {
            return Err(Error::InvalidParameters(
                "the number of simulations must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check that the statistics season fits the season being played.
///
/// Statistics must come from an earlier season, or from the same season when
/// only the playoffs are simulated.
pub fn validate_seasons(season_to_play: i32, season_data: i32, playoffs_only: bool) -> Result<()> {
    if season_data > season_to_play {
        return Err(Error::InvalidParameters(format!(
            "season data ({}) must not be later than the season to play ({})",
            season_data, season_to_play
        )));
    }
    if season_data == season_to_play && !playoffs_only {
        return Err(Error::InvalidParameters(
            "season data can only equal the season to play when simulating the playoffs only"
                .to_string(),
        ));
    }
    Ok(())
}
