//! Python bindings, built with the `python` feature.

use pyo3::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::bracket;
use crate::config::{validate_seasons, SeasonMode, SimulationConfig};
use crate::data::LeagueData;
use crate::report;
use crate::scoring::NormalScoring;
use crate::simulation::Simulation;

/// Run the championship simulation over the CSV data in `data_dir`.
///
/// Returns a dict of team name to number of championships won.
#[pyfunction]
#[pyo3(signature = (
    data_dir,
    n_iter,
    season_to_play,
    season_data,
    playoffs_only = false,
    seed = None,
    update_stats = false
))]
fn simulate(
    data_dir: PathBuf,
    n_iter: usize,
    season_to_play: i32,
    season_data: i32,
    playoffs_only: bool,
    seed: Option<u64>,
    update_stats: bool,
) -> PyResult<HashMap<String, u64>> {
    validate_seasons(season_to_play, season_data, playoffs_only)?;
    let data = LeagueData::load(&data_dir)?;
    let calendar = data.regular_season(season_to_play);
    let roster = data.roster(season_to_play, season_data)?;

    let config = SimulationConfig {
        n_iter,
        seed,
        mode: if playoffs_only {
            SeasonMode::PlayoffsOnly
        } else {
            SeasonMode::FullSeason
        },
        ..Default::default()
    };
    let model = NormalScoring::new(update_stats);
    let sim = Simulation::from_history(&calendar, data.directory().clone(), roster, model, config)?;
    let report = sim.run()?;

    Ok(report
        .histogram
        .iter()
        .map(|(team, wins)| (team.to_string(), wins))
        .collect())
}

/// Reorder 8 seeds (best first) into first-round play order.
#[pyfunction]
fn play_order(seeds: Vec<String>) -> PyResult<Vec<String>> {
    bracket::play_order(&seeds).ok_or_else(|| {
        pyo3::exceptions::PyValueError::new_err(format!("expected 8 seeds, got {}", seeds.len()))
    })
}

/// Decimal odds for a win probability at a return-to-player factor.
#[pyfunction]
#[pyo3(signature = (win_probability, return_to_player = 0.85))]
fn calculate_odd(win_probability: f64, return_to_player: f64) -> Option<f64> {
    report::calculate_odd(win_probability, return_to_player)
}

#[pymodule]
fn playoff_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(play_order, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_odd, m)?)?;

    m.add("PLAYOFF_SEEDS", crate::constants::PLAYOFF_SEEDS)?;
    m.add("SERIES_WINS", crate::constants::SERIES_WINS)?;
    m.add("DEFAULT_RTP", crate::constants::DEFAULT_RTP)?;

    Ok(())
}
