//! Championship odds by Monte Carlo simulation of a basketball season.
//!
//! ```bash
//! # 1000 full seasons of 2018 sampled from 2017 scores
//! playoff-sim 1000 2018 2017
//!
//! # Playoffs only, seeded from the real 2018 regular season, saved to CSV
//! playoff-sim 1000 2018 2018 --playoffs-only --save
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use playoff_core::config::{validate_seasons, SeasonMode, SimulationConfig};
use playoff_core::constants::{DEFAULT_RTP, DEFAULT_SEED};
use playoff_core::data::LeagueData;
use playoff_core::report::{build_rows, render_table, results_path, write_csv};
use playoff_core::scoring::NormalScoring;
use playoff_core::simulation::Simulation;

/// Simulate full seasons or playoffs only to estimate each team's chance of
/// winning the championship. Scores are sampled from normal distributions
/// fitted to each team's regular season in `season_data`.
#[derive(Parser, Debug)]
#[command(name = "playoff-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of simulations
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    n_iter: u64,

    /// Season to simulate
    season_to_play: i32,

    /// Season whose scores are sampled
    season_data: i32,

    /// Only play the playoffs, seeded from the real regular season of `season_to_play`
    #[arg(long)]
    playoffs_only: bool,

    /// Save the results as CSV in the data directory
    #[arg(long)]
    save: bool,

    /// Directory holding games.csv and teams_info.csv
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Random seed for reproducible results
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Return-to-player factor for the quoted odds
    #[arg(long, default_value_t = DEFAULT_RTP)]
    rtp: f64,

    /// Feed simulated scores back into the teams' rolling statistics
    #[arg(long)]
    update_stats: bool,

    /// Hide the progress bar
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("warn,playoff_core=info,playoff_sim=info")
        }))
        .with_target(false)
        .init();

    let args = Args::parse();
    validate_seasons(args.season_to_play, args.season_data, args.playoffs_only)?;
    let n_iter = usize::try_from(args.n_iter).context("number of simulations too large")?;

    let data = LeagueData::load(&args.data_dir)
        .with_context(|| format!("failed to load data from {}", args.data_dir.display()))?;
    let calendar = data.regular_season(args.season_to_play);
    let roster = data.roster(args.season_to_play, args.season_data)?;
    info!(
        season = args.season_to_play,
        games = calendar.len(),
        teams = roster.len(),
        "season loaded"
    );

    let config = SimulationConfig {
        n_iter,
        seed: Some(args.seed),
        mode: if args.playoffs_only {
            SeasonMode::PlayoffsOnly
        } else {
            SeasonMode::FullSeason
        },
        ..Default::default()
    };
    let model = NormalScoring::new(args.update_stats);
    let teams = roster.team_names();
    let sim = Simulation::from_history(&calendar, data.directory().clone(), roster, model, config)?;

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(n_iter as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40}] {pos}/{len} simulations ({eta})")?
                .progress_chars("=> "),
        );
        bar
    };
    let report = sim.run_with_progress(&progress)?;
    let rows = build_rows(&report.histogram, &teams, report.trials, args.rtp);
    print!("{}", render_table(&rows, args.rtp));

    if args.save {
        let path = results_path(
            &args.data_dir,
            n_iter,
            args.season_to_play,
            args.season_data,
            args.playoffs_only,
        );
        write_csv(&rows, args.rtp, &path)?;
    }

    Ok(())
}
