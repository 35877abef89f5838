use indicatif::ProgressBar;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::bracket::play_playoffs;
use crate::config::{SeasonMode, SimulationConfig};
use crate::error::{Error, Result};
use crate::scoring::{GameResult, ScoringModel};
use crate::season::{play_season, Fixture};
use crate::seeding::{seed_all, ConferenceSeeds};
use crate::standings::{Standings, TeamDirectory};
use crate::team::Roster;

/// Number of championships won by each team. Teams that never won are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChampionHistogram {
    counts: BTreeMap<String, u64>,
}

impl ChampionHistogram {
    pub fn new() -> Self {
        ChampionHistogram::default()
    }

    pub fn record(&mut self, champion: &str) {
        *self.counts.entry(champion.to_string()).or_insert(0) += 1;
    }

    pub fn merge(mut self, other: ChampionHistogram) -> Self {
        for (team, wins) in other.counts {
            *self.counts.entry(team).or_insert(0) += wins;
        }
        self
    }

    pub fn get(&self, team: &str) -> u64 {
        self.counts.get(team).copied().unwrap_or(0)
    }

    /// Total number of recorded championships.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(team, &wins)| (team.as_str(), wins))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Result of a whole run.
#[derive(Clone, Debug)]
pub struct SimulationReport {
    pub histogram: ChampionHistogram,
    pub trials: usize,
    /// Master seed the trial seeds were drawn from
    pub seed: u64,
    /// Seeding ties settled by a random draw, over all trials
    pub degenerate_ties: usize,
}

/// Outcome of one trial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialOutcome {
    pub champion: String,
    pub degenerate_ties: usize,
}

#[derive(Default)]
struct Tally {
    histogram: ChampionHistogram,
    degenerate_ties: usize,
}

impl Tally {
    fn add(mut self, outcome: TrialOutcome) -> Self {
        self.histogram.record(&outcome.champion);
        self.degenerate_ties += outcome.degenerate_ties;
        self
    }

    fn merge(self, other: Tally) -> Self {
        Tally {
            histogram: self.histogram.merge(other.histogram),
            degenerate_ties: self.degenerate_ties + other.degenerate_ties,
        }
    }
}

/// Monte Carlo driver over full seasons or playoffs only.
///
/// Schedule, metadata and the roster template are shared read-only by all
/// trials. Every trial gets its own roster copy and its own RNG, seeded from
/// a master stream, so results do not depend on how trials are spread over
/// threads.
pub struct Simulation<M: ScoringModel> {
    fixtures: Vec<Fixture>,
    directory: TeamDirectory,
    roster: Roster,
    fixed_seeds: Option<Vec<ConferenceSeeds>>,
    model: M,
    config: SimulationConfig,
    seed: u64,
}

impl<M: ScoringModel> Simulation<M> {
    /// Simulation replaying `fixtures` every trial.
    ///
    /// Every team in the schedule must have metadata and statistics.
    pub fn new(
        fixtures: Vec<Fixture>,
        directory: TeamDirectory,
        roster: Roster,
        model: M,
        config: SimulationConfig,
    ) -> Result<Self> {
        config.validate()?;
        for fixture in &fixtures {
            for team in [&fixture.home, &fixture.away] {
                directory.get(team)?;
                roster.get(team)?;
            }
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Simulation {
            fixtures,
            directory,
            roster,
            fixed_seeds: None,
            model,
            config,
            seed,
        })
    }

    /// Simulation over a historical regular season.
    ///
    /// In playoffs-only mode the playoff field is seeded once from the real
    /// results and reused by every trial.
    pub fn from_history(
        history: &[GameResult],
        directory: TeamDirectory,
        roster: Roster,
        model: M,
        config: SimulationConfig,
    ) -> Result<Self> {
        let fixtures = history.iter().map(Fixture::from).collect();
        let mut sim = Simulation::new(fixtures, directory, roster, model, config)?;
        if sim.config.mode == SeasonMode::PlayoffsOnly {
            let seeds = sim.seed_history(history)?;
            sim.fixed_seeds = Some(seeds);
        }
        Ok(sim)
    }

    /// Use a fixed playoff field in playoffs-only mode.
    pub fn with_seeding(mut self, seeds: Vec<ConferenceSeeds>) -> Self {
        self.fixed_seeds = Some(seeds);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn fixed_seeds(&self) -> Option<&[ConferenceSeeds]> {
        self.fixed_seeds.as_deref()
    }

    fn seed_history(&self, history: &[GameResult]) -> Result<Vec<ConferenceSeeds>> {
        let standings = Standings::from_results(history, &self.directory)?;
        // Separate stream from the one producing trial seeds
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(1);
        seed_all(&standings, history, &self.config.tie_break, &mut rng)
    }

    fn trial_seeds(&self) -> Vec<u64> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..self.config.n_iter).map(|_| rng.gen::<u64>()).collect()
    }

    /// Run one trial from its own seed.
    pub fn run_trial(&self, trial_seed: u64) -> Result<TrialOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(trial_seed);
        let mut roster = self.roster.clone();

        let (seeds, degenerate_ties) = match (&self.config.mode, &self.fixed_seeds) {
            (SeasonMode::PlayoffsOnly, Some(seeds)) => (seeds.clone(), 0),
            (SeasonMode::PlayoffsOnly, None) => {
                return Err(Error::InvalidParameters(
                    "playoffs-only mode needs a fixed playoff seeding".to_string(),
                ))
            }
            (SeasonMode::FullSeason, _) => {
                let results = play_season(&self.fixtures, &self.model, &mut roster, &mut rng)?;
                let standings = Standings::from_results(&results, &self.directory)?;
                let seeds = seed_all(&standings, &results, &self.config.tie_break, &mut rng)?;
                let ties = seeds.iter().map(|s| s.degenerate_ties).sum();
                (seeds, ties)
            }
        };

        let outcome = play_playoffs(&seeds, &self.model, &mut roster, &mut rng)?;
        tracing::trace!(champion = %outcome.champion, "trial finished");
        Ok(TrialOutcome {
            champion: outcome.champion,
            degenerate_ties,
        })
    }

    /// Run all trials in parallel and count championships.
    ///
    /// Any failing trial aborts the run.
    pub fn run(&self) -> Result<SimulationReport> {
        self.run_with_progress(&ProgressBar::hidden())
    }

    /// Same as [`Simulation::run`], ticking `progress` once per finished trial.
    pub fn run_with_progress(&self, progress: &ProgressBar) -> Result<SimulationReport> {
        tracing::info!(
            n_iter = self.config.n_iter,
            seed = self.seed,
            mode = ?self.config.mode,
            "starting simulations"
        );
        progress.set_length(self.config.n_iter as u64);

        let tally = self
            .trial_seeds()
            .par_iter()
            .map(|&trial_seed| {
                let outcome = self.run_trial(trial_seed);
                progress.inc(1);
                outcome
            })
            .try_fold(Tally::default, |tally, outcome| outcome.map(|o| tally.add(o)))
            .try_reduce(Tally::default, |a, b| Ok(a.merge(b)))?;
        progress.finish_and_clear();

        // The fixed playoff field is seeded once, not per trial
        let seeding_ties: usize = match (&self.config.mode, &self.fixed_seeds) {
            (SeasonMode::PlayoffsOnly, Some(seeds)) => {
                seeds.iter().map(|s| s.degenerate_ties).sum()
            }
            _ => 0,
        };
        let degenerate_ties = tally.degenerate_ties + seeding_ties;

        if degenerate_ties > 0 {
            tracing::info!(count = degenerate_ties, "ties settled by random draw");
        }
        tracing::info!(champions = tally.histogram.len(), "simulations finished");

        Ok(SimulationReport {
            histogram: tally.histogram,
            trials: self.config.n_iter,
            seed: self.seed,
            degenerate_ties,
        })
    }
}
