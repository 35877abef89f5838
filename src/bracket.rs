use rand::Rng;

use crate::constants::{HIGH_SEED_HOME_GAMES, PLAYOFF_SEEDS, PLAY_ORDER, SERIES_WINS};
use crate::error::{Error, Result};
use crate::scoring::{play_game, GameResult, ScoringModel};
use crate::seeding::ConferenceSeeds;
use crate::team::Roster;

/// Rearrange seeds (best first) into bracket play order, so that adjacent
/// entries meet in the first round.
///
/// Returns `None` unless exactly 8 seeds are given.
pub fn play_order(seeds: &[String]) -> Option<Vec<String>> {
    if seeds.len() != PLAYOFF_SEEDS {
        return None;
    }
    Some(PLAY_ORDER.iter().map(|&i| seeds[i].clone()).collect())
}

/// A completed best-of-seven series.
#[derive(Clone, Debug)]
pub struct SeriesResult {
    /// Side listed first in the bracket, holding home court in games 1, 2, 5 and 7
    pub high: String,
    pub low: String,
    pub high_wins: u32,
    pub low_wins: u32,
    pub games: Vec<GameResult>,
}

impl SeriesResult {
    pub fn winner(&self) -> &str {
        if self.high_wins == SERIES_WINS {
            &self.high
        } else {
            &self.low
        }
    }
}

/// Play games until one side has won four.
pub fn play_series<M: ScoringModel, R: Rng + ?Sized>(
    model: &M,
    roster: &mut Roster,
    high: &str,
    low: &str,
    rng: &mut R,
) -> Result<SeriesResult> {
    let mut high_wins = 0;
    let mut low_wins = 0;
    let mut games = Vec::new();

    while high_wins < SERIES_WINS && low_wins < SERIES_WINS {
        let high_home = HIGH_SEED_HOME_GAMES.contains(&(high_wins + low_wins));
        let (home, away) = if high_home { (high, low) } else { (low, high) };
        let game = play_game(model, roster, home, away, rng)?;
        if game.winner() == high {
            high_wins += 1;
        } else {
            low_wins += 1;
        }
        games.push(game);
    }

    tracing::trace!(high, low, high_wins, low_wins, "series finished");
    Ok(SeriesResult {
        high: high.to_string(),
        low: low.to_string(),
        high_wins,
        low_wins,
        games,
    })
}

/// Play rounds of series over a bracket in play order, pairing adjacent
/// entries, until one team is left.
pub fn play_bracket<M: ScoringModel, R: Rng + ?Sized>(
    mut order: Vec<String>,
    model: &M,
    roster: &mut Roster,
    rng: &mut R,
) -> Result<String> {
    while order.len() > 1 {
        let mut survivors = Vec::with_capacity(order.len() / 2);
        for pair in order.chunks(2) {
            match pair {
                [high, low] => {
                    let series = play_series(model, roster, high, low, rng)?;
                    survivors.push(series.winner().to_string());
                }
                // Odd entry out gets a bye
                [single] => survivors.push(single.clone()),
                _ => {}
            }
        }
        order = survivors;
    }
    Ok(order.pop().unwrap_or_default())
}

/// Play one conference's bracket from its 8 seeds.
pub fn play_conference<M: ScoringModel, R: Rng + ?Sized>(
    seeds: &ConferenceSeeds,
    model: &M,
    roster: &mut Roster,
    rng: &mut R,
) -> Result<String> {
    let order = play_order(&seeds.teams).ok_or_else(|| Error::InsufficientTeams {
        conference: seeds.conference.clone(),
        found: seeds.teams.len(),
    })?;
    play_bracket(order, model, roster, rng)
}

/// Result of a full playoff run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayoffOutcome {
    pub conference_winners: Vec<String>,
    pub champion: String,
}

/// Play both conference brackets, then the final between their winners.
/// The first conference's winner holds home court in the final.
pub fn play_playoffs<M: ScoringModel, R: Rng + ?Sized>(
    seeds: &[ConferenceSeeds],
    model: &M,
    roster: &mut Roster,
    rng: &mut R,
) -> Result<PlayoffOutcome> {
    if seeds.len() != 2 {
        return Err(Error::ConferenceCount { found: seeds.len() });
    }
    let mut conference_winners = Vec::with_capacity(seeds.len());
    for conference in seeds {
        conference_winners.push(play_conference(conference, model, roster, rng)?);
    }
    let champion = play_bracket(conference_winners.clone(), model, roster, rng)?;

    Ok(PlayoffOutcome {
        conference_winners,
        champion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SERIES_MAX_GAMES;
    use crate::scoring::NormalScoring;
    use crate::team::TeamStats;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Home side always wins.
    struct HomeWins;

    impl ScoringModel for HomeWins {
        fn play<R: Rng + ?Sized>(&self, home: &TeamStats, away: &TeamStats, _rng: &mut R) -> GameResult {
            GameResult::from_scores(&home.name, &away.name, 101, 100)
        }
    }

    /// Higher average scorer always wins.
    struct Stronger;

    impl ScoringModel for Stronger {
        fn play<R: Rng + ?Sized>(&self, home: &TeamStats, away: &TeamStats, _rng: &mut R) -> GameResult {
            if home.features().pts_avg > away.features().pts_avg {
                GameResult::from_scores(&home.name, &away.name, 110, 100)
            } else {
                GameResult::from_scores(&home.name, &away.name, 100, 110)
            }
        }
    }

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    /// Teams whose strength falls with their index.
    fn roster(teams: &[String]) -> Roster {
        teams
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let pts = 120.0 - i as f64;
                TeamStats::new(t.as_str(), vec![pts - 8.0, pts, pts + 8.0], vec![100.0, 105.0, 110.0]).unwrap()
            })
            .collect()
    }

    fn seeds(conference: &str, teams: Vec<String>) -> ConferenceSeeds {
        ConferenceSeeds {
            conference: conference.to_string(),
            teams,
            degenerate_ties: 0,
        }
    }

    #[test]
    fn test_play_order() {
        let seeds: Vec<String> = ["A", "B", "C", "D", "E", "F", "G", "H"].iter().map(|s| s.to_string()).collect();
        let order = play_order(&seeds).unwrap();
        assert_eq!(order, vec!["A", "H", "D", "E", "C", "F", "B", "G"]);
        assert!(play_order(&seeds[..7]).is_none());
    }

    #[test]
    fn test_series_home_court_pattern() {
        let teams = names("T", 2);
        let mut roster = roster(&teams);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let series = play_series(&HomeWins, &mut roster, "T0", "T1", &mut rng).unwrap();
        let hosts: Vec<&str> = series.games.iter().map(|g| g.home.as_str()).collect();
        assert_eq!(hosts, vec!["T0", "T0", "T1", "T1", "T0", "T1", "T0"]);
        assert_eq!((series.high_wins, series.low_wins), (4, 3));
        assert_eq!(series.winner(), "T0");
    }

    #[test]
    fn test_series_sweep_stops_at_four() {
        let teams = names("T", 2);
        let mut roster = roster(&teams);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let series = play_series(&Stronger, &mut roster, "T1", "T0", &mut rng).unwrap();
        assert_eq!(series.games.len(), 4);
        assert_eq!(series.winner(), "T0");
        assert_eq!((series.high_wins, series.low_wins), (0, 4));
    }

    #[test]
    fn test_favorites_win_conference() {
        let teams = names("W", 8);
        let mut roster = roster(&teams);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let winner = play_conference(&seeds("West", teams), &Stronger, &mut roster, &mut rng).unwrap();
        assert_eq!(winner, "W0");
    }

    #[test]
    fn test_playoffs_final() {
        let west = names("W", 8);
        let east = names("E", 8);
        // East teams are slightly weaker than their West counterparts
        let mut roster: Roster = west
            .iter()
            .enumerate()
            .map(|(i, t)| TeamStats::new(t.as_str(), vec![110.0 - i as f64], vec![100.0]).unwrap())
            .chain(east.iter().enumerate().map(|(i, t)| {
                TeamStats::new(t.as_str(), vec![109.5 - i as f64], vec![100.0]).unwrap()
            }))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let outcome = play_playoffs(
            &[seeds("West", west), seeds("East", east)],
            &Stronger,
            &mut roster,
            &mut rng,
        )
        .unwrap();
        assert_eq!(outcome.conference_winners, vec!["W0".to_string(), "E0".to_string()]);
        assert_eq!(outcome.champion, "W0");
    }

    #[test]
    fn test_playoffs_need_two_conferences() {
        let teams = names("W", 8);
        let mut roster = roster(&teams);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let err = play_playoffs(&[seeds("West", teams)], &Stronger, &mut roster, &mut rng).unwrap_err();
        assert!(matches!(err, Error::ConferenceCount { found: 1 }));
    }

    #[test]
    fn test_missing_stats_fails() {
        let teams = names("W", 8);
        let mut roster = roster(&teams[..7]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let err = play_conference(&seeds("West", teams), &Stronger, &mut roster, &mut rng).unwrap_err();
        assert!(matches!(err, Error::MissingTeamStats { team } if team == "W7"));
    }

    proptest! {
        #[test]
        fn prop_series_length(seed in any::<u64>()) {
            let teams = names("T", 2);
            let mut roster = roster(&teams);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let series = play_series(&NormalScoring::default(), &mut roster, "T0", "T1", &mut rng).unwrap();
            let n = series.games.len() as u32;
            prop_assert!((SERIES_WINS..=SERIES_MAX_GAMES).contains(&n));
            prop_assert_eq!(series.high_wins.max(series.low_wins), SERIES_WINS);
            prop_assert!(series.high_wins.min(series.low_wins) < SERIES_WINS);
            prop_assert_eq!(series.high_wins + series.low_wins, n);
        }
    }
}
