use rand::Rng;

use crate::constants::PLAYOFF_SEEDS;
use crate::error::{Error, Result};
use crate::scoring::GameResult;
use crate::standings::Standings;
use crate::tiebreak::{TieBreakRules, TieContext};

/// Playoff seeds of one conference, best first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConferenceSeeds {
    pub conference: String,
    pub teams: Vec<String>,
    /// Ties that had to be settled by a random draw.
    pub degenerate_ties: usize,
}

/// Rank the top teams of a conference.
///
/// Repeatedly takes the teams holding the most remaining wins, breaks the tie
/// if there is one, and moves the winner into the ranking.
pub fn seed_conference<R: Rng + ?Sized>(
    standings: &Standings,
    results: &[GameResult],
    conference: &str,
    rules: &TieBreakRules,
    rng: &mut R,
) -> Result<ConferenceSeeds> {
    let mut remaining: Vec<(&str, u32)> = standings
        .conference(conference)
        .into_iter()
        .map(|r| (r.team.as_str(), r.wins))
        .collect();
    if remaining.len() < PLAYOFF_SEEDS {
        return Err(Error::InsufficientTeams {
            conference: conference.to_string(),
            found: remaining.len(),
        });
    }

    let ctx = TieContext {
        standings,
        results,
        conference,
    };
    let mut teams = Vec::with_capacity(PLAYOFF_SEEDS);
    let mut degenerate_ties = 0;

    while teams.len() < PLAYOFF_SEEDS {
        let top = remaining.iter().map(|&(_, wins)| wins).max().unwrap_or(0);
        let tied: Vec<String> = remaining
            .iter()
            .filter(|&&(_, wins)| wins == top)
            .map(|&(team, _)| team.to_string())
            .collect();

        let team = if tied.len() == 1 {
            tied.into_iter().next().unwrap_or_default()
        } else {
            let resolution = rules.resolve(&ctx, &tied, rng);
            if resolution.degenerate {
                degenerate_ties += 1;
            }
            resolution.team
        };

        remaining.retain(|&(t, _)| t != team);
        teams.push(team);
    }

    Ok(ConferenceSeeds {
        conference: conference.to_string(),
        teams,
        degenerate_ties,
    })
}

/// Seed every conference in the standings, in conference order.
pub fn seed_all<R: Rng + ?Sized>(
    standings: &Standings,
    results: &[GameResult],
    rules: &TieBreakRules,
    rng: &mut R,
) -> Result<Vec<ConferenceSeeds>> {
    let mut seeds = Vec::with_capacity(standings.conferences().len());
    for conference in standings.conferences() {
        seeds.push(seed_conference(standings, results, conference, rules, rng)?);
    }
    Ok(seeds)
}
