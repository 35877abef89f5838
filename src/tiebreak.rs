//! Tie-breaking between teams level on wins.
//!
//! A tie is broken by running an ordered list of criteria. Each criterion
//! takes the still-tied group and returns the subset that is best under it,
//! or the whole group when it cannot separate them. Groups of two and groups
//! of three or more use separate lists; once a larger group is cut down to
//! two, the pair is settled by the two-team list from its first criterion.
//! A group that survives every criterion is settled by a uniform random draw.

use rand::Rng;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::scoring::GameResult;
use crate::standings::Standings;

/// A single tie-break criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Criterion {
    /// Best win percentage in games among the tied teams.
    HeadToHead,
    /// Division leaders ahead of everyone else. No effect when every tied
    /// team leads its division or none does.
    DivisionChampion,
    /// Best win percentage against the division, when all tied teams share one.
    DivisionRecord,
    /// Best win percentage against the conference.
    ConferenceRecord,
}

/// Everything a criterion may look at.
#[derive(Clone, Copy)]
pub struct TieContext<'a> {
    pub standings: &'a Standings,
    pub results: &'a [GameResult],
    pub conference: &'a str,
}

impl Criterion {
    pub fn apply(&self, ctx: &TieContext<'_>, tied: &[String]) -> Vec<String> {
        match self {
            Criterion::HeadToHead => {
                let pool: Vec<&str> = tied.iter().map(String::as_str).collect();
                best_win_pct(ctx.results, &pool, tied)
            }
            Criterion::DivisionChampion => {
                let champions: Vec<String> = tied
                    .iter()
                    .filter(|t| ctx.standings.is_division_champion(t))
                    .cloned()
                    .collect();
                if champions.is_empty() || champions.len() == tied.len() {
                    tied.to_vec()
                } else {
                    champions
                }
            }
            Criterion::DivisionRecord => match shared_division(ctx, tied) {
                Some(division) => {
                    let pool = ctx.standings.division_members(ctx.conference, division);
                    best_win_pct(ctx.results, &pool, tied)
                }
                None => tied.to_vec(),
            },
            Criterion::ConferenceRecord => {
                let pool: Vec<&str> = ctx
                    .standings
                    .conference(ctx.conference)
                    .into_iter()
                    .map(|r| r.team.as_str())
                    .collect();
                best_win_pct(ctx.results, &pool, tied)
            }
        }
    }
}

fn shared_division<'a>(ctx: &TieContext<'a>, tied: &[String]) -> Option<&'a str> {
    let mut divisions = tied
        .iter()
        .map(|t| ctx.standings.get(t).map(|r| r.division.as_str()));
    let first = divisions.next()??;
    for division in divisions {
        if division? != first {
            return None;
        }
    }
    Some(first)
}

/// Wins over games played, compared exactly. No games counts as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct WinRecord {
    wins: u64,
    games: u64,
}

impl WinRecord {
    fn cmp_pct(&self, other: &WinRecord) -> Ordering {
        match (self.games, other.games) {
            (0, 0) => Ordering::Equal,
            (0, _) => 0.cmp(&other.wins),
            (_, 0) => self.wins.cmp(&0),
            _ => (self.wins * other.games).cmp(&(other.wins * self.games)),
        }
    }
}

/// Members of `tied` with the best win percentage in games played between
/// members of `pool`.
fn best_win_pct(results: &[GameResult], pool: &[&str], tied: &[String]) -> Vec<String> {
    let pool: HashSet<&str> = pool.iter().copied().collect();
    let mut records = vec![WinRecord::default(); tied.len()];

    for game in results {
        if !pool.contains(game.home.as_str()) || !pool.contains(game.away.as_str()) {
            continue;
        }
        for (team, record) in tied.iter().zip(records.iter_mut()) {
            if *team == game.home || *team == game.away {
                record.games += 1;
                if game.winner() == team {
                    record.wins += 1;
                }
            }
        }
    }

    let Some(best) = records.iter().copied().max_by(|a, b| a.cmp_pct(b)) else {
        return Vec::new();
    };
    tied.iter()
        .zip(records)
        .filter(|(_, r)| r.cmp_pct(&best) == Ordering::Equal)
        .map(|(t, _)| t.clone())
        .collect()
}

/// Ordered criteria for two-team and larger ties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TieBreakRules {
    pub two_team: Vec<Criterion>,
    pub multi_team: Vec<Criterion>,
}

impl Default for TieBreakRules {
    fn default() -> Self {
        TieBreakRules {
            two_team: vec![
                Criterion::HeadToHead,
                Criterion::DivisionChampion,
                Criterion::DivisionRecord,
                Criterion::ConferenceRecord,
            ],
            multi_team: vec![
                Criterion::DivisionChampion,
                Criterion::HeadToHead,
                Criterion::DivisionRecord,
                Criterion::ConferenceRecord,
            ],
        }
    }
}

/// Outcome of breaking a tie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub team: String,
    /// Every criterion was exhausted and the team was drawn at random.
    pub degenerate: bool,
}

impl TieBreakRules {
    /// Pick the best team of a tied group.
    ///
    /// Only the final random draw consumes randomness, so identical inputs
    /// and RNG state give identical results.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        ctx: &TieContext<'_>,
        tied: &[String],
        rng: &mut R,
    ) -> Resolution {
        let mut group = tied.to_vec();
        let mut criteria = if group.len() == 2 { &self.two_team } else { &self.multi_team };
        let mut step = 0;

        loop {
            if group.len() <= 1 {
                return Resolution {
                    team: group.pop().unwrap_or_default(),
                    degenerate: false,
                };
            }
            let Some(criterion) = criteria.get(step) else {
                break;
            };
            step += 1;

            let narrowed = criterion.apply(ctx, &group);
            if narrowed.is_empty() || narrowed.len() >= group.len() {
                continue;
            }
            tracing::trace!(?criterion, from = group.len(), to = narrowed.len(), "tie narrowed");
            let was_multi = group.len() > 2;
            group = narrowed;
            if was_multi && group.len() == 2 {
                criteria = &self.two_team;
                step = 0;
            }
        }

        let team = group.swap_remove(rng.gen_range(0..group.len()));
        tracing::debug!(
            conference = ctx.conference,
            %team,
            tied = ?tied,
            "tie-break criteria exhausted, drew at random"
        );
        Resolution { team, degenerate: true }
    }
}
