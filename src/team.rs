use statrs::statistics::Statistics;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Rolling scoring history of a team.
///
/// The windows hold the points the team scored and the points it allowed in
/// its most recent games, oldest first. Both windows keep a fixed length: a
/// new game pushes the oldest one out.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamStats {
    pub name: String,
    points: Vec<f64>,
    points_allowed: Vec<f64>,
    features: Features,
}

/// Distribution parameters derived from the score windows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Features {
    pub pts_avg: f64,
    pub pts_std: f64,
    pub opp_avg: f64,
    pub opp_std: f64,
}

impl Features {
    fn from_windows(points: &[f64], points_allowed: &[f64]) -> Self {
        Features {
            pts_avg: points.iter().mean(),
            pts_std: points.iter().population_std_dev(),
            opp_avg: points_allowed.iter().mean(),
            opp_std: points_allowed.iter().population_std_dev(),
        }
    }
}

impl TeamStats {
    /// Build statistics from past games. Both windows must be non-empty.
    pub fn new(
        name: impl Into<String>,
        points: Vec<f64>,
        points_allowed: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if points.is_empty() || points_allowed.is_empty() {
            return Err(Error::EmptyScoreHistory { team: name });
        }
        let features = Features::from_windows(&points, &points_allowed);
        Ok(TeamStats {
            name,
            points,
            points_allowed,
            features,
        })
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn points_allowed(&self) -> &[f64] {
        &self.points_allowed
    }

    /// Statistics after one more game: the oldest entry of each window is
    /// replaced by the new result.
    pub fn after_game(&self, scored: i32, allowed: i32) -> Self {
        let points = roll(&self.points, scored as f64);
        let points_allowed = roll(&self.points_allowed, allowed as f64);
        let features = Features::from_windows(&points, &points_allowed);
        TeamStats {
            name: self.name.clone(),
            points,
            points_allowed,
            features,
        }
    }
}

fn roll(window: &[f64], new: f64) -> Vec<f64> {
    window.iter().skip(1).copied().chain(std::iter::once(new)).collect()
}

/// Statistics for every team taking part in one trial.
///
/// A simulation keeps one read-only template and hands each trial its own
/// clone, so stat updates never leak between trials.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    teams: HashMap<String, TeamStats>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    pub fn insert(&mut self, stats: TeamStats) {
        self.teams.insert(stats.name.clone(), stats);
    }

    pub fn get(&self, name: &str) -> Result<&TeamStats> {
        self.teams
            .get(name)
            .ok_or_else(|| Error::MissingTeamStats { team: name.to_string() })
    }

    /// Replace a team's statistics with their post-game value.
    pub fn record_game(&mut self, name: &str, scored: i32, allowed: i32) -> Result<()> {
        let updated = self.get(name)?.after_game(scored, allowed);
        self.teams.insert(name.to_string(), updated);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.teams.contains_key(name)
    }

    /// Team names in sorted order.
    pub fn team_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.teams.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

impl FromIterator<TeamStats> for Roster {
    fn from_iter<I: IntoIterator<Item = TeamStats>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for stats in iter {
            roster.insert(stats);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features() {
        let team = TeamStats::new("A", vec![100.0, 110.0], vec![90.0, 90.0]).unwrap();
        let f = team.features();
        assert!((f.pts_avg - 105.0).abs() < 1e-10);
        assert!((f.pts_std - 5.0).abs() < 1e-10, "population std expected, got {}", f.pts_std);
        assert!((f.opp_avg - 90.0).abs() < 1e-10);
        assert!(f.opp_std.abs() < 1e-10);
    }

    #[test]
    fn test_empty_history_rejected() {
        let err = TeamStats::new("A", vec![], vec![90.0]).unwrap_err();
        assert!(matches!(err, Error::EmptyScoreHistory { team } if team == "A"));
    }

    #[test]
    fn test_after_game_rolls_window() {
        let team = TeamStats::new("A", vec![100.0, 110.0, 120.0], vec![90.0, 95.0, 100.0]).unwrap();
        let next = team.after_game(130, 80);

        assert_eq!(next.points(), &[110.0, 120.0, 130.0]);
        assert_eq!(next.points_allowed(), &[95.0, 100.0, 80.0]);
        assert!((next.features().pts_avg - 120.0).abs() < 1e-10);

        // Previous value is untouched
        assert_eq!(team.points(), &[100.0, 110.0, 120.0]);
    }

    #[test]
    fn test_roster_record_game() {
        let mut roster: Roster = vec![
            TeamStats::new("A", vec![100.0, 100.0], vec![100.0, 100.0]).unwrap(),
            TeamStats::new("B", vec![90.0, 90.0], vec![110.0, 110.0]).unwrap(),
        ]
        .into_iter()
        .collect();

        roster.record_game("A", 120, 80).unwrap();
        assert_eq!(roster.get("A").unwrap().points(), &[100.0, 120.0]);
        assert_eq!(roster.team_names(), vec!["A".to_string(), "B".to_string()]);
        assert!(matches!(
            roster.record_game("Z", 1, 0),
            Err(Error::MissingTeamStats { .. })
        ));
    }
}
