use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::scoring::GameResult;

/// Conference and division membership of a team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamInfo {
    pub conference: String,
    pub division: String,
}

/// Static team metadata, keyed by team name.
///
/// Conferences are remembered in the order they were first seen, which fixes
/// the order conference winners meet in the final.
#[derive(Clone, Debug, Default)]
pub struct TeamDirectory {
    teams: HashMap<String, TeamInfo>,
    conferences: Vec<String>,
}

impl TeamDirectory {
    pub fn new() -> Self {
        TeamDirectory::default()
    }

    pub fn insert(&mut self, team: &str, conference: &str, division: &str) {
        if !self.conferences.iter().any(|c| c == conference) {
            self.conferences.push(conference.to_string());
        }
        self.teams.insert(
            team.to_string(),
            TeamInfo {
                conference: conference.to_string(),
                division: division.to_string(),
            },
        );
    }

    pub fn get(&self, team: &str) -> Result<&TeamInfo> {
        self.teams
            .get(team)
            .ok_or_else(|| Error::MissingTeamMetadata { team: team.to_string() })
    }

    pub fn conferences(&self) -> &[String] {
        &self.conferences
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Season record of one team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamRecord {
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub conference: String,
    pub division: String,
}

/// Win/loss records of every team appearing in a completed schedule.
#[derive(Clone, Debug)]
pub struct Standings {
    records: BTreeMap<String, TeamRecord>,
    conferences: Vec<String>,
}

impl Standings {
    /// Tally a completed schedule. Every team in it must have metadata.
    pub fn from_results(results: &[GameResult], directory: &TeamDirectory) -> Result<Self> {
        let mut records: BTreeMap<String, TeamRecord> = BTreeMap::new();

        for game in results {
            for team in [&game.home, &game.away] {
                if !records.contains_key(team.as_str()) {
                    let info = directory.get(team)?;
                    records.insert(
                        team.clone(),
                        TeamRecord {
                            team: team.clone(),
                            wins: 0,
                            losses: 0,
                            conference: info.conference.clone(),
                            division: info.division.clone(),
                        },
                    );
                }
            }
            if let Some(winner) = records.get_mut(game.winner()) {
                winner.wins += 1;
            }
            if let Some(loser) = records.get_mut(game.loser()) {
                loser.losses += 1;
            }
        }

        let conferences = directory
            .conferences()
            .iter()
            .filter(|c| records.values().any(|r| &r.conference == *c))
            .cloned()
            .collect();

        Ok(Standings { records, conferences })
    }

    pub fn get(&self, team: &str) -> Option<&TeamRecord> {
        self.records.get(team)
    }

    /// Conferences present in the standings, in directory order.
    pub fn conferences(&self) -> &[String] {
        &self.conferences
    }

    /// Records of a conference, sorted by team name.
    pub fn conference(&self, conference: &str) -> Vec<&TeamRecord> {
        self.records.values().filter(|r| r.conference == conference).collect()
    }

    /// Members of a division (within its conference), sorted by team name.
    pub fn division_members(&self, conference: &str, division: &str) -> Vec<&str> {
        self.records
            .values()
            .filter(|r| r.conference == conference && r.division == division)
            .map(|r| r.team.as_str())
            .collect()
    }

    /// Whether the team holds the most wins in its division. Teams level at
    /// the top of a division all count as champions.
    pub fn is_division_champion(&self, team: &str) -> bool {
        let Some(record) = self.records.get(team) else {
            return false;
        };
        let best = self
            .records
            .values()
            .filter(|r| r.conference == record.conference && r.division == record.division)
            .map(|r| r.wins)
            .max()
            .unwrap_or(0);
        record.wins == best
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> TeamDirectory {
        let mut dir = TeamDirectory::new();
        dir.insert("A", "West", "Pacific");
        dir.insert("B", "West", "Pacific");
        dir.insert("C", "West", "Northwest");
        dir.insert("D", "East", "Atlantic");
        dir
    }

    #[test]
    fn test_home_and_away_wins_counted() {
        let results = vec![
            GameResult::from_scores("A", "B", 100, 90),
            GameResult::from_scores("B", "A", 100, 90),
            GameResult::from_scores("C", "A", 80, 95),
            GameResult::from_scores("D", "C", 99, 98),
        ];
        let standings = Standings::from_results(&results, &directory()).unwrap();

        let a = standings.get("A").unwrap();
        assert_eq!((a.wins, a.losses), (2, 1));
        let b = standings.get("B").unwrap();
        assert_eq!((b.wins, b.losses), (1, 1));
        let c = standings.get("C").unwrap();
        assert_eq!((c.wins, c.losses), (0, 2));
        assert_eq!(c.division, "Northwest");

        let total_wins: u32 = standings.iter().map(|r| r.wins).sum();
        assert_eq!(total_wins as usize, results.len());
    }

    #[test]
    fn test_missing_metadata() {
        let results = vec![GameResult::from_scores("A", "Ghosts", 100, 90)];
        let err = Standings::from_results(&results, &directory()).unwrap_err();
        assert!(matches!(err, Error::MissingTeamMetadata { team } if team == "Ghosts"));
    }

    #[test]
    fn test_conferences_and_divisions() {
        let results = vec![
            GameResult::from_scores("A", "B", 100, 90),
            GameResult::from_scores("A", "B", 100, 90),
            GameResult::from_scores("C", "D", 100, 90),
        ];
        let standings = Standings::from_results(&results, &directory()).unwrap();

        assert_eq!(standings.conferences(), &["West".to_string(), "East".to_string()]);
        assert_eq!(standings.conference("West").len(), 3);
        assert_eq!(standings.division_members("West", "Pacific"), vec!["A", "B"]);
        assert!(standings.is_division_champion("A"));
        assert!(!standings.is_division_champion("B"));
        // Only team in its division
        assert!(standings.is_division_champion("C"));
        assert!(!standings.is_division_champion("Z"));
    }
}
