//! Loading of historical games and team metadata from CSV.
//!
//! The games table needs the columns `game_id, season, away_name, home_name,
//! away_ftscore, home_ftscore` (extra columns are ignored). The team table
//! needs `team, conference, division`.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::constants::regular_season_length;
use crate::error::{Error, Result};
use crate::scoring::GameResult;
use crate::standings::TeamDirectory;
use crate::team::{Roster, TeamStats};

pub const GAMES_FILE: &str = "games.csv";
pub const TEAMS_FILE: &str = "teams_info.csv";

/// One row of the games table.
#[derive(Clone, Debug, Deserialize)]
pub struct GameRow {
    pub game_id: String,
    pub season: i32,
    pub away_name: String,
    pub home_name: String,
    pub away_ftscore: i32,
    pub home_ftscore: i32,
}

impl GameRow {
    pub fn to_result(&self) -> GameResult {
        GameResult::from_scores(
            &self.home_name,
            &self.away_name,
            self.home_ftscore,
            self.away_ftscore,
        )
    }
}

#[derive(Debug, Deserialize)]
struct TeamRow {
    team: String,
    conference: String,
    division: String,
}

/// Historical games plus team metadata.
#[derive(Clone, Debug)]
pub struct LeagueData {
    games: Vec<GameRow>,
    directory: TeamDirectory,
}

impl LeagueData {
    /// Load `games.csv` and `teams_info.csv` from a data directory.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let games = File::open(data_dir.join(GAMES_FILE))?;
        let teams = File::open(data_dir.join(TEAMS_FILE))?;
        let data = LeagueData::from_readers(games, teams)?;
        tracing::debug!(
            games = data.games.len(),
            teams = data.directory.len(),
            dir = %data_dir.display(),
            "loaded league data"
        );
        Ok(data)
    }

    pub fn from_readers<G: Read, T: Read>(games: G, teams: T) -> Result<Self> {
        let games = csv::Reader::from_reader(games)
            .deserialize()
            .collect::<std::result::Result<Vec<GameRow>, _>>()?;

        let mut directory = TeamDirectory::new();
        for row in csv::Reader::from_reader(teams).deserialize() {
            let row: TeamRow = row?;
            directory.insert(row.team.trim(), row.conference.trim(), row.division.trim());
        }

        Ok(LeagueData { games, directory })
    }

    pub fn directory(&self) -> &TeamDirectory {
        &self.directory
    }

    /// Regular-season results of a season: its games in `game_id` order,
    /// cut to the regular-season length.
    pub fn regular_season(&self, season: i32) -> Vec<GameResult> {
        let mut games: Vec<&GameRow> = self.games.iter().filter(|g| g.season == season).collect();
        games.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        games
            .into_iter()
            .take(regular_season_length(season))
            .map(GameRow::to_result)
            .collect()
    }

    /// Teams that played in a season, sorted.
    pub fn teams_in_season(&self, season: i32) -> Vec<String> {
        self.games
            .iter()
            .filter(|g| g.season == season)
            .flat_map(|g| [g.home_name.clone(), g.away_name.clone()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Scoring statistics for the teams of `season_to_play`, taken from the
    /// regular season of `season_data`.
    pub fn roster(&self, season_to_play: i32, season_data: i32) -> Result<Roster> {
        let history = self.regular_season(season_data);
        self.teams_in_season(season_to_play)
            .into_iter()
            .map(|team| {
                let (points, allowed): (Vec<f64>, Vec<f64>) = history
                    .iter()
                    .filter_map(|g| {
                        if g.home == team {
                            Some((g.home_score as f64, g.away_score as f64))
                        } else if g.away == team {
                            Some((g.away_score as f64, g.home_score as f64))
                        } else {
                            None
                        }
                    })
                    .unzip();
                if points.is_empty() {
                    return Err(Error::MissingTeamStats { team });
                }
                TeamStats::new(team, points, allowed)
            })
            .collect::<Result<Roster>>()
    }
}
