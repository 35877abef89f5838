/// Number of playoff entrants per conference
pub const PLAYOFF_SEEDS: usize = 8;

/// Wins needed to take a best-of-seven series
pub const SERIES_WINS: u32 = 4;

/// Maximum number of games in a series
pub const SERIES_MAX_GAMES: u32 = 2 * SERIES_WINS - 1;

/// Bracket play order by seed index: 1v8, 4v5, 3v6, 2v7
pub const PLAY_ORDER: [usize; PLAYOFF_SEEDS] = [0, 7, 3, 4, 2, 5, 1, 6];

/// Games (0-based) in which the higher-placed side of a series has home court.
/// Everything else is hosted by the other side (2-2-1-1-1).
pub const HIGH_SEED_HOME_GAMES: [u32; 4] = [0, 1, 4, 6];

/// Points added to the home team's sampled score
pub const HOME_ADVANTAGE: i32 = 1;

/// Replays of a drawn game before falling back to a coin flip
pub const MAX_REPLAYS: u32 = 100;

/// Default seed for reproducible runs
pub const DEFAULT_SEED: u64 = 42;

/// Default return-to-player factor for quoted odds
pub const DEFAULT_RTP: f64 = 0.85;

/// Regular-season length of a 30-team, 82-game league
pub const REGULAR_SEASON_GAMES: usize = 1230;

/// Regular-season length of the shortened 2011 lockout season
pub const LOCKOUT_SEASON_GAMES: usize = 990;

/// Season shortened by the 2011 lockout
pub const LOCKOUT_SEASON: i32 = 2011;

/// Number of regular-season games played in `season`.
pub fn regular_season_length(season: i32) -> usize {
    if season == LOCKOUT_SEASON {
        LOCKOUT_SEASON_GAMES
    } else {
        REGULAR_SEASON_GAMES
    }
}
