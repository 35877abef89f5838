use thiserror::Error;

/// Errors raised while loading data or running a simulation.
///
/// Every variant is fatal for the run: a trial that fails contributes nothing
/// to the champion histogram.
#[derive(Error, Debug)]
pub enum Error {
    #[error("team {team} appears in the schedule but has no conference/division metadata")]
    MissingTeamMetadata { team: String },

    #[error("conference {conference} has {found} teams, at least 8 are needed for the playoffs")]
    InsufficientTeams { conference: String, found: usize },

    #[error("no scoring statistics for team {team}")]
    MissingTeamStats { team: String },

    #[error("cannot build scoring statistics for team {team} from zero games")]
    EmptyScoreHistory { team: String },

    #[error("the playoffs need exactly 2 conferences, found {found}")]
    ConferenceCount { found: usize },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "python")]
impl From<Error> for pyo3::PyErr {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => pyo3::exceptions::PyIOError::new_err(e.to_string()),
            other => pyo3::exceptions::PyValueError::new_err(other.to_string()),
        }
    }
}
