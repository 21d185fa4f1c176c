use thiserror::Error;

/// Input rejected before any ledger is touched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("fixture {0} does not exist")]
    UnknownFixture(usize),

    #[error("team {winner_id} did not play in fixture {fixture_index}")]
    WinnerNotInFixture { fixture_index: usize, winner_id: u32 },

    #[error("no score entered")]
    MissingScore,

    #[error("invalid set score: '{0}'")]
    InvalidSetScore(String),

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("select your team first")]
    MissingTeam,

    #[error("unknown team: {0}")]
    UnknownTeam(String),
}

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("admin privileges required")]
    PermissionDenied,

    #[error("{from_team} already rated {player}")]
    DuplicateSubmission { player: String, from_team: String },

    #[error("a result for fixture {0} is already recorded")]
    ResultAlreadyRecorded(usize),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("destructive operation was not confirmed")]
    NotConfirmed,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type LeagueResult<T> = Result<T, LeagueError>;

impl LeagueError {
    pub fn not_found(what: impl Into<String>) -> Self {
        LeagueError::NotFound(what.into())
    }

    /// Rejections caused by the caller's input rather than the store
    pub fn is_rejection(&self) -> bool {
        !matches!(self, LeagueError::Storage(_))
    }
}
