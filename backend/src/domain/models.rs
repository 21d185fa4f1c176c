use serde::{Deserialize, Serialize};

pub type TeamId = u32;
pub type FixtureIndex = usize;

/// League team; `points` is derived from the result ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(alias = "players")]
    pub members: Vec<String>,
    #[serde(default)]
    pub points: u32,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members,
            points: 0,
        }
    }
}

/// Scheduled pairing, identified by its position in the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub index: FixtureIndex,
    pub team_a: TeamId,
    pub team_b: TeamId,
}

impl Fixture {
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_a == team_id || self.team_b == team_id
    }
}

/// Recorded outcome of one fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub winner_id: TeamId,
    #[serde(default)]
    pub score: Option<String>,
}

/// One peer rating of a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub from_team: String,
    pub score: u8,
    /// Ledger-wide submission number; 0 for documents written without one
    #[serde(default)]
    pub seq: u64,
}

/// Stored shape of a `ratings` document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRatings {
    #[serde(default)]
    pub ratings: Vec<Rating>,
}
