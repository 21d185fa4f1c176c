use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub rank: usize,
    pub team_id: u32,
    pub name: String,
    pub members: Vec<String>,
    pub wins: usize,
    pub points: u32,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub id: u32,
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub winner_id: u32,
    pub winner_name: Option<String>,
    pub score: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FixtureItem {
    pub index: usize,
    pub team_a: TeamRef,
    pub team_b: TeamRef,
    pub result: Option<ResultItem>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RatingItem {
    pub index: usize,
    pub from_team: String,
    pub score: u8,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRatingsItem {
    pub player: String,
    pub team_name: String,
    pub average: f64,
    pub ratings: Vec<RatingItem>,
    /// Score given by the team named in the `team` query parameter
    pub your_rating: Option<u8>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecordResultRequest {
    pub winner_id: u32,
    pub score: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecordRatingRequest {
    pub from_team: String,
    pub score: i64,
}

#[derive(Deserialize, Debug)]
pub struct EditRatingRequest {
    pub score: i64,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub secret: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
