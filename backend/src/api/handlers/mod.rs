use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::api::models::MessageResponse;
use crate::errors::LeagueError;
use crate::services::league::LeagueService;
use crate::session::{Confirmation, Session};

pub mod admin;
pub mod league;
pub mod ratings;
pub mod results;

/// Shared server state; the lock serializes every mutation.
///
/// Mutating handlers hold the write guard across the blocking SQLite commit
/// inside `LeagueService`. Each commit is a single small transaction.
pub struct AppState {
    pub league: RwLock<LeagueService>,
}

impl AppState {
    pub fn new(league: LeagueService) -> Self {
        Self {
            league: RwLock::new(league),
        }
    }
}

#[derive(Deserialize)]
pub struct ConfirmParams {
    pub confirm: Option<bool>,
}

impl ConfirmParams {
    pub fn confirmation(&self) -> Confirmation {
        Confirmation::from(self.confirm.unwrap_or(false))
    }
}

#[derive(Deserialize)]
pub struct RatingParams {
    pub team: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Session for this request, privileged when the bearer token is the secret
pub fn request_session(league: &LeagueService, headers: &HeaderMap) -> Session {
    league.session_for(bearer_token(headers))
}

pub fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(MessageResponse::new(text))).into_response()
}

impl IntoResponse for LeagueError {
    fn into_response(self) -> Response {
        let status = match &self {
            LeagueError::Validation(_) => StatusCode::BAD_REQUEST,
            LeagueError::PermissionDenied => StatusCode::UNAUTHORIZED,
            LeagueError::DuplicateSubmission { .. } | LeagueError::ResultAlreadyRecorded(_) => {
                StatusCode::CONFLICT
            }
            LeagueError::NotFound(_) => StatusCode::NOT_FOUND,
            LeagueError::NotConfirmed => StatusCode::PRECONDITION_FAILED,
            LeagueError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        message(status, self.to_string())
    }
}
