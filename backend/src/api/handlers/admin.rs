use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{message, AppState};
use crate::api::models::LoginRequest;
use crate::session::Session;

/// Checks the shared secret. Clients then send it as a bearer token.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let league = state.league.read().await;
    let mut session = Session::new();

    if league.request_privilege(&mut session, &body.secret) {
        message(StatusCode::OK, "Admin mode enabled")
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}
