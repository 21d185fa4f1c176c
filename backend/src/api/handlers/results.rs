use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{message, request_session, AppState, ConfirmParams};
use crate::api::models::RecordResultRequest;

pub async fn record_result(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    headers: HeaderMap,
    Json(body): Json<RecordResultRequest>,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.record_result(&session, index, body.winner_id, &body.score) {
        Ok(()) => message(StatusCode::CREATED, format!("Result recorded for fixture {index}")),
        Err(e) => e.into_response(),
    }
}

pub async fn edit_result(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    headers: HeaderMap,
    Json(body): Json<RecordResultRequest>,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.edit_result(&session, index, body.winner_id, &body.score) {
        Ok(()) => message(StatusCode::OK, format!("Result updated for fixture {index}")),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    headers: HeaderMap,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.delete_result(&session, index) {
        Ok(_) => message(StatusCode::OK, format!("Result deleted for fixture {index}")),
        Err(e) => e.into_response(),
    }
}

pub async fn clear_last_result(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.clear_last_result(&session) {
        Ok(index) => message(StatusCode::OK, format!("Result deleted for fixture {index}")),
        Err(e) => e.into_response(),
    }
}

pub async fn clear_results(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConfirmParams>,
    headers: HeaderMap,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.clear_all_results(&session, params.confirmation()) {
        Ok(count) => Json(serde_json::json!({ "cleared": count })).into_response(),
        Err(e) => e.into_response(),
    }
}
