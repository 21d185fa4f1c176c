use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{message, request_session, AppState, ConfirmParams, RatingParams};
use crate::api::models::{EditRatingRequest, PlayerRatingsItem, RatingItem, RecordRatingRequest};

pub async fn get_ratings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RatingParams>,
) -> Json<Vec<PlayerRatingsItem>> {
    let league = state.league.read().await;
    let selected_team = params.team.as_deref().unwrap_or_default();

    let items = league
        .state()
        .teams
        .values()
        .flat_map(|team| team.members.iter().map(move |player| (team, player)))
        .map(|(team, player)| PlayerRatingsItem {
            player: player.clone(),
            team_name: team.name.clone(),
            average: league.average_rating(player),
            ratings: league
                .ratings_for(player)
                .iter()
                .enumerate()
                .map(|(index, rating)| RatingItem {
                    index,
                    from_team: rating.from_team.clone(),
                    score: rating.score,
                })
                .collect(),
            your_rating: league.rating_from(player, selected_team),
        })
        .collect();

    Json(items)
}

pub async fn record_rating(
    State(state): State<Arc<AppState>>,
    Path(player): Path<String>,
    headers: HeaderMap,
    Json(body): Json<RecordRatingRequest>,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.record_rating(&session, &player, &body.from_team, body.score) {
        Ok(()) => message(StatusCode::CREATED, format!("Rating recorded for {player}")),
        Err(e) => e.into_response(),
    }
}

pub async fn edit_rating(
    State(state): State<Arc<AppState>>,
    Path((player, index)): Path<(String, usize)>,
    headers: HeaderMap,
    Json(body): Json<EditRatingRequest>,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.edit_rating(&session, &player, index, body.score) {
        Ok(()) => message(StatusCode::OK, format!("Rating #{index} for {player} updated")),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_rating(
    State(state): State<Arc<AppState>>,
    Path((player, index)): Path<(String, usize)>,
    headers: HeaderMap,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.delete_rating(&session, &player, index) {
        Ok(_) => message(StatusCode::OK, format!("Rating #{index} for {player} deleted")),
        Err(e) => e.into_response(),
    }
}

pub async fn clear_last_rating(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.clear_last_rating(&session) {
        Ok((player, rating)) => message(
            StatusCode::OK,
            format!("Removed {}'s rating of {} from {}", player, rating.score, rating.from_team),
        ),
        Err(e) => e.into_response(),
    }
}

pub async fn clear_ratings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConfirmParams>,
    headers: HeaderMap,
) -> Response {
    let mut league = state.league.write().await;
    let session = request_session(&league, &headers);

    match league.clear_all_ratings(&session, params.confirmation()) {
        Ok(count) => Json(serde_json::json!({ "cleared": count })).into_response(),
        Err(e) => e.into_response(),
    }
}
