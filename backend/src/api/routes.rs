use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_login,
    league::{get_fixtures, get_table},
    ratings::{clear_last_rating, clear_ratings, delete_rating, edit_rating, get_ratings, record_rating},
    results::{clear_last_result, clear_results, delete_result, edit_result, record_result},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/table", get(get_table))
        .route("/api/fixtures", get(get_fixtures))
        .route("/api/results", delete(clear_results))
        .route("/api/results/clear-last", post(clear_last_result))
        .route(
            "/api/results/:index",
            post(record_result).put(edit_result).delete(delete_result),
        )
        .route("/api/ratings", get(get_ratings).delete(clear_ratings))
        .route("/api/ratings/clear-last", post(clear_last_rating))
        .route("/api/ratings/:player", post(record_rating))
        .route("/api/ratings/:player/:index", put(edit_rating).delete(delete_rating))
        .route("/api/admin/login", post(admin_login))
        .with_state(state)
}
