use axum::{extract::State, response::Json};
use std::sync::Arc;

use super::AppState;
use crate::api::models::{FixtureItem, ResultItem, TableRow, TeamRef};
use crate::domain::TeamId;
use crate::services::league::LeagueService;

pub async fn get_table(State(state): State<Arc<AppState>>) -> Json<Vec<TableRow>> {
    let league = state.league.read().await;

    let rows = league
        .league_table()
        .into_iter()
        .enumerate()
        .map(|(i, team)| TableRow {
            rank: i + 1,
            team_id: team.id,
            name: team.name.clone(),
            members: team.members.clone(),
            wins: league.state().results.wins_for(team.id),
            points: team.points,
        })
        .collect();

    Json(rows)
}

pub async fn get_fixtures(State(state): State<Arc<AppState>>) -> Json<Vec<FixtureItem>> {
    let league = state.league.read().await;

    let fixtures = league
        .schedule()
        .fixtures()
        .iter()
        .map(|fixture| FixtureItem {
            index: fixture.index,
            team_a: team_ref(&league, fixture.team_a),
            team_b: team_ref(&league, fixture.team_b),
            result: league.result(fixture.index).map(|result| ResultItem {
                winner_id: result.winner_id,
                winner_name: team_name(&league, result.winner_id),
                score: result.score.clone(),
            }),
        })
        .collect();

    Json(fixtures)
}

fn team_ref(league: &LeagueService, id: TeamId) -> TeamRef {
    TeamRef {
        id,
        name: team_name(league, id),
    }
}

fn team_name(league: &LeagueService, id: TeamId) -> Option<String> {
    league.team(id).map(|team| team.name.clone())
}
