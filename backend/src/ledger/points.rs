use std::collections::BTreeMap;

use crate::domain::{Team, TeamId};

use super::results::ResultLedger;

pub type PointsTable = BTreeMap<TeamId, u32>;

/// Derives every team's points from scratch: `win_points` per recorded win.
///
/// Results naming a team outside `team_ids` are ignored.
pub fn calculate_points(
    team_ids: impl IntoIterator<Item = TeamId>,
    results: &ResultLedger,
    win_points: u32,
) -> PointsTable {
    let mut table: PointsTable = team_ids.into_iter().map(|id| (id, 0)).collect();

    for (_, result) in results.iter() {
        if let Some(points) = table.get_mut(&result.winner_id) {
            *points += win_points;
        }
    }

    table
}

/// Rebuilds `Team::points` in place and returns the ids whose total changed.
pub fn recalculate(
    teams: &mut BTreeMap<TeamId, Team>,
    results: &ResultLedger,
    win_points: u32,
) -> Vec<TeamId> {
    let table = calculate_points(teams.keys().copied(), results, win_points);
    let mut changed = Vec::new();

    for (id, team) in teams.iter_mut() {
        let points = table.get(id).copied().unwrap_or(0);
        if team.points != points {
            team.points = points;
            changed.push(*id);
        }
    }

    log::debug!("Recalculated points for {} teams ({} changed)", teams.len(), changed.len());
    changed
}
