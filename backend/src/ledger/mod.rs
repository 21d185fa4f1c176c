pub mod points;
pub mod ratings;
pub mod results;

use std::collections::BTreeMap;

use crate::domain::{Team, TeamId};

pub use points::{calculate_points, recalculate};
pub use ratings::RatingLedger;
pub use results::ResultLedger;

/// Everything the league tracks; cloned to stage a mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueState {
    pub teams: BTreeMap<TeamId, Team>,
    pub results: ResultLedger,
    pub ratings: RatingLedger,
}

impl LeagueState {
    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.values().find(|team| team.name == name)
    }

    pub fn is_known_player(&self, player: &str) -> bool {
        self.teams
            .values()
            .any(|team| team.members.iter().any(|member| member == player))
    }

    /// Player names in team order
    pub fn players(&self) -> Vec<String> {
        self.teams
            .values()
            .flat_map(|team| team.members.iter().cloned())
            .collect()
    }
}
