use std::collections::BTreeMap;

use crate::domain::{FixtureIndex, MatchResult, Schedule, SetScores, TeamId};
use crate::errors::ValidationError;

/// Fixture index → recorded result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultLedger {
    entries: BTreeMap<FixtureIndex, MatchResult>,
}

impl ResultLedger {
    pub fn get(&self, index: FixtureIndex) -> Option<&MatchResult> {
        self.entries.get(&index)
    }

    pub fn contains(&self, index: FixtureIndex) -> bool {
        self.entries.contains_key(&index)
    }

    pub fn upsert(&mut self, index: FixtureIndex, result: MatchResult) -> Option<MatchResult> {
        self.entries.insert(index, result)
    }

    pub fn remove(&mut self, index: FixtureIndex) -> Option<MatchResult> {
        self.entries.remove(&index)
    }

    pub fn clear(&mut self) -> Vec<FixtureIndex> {
        let removed = self.entries.keys().copied().collect();
        self.entries.clear();
        removed
    }

    /// Highest fixture index with a result ("last" is by index, not by time)
    pub fn last_index(&self) -> Option<FixtureIndex> {
        self.entries.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FixtureIndex, &MatchResult)> {
        self.entries.iter().map(|(index, result)| (*index, result))
    }

    pub fn wins_for(&self, team_id: TeamId) -> usize {
        self.entries
            .values()
            .filter(|result| result.winner_id == team_id)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Checks fixture, winner and score grammar, producing the entry to store.
pub fn validate_result(
    schedule: &Schedule,
    index: FixtureIndex,
    winner_id: TeamId,
    raw_score: &str,
) -> Result<MatchResult, ValidationError> {
    let fixture = schedule
        .get(index)
        .ok_or(ValidationError::UnknownFixture(index))?;

    if !fixture.involves(winner_id) {
        return Err(ValidationError::WinnerNotInFixture {
            fixture_index: index,
            winner_id,
        });
    }

    let score = SetScores::parse(raw_score)?;

    Ok(MatchResult {
        winner_id,
        score: Some(score.to_string()),
    })
}

/// Whether a stored entry still fits the schedule
pub fn is_consistent(schedule: &Schedule, index: FixtureIndex, result: &MatchResult) -> bool {
    schedule
        .get(index)
        .is_some_and(|fixture| fixture.involves(result.winner_id))
}
