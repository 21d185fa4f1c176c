use anyhow::Result;
use log::{error, info, warn};

use crate::config::settings::LeagueSettings;
use crate::domain::{FixtureIndex, MatchResult, Rating, Schedule, Team, TeamId};
use crate::errors::{LeagueError, LeagueResult, ValidationError};
use crate::ledger::{self, LeagueState, ratings, results};
use crate::services::snapshot;
use crate::session::{Confirmation, PrivilegeGate, Session};
use crate::store::{Repository, Write};

/// League state plus the store it is persisted to.
///
/// Every mutation stages a copy of the state, applies the change, rebuilds
/// points from the result ledger and commits the resulting writes. The live
/// state is replaced only after the store accepted the batch, so a rejected
/// or failed call leaves it exactly as it was.
pub struct LeagueService {
    schedule: Schedule,
    state: LeagueState,
    settings: LeagueSettings,
    gate: PrivilegeGate,
    repo: Box<dyn Repository>,
}

impl LeagueService {
    pub fn open(repo: Box<dyn Repository>, settings: LeagueSettings) -> Result<Self> {
        Self::with_schedule(repo, settings, Schedule::default())
    }

    /// Loads the store, seeding teams and reconciling drifted points.
    pub fn with_schedule(
        repo: Box<dyn Repository>,
        settings: LeagueSettings,
        schedule: Schedule,
    ) -> Result<Self> {
        let documents = repo.load()?;
        let (mut state, mut writes) = snapshot::load_state(&documents, &schedule)?;

        let drifted = ledger::recalculate(&mut state.teams, &state.results, settings.win_points);
        if !drifted.is_empty() {
            warn!("Stored points drifted for teams {:?}, rewriting", drifted);
        }
        for id in drifted {
            if let Some(team) = state.teams.get(&id) {
                writes.push(snapshot::team_write(team)?);
            }
        }
        repo.commit(&writes)?;

        info!(
            "League loaded: {} teams, {} fixtures, {} results",
            state.teams.len(),
            schedule.len(),
            state.results.len()
        );

        Ok(Self {
            schedule,
            state,
            gate: PrivilegeGate::new(settings.admin_secret.clone()),
            settings,
            repo,
        })
    }

    // --- Reads ---

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn state(&self) -> &LeagueState {
        &self.state
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.state.teams.get(&id)
    }

    /// Teams by points, highest first; ties keep id order
    pub fn league_table(&self) -> Vec<&Team> {
        let mut table: Vec<&Team> = self.state.teams.values().collect();
        table.sort_by(|a, b| b.points.cmp(&a.points).then(a.id.cmp(&b.id)));
        table
    }

    pub fn result(&self, index: FixtureIndex) -> Option<&MatchResult> {
        self.state.results.get(index)
    }

    pub fn players(&self) -> Vec<String> {
        self.state.players()
    }

    pub fn ratings_for(&self, player: &str) -> &[Rating] {
        self.state.ratings.ratings_for(player)
    }

    pub fn rating_from(&self, player: &str, from_team: &str) -> Option<u8> {
        self.state.ratings.rating_from(player, from_team)
    }

    pub fn average_rating(&self, player: &str) -> f64 {
        self.state.ratings.average(player)
    }

    pub fn export(&self) -> Result<serde_json::Value> {
        snapshot::export(&self.state, &self.schedule)
    }

    // --- Privilege gate ---

    pub fn request_privilege(&self, session: &mut Session, secret: &str) -> bool {
        session.request_privilege(&self.gate, secret)
    }

    /// Session for one request carrying a secret; unprivileged if it is wrong
    pub fn session_for(&self, secret: Option<&str>) -> Session {
        match secret {
            Some(secret) if self.gate.verify(secret) => Session::privileged(),
            _ => Session::new(),
        }
    }

    // --- Result ledger ---

    /// Records a fixture outcome. Once a result exists only a privileged
    /// session may overwrite it.
    pub fn record_result(
        &mut self,
        session: &Session,
        index: FixtureIndex,
        winner_id: TeamId,
        raw_score: &str,
    ) -> LeagueResult<()> {
        let outcome = self.upsert_result(session, index, winner_id, raw_score, false);
        log_outcome("record result", outcome)
    }

    pub fn edit_result(
        &mut self,
        session: &Session,
        index: FixtureIndex,
        winner_id: TeamId,
        raw_score: &str,
    ) -> LeagueResult<()> {
        let outcome = require_privilege(session)
            .and_then(|_| self.upsert_result(session, index, winner_id, raw_score, true));
        log_outcome("edit result", outcome)
    }

    fn upsert_result(
        &mut self,
        session: &Session,
        index: FixtureIndex,
        winner_id: TeamId,
        raw_score: &str,
        must_exist: bool,
    ) -> LeagueResult<()> {
        let result = results::validate_result(&self.schedule, index, winner_id, raw_score)?;
        let exists = self.state.results.contains(index);

        if must_exist && !exists {
            return Err(LeagueError::not_found(format!("result for fixture {index}")));
        }
        if exists && !session.is_privileged() {
            return Err(LeagueError::ResultAlreadyRecorded(index));
        }

        let write = snapshot::result_write(index, &result)?;
        let mut staged = self.state.clone();
        staged.results.upsert(index, result);
        self.commit(staged, vec![write])
    }

    pub fn delete_result(
        &mut self,
        session: &Session,
        index: FixtureIndex,
    ) -> LeagueResult<MatchResult> {
        let outcome = require_privilege(session).and_then(|_| self.remove_result(index));
        log_outcome("delete result", outcome)
    }

    /// Deletes the result with the highest fixture index.
    pub fn clear_last_result(&mut self, session: &Session) -> LeagueResult<FixtureIndex> {
        let outcome = require_privilege(session).and_then(|_| {
            let index = self
                .state
                .results
                .last_index()
                .ok_or_else(|| LeagueError::not_found("any recorded result"))?;
            self.remove_result(index).map(|_| index)
        });
        log_outcome("clear last result", outcome)
    }

    fn remove_result(&mut self, index: FixtureIndex) -> LeagueResult<MatchResult> {
        let mut staged = self.state.clone();
        let removed = staged
            .results
            .remove(index)
            .ok_or_else(|| LeagueError::not_found(format!("result for fixture {index}")))?;

        self.commit(staged, vec![snapshot::result_delete(index)])?;
        Ok(removed)
    }

    pub fn clear_all_results(
        &mut self,
        session: &Session,
        confirmation: Confirmation,
    ) -> LeagueResult<usize> {
        let outcome = require_privilege(session)
            .and_then(|_| require_confirmation(confirmation))
            .and_then(|_| {
                let mut staged = self.state.clone();
                let writes: Vec<Write> = staged
                    .results
                    .clear()
                    .into_iter()
                    .map(snapshot::result_delete)
                    .collect();
                let cleared = writes.len();
                self.commit(staged, writes).map(|_| cleared)
            });
        log_outcome("clear all results", outcome)
    }

    // --- Rating ledger ---

    /// Appends a rating. A team may rate each player once unless the session
    /// is privileged.
    pub fn record_rating(
        &mut self,
        session: &Session,
        player: &str,
        from_team: &str,
        score: i64,
    ) -> LeagueResult<()> {
        let outcome = self.append_rating(session, player, from_team, score);
        log_outcome("record rating", outcome)
    }

    fn append_rating(
        &mut self,
        session: &Session,
        player: &str,
        from_team: &str,
        score: i64,
    ) -> LeagueResult<()> {
        if from_team.trim().is_empty() {
            return Err(ValidationError::MissingTeam.into());
        }
        let score = ratings::validate_score(score)?;
        self.ensure_player(player)?;
        if self.state.team_by_name(from_team).is_none() {
            return Err(ValidationError::UnknownTeam(from_team.to_string()).into());
        }

        if self.state.ratings.has_rating_from(player, from_team) && !session.is_privileged() {
            return Err(LeagueError::DuplicateSubmission {
                player: player.to_string(),
                from_team: from_team.to_string(),
            });
        }

        let mut staged = self.state.clone();
        staged.ratings.append(player, from_team, score);
        self.commit_ratings(staged, &[player])
    }

    pub fn edit_rating(
        &mut self,
        session: &Session,
        player: &str,
        index: usize,
        score: i64,
    ) -> LeagueResult<()> {
        let outcome = require_privilege(session).and_then(|_| {
            let score = ratings::validate_score(score)?;
            let mut staged = self.state.clone();
            if !staged.ratings.set_score(player, index, score) {
                return Err(rating_not_found(player, index));
            }
            self.commit_ratings(staged, &[player])
        });
        log_outcome("edit rating", outcome)
    }

    pub fn delete_rating(
        &mut self,
        session: &Session,
        player: &str,
        index: usize,
    ) -> LeagueResult<Rating> {
        let outcome =
            require_privilege(session).and_then(|_| self.remove_rating(player, index));
        log_outcome("delete rating", outcome)
    }

    /// Removes the most recently submitted rating in the whole ledger.
    pub fn clear_last_rating(&mut self, session: &Session) -> LeagueResult<(String, Rating)> {
        let outcome = require_privilege(session).and_then(|_| {
            let (player, index) = self
                .state
                .ratings
                .last_position()
                .ok_or_else(|| LeagueError::not_found("any rating"))?;
            self.remove_rating(&player, index).map(|rating| (player, rating))
        });
        log_outcome("clear last rating", outcome)
    }

    fn remove_rating(&mut self, player: &str, index: usize) -> LeagueResult<Rating> {
        let mut staged = self.state.clone();
        let removed = staged
            .ratings
            .remove(player, index)
            .ok_or_else(|| rating_not_found(player, index))?;

        self.commit_ratings(staged, &[player])?;
        Ok(removed)
    }

    pub fn clear_all_ratings(
        &mut self,
        session: &Session,
        confirmation: Confirmation,
    ) -> LeagueResult<usize> {
        let outcome = require_privilege(session)
            .and_then(|_| require_confirmation(confirmation))
            .and_then(|_| {
                let mut staged = self.state.clone();
                let writes: Vec<Write> = staged
                    .ratings
                    .clear()
                    .iter()
                    .map(|player| snapshot::ratings_delete(player))
                    .collect();
                let cleared = writes.len();
                self.commit(staged, writes).map(|_| cleared)
            });
        log_outcome("clear all ratings", outcome)
    }

    fn ensure_player(&self, player: &str) -> LeagueResult<()> {
        if self.state.is_known_player(player) {
            Ok(())
        } else {
            Err(ValidationError::UnknownPlayer(player.to_string()).into())
        }
    }

    // --- Commit ---

    /// Rebuilds points from the current ledger and persists any drift.
    pub fn recalculate(&mut self) -> LeagueResult<()> {
        let staged = self.state.clone();
        self.commit(staged, Vec::new())
    }

    fn commit_ratings(&mut self, staged: LeagueState, players: &[&str]) -> LeagueResult<()> {
        let writes = players
            .iter()
            .map(|player| snapshot::ratings_write(player, staged.ratings.ratings_for(player)))
            .collect::<Result<Vec<_>>>()?;
        self.commit(staged, writes)
    }

    fn commit(&mut self, mut staged: LeagueState, mut writes: Vec<Write>) -> LeagueResult<()> {
        let changed =
            ledger::recalculate(&mut staged.teams, &staged.results, self.settings.win_points);
        for id in changed {
            if let Some(team) = staged.teams.get(&id) {
                writes.push(snapshot::team_write(team)?);
            }
        }

        self.repo.commit(&writes)?;
        self.state = staged;
        Ok(())
    }
}

fn require_privilege(session: &Session) -> LeagueResult<()> {
    if session.is_privileged() {
        Ok(())
    } else {
        Err(LeagueError::PermissionDenied)
    }
}

fn require_confirmation(confirmation: Confirmation) -> LeagueResult<()> {
    match confirmation {
        Confirmation::Confirmed => Ok(()),
        Confirmation::Declined => Err(LeagueError::NotConfirmed),
    }
}

fn rating_not_found(player: &str, index: usize) -> LeagueError {
    LeagueError::not_found(format!("rating #{index} for {player}"))
}

fn log_outcome<T>(operation: &str, outcome: LeagueResult<T>) -> LeagueResult<T> {
    match &outcome {
        Ok(_) => info!("{} succeeded", operation),
        Err(e) if e.is_rejection() => warn!("{} rejected: {}", operation, e),
        Err(e) => error!("{} failed: {}", operation, e),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRepository;
    use std::sync::Arc;

    fn service() -> (LeagueService, Arc<MemoryRepository>) {
        let repo = Arc::new(MemoryRepository::new());
        let service =
            LeagueService::open(Box::new(Arc::clone(&repo)), LeagueSettings::default()).unwrap();
        (service, repo)
    }

    fn assert_points_consistent(service: &LeagueService) {
        for team in service.state().teams.values() {
            let wins = service.state().results.wins_for(team.id) as u32;
            assert_eq!(team.points, 3 * wins, "team {}", team.id);
        }
    }

    #[test]
    fn test_record_result_awards_points_and_persists() {
        let (mut service, repo) = service();

        service.record_result(&Session::new(), 0, 1, "6-3,6-4").unwrap();

        assert_eq!(service.team(1).unwrap().points, 3);
        let docs = repo.snapshot();
        assert_eq!(docs.results["0"]["score"], "6-3, 6-4");
        assert_eq!(docs.teams["1"]["points"], 3);
    }

    #[test]
    fn test_second_record_needs_privilege() {
        let (mut service, _) = service();
        service.record_result(&Session::new(), 0, 1, "6-0").unwrap();

        let err = service.record_result(&Session::new(), 0, 2, "6-1").unwrap_err();
        assert!(matches!(err, LeagueError::ResultAlreadyRecorded(0)));
        assert_eq!(service.result(0).unwrap().winner_id, 1);

        service
            .record_result(&Session::privileged(), 0, 2, "6-1")
            .unwrap();
        assert_eq!(service.team(1).unwrap().points, 0);
        assert_eq!(service.team(2).unwrap().points, 3);
    }

    #[test]
    fn test_invalid_set_rejects_whole_submission() {
        let (mut service, repo) = service();
        let before = repo.snapshot();

        let err = service.record_result(&Session::new(), 0, 1, "6-5,6-4").unwrap_err();

        assert!(matches!(
            err,
            LeagueError::Validation(ValidationError::InvalidSetScore(_))
        ));
        assert!(service.result(0).is_none());
        assert_eq!(repo.snapshot(), before);
    }

    #[test]
    fn test_edit_result_needs_gate_and_existing_entry() {
        let (mut service, _) = service();
        service.record_result(&Session::new(), 0, 1, "6-0").unwrap();

        let denied = service.edit_result(&Session::new(), 0, 2, "6-2").unwrap_err();
        assert!(matches!(denied, LeagueError::PermissionDenied));
        assert_eq!(service.result(0).unwrap().winner_id, 1);

        let missing = service
            .edit_result(&Session::privileged(), 1, 3, "6-2")
            .unwrap_err();
        assert!(matches!(missing, LeagueError::NotFound(_)));

        service
            .edit_result(&Session::privileged(), 0, 2, "6-2")
            .unwrap();
        assert_eq!(service.result(0).unwrap().winner_id, 2);
        assert_points_consistent(&service);
    }

    #[test]
    fn test_clear_last_result_uses_highest_index() {
        let (mut service, _) = service();
        let admin = Session::privileged();
        service.record_result(&admin, 9, 2, "6-0").unwrap();
        service.record_result(&admin, 2, 5, "6-0").unwrap();

        assert_eq!(service.clear_last_result(&admin).unwrap(), 9);
        assert!(service.result(9).is_none());
        assert_eq!(service.team(2).unwrap().points, 0);
        assert_eq!(service.team(5).unwrap().points, 3);
    }

    #[test]
    fn test_clear_all_results_requires_confirmation() {
        let (mut service, repo) = service();
        let admin = Session::privileged();
        service.record_result(&admin, 0, 1, "6-0").unwrap();
        service.record_result(&admin, 1, 3, "6-0").unwrap();

        let err = service
            .clear_all_results(&admin, Confirmation::Declined)
            .unwrap_err();
        assert!(matches!(err, LeagueError::NotConfirmed));
        assert_eq!(service.state().results.len(), 2);

        assert_eq!(
            service
                .clear_all_results(&admin, Confirmation::Confirmed)
                .unwrap(),
            2
        );
        assert!(service.state().teams.values().all(|t| t.points == 0));
        assert!(repo.snapshot().results.is_empty());
    }

    #[test]
    fn test_duplicate_rating_allowed_for_admin_only() {
        let (mut service, _) = service();
        let user = Session::new();

        service.record_rating(&user, "Dan", "Weedy & TJ", 4).unwrap();
        let err = service
            .record_rating(&user, "Dan", "Weedy & TJ", 5)
            .unwrap_err();
        assert!(matches!(err, LeagueError::DuplicateSubmission { .. }));

        service
            .record_rating(&Session::privileged(), "Dan", "Weedy & TJ", 2)
            .unwrap();
        let scores: Vec<u8> = service.ratings_for("Dan").iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![4, 2]);
        assert_eq!(service.average_rating("Dan"), 3.0);
    }

    #[test]
    fn test_rating_validation() {
        let (mut service, _) = service();
        let user = Session::new();

        let cases = [
            ("Dan", "", 3, ValidationError::MissingTeam),
            ("Dan", "Weedy & TJ", 0, ValidationError::RatingOutOfRange(0)),
            ("Ghost", "Weedy & TJ", 3, ValidationError::UnknownPlayer("Ghost".into())),
            ("Dan", "Nobody", 3, ValidationError::UnknownTeam("Nobody".into())),
        ];

        for (player, team, score, expected) in cases {
            match service.record_rating(&user, player, team, score) {
                Err(LeagueError::Validation(actual)) => assert_eq!(actual, expected),
                other => panic!("expected {expected:?}, got {other:?}"),
            }
        }
        assert!(service.state().ratings.is_empty());
    }

    #[test]
    fn test_clear_last_rating_removes_latest_submission() {
        let (mut service, repo) = service();
        let user = Session::new();
        service.record_rating(&user, "Weedy", "Dan & Bean", 3).unwrap();
        service.record_rating(&user, "Bean", "Rob & Pear", 5).unwrap();

        let denied = service.clear_last_rating(&user).unwrap_err();
        assert!(matches!(denied, LeagueError::PermissionDenied));

        let (player, rating) = service.clear_last_rating(&Session::privileged()).unwrap();
        assert_eq!(player, "Bean");
        assert_eq!(rating.score, 5);
        assert!(service.ratings_for("Bean").is_empty());
        assert_eq!(repo.snapshot().ratings["Bean"]["ratings"], serde_json::json!([]));
    }

    #[test]
    fn test_rating_from_and_export() {
        let (mut service, _) = service();
        service.record_result(&Session::new(), 2, 5, "7-5, 6-4").unwrap();
        service.record_rating(&Session::new(), "Nova", "Rob & Pear", 2).unwrap();

        assert_eq!(service.rating_from("Nova", "Rob & Pear"), Some(2));
        assert_eq!(service.rating_from("Nova", "Dan & Bean"), None);

        let exported = service.export().unwrap();
        assert_eq!(exported["schedule"].as_array().unwrap().len(), 10);
        assert_eq!(exported["results"]["2"]["winnerId"], 5);
        assert_eq!(exported["results"]["2"]["score"], "7-5, 6-4");
        assert_eq!(exported["ratings"]["Nova"][0]["fromTeam"], "Rob & Pear");
        assert_eq!(exported["teams"][4]["points"], 3);
    }

    #[test]
    fn test_clear_last_on_empty_ledgers_is_not_found() {
        let (mut service, repo) = service();
        let admin = Session::privileged();
        let before = service.state().clone();

        let err = service.clear_last_result(&admin).unwrap_err();
        assert!(matches!(err, LeagueError::NotFound(_)));
        let err = service.clear_last_rating(&admin).unwrap_err();
        assert!(matches!(err, LeagueError::NotFound(_)));

        assert_eq!(service.state(), &before);
        assert!(repo.snapshot().results.is_empty());
        assert!(repo.snapshot().ratings.is_empty());
    }

    #[test]
    fn test_clears_need_privilege() {
        let (mut service, repo) = service();
        let user = Session::new();
        service.record_result(&user, 0, 1, "6-0").unwrap();
        service.record_rating(&user, "Dan", "Weedy & TJ", 4).unwrap();
        let before = service.state().clone();

        let err = service.clear_last_result(&user).unwrap_err();
        assert!(matches!(err, LeagueError::PermissionDenied));
        let err = service
            .clear_all_ratings(&user, Confirmation::Confirmed)
            .unwrap_err();
        assert!(matches!(err, LeagueError::PermissionDenied));

        assert_eq!(service.state(), &before);
        assert!(repo.snapshot().results.contains_key("0"));
        assert_eq!(service.team(1).unwrap().points, 3);
        assert_eq!(service.ratings_for("Dan").len(), 1);
    }

    #[test]
    fn test_out_of_range_stored_ratings_are_discarded() {
        let repo = Arc::new(MemoryRepository::new());
        repo.save(
            crate::store::Collection::Ratings,
            "Dan",
            &serde_json::json!({"ratings": [
                {"fromTeam": "Weedy & TJ", "score": 4},
                {"fromTeam": "Rob & Pear", "score": 300},
                {"fromTeam": "Bulby & JHD", "score": 9}
            ]}),
        )
        .unwrap();

        let mut service =
            LeagueService::open(Box::new(Arc::clone(&repo)), LeagueSettings::default()).unwrap();
        assert_eq!(service.average_rating("Dan"), 4.0);
        assert_eq!(repo.snapshot().ratings["Dan"]["ratings"].as_array().unwrap().len(), 1);

        service
            .record_rating(&Session::new(), "Dan", "Nova & Neil", 5)
            .unwrap();

        let stored = &repo.snapshot().ratings["Dan"]["ratings"];
        assert_eq!(stored.as_array().unwrap().len(), 2);
        assert_eq!(stored[0]["fromTeam"], "Weedy & TJ");
        assert_eq!(stored[0]["score"], 4);
        assert_eq!(stored[1]["fromTeam"], "Nova & Neil");
        assert!(service.average_rating("Dan") <= 5.0);
    }

    #[test]
    fn test_storage_failure_leaves_state_untouched() {
        let (mut service, repo) = service();
        let before = service.state().clone();
        repo.set_read_only(true);

        let err = service.record_result(&Session::new(), 0, 1, "6-0").unwrap_err();

        assert!(matches!(err, LeagueError::Storage(_)));
        assert_eq!(service.state(), &before);
    }

    #[test]
    fn test_reopen_reconciles_drifted_points() {
        let (mut service, repo) = service();
        service.record_result(&Session::new(), 0, 1, "6-0").unwrap();
        drop(service);
        repo.save(
            crate::store::Collection::Teams,
            "1",
            &serde_json::json!({"id": 1, "name": "Dan & Bean", "members": ["Dan", "Bean"], "points": 42}),
        )
        .unwrap();

        let reopened =
            LeagueService::open(Box::new(Arc::clone(&repo)), LeagueSettings::default()).unwrap();

        assert_eq!(reopened.team(1).unwrap().points, 3);
        assert_eq!(repo.snapshot().teams["1"]["points"], 3);
    }
}
