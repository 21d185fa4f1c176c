use std::sync::Arc;

use padel_league::config::settings::LeagueSettings;
use padel_league::errors::LeagueError;
use padel_league::services::LeagueService;
use padel_league::session::{Confirmation, Session};
use padel_league::store::MemoryRepository;

fn open() -> (LeagueService, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    let league = LeagueService::open(Box::new(Arc::clone(&repo)), LeagueSettings::default()).unwrap();
    (league, repo)
}

fn assert_points_match_ledger(league: &LeagueService) {
    for team in league.state().teams.values() {
        let wins = league.state().results.wins_for(team.id) as u32;
        assert_eq!(team.points, 3 * wins, "team {} points drifted", team.name);
    }
}

#[test]
fn score_grammar_examples() {
    let (mut league, _) = open();
    let user = Session::new();

    league.record_result(&user, 0, 1, "6-3,6-4").unwrap();
    assert!(league.record_result(&user, 1, 3, "6-5,6-4").is_err());
    assert!(league.result(1).is_none());
    league.record_result(&user, 1, 3, "6-3, 6-4").unwrap();

    assert_eq!(league.result(1).unwrap().score.as_deref(), Some("6-3, 6-4"));
}

#[test]
fn winner_must_play_in_fixture() {
    let (mut league, repo) = open();
    let before = repo.snapshot();

    let err = league.record_result(&Session::new(), 0, 999, "6-0").unwrap_err();

    assert!(matches!(err, LeagueError::Validation(_)));
    assert!(league.state().results.is_empty());
    assert_eq!(repo.snapshot(), before);
}

#[test]
fn delete_then_recompute_returns_points() {
    let (mut league, _) = open();
    league.record_result(&Session::new(), 0, 1, "6-1,6-1").unwrap();
    assert_eq!(league.team(1).unwrap().points, 3);

    league.delete_result(&Session::privileged(), 0).unwrap();

    assert_eq!(league.team(1).unwrap().points, 0);
}

#[test]
fn edit_with_closed_gate_never_mutates() {
    let (mut league, _) = open();
    league.record_result(&Session::new(), 0, 1, "6-0").unwrap();
    let before = league.state().clone();

    for (winner, score) in [(2, "6-1"), (999, "bogus")] {
        let err = league.edit_result(&Session::new(), 0, winner, score).unwrap_err();
        assert!(matches!(err, LeagueError::PermissionDenied));
    }
    assert!(matches!(
        league.delete_result(&Session::new(), 0),
        Err(LeagueError::PermissionDenied)
    ));
    assert!(matches!(
        league.clear_all_results(&Session::new(), Confirmation::Confirmed),
        Err(LeagueError::PermissionDenied)
    ));

    assert_eq!(league.state(), &before);
}

#[test]
fn duplicate_rating_keeps_first_submission() {
    let (mut league, _) = open();
    let user = Session::new();

    league.record_rating(&user, "Dan", "Weedy & TJ", 4).unwrap();
    let err = league.record_rating(&user, "Dan", "Weedy & TJ", 5).unwrap_err();

    assert!(matches!(err, LeagueError::DuplicateSubmission { .. }));
    let ratings = league.ratings_for("Dan");
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].score, 4);
}

#[test]
fn gate_opened_mid_session_allows_duplicates() {
    let (mut league, _) = open();
    let mut session = Session::new();
    league.record_rating(&session, "Bean", "Rob & Pear", 2).unwrap();

    assert!(!league.request_privilege(&mut session, "not it"));
    assert!(league.record_rating(&session, "Bean", "Rob & Pear", 5).is_err());

    assert!(league.request_privilege(&mut session, "danisgreat"));
    league.record_rating(&session, "Bean", "Rob & Pear", 5).unwrap();

    assert_eq!(league.ratings_for("Bean").len(), 2);
    assert_eq!(league.average_rating("Bean"), 3.5);
}

#[test]
fn average_rating_examples() {
    let (mut league, _) = open();
    let user = Session::new();
    league.record_rating(&user, "Nova", "Dan & Bean", 3).unwrap();
    league.record_rating(&user, "Nova", "Weedy & TJ", 4).unwrap();
    league.record_rating(&user, "Nova", "Rob & Pear", 5).unwrap();

    assert_eq!(format!("{:.2}", league.average_rating("Nova")), "4.00");
    assert_eq!(league.average_rating("Neil"), 0.0);
}

#[test]
fn rating_edits_and_deletes_preserve_order() {
    let (mut league, _) = open();
    let user = Session::new();
    let admin = Session::privileged();
    for team in ["Dan & Bean", "Weedy & TJ", "Rob & Pear"] {
        league.record_rating(&user, "JHD", team, 3).unwrap();
    }

    assert!(matches!(
        league.edit_rating(&user, "JHD", 0, 5),
        Err(LeagueError::PermissionDenied)
    ));
    league.edit_rating(&admin, "JHD", 2, 1).unwrap();
    assert!(matches!(
        league.edit_rating(&admin, "JHD", 3, 1),
        Err(LeagueError::NotFound(_))
    ));
    league.delete_rating(&admin, "JHD", 0).unwrap();

    let teams: Vec<(&str, u8)> = league
        .ratings_for("JHD")
        .iter()
        .map(|r| (r.from_team.as_str(), r.score))
        .collect();
    assert_eq!(teams, vec![("Weedy & TJ", 3), ("Rob & Pear", 1)]);
}

#[test]
fn clear_all_ratings_needs_confirmation() {
    let (mut league, repo) = open();
    let admin = Session::privileged();
    league.record_rating(&admin, "Rob", "Bulby & JHD", 4).unwrap();
    league.record_rating(&admin, "Pear", "Bulby & JHD", 2).unwrap();

    assert!(matches!(
        league.clear_all_ratings(&admin, Confirmation::Declined),
        Err(LeagueError::NotConfirmed)
    ));
    assert_eq!(league.clear_all_ratings(&admin, Confirmation::Confirmed).unwrap(), 2);

    assert!(league.state().ratings.is_empty());
    assert!(repo.snapshot().ratings.is_empty());
}

#[test]
fn points_stay_consistent_through_mixed_mutations() {
    let (mut league, _) = open();
    let user = Session::new();
    let admin = Session::privileged();

    let fixtures = league.schedule().fixtures().to_vec();
    for fixture in &fixtures {
        let winner = if fixture.index % 2 == 0 { fixture.team_a } else { fixture.team_b };
        league.record_result(&user, fixture.index, winner, "6-4,7-6").unwrap();
        assert_points_match_ledger(&league);
    }

    league.edit_result(&admin, 3, fixtures[3].team_a, "6-0").unwrap();
    assert_points_match_ledger(&league);
    league.delete_result(&admin, 5).unwrap();
    assert_points_match_ledger(&league);
    assert_eq!(league.clear_last_result(&admin).unwrap(), 9);
    assert_points_match_ledger(&league);

    let before = league.state().clone();
    league.recalculate().unwrap();
    assert_eq!(league.state(), &before);

    league.clear_all_results(&admin, Confirmation::Confirmed).unwrap();
    assert!(league.league_table().iter().all(|t| t.points == 0));
}
