//! Conversion between league state and store documents.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::config::seed;
use crate::domain::{FixtureIndex, MatchResult, PlayerRatings, Rating, Schedule, Team};
use crate::ledger::results::is_consistent;
use crate::ledger::{ratings, LeagueState, RatingLedger, ResultLedger};
use crate::store::{Collection, Documents, Write};

/// Rebuilds state from stored documents.
///
/// Returns the writes needed to bring the store back in line: seed teams for
/// an empty store and cleaned rating lists for players with invalid entries. Points are left for the caller to recompute.
pub fn load_state(documents: &Documents, schedule: &Schedule) -> Result<(LeagueState, Vec<Write>)> {
    let mut writes = Vec::new();
    let mut teams = parse_teams(&documents.teams);

    if teams.is_empty() {
        info!("No teams stored, seeding {} teams", seed::get_teams().len());
        teams = seed_teams();
        for team in teams.values() {
            writes.push(team_write(team)?);
        }
    }

    let (ratings, damaged) = parse_ratings(&documents.ratings);
    for player in &damaged {
        writes.push(ratings_write(player, ratings.ratings_for(player))?);
    }

    let state = LeagueState {
        teams,
        results: parse_results(&documents.results, schedule),
        ratings,
    };

    Ok((state, writes))
}

fn seed_teams() -> BTreeMap<u32, Team> {
    seed::get_teams()
        .into_iter()
        .map(|s| {
            let members = s.members.iter().map(|m| m.to_string()).collect();
            (s.id, Team::new(s.id, s.name, members))
        })
        .collect()
}

fn parse_teams(docs: &BTreeMap<String, Value>) -> BTreeMap<u32, Team> {
    docs.iter()
        .filter_map(|(key, value)| match parse_document::<Team>(value) {
            Some(team) => Some((team.id, team)),
            None => {
                warn!("Skipping malformed team document '{}'", key);
                None
            }
        })
        .collect()
}

fn parse_results(docs: &BTreeMap<String, Value>, schedule: &Schedule) -> ResultLedger {
    let mut ledger = ResultLedger::default();

    for (key, value) in docs {
        let index = key.parse::<FixtureIndex>().ok();
        let result = parse_document::<MatchResult>(value);

        match (index, result) {
            (Some(index), Some(result)) if is_consistent(schedule, index, &result) => {
                ledger.upsert(index, result);
            }
            _ => warn!("Skipping result document '{}' that does not fit the schedule", key),
        }
    }

    ledger
}

/// Loads every rating that deserializes and lies in range. Players whose
/// stored list lost entries are returned so their document can be rewritten.
fn parse_ratings(docs: &BTreeMap<String, Value>) -> (RatingLedger, Vec<String>) {
    let mut entries = BTreeMap::new();
    let mut damaged = Vec::new();

    for (player, value) in docs {
        let stored: &[Value] = match value.get("ratings") {
            Some(Value::Array(stored)) => stored.as_slice(),
            None if value.is_object() => &[],
            _ => {
                warn!("Skipping malformed ratings document for '{}'", player);
                continue;
            }
        };

        let ratings: Vec<Rating> = stored
            .iter()
            .filter_map(|entry| parse_rating(player, entry))
            .collect();

        if ratings.len() != stored.len() {
            damaged.push(player.clone());
        }
        entries.insert(player.clone(), ratings);
    }

    (RatingLedger::from_entries(entries), damaged)
}

fn parse_rating(player: &str, entry: &Value) -> Option<Rating> {
    let Some(rating) = parse_document::<Rating>(entry) else {
        warn!("Dropping unreadable rating for '{}': {}", player, entry);
        return None;
    };

    match ratings::validate_score(i64::from(rating.score)) {
        Ok(_) => Some(rating),
        Err(e) => {
            warn!("Dropping rating for '{}' from '{}': {}", player, rating.from_team, e);
            None
        }
    }
}

fn parse_document<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

fn to_document<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize document")
}

pub fn team_write(team: &Team) -> Result<Write> {
    Ok(Write::save(Collection::Teams, team.id.to_string(), to_document(team)?))
}

pub fn result_write(index: FixtureIndex, result: &MatchResult) -> Result<Write> {
    Ok(Write::save(Collection::Results, index.to_string(), to_document(result)?))
}

pub fn result_delete(index: FixtureIndex) -> Write {
    Write::delete(Collection::Results, index.to_string())
}

pub fn ratings_write(player: &str, ratings: &[Rating]) -> Result<Write> {
    let doc = PlayerRatings {
        ratings: ratings.to_vec(),
    };
    Ok(Write::save(Collection::Ratings, player, to_document(&doc)?))
}

pub fn ratings_delete(player: &str) -> Write {
    Write::delete(Collection::Ratings, player)
}

/// Whole league as one JSON value
pub fn export(state: &LeagueState, schedule: &Schedule) -> Result<Value> {
    let teams = state.teams.values().map(to_document).collect::<Result<Vec<_>>>()?;
    let results = state
        .results
        .iter()
        .map(|(index, result)| -> Result<(String, Value)> {
            Ok((index.to_string(), to_document(result)?))
        })
        .collect::<Result<serde_json::Map<_, _>>>()?;
    let ratings = state
        .ratings
        .iter()
        .map(|(player, list)| -> Result<(String, Value)> {
            Ok((player.clone(), to_document(list)?))
        })
        .collect::<Result<serde_json::Map<_, _>>>()?;

    Ok(json!({
        "schedule": schedule.fixtures(),
        "teams": teams,
        "results": results,
        "ratings": ratings,
    }))
}
