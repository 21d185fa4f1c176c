pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod database;
pub mod display;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod services;
pub mod session;
pub mod store;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;

use crate::cli::{AdminAction, Command};
use crate::config::settings::AppConfig;
use crate::console::InputSource;
use crate::database::SqliteRepository;
use crate::services::league::LeagueService;
use crate::services::server::ServerService;
use crate::session::{Confirmation, Session};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn open_league(config: &AppConfig) -> Result<LeagueService> {
    let repo = SqliteRepository::open(&config.storage.database_path)?;
    LeagueService::open(Box::new(repo), config.league.clone())
}

/// Runs every command except `serve` against the configured database.
pub fn handle_command(command: &Command, input: &mut dyn InputSource) -> Result<()> {
    let config = AppConfig::from_env();
    let mut league = open_league(&config)?;
    execute(&mut league, command, input)
}

pub fn execute(league: &mut LeagueService, command: &Command, input: &mut dyn InputSource) -> Result<()> {
    match command {
        Command::Serve { .. } => anyhow::bail!("serve runs through handle_serve"),
        Command::Table => print!("{}", display::render_table(league)),
        Command::Fixtures => print!("{}", display::render_fixtures(league)),
        Command::Ratings { team } => print!("{}", display::render_ratings(league, team.as_deref())),
        Command::Export => println!("{}", serde_json::to_string_pretty(&league.export()?)?),
        Command::Record {
            fixture,
            winner,
            score,
        } => {
            let score = score_or_prompt(score, input)?;
            league.record_result(&Session::new(), *fixture, *winner, &score)?;
            println!("Result recorded for fixture {fixture}");
        }
        Command::Rate {
            player,
            from_team,
            score,
        } => {
            league.record_rating(&Session::new(), player, from_team, *score)?;
            println!("Rating recorded for {player}");
        }
        Command::Admin { secret, action } => {
            let session = admin_session(league, secret.as_deref(), input)?;
            execute_admin(league, &session, action, input)?;
        }
    }
    Ok(())
}

fn admin_session(
    league: &LeagueService,
    secret: Option<&str>,
    input: &mut dyn InputSource,
) -> Result<Session> {
    let secret = match secret {
        Some(secret) => secret.to_string(),
        None => input
            .prompt("Enter admin password:")?
            .context("No password entered")?,
    };

    let mut session = Session::new();
    if !league.request_privilege(&mut session, &secret) {
        anyhow::bail!("Wrong password.");
    }
    Ok(session)
}

fn execute_admin(
    league: &mut LeagueService,
    session: &Session,
    action: &AdminAction,
    input: &mut dyn InputSource,
) -> Result<()> {
    match action {
        AdminAction::Record {
            fixture,
            winner,
            score,
        } => {
            let score = score_or_prompt(score, input)?;
            league.record_result(session, *fixture, *winner, &score)?;
            println!("Result recorded for fixture {fixture}");
        }
        AdminAction::EditResult {
            fixture,
            winner,
            score,
        } => {
            let score = score_or_prompt(score, input)?;
            league.edit_result(session, *fixture, *winner, &score)?;
            println!("Result updated for fixture {fixture}");
        }
        AdminAction::DeleteResult { fixture } => {
            league.delete_result(session, *fixture)?;
            println!("Result deleted for fixture {fixture}");
        }
        AdminAction::ClearLastResult => {
            let fixture = league.clear_last_result(session)?;
            println!("Result deleted for fixture {fixture}");
        }
        AdminAction::ClearResults { yes } => {
            let confirmation = confirm(*yes, "Clear ALL match results?", input)?;
            let count = league.clear_all_results(session, confirmation)?;
            println!("Cleared {count} results");
        }
        AdminAction::Rate {
            player,
            from_team,
            score,
        } => {
            league.record_rating(session, player, from_team, *score)?;
            println!("Rating recorded for {player}");
        }
        AdminAction::EditRating {
            player,
            index,
            score,
        } => {
            league.edit_rating(session, player, *index, *score)?;
            println!("Rating #{index} for {player} updated");
        }
        AdminAction::DeleteRating { player, index } => {
            league.delete_rating(session, player, *index)?;
            println!("Rating #{index} for {player} deleted");
        }
        AdminAction::ClearLastRating => {
            let (player, rating) = league.clear_last_rating(session)?;
            println!("Removed {player}'s rating of {} from {}", rating.score, rating.from_team);
        }
        AdminAction::ClearRatings { yes } => {
            let confirmation = confirm(*yes, "Clear ALL player ratings?", input)?;
            let count = league.clear_all_ratings(session, confirmation)?;
            println!("Cleared ratings of {count} players");
        }
    }
    Ok(())
}

fn score_or_prompt(score: &Option<String>, input: &mut dyn InputSource) -> Result<String> {
    match score {
        Some(score) => Ok(score.clone()),
        None => Ok(input
            .prompt("Enter match score (comma-separated sets, e.g. 6-3,6-4):")?
            .unwrap_or_default()),
    }
}

fn confirm(yes: bool, question: &str, input: &mut dyn InputSource) -> Result<Confirmation> {
    if yes {
        return Ok(Confirmation::Confirmed);
    }
    Ok(Confirmation::from(input.confirm(question)?))
}
