use colored::Colorize;

use crate::services::league::LeagueService;

pub fn render_table(league: &LeagueService) -> String {
    let mut out = format!("{:<4} {:<16} {:>6}\n", "#", "Team", "Points")
        .bold()
        .to_string();

    for (rank, team) in league.league_table().iter().enumerate() {
        out.push_str(&format!("{:<4} {:<16} {:>6}\n", rank + 1, team.name, team.points));
    }
    out
}

pub fn render_fixtures(league: &LeagueService) -> String {
    let name = |id| {
        league
            .team(id)
            .map(|team| team.name.clone())
            .unwrap_or_else(|| format!("team {id}"))
    };

    let mut out = String::new();
    for fixture in league.schedule().fixtures() {
        let line = format!(
            "[{}] {} vs {}",
            fixture.index,
            name(fixture.team_a),
            name(fixture.team_b)
        );
        match league.result(fixture.index) {
            Some(result) => {
                let score = result.score.as_deref().unwrap_or("-");
                out.push_str(&format!(
                    "{line} | Winner: {} | Score: {}\n",
                    name(result.winner_id).green(),
                    score
                ));
            }
            None => out.push_str(&format!("{line}\n")),
        }
    }
    out
}

/// Players with their average; `team` marks the score that team gave
pub fn render_ratings(league: &LeagueService, team: Option<&str>) -> String {
    let mut out = String::new();

    for player in league.players() {
        let mut line = format!(
            "{:<8} {:>5.2} ({} ratings)",
            player,
            league.average_rating(&player),
            league.ratings_for(&player).len()
        );
        if let Some(score) = team.and_then(|t| league.rating_from(&player, t)) {
            line.push_str(&format!(" {}", format!("your rating: {score}").yellow()));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}
