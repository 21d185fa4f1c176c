/// Seed data for a fresh league store.
///
/// Teams are written to the store the first time the `teams` collection is
/// found empty. The schedule is never stored: fixture indices are positions in
/// this list and must stay stable once results have been recorded.
#[derive(Debug, Clone)]
pub struct TeamSeed {
    pub id: u32,
    pub name: &'static str,
    pub members: [&'static str; 2],
}

impl TeamSeed {
    pub fn new(id: u32, name: &'static str, members: [&'static str; 2]) -> Self {
        Self { id, name, members }
    }
}

pub fn get_teams() -> Vec<TeamSeed> {
    vec![
        TeamSeed::new(1, "Dan & Bean", ["Dan", "Bean"]),
        TeamSeed::new(2, "Weedy & TJ", ["Weedy", "TJ"]),
        TeamSeed::new(3, "Rob & Pear", ["Rob", "Pear"]),
        TeamSeed::new(4, "Nova & Neil", ["Nova", "Neil"]),
        TeamSeed::new(5, "Bulby & JHD", ["Bulby", "JHD"]),
    ]
}

/// Round-robin pairings as (team A id, team B id)
pub fn get_schedule() -> Vec<(u32, u32)> {
    vec![
        (1, 2),
        (3, 4),
        (5, 1),
        (2, 3),
        (4, 5),
        (1, 3),
        (2, 4),
        (5, 3),
        (1, 4),
        (2, 5),
    ]
}
