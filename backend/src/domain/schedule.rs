use super::models::{Fixture, FixtureIndex, TeamId};

/// Static round-robin schedule
#[derive(Debug, Clone)]
pub struct Schedule {
    fixtures: Vec<Fixture>,
}

impl Schedule {
    pub fn new(pairs: &[(TeamId, TeamId)]) -> Self {
        let fixtures = pairs
            .iter()
            .enumerate()
            .map(|(index, &(team_a, team_b))| Fixture {
                index,
                team_a,
                team_b,
            })
            .collect();
        Self { fixtures }
    }

    pub fn get(&self, index: FixtureIndex) -> Option<&Fixture> {
        self.fixtures.get(index)
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(&crate::config::seed::get_schedule())
    }
}
