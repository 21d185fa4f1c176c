use std::fmt;

use crate::errors::ValidationError;

pub const VALID_SET_SCORES: [&str; 7] = ["6-0", "6-1", "6-2", "6-3", "6-4", "7-5", "7-6"];

const SET_SEPARATOR: char = ',';
const JOINED_SEPARATOR: &str = ", ";

/// Validated sequence of set scores, e.g. `6-3, 6-4`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetScores(Vec<&'static str>);

impl SetScores {
    /// Parses a comma-separated list of sets; every token must be a legal set.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::MissingScore);
        }

        raw.split(SET_SEPARATOR)
            .map(str::trim)
            .map(parse_set)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn sets(&self) -> &[&'static str] {
        &self.0
    }
}

fn parse_set(token: &str) -> Result<&'static str, ValidationError> {
    VALID_SET_SCORES
        .iter()
        .find(|valid| **valid == token)
        .copied()
        .ok_or_else(|| ValidationError::InvalidSetScore(token.to_string()))
}

impl fmt::Display for SetScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(JOINED_SEPARATOR))
    }
}
