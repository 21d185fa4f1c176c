use std::collections::BTreeMap;

use crate::domain::Rating;
use crate::errors::ValidationError;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Player name → ratings in submission order.
///
/// Players iterate in ascending name order. Every appended rating gets the
/// next ledger-wide `seq`, which defines which rating is the most recent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingLedger {
    entries: BTreeMap<String, Vec<Rating>>,
    next_seq: u64,
}

impl Default for RatingLedger {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 1,
        }
    }
}

impl RatingLedger {
    /// Builds a ledger from stored lists, continuing the sequence after the
    /// largest stored `seq`.
    pub fn from_entries(entries: BTreeMap<String, Vec<Rating>>) -> Self {
        let max_seq = entries
            .values()
            .flatten()
            .map(|rating| rating.seq)
            .max()
            .unwrap_or(0);

        Self {
            entries,
            next_seq: max_seq + 1,
        }
    }

    pub fn ratings_for(&self, player: &str) -> &[Rating] {
        self.entries.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_rating_from(&self, player: &str, from_team: &str) -> bool {
        self.rating_from(player, from_team).is_some()
    }

    /// First score `from_team` gave `player`
    pub fn rating_from(&self, player: &str, from_team: &str) -> Option<u8> {
        self.ratings_for(player)
            .iter()
            .find(|rating| rating.from_team == from_team)
            .map(|rating| rating.score)
    }

    pub fn append(&mut self, player: &str, from_team: &str, score: u8) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.entries.entry(player.to_string()).or_default().push(Rating {
            from_team: from_team.to_string(),
            score,
            seq,
        });
        seq
    }

    /// Replaces the score at `index`; false when out of bounds.
    pub fn set_score(&mut self, player: &str, index: usize, score: u8) -> bool {
        match self.entries.get_mut(player).and_then(|list| list.get_mut(index)) {
            Some(rating) => {
                rating.score = score;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, player: &str, index: usize) -> Option<Rating> {
        let list = self.entries.get_mut(player)?;
        if index < list.len() {
            Some(list.remove(index))
        } else {
            None
        }
    }

    /// Position of the most recent rating in the whole ledger.
    ///
    /// Greatest `seq` wins; on a tie the later player in iteration order
    /// wins, and within a player the later position.
    pub fn last_position(&self) -> Option<(String, usize)> {
        let mut best: Option<(u64, &String, usize)> = None;

        for (player, list) in &self.entries {
            for (index, rating) in list.iter().enumerate() {
                if best.is_none_or(|(seq, _, _)| rating.seq >= seq) {
                    best = Some((rating.seq, player, index));
                }
            }
        }

        best.map(|(_, player, index)| (player.clone(), index))
    }

    pub fn clear(&mut self) -> Vec<String> {
        let players = self.entries.keys().cloned().collect();
        self.entries.clear();
        players
    }

    /// Mean score rounded to two decimals; 0 without ratings
    pub fn average(&self, player: &str) -> f64 {
        let ratings = self.ratings_for(player);
        if ratings.is_empty() {
            return 0.0;
        }

        let sum: u32 = ratings.iter().map(|rating| u32::from(rating.score)).sum();
        round_two_decimals(f64::from(sum) / ratings.len() as f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Rating>)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

pub fn validate_score(score: i64) -> Result<u8, ValidationError> {
    if (MIN_RATING..=MAX_RATING).contains(&score) {
        Ok(score as u8)
    } else {
        Err(ValidationError::RatingOutOfRange(score))
    }
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(from_team: &str, score: u8) -> Rating {
        Rating {
            from_team: from_team.to_string(),
            score,
            seq: 0,
        }
    }

    #[test]
    fn test_average_of_three_ratings() {
        let mut ledger = RatingLedger::default();
        ledger.append("Dan", "A", 3);
        ledger.append("Dan", "B", 4);
        ledger.append("Dan", "C", 5);

        assert_eq!(ledger.average("Dan"), 4.0);
        assert_eq!(ledger.average("Bean"), 0.0);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let mut ledger = RatingLedger::default();
        ledger.append("Dan", "A", 1);
        ledger.append("Dan", "B", 2);
        ledger.append("Dan", "C", 2);

        assert_eq!(ledger.average("Dan"), 1.67);
    }

    #[test]
    fn test_last_position_follows_sequence_not_name_order() {
        let mut ledger = RatingLedger::default();
        ledger.append("Weedy", "A", 3);
        ledger.append("Bean", "A", 4);

        assert_eq!(ledger.last_position(), Some(("Bean".to_string(), 0)));
    }

    #[test]
    fn test_last_position_for_legacy_ratings_uses_iteration_order() {
        let mut entries = BTreeMap::new();
        entries.insert("Bean".to_string(), vec![legacy("A", 1), legacy("B", 2)]);
        entries.insert("Dan".to_string(), vec![legacy("A", 3), legacy("B", 4)]);
        entries.insert("TJ".to_string(), vec![]);
        let ledger = RatingLedger::from_entries(entries);

        assert_eq!(ledger.last_position(), Some(("Dan".to_string(), 1)));
    }

    #[test]
    fn test_sequence_continues_after_loaded_ratings() {
        let mut entries = BTreeMap::new();
        entries.insert(
            "Dan".to_string(),
            vec![Rating {
                from_team: "A".to_string(),
                score: 3,
                seq: 7,
            }],
        );
        let mut ledger = RatingLedger::from_entries(entries);

        assert_eq!(ledger.append("Bean", "A", 2), 8);
    }

    #[test]
    fn test_set_score_and_remove_out_of_bounds() {
        let mut ledger = RatingLedger::default();
        ledger.append("Dan", "A", 3);

        assert!(!ledger.set_score("Dan", 1, 5));
        assert!(ledger.remove("Dan", 4).is_none());
        assert!(ledger.set_score("Dan", 0, 5));
        assert_eq!(ledger.rating_from("Dan", "A"), Some(5));
    }

    #[test]
    fn test_validate_score_range() {
        assert_eq!(validate_score(1), Ok(1));
        assert_eq!(validate_score(5), Ok(5));
        assert_eq!(validate_score(0), Err(ValidationError::RatingOutOfRange(0)));
        assert_eq!(validate_score(6), Err(ValidationError::RatingOutOfRange(6)));
    }
}
