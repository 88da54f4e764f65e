//! Dataset Model
//!
//! One observation per player: group assignment, retention flags, and total
//! game rounds played in the first week.

use serde::{Deserialize, Serialize};

/// Experiment arm a player was assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Control arm (e.g. gate at level 30)
    Control,
    /// Test arm (e.g. gate moved to level 40)
    Test,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Control => write!(f, "control"),
            Group::Test => write!(f, "test"),
        }
    }
}

/// One row of the experiment log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique player identifier
    pub user_id: String,
    /// Experiment arm
    pub group: Group,
    /// Returned to the game 1 day after install
    pub retention_1: bool,
    /// Returned to the game 7 days after install
    pub retention_7: bool,
    /// Total game rounds played
    pub rounds_played: u32,
}

/// In-memory experiment table
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Build a dataset from observations. Uniqueness of user ids is the
    /// loader's responsibility; this constructor takes rows as given.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// All rows
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Rows belonging to one experiment arm
    pub fn group_iter(&self, group: Group) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(move |o| o.group == group)
    }

    /// Rounds played by one arm, as f64 for the rank-sum test
    pub fn rounds_played(&self, group: Group) -> Vec<f64> {
        self.group_iter(group)
            .map(|o| f64::from(o.rounds_played))
            .collect()
    }

    /// 1-day retention indicators for one arm
    pub fn retention_1(&self, group: Group) -> Vec<bool> {
        self.group_iter(group).map(|o| o.retention_1).collect()
    }

    /// 7-day retention indicators for one arm
    pub fn retention_7(&self, group: Group) -> Vec<bool> {
        self.group_iter(group).map(|o| o.retention_7).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(id: &str, group: Group, rounds: u32) -> Observation {
        Observation {
            user_id: id.to_string(),
            group,
            retention_1: rounds > 0,
            retention_7: rounds > 10,
            rounds_played: rounds,
        }
    }

    #[test]
    fn test_group_extraction() {
        let ds = Dataset::new(vec![
            obs("a", Group::Control, 5),
            obs("b", Group::Test, 20),
            obs("c", Group::Control, 0),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rounds_played(Group::Control), vec![5.0, 0.0]);
        assert_eq!(ds.rounds_played(Group::Test), vec![20.0]);
        assert_eq!(ds.retention_1(Group::Control), vec![true, false]);
        assert_eq!(ds.retention_7(Group::Test), vec![true]);
    }

    #[test]
    fn test_group_display() {
        assert_eq!(Group::Control.to_string(), "control");
        assert_eq!(Group::Test.to_string(), "test");
    }
}
