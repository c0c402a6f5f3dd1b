use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::constants::{DEFAULT_MAX_ITERATIONS, INITIAL_STEP};

/// One result between two teams.
///
/// Canonical: `team_a <= team_b` lexicographically. The constructor swaps the
/// teams, and their scores with them, when the caller supplies them the other
/// way round, so the same result always builds the same `Match`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    date: NaiveDate,
    team_a: String,
    team_b: String,
    score_a: u32,
    score_b: u32,
}

impl Match {
    pub fn new(
        date: NaiveDate,
        team_a: impl Into<String>,
        team_b: impl Into<String>,
        score_a: u32,
        score_b: u32,
    ) -> Self {
        let team_a = team_a.into();
        let team_b = team_b.into();
        if team_a <= team_b {
            Match { date, team_a, team_b, score_a, score_b }
        } else {
            Match {
                date,
                team_a: team_b,
                team_b: team_a,
                score_a: score_b,
                score_b: score_a,
            }
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn team_a(&self) -> &str {
        &self.team_a
    }

    pub fn team_b(&self) -> &str {
        &self.team_b
    }

    pub fn score_a(&self) -> u32 {
        self.score_a
    }

    pub fn score_b(&self) -> u32 {
        self.score_b
    }

    /// Signed goal difference from `team_a`'s point of view.
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.score_a) - i64::from(self.score_b)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team_a == team || self.team_b == team
    }

    /// The canonical ordered pair.
    pub fn teams(&self) -> (&str, &str) {
        (&self.team_a, &self.team_b)
    }
}

/// A team with its solved rating, as handed to output writers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamRating {
    pub team: String,
    /// Centred at 50 within the team's match group.
    pub rating: f64,
    pub games_played: usize,
    /// Index of the match group the team was solved in. Ratings are only
    /// comparable between teams with the same group.
    pub group: usize,
}

/// Tuning for the coordinate-descent optimizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverOptions {
    /// Iteration cap. Convergence normally ends the search first.
    pub max_iterations: usize,
    /// Starting coordinate step, halved on each rejected move.
    pub initial_step: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_step: INITIAL_STEP,
        }
    }
}

/// Maps team names to their column in a group's linear system.
///
/// Columns follow lexicographic team order, duplicates removed.
#[derive(Debug, Clone)]
pub(crate) struct TeamIndex {
    names: Vec<String>,
    name_to_idx: HashMap<String, usize>,
}

impl TeamIndex {
    pub fn from_matches(matches: &[Match]) -> Self {
        let names: Vec<String> = sorted_teams(matches);
        let name_to_idx = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        TeamIndex { names, name_to_idx }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn to_idx(&self, team: &str) -> Option<usize> {
        self.name_to_idx.get(team).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Every team named by `matches`, sorted and duplicate-free.
pub fn sorted_teams(matches: &[Match]) -> Vec<String> {
    let teams: BTreeSet<&str> = matches
        .iter()
        .flat_map(|m| [m.team_a(), m.team_b()])
        .collect();
    teams.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_match_keeps_canonical_order() {
        let m = Match::new(day(), "Alpha", "Bravo", 10, 4);
        assert_eq!(m.teams(), ("Alpha", "Bravo"));
        assert_eq!((m.score_a(), m.score_b()), (10, 4));
    }

    #[test]
    fn test_match_swaps_teams_and_scores() {
        let m = Match::new(day(), "c", "b", 10, 9);
        assert_eq!(m.teams(), ("b", "c"));
        assert_eq!(m.score_a(), 9);
        assert_eq!(m.score_b(), 10);
        assert_eq!(m.goal_difference(), -1);
    }

    #[test]
    fn test_swapped_input_builds_identical_match() {
        let forward = Match::new(day(), "Lions", "Bears", 3, 7);
        let backward = Match::new(day(), "Bears", "Lions", 7, 3);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_sorted_teams_dedups() {
        let matches = vec![
            Match::new(day(), "c", "b", 10, 9),
            Match::new(day(), "a", "b", 10, 9),
            Match::new(day(), "c", "d", 10, 9),
        ];
        assert_eq!(sorted_teams(&matches), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_team_index_columns_follow_name_order() {
        let matches = vec![
            Match::new(day(), "zulu", "alpha", 1, 0),
            Match::new(day(), "mike", "alpha", 1, 0),
        ];
        let index = TeamIndex::from_matches(&matches);
        assert_eq!(index.len(), 3);
        assert_eq!(index.to_idx("alpha"), Some(0));
        assert_eq!(index.to_idx("mike"), Some(1));
        assert_eq!(index.to_idx("zulu"), Some(2));
        assert_eq!(index.to_idx("yankee"), None);
    }

    #[test]
    fn test_solver_options_default() {
        let options = SolverOptions::default();
        assert_eq!(options.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(options.initial_step, 1.0);
    }
}
