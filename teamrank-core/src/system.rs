/// Linear system for one match group.
///
/// Columns: every team (sorted by name), one slack `k<i>` per pairing, then
/// the constant `#`. Pairing row i reads
/// `-rating(team_a) + rating(team_b) + k_i + skill_i = 0`, so a zero slack
/// means `rating(team_a) - rating(team_b)` equals the observed skill. The
/// last row pins the mean rating: `sum(ratings) - 50 * teams = 0`.
use crate::constants::CENTRAL_RATING;
use crate::error::{RankingError, Result};
use crate::matrix::Matrix;
use crate::pairing::aggregate_pairings;
use crate::skill::SkillFunction;
use crate::types::{Match, TeamIndex};

pub const CONSTANT_HEADING: &str = "#";

#[derive(Debug, Clone)]
pub struct RatingSystem {
    pub matrix: Matrix,
    pub team_count: usize,
    pub pairing_count: usize,
}

impl RatingSystem {
    pub fn teams(&self) -> &[String] {
        &self.matrix.headings()[..self.team_count]
    }

    pub fn slack_column(&self, pairing: usize) -> usize {
        self.team_count + pairing
    }

    pub fn constant_column(&self) -> usize {
        self.team_count + self.pairing_count
    }

    /// Index of the mean-rating row.
    pub fn normalization_row(&self) -> usize {
        self.pairing_count
    }

    /// Number of unknowns: ratings followed by slacks.
    pub fn variable_count(&self) -> usize {
        self.team_count + self.pairing_count
    }
}

/// Build the system for one match group.
pub fn build_system(matches: &[Match], skill: SkillFunction) -> Result<RatingSystem> {
    let team_index = TeamIndex::from_matches(matches);
    let team_count = team_index.len();
    if team_count < 2 {
        return Err(RankingError::InvalidDimension(format!(
            "a match group needs at least two teams, got {team_count}"
        )));
    }

    let aggregates = aggregate_pairings(matches);
    let pairing_count = aggregates.len();
    let constant_col = team_count + pairing_count;

    let mut headings: Vec<String> = team_index.names().to_vec();
    headings.extend((1..=pairing_count).map(|i| format!("k{i}")));
    headings.push(CONSTANT_HEADING.to_string());

    let mut matrix = Matrix::zeros(headings, pairing_count + 1);

    for (row, aggregate) in aggregates.iter().enumerate() {
        if aggregate.team_a == aggregate.team_b {
            return Err(RankingError::InvalidDimension(format!(
                "pairing {} has {} playing itself",
                row + 1,
                aggregate.team_a
            )));
        }
        let col_a = column_of(&team_index, &aggregate.team_a)?;
        let col_b = column_of(&team_index, &aggregate.team_b)?;
        matrix.set(row, col_a, -1.0)?;
        matrix.set(row, col_b, 1.0)?;
        matrix.set(row, team_count + row, 1.0)?;
        matrix.set(row, constant_col, aggregate.relative_skill(skill)?)?;
    }

    let normalization = pairing_count;
    for col in 0..team_count {
        matrix.set(normalization, col, 1.0)?;
    }
    matrix.set(normalization, constant_col, -CENTRAL_RATING * team_count as f64)?;

    tracing::trace!(teams = team_count, pairings = pairing_count, "built rating system:\n{}", matrix);

    Ok(RatingSystem {
        matrix,
        team_count,
        pairing_count,
    })
}

fn column_of(team_index: &TeamIndex, team: &str) -> Result<usize> {
    team_index
        .to_idx(team)
        .ok_or_else(|| RankingError::UnknownTeam(team.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_match(team1: &str, team2: &str, score1: u32, score2: u32) -> Match {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Match::new(date, team1, team2, score1, score2)
    }

    #[test]
    fn test_build_layout() {
        let matches = vec![
            make_match("b", "c", 10, 9),
            make_match("a", "b", 10, 9),
            make_match("c", "b", 6, 10),
        ];
        let system = build_system(&matches, SkillFunction::Plain).unwrap();

        assert_eq!(system.team_count, 3);
        assert_eq!(system.pairing_count, 2);
        assert_eq!(system.matrix.headings(), ["a", "b", "c", "k1", "k2", "#"]);
        assert_eq!(system.teams(), ["a", "b", "c"]);
        assert_eq!(system.matrix.row_count(), 3);

        // b-c: (10 - 9 + 10 - 6) / 2 = 2.5 from b's side
        assert_eq!(system.matrix.row(0).unwrap(), [0.0, -1.0, 1.0, 1.0, 0.0, 2.5]);
        assert_eq!(system.matrix.row(1).unwrap(), [-1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(system.matrix.row(2).unwrap(), [1.0, 1.0, 1.0, 0.0, 0.0, -150.0]);
    }

    #[test]
    fn test_column_helpers() {
        let matches = vec![make_match("a", "b", 1, 0), make_match("b", "c", 1, 0)];
        let system = build_system(&matches, SkillFunction::Plain).unwrap();
        assert_eq!(system.slack_column(0), 3);
        assert_eq!(system.slack_column(1), 4);
        assert_eq!(system.constant_column(), 5);
        assert_eq!(system.normalization_row(), 2);
        assert_eq!(system.variable_count(), 5);
    }

    #[test]
    fn test_build_rejects_team_playing_itself() {
        let matches = vec![make_match("a", "b", 1, 0), make_match("b", "b", 2, 2)];
        assert!(matches!(
            build_system(&matches, SkillFunction::Plain),
            Err(RankingError::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_build_rejects_empty_group() {
        assert!(matches!(
            build_system(&[], SkillFunction::Plain),
            Err(RankingError::InvalidDimension(_))
        ));
    }
}
