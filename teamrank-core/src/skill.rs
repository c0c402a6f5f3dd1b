/// Skill functions: reduce all matches between one pair of teams to a single
/// signed number, positive when `team_a` is assessed stronger.
use std::fmt;
use std::str::FromStr;

use crate::constants::{BLOWOUT_BONUS, BLOWOUT_PIVOT, BLOWOUT_THRESHOLD, EPSILON, WIN_BONUS_SCALE};
use crate::error::{RankingError, Result};
use crate::types::Match;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SkillFunction {
    /// Mean goal difference.
    Plain,
    /// Mean goal difference plus a blow-out bonus from a 5-goal margin up.
    #[default]
    WeightedGoalDifference,
    /// Mean goal difference plus a bonus for winning at all.
    WinBonus,
}

impl SkillFunction {
    /// Relative skill of `team_a` over `team_b` across `matches`, which must
    /// all share the same canonical pair.
    pub fn relative_skill(&self, matches: &[Match]) -> Result<f64> {
        let diff = mean_goal_difference(matches);
        match self {
            SkillFunction::Plain => Ok(diff),
            SkillFunction::WeightedGoalDifference => Ok(diff + blowout_bonus(diff)),
            SkillFunction::WinBonus => {
                // A drawn pairing has no winner to reward
                if diff.abs() < EPSILON {
                    Ok(diff)
                } else {
                    Ok(diff + win_bonus(diff)?)
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SkillFunction::Plain => "plain",
            SkillFunction::WeightedGoalDifference => "weighted-goal-difference",
            SkillFunction::WinBonus => "win-bonus",
        }
    }
}

impl fmt::Display for SkillFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SkillFunction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "plain" => Ok(SkillFunction::Plain),
            "weighted-goal-difference" | "weighted" => Ok(SkillFunction::WeightedGoalDifference),
            "win-bonus" => Ok(SkillFunction::WinBonus),
            other => Err(format!(
                "Unknown skill function \"{other}\". Use \"plain\", \"weighted-goal-difference\" or \"win-bonus\"."
            )),
        }
    }
}

/// (sum of team A scores - sum of team B scores) / number of matches.
pub fn mean_goal_difference(matches: &[Match]) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }
    let total: i64 = matches.iter().map(Match::goal_difference).sum();
    total as f64 / matches.len() as f64
}

/// `sign(diff) * 10 / 2^(10 - |diff|)` once `|diff| >= 5`, zero below.
///
/// 10-0 earns 10, 10-1 earns 5, 10-2 earns 2.5, and so on down to 10-5.
pub fn blowout_bonus(diff: f64) -> f64 {
    if diff.abs() < BLOWOUT_THRESHOLD {
        return 0.0;
    }
    diff.signum() * BLOWOUT_BONUS / 2f64.powf(BLOWOUT_PIVOT - diff.abs())
}

/// `sign(diff) * 20/9 * (1 - 1/|diff|)`: 0 for a one-goal win rising to 2 for
/// a ten-goal win. Undefined for a draw.
pub fn win_bonus(diff: f64) -> Result<f64> {
    if diff.abs() < EPSILON {
        return Err(RankingError::DegenerateSkillInput(diff));
    }
    Ok(diff.signum() * WIN_BONUS_SCALE * (1.0 - 1.0 / diff.abs()))
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
    fn test_plain_is_mean_goal_difference() {
        let matches = vec![make_match("a", "b", 10, 4), make_match("a", "b", 3, 10)];
        let skill = SkillFunction::Plain.relative_skill(&matches).unwrap();
        assert!((skill - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_plain_uses_canonical_orientation() {
        // "b" beat "a", so the skill from a's side is negative
        let matches = vec![make_match("b", "a", 10, 7)];
        let skill = SkillFunction::Plain.relative_skill(&matches).unwrap();
        assert_eq!(skill, -3.0);
    }

    #[test]
    fn test_blowout_bonus_values() {
        assert_eq!(blowout_bonus(4.0), 0.0);
        assert!((blowout_bonus(5.0) - 10.0 / 32.0).abs() < 1e-12);
        assert!((blowout_bonus(9.0) - 5.0).abs() < 1e-12);
        assert!((blowout_bonus(10.0) - 10.0).abs() < 1e-12);
        assert!((blowout_bonus(-10.0) + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_blowout_bonus_keyed_to_pivot() {
        assert_eq!(blowout_bonus(BLOWOUT_PIVOT), BLOWOUT_BONUS);
        // Past the pivot the bonus keeps doubling; the score range does not cap it
        assert!((blowout_bonus(BLOWOUT_PIVOT + 2.0) - 4.0 * BLOWOUT_BONUS).abs() < 1e-12);
        assert!((blowout_bonus(BLOWOUT_PIVOT - 1.0) - BLOWOUT_BONUS / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_goal_difference() {
        let big = vec![make_match("a", "b", 10, 0)];
        assert_eq!(SkillFunction::WeightedGoalDifference.relative_skill(&big).unwrap(), 20.0);

        let narrow = vec![make_match("a", "b", 10, 7)];
        assert_eq!(SkillFunction::WeightedGoalDifference.relative_skill(&narrow).unwrap(), 3.0);
    }

    #[test]
    fn test_win_bonus_values() {
        assert!(win_bonus(1.0).unwrap().abs() < 1e-12);
        assert!((win_bonus(10.0).unwrap() - 2.0).abs() < 1e-12);
        assert!((win_bonus(-2.0).unwrap() + 20.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_win_bonus_rejects_draw() {
        assert_eq!(win_bonus(0.0), Err(RankingError::DegenerateSkillInput(0.0)));
    }

    #[test]
    fn test_win_bonus_skill_passes_draws_through() {
        let drawn = vec![make_match("a", "b", 10, 0), make_match("a", "b", 0, 10)];
        assert_eq!(SkillFunction::WinBonus.relative_skill(&drawn).unwrap(), 0.0);

        let won = vec![make_match("a", "b", 10, 0)];
        assert!((SkillFunction::WinBonus.relative_skill(&won).unwrap() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_skill_function_names_round_trip() {
        for skill in [SkillFunction::Plain, SkillFunction::WeightedGoalDifference, SkillFunction::WinBonus] {
            assert_eq!(skill.name().parse::<SkillFunction>().unwrap(), skill);
        }
        assert!("elo".parse::<SkillFunction>().is_err());
    }
}
