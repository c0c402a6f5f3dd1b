//! Error types for the rating engine.
//!
//! Every variant is an internal-consistency failure, not a user-input error.
//! Input validation belongs to whoever feeds matches into the engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    /// Row/column bounds outside the matrix, or a ragged row.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A solved row does not evaluate to zero within tolerance.
    #[error("Solution invariant violated in row {row}: residual {residual:e} (tolerance {tolerance:e})")]
    SolutionInvariantViolated {
        row: usize,
        residual: f64,
        tolerance: f64,
    },

    /// The team column did not receive a pivot, so no rating can be read off.
    #[error("Team {team} is not anchored by the reduced system")]
    Unanchored { team: String },

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    /// The win bonus is undefined for a zero goal difference.
    #[error("Degenerate skill input: win bonus requested for goal difference {0}")]
    DegenerateSkillInput(f64),
}

pub type Result<T> = std::result::Result<T, RankingError>;
