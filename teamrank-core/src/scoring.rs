/// Solve one match group end to end.
///
/// One function, one options struct. No IO, no state.
/// matches → linear system → coordinate descent → centred ratings →
/// consistency check → collapsed, reduced matrix the ratings are read from.
use crate::error::{RankingError, Result};
use crate::matrix::Matrix;
use crate::optimizer::{
    centre_ratings, check_solution, collapse_slacks, initial_guess, optimize, read_rating, StopReason,
};
use crate::skill::SkillFunction;
use crate::system::build_system;
use crate::types::{Match, SolverOptions};

/// A solved match group. Ratings are read from the reduced matrix.
#[derive(Debug, Clone)]
pub struct SolvedGroup {
    /// Sorted team names; position equals the team's column.
    teams: Vec<String>,
    matrix: Matrix,
    pairing_count: usize,
    iterations: usize,
    cost: f64,
    stop: StopReason,
}

impl SolvedGroup {
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn contains(&self, team: &str) -> bool {
        self.column(team).is_some()
    }

    fn column(&self, team: &str) -> Option<usize> {
        self.teams.binary_search_by(|t| t.as_str().cmp(team)).ok()
    }

    pub fn rating(&self, team: &str) -> Result<f64> {
        let col = self
            .column(team)
            .ok_or_else(|| RankingError::UnknownTeam(team.to_string()))?;
        read_rating(&self.matrix, col, self.teams.len())
    }

    /// Every team's rating, in team-name order.
    pub fn ratings(&self) -> Result<Vec<(String, f64)>> {
        (0..self.teams.len())
            .map(|col| Ok((self.teams[col].clone(), read_rating(&self.matrix, col, self.teams.len())?)))
            .collect()
    }

    /// The collapsed, reduced system.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn pairing_count(&self) -> usize {
        self.pairing_count
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Remaining sum of squared slacks at the optimum.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop
    }
}

/// Rate every team of one connected match group.
///
/// The reducer runs once, at readout. Slacks are not eliminated by a
/// separate reduction pass: the descent works on the unreduced system and its
/// solved slacks are folded into the constants before the team columns are
/// reduced.
pub fn solve_group(matches: &[Match], skill: SkillFunction, options: &SolverOptions) -> Result<SolvedGroup> {
    let system = build_system(matches, skill)?;

    let initial = initial_guess(&system);
    let mut solution = optimize(&system, &initial, options)?;
    centre_ratings(&system, &mut solution.values);
    check_solution(&system.matrix, &solution.values, None)?;

    let matrix = collapse_slacks(&system, &solution.values)?;

    tracing::debug!(
        teams = system.team_count,
        pairings = system.pairing_count,
        iterations = solution.iterations,
        cost = solution.cost,
        step = solution.final_step,
        stop = ?solution.stop,
        "solved match group"
    );

    Ok(SolvedGroup {
        teams: system.teams().to_vec(),
        matrix,
        pairing_count: system.pairing_count,
        iterations: solution.iterations,
        cost: solution.cost,
        stop: solution.stop,
    })
}
