/// Coordinate-descent solver for a group's rating system.
///
/// The unknowns are the team ratings; each pairing's slack is always solved
/// directly from its own row, so the slacks are an exact function of the
/// ratings. The search minimises `sum(k_i^2)`, a convex quadratic in the
/// ratings, by repeatedly nudging the team with the steepest gradient.
/// Works on column indices, not team names.
use crate::constants::{CENTRAL_RATING, EPSILON};
use crate::error::{RankingError, Result};
use crate::matrix::Matrix;
use crate::system::RatingSystem;
use crate::types::SolverOptions;

/// Why the descent stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every slack is exactly zero.
    ExactFit,
    /// No team has a gradient component above tolerance.
    FlatGradient,
    /// The step was halved below tolerance.
    StepUnderflow,
    /// `SolverOptions::max_iterations` reached.
    IterationCap,
}

#[derive(Debug, Clone)]
pub struct Solution {
    /// Ratings (one per team column) followed by slacks (one per pairing).
    pub values: Vec<f64>,
    pub cost: f64,
    pub iterations: usize,
    pub final_step: f64,
    pub stop: StopReason,
}

impl Solution {
    pub fn ratings(&self, team_count: usize) -> &[f64] {
        &self.values[..team_count]
    }
}

/// Non-zero team coefficients of one pairing row, plus its slack coefficient
/// and constant. Pairing rows touch two teams, so this stays tiny.
struct PairingRow {
    teams: Vec<(usize, f64)>,
    slack_coefficient: f64,
    constant: f64,
}

fn pairing_rows(system: &RatingSystem) -> Vec<PairingRow> {
    let constant_col = system.constant_column();
    system.matrix.rows()[..system.pairing_count]
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            PairingRow {
                teams: cells[..system.team_count]
                    .iter()
                    .enumerate()
                    .filter(|(_, &c)| c != 0.0)
                    .map(|(col, &c)| (col, c))
                    .collect(),
                slack_coefficient: cells[system.slack_column(row)],
                constant: cells[constant_col],
            }
        })
        .collect()
}

impl PairingRow {
    /// Row value without its slack: `sum(coefficient * rating) + constant`.
    fn residual(&self, values: &[f64]) -> f64 {
        self.teams.iter().map(|&(col, c)| c * values[col]).sum::<f64>() + self.constant
    }
}

fn resolve(rows: &[PairingRow], team_count: usize, values: &mut [f64]) {
    for (i, row) in rows.iter().enumerate() {
        values[team_count + i] = -row.residual(values) / row.slack_coefficient;
    }
}

fn slack_cost(team_count: usize, values: &[f64]) -> f64 {
    values[team_count..].iter().map(|k| k * k).sum()
}

fn team_gradient(rows: &[PairingRow], team_count: usize, values: &[f64]) -> Vec<f64> {
    let mut gradient = vec![0.0; team_count];
    for row in rows {
        let residual = row.residual(values);
        for &(col, c) in &row.teams {
            gradient[col] += 2.0 * c * residual;
        }
    }
    gradient
}

/// Team with the largest gradient magnitude above tolerance. First wins ties.
fn steepest(gradient: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (col, &g) in gradient.iter().enumerate() {
        if g.abs() <= EPSILON {
            continue;
        }
        match best {
            Some((_, b)) if g.abs() <= b.abs() => {}
            _ => best = Some((col, g)),
        }
    }
    best
}

/// Starting point: every team at the central rating, slacks solved to match.
pub fn initial_guess(system: &RatingSystem) -> Vec<f64> {
    let mut values = vec![CENTRAL_RATING; system.team_count];
    values.resize(system.variable_count(), 0.0);
    resolve_slacks(system, &mut values);
    values
}

/// Recompute every slack from its row given the current ratings.
pub fn resolve_slacks(system: &RatingSystem, values: &mut [f64]) {
    resolve(&pairing_rows(system), system.team_count, values);
}

/// Sum of squared slacks.
pub fn cost(system: &RatingSystem, values: &[f64]) -> f64 {
    slack_cost(system.team_count, values)
}

/// `d cost / d rating_j = 2 * sum_rows coefficient(row, j) * residual(row)`.
pub fn gradient(system: &RatingSystem, values: &[f64]) -> Vec<f64> {
    team_gradient(&pairing_rows(system), system.team_count, values)
}

/// Minimise the slack cost starting from `initial`.
///
/// Pure: the system is not modified. `initial` holds ratings followed by
/// slacks; the slacks are re-solved before the first step, so only the
/// ratings matter.
pub fn optimize(system: &RatingSystem, initial: &[f64], options: &SolverOptions) -> Result<Solution> {
    let team_count = system.team_count;
    if initial.len() != system.variable_count() {
        return Err(RankingError::InvalidDimension(format!(
            "initial guess has {} values, system has {} variables",
            initial.len(),
            system.variable_count()
        )));
    }

    let rows = pairing_rows(system);
    let mut values = initial.to_vec();
    resolve(&rows, team_count, &mut values);
    let mut current_cost = slack_cost(team_count, &values);
    let mut step = options.initial_step;
    let mut iterations = 0;

    let stop = loop {
        if current_cost == 0.0 {
            break StopReason::ExactFit;
        }
        if step < EPSILON {
            break StopReason::StepUnderflow;
        }
        if iterations >= options.max_iterations {
            tracing::warn!(
                iterations,
                cost = current_cost,
                step,
                "optimizer hit the iteration cap before converging"
            );
            break StopReason::IterationCap;
        }

        let gradient = team_gradient(&rows, team_count, &values);
        let Some((team, slope)) = steepest(&gradient) else {
            break StopReason::FlatGradient;
        };
        iterations += 1;

        let previous = values[team];
        values[team] -= step * slope.signum();
        resolve(&rows, team_count, &mut values);
        let candidate = slack_cost(team_count, &values);

        if candidate < current_cost {
            current_cost = candidate;
        } else {
            values[team] = previous;
            resolve(&rows, team_count, &mut values);
            step /= 2.0;
        }
    };

    Ok(Solution {
        values,
        cost: current_cost,
        iterations,
        final_step: step,
        stop,
    })
}

/// Shift every rating by the same amount so their mean is the central rating.
/// Differences, and therefore slacks, are unchanged.
pub fn centre_ratings(system: &RatingSystem, values: &mut [f64]) {
    let team_count = system.team_count;
    let mean = values[..team_count].iter().sum::<f64>() / team_count as f64;
    let shift = CENTRAL_RATING - mean;
    for rating in &mut values[..team_count] {
        *rating += shift;
    }
    resolve_slacks(system, values);
}

/// Verify `row . values + constant == 0` for every row, optionally skipping one.
///
/// `values` covers every column except the trailing constant. Tolerance is
/// `EPSILON` scaled by the largest term in the row, so a row summing fifty
/// ratings of 50 is held to the same relative precision as a pairing row.
pub fn check_solution(matrix: &Matrix, values: &[f64], skip_row: Option<usize>) -> Result<()> {
    let constant_col = matrix.column_count().saturating_sub(1);
    if values.len() != constant_col {
        return Err(RankingError::InvalidDimension(format!(
            "solution has {} values, matrix has {} variables",
            values.len(),
            constant_col
        )));
    }

    for (row, cells) in matrix.rows().iter().enumerate() {
        if Some(row) == skip_row {
            continue;
        }
        let constant = cells[constant_col];
        let mut total = constant;
        let mut largest = constant.abs();
        for (c, v) in cells[..constant_col].iter().zip(values) {
            let term = c * v;
            total += term;
            largest = largest.max(term.abs());
        }
        let tolerance = EPSILON * largest.max(1.0);
        if total.abs() > tolerance {
            return Err(RankingError::SolutionInvariantViolated {
                row,
                residual: total,
                tolerance,
            });
        }
    }
    Ok(())
}

/// Fold solved slacks into the constants, zero the slack columns, and reduce
/// the team columns. Each team's rating is then the negated constant of the
/// row holding that team's pivot.
pub fn collapse_slacks(system: &RatingSystem, values: &[f64]) -> Result<Matrix> {
    let mut matrix = system.matrix.clone();
    let constant_col = system.constant_column();

    for row in 0..matrix.row_count() {
        let mut constant = matrix.get(row, constant_col)?;
        for pairing in 0..system.pairing_count {
            let col = system.slack_column(pairing);
            let coefficient = matrix.get(row, col)?;
            if coefficient != 0.0 {
                constant += coefficient * values[col];
                matrix.set(row, col, 0.0)?;
            }
        }
        matrix.set(row, constant_col, constant)?;
    }

    matrix.reduce_range(0, system.team_count, 0, matrix.row_count())?;
    Ok(matrix)
}

/// Rating of the team in column `team_col` of a collapsed, reduced matrix.
pub fn read_rating(matrix: &Matrix, team_col: usize, team_count: usize) -> Result<f64> {
    match matrix.pivot_row(team_col, 0, team_count)? {
        Some(row) => Ok(-matrix.get(row, matrix.column_count() - 1)?),
        None => Err(RankingError::Unanchored {
            team: matrix.headings()[team_col].clone(),
        }),
    }
}
