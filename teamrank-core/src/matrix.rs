/// Dense matrix with named columns and in-place Gauss-Jordan reduction.
///
/// Used for the rating system of one match group: team columns, one slack
/// column per pairing, then the constant column. Each row reads
/// `sum(coefficient * variable) + constant = 0`.
use std::fmt;

use crate::constants::EPSILON;
use crate::error::{RankingError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    headings: Vec<String>,
    rows: Vec<Vec<f64>>,
}

fn is_zero(value: f64) -> bool {
    value.abs() <= EPSILON
}

impl Matrix {
    pub fn new(headings: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if headings.is_empty() {
            return Err(RankingError::InvalidDimension("matrix needs at least one column".into()));
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headings.len() {
                return Err(RankingError::InvalidDimension(format!(
                    "row {idx} has {} cells, expected {}",
                    row.len(),
                    headings.len()
                )));
            }
        }
        Ok(Matrix { headings, rows })
    }

    /// All-zero matrix with `row_count` rows under `headings`.
    pub fn zeros(headings: Vec<String>, row_count: usize) -> Self {
        let width = headings.len();
        Matrix {
            headings,
            rows: vec![vec![0.0; width]; row_count],
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headings.len()
    }

    pub fn headings(&self) -> &[String] {
        &self.headings
    }

    pub fn column_index(&self, heading: &str) -> Option<usize> {
        self.headings.iter().position(|h| h == heading)
    }

    pub fn row(&self, row: usize) -> Result<&[f64]> {
        self.check_rows(row, row + 1)?;
        Ok(&self.rows[row])
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_cell(row, col)?;
        Ok(self.rows[row][col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_cell(row, col)?;
        self.rows[row][col] = value;
        Ok(())
    }

    fn check_columns(&self, first_col: usize, last_col: usize) -> Result<()> {
        if first_col > last_col || last_col > self.column_count() {
            return Err(RankingError::InvalidDimension(format!(
                "column range {first_col}..{last_col} outside 0..{}",
                self.column_count()
            )));
        }
        Ok(())
    }

    fn check_rows(&self, first_row: usize, last_row: usize) -> Result<()> {
        if first_row > last_row || last_row > self.row_count() {
            return Err(RankingError::InvalidDimension(format!(
                "row range {first_row}..{last_row} outside 0..{}",
                self.row_count()
            )));
        }
        Ok(())
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<()> {
        self.check_rows(row, row + 1)?;
        self.check_columns(col, col + 1)
    }

    /// Reduce the whole matrix to reduced row-echelon form.
    pub fn reduce(&mut self) -> Result<()> {
        self.reduce_range(0, self.column_count(), 0, self.row_count())
    }

    /// Gauss-Jordan reduction of the window `[first_col, last_col)` x
    /// `[first_row, last_row)`. Row operations act on whole rows, so columns
    /// right of the window (the constant column in particular) follow along.
    ///
    /// A column with no usable pivot is skipped: it stays a free variable.
    pub fn reduce_range(
        &mut self,
        first_col: usize,
        last_col: usize,
        first_row: usize,
        last_row: usize,
    ) -> Result<()> {
        self.check_columns(first_col, last_col)?;
        self.check_rows(first_row, last_row)?;

        tracing::trace!(
            first_col, last_col, first_row, last_row,
            "before reduction:\n{}",
            self
        );

        let mut work_row = first_row;
        for col in first_col..last_col {
            if work_row >= last_row {
                break;
            }
            let Some(pivot_row) = self.find_pivot_row(col, first_col, work_row, last_row) else {
                continue;
            };
            if pivot_row != work_row {
                self.rows.swap(pivot_row, work_row);
            }

            let pivot = self.rows[work_row][col];
            if pivot != 1.0 {
                self.scale_row(work_row, 1.0 / pivot);
                self.rows[work_row][col] = 1.0;
            }
            for row in first_row..last_row {
                if row != work_row {
                    self.eliminate(row, col, work_row);
                }
            }
            work_row += 1;
        }

        tracing::trace!(
            first_col, last_col, first_row, last_row,
            "after reduction:\n{}",
            self
        );
        Ok(())
    }

    /// First row in `[from_row, last_row)` that is zero across
    /// `[first_col, col)` and non-zero at `col`.
    fn find_pivot_row(&self, col: usize, first_col: usize, from_row: usize, last_row: usize) -> Option<usize> {
        (from_row..last_row).find(|&row| {
            let cells = &self.rows[row];
            !is_zero(cells[col]) && cells[first_col..col].iter().all(|&v| is_zero(v))
        })
    }

    fn scale_row(&mut self, row: usize, factor: f64) {
        for value in &mut self.rows[row] {
            *value *= factor;
        }
    }

    /// Subtract a multiple of `source_row` from `row` so that `row[col]` becomes zero.
    fn eliminate(&mut self, row: usize, col: usize, source_row: usize) {
        let value = self.rows[row][col];
        if is_zero(value) {
            return;
        }
        let factor = value / self.rows[source_row][col];
        let (target, source) = if row < source_row {
            let (head, tail) = self.rows.split_at_mut(source_row);
            (&mut head[row], &tail[0])
        } else {
            let (head, tail) = self.rows.split_at_mut(row);
            (&mut tail[0], &head[source_row])
        };
        for (t, s) in target.iter_mut().zip(source.iter()) {
            *t -= s * factor;
        }
        target[col] = 0.0;
    }

    /// True when every cell of `row` in `[first_col, last_col)` is zero within tolerance.
    pub fn is_zero_cells(&self, row: usize, first_col: usize, last_col: usize) -> Result<bool> {
        self.check_rows(row, row + 1)?;
        self.check_columns(first_col, last_col)?;
        Ok(self.rows[row][first_col..last_col].iter().all(|&v| is_zero(v)))
    }

    pub fn sum_abs(&self, row: usize, first_col: usize, last_col: usize) -> Result<f64> {
        self.check_rows(row, row + 1)?;
        self.check_columns(first_col, last_col)?;
        Ok(self.rows[row][first_col..last_col].iter().map(|v| v.abs()).sum())
    }

    /// The row whose only non-zero cell in `[first_col, last_col)` is a 1 at `col`.
    pub fn pivot_row(&self, col: usize, first_col: usize, last_col: usize) -> Result<Option<usize>> {
        self.check_columns(first_col, last_col)?;
        if !(first_col..last_col).contains(&col) {
            return Err(RankingError::InvalidDimension(format!(
                "pivot column {col} outside {first_col}..{last_col}"
            )));
        }
        Ok((0..self.row_count()).find(|&row| {
            let cells = &self.rows[row];
            (cells[col] - 1.0).abs() <= EPSILON
                && (first_col..last_col).all(|c| c == col || is_zero(cells[c]))
        }))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| format!("{v:.3}")).collect())
            .collect();

        let widths: Vec<usize> = (0..self.column_count())
            .map(|col| {
                cells
                    .iter()
                    .map(|row| row[col].len())
                    .chain(std::iter::once(self.headings[col].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut write_line = |line: &[String]| -> fmt::Result {
            write!(f, "[")?;
            for (col, field) in line.iter().enumerate() {
                if col != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{field:>width$}", width = widths[col])?;
            }
            writeln!(f, "]")
        };

        write_line(self.headings.as_slice())?;
        for line in &cells {
            write_line(line.as_slice())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headings(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("x{i}")).collect()
    }

    fn assert_close(actual: &Matrix, expected: &[&[f64]]) {
        assert_eq!(actual.row_count(), expected.len());
        for (r, row) in expected.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                assert!(
                    (actual.get(r, c).unwrap() - value).abs() < 1e-9,
                    "cell ({r}, {c}) = {}, expected {value}\n{actual}",
                    actual.get(r, c).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = Matrix::new(headings(3), vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]]);
        assert!(matches!(result, Err(RankingError::InvalidDimension(_))));
    }

    #[test]
    fn test_reduce_square_system() {
        // x + y - 3 = 0, x - y - 1 = 0  =>  x = 2, y = 1
        let mut m = Matrix::new(headings(3), vec![vec![1.0, 1.0, -3.0], vec![1.0, -1.0, -1.0]]).unwrap();
        m.reduce_range(0, 2, 0, 2).unwrap();
        assert_close(&m, &[&[1.0, 0.0, -2.0], &[0.0, 1.0, -1.0]]);
    }

    #[test]
    fn test_reduce_swaps_rows_for_pivot() {
        let mut m = Matrix::new(headings(3), vec![vec![0.0, 2.0, 4.0], vec![3.0, 0.0, 6.0]]).unwrap();
        m.reduce_range(0, 2, 0, 2).unwrap();
        assert_close(&m, &[&[1.0, 0.0, 2.0], &[0.0, 1.0, 2.0]]);
    }

    #[test]
    fn test_reduce_skips_column_without_pivot() {
        let mut m = Matrix::new(
            headings(4),
            vec![vec![1.0, 2.0, 0.0, 1.0], vec![2.0, 4.0, 1.0, 5.0]],
        )
        .unwrap();
        m.reduce_range(0, 3, 0, 2).unwrap();
        assert_close(&m, &[&[1.0, 2.0, 0.0, 1.0], &[0.0, 0.0, 1.0, 3.0]]);
        assert_eq!(m.pivot_row(0, 0, 3), Ok(Some(0)));
        assert_eq!(m.pivot_row(1, 0, 3), Ok(None));
        assert_eq!(m.pivot_row(2, 0, 3), Ok(Some(1)));
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let mut m = Matrix::new(
            headings(5),
            vec![
                vec![2.0, -1.0, 0.0, 1.0, 3.0],
                vec![-1.0, 2.0, -1.0, 0.0, 1.0],
                vec![0.0, -1.0, 2.0, 1.0, -4.0],
                vec![1.0, 1.0, 1.0, 2.0, 0.0],
            ],
        )
        .unwrap();
        m.reduce().unwrap();
        let once = m.clone();
        m.reduce().unwrap();
        for r in 0..m.row_count() {
            for c in 0..m.column_count() {
                assert!((m.get(r, c).unwrap() - once.get(r, c).unwrap()).abs() <= EPSILON, "cell ({r}, {c})");
            }
        }
    }

    #[test]
    fn test_reduce_rejects_bad_bounds() {
        let mut m = Matrix::zeros(headings(3), 2);
        assert!(matches!(m.reduce_range(0, 4, 0, 2), Err(RankingError::InvalidDimension(_))));
        assert!(matches!(m.reduce_range(0, 3, 0, 3), Err(RankingError::InvalidDimension(_))));
        assert!(matches!(m.reduce_range(2, 1, 0, 2), Err(RankingError::InvalidDimension(_))));
    }

    #[test]
    fn test_zero_helpers_use_tolerance() {
        let m = Matrix::new(headings(3), vec![vec![1e-13, -1e-12, 2.0]]).unwrap();
        assert_eq!(m.is_zero_cells(0, 0, 2), Ok(true));
        assert_eq!(m.is_zero_cells(0, 0, 3), Ok(false));
        assert!((m.sum_abs(0, 0, 3).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_helpers_reject_bad_bounds() {
        let m = Matrix::zeros(vec!["a".into(), "b".into(), "#".into()], 2);
        let invalid = |r: Result<bool>| matches!(r, Err(RankingError::InvalidDimension(_)));

        // Inverted and overflowing column ranges, and a row past the end
        assert!(invalid(m.is_zero_cells(0, 2, 1)));
        assert!(invalid(m.is_zero_cells(0, 0, 4)));
        assert!(invalid(m.is_zero_cells(2, 0, 2)));
        assert!(matches!(m.sum_abs(5, 0, 2), Err(RankingError::InvalidDimension(_))));
        assert!(matches!(m.sum_abs(0, 3, 2), Err(RankingError::InvalidDimension(_))));
        assert!(matches!(m.pivot_row(2, 0, 2), Err(RankingError::InvalidDimension(_))));
        assert!(matches!(m.pivot_row(0, 1, 0), Err(RankingError::InvalidDimension(_))));

        // Empty ranges inside the matrix are fine
        assert_eq!(m.is_zero_cells(1, 3, 3), Ok(true));
        assert_eq!(m.sum_abs(1, 0, 0), Ok(0.0));
    }

    #[test]
    fn test_cell_access_checks_bounds() {
        let mut m = Matrix::zeros(vec!["a".into(), "b".into(), "#".into()], 2);
        assert_eq!(m.set(1, 2, 7.5), Ok(()));
        assert_eq!(m.get(1, 2), Ok(7.5));
        assert_eq!(m.row(1), Ok(&[0.0, 0.0, 7.5][..]));

        assert!(matches!(m.get(2, 0), Err(RankingError::InvalidDimension(_))));
        assert!(matches!(m.get(0, 3), Err(RankingError::InvalidDimension(_))));
        assert!(matches!(m.set(0, 3, 1.0), Err(RankingError::InvalidDimension(_))));
        assert!(matches!(m.row(2), Err(RankingError::InvalidDimension(_))));
        assert_eq!(m.get(0, 0), Ok(0.0));
    }

    #[test]
    fn test_display_aligns_columns() {
        let m = Matrix::new(
            vec!["a".into(), "k1".into(), "#".into()],
            vec![vec![-1.0, 1.0, 10.0], vec![1.0, 0.0, -100.0]],
        )
        .unwrap();
        let rendered = m.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "[     a,    k1,        #]");
        assert_eq!(lines[1], "[-1.000, 1.000,   10.000]");
        assert_eq!(lines[2], "[ 1.000, 0.000, -100.000]");
    }
}
