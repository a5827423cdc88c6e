use crate::{TrafficError, TrafficResult};
use faer::{prelude::*, solvers::PartialPivLu, Mat};

/// A dense solver for `A x = b`.
///
/// A singular (or numerically singular) `A` must be reported as
/// [`TrafficError::SingularSystem`]; backends never return NaN-filled
/// solutions.
pub trait LinearSystemBackend: Send + Sync {
    fn solve(&self, matrix: &[Vec<f64>], rhs: &[f64]) -> TrafficResult<Vec<f64>>;
}

// Pivots below this fraction of the largest entry count as zero.
const RELATIVE_PIVOT_TOLERANCE: f64 = 1e-12;

fn check_shape(matrix: &[Vec<f64>], rhs: &[f64]) -> TrafficResult<f64> {
    let n = matrix.len();
    if rhs.len() != n {
        return Err(TrafficError::DataIntegrity(format!(
            "right-hand side has {} entries for a {n}x{n} matrix",
            rhs.len()
        )));
    }
    if matrix.iter().any(|row| row.len() != n) {
        return Err(TrafficError::DataIntegrity(
            "matrix must be square".to_string(),
        ));
    }
    let scale = matrix
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, value| acc.max(value.abs()));
    if !scale.is_finite() || rhs.iter().any(|value| !value.is_finite()) {
        return Err(TrafficError::DataIntegrity(
            "linear system contains non-finite values".to_string(),
        ));
    }
    if scale == 0.0 {
        return Err(TrafficError::SingularSystem("matrix is all zeros".to_string()));
    }
    Ok(scale)
}

/// Row-reduction to upper-triangular form with partial pivoting, followed by
/// back substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussSolver;

impl LinearSystemBackend for GaussSolver {
    fn solve(&self, matrix: &[Vec<f64>], rhs: &[f64]) -> TrafficResult<Vec<f64>> {
        let n = matrix.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        let tolerance = RELATIVE_PIVOT_TOLERANCE * check_shape(matrix, rhs)?;

        // augmented rows [A | b]
        let mut rows: Vec<Vec<f64>> = matrix
            .iter()
            .zip(rhs)
            .map(|(row, &b)| {
                let mut augmented = row.clone();
                augmented.push(b);
                augmented
            })
            .collect();

        for col in 0..n {
            let best = (col..n)
                .max_by(|&p, &q| rows[p][col].abs().total_cmp(&rows[q][col].abs()))
                .unwrap_or(col);
            if rows[best][col].abs() < tolerance {
                return Err(TrafficError::SingularSystem(format!(
                    "no usable pivot for unknown {col}"
                )));
            }
            rows.swap(col, best);

            let (upper, lower) = rows.split_at_mut(col + 1);
            let pivot_row = &upper[col];
            for row in lower.iter_mut() {
                let factor = row[col] / pivot_row[col];
                if factor == 0.0 {
                    continue;
                }
                for (entry, &p) in row[col..].iter_mut().zip(&pivot_row[col..]) {
                    *entry -= factor * p;
                }
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let known: f64 = (i + 1..n).map(|j| rows[i][j] * x[j]).sum();
            x[i] = (rows[i][n] - known) / rows[i][i];
        }
        Ok(x)
    }
}

/// LU with partial pivoting from `faer`.
///
/// faer does not report rank deficiency, so the solution is checked for
/// finiteness and for its residual against the original system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerSolver;

impl LinearSystemBackend for FaerSolver {
    fn solve(&self, matrix: &[Vec<f64>], rhs: &[f64]) -> TrafficResult<Vec<f64>> {
        let n = matrix.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        let scale = check_shape(matrix, rhs)?;

        let a = Mat::from_fn(n, n, |i, j| matrix[i][j]);
        let b = Mat::from_fn(n, 1, |i, _| rhs[i]);
        let x = PartialPivLu::new(a.as_ref()).solve(&b);
        let solution: Vec<f64> = (0..n).map(|i| x.read(i, 0)).collect();
        if solution.iter().any(|value| !value.is_finite()) {
            return Err(TrafficError::SingularSystem(
                "LU factorization produced non-finite values".to_string(),
            ));
        }

        let rhs_norm = rhs.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let solution_norm = solution.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let residual = matrix
            .iter()
            .zip(rhs)
            .map(|(row, b)| {
                let ax: f64 = row.iter().zip(&solution).map(|(a, x)| a * x).sum();
                (ax - b).abs()
            })
            .fold(0.0_f64, f64::max);
        let bound = 1e-8 * (scale * solution_norm + rhs_norm).max(f64::MIN_POSITIVE);
        if residual > bound {
            return Err(TrafficError::SingularSystem(format!(
                "residual {residual:.3e} exceeds {bound:.3e}"
            )));
        }
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backends() -> Vec<Box<dyn LinearSystemBackend>> {
        vec![Box::new(GaussSolver), Box::new(FaerSolver)]
    }

    #[test]
    fn solves_reduced_laplacian() {
        // chain A-B-C with unit conductances, A pinned
        let matrix = vec![vec![2.0, -1.0], vec![-1.0, 1.0]];
        let rhs = vec![0.0, -10.0];
        for backend in backends() {
            let x = backend.solve(&matrix, &rhs).unwrap();
            assert!((x[0] + 10.0).abs() < 1e-9);
            assert!((x[1] + 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn singular_matrix_is_reported() {
        let matrix = vec![vec![1.0, -1.0], vec![-1.0, 1.0]];
        let rhs = vec![1.0, -1.0];
        for backend in backends() {
            let err = backend.solve(&matrix, &rhs).unwrap_err();
            assert!(matches!(err, TrafficError::SingularSystem(_)), "{err}");
        }
    }

    #[test]
    fn shape_mismatch_is_a_data_error() {
        let matrix = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        for backend in backends() {
            assert!(matches!(
                backend.solve(&matrix, &[1.0]),
                Err(TrafficError::DataIntegrity(_))
            ));
        }
    }

    #[test]
    fn empty_system_has_empty_solution() {
        for backend in backends() {
            assert!(backend.solve(&[], &[]).unwrap().is_empty());
        }
    }
}
