use super::backend::{FaerSolver, GaussSolver, LinearSystemBackend};
use crate::{TrafficError, TrafficResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Which dense backend solves the reduced Laplacian. Selectable from the
/// scenario file (`solver = "faer"`) or `--solver`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    #[default]
    Gauss,
    Faer,
}

impl FromStr for SolverKind {
    type Err = TrafficError;

    fn from_str(input: &str) -> TrafficResult<Self> {
        match input.to_ascii_lowercase().as_str() {
            "gauss" | "default" => Ok(SolverKind::Gauss),
            "faer" => Ok(SolverKind::Faer),
            other => Err(TrafficError::Config(format!(
                "unknown solver '{}'; supported values: {}",
                other,
                SolverKind::available().join(", ")
            ))),
        }
    }
}

impl SolverKind {
    pub fn build_solver(self) -> Arc<dyn LinearSystemBackend> {
        match self {
            SolverKind::Gauss => Arc::new(GaussSolver),
            SolverKind::Faer => Arc::new(FaerSolver),
        }
    }

    pub fn available() -> &'static [&'static str] {
        &["gauss", "faer"]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolverKind::Gauss => "gauss",
            SolverKind::Faer => "faer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("gauss".parse::<SolverKind>().unwrap(), SolverKind::Gauss);
        assert_eq!("FAER".parse::<SolverKind>().unwrap(), SolverKind::Faer);
        assert!(matches!(
            "unknown".parse::<SolverKind>(),
            Err(TrafficError::Config(_))
        ));
    }

    #[test]
    fn every_kind_builds_a_working_backend() {
        let matrix = vec![vec![2.0, 0.0], vec![0.0, 3.0]];
        let rhs = vec![4.0, 6.0];

        for kind in [SolverKind::Gauss, SolverKind::Faer] {
            let solver = kind.build_solver();
            let solution = solver.solve(&matrix, &rhs).unwrap();
            assert!((solution[0] - 2.0).abs() < 1e-12, "{}", kind.as_str());
            assert!((solution[1] - 2.0).abs() < 1e-12, "{}", kind.as_str());
        }
    }
}
