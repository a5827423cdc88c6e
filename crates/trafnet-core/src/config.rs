//! Scenario parameters for a multi-year traffic projection.
//!
//! A [`ScenarioConfig`] is passed explicitly into every driver, so several
//! scenarios can run side by side in one process. Missing fields fall back to
//! the defaults below when deserialized.

use crate::solver::SolverKind;
use crate::{TrafficError, TrafficResult};
use serde::{Deserialize, Serialize};

/// Parameters of one traffic-growth scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// First projected year
    pub start_year: i32,
    /// Last projected year (inclusive)
    pub end_year: i32,
    /// Hourly volume entering the network in `start_year`
    pub initial_demand: f64,
    /// Yearly growth rate of the entering volume
    pub growth_rate: f64,
    /// Peak-hour capacity factor used when deriving capacities
    pub peak_hour_factor: f64,
    /// Location where traffic enters; defaults to the first indexed location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Location where traffic leaves; defaults to the last indexed location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<String>,
    /// Linear-system backend
    pub solver: SolverKind,
    /// Upper bound for the lane-upgrade search
    pub max_additional_lanes: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            start_year: 2021,
            end_year: 2030,
            initial_demand: 6500.0,
            growth_rate: 0.1,
            peak_hour_factor: 0.8,
            entry: None,
            exit: None,
            solver: SolverKind::default(),
            max_additional_lanes: 20,
        }
    }
}

impl ScenarioConfig {
    /// Reject parameters no projection can be built from.
    pub fn validate(&self) -> TrafficResult<()> {
        if self.start_year > self.end_year {
            return Err(TrafficError::Config(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        if !(self.initial_demand.is_finite() && self.initial_demand > 0.0) {
            return Err(TrafficError::Config(format!(
                "initial demand must be positive, got {}",
                self.initial_demand
            )));
        }
        if !(self.growth_rate.is_finite() && self.growth_rate > -1.0) {
            return Err(TrafficError::Config(format!(
                "growth rate must be greater than -1, got {}",
                self.growth_rate
            )));
        }
        if !(self.peak_hour_factor.is_finite() && self.peak_hour_factor > 0.0) {
            return Err(TrafficError::Config(format!(
                "peak-hour factor must be positive, got {}",
                self.peak_hour_factor
            )));
        }
        if self.max_additional_lanes == 0 {
            return Err(TrafficError::Config(
                "max_additional_lanes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn year_count(&self) -> usize {
        (self.end_year - self.start_year + 1).max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScenarioConfig::default();
        config.validate().unwrap();
        assert_eq!(config.year_count(), 10);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ScenarioConfig =
            serde_json::from_str(r#"{"end_year": 2025, "solver": "faer", "exit": "Port"}"#)
                .unwrap();
        assert_eq!(config.start_year, 2021);
        assert_eq!(config.end_year, 2025);
        assert_eq!(config.solver, SolverKind::Faer);
        assert_eq!(config.exit.as_deref(), Some("Port"));
        assert_eq!(config.entry, None);
    }

    #[test]
    fn invalid_parameters_are_config_errors() {
        let cases = [
            ScenarioConfig {
                start_year: 2030,
                end_year: 2021,
                ..ScenarioConfig::default()
            },
            ScenarioConfig {
                initial_demand: 0.0,
                ..ScenarioConfig::default()
            },
            ScenarioConfig {
                growth_rate: -1.0,
                ..ScenarioConfig::default()
            },
            ScenarioConfig {
                peak_hour_factor: f64::NAN,
                ..ScenarioConfig::default()
            },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(TrafficError::Config(_))));
        }
    }
}
