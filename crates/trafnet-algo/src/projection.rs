//! Geometric growth of the entering traffic volume.

use serde::Serialize;
use trafnet_core::{ScenarioConfig, TrafficError, TrafficResult};

/// Years and the hourly demand projected for each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandProjection {
    pub years: Vec<i32>,
    pub demand: Vec<f64>,
}

impl DemandProjection {
    /// Wrap an explicit series. Years must be strictly ascending and every
    /// demand finite.
    pub fn new(years: Vec<i32>, demand: Vec<f64>) -> TrafficResult<Self> {
        if years.len() != demand.len() {
            return Err(TrafficError::Config(format!(
                "{} years but {} demand values",
                years.len(),
                demand.len()
            )));
        }
        if years.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(TrafficError::Config(
                "projection years must be strictly ascending".to_string(),
            ));
        }
        if let Some(value) = demand.iter().find(|value| !value.is_finite()) {
            return Err(TrafficError::Config(format!(
                "projected demand {value} is not finite"
            )));
        }
        Ok(Self { years, demand })
    }

    /// Projection described by a scenario's year range, demand and growth.
    pub fn from_config(config: &ScenarioConfig) -> TrafficResult<Self> {
        project(
            config.start_year,
            config.end_year,
            config.initial_demand,
            config.growth_rate,
        )
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.demand.iter().copied())
    }
}

/// `demand[i] = first_demand · (1 + growth_rate)^(years[i] − first_year)`
/// for every year from `first_year` to `last_year` inclusive.
pub fn project(
    first_year: i32,
    last_year: i32,
    first_demand: f64,
    growth_rate: f64,
) -> TrafficResult<DemandProjection> {
    if first_year > last_year {
        return Err(TrafficError::Config(format!(
            "first year {first_year} is after last year {last_year}"
        )));
    }
    if !(first_demand.is_finite() && first_demand > 0.0) {
        return Err(TrafficError::Config(format!(
            "initial demand must be positive, got {first_demand}"
        )));
    }
    if !(growth_rate.is_finite() && growth_rate > -1.0) {
        return Err(TrafficError::Config(format!(
            "growth rate must be greater than -1, got {growth_rate}"
        )));
    }

    let years: Vec<i32> = (first_year..=last_year).collect();
    let demand = years
        .iter()
        .map(|year| first_demand * (1.0 + growth_rate).powi(year - first_year))
        .collect();
    DemandProjection::new(years, demand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_year_ten_percent_growth() {
        let projection = project(2021, 2023, 100.0, 0.1).unwrap();
        assert_eq!(projection.years, vec![2021, 2022, 2023]);
        let expected = [100.0, 110.0, 121.0];
        for (value, want) in projection.demand.iter().zip(expected) {
            assert!((value - want).abs() < 1e-9, "{value} != {want}");
        }
    }

    #[test]
    fn positive_growth_is_strictly_increasing() {
        let projection = project(2021, 2040, 6500.0, 0.03).unwrap();
        assert_eq!(projection.len(), 20);
        assert!(projection.demand.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn zero_growth_is_constant() {
        let projection = project(2021, 2030, 6500.0, 0.0).unwrap();
        assert!(projection.demand.iter().all(|d| *d == 6500.0));
    }

    #[test]
    fn single_year_projection() {
        let projection = project(2025, 2025, 42.0, 0.5).unwrap();
        assert_eq!(projection.iter().collect::<Vec<_>>(), vec![(2025, 42.0)]);
    }

    #[test]
    fn invalid_inputs_are_config_errors() {
        assert!(matches!(
            project(2030, 2021, 100.0, 0.1),
            Err(TrafficError::Config(_))
        ));
        assert!(project(2021, 2030, 100.0, -1.0).is_err());
        assert!(project(2021, 2030, f64::INFINITY, 0.1).is_err());
        assert!(DemandProjection::new(vec![2021, 2021], vec![1.0, 2.0]).is_err());
        assert!(DemandProjection::new(vec![2021], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn from_config_uses_scenario_values() {
        let config = ScenarioConfig {
            start_year: 2024,
            end_year: 2026,
            initial_demand: 1000.0,
            growth_rate: 0.0,
            ..ScenarioConfig::default()
        };
        let projection = DemandProjection::from_config(&config).unwrap();
        assert_eq!(projection.years, vec![2024, 2025, 2026]);
        assert_eq!(projection.demand, vec![1000.0; 3]);
    }
}
