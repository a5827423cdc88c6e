//! Scenario loading for the CLI: a TOML file, then command-line overrides.

use crate::cli::ScenarioArgs;
use anyhow::{Context, Result};
use std::path::Path;
use trafnet_core::ScenarioConfig;

/// Read a scenario file; missing keys take their defaults.
pub fn load_scenario_file(path: &Path) -> Result<ScenarioConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file {}", path.display()))?;
    let config: ScenarioConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing scenario file {}", path.display()))?;
    Ok(config)
}

/// Apply the flags that were given on top of `config`.
pub fn apply_overrides(mut config: ScenarioConfig, args: &ScenarioArgs) -> ScenarioConfig {
    if let Some(year) = args.start_year {
        config.start_year = year;
    }
    if let Some(year) = args.end_year {
        config.end_year = year;
    }
    if let Some(demand) = args.demand {
        config.initial_demand = demand;
    }
    if let Some(growth) = args.growth {
        config.growth_rate = growth;
    }
    if let Some(factor) = args.peak_hour_factor {
        config.peak_hour_factor = factor;
    }
    if let Some(entry) = &args.entry {
        config.entry = Some(entry.clone());
    }
    if let Some(exit) = &args.exit {
        config.exit = Some(exit.clone());
    }
    if let Some(solver) = args.solver {
        config.solver = solver;
    }
    config
}

/// The validated scenario described by `args`.
pub fn resolve_scenario(args: &ScenarioArgs) -> Result<ScenarioConfig> {
    let base = match &args.config {
        Some(path) => load_scenario_file(path)?,
        None => ScenarioConfig::default(),
    };
    let config = apply_overrides(base, args);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trafnet_core::SolverKind;

    #[test]
    fn file_values_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(
            &path,
            "start_year = 2025\nend_year = 2035\ngrowth_rate = 0.05\nsolver = \"faer\"\n",
        )
        .unwrap();

        let args = ScenarioArgs {
            config: Some(path),
            end_year: Some(2040),
            ..ScenarioArgs::default()
        };
        let config = resolve_scenario(&args).unwrap();
        assert_eq!(config.start_year, 2025);
        assert_eq!(config.end_year, 2040);
        assert_eq!(config.growth_rate, 0.05);
        assert_eq!(config.solver, SolverKind::Faer);
        assert_eq!(config.initial_demand, 6500.0);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = ScenarioArgs {
            start_year: Some(2040),
            end_year: Some(2030),
            ..ScenarioArgs::default()
        };
        assert!(resolve_scenario(&args).is_err());
    }

    #[test]
    fn unknown_key_type_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "start_year = \"soon\"\n").unwrap();
        let err = load_scenario_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }
}
