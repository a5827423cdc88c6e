use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tabwriter::TabWriter;
use trafnet_algo::DemandProjection;
use trafnet_cli::cli::{OutputFormat, ScenarioArgs};
use trafnet_cli::config::resolve_scenario;

#[derive(Serialize)]
struct ProjectedYear {
    year: i32,
    demand: f64,
}

pub fn handle(scenario: &ScenarioArgs, format: OutputFormat) -> Result<()> {
    let config = resolve_scenario(scenario)?;
    let projection = DemandProjection::from_config(&config)?;

    match format {
        OutputFormat::Table => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(writer, "YEAR\tDEMAND (veh/hr)")?;
            for (year, demand) in projection.iter() {
                writeln!(writer, "{year}\t{demand:.1}")?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<ProjectedYear> = projection
                .iter()
                .map(|(year, demand)| ProjectedYear { year, demand })
                .collect();
            let json =
                serde_json::to_string_pretty(&rows).context("serializing projection to JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}
