use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tabwriter::TabWriter;
use tracing::{error, info};
use trafnet_algo::{NamedExceedance, ScenarioAnalysis, ScenarioReport};
use trafnet_cli::cli::{OutputFormat, ScenarioArgs};
use trafnet_cli::config::resolve_scenario;
use trafnet_io::exporters::{
    write_flow_series, write_json_pretty, write_network_table, write_potential_series,
};

use super::load_logged;

pub fn handle(
    network_path: &Path,
    scenario: &ScenarioArgs,
    out: Option<&Path>,
    format: OutputFormat,
    upgrade: bool,
) -> Result<()> {
    let config = resolve_scenario(scenario)?;
    let imported = load_logged(network_path, config.peak_hour_factor)?;
    let network = imported.network;

    let report = match ScenarioAnalysis::new(&network)
        .with_config(config)
        .with_upgrade(upgrade)
        .run()
    {
        Ok(report) => report,
        Err(err) => {
            if err.is_data_error() {
                error!(
                    "{} cannot be solved as given; check `trafnet graph islands` and the segment ratings",
                    network_path.display()
                );
            }
            return Err(err.into());
        }
    };

    if let Some(dir) = out {
        write_outputs(&network, &report, dir)?;
    }

    match format {
        OutputFormat::Table => print_report_table(&report),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("serializing report to JSON")?;
            println!("{json}");
            Ok(())
        }
    }
}

fn write_outputs(
    network: &trafnet_core::RoadNetwork,
    report: &ScenarioReport,
    dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    write_network_table(network, &dir.join("network_df.csv"))?;
    write_flow_series(
        &dir.join("flows.csv"),
        &report.series.years,
        &report.segments,
        &report.series.flows,
        &report.series.vcr,
    )?;
    write_potential_series(
        &dir.join("potentials.csv"),
        &report.series.years,
        &report.locations,
        &report.series.potentials,
    )?;
    write_json_pretty(&dir.join("report.json"), report)?;
    info!("Results written to {}", dir.display());
    Ok(())
}

fn print_report_table(report: &ScenarioReport) -> Result<()> {
    println!(
        "Traffic enters at {} and leaves at {}",
        report.entry, report.exit
    );

    let mut writer = TabWriter::new(io::stdout());
    write!(writer, "YEAR\tDEMAND")?;
    for name in &report.segments {
        write!(writer, "\tVCR {name}")?;
    }
    writeln!(writer)?;
    for (row, (year, demand)) in report
        .series
        .years
        .iter()
        .zip(&report.series.demand)
        .enumerate()
    {
        write!(writer, "{year}\t{demand:.1}")?;
        for vcr in &report.series.vcr[row] {
            write!(writer, "\t{vcr:.3}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;

    match &report.first_exceedance {
        Some(first) => print_exceedance("First exceedance", first),
        None => println!(
            "No segment exceeds capacity through {}",
            report.config.end_year
        ),
    }
    if let Some(next) = &report.next_exceedance {
        print_exceedance("Next exceedance", next);
    }
    if let Some(upgrade) = &report.upgrade {
        println!(
            "Segment {} needs {} additional lane(s) ({} -> {}); peak VCR {:.3} -> {:.3}",
            report
                .segments
                .get(upgrade.segment.value())
                .map(String::as_str)
                .unwrap_or("?"),
            upgrade.additional_lanes,
            upgrade.base_lanes,
            upgrade.base_lanes + f64::from(upgrade.additional_lanes),
            upgrade.peak_vcr_before,
            upgrade.peak_vcr_after
        );
    }
    Ok(())
}

fn print_exceedance(label: &str, crossing: &NamedExceedance) {
    println!(
        "{label}: segment {} in {} (VCR {:.3})",
        crossing.segment_name, crossing.crossing.year, crossing.crossing.vcr
    );
}
