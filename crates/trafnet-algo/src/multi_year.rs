//! Multi-year driver and capacity-exceedance scan.
//!
//! Each projected year is an independent solve over the same matrices, so
//! with the `parallel` feature the years are solved on the rayon pool. The
//! tables are always indexed by year in ascending order, and a failure in
//! any year fails the whole run.

use crate::flow::{FlowSolution, FlowSolver};
use crate::projection::DemandProjection;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use trafnet_core::{SegmentId, TrafficResult};

/// VCR at or above this value means the segment is at or over capacity.
pub const OVERLOAD_VCR: f64 = 1.0;

/// Year-indexed tables of potentials, flows and VCRs.
///
/// Row `i` of every table belongs to `years[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlySeries {
    pub years: Vec<i32>,
    pub demand: Vec<f64>,
    /// years × locations
    pub potentials: Vec<Vec<f64>>,
    /// years × segments
    pub flows: Vec<Vec<f64>>,
    /// years × segments
    pub vcr: Vec<Vec<f64>>,
}

/// The year a segment first reaches capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exceedance {
    pub segment: SegmentId,
    pub year_index: usize,
    pub year: i32,
    pub vcr: f64,
}

/// Result of scanning a [`YearlySeries`] for overloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceedanceReport {
    /// First crossing per segment, in segment order.
    pub crossings: Vec<Option<Exceedance>>,
    /// Earliest crossing overall; ties go to the lower segment index.
    pub first: Option<Exceedance>,
    /// Earliest crossing among the remaining segments.
    pub next: Option<Exceedance>,
}

/// Solve every projected year.
pub fn run_years(
    projection: &DemandProjection,
    solver: &FlowSolver<'_>,
) -> TrafficResult<YearlySeries> {
    #[cfg(feature = "parallel")]
    let solutions: Vec<FlowSolution> = projection
        .demand
        .par_iter()
        .map(|demand| solver.solve(*demand))
        .collect::<TrafficResult<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let solutions: Vec<FlowSolution> = projection
        .demand
        .iter()
        .map(|demand| solver.solve(*demand))
        .collect::<TrafficResult<Vec<_>>>()?;

    let mut series = YearlySeries {
        years: projection.years.clone(),
        demand: projection.demand.clone(),
        potentials: Vec::with_capacity(solutions.len()),
        flows: Vec::with_capacity(solutions.len()),
        vcr: Vec::with_capacity(solutions.len()),
    };
    for solution in solutions {
        series.potentials.push(solution.potentials);
        series.flows.push(solution.flows);
        series.vcr.push(solution.vcr);
    }
    Ok(series)
}

impl YearlySeries {
    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    pub fn segment_count(&self) -> usize {
        self.vcr.first().map_or(0, Vec::len)
    }

    /// VCR of one segment across all years.
    pub fn segment_vcr(&self, segment: SegmentId) -> Vec<f64> {
        self.vcr
            .iter()
            .filter_map(|row| row.get(segment.value()).copied())
            .collect()
    }

    /// Largest VCR a segment reaches over the horizon.
    pub fn peak_vcr(&self, segment: SegmentId) -> f64 {
        self.segment_vcr(segment)
            .into_iter()
            .fold(0.0, f64::max)
    }

    /// First year in which `segment` reaches [`OVERLOAD_VCR`].
    pub fn first_crossing(&self, segment: SegmentId) -> Option<Exceedance> {
        self.vcr.iter().enumerate().find_map(|(year_index, row)| {
            let vcr = *row.get(segment.value())?;
            (vcr >= OVERLOAD_VCR).then(|| Exceedance {
                segment,
                year_index,
                year: self.years[year_index],
                vcr,
            })
        })
    }

    /// First crossing per segment, then the earliest and the runner-up.
    pub fn exceedances(&self) -> ExceedanceReport {
        let crossings: Vec<Option<Exceedance>> = (0..self.segment_count())
            .map(|segment| self.first_crossing(SegmentId::new(segment)))
            .collect();
        let first = earliest(crossings.iter().flatten());
        let next = first.and_then(|first| {
            earliest(
                crossings
                    .iter()
                    .flatten()
                    .filter(|crossing| crossing.segment != first.segment),
            )
        });
        ExceedanceReport {
            crossings,
            first,
            next,
        }
    }
}

// Crossings arrive in segment order, so keeping the first strict minimum
// breaks ties by segment index.
fn earliest<'a>(crossings: impl Iterator<Item = &'a Exceedance>) -> Option<Exceedance> {
    let mut best: Option<Exceedance> = None;
    for crossing in crossings {
        if best.map_or(true, |current| crossing.year_index < current.year_index) {
            best = Some(*crossing);
        }
    }
    best
}
