//! Replays a finished schedule into per-hour SoC traces and charging
//! costs.
//!
//! Works purely from the final [`Schedule`] so the traces stay
//! consistent with what was actually assigned, independent of the
//! scheduler's internal bookkeeping.

use crate::fleet::{Fleet, PriceTable};
use crate::sim::needs::Requirement;
use crate::sim::types::{
    CHARGE_EFFICIENCY, CostRecord, HORIZON_START_HOUR, HOURS_PER_DAY, LAST_SERVICE_DAY, Schedule,
    SimConfig, SocSample,
};

/// Simulation output: per-vehicle traces and cost records, indexed by
/// roster position.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Hourly SoC trace per vehicle, covering the whole horizon.
    pub soc_traces: Vec<Vec<SocSample>>,
    /// Cost records per vehicle, one per charging hour.
    pub cost_records: Vec<Vec<CostRecord>>,
    /// Reported end-of-run SoC per vehicle.
    ///
    /// TODO: this still reports the starting value for every vehicle
    /// while the hourly trace tracks the real evolution; confirm whether
    /// the summary should switch to the end-of-trace value before
    /// changing the export schema.
    pub final_soc: Vec<f32>,
}

/// Service-day index for an absolute hour, capped at
/// [`LAST_SERVICE_DAY`].
pub fn service_day(hour: usize) -> usize {
    ((hour.saturating_sub(HORIZON_START_HOUR)) / HOURS_PER_DAY).min(LAST_SERVICE_DAY)
}

/// Replays the schedule for every roster vehicle.
///
/// Per hour: apply the daily baseline reset (vehicles without
/// requirements restart each evening) or the deadline reset (a vehicle
/// departs and discharges once a requirement's deadline passes), then
/// add this hour's charging with conversion losses, clamping SoC at
/// 100%.
pub fn simulate(
    fleet: &Fleet,
    needs: &[Vec<Requirement>],
    schedule: &Schedule,
    prices: &PriceTable,
    config: &SimConfig,
) -> SimulationResult {
    assert_eq!(needs.len(), fleet.len());
    assert_eq!(schedule.vehicle_count(), fleet.len());

    let mut soc_traces = Vec::with_capacity(fleet.len());
    let mut cost_records = Vec::with_capacity(fleet.len());

    for (vehicle, v) in fleet.iter().enumerate() {
        let mut soc = config.initial_soc;
        let mut trace = Vec::with_capacity(config.total_hours - HORIZON_START_HOUR);
        let mut costs = Vec::new();

        for hour in HORIZON_START_HOUR..config.total_hours {
            let day = service_day(hour);

            if needs[vehicle].is_empty() && hour == HORIZON_START_HOUR + day * HOURS_PER_DAY {
                soc = config.initial_soc;
            }
            if needs[vehicle].iter().any(|r| r.deadline_hour == hour) {
                soc = config.initial_soc;
            }

            let power_kw = schedule.power_at(vehicle, hour);
            let energy_to_battery = power_kw * CHARGE_EFFICIENCY;
            soc = (soc + energy_to_battery / v.capacity_kwh).min(1.0);
            trace.push(SocSample {
                day,
                hour,
                power_kw,
                soc,
            });

            if power_kw > 0.0 {
                costs.push(CostRecord {
                    day,
                    hour,
                    cost_eur: power_kw * prices.price_at(hour),
                });
            }
        }

        soc_traces.push(trace);
        cost_records.push(costs);
    }

    SimulationResult {
        soc_traces,
        cost_records,
        final_soc: vec![config.initial_soc; fleet.len()],
    }
}
