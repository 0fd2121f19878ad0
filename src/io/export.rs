//! CSV export for schedules, costs, and SoC traces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::fleet::Fleet;
use crate::sim::types::{CostRecord, HORIZON_START_HOUR, HOURS_PER_DAY, Schedule, SocSample};

/// Column header for the schedule CSV.
const SCHEDULE_HEADER: &str = "day,hour,port,vehicle_id,power_kw";

/// Column header for the cost CSV.
const COST_HEADER: &str = "vehicle_id,day,hour,cost_eur";

/// Column header for the SoC trace CSV.
const SOC_HEADER: &str = "vehicle_id,day,hour,power_kw,soc";

fn formatted_hour(hour: usize) -> String {
    format!("{:02}:00", hour % HOURS_PER_DAY)
}

/// Exports the charging schedule to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_schedule_csv(fleet: &Fleet, schedule: &Schedule, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_schedule_csv(fleet, schedule, io::BufWriter::new(file))
}

/// Writes the charging schedule as CSV to any writer.
///
/// One row per session, vehicles in roster order. Deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_schedule_csv(
    fleet: &Fleet,
    schedule: &Schedule,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SCHEDULE_HEADER.split(','))?;

    for (vehicle, v) in fleet.iter().enumerate() {
        for s in schedule.sessions(vehicle) {
            let day = (s.hour - HORIZON_START_HOUR) / HOURS_PER_DAY;
            wtr.write_record(&[
                day.to_string(),
                formatted_hour(s.hour),
                s.port.to_string(),
                v.id.clone(),
                format!("{:.2}", s.power_kw),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Exports per-vehicle cost records to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_costs_csv(fleet: &Fleet, costs: &[Vec<CostRecord>], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_costs_csv(fleet, costs, io::BufWriter::new(file))
}

/// Writes per-vehicle cost records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_costs_csv(
    fleet: &Fleet,
    costs: &[Vec<CostRecord>],
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(COST_HEADER.split(','))?;

    for (vehicle, v) in fleet.iter().enumerate() {
        for c in &costs[vehicle] {
            wtr.write_record(&[
                v.id.clone(),
                c.day.to_string(),
                formatted_hour(c.hour),
                format!("{:.2}", c.cost_eur),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Exports per-vehicle SoC traces to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_soc_csv(fleet: &Fleet, traces: &[Vec<SocSample>], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_soc_csv(fleet, traces, io::BufWriter::new(file))
}

/// Writes per-vehicle SoC traces as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_soc_csv(
    fleet: &Fleet,
    traces: &[Vec<SocSample>],
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SOC_HEADER.split(','))?;

    for (vehicle, v) in fleet.iter().enumerate() {
        for sample in &traces[vehicle] {
            wtr.write_record(&[
                v.id.clone(),
                sample.day.to_string(),
                formatted_hour(sample.hour),
                format!("{:.2}", sample.power_kw),
                format!("{:.4}", sample.soc),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
