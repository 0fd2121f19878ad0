//! Derives absolute energy needs and deadline windows from target-SoC
//! requirements.

use std::fmt;

use crate::fleet::Fleet;
use crate::sim::types::{CHARGE_EFFICIENCY, HORIZON_START_HOUR, HOURS_PER_DAY};

/// A raw target-SoC requirement as supplied by the input layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementSpec {
    /// Roster id of the vehicle this requirement belongs to.
    pub vehicle: String,
    /// Day index the vehicle needs the charge for.
    pub day: usize,
    /// Time of day the target must be reached by, as `"HH:MM"` (minutes
    /// are ignored).
    pub time: String,
    /// Target state of charge (0.0 to 1.0).
    pub target_soc: f32,
}

/// A derived charging requirement with absolute deadline and grid-energy
/// need.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    /// Day index the requirement is for.
    pub day: usize,
    /// Absolute hour the target SoC must be reached by: the requested
    /// time on the morning after `day`'s evening window.
    pub deadline_hour: usize,
    /// Energy to draw from the grid (kWh), efficiency losses included.
    pub energy_kwh: f32,
    /// The vehicle's maximum charge rate (kW).
    pub max_rate_kw: f32,
    /// Target state of charge (0.0 to 1.0).
    pub target_soc: f32,
    /// First hour (inclusive) charging may count toward this requirement.
    pub window_start: usize,
    /// First hour (exclusive) past the eligibility window.
    pub window_end: usize,
}

impl Requirement {
    /// Whether `hour` falls inside the eligibility window.
    pub fn window_contains(&self, hour: usize) -> bool {
        hour >= self.window_start && hour < self.window_end
    }
}

/// Fatal failure while deriving energy needs from requirement specs.
#[derive(Debug, PartialEq)]
pub enum DeriveError {
    /// A requirement referenced a vehicle id missing from the roster.
    UnknownVehicle {
        /// The unresolvable vehicle id.
        vehicle_id: String,
    },
    /// A requirement carried an unparseable time-of-day string.
    InvalidTime {
        /// The vehicle the requirement belongs to.
        vehicle_id: String,
        /// The rejected time string.
        time: String,
    },
}

impl fmt::Display for DeriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeriveError::UnknownVehicle { vehicle_id } => write!(
                f,
                "lookup error: requirement references unknown vehicle id \"{vehicle_id}\""
            ),
            DeriveError::InvalidTime { vehicle_id, time } => write!(
                f,
                "input error: requirement for \"{vehicle_id}\" has invalid time \"{time}\""
            ),
        }
    }
}

/// Parses an `"HH:MM"` time-of-day string to its integer hour.
///
/// Only the part before the first `:` is read; a bare hour like `"7"` is
/// accepted.
///
/// # Errors
///
/// Returns a message when the hour part is not an integer below 24.
pub fn parse_time_hour(time: &str) -> Result<usize, String> {
    let hour_part = time.split(':').next().unwrap_or("");
    let hour: usize = hour_part
        .trim()
        .parse()
        .map_err(|_| format!("invalid time of day \"{time}\""))?;
    if hour >= HOURS_PER_DAY {
        return Err(format!("hour of day must be < 24, got \"{time}\""));
    }
    Ok(hour)
}

/// Derives per-vehicle requirement lists from raw specs.
///
/// Output is indexed by roster position; vehicles without specs get an
/// empty list. Requirements are ordered by day, then deadline. The
/// energy need is expressed in grid-drawn kWh (stored energy divided by
/// [`CHARGE_EFFICIENCY`]) and clamped to zero when the vehicle already
/// starts at or above the target.
///
/// # Errors
///
/// Returns a [`DeriveError`] if a spec references a vehicle id missing
/// from the roster, or the spec's time string does not parse.
pub fn derive_energy_needs(
    fleet: &Fleet,
    specs: &[RequirementSpec],
    initial_soc: f32,
) -> Result<Vec<Vec<Requirement>>, DeriveError> {
    let mut needs: Vec<Vec<Requirement>> = vec![Vec::new(); fleet.len()];

    for spec in specs {
        let vehicle = fleet
            .index_of(&spec.vehicle)
            .ok_or_else(|| DeriveError::UnknownVehicle {
                vehicle_id: spec.vehicle.clone(),
            })?;
        let hour = parse_time_hour(&spec.time).map_err(|_| DeriveError::InvalidTime {
            vehicle_id: spec.vehicle.clone(),
            time: spec.time.clone(),
        })?;

        let v = fleet.get(vehicle);
        let stored_kwh = ((spec.target_soc - initial_soc) * v.capacity_kwh).max(0.0);
        needs[vehicle].push(Requirement {
            day: spec.day,
            deadline_hour: (spec.day + 1) * HOURS_PER_DAY + hour,
            energy_kwh: stored_kwh / CHARGE_EFFICIENCY,
            max_rate_kw: v.max_charge_rate_kw,
            target_soc: spec.target_soc,
            window_start: spec.day * HOURS_PER_DAY + HORIZON_START_HOUR,
            window_end: (spec.day + 1) * HOURS_PER_DAY,
        });
    }

    for reqs in &mut needs {
        reqs.sort_by_key(|r| (r.day, r.deadline_hour));
    }
    Ok(needs)
}
