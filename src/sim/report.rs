//! Post-hoc requirement fulfillment check from the final schedule.

use std::fmt;

use crate::fleet::Fleet;
use crate::sim::needs::Requirement;
use crate::sim::types::Schedule;

/// Delivered-versus-needed outcome for one requirement.
#[derive(Debug, Clone)]
pub struct RequirementOutcome {
    /// Roster id of the vehicle.
    pub vehicle_id: String,
    /// Day index the requirement was for.
    pub day: usize,
    /// Absolute deadline hour.
    pub deadline_hour: usize,
    /// Grid energy the requirement called for (kWh).
    pub needed_kwh: f32,
    /// Grid energy delivered inside the eligibility window (kWh).
    pub delivered_kwh: f32,
    /// Whether delivery covered the need.
    pub met: bool,
}

/// Fulfillment summary across all requirements.
///
/// Computed post-hoc from the final [`Schedule`] so the report reflects
/// what was assigned, not the scheduler's running flags. An unmet
/// requirement is an expected outcome of infeasible inputs, not an
/// error.
#[derive(Debug, Clone)]
pub struct FulfillmentReport {
    /// Per-requirement outcomes in roster order, then requirement order.
    pub outcomes: Vec<RequirementOutcome>,
}

impl FulfillmentReport {
    /// Checks every requirement against the delivered schedule.
    pub fn from_schedule(fleet: &Fleet, needs: &[Vec<Requirement>], schedule: &Schedule) -> Self {
        let mut outcomes = Vec::new();
        for (vehicle, reqs) in needs.iter().enumerate() {
            for req in reqs {
                let delivered_kwh =
                    schedule.delivered_kwh_within(vehicle, req.window_start, req.window_end);
                outcomes.push(RequirementOutcome {
                    vehicle_id: fleet.get(vehicle).id.clone(),
                    day: req.day,
                    deadline_hour: req.deadline_hour,
                    needed_kwh: req.energy_kwh,
                    delivered_kwh,
                    met: delivered_kwh >= req.energy_kwh,
                });
            }
        }
        Self { outcomes }
    }

    /// Number of requirements covered by their deadline.
    pub fn met_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.met).count()
    }

    /// Number of requirements left short.
    pub fn unmet_count(&self) -> usize {
        self.outcomes.len() - self.met_count()
    }
}

impl fmt::Display for FulfillmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Requirements Check ---")?;
        for o in &self.outcomes {
            writeln!(
                f,
                "{} Day {} (by hour {}): Needed {:.2} kWh, Delivered {:.2} kWh, Met: {}",
                o.vehicle_id, o.day, o.deadline_hour, o.needed_kwh, o.delivered_kwh, o.met
            )?;
        }
        write!(
            f,
            "{} met, {} unmet",
            self.met_count(),
            self.unmet_count()
        )
    }
}
