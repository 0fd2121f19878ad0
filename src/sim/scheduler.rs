//! Greedy hour-by-hour assignment of charging ports to vehicles.
//!
//! # Algorithm
//!
//! 1. Walk the horizon in increasing hour order; skip hours the
//!    availability grid does not define.
//! 2. Build one candidate per available vehicle: its first unmet
//!    requirement whose eligibility window contains the hour, or an
//!    opportunistic slot when it has no requirements.
//! 3. Serve smallest outstanding needs first, then opportunistic
//!    vehicles by descending charge rate, up to the port count.
//!
//! Later hours observe energy already delivered in earlier hours, so the
//! pass is strictly sequential.

use crate::fleet::{AvailabilityGrid, Fleet};
use crate::sim::needs::Requirement;
use crate::sim::types::{ChargingSession, HORIZON_START_HOUR, Schedule, SimConfig};

/// One vehicle's claim on a port for a single hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    /// The vehicle is charging toward an unmet requirement.
    NeedsCharging {
        /// Roster index.
        vehicle: usize,
        /// Index into the vehicle's requirement list.
        requirement: usize,
        /// The requirement's grid-energy need (kWh).
        energy_kwh: f32,
        /// Maximum charge rate (kW).
        max_rate_kw: f32,
    },
    /// The vehicle has no outstanding requirement and takes a free port
    /// at full rate.
    Opportunistic {
        /// Roster index.
        vehicle: usize,
        /// Maximum charge rate (kW).
        max_rate_kw: f32,
    },
}

impl Candidate {
    fn energy_kwh(&self) -> f32 {
        match self {
            Candidate::NeedsCharging { energy_kwh, .. } => *energy_kwh,
            Candidate::Opportunistic { .. } => 0.0,
        }
    }

    fn max_rate_kw(&self) -> f32 {
        match self {
            Candidate::NeedsCharging { max_rate_kw, .. }
            | Candidate::Opportunistic { max_rate_kw, .. } => *max_rate_kw,
        }
    }
}

/// Scheduler output: the schedule plus final requirement-satisfaction
/// flags.
#[derive(Debug, Clone)]
pub struct ScheduleResult {
    /// Per-vehicle charging sessions.
    pub schedule: Schedule,
    /// Satisfaction flag per (vehicle, requirement), indexed like the
    /// requirement lists.
    pub satisfied: Vec<Vec<bool>>,
}

/// Assigns charging ports across the horizon.
///
/// `needs` is indexed by roster position (see
/// [`derive_energy_needs`](crate::sim::needs::derive_energy_needs)).
/// Deterministic for fixed inputs: candidate construction follows roster
/// order and both group sorts are stable.
pub fn schedule_charging(
    fleet: &Fleet,
    needs: &[Vec<Requirement>],
    grid: &AvailabilityGrid,
    config: &SimConfig,
) -> ScheduleResult {
    assert_eq!(needs.len(), fleet.len());

    let mut schedule = Schedule::new(fleet.len());
    let mut satisfied: Vec<Vec<bool>> = needs.iter().map(|r| vec![false; r.len()]).collect();
    let mut ports_used = vec![0usize; config.total_hours];

    for hour in HORIZON_START_HOUR..config.total_hours {
        if !grid.is_defined(hour) {
            continue;
        }

        let mut with_needs = Vec::new();
        let mut opportunistic = Vec::new();
        for vehicle in 0..fleet.len() {
            if !grid.is_available(vehicle, hour) {
                continue;
            }
            if needs[vehicle].is_empty() {
                opportunistic.push(Candidate::Opportunistic {
                    vehicle,
                    max_rate_kw: fleet.get(vehicle).max_charge_rate_kw,
                });
                continue;
            }
            let selected = needs[vehicle]
                .iter()
                .enumerate()
                .find(|(i, r)| !satisfied[vehicle][*i] && r.window_contains(hour));
            let Some((requirement, req)) = selected else {
                continue;
            };
            if req.energy_kwh > 0.0 {
                with_needs.push(Candidate::NeedsCharging {
                    vehicle,
                    requirement,
                    energy_kwh: req.energy_kwh,
                    max_rate_kw: req.max_rate_kw,
                });
            } else {
                // A requirement the vehicle already starts above: nothing
                // to deliver, so it competes like a free vehicle.
                opportunistic.push(Candidate::Opportunistic {
                    vehicle,
                    max_rate_kw: req.max_rate_kw,
                });
            }
        }

        // Smallest unmet need first so a near-deadline small requirement
        // is never stranded; ties prefer faster chargers to free ports
        // sooner.
        with_needs.sort_by(|a, b| {
            a.energy_kwh()
                .total_cmp(&b.energy_kwh())
                .then(b.max_rate_kw().total_cmp(&a.max_rate_kw()))
        });
        opportunistic.sort_by(|a, b| b.max_rate_kw().total_cmp(&a.max_rate_kw()));

        // Only the first num_ports candidates are considered this hour.
        // A candidate skipped as already-covered frees its port for the
        // rest of this prefix but is never backfilled from beyond it.
        for candidate in with_needs.iter().chain(&opportunistic).take(config.num_ports) {
            if ports_used[hour] >= config.num_ports {
                break;
            }
            let port = ports_used[hour] + 1;

            let (vehicle, power_kw) = match *candidate {
                Candidate::Opportunistic {
                    vehicle,
                    max_rate_kw,
                } => (vehicle, max_rate_kw),
                Candidate::NeedsCharging {
                    vehicle,
                    requirement,
                    energy_kwh,
                    max_rate_kw,
                } => {
                    let req = &needs[vehicle][requirement];
                    let delivered =
                        schedule.delivered_kwh_within(vehicle, req.window_start, req.window_end);
                    if delivered >= energy_kwh {
                        satisfied[vehicle][requirement] = true;
                        continue;
                    }
                    let power_kw = max_rate_kw.min(energy_kwh - delivered);
                    if delivered + power_kw >= energy_kwh {
                        satisfied[vehicle][requirement] = true;
                    }
                    (vehicle, power_kw)
                }
            };

            schedule.push(
                vehicle,
                ChargingSession {
                    hour,
                    power_kw,
                    port,
                },
            );
            ports_used[hour] += 1;
        }
    }

    ScheduleResult {
        schedule,
        satisfied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Vehicle;
    use crate::sim::needs::{RequirementSpec, derive_energy_needs};

    fn spec(vehicle: &str, day: usize, time: &str, target_soc: f32) -> RequirementSpec {
        RequirementSpec {
            vehicle: vehicle.to_string(),
            day,
            time: time.to_string(),
            target_soc,
        }
    }

    fn run(
        vehicles: Vec<Vehicle>,
        specs: Vec<RequirementSpec>,
        num_ports: usize,
        total_hours: usize,
    ) -> (Fleet, Vec<Vec<Requirement>>, ScheduleResult) {
        let fleet = Fleet::new(vehicles);
        let needs = derive_energy_needs(&fleet, &specs, 0.2).expect("needs should derive");
        let grid = AvailabilityGrid::always(fleet.len(), total_hours);
        let config = SimConfig::new(num_ports, total_hours, 0.2, 0);
        let result = schedule_charging(&fleet, &needs, &grid, &config);
        (fleet, needs, result)
    }

    #[test]
    fn single_vehicle_charges_until_covered() {
        // Need (0.8 - 0.2) * 50 / 0.95 = 31.58 kWh at 11 kW inside [18, 24).
        let (_, needs, result) = run(
            vec![Vehicle::new("EV1", 50.0, 11.0)],
            vec![spec("EV1", 0, "07:00", 0.8)],
            1,
            48,
        );

        let sessions = result.schedule.sessions(0);
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].hour, 18);
        assert_eq!(sessions[1].hour, 19);
        assert_eq!(sessions[2].hour, 20);
        assert_eq!(sessions[0].power_kw, 11.0);
        assert_eq!(sessions[1].power_kw, 11.0);
        // Final hour tops up exactly the remainder.
        assert!((sessions[2].power_kw - (needs[0][0].energy_kwh - 22.0)).abs() < 1e-4);
        assert!(result.satisfied[0][0]);
        // Hours 21..24 stay unassigned once the requirement is met.
        for hour in 21..24 {
            assert_eq!(result.schedule.power_at(0, hour), 0.0);
        }
    }

    #[test]
    fn needs_group_precedes_opportunistic() {
        // One port: the slow vehicle with an outstanding need beats the
        // fast vehicle without one.
        let (_, _, result) = run(
            vec![
                Vehicle::new("FAST", 80.0, 22.0),
                Vehicle::new("SLOW", 50.0, 7.0),
            ],
            vec![spec("SLOW", 0, "07:00", 0.3)],
            1,
            24,
        );

        let slow = result.schedule.sessions(1);
        assert_eq!(slow[0].hour, 18);
        assert_eq!(slow[0].port, 1);
        assert_eq!(result.schedule.power_at(0, 18), 0.0);
    }

    #[test]
    fn smaller_need_sorts_first() {
        let (_, _, result) = run(
            vec![
                Vehicle::new("BIG", 80.0, 11.0),
                Vehicle::new("SMALL", 50.0, 11.0),
            ],
            vec![
                spec("BIG", 0, "07:00", 0.9),
                spec("SMALL", 0, "07:00", 0.3),
            ],
            1,
            24,
        );

        // SMALL's 5.26 kWh need wins hour 18 over BIG's 58.9 kWh need.
        assert!(result.schedule.power_at(1, 18) > 0.0);
        assert_eq!(result.schedule.power_at(0, 18), 0.0);
    }

    #[test]
    fn equal_needs_prefer_faster_charger() {
        let (_, _, result) = run(
            vec![
                Vehicle::new("SLOW", 50.0, 7.0),
                Vehicle::new("FAST", 50.0, 22.0),
            ],
            vec![
                spec("SLOW", 0, "07:00", 0.8),
                spec("FAST", 0, "07:00", 0.8),
            ],
            1,
            24,
        );

        assert!(result.schedule.power_at(1, 18) > 0.0);
        assert_eq!(result.schedule.power_at(0, 18), 0.0);
    }

    #[test]
    fn port_limit_holds_every_hour() {
        let vehicles: Vec<Vehicle> = (0..5)
            .map(|i| Vehicle::new(format!("EV{i}"), 60.0, 11.0))
            .collect();
        let (_, _, result) = run(vehicles, Vec::new(), 2, 48);

        for hour in 0..48 {
            assert!(result.schedule.sessions_at_hour(hour) <= 2);
        }
    }

    #[test]
    fn opportunistic_power_is_exactly_max_rate() {
        let (_, _, result) = run(vec![Vehicle::new("EV1", 50.0, 7.4)], Vec::new(), 1, 48);
        let sessions = result.schedule.sessions(0);
        assert!(!sessions.is_empty());
        for s in sessions {
            assert_eq!(s.power_kw, 7.4);
        }
    }

    #[test]
    fn undefined_hours_are_skipped() {
        let fleet = Fleet::new(vec![Vehicle::new("EV1", 50.0, 11.0)]);
        let needs = derive_energy_needs(&fleet, &[], 0.2).expect("needs should derive");
        let mut grid = AvailabilityGrid::empty(1);
        grid.set(20, 0, true);
        grid.set(22, 0, true);
        let config = SimConfig::new(1, 24, 0.2, 0);

        let result = schedule_charging(&fleet, &needs, &grid, &config);
        let hours: Vec<usize> = result.schedule.sessions(0).iter().map(|s| s.hour).collect();
        assert_eq!(hours, vec![20, 22]);
    }

    #[test]
    fn covered_candidate_consumes_no_port_and_is_not_backfilled() {
        // EV-A has two same-day requirements sharing the window [18, 24).
        // Serving the first also covers the second, so at the next hour
        // EV-A is selected, found covered, and skipped. With one port the
        // remaining candidate is beyond the truncated prefix and must NOT
        // be backfilled: the hour stays empty.
        let (_, _, result) = run(
            vec![
                Vehicle::new("EV-A", 50.0, 11.0),
                Vehicle::new("EV-B", 50.0, 7.0),
            ],
            vec![
                spec("EV-A", 0, "06:00", 0.3), // 5.26 kWh
                spec("EV-A", 0, "09:00", 0.25), // 2.63 kWh, covered by the first
                spec("EV-B", 0, "07:00", 0.4), // 10.53 kWh
            ],
            1,
            48,
        );

        // Hour 18: EV-A's 5.26 kWh need sorts before EV-B's 10.53 kWh.
        assert!((result.schedule.power_at(0, 18) - 5.2631).abs() < 1e-3);
        assert_eq!(result.schedule.power_at(1, 18), 0.0);

        // Hour 19: EV-A's second requirement is already covered; the slot
        // it held is not handed to EV-B.
        assert_eq!(result.schedule.sessions_at_hour(19), 0);
        assert!(result.satisfied[0][1]);

        // Hour 20: EV-A is done, EV-B finally charges.
        assert!(result.schedule.power_at(1, 20) > 0.0);
    }

    #[test]
    fn met_requirement_is_never_reselected() {
        let (_, _, result) = run(
            vec![Vehicle::new("EV1", 50.0, 11.0)],
            vec![spec("EV1", 0, "07:00", 0.3)],
            1,
            48,
        );
        // 5.26 kWh is covered in one session; no further sessions appear
        // in the window.
        assert_eq!(result.schedule.sessions(0).len(), 1);
        assert!(result.satisfied[0][0]);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let vehicles = || {
            vec![
                Vehicle::new("EV1", 50.0, 11.0),
                Vehicle::new("EV2", 60.0, 7.4),
                Vehicle::new("EV3", 75.0, 22.0),
            ]
        };
        let specs = || {
            vec![
                spec("EV1", 0, "07:00", 0.8),
                spec("EV2", 0, "07:00", 0.7),
                spec("EV1", 2, "07:00", 0.9),
            ]
        };
        let (_, _, a) = run(vehicles(), specs(), 2, 168);
        let (_, _, b) = run(vehicles(), specs(), 2, 168);

        for vehicle in 0..3 {
            assert_eq!(a.schedule.sessions(vehicle), b.schedule.sessions(vehicle));
        }
        assert_eq!(a.satisfied, b.satisfied);
    }
}
