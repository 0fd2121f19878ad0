//! Shared test fixtures for integration tests.

use depot_sim::fleet::{AvailabilityGrid, Fleet, Vehicle};
use depot_sim::sim::needs::{Requirement, RequirementSpec, derive_energy_needs};
use depot_sim::sim::types::SimConfig;

/// Default run configuration (3 ports, one week, 20% initial SoC).
pub fn default_config() -> SimConfig {
    SimConfig::new(3, 168, 0.2, 42)
}

/// Small mixed fleet: one mid-rate van, one slow car, one fast car.
pub fn small_fleet() -> Fleet {
    Fleet::new(vec![
        Vehicle::new("EV1", 50.0, 11.0),
        Vehicle::new("EV2", 60.0, 7.4),
        Vehicle::new("EV3", 75.0, 22.0),
    ])
}

/// Builds a requirement spec.
pub fn spec(vehicle: &str, day: usize, time: &str, target_soc: f32) -> RequirementSpec {
    RequirementSpec {
        vehicle: vehicle.to_string(),
        day,
        time: time.to_string(),
        target_soc,
    }
}

/// Default requirement set: EV1 and EV2 carry deadlines, EV3 charges
/// opportunistically.
pub fn default_specs() -> Vec<RequirementSpec> {
    vec![
        spec("EV1", 0, "07:00", 0.8),
        spec("EV1", 2, "07:00", 0.9),
        spec("EV2", 0, "06:30", 0.7),
        spec("EV2", 1, "08:00", 0.85),
    ]
}

/// Derives needs for a fleet at 20% initial SoC, panicking on lookup
/// failures (fixtures are known-good).
pub fn derive(fleet: &Fleet, specs: &[RequirementSpec]) -> Vec<Vec<Requirement>> {
    derive_energy_needs(fleet, specs, 0.2).expect("fixture specs should derive")
}

/// Fully available grid for the whole horizon.
pub fn full_grid(fleet: &Fleet, total_hours: usize) -> AvailabilityGrid {
    AvailabilityGrid::always(fleet.len(), total_hours)
}
