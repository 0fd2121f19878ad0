//! Core scheduling types: configuration, sessions, and trace records.

/// First schedulable absolute hour: the fleet returns to the depot on the
/// evening of day 0 and nothing charges before then.
pub const HORIZON_START_HOUR: usize = 18;

/// Hours per calendar day.
pub const HOURS_PER_DAY: usize = 24;

/// Fraction of grid-drawn energy actually stored in a vehicle battery.
pub const CHARGE_EFFICIENCY: f32 = 0.95;

/// Highest service-day index tracked by the simulator. The horizon covers
/// six usable days; later hours are folded into this day.
pub const LAST_SERVICE_DAY: usize = 5;

/// Centralized run configuration.
///
/// The need deriver, scheduler, and simulator all reference this struct
/// for port count, horizon length, and the fleet-wide initial SoC.
///
/// # Examples
///
/// ```
/// use depot_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(3, 168, 0.2, 42);
/// assert_eq!(cfg.num_ports, 3);
/// assert_eq!(cfg.total_hours, 168);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simultaneous charging ports at the depot.
    pub num_ports: usize,
    /// Horizon length in absolute hours (hour 0 = midnight of day 0).
    pub total_hours: usize,
    /// State of charge every vehicle starts the run with (0.0 to 1.0).
    pub initial_soc: f32,
    /// Master random seed for generated availability grids.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new run configuration.
    ///
    /// # Arguments
    ///
    /// * `num_ports` - Number of charging ports (must be > 0)
    /// * `total_hours` - Horizon length in hours (must extend past the first evening)
    /// * `initial_soc` - Fleet-wide starting state of charge (0.0 to 1.0)
    /// * `seed` - Master random seed
    ///
    /// # Panics
    ///
    /// Panics if `num_ports` is zero, `total_hours` does not reach past
    /// [`HORIZON_START_HOUR`], or `initial_soc` is out of range.
    pub fn new(num_ports: usize, total_hours: usize, initial_soc: f32, seed: u64) -> Self {
        assert!(num_ports > 0, "num_ports must be > 0");
        assert!(
            total_hours > HORIZON_START_HOUR,
            "total_hours must be > {HORIZON_START_HOUR}"
        );
        assert!((0.0..=1.0).contains(&initial_soc));
        Self {
            num_ports,
            total_hours,
            initial_soc,
            seed,
        }
    }
}

/// One hour of charging assigned to a vehicle on a specific port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargingSession {
    /// Absolute hour of the session.
    pub hour: usize,
    /// Grid power drawn during the session (kW).
    pub power_kw: f32,
    /// Port number occupied, 1-based within the hour.
    pub port: usize,
}

/// Per-vehicle charging session lists, the authoritative scheduler output.
///
/// Vehicles are addressed by roster index. Session lists are append-only
/// and stay ordered by hour because the scheduler walks the horizon in
/// increasing order.
#[derive(Debug, Clone)]
pub struct Schedule {
    by_vehicle: Vec<Vec<ChargingSession>>,
}

impl Schedule {
    /// Creates an empty schedule for `vehicle_count` vehicles.
    pub fn new(vehicle_count: usize) -> Self {
        Self {
            by_vehicle: vec![Vec::new(); vehicle_count],
        }
    }

    /// Number of vehicles the schedule covers.
    pub fn vehicle_count(&self) -> usize {
        self.by_vehicle.len()
    }

    /// Appends a session to a vehicle's list.
    pub fn push(&mut self, vehicle: usize, session: ChargingSession) {
        self.by_vehicle[vehicle].push(session);
    }

    /// Sessions assigned to a vehicle, ordered by hour.
    pub fn sessions(&self, vehicle: usize) -> &[ChargingSession] {
        &self.by_vehicle[vehicle]
    }

    /// Grid power a vehicle draws at `hour`, 0.0 if it has no session then.
    pub fn power_at(&self, vehicle: usize, hour: usize) -> f32 {
        self.by_vehicle[vehicle]
            .iter()
            .find(|s| s.hour == hour)
            .map_or(0.0, |s| s.power_kw)
    }

    /// Grid energy delivered to a vehicle within `[start_hour, end_hour)`.
    ///
    /// Sessions are one hour long, so summed power in kW equals energy
    /// in kWh.
    pub fn delivered_kwh_within(&self, vehicle: usize, start_hour: usize, end_hour: usize) -> f32 {
        self.by_vehicle[vehicle]
            .iter()
            .filter(|s| s.hour >= start_hour && s.hour < end_hour)
            .map(|s| s.power_kw)
            .sum()
    }

    /// Total number of sessions at `hour` across all vehicles.
    pub fn sessions_at_hour(&self, hour: usize) -> usize {
        self.by_vehicle
            .iter()
            .map(|sessions| sessions.iter().filter(|s| s.hour == hour).count())
            .sum()
    }
}

/// One simulated hour of a vehicle's state-of-charge trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocSample {
    /// Service-day index, capped at [`LAST_SERVICE_DAY`].
    pub day: usize,
    /// Absolute hour.
    pub hour: usize,
    /// Grid power drawn this hour (kW).
    pub power_kw: f32,
    /// State of charge after this hour (0.0 to 1.0).
    pub soc: f32,
}

/// Cost of one charging hour for a vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRecord {
    /// Service-day index, capped at [`LAST_SERVICE_DAY`].
    pub day: usize,
    /// Absolute hour.
    pub hour: usize,
    /// Energy cost for the hour (EUR).
    pub cost_eur: f32,
}
