use std::fmt;

/// An electric vehicle in the depot roster.
///
/// Immutable for the run: battery state lives in the simulator's trace,
/// not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Unique roster identifier.
    pub id: String,
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f32,
    /// Maximum charge power in kilowatts.
    pub max_charge_rate_kw: f32,
}

impl Vehicle {
    /// Creates a new vehicle.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique roster identifier
    /// * `capacity_kwh` - Battery capacity in kWh (must be > 0)
    /// * `max_charge_rate_kw` - Maximum charge power in kW (must be > 0)
    ///
    /// # Panics
    ///
    /// Panics if `capacity_kwh` or `max_charge_rate_kw` is not positive.
    pub fn new(id: impl Into<String>, capacity_kwh: f32, max_charge_rate_kw: f32) -> Self {
        assert!(capacity_kwh > 0.0);
        assert!(max_charge_rate_kw > 0.0);
        Self {
            id: id.into(),
            capacity_kwh,
            max_charge_rate_kw,
        }
    }
}

/// The vehicle roster, fixing the index order used everywhere downstream.
///
/// The availability grid, schedule, and traces all address vehicles by
/// their position here, so candidate ordering (and therefore scheduling
/// tie-breaks) is deterministic for a fixed roster.
#[derive(Debug, Clone)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    /// Creates a fleet from a vehicle list.
    ///
    /// # Panics
    ///
    /// Panics if two vehicles share an id.
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        for (i, v) in vehicles.iter().enumerate() {
            assert!(
                !vehicles[..i].iter().any(|other| other.id == v.id),
                "duplicate vehicle id {:?}",
                v.id
            );
        }
        Self { vehicles }
    }

    /// Number of vehicles in the roster.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Returns `true` when the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicle at roster index `idx`.
    pub fn get(&self, idx: usize) -> &Vehicle {
        &self.vehicles[idx]
    }

    /// Roster index of the vehicle with the given id, if present.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.vehicles.iter().position(|v| v.id == id)
    }

    /// Iterates vehicles in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.0} kWh, {:.1} kW)",
            self.id, self.capacity_kwh, self.max_charge_rate_kw
        )
    }
}
