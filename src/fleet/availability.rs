//! Plug-in availability grid: which vehicles are physically connectable
//! at which absolute hours.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::fleet::{Fleet, InputError};
use crate::sim::types::HOURS_PER_DAY;

/// Vehicle-by-hour plug-in availability.
///
/// Only hours present in the grid are schedulable at all; the scheduler
/// skips absent hours without error. Rows are indexed by roster order.
#[derive(Debug, Clone)]
pub struct AvailabilityGrid {
    vehicle_count: usize,
    hours: BTreeMap<usize, Vec<bool>>,
}

impl AvailabilityGrid {
    /// Creates an empty grid (no hours defined) for `vehicle_count` vehicles.
    pub fn empty(vehicle_count: usize) -> Self {
        Self {
            vehicle_count,
            hours: BTreeMap::new(),
        }
    }

    /// Grid where every vehicle is available every hour of the horizon.
    pub fn always(vehicle_count: usize, total_hours: usize) -> Self {
        let mut grid = Self::empty(vehicle_count);
        for hour in 0..total_hours {
            grid.hours.insert(hour, vec![true; vehicle_count]);
        }
        grid
    }

    /// Grid where vehicles are plugged in between `arrive_hour` and
    /// `depart_hour` (hours of day, window wraps midnight when
    /// `arrive_hour > depart_hour`).
    pub fn overnight(
        vehicle_count: usize,
        total_hours: usize,
        arrive_hour: usize,
        depart_hour: usize,
    ) -> Self {
        assert!(arrive_hour < HOURS_PER_DAY);
        assert!(depart_hour < HOURS_PER_DAY);

        let mut grid = Self::empty(vehicle_count);
        for hour in 0..total_hours {
            let tod = hour % HOURS_PER_DAY;
            let plugged = if arrive_hour <= depart_hour {
                tod >= arrive_hour && tod < depart_hour
            } else {
                tod >= arrive_hour || tod < depart_hour
            };
            grid.hours.insert(hour, vec![plugged; vehicle_count]);
        }
        grid
    }

    /// Grid where each (vehicle, hour) cell is independently plugged in
    /// with probability `p_plugged`, sampled from a seeded RNG.
    ///
    /// Deterministic for a fixed seed and roster size.
    pub fn random(vehicle_count: usize, total_hours: usize, p_plugged: f32, seed: u64) -> Self {
        assert!((0.0..=1.0).contains(&p_plugged));

        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Self::empty(vehicle_count);
        for hour in 0..total_hours {
            let flags = (0..vehicle_count)
                .map(|_| rng.random::<f32>() < p_plugged)
                .collect();
            grid.hours.insert(hour, flags);
        }
        grid
    }

    /// Parses a grid from CSV text with header `hour,<id>,<id>,...`.
    ///
    /// Cells are `0` or `1`. Every column id must exist in the roster;
    /// roster vehicles without a column are never available. Hours not
    /// listed stay undefined.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] on malformed CSV, non-numeric hours,
    /// cells other than `0`/`1`, or a column naming an unknown vehicle.
    pub fn from_csv_str(raw: &str, fleet: &Fleet) -> Result<Self, InputError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(raw.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| InputError::new("availability", e.to_string()))?
            .clone();
        if headers.is_empty() || &headers[0] != "hour" {
            return Err(InputError::new(
                "availability",
                "first column must be `hour`",
            ));
        }

        // column position -> roster index
        let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
        for id in headers.iter().skip(1) {
            let idx = fleet.index_of(id).ok_or_else(|| {
                InputError::new("availability", format!("unknown vehicle id \"{id}\""))
            })?;
            columns.push(idx);
        }

        let mut grid = Self::empty(fleet.len());
        for record in rdr.records() {
            let record = record.map_err(|e| InputError::new("availability", e.to_string()))?;
            let hour: usize = record
                .get(0)
                .unwrap_or("")
                .trim()
                .parse()
                .map_err(|_| InputError::new("availability", "hour must be an integer"))?;

            let mut flags = vec![false; fleet.len()];
            for (pos, &vehicle) in columns.iter().enumerate() {
                let cell = record.get(pos + 1).unwrap_or("").trim();
                flags[vehicle] = match cell {
                    "1" => true,
                    "0" => false,
                    other => {
                        return Err(InputError::new(
                            "availability",
                            format!("cell at hour {hour} must be 0 or 1, got \"{other}\""),
                        ));
                    }
                };
            }
            grid.hours.insert(hour, flags);
        }
        Ok(grid)
    }

    /// Loads a grid from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the file cannot be read or parsed.
    pub fn from_csv_file(path: &Path, fleet: &Fleet) -> Result<Self, InputError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            InputError::new(
                "availability",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_csv_str(&raw, fleet)
    }

    /// Number of vehicles the grid covers.
    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    /// Whether the grid defines `hour` at all.
    pub fn is_defined(&self, hour: usize) -> bool {
        self.hours.contains_key(&hour)
    }

    /// Whether `vehicle` can plug in at `hour`. Undefined hours are
    /// unavailable.
    pub fn is_available(&self, vehicle: usize, hour: usize) -> bool {
        self.hours
            .get(&hour)
            .is_some_and(|flags| flags.get(vehicle).copied().unwrap_or(false))
    }

    /// Sets one cell, defining the hour if absent.
    pub fn set(&mut self, hour: usize, vehicle: usize, available: bool) {
        let count = self.vehicle_count;
        self.hours.entry(hour).or_insert_with(|| vec![false; count])[vehicle] = available;
    }
}
