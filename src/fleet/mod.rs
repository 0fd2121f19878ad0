//! Fleet-side input models: vehicle roster, plug-in availability, prices.

/// Plug-in availability grid and its generators.
pub mod availability;
/// Hourly price table with fallback pricing.
pub mod prices;
/// Vehicle and roster types.
pub mod vehicle;

pub use availability::AvailabilityGrid;
pub use prices::PriceTable;
pub use vehicle::Fleet;
pub use vehicle::Vehicle;

use std::fmt;

/// Malformed or unreadable input data. Fatal: the run aborts without
/// partial output.
#[derive(Debug)]
pub struct InputError {
    /// Which input surfaced the error (e.g. `"availability"`, `"prices"`).
    pub source: String,
    /// Human-readable description.
    pub message: String,
}

impl InputError {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input error: {} — {}", self.source, self.message)
    }
}
