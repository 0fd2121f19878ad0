//! Hourly energy price table with a fixed fallback for unlisted hours.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::fleet::InputError;
use crate::sim::types::HOURS_PER_DAY;

/// Fallback price applied to hours missing from the table (EUR/kWh).
pub const DEFAULT_PRICE_EUR_PER_KWH: f32 = 0.40;

/// Absolute-hour energy prices.
#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: BTreeMap<usize, f32>,
    fallback_eur_per_kwh: f32,
}

impl PriceTable {
    /// Creates an empty table; every lookup returns `fallback_eur_per_kwh`.
    pub fn new(fallback_eur_per_kwh: f32) -> Self {
        assert!(fallback_eur_per_kwh >= 0.0);
        Self {
            prices: BTreeMap::new(),
            fallback_eur_per_kwh,
        }
    }

    /// Builds a table by repeating a 24-entry daily pattern across the
    /// horizon.
    ///
    /// # Panics
    ///
    /// Panics if `day_pattern` does not hold exactly 24 entries.
    pub fn from_day_pattern(
        day_pattern: &[f32],
        total_hours: usize,
        fallback_eur_per_kwh: f32,
    ) -> Self {
        assert_eq!(day_pattern.len(), HOURS_PER_DAY, "day pattern must have 24 entries");
        let mut table = Self::new(fallback_eur_per_kwh);
        for hour in 0..total_hours {
            table.prices.insert(hour, day_pattern[hour % HOURS_PER_DAY]);
        }
        table
    }

    /// Parses a table from CSV text with header `hour,price_eur_per_kwh`.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] on malformed CSV or non-numeric values.
    pub fn from_csv_str(raw: &str, fallback_eur_per_kwh: f32) -> Result<Self, InputError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(raw.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| InputError::new("prices", e.to_string()))?;
        if headers.len() < 2 || &headers[0] != "hour" {
            return Err(InputError::new(
                "prices",
                "expected header `hour,price_eur_per_kwh`",
            ));
        }

        let mut table = Self::new(fallback_eur_per_kwh);
        for record in rdr.records() {
            let record = record.map_err(|e| InputError::new("prices", e.to_string()))?;
            let hour: usize = record
                .get(0)
                .unwrap_or("")
                .trim()
                .parse()
                .map_err(|_| InputError::new("prices", "hour must be an integer"))?;
            let price: f32 = record
                .get(1)
                .unwrap_or("")
                .trim()
                .parse()
                .map_err(|_| InputError::new("prices", format!("bad price at hour {hour}")))?;
            table.prices.insert(hour, price);
        }
        Ok(table)
    }

    /// Loads a table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the file cannot be read or parsed.
    pub fn from_csv_file(path: &Path, fallback_eur_per_kwh: f32) -> Result<Self, InputError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            InputError::new("prices", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_csv_str(&raw, fallback_eur_per_kwh)
    }

    /// Price for `hour`, falling back to the table's fallback when the
    /// hour is unlisted.
    pub fn price_at(&self, hour: usize) -> f32 {
        self.prices
            .get(&hour)
            .copied()
            .unwrap_or(self.fallback_eur_per_kwh)
    }

    /// Sets the price for one hour.
    pub fn insert(&mut self, hour: usize, price_eur_per_kwh: f32) {
        self.prices.insert(hour, price_eur_per_kwh);
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_EUR_PER_KWH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_hour_uses_fallback() {
        let mut table = PriceTable::default();
        table.insert(20, 0.28);
        assert_eq!(table.price_at(20), 0.28);
        assert_eq!(table.price_at(50), DEFAULT_PRICE_EUR_PER_KWH);
    }

    #[test]
    fn day_pattern_repeats() {
        let mut pattern = vec![0.30; 24];
        pattern[3] = 0.10;
        let table = PriceTable::from_day_pattern(&pattern, 72, 0.40);
        assert_eq!(table.price_at(3), 0.10);
        assert_eq!(table.price_at(27), 0.10);
        assert_eq!(table.price_at(51), 0.10);
        assert_eq!(table.price_at(5), 0.30);
        // past the horizon the table is unlisted
        assert_eq!(table.price_at(72), 0.40);
    }

    #[test]
    fn csv_parses() {
        let raw = "hour,price_eur_per_kwh\n18,0.32\n19,0.35\n";
        let table = PriceTable::from_csv_str(raw, 0.40).expect("table should parse");
        assert_eq!(table.price_at(18), 0.32);
        assert_eq!(table.price_at(19), 0.35);
        assert_eq!(table.price_at(20), 0.40);
    }

    #[test]
    fn csv_rejects_bad_price() {
        let raw = "hour,price_eur_per_kwh\n18,cheap\n";
        assert!(PriceTable::from_csv_str(raw, 0.40).is_err());
    }

    #[test]
    fn csv_rejects_bad_header() {
        let raw = "h,p\n18,0.2\n";
        assert!(PriceTable::from_csv_str(raw, 0.40).is_err());
    }
}
