//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::fleet::{AvailabilityGrid, Fleet, PriceTable, Vehicle};
use crate::sim::needs::{RequirementSpec, parse_time_hour};
use crate::sim::types::{HORIZON_START_HOUR, HOURS_PER_DAY, SimConfig};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run timing, port count, and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// The vehicle roster.
    #[serde(default)]
    pub vehicles: Vec<VehicleConfig>,
    /// Target-SoC requirements.
    #[serde(default)]
    pub requirements: Vec<RequirementConfig>,
    /// Availability grid generation parameters.
    #[serde(default)]
    pub availability: AvailabilityConfig,
    /// Energy price parameters.
    #[serde(default)]
    pub prices: PriceConfig,
}

/// Run timing, port count, and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of charging ports (must be > 0).
    pub num_ports: usize,
    /// Horizon length in absolute hours (must be > 18).
    pub total_hours: usize,
    /// Fleet-wide starting state of charge (0.0 to 1.0).
    pub initial_soc: f32,
    /// Master random seed for generated availability.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ports: 3,
            total_hours: 168,
            initial_soc: 0.2,
            seed: 42,
        }
    }
}

/// One roster vehicle.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleConfig {
    /// Unique roster identifier.
    pub id: String,
    /// Battery capacity (kWh).
    pub capacity_kwh: f32,
    /// Maximum charge rate (kW).
    pub max_charge_rate_kw: f32,
}

/// One target-SoC requirement.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementConfig {
    /// Roster id of the vehicle.
    pub vehicle: String,
    /// Day index the charge is needed for.
    pub day: usize,
    /// Deadline time of day as `"HH:MM"`.
    pub time: String,
    /// Target state of charge (0.0 to 1.0).
    pub target_soc: f32,
}

/// Availability grid generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvailabilityConfig {
    /// Grid model: `"always"`, `"overnight"`, or `"random"`.
    pub model: String,
    /// Depot arrival hour of day for the overnight model.
    pub arrive_hour: usize,
    /// Depot departure hour of day for the overnight model.
    pub depart_hour: usize,
    /// Per-cell plug-in probability for the random model (0.0 to 1.0).
    pub p_plugged: f32,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            model: "overnight".to_string(),
            arrive_hour: 18,
            depart_hour: 8,
            p_plugged: 0.7,
        }
    }
}

/// Energy price parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Price applied to hours missing from the table (EUR/kWh).
    pub fallback_eur_per_kwh: f32,
    /// Optional 24-entry daily price pattern repeated across the
    /// horizon; empty means every hour uses the fallback.
    pub day_pattern: Vec<f32>,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            fallback_eur_per_kwh: 0.40,
            day_pattern: Vec::new(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.num_ports"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

fn baseline_day_pattern() -> Vec<f32> {
    let mut pattern = vec![0.32; HOURS_PER_DAY];
    for slot in pattern.iter_mut().take(6) {
        *slot = 0.22;
    }
    for slot in pattern.iter_mut().take(21).skip(17) {
        *slot = 0.45;
    }
    pattern
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a small mixed depot fleet over one
    /// week with three ports.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            vehicles: vec![
                VehicleConfig {
                    id: "EV1".to_string(),
                    capacity_kwh: 50.0,
                    max_charge_rate_kw: 11.0,
                },
                VehicleConfig {
                    id: "EV2".to_string(),
                    capacity_kwh: 60.0,
                    max_charge_rate_kw: 7.4,
                },
                VehicleConfig {
                    id: "EV3".to_string(),
                    capacity_kwh: 75.0,
                    max_charge_rate_kw: 22.0,
                },
            ],
            requirements: vec![
                RequirementConfig {
                    vehicle: "EV1".to_string(),
                    day: 0,
                    time: "07:00".to_string(),
                    target_soc: 0.8,
                },
                RequirementConfig {
                    vehicle: "EV1".to_string(),
                    day: 2,
                    time: "07:00".to_string(),
                    target_soc: 0.9,
                },
                RequirementConfig {
                    vehicle: "EV2".to_string(),
                    day: 0,
                    time: "06:30".to_string(),
                    target_soc: 0.7,
                },
                RequirementConfig {
                    vehicle: "EV2".to_string(),
                    day: 1,
                    time: "08:00".to_string(),
                    target_soc: 0.85,
                },
                RequirementConfig {
                    vehicle: "EV2".to_string(),
                    day: 4,
                    time: "07:00".to_string(),
                    target_soc: 0.75,
                },
            ],
            availability: AvailabilityConfig::default(),
            prices: PriceConfig {
                fallback_eur_per_kwh: 0.40,
                day_pattern: baseline_day_pattern(),
            },
        }
    }

    /// Returns the port-crunch preset: five vehicles competing for two
    /// ports with daily deadlines.
    pub fn port_crunch() -> Self {
        let vehicles = vec![
            VehicleConfig {
                id: "VAN1".to_string(),
                capacity_kwh: 70.0,
                max_charge_rate_kw: 11.0,
            },
            VehicleConfig {
                id: "VAN2".to_string(),
                capacity_kwh: 70.0,
                max_charge_rate_kw: 11.0,
            },
            VehicleConfig {
                id: "VAN3".to_string(),
                capacity_kwh: 85.0,
                max_charge_rate_kw: 22.0,
            },
            VehicleConfig {
                id: "CAR1".to_string(),
                capacity_kwh: 40.0,
                max_charge_rate_kw: 7.4,
            },
            VehicleConfig {
                id: "CAR2".to_string(),
                capacity_kwh: 40.0,
                max_charge_rate_kw: 7.4,
            },
        ];
        let mut requirements = Vec::new();
        for day in 0..5 {
            for id in ["VAN1", "VAN2", "VAN3"] {
                requirements.push(RequirementConfig {
                    vehicle: id.to_string(),
                    day,
                    time: "06:00".to_string(),
                    target_soc: 0.9,
                });
            }
        }
        Self {
            simulation: SimulationConfig {
                num_ports: 2,
                ..SimulationConfig::default()
            },
            vehicles,
            requirements,
            availability: AvailabilityConfig {
                arrive_hour: 19,
                depart_hour: 6,
                ..AvailabilityConfig::default()
            },
            prices: PriceConfig {
                fallback_eur_per_kwh: 0.45,
                day_pattern: baseline_day_pattern(),
            },
        }
    }

    /// Returns the weekend-lull preset: a small roster with patchy
    /// random availability and a single deadline.
    pub fn weekend_lull() -> Self {
        Self {
            simulation: SimulationConfig {
                num_ports: 1,
                total_hours: 72,
                ..SimulationConfig::default()
            },
            vehicles: vec![
                VehicleConfig {
                    id: "EV1".to_string(),
                    capacity_kwh: 50.0,
                    max_charge_rate_kw: 11.0,
                },
                VehicleConfig {
                    id: "EV2".to_string(),
                    capacity_kwh: 30.0,
                    max_charge_rate_kw: 3.7,
                },
            ],
            requirements: vec![RequirementConfig {
                vehicle: "EV1".to_string(),
                day: 1,
                time: "10:00".to_string(),
                target_soc: 0.6,
            }],
            availability: AvailabilityConfig {
                model: "random".to_string(),
                p_plugged: 0.5,
                ..AvailabilityConfig::default()
            },
            prices: PriceConfig::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "port_crunch", "weekend_lull"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "port_crunch" => Ok(Self::port_crunch()),
            "weekend_lull" => Ok(Self::weekend_lull()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains
    /// unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.num_ports == 0 {
            errors.push(ConfigError {
                field: "simulation.num_ports".into(),
                message: "must be > 0".into(),
            });
        }
        if s.total_hours <= HORIZON_START_HOUR {
            errors.push(ConfigError {
                field: "simulation.total_hours".into(),
                message: format!("must be > {HORIZON_START_HOUR}"),
            });
        }
        if !(0.0..=1.0).contains(&s.initial_soc) {
            errors.push(ConfigError {
                field: "simulation.initial_soc".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        if self.vehicles.is_empty() {
            errors.push(ConfigError {
                field: "vehicles".into(),
                message: "at least one vehicle is required".into(),
            });
        }
        for (i, v) in self.vehicles.iter().enumerate() {
            if v.capacity_kwh <= 0.0 {
                errors.push(ConfigError {
                    field: format!("vehicles[{i}].capacity_kwh"),
                    message: "must be > 0".into(),
                });
            }
            if v.max_charge_rate_kw <= 0.0 {
                errors.push(ConfigError {
                    field: format!("vehicles[{i}].max_charge_rate_kw"),
                    message: "must be > 0".into(),
                });
            }
            if self.vehicles[..i].iter().any(|other| other.id == v.id) {
                errors.push(ConfigError {
                    field: format!("vehicles[{i}].id"),
                    message: format!("duplicate id \"{}\"", v.id),
                });
            }
        }

        for (i, r) in self.requirements.iter().enumerate() {
            if !self.vehicles.iter().any(|v| v.id == r.vehicle) {
                errors.push(ConfigError {
                    field: format!("requirements[{i}].vehicle"),
                    message: format!("unknown vehicle id \"{}\"", r.vehicle),
                });
            }
            if let Err(msg) = parse_time_hour(&r.time) {
                errors.push(ConfigError {
                    field: format!("requirements[{i}].time"),
                    message: msg,
                });
            }
            if !(0.0..=1.0).contains(&r.target_soc) {
                errors.push(ConfigError {
                    field: format!("requirements[{i}].target_soc"),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
            if (r.day + 1) * HOURS_PER_DAY > s.total_hours {
                errors.push(ConfigError {
                    field: format!("requirements[{i}].day"),
                    message: "eligibility window extends past the horizon".into(),
                });
            }
        }

        let a = &self.availability;
        if a.model != "always" && a.model != "overnight" && a.model != "random" {
            errors.push(ConfigError {
                field: "availability.model".into(),
                message: format!(
                    "must be \"always\", \"overnight\", or \"random\", got \"{}\"",
                    a.model
                ),
            });
        }
        if a.arrive_hour >= HOURS_PER_DAY {
            errors.push(ConfigError {
                field: "availability.arrive_hour".into(),
                message: "must be < 24".into(),
            });
        }
        if a.depart_hour >= HOURS_PER_DAY {
            errors.push(ConfigError {
                field: "availability.depart_hour".into(),
                message: "must be < 24".into(),
            });
        }
        if !(0.0..=1.0).contains(&a.p_plugged) {
            errors.push(ConfigError {
                field: "availability.p_plugged".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        let p = &self.prices;
        if p.fallback_eur_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "prices.fallback_eur_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if !p.day_pattern.is_empty() && p.day_pattern.len() != HOURS_PER_DAY {
            errors.push(ConfigError {
                field: "prices.day_pattern".into(),
                message: format!("must hold 24 entries, got {}", p.day_pattern.len()),
            });
        }

        errors
    }

    /// Run configuration for this scenario.
    pub fn sim_config(&self) -> SimConfig {
        let s = &self.simulation;
        SimConfig::new(s.num_ports, s.total_hours, s.initial_soc, s.seed)
    }

    /// Builds the roster in configuration order.
    pub fn fleet(&self) -> Fleet {
        Fleet::new(
            self.vehicles
                .iter()
                .map(|v| Vehicle::new(v.id.clone(), v.capacity_kwh, v.max_charge_rate_kw))
                .collect(),
        )
    }

    /// Raw requirement specs for the need deriver.
    pub fn requirement_specs(&self) -> Vec<RequirementSpec> {
        self.requirements
            .iter()
            .map(|r| RequirementSpec {
                vehicle: r.vehicle.clone(),
                day: r.day,
                time: r.time.clone(),
                target_soc: r.target_soc,
            })
            .collect()
    }

    /// Generates the availability grid configured for this scenario.
    pub fn availability_grid(&self, fleet: &Fleet) -> AvailabilityGrid {
        let s = &self.simulation;
        let a = &self.availability;
        match a.model.as_str() {
            "always" => AvailabilityGrid::always(fleet.len(), s.total_hours),
            "random" => {
                AvailabilityGrid::random(fleet.len(), s.total_hours, a.p_plugged, s.seed)
            }
            _ => AvailabilityGrid::overnight(
                fleet.len(),
                s.total_hours,
                a.arrive_hour,
                a.depart_hour,
            ),
        }
    }

    /// Builds the price table configured for this scenario.
    pub fn price_table(&self) -> PriceTable {
        let p = &self.prices;
        if p.day_pattern.is_empty() {
            PriceTable::new(p.fallback_eur_per_kwh)
        } else {
            PriceTable::from_day_pattern(
                &p.day_pattern,
                self.simulation.total_hours,
                p.fallback_eur_per_kwh,
            )
        }
    }
}
