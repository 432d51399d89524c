//! # Sizing Simulation
//!
//! Derives collection volumes, staffing and equipment for a recycling-sorting
//! operation from a population, a coverage percentage and a truck choice.
//!
//! Follows the crate-wide pattern:
//!
//! - [`SimulationInput`] - Input parameters (JSON-serializable)
//! - [`SimulationResult`] - Derived figures (JSON-serializable)
//! - [`calculate`] - Pure calculation function
//!
//! ## Pipeline
//!
//! ```text
//! population × coverage ─► served ─► generated waste ─► daily collection
//!                                                        │
//!          trucks ◄── truck capacity × trips ◄───────────┤
//!          sorters ◄── sorting target (t/day) ◄──────────┤
//!                      └─► material to press ─► presses, press operators, forklift
//!          displacement ◄── sorters
//!          admin ◄── operational subtotal
//!          scales ◄── monthly collection
//! ```
//!
//! Every headcount and unit count is a ceiling of its continuous demand.
//! Trucks and presses never drop below one.
//!
//! ## Example
//!
//! ```rust
//! use triagem_core::calibration::CalibrationProfile;
//! use triagem_core::simulation::{CalculatorEngine, SimulationInput};
//! use triagem_core::trucks::TruckType;
//!
//! let engine = CalculatorEngine::new(CalibrationProfile::fixed_press());
//! let input = SimulationInput::new(100_000, 100.0, TruckType::Compactador);
//!
//! let result = engine.calculate(&input).unwrap();
//! assert_eq!(result.infrastructure.trucks, 3);
//! assert_eq!(result.staff.sorters, 50);
//! assert_eq!(result.staff.total, 89);
//! ```

use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationConstants, CalibrationProfile};
use crate::errors::{CalcError, CalcResult};
use crate::trucks::TruckType;
use crate::units::{Kilograms, Tonnes};

/// Relative slack absorbing floating point noise before rounding a demand up
/// (e.g. `9.5 / 0.19` landing a hair above 50 sorters).
const CEIL_RELATIVE_TOLERANCE: f64 = 1e-12;

/// Input parameters for a sizing run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "population": 100000,
///   "coverage_pct": 100.0,
///   "truck_type": "Compactador",
///   "custom_volume_m3": null,
///   "press_capacity_tons": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Total population of the municipality
    pub population: u64,

    /// Share of the population served by collection (%)
    pub coverage_pct: f64,

    /// Collection truck variant
    #[serde(default)]
    pub truck_type: TruckType,

    /// Body volume override (m³); density still comes from `truck_type`
    #[serde(default)]
    pub custom_volume_m3: Option<f64>,

    /// Press throughput override (t/day); honored only by profiles that accept it
    #[serde(default)]
    pub press_capacity_tons: Option<f64>,
}

impl SimulationInput {
    /// Create an input with no overrides.
    pub fn new(population: u64, coverage_pct: f64, truck_type: TruckType) -> Self {
        SimulationInput {
            population,
            coverage_pct,
            truck_type,
            custom_volume_m3: None,
            press_capacity_tons: None,
        }
    }

    /// Set a custom body volume (m³).
    pub fn with_custom_volume(mut self, volume_m3: f64) -> Self {
        self.custom_volume_m3 = Some(volume_m3);
        self
    }

    /// Set a press capacity override (t/day).
    pub fn with_press_capacity(mut self, tons_per_day: f64) -> Self {
        self.press_capacity_tons = Some(tons_per_day);
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.population == 0 {
            return Err(CalcError::invalid_input(
                "population",
                self.population.to_string(),
                "Population must be positive",
            ));
        }
        if !self.coverage_pct.is_finite() || !(0.0..=100.0).contains(&self.coverage_pct) {
            return Err(CalcError::invalid_input(
                "coverage_pct",
                self.coverage_pct.to_string(),
                "Coverage must be between 0 and 100",
            ));
        }
        if let Some(volume) = self.custom_volume_m3 {
            if !volume.is_finite() || volume <= 0.0 {
                return Err(CalcError::invalid_input(
                    "custom_volume_m3",
                    volume.to_string(),
                    "Custom truck volume must be positive",
                ));
            }
        }
        if let Some(tons) = self.press_capacity_tons {
            if !tons.is_finite() || tons <= 0.0 {
                return Err(CalcError::invalid_input(
                    "press_capacity_tons",
                    tons.to_string(),
                    "Press capacity must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Echo of the caller's inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEcho {
    pub population: u64,
    pub coverage_pct: f64,
    pub truck_type: TruckType,
    pub custom_volume_m3: Option<f64>,
}

/// Calibration values actually applied to a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCalibration {
    /// Profile name
    pub profile: String,
    /// Full constant set
    pub constants: CalibrationConstants,
    /// Effective body volume (custom override or preset) (m³)
    pub truck_volume_m3: f64,
    /// Bulk density of the truck variant (kg/m³)
    pub truck_density_kg_m3: f64,
    /// Press throughput sized against (t/day)
    pub press_capacity_tons: f64,
}

/// Collection and processing volumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionMetrics {
    /// Inhabitants served
    pub population_served: f64,
    /// Waste generated by the served population (kg/day)
    pub waste_generated_kg_per_day: f64,
    /// Waste actually collected (kg/day)
    pub daily_collection_kg: f64,
    /// Waste actually collected (t/day); also the daily sorting target
    pub daily_collection_tons: f64,
    /// Waste collected over the working month (t/month)
    pub monthly_collection_tons: f64,
    /// Load per truck trip (kg)
    pub truck_capacity_kg: f64,
    /// Sorted material sent to the press (t/day)
    pub material_to_press_tons: f64,
    /// Share of sorted material that is not rejected (%)
    pub efficiency_pct: f64,
}

impl ProductionMetrics {
    /// Material sorted and kept over the month (t/month)
    pub fn monthly_sorted_tons(&self) -> f64 {
        self.monthly_collection_tons * self.efficiency_pct / 100.0
    }
}

/// Headcount by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingPlan {
    pub admin: u32,
    pub drivers: u32,
    pub helpers: u32,
    pub sorters: u32,
    pub press_operators: u32,
    pub forklift: u32,
    pub displacement: u32,
    pub total: u32,
}

impl StaffingPlan {
    /// Everyone except admin staff
    pub fn operational(&self) -> u32 {
        self.total.saturating_sub(self.admin)
    }
}

/// Equipment counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructurePlan {
    pub trucks: u32,
    pub presses: u32,
    pub scales: u32,
    /// One forklift per forklift operator
    pub forklifts: u32,
}

/// Results from a sizing run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "inputs": { "population": 100000, "coverage_pct": 100.0, ... },
///   "defaults_used": { "profile": "fixed-press", "truck_volume_m3": 15.0, ... },
///   "production": { "daily_collection_tons": 9.5, "monthly_collection_tons": 209.0, ... },
///   "staff": { "sorters": 50, "total": 89, ... },
///   "infrastructure": { "trucks": 3, "presses": 2, "scales": 1, "forklifts": 1 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub inputs: InputEcho,
    pub defaults_used: AppliedCalibration,
    pub production: ProductionMetrics,
    pub staff: StaffingPlan,
    pub infrastructure: InfrastructurePlan,
}

/// Round a non-negative demand up to whole units.
///
/// Fails when the count does not fit in `u32` rather than saturating.
fn ceil_units(field: &str, demand: f64) -> CalcResult<u32> {
    if demand <= 0.0 {
        return Ok(0);
    }
    let units = (demand - demand * CEIL_RELATIVE_TOLERANCE).ceil();
    if units > f64::from(u32::MAX) {
        return Err(CalcError::invalid_input(
            field,
            demand.to_string(),
            "Demand exceeds the countable range; population is too large",
        ));
    }
    Ok(units as u32)
}

/// Sum headcounts, failing instead of overflowing.
fn sum_units(field: &str, counts: &[u32]) -> CalcResult<u32> {
    counts
        .iter()
        .try_fold(0u32, |acc, &n| acc.checked_add(n))
        .ok_or_else(|| CalcError::invalid_input(field, format!("{:?}", counts), "Headcount exceeds the countable range"))
}

/// Run the sizing pipeline against a calibration profile.
///
/// # Returns
///
/// * `Ok(SimulationResult)` - Derived figures
/// * `Err(CalcError::InvalidInput)` - If the input or the profile constants are invalid
pub fn calculate(input: &SimulationInput, profile: &CalibrationProfile) -> CalcResult<SimulationResult> {
    input.validate()?;
    profile.constants.validate()?;

    let c = &profile.constants;
    let preset = input.truck_type.spec();
    let truck = match input.custom_volume_m3 {
        Some(volume) => preset.with_volume(volume),
        None => preset,
    };

    // Production
    let population_served = input.population as f64 * (input.coverage_pct / 100.0);
    let waste_generated = Kilograms(population_served * c.generation_per_capita_kg);
    let daily_collection = waste_generated * (c.catch_rate_pct / 100.0);
    let monthly_collection: Tonnes = (daily_collection * f64::from(c.work_days_per_month)).into();

    // Fleet
    let truck_capacity = truck.capacity();
    let daily_truck_capacity = truck_capacity.0 * f64::from(c.trips_per_day);
    let trucks = ceil_units("trucks", daily_collection.0 / daily_truck_capacity)?.max(1);

    // Sorting and pressing
    let sorting_target: Tonnes = daily_collection.into();
    let sorters = ceil_units("sorters", sorting_target.0 / c.sorting_capacity_tons_per_person)?;
    let material_to_press = sorting_target * (1.0 - c.reject_rate);

    let press_capacity = profile
        .press_capacity
        .resolve(input.press_capacity_tons, c.default_press_capacity_tons);
    let presses = ceil_units("presses", material_to_press.0 / press_capacity)?.max(1);
    let press_operators = ceil_units("press_operators", material_to_press.0 / c.press_tons_per_operator)?;

    // Crew
    let drivers = trucks;
    let helpers = ceil_units("helpers", f64::from(trucks) * c.helpers_per_truck)?;
    let forklift = if profile.forklift.is_active(material_to_press.0) {
        ceil_units("forklift", material_to_press.0 / c.forklift_tons_per_operator)?.max(1)
    } else {
        0
    };
    let displacement = ceil_units("displacement", f64::from(sorters) / c.displacement_ratio)?;

    let operational = sum_units(
        "operational_staff",
        &[sorters, press_operators, drivers, helpers, forklift, displacement],
    )?;
    let admin = ceil_units("admin", f64::from(operational) / c.admin_ratio)?;
    let total = sum_units("total_staff", &[operational, admin])?;

    let scales = profile.scales.scales_for(monthly_collection.0);

    tracing::debug!(
        profile = %profile.name,
        population_served,
        daily_collection_kg = daily_collection.0,
        trucks,
        presses,
        total_staff = total,
        "sizing calculated"
    );

    Ok(SimulationResult {
        inputs: InputEcho {
            population: input.population,
            coverage_pct: input.coverage_pct,
            truck_type: input.truck_type,
            custom_volume_m3: input.custom_volume_m3,
        },
        defaults_used: AppliedCalibration {
            profile: profile.name.clone(),
            constants: *c,
            truck_volume_m3: truck.volume.0,
            truck_density_kg_m3: truck.density.0,
            press_capacity_tons: press_capacity,
        },
        production: ProductionMetrics {
            population_served,
            waste_generated_kg_per_day: waste_generated.0,
            daily_collection_kg: daily_collection.0,
            daily_collection_tons: sorting_target.0,
            monthly_collection_tons: monthly_collection.0,
            truck_capacity_kg: truck_capacity.0,
            material_to_press_tons: material_to_press.0,
            efficiency_pct: (1.0 - c.reject_rate) * 100.0,
        },
        staff: StaffingPlan {
            admin,
            drivers,
            helpers,
            sorters,
            press_operators,
            forklift,
            displacement,
            total,
        },
        infrastructure: InfrastructurePlan {
            trucks,
            presses,
            scales,
            forklifts: forklift,
        },
    })
}

/// Sizing engine bound to one calibration profile.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone, Default)]
pub struct CalculatorEngine {
    profile: CalibrationProfile,
}

impl CalculatorEngine {
    /// Create an engine for a profile. Constants are checked on every run.
    pub fn new(profile: CalibrationProfile) -> Self {
        CalculatorEngine { profile }
    }

    /// Create an engine, rejecting an invalid profile up front.
    pub fn try_new(profile: CalibrationProfile) -> CalcResult<Self> {
        profile.validate()?;
        Ok(CalculatorEngine { profile })
    }

    /// The profile this engine sizes against
    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Run the sizing pipeline. See [`calculate`].
    pub fn calculate(&self, input: &SimulationInput) -> CalcResult<SimulationResult> {
        calculate(input, &self.profile)
    }
}
