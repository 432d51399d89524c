//! # Scenario Records
//!
//! Flat records handed to a [`ScenarioStore`](crate::external::ScenarioStore).
//! A saved scenario is two rows: the header ([`ScenarioRecord`]) combining
//! inputs, applied calibration, production and staffing figures, and the
//! infrastructure detail ([`InfrastructureRecord`]) keyed by the identifier
//! the store generated for the header.
//!
//! ## Example
//!
//! ```rust
//! use triagem_core::calibration::CalibrationProfile;
//! use triagem_core::scenario::{InfrastructureRecord, ScenarioId, ScenarioRecord};
//! use triagem_core::simulation::{calculate, SimulationInput};
//! use triagem_core::trucks::TruckType;
//!
//! let input = SimulationInput::new(100_000, 100.0, TruckType::Compactador);
//! let result = calculate(&input, &CalibrationProfile::default()).unwrap();
//!
//! let header = ScenarioRecord::new(&input, &result).with_label("Campinas");
//! assert_eq!(header.staff_total, 89);
//!
//! let detail = InfrastructureRecord::new(ScenarioId::from("42"), &result.infrastructure);
//! assert_eq!(detail.trucks, 3);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::simulation::{InfrastructurePlan, SimulationInput, SimulationResult};
use crate::trucks::TruckType;

/// Identifier a store assigns to a saved scenario header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub String);

impl ScenarioId {
    /// Random identifier, for stores that do not generate their own
    pub fn generate() -> Self {
        ScenarioId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScenarioId {
    fn from(s: &str) -> Self {
        ScenarioId(s.to_string())
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scenario header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Client-side identifier, stable across retries of the same save
    pub record_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Free-text name (usually the municipality)
    pub label: Option<String>,
    /// Locality the population came from, if looked up
    pub locality_id: Option<String>,

    // Inputs
    pub population: u64,
    pub coverage_pct: f64,
    pub truck_type: TruckType,
    pub custom_volume_m3: Option<f64>,
    pub press_capacity_requested_tons: Option<f64>,

    // Calibration applied
    pub profile: String,
    pub generation_per_capita_kg: f64,
    pub catch_rate_pct: f64,
    pub work_days_per_month: u32,
    pub trips_per_day: u32,
    pub truck_volume_m3: f64,
    pub press_capacity_tons: f64,

    // Production
    pub monthly_collection_tons: f64,
    pub daily_collection_tons: f64,
    pub efficiency_pct: f64,

    // Staffing
    pub staff_admin: u32,
    pub staff_drivers: u32,
    pub staff_helpers: u32,
    pub staff_sorters: u32,
    pub staff_press_operators: u32,
    pub staff_forklift: u32,
    pub staff_displacement: u32,
    pub staff_total: u32,
}

impl ScenarioRecord {
    /// Flatten an input/result pair into a header row.
    pub fn new(input: &SimulationInput, result: &SimulationResult) -> Self {
        let applied = &result.defaults_used;
        let staff = &result.staff;
        ScenarioRecord {
            record_id: Uuid::new_v4(),
            created_at: Utc::now(),
            label: None,
            locality_id: None,
            population: input.population,
            coverage_pct: input.coverage_pct,
            truck_type: input.truck_type,
            custom_volume_m3: input.custom_volume_m3,
            press_capacity_requested_tons: input.press_capacity_tons,
            profile: applied.profile.clone(),
            generation_per_capita_kg: applied.constants.generation_per_capita_kg,
            catch_rate_pct: applied.constants.catch_rate_pct,
            work_days_per_month: applied.constants.work_days_per_month,
            trips_per_day: applied.constants.trips_per_day,
            truck_volume_m3: applied.truck_volume_m3,
            press_capacity_tons: applied.press_capacity_tons,
            monthly_collection_tons: result.production.monthly_collection_tons,
            daily_collection_tons: result.production.daily_collection_tons,
            efficiency_pct: result.production.efficiency_pct,
            staff_admin: staff.admin,
            staff_drivers: staff.drivers,
            staff_helpers: staff.helpers,
            staff_sorters: staff.sorters,
            staff_press_operators: staff.press_operators,
            staff_forklift: staff.forklift,
            staff_displacement: staff.displacement,
            staff_total: staff.total,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_locality(mut self, locality_id: impl Into<String>) -> Self {
        self.locality_id = Some(locality_id.into());
        self
    }
}

/// Infrastructure detail row, written after the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureRecord {
    pub scenario_id: ScenarioId,
    pub trucks: u32,
    pub presses: u32,
    pub scales: u32,
    pub forklifts: u32,
}

impl InfrastructureRecord {
    pub fn new(scenario_id: ScenarioId, plan: &InfrastructurePlan) -> Self {
        InfrastructureRecord {
            scenario_id,
            trucks: plan.trucks,
            presses: plan.presses,
            scales: plan.scales,
            forklifts: plan.forklifts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationProfile;
    use crate::simulation::calculate;

    fn sample() -> (SimulationInput, SimulationResult) {
        let input = SimulationInput::new(100_000, 100.0, TruckType::Compactador).with_press_capacity(4.0);
        let result = calculate(&input, &CalibrationProfile::fixed_press()).unwrap();
        (input, result)
    }

    #[test]
    fn test_record_flattens_result() {
        let (input, result) = sample();
        let record = ScenarioRecord::new(&input, &result).with_label("Test City").with_locality("3509502");

        assert_eq!(record.label.as_deref(), Some("Test City"));
        assert_eq!(record.locality_id.as_deref(), Some("3509502"));
        assert_eq!(record.population, 100_000);
        assert_eq!(record.profile, "fixed-press");
        assert_eq!(record.press_capacity_requested_tons, Some(4.0));
        assert_eq!(record.press_capacity_tons, 8.0);
        assert_eq!(record.truck_volume_m3, 15.0);
        assert_eq!(record.staff_sorters, 50);
        assert_eq!(record.staff_total, 89);
        assert!((record.monthly_collection_tons - 209.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_is_flat_json() {
        let (input, result) = sample();
        let record = ScenarioRecord::new(&input, &result);
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.values().all(|v| !v.is_object() && !v.is_array()));
        assert_eq!(object["truck_type"], "Compactador");
    }

    #[test]
    fn test_infrastructure_record() {
        let (_, result) = sample();
        let detail = InfrastructureRecord::new(ScenarioId::from("scn-1"), &result.infrastructure);
        assert_eq!(detail.scenario_id.as_str(), "scn-1");
        assert_eq!(detail.presses, 2);
        assert_eq!(detail.scales, 1);
        assert_eq!(detail.forklifts, 1);

        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains("\"scenario_id\":\"scn-1\""));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(ScenarioId::generate(), ScenarioId::generate());
    }
}
