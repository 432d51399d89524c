//! # Calibration Profiles
//!
//! Calibration constants and the behavioral policies that differ between
//! historical snapshots of the sizing model. A [`CalibrationProfile`] bundles
//! both under a name and is handed to the engine explicitly, so several
//! profiles can coexist (per region, per scenario, per model revision).
//!
//! ## Built-in Profiles
//!
//! | Name          | Press capacity      | Forklift staffing      | Scales                 |
//! |---------------|---------------------|------------------------|------------------------|
//! | `fixed-press` | calibration default | only above 0.5 t/day   | 0, 1 above 30 t/month  |
//! | `user-press`  | input override      | always (at least 1)    | 1, 2 above 50 t/month  |
//!
//! ## TOML Format
//!
//! ```toml
//! name = "regional"
//! press_capacity = "user-supplied"
//!
//! [constants]
//! catch_rate_pct = 12.0
//!
//! [forklift]
//! mode = "threshold"
//! min_tons_per_day = 0.5
//!
//! [scales]
//! base = 0
//! tiers = [{ above_monthly_tons = 30.0, count = 1 }]
//! ```
//!
//! Constants omitted from `[constants]` keep their canonical values.

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Name of the profile returned by [`CalibrationProfile::default`]
pub const DEFAULT_PROFILE: &str = "fixed-press";

/// Calibration ratios and rates.
///
/// Fractions are stored as fractions, except fields suffixed `_pct`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConstants {
    /// Waste generated per inhabitant (kg/person/day)
    pub generation_per_capita_kg: f64,
    /// Share of generated waste captured by collection (%)
    pub catch_rate_pct: f64,
    /// Operating days per month
    pub work_days_per_month: u32,
    /// Trips each truck makes per day
    pub trips_per_day: u32,
    /// Material one sorter handles (t/person/day)
    pub sorting_capacity_tons_per_person: f64,
    /// Fraction of sorted material discarded before pressing
    pub reject_rate: f64,
    /// Material one press operator handles (t/person/day)
    pub press_tons_per_operator: f64,
    /// Collection helpers per truck
    pub helpers_per_truck: f64,
    /// Operational staff per admin
    pub admin_ratio: f64,
    /// Sorters per displacement worker
    pub displacement_ratio: f64,
    /// Material one forklift operator handles (t/day)
    pub forklift_tons_per_operator: f64,
    /// Press throughput when no override applies (t/day)
    pub default_press_capacity_tons: f64,
}

impl Default for CalibrationConstants {
    fn default() -> Self {
        CalibrationConstants {
            generation_per_capita_kg: 0.95,
            catch_rate_pct: 10.0,
            work_days_per_month: 22,
            trips_per_day: 1,
            sorting_capacity_tons_per_person: 0.19,
            reject_rate: 0.15,
            press_tons_per_operator: 1.5,
            helpers_per_truck: 2.0,
            admin_ratio: 15.0,
            displacement_ratio: 3.0,
            forklift_tons_per_operator: 15.0,
            default_press_capacity_tons: 8.0,
        }
    }
}

impl CalibrationConstants {
    /// Validate every ratio.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("generation_per_capita_kg", self.generation_per_capita_kg),
            ("sorting_capacity_tons_per_person", self.sorting_capacity_tons_per_person),
            ("press_tons_per_operator", self.press_tons_per_operator),
            ("admin_ratio", self.admin_ratio),
            ("displacement_ratio", self.displacement_ratio),
            ("forklift_tons_per_operator", self.forklift_tons_per_operator),
            ("default_press_capacity_tons", self.default_press_capacity_tons),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"));
            }
        }

        if !self.helpers_per_truck.is_finite() || self.helpers_per_truck < 0.0 {
            return Err(CalcError::invalid_input(
                "helpers_per_truck",
                self.helpers_per_truck.to_string(),
                "Helpers per truck cannot be negative",
            ));
        }
        if !self.catch_rate_pct.is_finite() || self.catch_rate_pct <= 0.0 || self.catch_rate_pct > 100.0 {
            return Err(CalcError::invalid_input(
                "catch_rate_pct",
                self.catch_rate_pct.to_string(),
                "Catch rate must be in (0, 100]",
            ));
        }
        if !self.reject_rate.is_finite() || !(0.0..1.0).contains(&self.reject_rate) {
            return Err(CalcError::invalid_input(
                "reject_rate",
                self.reject_rate.to_string(),
                "Reject rate must be in [0, 1)",
            ));
        }
        if self.work_days_per_month == 0 {
            return Err(CalcError::invalid_input("work_days_per_month", "0", "Must be at least 1"));
        }
        if self.trips_per_day == 0 {
            return Err(CalcError::invalid_input("trips_per_day", "0", "Must be at least 1"));
        }
        Ok(())
    }
}

/// Where the per-unit press throughput comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PressCapacityPolicy {
    /// Always the calibration default; input overrides are ignored
    #[default]
    Fixed,
    /// The input override when present, else the calibration default
    UserSupplied,
}

impl PressCapacityPolicy {
    /// Resolve the press capacity (t/day) to size against.
    pub fn resolve(&self, override_tons: Option<f64>, default_tons: f64) -> f64 {
        match (self, override_tons) {
            (PressCapacityPolicy::UserSupplied, Some(tons)) => tons,
            (PressCapacityPolicy::Fixed, Some(tons)) => {
                tracing::warn!(
                    requested_tons = tons,
                    applied_tons = default_tons,
                    "press capacity override ignored by fixed-press profile"
                );
                default_tons
            }
            (_, None) => default_tons,
        }
    }
}

/// When forklift operators are staffed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ForkliftPolicy {
    /// Staff only when material to press exceeds the threshold (t/day)
    Threshold { min_tons_per_day: f64 },
    /// Always staff at least one operator
    Always,
}

impl Default for ForkliftPolicy {
    fn default() -> Self {
        ForkliftPolicy::Threshold { min_tons_per_day: 0.5 }
    }
}

impl ForkliftPolicy {
    /// Whether the activity level justifies forklift staffing
    pub fn is_active(&self, material_to_press_tons: f64) -> bool {
        match self {
            ForkliftPolicy::Threshold { min_tons_per_day } => material_to_press_tons > *min_tons_per_day,
            ForkliftPolicy::Always => true,
        }
    }
}

/// One step of the scale schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleTier {
    /// Tier applies when monthly collection is strictly above this (t/month)
    pub above_monthly_tons: f64,
    /// Scales installed at this tier
    pub count: u32,
}

/// Step function from monthly collection to number of scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSchedule {
    /// Scales when no tier applies
    pub base: u32,
    /// Tiers, in any order
    #[serde(default)]
    pub tiers: Vec<ScaleTier>,
}

impl Default for ScaleSchedule {
    fn default() -> Self {
        ScaleSchedule {
            base: 0,
            tiers: vec![ScaleTier { above_monthly_tons: 30.0, count: 1 }],
        }
    }
}

impl ScaleSchedule {
    /// Scales for a monthly collection; the highest exceeded tier wins.
    pub fn scales_for(&self, monthly_tons: f64) -> u32 {
        self.tiers
            .iter()
            .filter(|tier| monthly_tons > tier.above_monthly_tons)
            .max_by(|a, b| a.above_monthly_tons.total_cmp(&b.above_monthly_tons))
            .map_or(self.base, |tier| tier.count)
    }

    fn validate(&self) -> CalcResult<()> {
        for tier in &self.tiers {
            if !tier.above_monthly_tons.is_finite() || tier.above_monthly_tons < 0.0 {
                return Err(CalcError::invalid_input(
                    "scales.tiers.above_monthly_tons",
                    tier.above_monthly_tons.to_string(),
                    "Tier threshold must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

/// A named calibration snapshot: constants plus behavioral policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Profile name, echoed in results
    pub name: String,
    #[serde(default)]
    pub press_capacity: PressCapacityPolicy,
    #[serde(default)]
    pub constants: CalibrationConstants,
    #[serde(default)]
    pub forklift: ForkliftPolicy,
    #[serde(default)]
    pub scales: ScaleSchedule,
}

impl CalibrationProfile {
    /// Snapshot with fixed press capacity, thresholded forklift staffing
    /// and a single scale above 30 t/month.
    pub fn fixed_press() -> Self {
        CalibrationProfile {
            name: "fixed-press".to_string(),
            press_capacity: PressCapacityPolicy::Fixed,
            constants: CalibrationConstants::default(),
            forklift: ForkliftPolicy::Threshold { min_tons_per_day: 0.5 },
            scales: ScaleSchedule {
                base: 0,
                tiers: vec![ScaleTier { above_monthly_tons: 30.0, count: 1 }],
            },
        }
    }

    /// Snapshot with user-supplied press capacity, unconditional forklift
    /// staffing and a second scale above 50 t/month.
    pub fn user_press() -> Self {
        CalibrationProfile {
            name: "user-press".to_string(),
            press_capacity: PressCapacityPolicy::UserSupplied,
            constants: CalibrationConstants::default(),
            forklift: ForkliftPolicy::Always,
            scales: ScaleSchedule {
                base: 1,
                tiers: vec![ScaleTier { above_monthly_tons: 50.0, count: 2 }],
            },
        }
    }

    /// Validate constants and policies.
    pub fn validate(&self) -> CalcResult<()> {
        if self.name.trim().is_empty() {
            return Err(CalcError::missing_field("name"));
        }
        self.constants.validate()?;
        if let ForkliftPolicy::Threshold { min_tons_per_day } = self.forklift {
            if !min_tons_per_day.is_finite() || min_tons_per_day < 0.0 {
                return Err(CalcError::invalid_input(
                    "forklift.min_tons_per_day",
                    min_tons_per_day.to_string(),
                    "Threshold must be a non-negative number",
                ));
            }
        }
        self.scales.validate()
    }

    /// Parse and validate a profile from a TOML document.
    pub fn from_toml_str(source: &str) -> CalcResult<Self> {
        let profile: CalibrationProfile = toml::from_str(source)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a profile from a TOML file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| CalcError::invalid_input("profile_path", path.display().to_string(), e.to_string()))?;
        let profile = Self::from_toml_str(&source)?;
        tracing::info!(profile = %profile.name, path = %path.display(), "loaded calibration profile");
        Ok(profile)
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        CalibrationProfile::fixed_press()
    }
}

static BUILTIN_PROFILES: Lazy<Vec<CalibrationProfile>> =
    Lazy::new(|| vec![CalibrationProfile::fixed_press(), CalibrationProfile::user_press()]);

/// All built-in profiles
pub fn builtin_profiles() -> &'static [CalibrationProfile] {
    &BUILTIN_PROFILES
}

/// Look up a built-in profile by name (case-insensitive).
pub fn builtin_profile(name: &str) -> CalcResult<CalibrationProfile> {
    BUILTIN_PROFILES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .cloned()
        .ok_or_else(|| CalcError::profile_not_found(name))
}
