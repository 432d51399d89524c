//! # Collection Trucks
//!
//! Closed set of collection truck variants and their body specifications.
//! Every variant maps to a fixed volume and a bulk density of the waste it
//! carries; together they give the load per trip.
//!
//! | Variant       | Volume (m³) | Density (kg/m³) |
//! |---------------|-------------|-----------------|
//! | `Compactador` | 15          | 250             |
//! | `Bau`         | 24          | 60              |
//! | `Gaiola`      | 12          | 50              |
//!
//! ## Parsing
//!
//! Free-text truck names are parsed at the boundary. [`TruckType::from_str_flexible`]
//! rejects unknown names; [`TruckType::from_str_or_default`] falls back to
//! [`TruckType::Compactador`] and logs a warning.
//!
//! ## Example
//!
//! ```rust
//! use triagem_core::trucks::TruckType;
//!
//! let truck = TruckType::from_str_or_default("gaiola");
//! assert_eq!(truck, TruckType::Gaiola);
//! assert_eq!(truck.spec().capacity().0, 600.0);
//!
//! assert_eq!(TruckType::from_str_or_default("tanker"), TruckType::Compactador);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{CubicMeters, KgPerCubicMeter, Kilograms};

/// Smallest custom body volume the sizing form accepts (m³)
pub const CUSTOM_VOLUME_MIN_M3: f64 = 10.0;

/// Largest custom body volume the sizing form accepts (m³)
pub const CUSTOM_VOLUME_MAX_M3: f64 = 100.0;

/// Collection truck variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TruckType {
    /// Compactor truck
    #[default]
    Compactador,
    /// Box truck
    Bau,
    /// Cage truck
    Gaiola,
}

impl TruckType {
    /// All truck variants for selection lists
    pub const ALL: [TruckType; 3] = [TruckType::Compactador, TruckType::Bau, TruckType::Gaiola];

    /// Body specification for this variant
    pub fn spec(&self) -> TruckSpec {
        match self {
            TruckType::Compactador => TruckSpec::new(15.0, 250.0),
            TruckType::Bau => TruckSpec::new(24.0, 60.0),
            TruckType::Gaiola => TruckSpec::new(12.0, 50.0),
        }
    }

    /// Key used in forms and persisted records
    pub fn code(&self) -> &'static str {
        match self {
            TruckType::Compactador => "Compactador",
            TruckType::Bau => "Bau",
            TruckType::Gaiola => "Gaiola",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TruckType::Compactador => "Compactor",
            TruckType::Bau => "Box body",
            TruckType::Gaiola => "Cage body",
        }
    }

    /// Parse from common string representations, rejecting unknown names
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "compactador" | "compactor" => Ok(TruckType::Compactador),
            "bau" | "baú" | "box" => Ok(TruckType::Bau),
            "gaiola" | "cage" => Ok(TruckType::Gaiola),
            _ => Err(CalcError::unknown_truck_type(s)),
        }
    }

    /// Parse a truck name, falling back to the default variant when unknown.
    pub fn from_str_or_default(s: &str) -> Self {
        match Self::from_str_flexible(s) {
            Ok(truck) => truck,
            Err(_) => {
                tracing::warn!(truck = s, fallback = TruckType::default().code(), "unknown truck type");
                TruckType::default()
            }
        }
    }

    /// Find the preset whose body volume equals `volume_m3`, if any.
    ///
    /// Custom volumes that land exactly on a preset are reported as that preset.
    pub fn matching_preset(volume_m3: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| (t.spec().volume.0 - volume_m3).abs() < f64::EPSILON)
    }
}

impl std::fmt::Display for TruckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Truck body specification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckSpec {
    /// Body volume (m³)
    pub volume: CubicMeters,
    /// Bulk density of the loaded waste (kg/m³)
    pub density: KgPerCubicMeter,
}

impl TruckSpec {
    /// Create a spec from raw volume (m³) and density (kg/m³)
    pub fn new(volume_m3: f64, density_kg_m3: f64) -> Self {
        TruckSpec {
            volume: CubicMeters(volume_m3),
            density: KgPerCubicMeter(density_kg_m3),
        }
    }

    /// Load carried in a single trip
    pub fn capacity(&self) -> Kilograms {
        self.volume * self.density
    }

    /// Same density with a different body volume
    pub fn with_volume(self, volume_m3: f64) -> Self {
        TruckSpec {
            volume: CubicMeters(volume_m3),
            ..self
        }
    }
}

/// Clamp a user-entered custom volume to the accepted range
pub fn clamp_custom_volume(volume_m3: f64) -> f64 {
    volume_m3.clamp(CUSTOM_VOLUME_MIN_M3, CUSTOM_VOLUME_MAX_M3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_capacities() {
        assert_eq!(TruckType::Compactador.spec().capacity(), Kilograms(3750.0));
        assert_eq!(TruckType::Bau.spec().capacity(), Kilograms(1440.0));
        assert_eq!(TruckType::Gaiola.spec().capacity(), Kilograms(600.0));
    }

    #[test]
    fn test_all_specs_positive() {
        for truck in TruckType::ALL {
            assert!(truck.spec().capacity().0 > 0.0, "{} has no capacity", truck);
        }
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!(TruckType::from_str_flexible(" Bau ").unwrap(), TruckType::Bau);
        assert_eq!(TruckType::from_str_flexible("COMPACTADOR").unwrap(), TruckType::Compactador);
        assert!(matches!(
            TruckType::from_str_flexible("tanker"),
            Err(CalcError::UnknownTruckType { .. })
        ));
    }

    #[test]
    fn test_lenient_parse_falls_back() {
        assert_eq!(TruckType::from_str_or_default(""), TruckType::Compactador);
        assert_eq!(TruckType::from_str_or_default("Gaiola"), TruckType::Gaiola);
    }

    #[test]
    fn test_display_names_distinct_from_codes() {
        assert_eq!(TruckType::Compactador.display_name(), "Compactor");
        assert_eq!(TruckType::Bau.display_name(), "Box body");
        for truck in TruckType::ALL {
            assert_ne!(truck.display_name(), truck.code());
        }
    }

    #[test]
    fn test_matching_preset() {
        assert_eq!(TruckType::matching_preset(24.0), Some(TruckType::Bau));
        assert_eq!(TruckType::matching_preset(12.0), Some(TruckType::Gaiola));
        assert_eq!(TruckType::matching_preset(37.0), None);
    }

    #[test]
    fn test_with_volume_keeps_density() {
        let spec = TruckType::Compactador.spec().with_volume(20.0);
        assert_eq!(spec.density, KgPerCubicMeter(250.0));
        assert_eq!(spec.capacity(), Kilograms(5000.0));
    }

    #[test]
    fn test_clamp_custom_volume() {
        assert_eq!(clamp_custom_volume(4.0), 10.0);
        assert_eq!(clamp_custom_volume(55.0), 55.0);
        assert_eq!(clamp_custom_volume(250.0), 100.0);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TruckType::Gaiola).unwrap();
        assert_eq!(json, "\"Gaiola\"");
        let roundtrip: TruckType = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, TruckType::Gaiola);
    }
}
