//! # Unit Types
//!
//! Type-safe wrappers for the physical quantities used in sizing. Each is a
//! plain f64 newtype that serializes as a bare number.
//!
//! ## SI Units
//!
//! - Mass: kilograms (kg), metric tonnes (t = 1000 kg)
//! - Volume: cubic meters (m³)
//! - Bulk density: kilograms per cubic meter (kg/m³)
//!
//! Rates (per day, per month) are tracked in field names rather than types.
//!
//! ## Example
//!
//! ```rust
//! use triagem_core::units::{CubicMeters, KgPerCubicMeter, Kilograms, Tonnes};
//!
//! let load: Kilograms = CubicMeters(15.0) * KgPerCubicMeter(250.0);
//! assert_eq!(load.0, 3750.0);
//!
//! let t: Tonnes = load.into();
//! assert_eq!(t.0, 3.75);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in metric tonnes (1 t = 1000 kg)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonnes(pub f64);

impl From<Kilograms> for Tonnes {
    fn from(kg: Kilograms) -> Self {
        Tonnes(kg.0 / 1000.0)
    }
}

impl From<Tonnes> for Kilograms {
    fn from(t: Tonnes) -> Self {
        Kilograms(t.0 * 1000.0)
    }
}

// ============================================================================
// Volume / Density
// ============================================================================

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

/// Bulk density in kilograms per cubic meter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerCubicMeter(pub f64);

impl Mul<KgPerCubicMeter> for CubicMeters {
    type Output = Kilograms;
    fn mul(self, rhs: KgPerCubicMeter) -> Kilograms {
        Kilograms(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }
    };
}

impl_arithmetic!(Kilograms);
impl_arithmetic!(Tonnes);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(KgPerCubicMeter);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilograms_to_tonnes() {
        let kg = Kilograms(9500.0);
        let t: Tonnes = kg.into();
        assert_eq!(t.0, 9.5);
    }

    #[test]
    fn test_volume_times_density() {
        let kg = CubicMeters(24.0) * KgPerCubicMeter(60.0);
        assert_eq!(kg, Kilograms(1440.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Tonnes(10.0);
        let b = Tonnes(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 0.85).0, 8.5);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let vol = CubicMeters(15.0);
        let json = serde_json::to_string(&vol).unwrap();
        assert_eq!(json, "15.0");

        let roundtrip: CubicMeters = serde_json::from_str(&json).unwrap();
        assert_eq!(vol, roundtrip);
    }
}
