//! # Error Types
//!
//! Structured error types for triagem_core. Validation failures carry the
//! offending field and value so a caller can point the user at the exact
//! input that needs fixing.
//!
//! ## Example
//!
//! ```rust
//! use triagem_core::errors::{CalcError, CalcResult};
//!
//! fn validate_coverage(coverage_pct: f64) -> CalcResult<()> {
//!     if !(0.0..=100.0).contains(&coverage_pct) {
//!         return Err(CalcError::invalid_input(
//!             "coverage_pct",
//!             coverage_pct.to_string(),
//!             "Coverage must be between 0 and 100",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for triagem_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for sizing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Truck type name does not match any known variant (strict parsing only)
    #[error("Unknown truck type: {name}")]
    UnknownTruckType { name: String },

    /// Calibration profile not found in the built-in registry
    #[error("Calibration profile not found: {name}")]
    ProfileNotFound { name: String },

    /// Geographic lookup provider failed
    #[error("Lookup failed: {operation} - {reason}")]
    LookupFailed { operation: String, reason: String },

    /// Scenario store rejected or failed a write
    #[error("Persistence failed: {operation} - {reason}")]
    PersistenceFailed { operation: String, reason: String },

    /// Scenario header was written but the infrastructure detail was not
    #[error("Partial write: scenario '{scenario_id}' saved without infrastructure detail - {reason}")]
    PartialWrite { scenario_id: String, reason: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownTruckType error
    pub fn unknown_truck_type(name: impl Into<String>) -> Self {
        CalcError::UnknownTruckType { name: name.into() }
    }

    /// Create a ProfileNotFound error
    pub fn profile_not_found(name: impl Into<String>) -> Self {
        CalcError::ProfileNotFound { name: name.into() }
    }

    /// Create a LookupFailed error
    pub fn lookup_failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::LookupFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a PersistenceFailed error
    pub fn persistence_failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::PersistenceFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a PartialWrite error
    pub fn partial_write(scenario_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::PartialWrite {
            scenario_id: scenario_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Whether the user can reasonably retry the operation.
    ///
    /// The core never retries on its own; this only tells the caller whether
    /// offering a "try again" is meaningful.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::LookupFailed { .. }
                | CalcError::PersistenceFailed { .. }
                | CalcError::PartialWrite { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownTruckType { .. } => "UNKNOWN_TRUCK_TYPE",
            CalcError::ProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            CalcError::LookupFailed { .. } => "LOOKUP_FAILED",
            CalcError::PersistenceFailed { .. } => "PERSISTENCE_FAILED",
            CalcError::PartialWrite { .. } => "PARTIAL_WRITE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(err: toml::de::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("population", "0", "Population must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::profile_not_found("x").error_code(), "PROFILE_NOT_FOUND");
        assert_eq!(CalcError::partial_write("abc", "timeout").error_code(), "PARTIAL_WRITE");
    }

    #[test]
    fn test_recoverable() {
        assert!(CalcError::lookup_failed("population", "offline").is_recoverable());
        assert!(CalcError::partial_write("abc", "timeout").is_recoverable());
        assert!(!CalcError::invalid_input("population", "0", "bad").is_recoverable());
    }

    #[test]
    fn test_partial_write_message_names_scenario() {
        let err = CalcError::partial_write("scn-42", "connection reset");
        assert!(err.to_string().contains("scn-42"));
        assert!(err.to_string().contains("connection reset"));
    }
}
