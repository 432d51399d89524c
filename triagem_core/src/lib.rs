//! # triagem_core - Recycling-Sorting Sizing Engine
//!
//! `triagem_core` sizes a municipal recycling-sorting operation: from a
//! population, a coverage percentage and a collection truck it derives daily
//! and monthly collection volumes, the headcount per role and the equipment
//! needed to process them.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Explicit calibration**: Constants and policies travel in a named profile
//! - **JSON-First**: All inputs, results and records implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use triagem_core::{CalculatorEngine, CalibrationProfile, SimulationInput, TruckType};
//!
//! let engine = CalculatorEngine::new(CalibrationProfile::default());
//! let input = SimulationInput::new(100_000, 100.0, TruckType::Compactador);
//!
//! let result = engine.calculate(&input).unwrap();
//! assert_eq!(result.infrastructure.trucks, 3);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`simulation`] - Inputs, results and the calculator engine
//! - [`calibration`] - Calibration constants, policies and profiles
//! - [`trucks`] - Collection truck variants
//! - [`scenario`] - Flat records for persistence
//! - [`external`] - Geographic lookup and scenario store contracts
//! - [`session`] - Lookup, calculate, persist sequencing
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calibration;
pub mod errors;
pub mod external;
pub mod scenario;
pub mod session;
pub mod simulation;
pub mod trucks;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calibration::{builtin_profile, builtin_profiles, CalibrationConstants, CalibrationProfile};
pub use errors::{CalcError, CalcResult};
pub use scenario::{InfrastructureRecord, ScenarioId, ScenarioRecord};
pub use session::{PopulationLookup, SavedScenario, SimulationSession};
pub use simulation::{calculate, CalculatorEngine, SimulationInput, SimulationResult};
pub use trucks::{TruckSpec, TruckType};
