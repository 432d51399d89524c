//! # External Collaborators
//!
//! Contracts for the services around the engine: a geographic lookup that
//! supplies population counts, and a store that persists scenarios. The
//! engine never calls these; [`SimulationSession`](crate::session::SimulationSession)
//! sequences them around a calculation.
//!
//! Implementations may use `async fn` directly; the returned futures must be
//! `Send`.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::scenario::{InfrastructureRecord, ScenarioId, ScenarioRecord};

/// Administrative subdivision of a region (e.g. a state)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    pub code: String,
    pub name: String,
}

/// Locality within a subdivision (e.g. a municipality)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub id: String,
    pub name: String,
}

/// Geographic statistics provider.
pub trait GeoLookup {
    /// Subdivisions of a region.
    fn subdivisions(&self, region_code: &str) -> impl Future<Output = CalcResult<Vec<Subdivision>>> + Send;

    /// Localities of a subdivision.
    fn localities(&self, subdivision_code: &str) -> impl Future<Output = CalcResult<Vec<Locality>>> + Send;

    /// Population of a locality. `Ok(None)` when the provider has no figure.
    fn population(&self, locality_id: &str) -> impl Future<Output = CalcResult<Option<u64>>> + Send;
}

/// Scenario persistence backend.
///
/// A scenario is written in two steps; the second depends on the identifier
/// returned by the first.
pub trait ScenarioStore {
    /// Write the header row and return its generated identifier.
    fn insert_scenario(&self, record: &ScenarioRecord) -> impl Future<Output = CalcResult<ScenarioId>> + Send;

    /// Write the infrastructure detail row for a saved header.
    fn insert_infrastructure(&self, record: &InfrastructureRecord) -> impl Future<Output = CalcResult<()>> + Send;
}
