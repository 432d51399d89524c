//! # Simulation Session
//!
//! Sequences the collaborators around one calculation:
//!
//! ```text
//! lookup population ─► calculate ─► insert header ─► insert infrastructure
//! ```
//!
//! Each step starts only after the previous one finished. A failed lookup
//! or save never touches a calculated result; a header that was written
//! without its infrastructure row is reported as [`CalcError::PartialWrite`].

use crate::errors::{CalcError, CalcResult};
use crate::external::{GeoLookup, Locality, ScenarioStore, Subdivision};
use crate::scenario::{InfrastructureRecord, ScenarioId, ScenarioRecord};
use crate::simulation::{CalculatorEngine, SimulationInput, SimulationResult};

/// Outcome of a population lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationLookup {
    /// Provider returned a usable count
    Found(u64),
    /// Provider has no figure; ask the user to type it in
    ManualEntryRequired,
}

/// A scenario that made it to the store
#[derive(Debug, Clone, PartialEq)]
pub struct SavedScenario {
    pub scenario_id: ScenarioId,
    pub record: ScenarioRecord,
}

/// Engine plus the collaborators a front-end needs.
pub struct SimulationSession<G, S> {
    engine: CalculatorEngine,
    geo: G,
    store: S,
}

impl<G: GeoLookup, S: ScenarioStore> SimulationSession<G, S> {
    pub fn new(engine: CalculatorEngine, geo: G, store: S) -> Self {
        SimulationSession { engine, geo, store }
    }

    pub fn engine(&self) -> &CalculatorEngine {
        &self.engine
    }

    /// Subdivisions for a region selector.
    pub async fn subdivisions(&self, region_code: &str) -> CalcResult<Vec<Subdivision>> {
        self.geo.subdivisions(region_code).await.inspect_err(|e| {
            tracing::warn!(region_code, error = %e, "subdivision lookup failed");
        })
    }

    /// Localities for a subdivision selector.
    pub async fn localities(&self, subdivision_code: &str) -> CalcResult<Vec<Locality>> {
        self.geo.localities(subdivision_code).await.inspect_err(|e| {
            tracing::warn!(subdivision_code, error = %e, "locality lookup failed");
        })
    }

    /// Population for a locality. A missing or zero count asks for manual entry.
    pub async fn lookup_population(&self, locality_id: &str) -> CalcResult<PopulationLookup> {
        let population = self.geo.population(locality_id).await.inspect_err(|e| {
            tracing::warn!(locality_id, error = %e, "population lookup failed");
        })?;

        Ok(match population {
            Some(count) if count > 0 => {
                tracing::info!(locality_id, population = count, "population found");
                PopulationLookup::Found(count)
            }
            _ => {
                tracing::info!(locality_id, "population unavailable, manual entry required");
                PopulationLookup::ManualEntryRequired
            }
        })
    }

    /// Run the engine.
    pub fn calculate(&self, input: &SimulationInput) -> CalcResult<SimulationResult> {
        self.engine.calculate(input)
    }

    /// Persist a calculated scenario: header first, then infrastructure.
    pub async fn save(&self, record: ScenarioRecord, result: &SimulationResult) -> CalcResult<SavedScenario> {
        let scenario_id = self.store.insert_scenario(&record).await.map_err(|e| match e {
            CalcError::PersistenceFailed { .. } => e,
            other => CalcError::persistence_failed("insert_scenario", other.to_string()),
        })?;

        let detail = InfrastructureRecord::new(scenario_id.clone(), &result.infrastructure);
        if let Err(e) = self.store.insert_infrastructure(&detail).await {
            tracing::warn!(%scenario_id, error = %e, "infrastructure detail not saved");
            return Err(CalcError::partial_write(scenario_id.to_string(), e.to_string()));
        }

        tracing::info!(%scenario_id, record_id = %record.record_id, "scenario saved");
        Ok(SavedScenario { scenario_id, record })
    }

    /// Calculate and save in one go, returning the result alongside the saved ids.
    pub async fn run_and_save(
        &self,
        input: &SimulationInput,
        label: Option<&str>,
    ) -> CalcResult<(SimulationResult, SavedScenario)> {
        let result = self.calculate(input)?;
        let mut record = ScenarioRecord::new(input, &result);
        if let Some(label) = label {
            record = record.with_label(label);
        }
        let saved = self.save(record, &result).await?;
        Ok((result, saved))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::calibration::CalibrationProfile;
    use crate::trucks::TruckType;

    struct FakeGeo {
        populations: HashMap<String, Option<u64>>,
        offline: bool,
    }

    impl FakeGeo {
        fn new() -> Self {
            let mut populations = HashMap::new();
            populations.insert("3509502".to_string(), Some(1_139_047));
            populations.insert("9999999".to_string(), None);
            populations.insert("0000000".to_string(), Some(0));
            FakeGeo { populations, offline: false }
        }
    }

    impl GeoLookup for FakeGeo {
        async fn subdivisions(&self, region_code: &str) -> CalcResult<Vec<Subdivision>> {
            if self.offline {
                return Err(CalcError::lookup_failed("subdivisions", "offline"));
            }
            Ok(vec![Subdivision {
                code: format!("{}-SP", region_code),
                name: "São Paulo".to_string(),
            }])
        }

        async fn localities(&self, _subdivision_code: &str) -> CalcResult<Vec<Locality>> {
            Ok(vec![Locality {
                id: "3509502".to_string(),
                name: "Campinas".to_string(),
            }])
        }

        async fn population(&self, locality_id: &str) -> CalcResult<Option<u64>> {
            if self.offline {
                return Err(CalcError::lookup_failed("population", "offline"));
            }
            Ok(self.populations.get(locality_id).copied().flatten())
        }
    }

    #[derive(Default)]
    struct FakeStore {
        headers: Mutex<Vec<(ScenarioId, ScenarioRecord)>>,
        details: Mutex<Vec<InfrastructureRecord>>,
        fail_header: AtomicBool,
        fail_detail: AtomicBool,
    }

    impl ScenarioStore for FakeStore {
        async fn insert_scenario(&self, record: &ScenarioRecord) -> CalcResult<ScenarioId> {
            if self.fail_header.load(Ordering::SeqCst) {
                return Err(CalcError::Internal { message: "unique constraint".to_string() });
            }
            let id = ScenarioId::generate();
            self.headers.lock().unwrap().push((id.clone(), record.clone()));
            Ok(id)
        }

        async fn insert_infrastructure(&self, record: &InfrastructureRecord) -> CalcResult<()> {
            if self.fail_detail.load(Ordering::SeqCst) {
                return Err(CalcError::persistence_failed("insert_infrastructure", "timeout"));
            }
            self.details.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn session() -> SimulationSession<FakeGeo, FakeStore> {
        SimulationSession::new(
            CalculatorEngine::new(CalibrationProfile::fixed_press()),
            FakeGeo::new(),
            FakeStore::default(),
        )
    }

    fn input() -> SimulationInput {
        SimulationInput::new(100_000, 100.0, TruckType::Compactador)
    }

    #[tokio::test]
    async fn test_population_found() {
        let s = session();
        assert_eq!(
            s.lookup_population("3509502").await.unwrap(),
            PopulationLookup::Found(1_139_047)
        );
    }

    #[tokio::test]
    async fn test_population_missing_requires_manual_entry() {
        let s = session();
        assert_eq!(
            s.lookup_population("9999999").await.unwrap(),
            PopulationLookup::ManualEntryRequired
        );
        assert_eq!(
            s.lookup_population("0000000").await.unwrap(),
            PopulationLookup::ManualEntryRequired
        );
        assert_eq!(
            s.lookup_population("unknown").await.unwrap(),
            PopulationLookup::ManualEntryRequired
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_surfaces() {
        let mut s = session();
        s.geo.offline = true;
        let err = s.lookup_population("3509502").await.unwrap_err();
        assert_eq!(err.error_code(), "LOOKUP_FAILED");
        assert!(s.subdivisions("BR").await.is_err());
    }

    #[tokio::test]
    async fn test_selectors_pass_through() {
        let s = session();
        let subdivisions = s.subdivisions("BR").await.unwrap();
        assert_eq!(subdivisions[0].code, "BR-SP");
        let localities = s.localities("SP").await.unwrap();
        assert_eq!(localities[0].name, "Campinas");
    }

    #[tokio::test]
    async fn test_run_and_save_writes_both_rows() {
        let s = session();
        let (result, saved) = s.run_and_save(&input(), Some("Campinas")).await.unwrap();

        assert_eq!(result.staff.total, 89);
        assert_eq!(saved.record.label.as_deref(), Some("Campinas"));

        let headers = s.store.headers.lock().unwrap();
        let details = s.store.details.lock().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(details.len(), 1);
        assert_eq!(headers[0].0, saved.scenario_id);
        assert_eq!(details[0].scenario_id, saved.scenario_id);
        assert_eq!(details[0].trucks, 3);
    }

    #[tokio::test]
    async fn test_header_failure_is_persistence_error() {
        let s = session();
        s.store.fail_header.store(true, Ordering::SeqCst);
        let result = s.calculate(&input()).unwrap();
        let err = s
            .save(ScenarioRecord::new(&input(), &result), &result)
            .await
            .unwrap_err();
        assert!(matches!(err, CalcError::PersistenceFailed { .. }));
        assert!(s.store.details.lock().unwrap().is_empty());
        // Result untouched by the failed save
        assert_eq!(result, s.calculate(&input()).unwrap());
    }

    #[tokio::test]
    async fn test_detail_failure_is_partial_write() {
        let s = session();
        s.store.fail_detail.store(true, Ordering::SeqCst);
        let err = s.run_and_save(&input(), None).await.unwrap_err();

        let header_id = s.store.headers.lock().unwrap()[0].0.clone();
        match err {
            CalcError::PartialWrite { scenario_id, reason } => {
                assert_eq!(scenario_id, header_id.to_string());
                assert!(reason.contains("timeout"));
            }
            other => panic!("expected partial write, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_input_skips_persistence() {
        let s = session();
        let mut bad = input();
        bad.coverage_pct = 140.0;
        assert!(s.run_and_save(&bad, None).await.is_err());
        assert!(s.store.headers.lock().unwrap().is_empty());
    }
}
