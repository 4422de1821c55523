//! End-to-end zone creation conformance scenario.
//!
//! The run resets the system under test, injects the licenses, registers the
//! devices, waits for the zone creation, pulls the created zone through an
//! activity dump and checks it against the service area and the reference
//! boundary.

use std::fmt;

use geo::MultiPolygon;
use tracing::{debug, info, warn};
use zonegeom::{Containment, DescriptorSource, ServiceArea, Similarity, Tolerances, geojson};

use crate::config::{HarnessSettings, ReferenceDataDirs, ScenarioConfig};
use crate::error::{Result, ScenarioError};
use crate::poller::{Clock, CreationPoller};
use crate::reconcile::reconcile;
use crate::records::{CreationRequest, PeerNotification, ZoneRecord};
use crate::uut::{ActivityDump, AdminApi, CertificateFingerprint, ReferenceModel, Registrar};

// ---------------------------------------------------------------------------
// Zone verification
// ---------------------------------------------------------------------------

/// Results of both geometry checks on a zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneVerdict {
    pub containment: Containment,
    pub similarity: Similarity,
}

impl ZoneVerdict {
    #[inline] pub fn passed(&self) -> bool {
        self.containment.within && self.similarity.within_tolerance
    }

    /// Turn a failed check into an `Assertion` error carrying the values that failed it.
    pub fn into_result(self, candidate: &MultiPolygon<f64>, tolerances: &Tolerances) -> Result<Self> {
        if !self.containment.within {
            return Err(ScenarioError::Assertion(format!(
                "zone is not within service area: {} of its area lies outside (epsilon {}); zone = {}",
                self.containment.outside_area,
                tolerances.containment_epsilon,
                geojson::multipolygon_to_value(candidate),
            )));
        }
        if !self.similarity.within_tolerance {
            let s = &self.similarity;
            return Err(ScenarioError::Assertion(format!(
                "zone differs from reference boundary: non-overlapping area {} exceeds {} ({}% of reference area {}); zone area {}",
                s.symmetric_difference,
                s.allowed,
                tolerances.max_relative_difference * 100.0,
                s.reference_area,
                s.candidate_area,
            )));
        }
        Ok(self)
    }
}

/// Check `candidate` against the service area and the reference boundary.
pub fn verify_zone(
    service_area: &ServiceArea,
    reference: &MultiPolygon<f64>,
    candidate: &MultiPolygon<f64>,
    tolerances: &Tolerances,
) -> ZoneVerdict {
    ZoneVerdict {
        containment: zonegeom::containment(service_area.region(), candidate, tolerances.containment_epsilon),
        similarity: zonegeom::similarity(
            reference,
            candidate,
            tolerances.area_metric,
            tolerances.max_relative_difference,
        ),
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// External collaborators a scenario talks to.
pub struct Collaborators<'a> {
    pub admin: &'a mut dyn AdminApi,
    pub registrar: &'a mut dyn Registrar,
    pub dump: &'a mut dyn ActivityDump,
    pub reference: &'a dyn ReferenceModel,
    pub tracts: &'a dyn DescriptorSource,
    pub fingerprint: &'a dyn CertificateFingerprint,
    pub clock: &'a dyn Clock,
}

/// Summary of a passing scenario.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub ppa_id: String,
    pub cbsd_ids: Vec<String>,
    pub status_queries: u32,
    pub verdict: ZoneVerdict,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.verdict.similarity;
        write!(
            f,
            "PASS zone {} for {} device(s): within service area, non-overlapping area {} <= {}",
            self.ppa_id,
            self.cbsd_ids.len(),
            s.symmetric_difference,
            s.allowed,
        )
    }
}

/// Runs one zone creation scenario against a system under test.
pub struct ScenarioOrchestrator<'a> {
    uut: Collaborators<'a>,
    settings: HarnessSettings,
    data_dirs: Option<ReferenceDataDirs>,
}

impl<'a> ScenarioOrchestrator<'a> {
    pub fn new(uut: Collaborators<'a>, settings: HarnessSettings) -> Self {
        Self { uut, settings, data_dirs: None }
    }

    /// Require the reference model's data directories before any run.
    ///
    /// Only a reference model that computes boundaries from ITU, terrain,
    /// land-cover and census-tract data needs them; one serving precomputed
    /// boundaries (e.g. [`PrecomputedBoundary`](crate::PrecomputedBoundary))
    /// runs without, so the check is opt-in.
    pub fn with_data_dirs(mut self, dirs: ReferenceDataDirs) -> Self {
        self.data_dirs = Some(dirs);
        self
    }

    #[inline] pub fn settings(&self) -> &HarnessSettings { &self.settings }

    /// Run the scenario. Any failure terminates the run.
    pub fn run(&mut self, config: &ScenarioConfig) -> Result<ScenarioReport> {
        self.settings.validate()?;
        match &self.data_dirs {
            Some(dirs) => dirs.require_all()?,
            None => warn!("reference data directories not configured; skipping data path check"),
        }

        // Catch incomplete inputs before touching the system under test.
        let reconciled = reconcile(&config.registration_requests, &config.conditional_registration_data)?;

        info!("resetting system under test");
        self.uut.admin.reset()?;

        for pal in &config.pal_records {
            self.uut.admin.inject_pal_record(pal)?;
        }
        info!(count = config.pal_records.len(), "injected PAL records");

        let cbsd_ids = self.uut.registrar
            .register(&config.registration_requests, &config.conditional_registration_data)?;
        if cbsd_ids.len() != config.registration_requests.len() {
            return Err(ScenarioError::Protocol(format!(
                "registered {} device(s) but received {} CBSD ID(s)",
                config.registration_requests.len(), cbsd_ids.len(),
            )));
        }
        info!(?cbsd_ids, "registered devices");

        let request = CreationRequest {
            cbsd_ids: cbsd_ids.clone(),
            pal_ids: config.pal_ids(),
            provided_contour: None,
        };
        let poller = CreationPoller::with_bounds(
            self.uut.clock,
            self.settings.poll_interval(),
            self.settings.creation_deadline(),
        );
        let ppa_id = poller.create_and_wait(&mut *self.uut.admin, &request)?;

        let zone = self.retrieve_zone(config, &ppa_id)?;
        let candidate = zone.geometry()
            .map_err(|e| ScenarioError::Protocol(format!("zone record {}: {e}", zone.id)))?;

        let reference = self.uut.reference.compute_boundary(&reconciled, &config.pal_records)?;
        debug!(zone = %geojson::multipolygon_to_value(&candidate), "zone from system under test");
        debug!(zone = %geojson::multipolygon_to_value(&reference), "zone from reference model");

        let service_area = ServiceArea::from_descriptors(&config.area_identifiers(), self.uut.tracts)
            .map_err(|e| ScenarioError::Configuration(format!("service area: {e}")))?;

        let tolerances = self.settings.tolerances;
        let verdict = verify_zone(&service_area, &reference, &candidate, &tolerances);
        if !verdict.passed() {
            warn!(?verdict, "zone verification failed");
        }
        let verdict = verdict.into_result(&candidate, &tolerances)?;

        info!(%ppa_id, "zone verification passed");
        Ok(ScenarioReport {
            ppa_id,
            cbsd_ids,
            status_queries: poller.queries(),
            verdict,
        })
    }

    /// Announce the harness as a peer, pull the activity dump and return the
    /// single zone record it must contain.
    fn retrieve_zone(&mut self, config: &ScenarioConfig, ppa_id: &str) -> Result<ZoneRecord> {
        let certificate_hash = self.uut.fingerprint.fingerprint(&config.sas_test_harness_cert)?;
        self.uut.admin.inject_peer_sas(&PeerNotification {
            certificate_hash,
            url: self.settings.test_harness_url.clone(),
        })?;

        let mut records = self.uut.dump
            .retrieve_zone_records(&config.sas_test_harness_cert, &config.sas_test_harness_key)?;

        // The system was reset, so the dump holds only the zone just created.
        if records.len() != 1 {
            let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
            return Err(ScenarioError::Assertion(format!(
                "expected exactly one zone record matching zone ID {ppa_id}, found {}: {ids:?}",
                records.len(),
            )));
        }

        let record = records.remove(0);
        if record.id != ppa_id {
            return Err(ScenarioError::Assertion(format!(
                "zone record ID {} does not match created zone ID {ppa_id}", record.id,
            )));
        }
        Ok(record)
    }
}
