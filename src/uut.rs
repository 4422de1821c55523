//! Interfaces to the system under test and the other collaborators a
//! scenario depends on. Wire formats are left to the implementations.

use std::path::Path;

use geo::MultiPolygon;

use crate::error::Result;
use crate::records::{
    ConditionalRecord, CreationRequest, CreationStatus, DeviceRecord, PalRecord, PeerNotification, ZoneRecord,
};

/// Administrative control surface of the system under test.
pub trait AdminApi {
    /// Clear all state held by the system under test.
    fn reset(&mut self) -> Result<()>;

    fn inject_pal_record(&mut self, record: &PalRecord) -> Result<()>;

    /// Announce a peer (the test harness) allowed to pull activity dumps.
    fn inject_peer_sas(&mut self, peer: &PeerNotification) -> Result<()>;

    /// Start a zone creation. `None` means no identifier was returned.
    fn trigger_ppa_creation(&mut self, request: &CreationRequest) -> Result<Option<String>>;

    /// Status of the most recent zone creation.
    fn ppa_creation_status(&mut self) -> Result<CreationStatus>;
}

/// Device registration surface.
pub trait Registrar {
    /// Pre-load `conditionals`, register `requests`, and return the assigned
    /// device identifiers in request order.
    fn register(&mut self, requests: &[DeviceRecord], conditionals: &[ConditionalRecord]) -> Result<Vec<String>>;
}

/// Activity-dump retrieval surface.
pub trait ActivityDump {
    /// Pull a full activity dump as the peer identified by `cert`/`key` and
    /// return its zone records.
    fn retrieve_zone_records(&mut self, cert: &Path, key: &Path) -> Result<Vec<ZoneRecord>>;
}

/// Independent reference algorithm for the zone boundary.
pub trait ReferenceModel {
    fn compute_boundary(&self, requests: &[DeviceRecord], pals: &[PalRecord]) -> Result<MultiPolygon<f64>>;
}

/// Certificate fingerprint used to identify the test harness to the system under test.
pub trait CertificateFingerprint {
    fn fingerprint(&self, cert: &Path) -> Result<String>;
}
