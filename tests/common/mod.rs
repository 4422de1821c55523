#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use geo::{MultiPolygon, polygon};
use ppa_conformance::zonegeom::{TractTable, geojson};
use ppa_conformance::{
    ActivityDump, AdminApi, CertificateFingerprint, Clock, ConditionalRecord, CreationRequest, CreationStatus,
    DeviceRecord, PalRecord, PeerNotification, ReferenceModel, Registrar, Result, ScenarioConfig, ZoneRecord,
};
use serde_json::json;

/// Shared log of calls made to the fake system under test.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]])
}

/// Clock advanced only by `sleep`.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl Clock for ManualClock {
    fn now(&self) -> Duration { self.now.get() }
    fn sleep(&self, period: Duration) { self.now.set(self.now.get() + period) }
}

pub struct FakeAdmin {
    pub log: CallLog,
    pub ppa_id: Option<String>,
    /// Status queries before the creation reports completion; `None` never completes.
    pub complete_after: Option<u32>,
    pub with_error: bool,
    pub queries: u32,
    pub last_request: Option<CreationRequest>,
    pub peer: Option<PeerNotification>,
}

impl FakeAdmin {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ppa_id: Some("zone/ppa/1".into()),
            complete_after: Some(3),
            with_error: false,
            queries: 0,
            last_request: None,
            peer: None,
        }
    }
}

impl AdminApi for FakeAdmin {
    fn reset(&mut self) -> Result<()> {
        self.log.borrow_mut().push("reset".into());
        Ok(())
    }

    fn inject_pal_record(&mut self, record: &PalRecord) -> Result<()> {
        self.log.borrow_mut().push(format!("inject_pal {}", record.pal_id));
        Ok(())
    }

    fn inject_peer_sas(&mut self, peer: &PeerNotification) -> Result<()> {
        self.log.borrow_mut().push("inject_peer".into());
        self.peer = Some(peer.clone());
        Ok(())
    }

    fn trigger_ppa_creation(&mut self, request: &CreationRequest) -> Result<Option<String>> {
        self.log.borrow_mut().push("trigger_creation".into());
        self.last_request = Some(request.clone());
        Ok(self.ppa_id.clone())
    }

    fn ppa_creation_status(&mut self) -> Result<CreationStatus> {
        self.queries += 1;
        let completed = self.complete_after.is_some_and(|n| self.queries >= n);
        Ok(CreationStatus { completed, with_error: completed && self.with_error })
    }
}

pub struct FakeRegistrar {
    pub log: CallLog,
}

impl Registrar for FakeRegistrar {
    fn register(&mut self, requests: &[DeviceRecord], conditionals: &[ConditionalRecord]) -> Result<Vec<String>> {
        self.log.borrow_mut().push(format!("register {} with {} conditional(s)", requests.len(), conditionals.len()));
        Ok(requests.iter().map(|r| format!("{}/{}", r.fcc_id, r.cbsd_serial_number)).collect())
    }
}

pub struct FakeDump {
    pub log: CallLog,
    pub records: Vec<ZoneRecord>,
}

impl ActivityDump for FakeDump {
    fn retrieve_zone_records(&mut self, _cert: &Path, _key: &Path) -> Result<Vec<ZoneRecord>> {
        self.log.borrow_mut().push("retrieve_zone_records".into());
        Ok(self.records.clone())
    }
}

/// Reference model that records the requests it was given.
pub struct FakeReference {
    pub boundary: MultiPolygon<f64>,
    pub seen: RefCell<Vec<DeviceRecord>>,
}

impl ReferenceModel for FakeReference {
    fn compute_boundary(&self, requests: &[DeviceRecord], _pals: &[PalRecord]) -> Result<MultiPolygon<f64>> {
        *self.seen.borrow_mut() = requests.to_vec();
        Ok(self.boundary.clone())
    }
}

pub struct FixedFingerprint;

impl CertificateFingerprint for FixedFingerprint {
    fn fingerprint(&self, _cert: &Path) -> Result<String> {
        Ok("0123456789abcdef".into())
    }
}

pub fn zone_record(id: &str, zone: &MultiPolygon<f64>) -> ZoneRecord {
    serde_json::from_value(json!({
        "id": id,
        "usage": "PPA",
        "terminated": false,
        "zone": {
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {}, "geometry": geojson::multipolygon_to_value(zone)}],
        },
    })).unwrap()
}

/// Two adjacent tracts covering [-100.50, -100.40] x [39.00, 39.08].
pub fn tracts() -> TractTable {
    let mut table = TractTable::new();
    table.insert("20063955100", rect(-100.50, 39.00, -100.45, 39.08));
    table.insert("20063955200", rect(-100.45, 39.00, -100.40, 39.08));
    table
}

/// Zone spanning both tracts, around both devices.
pub fn inner_zone() -> MultiPolygon<f64> {
    rect(-100.49, 39.01, -100.41, 39.07)
}

/// A Category A device with inline parameters and a Category B device whose
/// parameters live in a REG-Conditional record.
pub fn scenario_config() -> ScenarioConfig {
    serde_json::from_value(json!({
        "registrationRequests": [
            {
                "userId": "user1", "fccId": "test_fcc_id_a", "cbsdSerialNumber": "test_serial_number_a",
                "cbsdCategory": "A", "airInterface": {"radioTechnology": "E_UTRA"}, "measCapability": [],
                "installationParam": {
                    "latitude": 39.0373, "longitude": -100.4184, "height": 5.0, "heightType": "AGL",
                    "indoorDeployment": false, "antennaAzimuth": 270.0, "antennaGain": 16.0,
                    "antennaBeamwidth": 360.0, "eirpCapability": 30.0,
                },
            },
            {"userId": "user1", "fccId": "test_fcc_id_b", "cbsdSerialNumber": "test_serial_number_b"},
        ],
        "conditionalRegistrationData": [{
            "cbsdCategory": "B", "fccId": "test_fcc_id_b", "cbsdSerialNumber": "test_serial_number_b",
            "airInterface": {"radioTechnology": "E_UTRA"}, "measCapability": [],
            "installationParam": {
                "latitude": 39.0378, "longitude": -100.4785, "height": 6.0, "heightType": "AGL",
                "indoorDeployment": false, "antennaAzimuth": 0.0, "antennaGain": 16.0,
                "antennaBeamwidth": 0.0, "eirpCapability": 47.0,
            },
        }],
        "palRecords": [
            {"palId": "pal/10-2017/20063955100/A", "license": {"licenseAreaIdentifier": "20063955100"}, "fipsCode": 20063955100u64},
            {"palId": "pal/10-2017/20063955200/A", "license": {"licenseAreaIdentifier": "20063955200"}, "fipsCode": 20063955200u64},
        ],
        "sasTestHarnessCert": "certs/sas.cert",
        "sasTestHarnessKey": "certs/sas.key",
    })).unwrap()
}
