#![doc = "Conformance oracle for protection zone (PPA) creation"]
mod config;
mod error;
mod poller;
mod reconcile;
mod records;
mod reference;
mod scenario;
mod tracts;
mod uut;

#[doc(inline)]
pub use config::{
    DEFAULT_TEST_HARNESS_URL, HarnessSettings, ReferenceDataDirs, ScenarioConfig, load_config, write_config,
};

#[doc(inline)]
pub use error::{ErrorKind, Result, ScenarioError};

#[doc(inline)]
pub use poller::{
    Clock, CreationPoller, CreationState, DEFAULT_CREATION_DEADLINE, DEFAULT_POLL_INTERVAL, SystemClock,
};

#[doc(inline)]
pub use reconcile::{ConditionalIndex, Lookup, ReconcileError, reconcile};

#[doc(inline)]
pub use records::{
    Category, ConditionalRecord, CreationRequest, CreationStatus, DeviceKey, DeviceRecord, InstallationField,
    InstallationParam, License, PalRecord, PeerNotification, ZoneRecord,
};

#[doc(inline)]
pub use reference::PrecomputedBoundary;

#[doc(inline)]
pub use scenario::{Collaborators, ScenarioOrchestrator, ScenarioReport, ZoneVerdict, verify_zone};

#[doc(inline)]
pub use tracts::TractDirectory;

#[doc(inline)]
pub use uut::{ActivityDump, AdminApi, CertificateFingerprint, ReferenceModel, Registrar};

pub use zonegeom;
