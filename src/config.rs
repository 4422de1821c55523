use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zonegeom::Tolerances;

use crate::error::{Result, ScenarioError};
use crate::records::{ConditionalRecord, DeviceRecord, PalRecord};

/// URL announced for the test harness; the system under test never calls it.
pub const DEFAULT_TEST_HARNESS_URL: &str = "https://test.harness.url.not.used/v1.2";

// ---------------------------------------------------------------------------
// Scenario inputs
// ---------------------------------------------------------------------------

/// Inputs of one zone creation scenario, as persisted on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub registration_requests: Vec<DeviceRecord>,
    #[serde(default)]
    pub conditional_registration_data: Vec<ConditionalRecord>,
    pub pal_records: Vec<PalRecord>,
    pub sas_test_harness_cert: PathBuf,
    pub sas_test_harness_key: PathBuf,
}

impl ScenarioConfig {
    pub fn pal_ids(&self) -> Vec<String> {
        self.pal_records.iter().map(|pal| pal.pal_id.clone()).collect()
    }

    /// Service-area descriptors (census tracts) named by the PAL records.
    pub fn area_identifiers(&self) -> Vec<&str> {
        self.pal_records.iter().map(PalRecord::area_identifier).collect()
    }

    /// Move every Category B device's pre-loadable parameters into
    /// `conditional_registration_data`. Returns the number of devices split.
    pub fn split_conditionals(&mut self) -> usize {
        let before = self.conditional_registration_data.len();
        for device in &mut self.registration_requests {
            if let Some(conditional) = device.split_conditional() {
                self.conditional_registration_data.push(conditional);
            }
        }
        self.conditional_registration_data.len() - before
    }
}

/// Read a scenario config from a JSON file.
pub fn load_config(path: &Path) -> Result<ScenarioConfig> {
    let bytes = fs::read(path).map_err(|source| ScenarioError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ScenarioError::Configuration(format!("failed to parse {}: {e}", path.display())))
}

/// Write a scenario config as pretty-printed JSON.
pub fn write_config(path: &Path, config: &ScenarioConfig) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(config)
        .map_err(|e| ScenarioError::Configuration(format!("failed to serialize config: {e}")))?;
    fs::write(path, bytes).map_err(|source| ScenarioError::Io { path: path.to_path_buf(), source })
}

// ---------------------------------------------------------------------------
// Harness settings
// ---------------------------------------------------------------------------

/// Tunables for a scenario run. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    pub poll_interval_secs: u64,
    pub creation_deadline_secs: u64,
    pub test_harness_url: String,
    pub tolerances: Tolerances,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: crate::poller::DEFAULT_POLL_INTERVAL.as_secs(),
            creation_deadline_secs: crate::poller::DEFAULT_CREATION_DEADLINE.as_secs(),
            test_harness_url: DEFAULT_TEST_HARNESS_URL.to_string(),
            tolerances: Tolerances::default(),
        }
    }
}

impl HarnessSettings {
    /// Read settings from a JSON file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| ScenarioError::Io { path: path.to_path_buf(), source })?;
        let settings: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ScenarioError::Configuration(format!("failed to parse {}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(ScenarioError::Configuration("poll_interval_secs must be positive".into()));
        }
        if self.creation_deadline_secs < self.poll_interval_secs {
            return Err(ScenarioError::Configuration(format!(
                "creation_deadline_secs ({}) is shorter than poll_interval_secs ({})",
                self.creation_deadline_secs, self.poll_interval_secs,
            )));
        }
        let tol = &self.tolerances;
        if !(tol.containment_epsilon >= 0.0 && tol.containment_epsilon.is_finite()) {
            return Err(ScenarioError::Configuration(format!(
                "containment_epsilon must be a non-negative number, got {}", tol.containment_epsilon,
            )));
        }
        if !(tol.max_relative_difference >= 0.0 && tol.max_relative_difference.is_finite()) {
            return Err(ScenarioError::Configuration(format!(
                "max_relative_difference must be a non-negative number, got {}", tol.max_relative_difference,
            )));
        }
        Ok(())
    }

    #[inline] pub fn poll_interval(&self) -> Duration { Duration::from_secs(self.poll_interval_secs) }

    #[inline] pub fn creation_deadline(&self) -> Duration { Duration::from_secs(self.creation_deadline_secs) }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Data directories the reference boundary model reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDataDirs {
    pub itu: PathBuf,
    pub terrain: PathBuf,
    pub landcover: PathBuf,
    pub census_tracts: PathBuf,
}

impl ReferenceDataDirs {
    /// Conventional layout under a single data root.
    pub fn under(root: &Path) -> Self {
        Self {
            itu: root.join("itu"),
            terrain: root.join("ned"),
            landcover: root.join("nlcd"),
            census_tracts: root.join("census_tracts"),
        }
    }

    /// Error unless every directory exists.
    pub fn require_all(&self) -> Result<()> {
        for (name, path) in [
            ("ITU", &self.itu),
            ("Terrain", &self.terrain),
            ("LandCover", &self.landcover),
            ("CensusTract", &self.census_tracts),
        ] {
            if !path.is_dir() {
                return Err(ScenarioError::Configuration(format!(
                    "{name} data path is not configured: {}", path.display(),
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> ScenarioConfig {
        serde_json::from_value(json!({
            "registrationRequests": [
                {
                    "fccId": "fcc_a", "cbsdSerialNumber": "sn_a", "cbsdCategory": "A", "userId": "u1",
                    "installationParam": {
                        "latitude": 39.0373, "longitude": -100.4184, "height": 5.0, "indoorDeployment": true,
                        "antennaAzimuth": 0.0, "antennaGain": 16.0, "antennaBeamwidth": 360.0,
                    },
                },
                {
                    "fccId": "fcc_b", "cbsdSerialNumber": "sn_b", "cbsdCategory": "B", "userId": "u1",
                    "airInterface": {"radioTechnology": "E_UTRA"}, "measCapability": [],
                    "installationParam": {
                        "latitude": 39.0378, "longitude": -100.4785, "height": 6.0, "indoorDeployment": false,
                        "antennaAzimuth": 0.0, "antennaGain": 16.0, "antennaBeamwidth": 0.0,
                    },
                },
            ],
            "palRecords": [
                {"palId": "pal/1", "license": {"licenseAreaIdentifier": "20063955100"}, "fipsCode": 20063955100u64},
                {"palId": "pal/2", "license": {"licenseAreaIdentifier": "20063955200"}, "fipsCode": 20063955200u64},
            ],
            "sasTestHarnessCert": "certs/sas.cert",
            "sasTestHarnessKey": "certs/sas.key",
        })).unwrap()
    }

    #[test]
    fn missing_conditionals_default_to_empty() {
        let config = sample_config();
        assert!(config.conditional_registration_data.is_empty());
        assert_eq!(config.pal_ids(), vec!["pal/1", "pal/2"]);
        assert_eq!(config.area_identifiers(), vec!["20063955100", "20063955200"]);
    }

    #[test]
    fn split_then_write_then_load() {
        let mut config = sample_config();
        assert_eq!(config.split_conditionals(), 1);
        assert!(config.registration_requests[1].installation_param.is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcr_1.config");
        write_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }

    #[test]
    fn unparsable_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, br#"{"registrationRequests": 3}"#).unwrap();
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn settings_defaults_and_validation() {
        let settings = HarnessSettings::default();
        assert_eq!(settings.poll_interval(), Duration::from_secs(10));
        assert_eq!(settings.creation_deadline(), Duration::from_secs(7200));
        assert!(settings.validate().is_ok());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, br#"{"creation_deadline_secs": 60, "tolerances": {"area_metric": "geodesic"}}"#).unwrap();
        let loaded = HarnessSettings::load(&path).unwrap();
        assert_eq!(loaded.creation_deadline(), Duration::from_secs(60));
        assert_eq!(loaded.poll_interval(), Duration::from_secs(10));
        assert_eq!(loaded.tolerances.area_metric, zonegeom::AreaMetric::Geodesic);

        let bad = HarnessSettings { creation_deadline_secs: 5, ..HarnessSettings::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn data_dirs_are_preconditions() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = ReferenceDataDirs::under(dir.path());
        let err = dirs.require_all().unwrap_err();
        assert!(err.to_string().contains("ITU data path is not configured"));

        for path in [&dirs.itu, &dirs.terrain, &dirs.landcover, &dirs.census_tracts] {
            fs::create_dir_all(path).unwrap();
        }
        assert!(dirs.require_all().is_ok());
    }
}
