use std::fmt;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zonegeom::{GeometryError, geojson};

// ---------------------------------------------------------------------------
// Installation parameters
// ---------------------------------------------------------------------------

/// Installation parameters the reference boundary model needs for every device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstallationField {
    AntennaAzimuth,
    Longitude,
    Latitude,
    Height,
    AntennaGain,
    IndoorDeployment,
    AntennaBeamwidth,
}

impl InstallationField {
    pub const ALL: [Self; 7] = [
        Self::AntennaAzimuth,
        Self::Longitude,
        Self::Latitude,
        Self::Height,
        Self::AntennaGain,
        Self::IndoorDeployment,
        Self::AntennaBeamwidth,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AntennaAzimuth => "antennaAzimuth",
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::Height => "height",
            Self::AntennaGain => "antennaGain",
            Self::IndoorDeployment => "indoorDeployment",
            Self::AntennaBeamwidth => "antennaBeamwidth",
        }
    }
}

impl fmt::Display for InstallationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device's `installationParam` object. Fields not listed here are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antenna_azimuth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antenna_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indoor_deployment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antenna_beamwidth: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InstallationParam {
    /// Whether `field` carries a value.
    pub fn has(&self, field: InstallationField) -> bool {
        match field {
            InstallationField::AntennaAzimuth => self.antenna_azimuth.is_some(),
            InstallationField::Longitude => self.longitude.is_some(),
            InstallationField::Latitude => self.latitude.is_some(),
            InstallationField::Height => self.height.is_some(),
            InstallationField::AntennaGain => self.antenna_gain.is_some(),
            InstallationField::IndoorDeployment => self.indoor_deployment.is_some(),
            InstallationField::AntennaBeamwidth => self.antenna_beamwidth.is_some(),
        }
    }

    /// Required fields with no value, in canonical order.
    pub fn missing_fields(&self) -> Vec<InstallationField> {
        InstallationField::ALL.into_iter().filter(|f| !self.has(*f)).collect()
    }

    /// A copy holding only the required fields.
    pub fn required_subset(&self) -> Self {
        Self {
            latitude: self.latitude,
            longitude: self.longitude,
            height: self.height,
            antenna_azimuth: self.antenna_azimuth,
            antenna_gain: self.antenna_gain,
            indoor_deployment: self.indoor_deployment,
            antenna_beamwidth: self.antenna_beamwidth,
            extra: Map::new(),
        }
    }

    /// Compact JSON rendering for error messages.
    pub(crate) fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

// ---------------------------------------------------------------------------
// Devices and REG-Conditionals
// ---------------------------------------------------------------------------

/// CBSD category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Composite key identifying a device: FCC ID plus serial number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceKey<'a> {
    pub fcc_id: &'a str,
    pub serial: &'a str,
}

impl fmt::Display for DeviceKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fccId={}, cbsdSerialNumber={}", self.fcc_id, self.serial)
    }
}

/// Fields moved out of a Category B registration request into its REG-Conditional.
const CONDITIONAL_ONLY_FIELDS: [&str; 2] = ["airInterface", "measCapability"];

/// A device registration request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub fcc_id: String,
    pub cbsd_serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbsd_category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_param: Option<InstallationParam>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceRecord {
    pub fn key(&self) -> DeviceKey<'_> {
        DeviceKey { fcc_id: &self.fcc_id, serial: &self.cbsd_serial_number }
    }

    /// Move a Category B device's pre-loadable parameters into a
    /// REG-Conditional record, leaving only the registration fields behind.
    ///
    /// Returns `None` (and leaves the device untouched) for Category A devices
    /// and for devices with no installation parameters.
    pub fn split_conditional(&mut self) -> Option<ConditionalRecord> {
        if self.cbsd_category != Some(Category::B) || self.installation_param.is_none() {
            return None;
        }

        let mut extra = Map::new();
        for name in CONDITIONAL_ONLY_FIELDS {
            if let Some(value) = self.extra.remove(name) {
                extra.insert(name.to_string(), value);
            }
        }

        Some(ConditionalRecord {
            fcc_id: self.fcc_id.clone(),
            cbsd_serial_number: self.cbsd_serial_number.clone(),
            cbsd_category: self.cbsd_category.take(),
            installation_param: self.installation_param.take(),
            extra,
        })
    }
}

/// Pre-loaded per-device parameters supplied outside the registration request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRecord {
    pub fcc_id: String,
    pub cbsd_serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbsd_category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_param: Option<InstallationParam>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConditionalRecord {
    pub fn key(&self) -> DeviceKey<'_> {
        DeviceKey { fcc_id: &self.fcc_id, serial: &self.cbsd_serial_number }
    }
}

// ---------------------------------------------------------------------------
// Licenses
// ---------------------------------------------------------------------------

/// License portion of a PAL record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// Census tract code the license covers.
    pub license_area_identifier: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Priority Access License database record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalRecord {
    pub pal_id: String,
    pub license: License,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PalRecord {
    #[inline] pub fn area_identifier(&self) -> &str { &self.license.license_area_identifier }
}

// ---------------------------------------------------------------------------
// Zone creation
// ---------------------------------------------------------------------------

/// Request for the system under test to create a protection zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationRequest {
    pub cbsd_ids: Vec<String>,
    pub pal_ids: Vec<String>,
    /// Optional GeoJSON contour the zone must be clipped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provided_contour: Option<Value>,
}

/// Status of the most recent zone creation, as reported by the system under test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationStatus {
    pub completed: bool,
    pub with_error: bool,
}

/// Identity of the test harness, announced as a peer so its dump pull is authorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerNotification {
    pub certificate_hash: String,
    pub url: String,
}

/// A zone record from an activity dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    pub id: String,
    /// GeoJSON FeatureCollection; the first feature holds the zone geometry.
    pub zone: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ZoneRecord {
    /// Geometry of the zone's first feature.
    pub fn geometry(&self) -> Result<MultiPolygon<f64>, GeometryError> {
        let features = self.zone["features"].as_array()
            .ok_or_else(|| GeometryError::Malformed("zone has no `features` array".into()))?;
        let geometry = features.first()
            .map(|feature| &feature["geometry"])
            .filter(|geometry| !geometry.is_null())
            .ok_or_else(|| GeometryError::Malformed("zone has no feature geometry".into()))?;
        geojson::geometry_from_value(geometry)
    }
}
