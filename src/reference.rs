use std::fs;
use std::path::Path;

use geo::MultiPolygon;
use zonegeom::geojson;

use crate::error::{Result, ScenarioError};
use crate::records::{DeviceRecord, PalRecord};
use crate::uut::ReferenceModel;

/// Reference model returning a boundary computed ahead of time, e.g. by an
/// offline run of the reference algorithm.
#[derive(Debug, Clone)]
pub struct PrecomputedBoundary {
    boundary: MultiPolygon<f64>,
}

impl PrecomputedBoundary {
    pub fn new(boundary: MultiPolygon<f64>) -> Self {
        Self { boundary }
    }

    /// Load the boundary from a GeoJSON geometry, Feature or FeatureCollection file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| ScenarioError::Io { path: path.to_path_buf(), source })?;
        let boundary = geojson::read_geometry_bytes(&bytes)
            .map_err(|e| ScenarioError::Configuration(format!("reference boundary {}: {e}", path.display())))?;
        Ok(Self::new(boundary))
    }
}

impl ReferenceModel for PrecomputedBoundary {
    fn compute_boundary(&self, _requests: &[DeviceRecord], _pals: &[PalRecord]) -> Result<MultiPolygon<f64>> {
        Ok(self.boundary.clone())
    }
}
