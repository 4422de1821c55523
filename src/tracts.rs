use std::fs;
use std::path::{Path, PathBuf};

use geo::MultiPolygon;
use zonegeom::{DescriptorSource, GeometryError, geojson};

/// Census tracts stored one per file as `<dir>/<tract code>.json`, each a
/// GeoJSON FeatureCollection whose first feature is the tract.
#[derive(Debug, Clone)]
pub struct TractDirectory {
    root: PathBuf,
}

impl TractDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline] pub fn root(&self) -> &Path { &self.root }

    /// Path of the file holding `tract`.
    pub fn tract_path(&self, tract: &str) -> PathBuf {
        self.root.join(format!("{tract}.json"))
    }
}

impl DescriptorSource for TractDirectory {
    fn region(&self, descriptor: &str) -> Result<MultiPolygon<f64>, GeometryError> {
        // Tract codes are plain digits; refuse anything that could leave the directory.
        if descriptor.is_empty() || !descriptor.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(GeometryError::UnknownDescriptor(descriptor.to_string()));
        }

        let path = self.tract_path(descriptor);
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GeometryError::UnknownDescriptor(descriptor.to_string()),
            _ => GeometryError::Source {
                descriptor: descriptor.to_string(),
                details: format!("{}: {e}", path.display()),
            },
        })?;

        tracing::debug!(tract = descriptor, path = %path.display(), "loaded census tract");
        geojson::read_geometry_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    #[test]
    fn reads_first_feature_of_tract_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("20063955100.json"), br#"{
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {"GEOID": "20063955100"}, "geometry": {
                "type": "Polygon",
                "coordinates": [[[-100.5, 39.0], [-100.45, 39.0], [-100.45, 39.08], [-100.5, 39.08], [-100.5, 39.0]]]
            }}]
        }"#).unwrap();

        let tracts = TractDirectory::new(dir.path());
        let region = tracts.region("20063955100").unwrap();
        assert!((region.unsigned_area() - 0.05 * 0.08).abs() < 1e-12);
    }

    #[test]
    fn missing_and_suspicious_tracts_are_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let tracts = TractDirectory::new(dir.path());
        assert!(matches!(tracts.region("20063955100"), Err(GeometryError::UnknownDescriptor(_))));
        assert!(matches!(tracts.region("../etc/passwd"), Err(GeometryError::UnknownDescriptor(_))));
    }
}
