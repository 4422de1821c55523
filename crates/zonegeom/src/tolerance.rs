use geo::{Area, GeodesicArea, MultiPolygon};
use serde::{Deserialize, Serialize};

/// Inward buffer applied to a candidate zone before the containment test,
/// in coordinate units (degrees for lon/lat input).
pub const DEFAULT_CONTAINMENT_EPSILON: f64 = 1e-6;

/// Largest accepted symmetric difference, as a fraction of the reference area.
pub const DEFAULT_MAX_RELATIVE_DIFFERENCE: f64 = 0.10;

/// How polygon areas are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMetric {
    /// Shoelace area in raw coordinate units.
    #[default]
    Planar,
    /// Area on the WGS84 ellipsoid in m², for lon/lat input.
    Geodesic,
}

impl AreaMetric {
    /// Unsigned area of `shape` under this metric.
    pub fn area(&self, shape: &MultiPolygon<f64>) -> f64 {
        match self {
            Self::Planar => shape.unsigned_area(),
            Self::Geodesic => shape.geodesic_area_unsigned(),
        }
    }
}

/// Tunable constants for the zone checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub containment_epsilon: f64,
    pub max_relative_difference: f64,
    pub area_metric: AreaMetric,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            containment_epsilon: DEFAULT_CONTAINMENT_EPSILON,
            max_relative_difference: DEFAULT_MAX_RELATIVE_DIFFERENCE,
            area_metric: AreaMetric::Planar,
        }
    }
}
