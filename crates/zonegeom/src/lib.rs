//! Geometry checks for protection zone conformance.
//!
//! A zone produced by a system under test is accepted when it lies strictly
//! inside the service area formed by its licenses, and when its symmetric
//! difference with an independently computed reference zone is small
//! relative to the reference zone's area.

pub mod error;
pub mod geojson;
pub mod service_area;
pub mod tolerance;
pub mod verify;

pub use error::GeometryError;
pub use service_area::{DescriptorSource, ServiceArea, TractTable};
pub use tolerance::{AreaMetric, Tolerances};
pub use verify::{
    Containment, Similarity, are_almost_equal, containment, is_within, is_within_service_area,
    similarity,
};
