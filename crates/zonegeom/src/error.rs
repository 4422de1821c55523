use thiserror::Error;

/// Errors raised while reading or assembling zone geometries.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The GeoJSON payload is structurally invalid.
    #[error("malformed geometry: {0}")]
    Malformed(String),

    /// The GeoJSON payload names a geometry type that cannot describe an area.
    #[error("unsupported geometry type `{0}`, expected Polygon or MultiPolygon")]
    UnsupportedType(String),

    /// No region is known for a service-area descriptor.
    #[error("unknown service area descriptor `{0}`")]
    UnknownDescriptor(String),

    /// A descriptor source failed to load a region.
    #[error("failed to load region for `{descriptor}`: {details}")]
    Source { descriptor: String, details: String },
}
