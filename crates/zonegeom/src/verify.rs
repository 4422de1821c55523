use geo::{Area, BooleanOps, Buffer, HasDimensions, MultiPolygon, Relate};

use crate::{AreaMetric, DescriptorSource, GeometryError, ServiceArea, Tolerances};

/// DE-9IM pattern for "candidate interior and boundary touch only the
/// interior of the service area".
const STRICT_INTERIOR: &str = "TFF*FF***";

// ---------------------------------------------------------------------------
// Containment
// ---------------------------------------------------------------------------

/// Outcome of a containment check, with the area that fell outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Containment {
    pub within: bool,
    /// Planar area of the candidate lying outside the service area.
    pub outside_area: f64,
}

/// Returns true iff `candidate`, shrunk inward by `epsilon`, lies strictly in
/// the interior of `service_area`.
///
/// An empty candidate (or one that vanishes under the shrink) is never
/// contained.
pub fn is_within(service_area: &MultiPolygon<f64>, candidate: &MultiPolygon<f64>, epsilon: f64) -> bool {
    if service_area.is_empty() || candidate.is_empty() {
        return false;
    }

    let shrunk = candidate.buffer(-epsilon);
    if shrunk.is_empty() {
        return false;
    }

    shrunk.relate(service_area)
        .matches(STRICT_INTERIOR)
        .unwrap_or(false)
}

/// Containment check plus the area of `candidate` outside `service_area`.
pub fn containment(service_area: &MultiPolygon<f64>, candidate: &MultiPolygon<f64>, epsilon: f64) -> Containment {
    Containment {
        within: is_within(service_area, candidate, epsilon),
        outside_area: candidate.difference(service_area).unsigned_area(),
    }
}

/// Build the service area from `descriptors` and test `candidate` against it.
pub fn is_within_service_area<S, D>(
    descriptors: &[D],
    source: &S,
    candidate: &MultiPolygon<f64>,
    tolerances: &Tolerances,
) -> Result<bool, GeometryError>
where
    S: DescriptorSource + ?Sized,
    D: AsRef<str>,
{
    let area = ServiceArea::from_descriptors(descriptors, source)?;
    Ok(is_within(area.region(), candidate, tolerances.containment_epsilon))
}

// ---------------------------------------------------------------------------
// Area similarity
// ---------------------------------------------------------------------------

/// Areas involved in comparing a candidate zone to a reference zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub reference_area: f64,
    pub candidate_area: f64,
    /// Area of (reference ∪ candidate) − (reference ∩ candidate).
    pub symmetric_difference: f64,
    /// Largest symmetric difference accepted.
    pub allowed: f64,
    pub within_tolerance: bool,
}

/// Compare `candidate` to `reference`, bounding the symmetric difference by
/// `max_relative_difference` × area(`reference`).
///
/// The bound is relative to the reference, so the comparison is not
/// symmetric. Two empty zones are equal; one empty zone never is.
pub fn similarity(
    reference: &MultiPolygon<f64>,
    candidate: &MultiPolygon<f64>,
    metric: AreaMetric,
    max_relative_difference: f64,
) -> Similarity {
    match (reference.is_empty(), candidate.is_empty()) {
        (true, true) => return Similarity {
            reference_area: 0.0,
            candidate_area: 0.0,
            symmetric_difference: 0.0,
            allowed: 0.0,
            within_tolerance: true,
        },
        (true, false) | (false, true) => return Similarity {
            reference_area: metric.area(reference),
            candidate_area: metric.area(candidate),
            symmetric_difference: f64::NAN,
            allowed: f64::NAN,
            within_tolerance: false,
        },
        (false, false) => {}
    }

    let reference_area = metric.area(reference);
    let symmetric_difference = metric.area(&reference.xor(candidate));
    let allowed = max_relative_difference * reference_area;

    Similarity {
        reference_area,
        candidate_area: metric.area(candidate),
        symmetric_difference,
        allowed,
        within_tolerance: symmetric_difference <= allowed,
    }
}

/// Returns true iff the planar symmetric difference of the two zones is at
/// most `max_relative_difference` × area(`reference`).
pub fn are_almost_equal(reference: &MultiPolygon<f64>, candidate: &MultiPolygon<f64>, max_relative_difference: f64) -> bool {
    similarity(reference, candidate, AreaMetric::Planar, max_relative_difference).within_tolerance
}
