use ahash::AHashMap;

use geo::{BooleanOps, HasDimensions, MultiPolygon};

use crate::GeometryError;

/// Resolves a service-area descriptor (e.g. a census tract code) to its region.
pub trait DescriptorSource {
    fn region(&self, descriptor: &str) -> Result<MultiPolygon<f64>, GeometryError>;
}

/// In-memory descriptor table.
#[derive(Debug, Clone, Default)]
pub struct TractTable {
    regions: AHashMap<String, MultiPolygon<f64>>,
}

impl TractTable {
    pub fn new() -> Self { Self::default() }

    /// Register (or replace) the region for `descriptor`.
    pub fn insert(&mut self, descriptor: impl Into<String>, region: MultiPolygon<f64>) {
        self.regions.insert(descriptor.into(), region);
    }

    #[inline] pub fn len(&self) -> usize { self.regions.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.regions.is_empty() }
}

impl DescriptorSource for TractTable {
    fn region(&self, descriptor: &str) -> Result<MultiPolygon<f64>, GeometryError> {
        self.regions.get(descriptor)
            .cloned()
            .ok_or_else(|| GeometryError::UnknownDescriptor(descriptor.to_string()))
    }
}

/// The union of every licensed area relevant to a scenario.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct ServiceArea {
    descriptors: Vec<String>,
    region: MultiPolygon<f64>,
}

impl ServiceArea {
    /// Build a service area from already-resolved regions.
    pub fn from_regions(regions: impl IntoIterator<Item = MultiPolygon<f64>>) -> Self {
        Self {
            descriptors: Vec::new(),
            region: union_all(regions),
        }
    }

    /// Resolve every descriptor through `source` and union the results.
    ///
    /// Duplicate descriptors are resolved once.
    pub fn from_descriptors<S, D>(descriptors: &[D], source: &S) -> Result<Self, GeometryError>
    where
        S: DescriptorSource + ?Sized,
        D: AsRef<str>,
    {
        let mut seen: Vec<String> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let descriptor = descriptor.as_ref();
            if !seen.iter().any(|d| d == descriptor) {
                seen.push(descriptor.to_string());
            }
        }

        let regions = seen.iter()
            .map(|d| source.region(d))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            descriptors: seen,
            region: union_all(regions),
        })
    }

    /// Descriptors the area was built from, deduplicated, in input order.
    #[inline] pub fn descriptors(&self) -> &[String] { &self.descriptors }

    /// The unioned region.
    #[inline] pub fn region(&self) -> &MultiPolygon<f64> { &self.region }

    #[inline] pub fn is_empty(&self) -> bool { self.region.is_empty() }
}

/// Union a sequence of regions into one `MultiPolygon`.
fn union_all(regions: impl IntoIterator<Item = MultiPolygon<f64>>) -> MultiPolygon<f64> {
    regions.into_iter()
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| MultiPolygon(vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, polygon};

    fn square(x0: f64, y0: f64, side: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x0 + side, y: y0), (x: x0 + side, y: y0 + side), (x: x0, y: y0 + side),
        ]])
    }

    #[test]
    fn adjacent_tracts_merge_into_one_polygon() {
        let mut table = TractTable::new();
        table.insert("20063955100", square(0.0, 0.0, 1.0));
        table.insert("20063955200", square(1.0, 0.0, 1.0));

        let area = ServiceArea::from_descriptors(&["20063955100", "20063955200", "20063955100"], &table).unwrap();
        assert_eq!(area.descriptors().len(), 2);
        assert_eq!(area.region().0.len(), 1);
        assert!((area.region().unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_descriptor_is_an_error() {
        let table = TractTable::new();
        let err = ServiceArea::from_descriptors(&["404"], &table).unwrap_err();
        assert!(matches!(err, GeometryError::UnknownDescriptor(d) if d == "404"));
    }

    #[test]
    fn no_regions_gives_empty_area() {
        assert!(ServiceArea::from_regions(Vec::new()).is_empty());
    }
}
