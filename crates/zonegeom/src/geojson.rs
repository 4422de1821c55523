use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Value, json};

use crate::GeometryError;

type Result<T> = std::result::Result<T, GeometryError>;

/// Read an areal geometry from GeoJSON bytes.
pub fn read_geometry_bytes(bytes: &[u8]) -> Result<MultiPolygon<f64>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| GeometryError::Malformed(format!("invalid JSON: {e}")))?;
    geometry_from_value(&value)
}

/// Convert a GeoJSON value into a `MultiPolygon`.
///
/// Accepts `Polygon` and `MultiPolygon` geometry objects directly, a `Feature`
/// (its `geometry` member), or a `FeatureCollection` (the geometry of its first
/// feature). Open rings are closed.
pub fn geometry_from_value(value: &Value) -> Result<MultiPolygon<f64>> {
    let kind = value["type"].as_str()
        .ok_or_else(|| GeometryError::Malformed("missing `type` member".into()))?;

    match kind {
        "Polygon" => {
            let coords = coordinates(value)?;
            if coords.is_empty() {
                return Ok(MultiPolygon(vec![]));
            }
            Ok(MultiPolygon(vec![parse_polygon(coords)?]))
        }
        "MultiPolygon" => {
            // An empty member is an empty polygon, same as an empty `Polygon`.
            let polygons = coordinates(value)?.iter()
                .map(|p| p.as_array()
                    .ok_or_else(|| GeometryError::Malformed("polygon must be an array of rings".into())))
                .filter(|rings| !matches!(rings, Ok(rings) if rings.is_empty()))
                .map(|rings| rings.and_then(|rings| parse_polygon(rings)))
                .collect::<Result<Vec<_>>>()?;
            Ok(MultiPolygon(polygons))
        }
        "Feature" => {
            let geometry = value.get("geometry")
                .filter(|g| !g.is_null())
                .ok_or_else(|| GeometryError::Malformed("feature has no geometry".into()))?;
            geometry_from_value(geometry)
        }
        "FeatureCollection" => {
            let first = value["features"].as_array()
                .and_then(|features| features.first())
                .ok_or_else(|| GeometryError::Malformed("feature collection has no features".into()))?;
            geometry_from_value(first)
        }
        other => Err(GeometryError::UnsupportedType(other.to_string())),
    }
}

/// Convert a `MultiPolygon` to a GeoJSON `MultiPolygon` geometry object.
pub fn multipolygon_to_value(shape: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Value> = shape.0.iter().map(|polygon| {
        let rings: Vec<Vec<[f64; 2]>> = std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
            .collect();
        json!(rings)
    }).collect();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

fn coordinates(value: &Value) -> Result<&Vec<Value>> {
    value["coordinates"].as_array()
        .ok_or_else(|| GeometryError::Malformed("missing `coordinates` array".into()))
}

/// Parse `[exterior, hole, hole, ...]` ring arrays into a `Polygon`.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut parsed = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| GeometryError::Malformed("ring must be an array of positions".into()))
            .and_then(|positions| parse_ring(positions))
    });

    let exterior = parsed.next()
        .ok_or_else(|| GeometryError::Malformed("polygon has no exterior ring".into()))??;
    let interiors = parsed.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of `[lon, lat]` positions, closing it if needed.
fn parse_ring(positions: &[Value]) -> Result<LineString<f64>> {
    let mut points = positions.iter().map(|position| {
        let pair = position.as_array()
            .filter(|pair| pair.len() >= 2)
            .ok_or_else(|| GeometryError::Malformed(format!("invalid position {position}")))?;
        match (pair[0].as_f64(), pair[1].as_f64()) {
            (Some(x), Some(y)) => Ok(Coord { x, y }),
            _ => Err(GeometryError::Malformed(format!("non-numeric position {position}"))),
        }
    }).collect::<Result<Vec<_>>>()?;

    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last {
            points.push(first);
        }
    }

    if points.len() < 4 {
        return Err(GeometryError::Malformed(format!(
            "ring needs at least 4 positions once closed, found {}", points.len()
        )));
    }

    Ok(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    #[test]
    fn polygon_with_hole() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
                [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0], [1.0, 1.0]],
            ],
        });
        let shape = geometry_from_value(&value).unwrap();
        assert_eq!(shape.0.len(), 1);
        assert_eq!(shape.0[0].interiors().len(), 1);
        assert!((shape.unsigned_area() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn open_ring_is_closed() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]],
        });
        let shape = geometry_from_value(&value).unwrap();
        let ring = shape.0[0].exterior();
        assert_eq!(ring.0.first(), ring.0.last());
        assert_eq!(ring.0.len(), 5);
    }

    #[test]
    fn feature_collection_uses_first_feature() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 0.0]]]],
                }},
                {"type": "Feature", "properties": {}, "geometry": null},
            ],
        });
        let shape = geometry_from_value(&value).unwrap();
        assert!((shape.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_points_and_bad_positions() {
        let point = json!({"type": "Point", "coordinates": [0.0, 0.0]});
        assert!(matches!(geometry_from_value(&point), Err(GeometryError::UnsupportedType(t)) if t == "Point"));

        let bad = json!({"type": "Polygon", "coordinates": [[[0.0, "x"], [1.0, 0.0], [1.0, 1.0]]]});
        assert!(matches!(geometry_from_value(&bad), Err(GeometryError::Malformed(_))));

        let short = json!({"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0]]]});
        assert!(matches!(geometry_from_value(&short), Err(GeometryError::Malformed(_))));
    }

    #[test]
    fn empty_polygon_is_empty_multipolygon() {
        let value = json!({"type": "Polygon", "coordinates": []});
        assert!(geometry_from_value(&value).unwrap().0.is_empty());
    }

    #[test]
    fn empty_multipolygon_members_are_dropped() {
        let value = json!({"type": "MultiPolygon", "coordinates": [[]]});
        assert!(geometry_from_value(&value).unwrap().0.is_empty());

        let value = json!({
            "type": "MultiPolygon",
            "coordinates": [[], [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 0.0]]]],
        });
        let shape = geometry_from_value(&value).unwrap();
        assert_eq!(shape.0.len(), 1);
        assert!((shape.unsigned_area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn writes_what_it_reads() {
        let value = json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 0.0]]]],
        });
        let shape = geometry_from_value(&value).unwrap();
        assert_eq!(multipolygon_to_value(&shape), value);
    }
}
