//! Department boundary polygons loaded from `GeoJSON`.
//!
//! Each feature of the input `FeatureCollection` becomes one [`Boundary`]
//! holding a [`MultiPolygon`] and the department name, both as written in the
//! file and as a normalized join key.

use std::io::Read;
use std::path::Path;

use geo::MultiPolygon;
use geojson::{Feature, GeoJson};

use crate::GeoError;
use crate::normalize::department_key;

/// Property holding the department name in the national boundary layer.
pub const DEFAULT_NAME_PROPERTY: &str = "dpto_cnmbr";

/// A department polygon with its name.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Normalized department name (the join key).
    pub key: String,
    /// Department name as written in the boundary file.
    pub name: String,
    /// Department outline.
    pub geometry: MultiPolygon<f64>,
}

impl Boundary {
    /// Creates a boundary, deriving the join key from `name`.
    #[must_use]
    pub fn new(name: &str, geometry: MultiPolygon<f64>) -> Self {
        Self {
            key: department_key(name),
            name: name.to_string(),
            geometry,
        }
    }

    /// Converts the outline back into a `GeoJSON` geometry for rendering.
    #[must_use]
    pub fn geojson_geometry(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.geometry))
    }
}

/// The immutable set of department boundaries, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    boundaries: Vec<Boundary>,
}

impl BoundarySet {
    /// Wraps already-built boundaries.
    #[must_use]
    pub const fn new(boundaries: Vec<Boundary>) -> Self {
        Self { boundaries }
    }

    /// Loads boundaries from a `GeoJSON` file.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the file cannot be read or any feature is
    /// malformed.
    pub fn load(path: &Path, name_property: &str) -> Result<Self, GeoError> {
        let file = std::fs::File::open(path)?;
        let set = Self::from_reader(std::io::BufReader::new(file), name_property)?;
        log::info!(
            "Loaded {} department boundaries from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    /// Parses boundaries from any `GeoJSON` source.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the input is not a `FeatureCollection`, or a
    /// feature lacks the name property or a (multi)polygon geometry.
    pub fn from_reader<R: Read>(mut reader: R, name_property: &str) -> Result<Self, GeoError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        Self::from_geojson_str(&contents, name_property)
    }

    /// Parses boundaries from a `GeoJSON` string.
    ///
    /// # Errors
    ///
    /// See [`BoundarySet::from_reader`].
    pub fn from_geojson_str(contents: &str, name_property: &str) -> Result<Self, GeoError> {
        let collection = match contents.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(fc) => fc,
            GeoJson::Feature(_) => {
                return Err(GeoError::NotFeatureCollection { found: "Feature" });
            }
            GeoJson::Geometry(_) => {
                return Err(GeoError::NotFeatureCollection { found: "Geometry" });
            }
        };

        let boundaries = collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| parse_feature(index, feature, name_property))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { boundaries })
    }

    /// Returns the boundaries in file order.
    #[must_use]
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Iterates over the boundaries in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Boundary> {
        self.boundaries.iter()
    }

    /// Number of boundaries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Returns `true` if there are no boundaries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

impl<'a> IntoIterator for &'a BoundarySet {
    type Item = &'a Boundary;
    type IntoIter = std::slice::Iter<'a, Boundary>;

    fn into_iter(self) -> Self::IntoIter {
        self.boundaries.iter()
    }
}

fn parse_feature(
    index: usize,
    feature: Feature,
    name_property: &str,
) -> Result<Boundary, GeoError> {
    let name = feature
        .property(name_property)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| GeoError::MissingProperty {
            index,
            property: name_property.to_string(),
        })?
        .to_string();

    let Some(geometry) = feature.geometry else {
        return Err(GeoError::UnsupportedGeometry {
            name,
            found: "null".to_string(),
        });
    };

    let geometry = to_multipolygon(geometry).map_err(|found| GeoError::UnsupportedGeometry {
        name: name.clone(),
        found,
    })?;

    Ok(Boundary::new(&name, geometry))
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types; anything else
/// yields the name of the geometry that was found.
fn to_multipolygon(geometry: geojson::Geometry) -> Result<MultiPolygon<f64>, String> {
    let geo_geom: geo::Geometry<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| e.to_string())?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        geo::Geometry::Point(_) => Err("Point".to_string()),
        geo::Geometry::MultiPoint(_) => Err("MultiPoint".to_string()),
        geo::Geometry::Line(_) | geo::Geometry::LineString(_) => Err("LineString".to_string()),
        geo::Geometry::MultiLineString(_) => Err("MultiLineString".to_string()),
        geo::Geometry::GeometryCollection(_) => Err("GeometryCollection".to_string()),
        _ => Err("non-polygonal geometry".to_string()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a square polygon feature collection entry for tests.
    pub(crate) fn square_feature(name: &str, x: f64, y: f64) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{"dpto_cnmbr":"{name}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x},{y}],[{x1},{y}],[{x1},{y1}],[{x},{y1}],[{x},{y}]]]}}}}"#,
            x1 = x + 1.0,
            y1 = y + 1.0,
        )
    }

    pub(crate) fn collection(features: &[String]) -> String {
        format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        )
    }

    #[test]
    fn parses_polygons_in_order() {
        let input = collection(&[
            square_feature("Huila", -76.0, 2.0),
            square_feature("TOLIMA", -75.5, 4.0),
        ]);
        let set = BoundarySet::from_geojson_str(&input, DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.boundaries()[0].key, "HUILA");
        assert_eq!(set.boundaries()[0].name, "Huila");
        assert_eq!(set.boundaries()[1].key, "TOLIMA");
        assert_eq!(set.boundaries()[0].geometry.0.len(), 1);
    }

    #[test]
    fn parses_multipolygon() {
        let input = collection(&[r#"{"type":"Feature","properties":{"dpto_cnmbr":"SAN ANDRÉS"},"geometry":{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,0]]],[[[2,2],[3,2],[3,3],[2,2]]]]}}"#.to_string()]);
        let set = BoundarySet::from_reader(input.as_bytes(), DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(set.boundaries()[0].key, "SAN ANDRES");
        assert_eq!(set.boundaries()[0].geometry.0.len(), 2);
    }

    #[test]
    fn custom_name_property() {
        let input = collection(&[r#"{"type":"Feature","properties":{"NOMBRE":"Meta"},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}"#.to_string()]);
        let set = BoundarySet::from_geojson_str(&input, "NOMBRE").unwrap();
        assert_eq!(set.boundaries()[0].key, "META");
    }

    #[test]
    fn rejects_missing_property() {
        let input = collection(&[r#"{"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}"#.to_string()]);
        let err = BoundarySet::from_geojson_str(&input, DEFAULT_NAME_PROPERTY).unwrap_err();
        assert!(matches!(err, GeoError::MissingProperty { index: 0, .. }));
    }

    #[test]
    fn rejects_point_geometry() {
        let input = collection(&[r#"{"type":"Feature","properties":{"dpto_cnmbr":"Meta"},"geometry":{"type":"Point","coordinates":[0,0]}}"#.to_string()]);
        let err = BoundarySet::from_geojson_str(&input, DEFAULT_NAME_PROPERTY).unwrap_err();
        match err {
            GeoError::UnsupportedGeometry { name, found } => {
                assert_eq!(name, "Meta");
                assert_eq!(found, "Point");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bare_geometry() {
        let err = BoundarySet::from_geojson_str(
            r#"{"type":"Point","coordinates":[0,0]}"#,
            DEFAULT_NAME_PROPERTY,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GeoError::NotFeatureCollection { found: "Geometry" }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = BoundarySet::from_geojson_str("{not json", DEFAULT_NAME_PROPERTY).unwrap_err();
        assert!(matches!(err, GeoError::GeoJson(_)));
    }
}
