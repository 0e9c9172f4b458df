//! Park outline loading from an OpenStreetMap-style JSON export.
//!
//! The export lists `node` elements (id, lat, lon) and a `way` element whose
//! `nodes` array references node ids in outline order. Resolving the
//! references yields a closed polygon.

use super::GeoPoint;
use geo_types::{LineString, Polygon};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Structural problem that makes a document unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaViolation {
    /// The root has no `elements` array.
    MissingElements,
    /// No `way` element with a `nodes` array was found.
    MissingWay,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaViolation::MissingElements => write!(f, "missing elements array"),
            SchemaViolation::MissingWay => write!(f, "missing way"),
        }
    }
}

/// Fatal errors that abort loading a contour.
#[derive(Debug)]
pub enum ParseError {
    /// The document could not be opened or read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The document is not well-formed JSON.
    Syntax {
        origin: String,
        line: usize,
        column: usize,
        message: String,
    },
    /// The document is valid JSON but lacks a required part.
    Schema {
        origin: String,
        violation: SchemaViolation,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Read { path, source } => {
                write!(f, "Could not read file {}: {}", path.display(), source)
            }
            ParseError::Syntax {
                origin,
                line,
                column,
                message,
            } => write!(
                f,
                "Could not parse JSON file {} at line {}, column {}: {}",
                origin, line, column, message
            ),
            ParseError::Schema { origin, violation } => {
                write!(f, "Invalid contour file {}: {}", origin, violation)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A skipped item. Loading continues past these.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDiagnostic {
    /// The node at this index of `elements` lacks a numeric id, lat or lon.
    MalformedNode { index: usize },
    /// The way reference at this position is not a number in the id range.
    MalformedWayRef { position: usize },
    /// No node carries the referenced id.
    UnresolvedNode { id: i64 },
}

impl std::fmt::Display for ItemDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemDiagnostic::MalformedNode { index } => write!(
                f,
                "element {} of type 'node' lacks a numeric 'id', 'lat' or 'lon'",
                index
            ),
            ItemDiagnostic::MalformedWayRef { position } => {
                write!(f, "way reference {} is not a valid node id", position)
            }
            ItemDiagnostic::UnresolvedNode { id } => {
                write!(f, "could not find node with id {}", id)
            }
        }
    }
}

/// An ordered outline, implicitly closed from the last point to the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub points: Vec<GeoPoint>,
    /// Items skipped while loading
    pub diagnostics: Vec<ItemDiagnostic>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeoPoint> {
        self.points.iter()
    }

    /// Edges of the closed outline, including the one from the last point
    /// back to the first.
    pub fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = if self.points.len() < 2 {
            0
        } else {
            self.points.len()
        };
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// The outline as a polygon (x = lon, y = lat), without holes.
    pub fn to_polygon(&self) -> Polygon<f64> {
        let exterior: LineString<f64> = self.points.iter().copied().collect();
        Polygon::new(exterior, Vec::new())
    }
}

/// Reads and parses the export at `path`.
pub fn build_contour(path: impl AsRef<Path>) -> Result<Contour, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_contour(&text, &path.display().to_string())
}

/// Parses an export already in memory. `origin` names it in errors.
pub fn parse_contour(text: &str, origin: &str) -> Result<Contour, ParseError> {
    let root: Value = serde_json::from_str(text).map_err(|e| ParseError::Syntax {
        origin: origin.to_string(),
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;

    let schema_error = |violation| ParseError::Schema {
        origin: origin.to_string(),
        violation,
    };

    let elements = root
        .get("elements")
        .and_then(Value::as_array)
        .ok_or_else(|| schema_error(SchemaViolation::MissingElements))?;

    let mut nodes: Vec<(i64, GeoPoint)> = Vec::new();
    let mut way_refs: Option<&Value> = None;
    let mut diagnostics = Vec::new();

    for (index, element) in elements.iter().enumerate() {
        let Some(kind) = element.get("type").and_then(Value::as_str) else {
            continue;
        };

        match kind {
            // A later way replaces an earlier one, even when it has no `nodes`
            "way" => way_refs = element.get("nodes"),
            "node" => {
                let id = element.get("id").and_then(json_id);
                let lat = element.get("lat").and_then(Value::as_f64);
                let lon = element.get("lon").and_then(Value::as_f64);
                match (id, lat, lon) {
                    (Some(id), Some(lat), Some(lon)) => {
                        nodes.push((id, GeoPoint::new(lat, lon)));
                    }
                    _ => {
                        let diagnostic = ItemDiagnostic::MalformedNode { index };
                        log::warn!("{}: {}", origin, diagnostic);
                        diagnostics.push(diagnostic);
                    }
                }
            }
            _ => {}
        }
    }

    let refs = way_refs
        .and_then(Value::as_array)
        .ok_or_else(|| schema_error(SchemaViolation::MissingWay))?;

    let mut points = Vec::with_capacity(refs.len());
    for (position, reference) in refs.iter().enumerate() {
        let Some(id) = json_id(reference) else {
            let diagnostic = ItemDiagnostic::MalformedWayRef { position };
            log::warn!("{}: {}", origin, diagnostic);
            diagnostics.push(diagnostic);
            continue;
        };

        // First match wins for duplicate ids
        match nodes.iter().find(|(node_id, _)| *node_id == id) {
            Some((_, point)) => points.push(*point),
            None => {
                let diagnostic = ItemDiagnostic::UnresolvedNode { id };
                log::warn!("{}: {}", origin, diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    log::debug!(
        "{}: {} nodes, {} way references, {} contour points",
        origin,
        nodes.len(),
        refs.len(),
        points.len()
    );

    Ok(Contour {
        points,
        diagnostics,
    })
}

/// Reads a node id. Fractional ids are truncated toward zero; ids outside
/// the `i64` range are rejected.
fn json_id(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    if value.is_u64() {
        return None;
    }
    value
        .as_f64()
        .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "version": 0.6,
        "elements": [
            { "type": "node", "id": 10, "lat": 48.870, "lon": 2.770 },
            { "type": "node", "id": 20, "lat": 48.871, "lon": 2.780 },
            { "type": "node", "id": 30, "lat": 48.875, "lon": 2.775 },
            { "type": "way", "id": 1, "nodes": [10, 20, 30], "tags": { "name": "park" } }
        ]
    }"#;

    fn parse(text: &str) -> Result<Contour, ParseError> {
        parse_contour(text, "test.json")
    }

    #[test]
    fn test_order_follows_way() {
        let contour = parse(SAMPLE).unwrap();
        assert_eq!(
            contour.points,
            vec![
                GeoPoint::new(48.870, 2.770),
                GeoPoint::new(48.871, 2.780),
                GeoPoint::new(48.875, 2.775),
            ]
        );
        assert!(contour.diagnostics.is_empty());
    }

    #[test]
    fn test_way_order_differs_from_node_order() {
        let text = SAMPLE.replace("[10, 20, 30]", "[30, 10, 20, 30]");
        let contour = parse(&text).unwrap();
        let lats: Vec<f64> = contour.iter().map(|p| p.lat).collect();
        assert_eq!(lats, vec![48.875, 48.870, 48.871, 48.875]);
    }

    #[test]
    fn test_unresolved_id_is_skipped() {
        let text = SAMPLE.replace("[10, 20, 30]", "[10, 99, 30]");
        let contour = parse(&text).unwrap();
        assert_eq!(
            contour.points,
            vec![GeoPoint::new(48.870, 2.770), GeoPoint::new(48.875, 2.775)]
        );
        assert_eq!(
            contour.diagnostics,
            vec![ItemDiagnostic::UnresolvedNode { id: 99 }]
        );
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let text = r#"{ "elements": [
            { "type": "node", "id": 1, "lat": 1.0, "lon": 2.0 },
            { "type": "node", "id": 2, "lat": "north", "lon": 2.0 },
            { "type": "node", "lat": 3.0, "lon": 4.0 },
            { "type": 7, "id": 3 },
            { "id": 4, "lat": 5.0, "lon": 6.0 },
            { "type": "relation", "members": [] },
            { "type": "way", "nodes": [1, "two", 2, 1.0] }
        ] }"#;
        let contour = parse(text).unwrap();
        assert_eq!(
            contour.points,
            vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(1.0, 2.0)]
        );
        assert_eq!(
            contour.diagnostics,
            vec![
                ItemDiagnostic::MalformedNode { index: 1 },
                ItemDiagnostic::MalformedNode { index: 2 },
                ItemDiagnostic::MalformedWayRef { position: 1 },
                ItemDiagnostic::UnresolvedNode { id: 2 },
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first() {
        let text = r#"{ "elements": [
            { "type": "node", "id": 5, "lat": 1.0, "lon": 1.0 },
            { "type": "node", "id": 5, "lat": 2.0, "lon": 2.0 },
            { "type": "way", "nodes": [5] }
        ] }"#;
        let contour = parse(text).unwrap();
        assert_eq!(contour.points, vec![GeoPoint::new(1.0, 1.0)]);
    }

    #[test]
    fn test_last_way_wins() {
        let text = r#"{ "elements": [
            { "type": "node", "id": 1, "lat": 1.0, "lon": 1.0 },
            { "type": "node", "id": 2, "lat": 2.0, "lon": 2.0 },
            { "type": "way", "nodes": [1] },
            { "type": "way", "nodes": [2, 1] }
        ] }"#;
        let contour = parse(text).unwrap();
        assert_eq!(
            contour.points,
            vec![GeoPoint::new(2.0, 2.0), GeoPoint::new(1.0, 1.0)]
        );

        let text = r#"{ "elements": [
            { "type": "way", "nodes": [1] },
            { "type": "way" }
        ] }"#;
        assert!(matches!(
            parse(text),
            Err(ParseError::Schema {
                violation: SchemaViolation::MissingWay,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_elements_is_schema_error() {
        for text in [
            r#"{ "nodes": [] }"#,
            r#"{ "elements": { "type": "way" } }"#,
            r#"[1, 2, 3]"#,
        ] {
            assert!(matches!(
                parse(text),
                Err(ParseError::Schema {
                    violation: SchemaViolation::MissingElements,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_missing_way_is_schema_error() {
        let text = r#"{ "elements": [
            { "type": "node", "id": 1, "lat": 1.0, "lon": 1.0 }
        ] }"#;
        assert!(matches!(
            parse(text),
            Err(ParseError::Schema {
                violation: SchemaViolation::MissingWay,
                ..
            })
        ));

        let text = r#"{ "elements": [ { "type": "way", "nodes": 12 } ] }"#;
        assert!(matches!(
            parse(text),
            Err(ParseError::Schema {
                violation: SchemaViolation::MissingWay,
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_document_is_syntax_error() {
        let truncated = &SAMPLE[..SAMPLE.len() / 2];
        match parse(truncated) {
            Err(ParseError::Syntax { origin, line, .. }) => {
                assert_eq!(origin, "test.json");
                assert!(line > 1);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_way_is_valid() {
        let text = r#"{ "elements": [ { "type": "way", "nodes": [] } ] }"#;
        let contour = parse(text).unwrap();
        assert!(contour.is_empty());
        assert_eq!(contour.segments().count(), 0);
    }

    #[test]
    fn test_segments_wrap_around() {
        let contour = parse(SAMPLE).unwrap();
        let segments: Vec<_> = contour.segments().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].0, contour.points[2]);
        assert_eq!(segments[2].1, contour.points[0]);
    }

    #[test]
    fn test_polygon_is_closed() {
        let contour = parse(SAMPLE).unwrap();
        let polygon = contour.to_polygon();
        let exterior = polygon.exterior();
        assert_eq!(exterior.0.len(), 4);
        assert_eq!(exterior.0.first(), exterior.0.last());
        assert_eq!(exterior.0[1].x, 2.780);
    }

    #[test]
    fn test_ids_beyond_i64_are_malformed() {
        let text = r#"{ "elements": [
            { "type": "node", "id": 9223372036854775807, "lat": 1.0, "lon": 1.0 },
            { "type": "node", "id": 18446744073709551615, "lat": 2.0, "lon": 2.0 },
            { "type": "way", "nodes": [18446744073709551615, 9223372036854775807, 1e300] }
        ] }"#;
        let contour = parse(text).unwrap();
        assert_eq!(contour.points, vec![GeoPoint::new(1.0, 1.0)]);
        assert_eq!(
            contour.diagnostics,
            vec![
                ItemDiagnostic::MalformedNode { index: 1 },
                ItemDiagnostic::MalformedWayRef { position: 0 },
                ItemDiagnostic::MalformedWayRef { position: 2 },
            ]
        );
    }

    #[test]
    fn test_build_from_file_is_idempotent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let first = build_contour(file.path()).unwrap();
        let second = build_contour(file.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contour.json");
        match build_contour(&path) {
            Err(ParseError::Read { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected read error, got {:?}", other),
        }
    }
}
