use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::overpass::WaterwayResponse;

/// Tag keys that survive normalization. Anything else in a feature's tag
/// mapping is discarded.
pub const TAG_WHITELIST: [&str; 8] = [
    "layer",
    "name",
    "waterway",
    "source",
    "name:en",
    "note",
    "note:ja",
    "source_ref",
];

/// A malformed layer value seen in the source data. Rows carrying it are
/// dropped entirely rather than coerced.
const LAYER_SENTINEL: &str = "-.";

/// Handle to a persisted record set. [persist] returns one and the later
/// stages require it, so the path is derived in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFile {
    dir: PathBuf,
    name: String,
}

impl RecordFile {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// The logical name, without directory or extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.name))
    }
}

/// Writes the fetched feature list as a JSON array to `<dir>/<name>.json`,
/// overwriting any previous file of the same name.
pub fn persist(response: &WaterwayResponse, dir: &Path, name: &str) -> Result<RecordFile> {
    let file = RecordFile::new(dir, name);
    let body = serde_json::to_string(&response.elements)?;
    fs::write(file.path(), body)?;
    tracing::info!(
        file = %file.path().display(),
        "saved {} feature records",
        response.elements.len()
    );
    Ok(file)
}

/// One feature record flattened into the fixed column set.
///
/// `layer` is already cleaned here: the `-.` sentinel never reaches this
/// struct, and missing or non-numeric values default to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Element type as reported by the query backend (`way`).
    pub kind: String,
    pub id: u64,
    pub layer: i64,
    pub name: Option<String>,
    pub waterway: Option<String>,
    pub source: Option<String>,
    pub name_en: Option<String>,
    pub note: Option<String>,
    pub note_ja: Option<String>,
    pub source_ref: Option<String>,
    /// Raw geometry value, inspected later by the geometry builder.
    pub points: Value,
}

/// Reads a persisted record set back and expands each record's tag mapping
/// into the whitelisted columns.
///
/// Rows whose layer tag is exactly `-.` are dropped, so the output may be
/// shorter than the persisted array.
pub fn normalize(file: &RecordFile) -> Result<Vec<FeatureRow>> {
    let path = file.path();
    if !path.exists() {
        return Err(Error::Read(path));
    }
    let body = fs::read_to_string(&path)?;
    let records: Vec<Value> = serde_json::from_str(&body)?;

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let tags = record.get("tags");
        let tag = |key: &str| -> Option<String> {
            tags.and_then(|t| t.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let raw_layer = tag("layer");
        if raw_layer.as_deref() == Some(LAYER_SENTINEL) {
            continue;
        }

        rows.push(FeatureRow {
            kind: record
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            id: record.get("id").and_then(Value::as_u64).unwrap_or_default(),
            layer: raw_layer
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or_default(),
            name: tag("name"),
            waterway: tag("waterway"),
            source: tag("source"),
            name_en: tag("name:en"),
            note: tag("note"),
            note_ja: tag("note:ja"),
            source_ref: tag("source_ref"),
            points: record.get("geometry").cloned().unwrap_or(Value::Null),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_records(dir: &Path, name: &str, body: &str) -> RecordFile {
        let file = RecordFile::new(dir, name);
        fs::write(file.path(), body).unwrap();
        file
    }

    #[test]
    fn record_file_builds_the_json_path() {
        let file = RecordFile::new("/tmp/data", "osaka_rivers");
        assert_eq!(file.path(), PathBuf::from("/tmp/data/osaka_rivers.json"));
        assert_eq!(file.name(), "osaka_rivers");
    }

    #[test]
    fn persist_then_normalize_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let response: WaterwayResponse = serde_json::from_str(
            r#"{"elements": [
                {"type": "way", "id": 1,
                 "tags": {"waterway": "river", "source": "KSJ2"},
                 "geometry": [{"lat": 35.0, "lon": 139.0}, {"lat": 35.1, "lon": 139.1}]},
                {"type": "way", "id": 2, "tags": {"waterway": "canal", "layer": "-1"}}
            ]}"#,
        )
        .unwrap();

        let file = persist(&response, dir.path(), "rivers").unwrap();
        assert!(file.path().exists());

        let rows = normalize(&file).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].source.as_deref(), Some("KSJ2"));
        assert_eq!(rows[1].layer, -1);
    }

    #[test]
    fn sentinel_layer_rows_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_records(
            dir.path(),
            "sentinel",
            r#"[
                {"type": "way", "id": 1, "tags": {"layer": "-."}},
                {"type": "way", "id": 2, "tags": {"layer": "2"}},
                {"type": "way", "id": 3, "tags": {}}
            ]"#,
        );

        let rows = normalize(&file).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 2);
        assert_eq!(rows[0].layer, 2);
        assert_eq!(rows[1].id, 3);
    }

    #[test]
    fn missing_and_non_numeric_layers_default_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_records(
            dir.path(),
            "layers",
            r#"[
                {"type": "way", "id": 1, "tags": {}},
                {"type": "way", "id": 2, "tags": {"layer": "ground"}}
            ]"#,
        );

        let rows = normalize(&file).unwrap();
        assert!(rows.iter().all(|row| row.layer == 0));
    }

    #[test]
    fn whitelisted_fields_materialize_even_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_records(dir.path(), "bare", r#"[{"type": "way", "id": 9}]"#);

        let rows = normalize(&file).unwrap();
        let row = &rows[0];
        assert_eq!(row.name, None);
        assert_eq!(row.waterway, None);
        assert_eq!(row.source, None);
        assert_eq!(row.name_en, None);
        assert_eq!(row.note, None);
        assert_eq!(row.note_ja, None);
        assert_eq!(row.source_ref, None);
        assert_eq!(row.points, Value::Null);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = RecordFile::new(dir.path(), "never_written");
        match normalize(&file) {
            Err(Error::Read(path)) => assert!(path.ends_with("never_written.json")),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_records(dir.path(), "corrupt", "not json at all");
        assert!(matches!(normalize(&file), Err(Error::Json(_))));
    }
}
