use std::fmt;

use geo_types::LineString;

use crate::error::Result;
use crate::geometry::line_from_points;
use crate::records::{self, FeatureRow, RecordFile};

/// Data-provenance bucket derived from a feature's `source` tag.
///
/// KSJ2 is Japan's Kokudo Suuchi Jouhou (National Land Numerical
/// Information) dataset; GSI is the Geospatial Information Authority of
/// Japan. Everything else, including features without a source tag, is
/// `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    Ksj2,
    Ksj2Related,
    GsiRelated,
    Other,
}

impl Provenance {
    /// Derives the bucket from a raw source tag. First match wins, and
    /// the exact-match check runs before the substring checks.
    pub fn from_source(source: Option<&str>) -> Self {
        match source {
            Some("KSJ2") => Self::Ksj2,
            Some(s) if s.contains("KSJ2") => Self::Ksj2Related,
            Some(s) if s.contains("GSI") => Self::GsiRelated,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ksj2 => "KSJ2",
            Self::Ksj2Related => "KSJ2-related",
            Self::GsiRelated => "GSI-related",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column a map view can group and color by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupColumn {
    Layer,
    Source,
}

impl GroupColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Layer => "layer",
            Self::Source => "source",
        }
    }
}

impl fmt::Display for GroupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final row shape: the fixed output columns with `layer` stored as text,
/// `source` recoded to its provenance bucket, and the line geometry
/// attached (`None` when the raw point list was not a list).
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub kind: String,
    pub osm_id: u64,
    pub layer: String,
    pub name: Option<String>,
    pub waterway: Option<String>,
    pub source: Provenance,
    pub name_en: Option<String>,
    pub note: Option<String>,
    pub note_ja: Option<String>,
    pub source_ref: Option<String>,
    pub geometry: Option<LineString<f64>>,
}

/// The classified geo-table handed to the visualizer and exporter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoTable {
    features: Vec<GeoFeature>,
}

impl GeoTable {
    /// Projects normalized rows into the final shape. Renames `id` to
    /// `osm_id`, attaches geometry, stringifies `layer`, and recodes
    /// `source`. No failure path; unmatched sources land in `Other`.
    pub fn build(rows: Vec<FeatureRow>) -> Self {
        let features = rows
            .into_iter()
            .map(|row| {
                let geometry = line_from_points(&row.points);
                GeoFeature {
                    kind: row.kind,
                    osm_id: row.id,
                    layer: row.layer.to_string(),
                    name: row.name,
                    waterway: row.waterway,
                    source: Provenance::from_source(row.source.as_deref()),
                    name_en: row.name_en,
                    note: row.note,
                    note_ja: row.note_ja,
                    source_ref: row.source_ref,
                    geometry,
                }
            })
            .collect();
        Self { features }
    }

    /// The normalize -> geometry -> classify preprocessing shared by the
    /// visualizer and exporter entry points.
    pub fn from_records(file: &RecordFile) -> Result<Self> {
        Ok(Self::build(records::normalize(file)?))
    }

    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Groups features by the given column, keys in first-seen order.
    pub fn group_by(&self, column: GroupColumn) -> Vec<(String, Vec<&GeoFeature>)> {
        let mut groups: Vec<(String, Vec<&GeoFeature>)> = Vec::new();
        for feature in &self.features {
            let key = match column {
                GroupColumn::Layer => feature.layer.clone(),
                GroupColumn::Source => feature.source.to_string(),
            };
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(feature),
                None => groups.push((key, vec![feature])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(id: u64, layer: i64, source: Option<&str>) -> FeatureRow {
        FeatureRow {
            kind: "way".to_string(),
            id,
            layer,
            name: None,
            waterway: Some("river".to_string()),
            source: source.map(str::to_string),
            name_en: None,
            note: None,
            note_ja: None,
            source_ref: None,
            points: Value::Null,
        }
    }

    #[test]
    fn provenance_precedence_is_exact_then_substring() {
        assert_eq!(Provenance::from_source(Some("KSJ2")), Provenance::Ksj2);
        assert_eq!(Provenance::from_source(Some("KSJ2_2")), Provenance::Ksj2Related);
        assert_eq!(Provenance::from_source(Some("GSI_DEM")), Provenance::GsiRelated);
        assert_eq!(Provenance::from_source(Some("")), Provenance::Other);
        assert_eq!(Provenance::from_source(Some("OtherAgency")), Provenance::Other);
        assert_eq!(Provenance::from_source(None), Provenance::Other);
    }

    #[test]
    fn ksj2_substring_inside_a_longer_source_is_related() {
        assert_eq!(
            Provenance::from_source(Some("KSJ2; GSI maps")),
            Provenance::Ksj2Related
        );
    }

    #[test]
    fn build_renames_and_recodes() {
        let mut r = row(42, -1, Some("GSI airphoto"));
        r.points = json!([{"lat": 35.0, "lon": 139.0}, {"lat": 35.1, "lon": 139.1}]);
        let table = GeoTable::build(vec![r]);

        let feature = &table.features()[0];
        assert_eq!(feature.osm_id, 42);
        assert_eq!(feature.layer, "-1");
        assert_eq!(feature.source, Provenance::GsiRelated);
        assert_eq!(feature.geometry.as_ref().unwrap().0.len(), 2);
    }

    #[test]
    fn build_keeps_rows_without_geometry() {
        let table = GeoTable::build(vec![row(1, 0, None)]);
        assert_eq!(table.len(), 1);
        assert!(table.features()[0].geometry.is_none());
    }

    #[test]
    fn group_by_source_keeps_first_seen_order() {
        let table = GeoTable::build(vec![
            row(1, 0, Some("KSJ2")),
            row(2, 0, None),
            row(3, 0, Some("KSJ2")),
        ]);

        let groups = table.group_by(GroupColumn::Source);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "KSJ2");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Other");
    }

    #[test]
    fn group_by_layer_uses_the_string_form() {
        let table = GeoTable::build(vec![row(1, -1, None), row(2, 0, None)]);
        let groups = table.group_by(GroupColumn::Layer);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["-1", "0"]);
    }
}
