use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use shapefile::dbase::{FieldValue, Record, TableWriterBuilder};

use crate::classify::{GeoFeature, GeoTable};
use crate::error::{Error, Result};

/// Width of the character attribute fields in the shapefile table.
const ATTRIBUTE_WIDTH: u8 = 80;

/// Output formats understood by [export].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    Shapefile,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "geojson" => Ok(Self::GeoJson),
            "shapefile" => Ok(Self::Shapefile),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Writes the classified geo-table to a geographic file format.
///
/// GeoJSON output is a single `<dir>/<name>.geojson` file. Shapefile
/// output is a directory `<dir>/<name>/` holding the `.shp`/`.shx`/`.dbf`
/// bundle. Returns the path of the written file.
pub fn export(
    table: &GeoTable,
    format: ExportFormat,
    out_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let path = match format {
        ExportFormat::GeoJson => write_geojson(table, out_dir, name)?,
        ExportFormat::Shapefile => write_shapefile(table, out_dir, name)?,
    };
    tracing::info!(file = %path.display(), "export complete");
    Ok(path)
}

fn properties(feature: &GeoFeature) -> JsonObject {
    let mut props = JsonObject::new();
    props.insert("type".to_string(), JsonValue::from(feature.kind.clone()));
    props.insert("osm_id".to_string(), JsonValue::from(feature.osm_id));
    props.insert("layer".to_string(), JsonValue::from(feature.layer.clone()));
    props.insert("name".to_string(), JsonValue::from(feature.name.clone()));
    props.insert(
        "waterway".to_string(),
        JsonValue::from(feature.waterway.clone()),
    );
    props.insert("source".to_string(), JsonValue::from(feature.source.as_str()));
    props.insert(
        "name:en".to_string(),
        JsonValue::from(feature.name_en.clone()),
    );
    props.insert("note".to_string(), JsonValue::from(feature.note.clone()));
    props.insert(
        "note:ja".to_string(),
        JsonValue::from(feature.note_ja.clone()),
    );
    props.insert(
        "source_ref".to_string(),
        JsonValue::from(feature.source_ref.clone()),
    );
    props
}

fn write_geojson(table: &GeoTable, out_dir: &Path, name: &str) -> Result<PathBuf> {
    let features = table
        .features()
        .iter()
        .map(|feature| Feature {
            bbox: None,
            geometry: feature.geometry.as_ref().map(|line| {
                geojson::Geometry::new(geojson::Value::LineString(
                    line.coords().map(|c| vec![c.x, c.y]).collect(),
                ))
            }),
            id: None,
            properties: Some(properties(feature)),
            foreign_members: None,
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let path = out_dir.join(format!("{}.geojson", name));
    fs::write(&path, GeoJson::from(collection).to_string())?;
    Ok(path)
}

fn write_shapefile(table: &GeoTable, out_dir: &Path, name: &str) -> Result<PathBuf> {
    let bundle_dir = out_dir.join(name);
    if !bundle_dir.is_dir() {
        fs::create_dir_all(&bundle_dir)?;
    }
    let path = bundle_dir.join(format!("{}.shp", name));

    let builder = TableWriterBuilder::new()
        .add_character_field(field_name("type")?, ATTRIBUTE_WIDTH)
        .add_numeric_field(field_name("osm_id")?, 18, 0)
        .add_character_field(field_name("layer")?, ATTRIBUTE_WIDTH)
        .add_character_field(field_name("name")?, ATTRIBUTE_WIDTH)
        .add_character_field(field_name("waterway")?, ATTRIBUTE_WIDTH)
        .add_character_field(field_name("source")?, ATTRIBUTE_WIDTH)
        .add_character_field(field_name("name:en")?, ATTRIBUTE_WIDTH)
        .add_character_field(field_name("note")?, ATTRIBUTE_WIDTH)
        .add_character_field(field_name("note:ja")?, ATTRIBUTE_WIDTH)
        .add_character_field(field_name("source_ref")?, ATTRIBUTE_WIDTH);

    let mut writer =
        shapefile::Writer::from_path(&path, builder).map_err(|e| Error::Export(e.to_string()))?;

    let mut skipped = 0usize;
    for feature in table.features() {
        // a .shp polyline needs at least two vertices
        let line = match feature.geometry.as_ref() {
            Some(line) if line.0.len() >= 2 => line,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let points: Vec<shapefile::Point> = line
            .coords()
            .map(|c| shapefile::Point::new(c.x, c.y))
            .collect();
        let polyline = shapefile::Polyline::new(points);

        writer
            .write_shape_and_record(&polyline, &record_for(feature))
            .map_err(|e| Error::Export(e.to_string()))?;
    }

    if skipped > 0 {
        tracing::warn!(skipped, "features without drawable geometry were left out");
    }

    Ok(path)
}

fn field_name(name: &str) -> Result<shapefile::dbase::FieldName> {
    name.try_into()
        .map_err(|e| Error::Export(format!("invalid attribute name {:?}: {:?}", name, e)))
}

fn record_for(feature: &GeoFeature) -> Record {
    let mut record = Record::default();
    record.insert(
        "type".to_string(),
        FieldValue::Character(Some(feature.kind.clone())),
    );
    record.insert(
        "osm_id".to_string(),
        FieldValue::Numeric(Some(feature.osm_id as f64)),
    );
    record.insert(
        "layer".to_string(),
        FieldValue::Character(Some(feature.layer.clone())),
    );
    record.insert("name".to_string(), FieldValue::Character(feature.name.clone()));
    record.insert(
        "waterway".to_string(),
        FieldValue::Character(feature.waterway.clone()),
    );
    record.insert(
        "source".to_string(),
        FieldValue::Character(Some(feature.source.as_str().to_string())),
    );
    record.insert(
        "name:en".to_string(),
        FieldValue::Character(feature.name_en.clone()),
    );
    record.insert("note".to_string(), FieldValue::Character(feature.note.clone()));
    record.insert(
        "note:ja".to_string(),
        FieldValue::Character(feature.note_ja.clone()),
    );
    record.insert(
        "source_ref".to_string(),
        FieldValue::Character(feature.source_ref.clone()),
    );
    record
}
