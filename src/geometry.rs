use geo_types::LineString;
use serde_json::Value;

/// Builds a line geometry from a raw geometry value.
///
/// The raw value is the ordered point list the query backend returned:
/// an array of `{lat, lon}` objects. Points are emitted as
/// (longitude, latitude) pairs in their original order, which is the
/// axis convention the downstream geo writers expect.
///
/// A value that is not an array yields `None`. An empty array yields an
/// empty (degenerate) line, not an error.
pub fn line_from_points(raw: &Value) -> Option<LineString<f64>> {
    let points = raw.as_array()?;

    let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for point in points {
        let lat = point.get("lat").and_then(Value::as_f64);
        let lon = point.get("lon").and_then(Value::as_f64);
        if let (Some(lat), Some(lon)) = (lat, lon) {
            pairs.push((lon, lat));
        }
    }

    Some(LineString::from(pairs))
}
