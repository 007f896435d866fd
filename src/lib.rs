mod classify;
mod error;
mod export;
mod geocode;
mod geometry;
mod overpass;
mod palette;
mod plot;
mod records;

pub use classify::{GeoFeature, GeoTable, GroupColumn, Provenance};
pub use error::{Error, Result};
pub use export::{export, ExportFormat};
pub use geocode::{AreaId, Candidate, Geocoder, AREA_ID_OFFSET, NOMINATIM_URL};
pub use geometry::line_from_points;
pub use overpass::{Overpass, WaterwayResponse, OVERPASS_URL};
pub use palette::{color_for, Color};
pub use plot::{bar_plot, map_plot, BarPlot, MapPlot};
pub use records::{normalize, persist, FeatureRow, RecordFile, TAG_WHITELIST};
