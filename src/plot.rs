//! Render contexts for the map and bar views.
//!
//! Both entry points resolve grouping, palette colors, and titles up
//! front and return a plain value describing the finished plot. Nothing
//! touches a canvas until the caller asks for SVG output, so a palette
//! miss can never leave a partial render behind.

use std::ops::Range;
use std::path::Path;

use geo_types::LineString;
use itertools::{Itertools, MinMaxResult};
use plotters::prelude::*;
use plotters::style::Color as _;

use crate::classify::{GeoTable, GroupColumn};
use crate::error::{Error, Result};
use crate::palette::{color_for, Color};

const CANVAS_SIZE: (u32, u32) = (1000, 1000);
const LINE_WIDTH: u32 = 1;

/// One styled group of line geometries sharing a label and a color.
#[derive(Debug, Clone)]
struct MapGroup {
    label: String,
    color: Color,
    lines: Vec<LineString<f64>>,
}

/// A map view: every feature's line geometry drawn on one canvas,
/// colored by the chosen grouping column.
#[derive(Debug, Clone)]
pub struct MapPlot {
    title: String,
    groups: Vec<MapGroup>,
}

/// Groups the table's rows by `layer` or `source` and builds the map
/// view. Every group key must have a palette entry; an unrecognized
/// value fails here, before any drawing.
pub fn map_plot(
    table: &GeoTable,
    city: &str,
    kind_a: &str,
    kind_b: &str,
    column: GroupColumn,
) -> Result<MapPlot> {
    let mut groups = Vec::new();
    for (key, members) in table.group_by(column) {
        let color = color_for(column, &key)?;
        let lines = members
            .iter()
            .filter_map(|feature| feature.geometry.clone())
            .collect();
        groups.push(MapGroup {
            label: key,
            color,
            lines,
        });
    }

    Ok(MapPlot {
        title: format!("{}: OSM {}s and {}s by {}", city, kind_a, kind_b, column),
        groups,
    })
}

impl MapPlot {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Renders the map to an SVG document.
    pub fn to_svg(&self) -> Result<String> {
        let mut svg = String::new();
        self.draw(SVGBackend::with_string(&mut svg, CANVAS_SIZE))?;
        Ok(svg)
    }

    /// Renders the map and writes it to the given path.
    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_svg()?)?;
        Ok(())
    }

    fn draw(&self, backend: SVGBackend) -> Result<()> {
        let root = backend.into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let (x_range, y_range) = self.bounds();
        let mut chart = ChartBuilder::on(&root)
            .caption(self.title.as_str(), ("sans-serif", 24))
            .margin(20)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_err)?;

        for group in &self.groups {
            let color = rgb(group.color);
            chart
                .draw_series(group.lines.iter().map(|line| {
                    let coords: Vec<(f64, f64)> = line.coords().map(|c| (c.x, c.y)).collect();
                    PathElement::new(coords, color.stroke_width(LINE_WIDTH))
                }))
                .map_err(render_err)?
                .label(&group.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    /// Lon/lat extent of all drawn lines, padded slightly so strokes at
    /// the edge stay visible. Unit square when there is nothing to draw.
    fn bounds(&self) -> (Range<f64>, Range<f64>) {
        let coords: Vec<(f64, f64)> = self
            .groups
            .iter()
            .flat_map(|group| group.lines.iter())
            .flat_map(|line| line.coords().map(|c| (c.x, c.y)))
            .collect();

        if coords.is_empty() {
            return (0.0..1.0, 0.0..1.0);
        }

        let pad = |minmax: MinMaxResult<f64>| {
            let (lo, hi) = match minmax {
                MinMaxResult::MinMax(lo, hi) => (lo, hi),
                MinMaxResult::OneElement(v) => (v, v),
                MinMaxResult::NoElements => unreachable!("bounds of a non-empty coord set"),
            };
            let span = (hi - lo).max(1e-6);
            (lo - span * 0.05)..(hi + span * 0.05)
        };

        (
            pad(coords.iter().map(|&(x, _)| x).minmax()),
            pad(coords.iter().map(|&(_, y)| y).minmax()),
        )
    }
}

/// A grouped histogram of feature counts by source, sub-grouped by layer.
#[derive(Debug, Clone)]
pub struct BarPlot {
    title: String,
    sources: Vec<String>,
    layers: Vec<(String, Color)>,
    /// counts[source index][layer index]
    counts: Vec<Vec<usize>>,
}

/// Counts the table's features per (source, layer) pair and builds the
/// bar view. Layer colors come from the layer palette and are resolved
/// before any drawing.
pub fn bar_plot(table: &GeoTable, city: &str) -> Result<BarPlot> {
    let mut sources: Vec<String> = Vec::new();
    let mut layer_labels: Vec<String> = Vec::new();
    for feature in table.features() {
        let source = feature.source.to_string();
        if !sources.contains(&source) {
            sources.push(source);
        }
        if !layer_labels.contains(&feature.layer) {
            layer_labels.push(feature.layer.clone());
        }
    }
    layer_labels.sort_by_key(|label| label.parse::<i64>().unwrap_or_default());

    let layers = layer_labels
        .into_iter()
        .map(|label| color_for(GroupColumn::Layer, &label).map(|color| (label, color)))
        .collect::<Result<Vec<_>>>()?;

    let mut counts = vec![vec![0usize; layers.len()]; sources.len()];
    for feature in table.features() {
        let source = feature.source.to_string();
        let si = sources
            .iter()
            .position(|s| *s == source)
            .expect("source collected above");
        let li = layers
            .iter()
            .position(|(label, _)| *label == feature.layer)
            .expect("layer collected above");
        counts[si][li] += 1;
    }

    Ok(BarPlot {
        title: format!("{}: Feature Count of Layers by Source Type", city),
        sources,
        layers,
        counts,
    })
}

impl BarPlot {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Count of features for one (source, layer) pair.
    pub fn count(&self, source: &str, layer: &str) -> usize {
        let si = self.sources.iter().position(|s| s == source);
        let li = self.layers.iter().position(|(label, _)| label == layer);
        match (si, li) {
            (Some(si), Some(li)) => self.counts[si][li],
            _ => 0,
        }
    }

    pub fn to_svg(&self) -> Result<String> {
        let mut svg = String::new();
        self.draw(SVGBackend::with_string(&mut svg, CANVAS_SIZE))?;
        Ok(svg)
    }

    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_svg()?)?;
        Ok(())
    }

    fn draw(&self, backend: SVGBackend) -> Result<()> {
        let root = backend.into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let max_count = self
            .counts
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or_default()
            .max(1);
        let x_max = self.sources.len().max(1) as f64;

        let mut chart = ChartBuilder::on(&root)
            .caption(self.title.as_str(), ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..x_max, 0f64..max_count as f64 * 1.1)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(self.sources.len().max(1))
            .x_label_formatter(&|x| {
                self.sources
                    .get(x.floor() as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .y_desc("feature count")
            .y_label_formatter(&|y| format!("{}", *y as u64))
            .draw()
            .map_err(render_err)?;

        // dodged bars, group shrunk to 80% of its slot
        let bar_width = 0.8 / self.layers.len().max(1) as f64;
        for (si, per_layer) in self.counts.iter().enumerate() {
            for (li, &count) in per_layer.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let x0 = si as f64 + 0.1 + bar_width * li as f64;
                let color = rgb(self.layers[li].1);
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(x0, 0.0), (x0 + bar_width, count as f64)],
                        color.filled(),
                    )))
                    .map_err(render_err)?;
            }
        }

        for (label, color) in &self.layers {
            let color = rgb(*color);
            chart
                .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
                .map_err(render_err)?
                .label(label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}

fn rgb(color: Color) -> RGBColor {
    match color {
        Color::Blue => RGBColor(0, 0, 255),
        Color::Red => RGBColor(255, 0, 0),
        Color::Green => RGBColor(0, 128, 0),
        Color::Grey => RGBColor(128, 128, 128),
        Color::Purple => RGBColor(128, 0, 128),
    }
}

fn render_err(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}
