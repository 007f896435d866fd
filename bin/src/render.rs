use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use waterways::{bar_plot, map_plot, GeoTable, GroupColumn, RecordFile};

#[derive(Clone, Copy, ValueEnum)]
pub enum GroupBy {
    Layer,
    Source,
}

impl From<GroupBy> for GroupColumn {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Layer => GroupColumn::Layer,
            GroupBy::Source => GroupColumn::Source,
        }
    }
}

#[derive(Parser)]
/// Draw the line map of a previously fetched record set
pub struct MapArgs {
    /// City name shown in the plot title
    city: String,
    /// First waterway type, for the title
    #[arg(long, default_value = "river")]
    kind_a: String,
    /// Second waterway type, for the title
    #[arg(long, default_value = "canal")]
    kind_b: String,
    /// Directory holding the record file
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Logical record file name, without extension
    #[arg(long)]
    name: String,
    /// Column to group and color by
    #[arg(long, value_enum, default_value = "layer")]
    group_by: GroupBy,
    /// Path of the .svg file to write
    #[arg(long)]
    out: PathBuf,
}

pub fn run_map(args: &MapArgs) -> Result<(), Box<dyn Error>> {
    let file = RecordFile::new(&args.dir, args.name.as_str());
    let table = GeoTable::from_records(&file)?;
    let plot = map_plot(
        &table,
        &args.city,
        &args.kind_a,
        &args.kind_b,
        args.group_by.into(),
    )?;
    plot.save_svg(&args.out)?;

    println!("wrote {}", args.out.display());
    Ok(())
}

#[derive(Parser)]
/// Draw feature counts by source, sub-grouped by layer
pub struct BarArgs {
    /// City name shown in the plot title
    city: String,
    /// Directory holding the record file
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Logical record file name, without extension
    #[arg(long)]
    name: String,
    /// Path of the .svg file to write
    #[arg(long)]
    out: PathBuf,
}

pub fn run_bars(args: &BarArgs) -> Result<(), Box<dyn Error>> {
    let file = RecordFile::new(&args.dir, args.name.as_str());
    let table = GeoTable::from_records(&file)?;
    let plot = bar_plot(&table, &args.city)?;
    plot.save_svg(&args.out)?;

    println!("wrote {}", args.out.display());
    Ok(())
}
