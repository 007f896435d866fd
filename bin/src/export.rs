use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use waterways::{ExportFormat, GeoTable, RecordFile};

#[derive(Parser)]
/// Export a previously fetched record set as GeoJSON or a shapefile
pub struct CliArgs {
    /// Directory holding the record file
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Logical record file name, without extension
    #[arg(long)]
    name: String,
    /// Output format: geojson or shapefile
    #[arg(long)]
    format: String,
    /// Directory the exported file is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

pub fn run(args: &CliArgs) -> Result<(), Box<dyn Error>> {
    let format: ExportFormat = args.format.parse()?;
    let file = RecordFile::new(&args.dir, args.name.as_str());
    let table = GeoTable::from_records(&file)?;
    let path = waterways::export(&table, format, &args.out_dir, &args.name)?;

    println!("wrote {}", path.display());
    Ok(())
}
