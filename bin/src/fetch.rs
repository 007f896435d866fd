use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use waterways::{persist, Geocoder, Overpass, NOMINATIM_URL, OVERPASS_URL};

#[derive(Parser)]
/// Resolve a city, query its waterways, and persist the raw records
pub struct CliArgs {
    /// Place name to geocode (e.g. "Osaka, Japan")
    city: String,
    /// First waterway type to query
    #[arg(long, default_value = "river")]
    kind_a: String,
    /// Second waterway type to query
    #[arg(long, default_value = "canal")]
    kind_b: String,
    /// Directory the record file is written to
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Logical record file name, without extension
    #[arg(long)]
    name: String,
    /// Alternative geocoding endpoint
    #[arg(long, default_value = NOMINATIM_URL)]
    nominatim_url: String,
    /// Alternative Overpass endpoint
    #[arg(long, default_value = OVERPASS_URL)]
    overpass_url: String,
}

pub fn run(args: &CliArgs) -> Result<(), Box<dyn Error>> {
    let area = Geocoder::with_endpoint(args.nominatim_url.as_str()).resolve_area(&args.city)?;
    let response = Overpass::with_endpoint(args.overpass_url.as_str()).fetch_waterways(
        area,
        &args.kind_a,
        &args.kind_b,
    )?;
    let file = persist(&response, &args.dir, &args.name)?;

    println!(
        "saved {} features to {}",
        response.elements.len(),
        file.path().display()
    );

    Ok(())
}
