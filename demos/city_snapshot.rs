/// Example program which fetches the rivers and canals of a city,
/// persists the raw records, and exports them as GeoJSON.
///
/// Usage: city_snapshot CITY OUT_DIR
///
/// Talks to the public Nominatim and Overpass endpoints, so it needs
/// network access and a moment of patience for large cities.
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let city = &args[1];
    let out_dir = std::path::PathBuf::from(&args[2]);

    let name = city
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>();

    let area = waterways::Geocoder::new().resolve_area(city)?;
    println!("search area {}", area);

    let response = waterways::Overpass::new().fetch_waterways(area, "river", "canal")?;
    println!("fetched {} features", response.elements.len());

    let file = waterways::persist(&response, &out_dir, &name)?;
    let table = waterways::GeoTable::from_records(&file)?;
    let path = waterways::export(&table, waterways::ExportFormat::GeoJson, &out_dir, &name)?;
    println!("exported {}", path.display());

    Ok(())
}
