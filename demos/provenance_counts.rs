/// Example program which reads a previously fetched record file and
/// prints how many features each data source contributed, per layer.
///
/// Usage: provenance_counts DIR NAME
use std::error::Error;

use itertools::Itertools;

use waterways::{GeoTable, GroupColumn, RecordFile};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let file = RecordFile::new(&args[1], args[2].as_str());

    let table = GeoTable::from_records(&file)?;
    println!("{} features in {}", table.len(), file.path().display());

    for (source, members) in table.group_by(GroupColumn::Source) {
        let layers = members
            .iter()
            .map(|feature| feature.layer.as_str())
            .counts();

        let breakdown = layers
            .iter()
            .sorted_by_key(|(layer, _)| layer.parse::<i64>().unwrap_or(0))
            .map(|(layer, count)| format!("layer {}: {}", layer, count))
            .join(", ");

        println!("{:<14} {:>5}  ({})", source, members.len(), breakdown);
    }

    Ok(())
}
