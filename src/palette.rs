use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::classify::GroupColumn;
use crate::error::{Error, Result};

/// Named colors used by the map and bar views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Blue,
    Red,
    Green,
    Grey,
    Purple,
}

lazy_static! {
    /// Layer palette: underground layers blue, the layer just below the
    /// surface red, ground level grey, elevated layers green.
    static ref LAYER_PALETTE: HashMap<&'static str, Color> = HashMap::from([
        ("-5", Color::Blue),
        ("-4", Color::Blue),
        ("-3", Color::Blue),
        ("-2", Color::Blue),
        ("-1", Color::Red),
        ("0", Color::Grey),
        ("1", Color::Green),
        ("2", Color::Green),
        ("3", Color::Green),
        ("4", Color::Green),
    ]);

    /// Provenance palette.
    static ref SOURCE_PALETTE: HashMap<&'static str, Color> = HashMap::from([
        ("KSJ2-related", Color::Blue),
        ("KSJ2", Color::Red),
        ("GSI-related", Color::Purple),
        ("Other", Color::Grey),
    ]);
}

/// Looks up the fixed color for a group value. There is no fallback
/// color: a value missing from the palette is an error, raised before
/// any drawing starts.
pub fn color_for(column: GroupColumn, value: &str) -> Result<Color> {
    let palette = match column {
        GroupColumn::Layer => &*LAYER_PALETTE,
        GroupColumn::Source => &*SOURCE_PALETTE,
    };
    palette
        .get(value)
        .copied()
        .ok_or_else(|| Error::Palette {
            column: column.as_str(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_palette_covers_the_fixed_range() {
        assert_eq!(color_for(GroupColumn::Layer, "-5").unwrap(), Color::Blue);
        assert_eq!(color_for(GroupColumn::Layer, "-1").unwrap(), Color::Red);
        assert_eq!(color_for(GroupColumn::Layer, "0").unwrap(), Color::Grey);
        assert_eq!(color_for(GroupColumn::Layer, "4").unwrap(), Color::Green);
    }

    #[test]
    fn source_palette_covers_all_four_buckets() {
        assert_eq!(color_for(GroupColumn::Source, "KSJ2").unwrap(), Color::Red);
        assert_eq!(
            color_for(GroupColumn::Source, "KSJ2-related").unwrap(),
            Color::Blue
        );
        assert_eq!(
            color_for(GroupColumn::Source, "GSI-related").unwrap(),
            Color::Purple
        );
        assert_eq!(color_for(GroupColumn::Source, "Other").unwrap(), Color::Grey);
    }

    #[test]
    fn unknown_values_are_palette_errors() {
        let err = color_for(GroupColumn::Layer, "7").unwrap_err();
        match err {
            Error::Palette { column, value } => {
                assert_eq!(column, "layer");
                assert_eq!(value, "7");
            }
            other => panic!("expected palette error, got {:?}", other),
        }
    }
}
