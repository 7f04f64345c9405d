//! Band catalog lookups

use crate::types::{Attribute, Band, Interval, Style};

/// Every segment of `attr` tagged with `band`, as closed intervals, in catalog order.
pub fn intervals_for_band(style: &Style, attr: Attribute, band: Band) -> Vec<Interval> {
    style
        .segments(attr)
        .iter()
        .filter(|seg| seg.band == band)
        .map(|seg| seg.interval())
        .collect()
}

/// Band of the first segment (catalog order) containing `value`.
///
/// `None` when the value falls into a gap of the catalog.
pub fn detect_band(style: &Style, attr: Attribute, value: f64) -> Option<Band> {
    style
        .segments(attr)
        .iter()
        .find(|seg| seg.interval().contains(value))
        .map(|seg| seg.band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BandSegment;

    fn style() -> Style {
        Style::new("test").with_bands(
            Attribute::Taste,
            vec![
                BandSegment::new(Band::Red, 0.0, 0.99),
                BandSegment::new(Band::Green, 1.0, 2.99),
                BandSegment::new(Band::Red, 4.0, 1000.0),
            ],
        )
    }

    #[test]
    fn keeps_every_segment_of_a_band() {
        let reds = intervals_for_band(&style(), Attribute::Taste, Band::Red);
        assert_eq!(reds, vec![Interval::new(0.0, 0.99), Interval::new(4.0, 1000.0)]);
        assert!(intervals_for_band(&style(), Attribute::Taste, Band::Yellow).is_empty());
        assert!(intervals_for_band(&style(), Attribute::Foam, Band::Red).is_empty());
    }

    #[test]
    fn detects_band_with_tolerance() {
        let s = style();
        assert_eq!(detect_band(&s, Attribute::Taste, 1.0), Some(Band::Green));
        assert_eq!(detect_band(&s, Attribute::Taste, 2.99 + 5e-10), Some(Band::Green));
        assert_eq!(detect_band(&s, Attribute::Taste, 0.5), Some(Band::Red));
    }

    #[test]
    fn gaps_map_to_no_band() {
        let s = style();
        assert_eq!(detect_band(&s, Attribute::Taste, 3.5), None);
        assert_eq!(detect_band(&s, Attribute::Taste, -0.1), None);
        assert_eq!(detect_band(&s, Attribute::Color, 1.0), None);
    }
}
