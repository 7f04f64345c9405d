//! Built-in reference catalog: four ale styles and seven ingredients.

use crate::types::{Attribute, Band, BandSegment, Ingredient, Style};

use Band::{Green, Red, Yellow};

fn seg(band: Band, min: f64, max: f64) -> BandSegment {
    BandSegment::new(band, min, max)
}

/// Foam bands are shared by every reference style.
fn foam_bands() -> Vec<BandSegment> {
    vec![seg(Yellow, 0.0, 0.99), seg(Green, 1.0, 3.99), seg(Yellow, 4.0, 1000.0)]
}

fn named(id: &str, name: &str, vector: [f64; 4], cost: f64, seasonal_type: &str) -> Ingredient {
    let mut ing = Ingredient::new(id, vector)
        .with_cost(cost)
        .with_seasonal_type(seasonal_type);
    ing.name = Some(name.to_string());
    ing
}

pub(super) fn reference_data() -> (Vec<Ingredient>, Vec<Style>) {
    //                                              taste color strength foam
    let ingredients = vec![
        named("standard_yeast", "Standard Yeast", [0.5, 0.0, -1.0, -0.5], 2.0, "yeast"),
        named("pale_malt", "Pale Malt", [0.4, 0.3, 1.0, 0.5], 2.0, "malt"),
        named("gruit", "Gruit", [0.5, -0.3, 0.0, 0.0], 3.0, "herb"),
        named("brown_malt", "Brown Malt", [1.6, 2.0, 0.0, 0.0], 3.0, "malt"),
        named("eucalyptus", "Eucalyptus", [1.0, 0.0, -0.2, -0.5], 4.0, "herb"),
        named("amber_malt", "Amber Malt", [0.8, 1.2, 0.5, 0.8], 2.0, "malt"),
        named("honey", "Honey", [1.0, 0.3, 1.0, 0.0], 5.0, "honey"),
    ];

    let light_ale = Style::new("light_ale")
        .with_min("pale_malt", 1)
        .with_min("standard_yeast", 1)
        .with_bands(
            Attribute::Taste,
            vec![seg(Red, 0.0, 0.99), seg(Green, 1.0, 2.99), seg(Yellow, 3.0, 3.99), seg(Red, 4.0, 1000.0)],
        )
        .with_bands(
            Attribute::Color,
            vec![seg(Red, 0.0, 0.99), seg(Green, 1.0, 3.99), seg(Yellow, 4.0, 4.99), seg(Red, 5.0, 1000.0)],
        )
        .with_bands(
            Attribute::Strength,
            vec![seg(Red, 0.0, 0.99), seg(Green, 1.0, 2.99), seg(Yellow, 3.0, 3.99), seg(Red, 4.0, 1000.0)],
        )
        .with_bands(Attribute::Foam, foam_bands());

    let blonde_ale = Style::new("blonde_ale")
        .with_min("gruit", 1)
        .with_min("pale_malt", 1)
        .with_min("standard_yeast", 1)
        .with_bands(
            Attribute::Taste,
            vec![
                seg(Red, 0.0, 0.99),
                seg(Yellow, 1.0, 1.99),
                seg(Green, 2.0, 3.99),
                seg(Yellow, 4.0, 4.99),
                seg(Red, 5.0, 1000.0),
            ],
        )
        .with_bands(
            Attribute::Color,
            vec![seg(Red, 0.0, 0.99), seg(Green, 1.0, 3.99), seg(Yellow, 4.0, 4.99), seg(Red, 5.0, 1000.0)],
        )
        .with_bands(
            Attribute::Strength,
            vec![
                seg(Red, 0.0, 0.99),
                seg(Yellow, 1.0, 1.99),
                seg(Green, 2.0, 3.99),
                seg(Yellow, 4.0, 4.99),
                seg(Red, 5.0, 1000.0),
            ],
        )
        .with_bands(Attribute::Foam, foam_bands());

    let old_ale = Style::new("old_ale")
        .with_min("gruit", 1)
        .with_min("brown_malt", 1)
        .with_min("pale_malt", 1)
        .with_min("standard_yeast", 1)
        .with_bands(
            Attribute::Taste,
            vec![
                seg(Red, 0.0, 1.99),
                seg(Yellow, 2.0, 2.99),
                seg(Green, 3.0, 5.99),
                seg(Yellow, 6.0, 7.99),
                seg(Red, 8.0, 1000.0),
            ],
        )
        .with_bands(
            Attribute::Color,
            vec![
                seg(Red, 0.0, 2.99),
                seg(Yellow, 3.0, 3.99),
                seg(Green, 4.0, 5.99),
                seg(Yellow, 6.0, 6.99),
                seg(Red, 7.0, 1000.0),
            ],
        )
        .with_bands(
            Attribute::Strength,
            vec![
                seg(Red, 0.0, 0.99),
                seg(Yellow, 1.0, 1.99),
                seg(Green, 2.0, 3.99),
                seg(Yellow, 4.0, 4.99),
                seg(Red, 5.0, 1000.0),
            ],
        )
        .with_bands(Attribute::Foam, foam_bands());

    let herb_beer = Style::new("herb_beer")
        .with_min("eucalyptus", 1)
        .with_min("gruit", 1)
        .with_min("honey", 1)
        .with_min("amber_malt", 1)
        .with_min("pale_malt", 1)
        .with_min("standard_yeast", 1)
        .with_bands(
            Attribute::Taste,
            vec![
                seg(Red, 0.0, 3.99),
                seg(Yellow, 4.0, 4.99),
                seg(Green, 5.0, 8.99),
                seg(Yellow, 9.0, 9.99),
                seg(Red, 10.0, 1000.0),
            ],
        )
        .with_bands(
            Attribute::Color,
            vec![
                seg(Red, 0.0, 2.99),
                seg(Yellow, 3.0, 3.99),
                seg(Green, 4.0, 5.99),
                seg(Yellow, 6.0, 6.99),
                seg(Red, 7.0, 1000.0),
            ],
        )
        .with_bands(
            Attribute::Strength,
            vec![
                seg(Red, 0.0, 1.99),
                seg(Yellow, 2.0, 2.99),
                seg(Green, 3.0, 6.99),
                seg(Yellow, 7.0, 7.99),
                seg(Red, 8.0, 1000.0),
            ],
        )
        .with_bands(Attribute::Foam, foam_bands());

    (ingredients, vec![light_ale, blonde_ale, old_ale, herb_beer])
}
