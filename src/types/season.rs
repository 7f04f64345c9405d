//! Seasons and the cost multipliers they apply to ingredient categories.
//!
//! Seasonal prices are reported alongside each solution and never affect
//! feasibility or ranking.

use serde::{Deserialize, Serialize};

/// Off-season price factor (the category is scarce).
pub const LOW_SEASON_COST_MULTIPLIER: f64 = 1.25;

/// In-season price factor (the category is plentiful).
pub const HIGH_SEASON_COST_MULTIPLIER: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    /// Price factor for an ingredient of `seasonal_type` in this season.
    ///
    /// Missing or unrecognised categories keep the base price.
    pub fn multiplier(self, seasonal_type: Option<&str>) -> f64 {
        let category = seasonal_type.map(normalize_seasonal_type).unwrap_or_default();
        match (self, category.as_str()) {
            (Season::Spring, "malt") | (Season::Summer, "hops") | (Season::Winter, "fruit") => {
                LOW_SEASON_COST_MULTIPLIER
            }
            (Season::Spring, "fruit") | (Season::Summer, "malt") | (Season::Autumn, "hops") => {
                HIGH_SEASON_COST_MULTIPLIER
            }
            _ => 1.0,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold a free-form category label ("Crystal Malt", "HOPS", "stone-fruit")
/// onto the names the multiplier table knows.
pub fn normalize_seasonal_type(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    for (needle, category) in [("malt", "malt"), ("hop", "hops"), ("fruit", "fruit"), ("yeast", "yeast")] {
        if lower.contains(needle) {
            return category.to_string();
        }
    }
    lower.chars().filter(char::is_ascii_lowercase).collect()
}
