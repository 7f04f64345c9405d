//! Color bands and band catalog segments

use serde::{Deserialize, Serialize};

use super::interval::Interval;

/// A named category covering one or more numeric sub-ranges of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Green,
    Yellow,
    Red,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Green, Band::Yellow, Band::Red];

    /// Position inside [`Band::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Band::Green => 0,
            Band::Yellow => 1,
            Band::Red => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Band::Green => "green",
            Band::Yellow => "yellow",
            Band::Red => "red",
        }
    }

    /// Parse a band name, case-insensitively. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|b| b.as_str() == lower)
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One closed numeric range of an attribute tagged with a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSegment {
    pub band: Band,
    pub min: f64,
    pub max: f64,
}

impl BandSegment {
    pub const fn new(band: Band, min: f64, max: f64) -> Self {
        Self { band, min, max }
    }

    pub const fn interval(&self) -> Interval {
        Interval::new(self.min, self.max)
    }
}
