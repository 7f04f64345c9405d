//! Per-attribute target requests

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::band::Band;
use super::interval::Interval;

/// What the caller wants for one attribute.
///
/// Both parts are optional; when both are present the numeric range and band
/// membership are intersected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeRequest {
    /// Explicit numeric range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Interval>,
    /// Acceptable bands; empty means "any band"
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub bands: BTreeSet<Band>,
}

impl AttributeRequest {
    /// No constraint at all.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn range(lo: f64, hi: f64) -> Self {
        Self {
            range: Some(Interval::new(lo, hi)),
            bands: BTreeSet::new(),
        }
    }

    pub fn band(band: Band) -> Self {
        Self {
            range: None,
            bands: BTreeSet::from([band]),
        }
    }

    pub fn bands(bands: impl IntoIterator<Item = Band>) -> Self {
        Self {
            range: None,
            bands: bands.into_iter().collect(),
        }
    }

    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.range = Some(Interval::new(lo, hi));
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.range.is_none() && self.bands.is_empty()
    }
}
