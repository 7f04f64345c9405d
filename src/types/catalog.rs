//! Ingredient and style records as held by a loaded catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::attribute::{Attribute, AttributeVector, PerAttribute};
use super::band::BandSegment;

/// A discrete ingredient and its per-unit contribution to every attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: String,
    /// Human-readable name (falls back to `id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Per-unit contribution to each attribute
    #[serde(rename = "vec")]
    pub vector: AttributeVector,
    /// Unit cost, informational only
    #[serde(default)]
    pub cost: f64,
    /// Category label that selects a seasonal price multiplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_type: Option<String>,
}

impl Ingredient {
    pub fn new(id: impl Into<String>, vector: [f64; 4]) -> Self {
        Self {
            id: id.into(),
            name: None,
            vector: AttributeVector::new(vector),
            cost: 0.0,
            seasonal_type: None,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_seasonal_type(mut self, seasonal_type: impl Into<String>) -> Self {
        self.seasonal_type = Some(seasonal_type.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A product style: base totals, mandatory ingredients and its band catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub id: String,
    /// Attribute totals before any ingredient is added
    #[serde(default)]
    pub base: AttributeVector,
    /// Ingredient id -> required minimum quantity
    #[serde(default)]
    pub min_counts: BTreeMap<String, u32>,
    /// Per attribute, ordered band segments
    #[serde(default)]
    pub bands: PerAttribute<Vec<BandSegment>>,
}

impl Style {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base: AttributeVector::ZERO,
            min_counts: BTreeMap::new(),
            bands: PerAttribute::default(),
        }
    }

    pub fn with_min(mut self, ingredient: impl Into<String>, count: u32) -> Self {
        self.min_counts.insert(ingredient.into(), count);
        self
    }

    pub fn with_bands(mut self, attr: Attribute, segments: Vec<BandSegment>) -> Self {
        self.bands[attr] = segments;
        self
    }

    pub fn segments(&self, attr: Attribute) -> &[BandSegment] {
        &self.bands[attr]
    }
}
