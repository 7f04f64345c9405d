//! JSON catalog loader and validation

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::Catalog;
use crate::types::{
    Attribute, AttributeVector, Band, BandSegment, Ingredient, PerAttribute, Style,
    ATTRIBUTE_COUNT,
};

/// Environment variable naming a catalog file.
pub const CATALOG_ENV_VAR: &str = "ZONEBREW_CATALOG";

/// Load-time catalog errors. The solver never sees a catalog that failed these checks.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog I/O error ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("ingredient '{ingredient}' has {len} values, expected {expected}", expected = ATTRIBUTE_COUNT)]
    VectorLength { ingredient: String, len: usize },
    #[error("style '{style}' base has {len} values, expected {expected}", expected = ATTRIBUTE_COUNT)]
    BaseLength { style: String, len: usize },
    #[error("non-finite value in {0}")]
    NonFinite(String),
    #[error("duplicate ingredient id '{0}'")]
    DuplicateIngredient(String),
    #[error("duplicate style id '{0}'")]
    DuplicateStyle(String),
    #[error("ingredient '{ingredient}' has negative cost {cost}")]
    NegativeCost { ingredient: String, cost: f64 },
    #[error("style '{style}' {attribute} segment has min {min} > max {max}")]
    InvalidSegment {
        style: String,
        attribute: Attribute,
        min: f64,
        max: f64,
    },
    #[error("style '{style}' uses unknown band '{band}'")]
    UnknownBand { style: String, band: String },
    #[error("style '{style}' has bands for unknown attribute '{attribute}'")]
    UnknownAttribute { style: String, attribute: String },
}

// ============================================================================
// Raw document shape
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    ingredients: Vec<RawIngredient>,
    #[serde(default)]
    styles: BTreeMap<String, RawStyle>,
}

#[derive(Debug, Deserialize)]
struct RawIngredient {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    vec: Vec<f64>,
    #[serde(default)]
    cost: Option<f64>,
    #[serde(default, alias = "seasonalType")]
    seasonal_type: Option<String>,
    /// Used as the seasonal type when none is given
    #[serde(default)]
    category_label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStyle {
    #[serde(default)]
    base: Option<Vec<f64>>,
    #[serde(default)]
    min_counts: BTreeMap<String, u32>,
    #[serde(default)]
    bands: BTreeMap<String, Vec<RawSegment>>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    band: String,
    min: f64,
    max: f64,
}

fn to_vector(values: &[f64]) -> Option<AttributeVector> {
    let arr: [f64; ATTRIBUTE_COUNT] = values.try_into().ok()?;
    Some(AttributeVector::new(arr))
}

fn convert_ingredient(index: usize, raw: RawIngredient) -> Result<Ingredient, CatalogError> {
    // Identity falls back to the display name, then the position
    let id = raw
        .id
        .or_else(|| raw.name.clone())
        .unwrap_or_else(|| index.to_string());
    let vector = to_vector(&raw.vec).ok_or_else(|| CatalogError::VectorLength {
        ingredient: id.clone(),
        len: raw.vec.len(),
    })?;
    Ok(Ingredient {
        id,
        name: raw.name,
        vector,
        cost: raw.cost.unwrap_or(0.0),
        seasonal_type: raw.seasonal_type.or(raw.category_label),
    })
}

fn convert_style(
    id: String,
    raw: RawStyle,
    known_ingredients: &HashSet<&str>,
) -> Result<Style, CatalogError> {
    let base = match raw.base {
        Some(values) => to_vector(&values).ok_or_else(|| CatalogError::BaseLength {
            style: id.clone(),
            len: values.len(),
        })?,
        None => AttributeVector::ZERO,
    };

    let mut min_counts = BTreeMap::new();
    for (ingredient, count) in raw.min_counts {
        if known_ingredients.contains(ingredient.as_str()) {
            min_counts.insert(ingredient, count);
        } else {
            warn!(style = %id, ingredient = %ingredient, "Dropping minimum for unknown ingredient");
        }
    }

    let mut bands: PerAttribute<Vec<BandSegment>> = PerAttribute::default();
    for (attr_name, segments) in raw.bands {
        let attribute = Attribute::from_name(&attr_name).ok_or_else(|| {
            CatalogError::UnknownAttribute {
                style: id.clone(),
                attribute: attr_name.clone(),
            }
        })?;
        for seg in segments {
            let band = Band::from_name(&seg.band).ok_or_else(|| CatalogError::UnknownBand {
                style: id.clone(),
                band: seg.band.clone(),
            })?;
            bands[attribute].push(BandSegment::new(band, seg.min, seg.max));
        }
    }

    Ok(Style {
        id,
        base,
        min_counts,
        bands,
    })
}

// ============================================================================
// Validation
// ============================================================================

/// Check every catalog invariant the solver relies on.
pub(super) fn validate(ingredients: &[Ingredient], styles: &[Style]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for ing in ingredients {
        if !seen.insert(ing.id.as_str()) {
            return Err(CatalogError::DuplicateIngredient(ing.id.clone()));
        }
        if !ing.vector.is_finite() {
            return Err(CatalogError::NonFinite(format!("ingredient '{}'", ing.id)));
        }
        if !ing.cost.is_finite() {
            return Err(CatalogError::NonFinite(format!("cost of ingredient '{}'", ing.id)));
        }
        if ing.cost < 0.0 {
            return Err(CatalogError::NegativeCost {
                ingredient: ing.id.clone(),
                cost: ing.cost,
            });
        }
    }

    let mut seen_styles = HashSet::new();
    for style in styles {
        if !seen_styles.insert(style.id.as_str()) {
            return Err(CatalogError::DuplicateStyle(style.id.clone()));
        }
        if !style.base.is_finite() {
            return Err(CatalogError::NonFinite(format!("base of style '{}'", style.id)));
        }
        for (attribute, segments) in style.bands.iter() {
            for seg in segments {
                if !seg.min.is_finite() || !seg.max.is_finite() {
                    return Err(CatalogError::NonFinite(format!(
                        "style '{}' {attribute} segment",
                        style.id
                    )));
                }
                if seg.min > seg.max {
                    return Err(CatalogError::InvalidSegment {
                        style: style.id.clone(),
                        attribute,
                        min: seg.min,
                        max: seg.max,
                    });
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Loading
// ============================================================================

impl Catalog {
    /// Parse and validate a JSON catalog document.
    pub fn from_json_str(contents: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(contents)?;

        let ingredients = raw
            .ingredients
            .into_iter()
            .enumerate()
            .map(|(i, r)| convert_ingredient(i, r))
            .collect::<Result<Vec<_>, _>>()?;

        let known: HashSet<&str> = ingredients.iter().map(|i| i.id.as_str()).collect();
        let styles = raw
            .styles
            .into_iter()
            .map(|(id, r)| convert_style(id, r, &known))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(ingredients, styles)
    }

    /// Load a JSON catalog from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            ingredients = catalog.len(),
            styles = catalog.styles().len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Load the catalog using the standard search order:
    /// 1. `$ZONEBREW_CATALOG`
    /// 2. `configured` (the `catalog.path` config value)
    /// 3. The built-in reference catalog
    ///
    /// A file that exists but fails validation is an error, not a fallback.
    pub fn load(configured: Option<&Path>) -> Result<Self, CatalogError> {
        if let Ok(path) = std::env::var(CATALOG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                return Self::load_from_file(&p);
            }
            warn!(path = %p.display(), "ZONEBREW_CATALOG file not found");
        }

        if let Some(p) = configured {
            if p.exists() {
                return Self::load_from_file(p);
            }
            warn!(path = %p.display(), "Configured catalog file not found");
        }

        info!("No catalog file found, using built-in reference catalog");
        Ok(Self::builtin())
    }
}
