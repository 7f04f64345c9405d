//! Ingredient and style catalog
//!
//! A [`Catalog`] is constructed once at start-up and shared read-only
//! (`Arc<Catalog>`) for the lifetime of the process. It is the only source of
//! `Ingredient` and `Style` records for the solver.
//!
//! ## Loading Order
//!
//! 1. `ZONEBREW_CATALOG` environment variable (path to a JSON catalog)
//! 2. `catalog.path` from the service configuration
//! 3. The built-in reference catalog
//!
//! Every catalog, file-backed or built-in, passes the same validation:
//! four finite values per ingredient vector, unique ingredient ids and
//! `min <= max` on every band segment.

mod builtin;
mod loader;

pub use loader::CatalogError;

use std::collections::HashMap;

use crate::types::{Ingredient, Style};

/// Immutable collection of ingredients and styles.
#[derive(Debug, Clone)]
pub struct Catalog {
    ingredients: Vec<Ingredient>,
    styles: Vec<Style>,
    ingredient_index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, validating every record.
    pub fn new(ingredients: Vec<Ingredient>, styles: Vec<Style>) -> Result<Self, CatalogError> {
        loader::validate(&ingredients, &styles)?;
        Ok(Self::from_validated(ingredients, styles))
    }

    fn from_validated(ingredients: Vec<Ingredient>, mut styles: Vec<Style>) -> Self {
        styles.sort_by(|a, b| a.id.cmp(&b.id));
        let ingredient_index = ingredients
            .iter()
            .enumerate()
            .map(|(i, ing)| (ing.id.clone(), i))
            .collect();
        Self {
            ingredients,
            styles,
            ingredient_index,
        }
    }

    /// The reference catalog shipped with the binary.
    pub fn builtin() -> Self {
        let (ingredients, styles) = builtin::reference_data();
        Self::from_validated(ingredients, styles)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Styles sorted by id.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn style(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn ingredient_index(&self, id: &str) -> Option<usize> {
        self.ingredient_index.get(id).copied()
    }

    pub fn contains_ingredient(&self, id: &str) -> bool {
        self.ingredient_index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}
