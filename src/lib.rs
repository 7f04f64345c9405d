//! zonebrew: band-constrained recipe search
//!
//! Finds integer ingredient mixes whose attribute totals land inside
//! caller-chosen target zones (numeric ranges and/or color bands).
//!
//! ## Architecture
//!
//! - **Types**: attribute space, bands, intervals, catalog records, results
//! - **Catalog**: validated, immutable ingredient and style collection
//! - **Solver**: constraint compiler, band-count enumerator, bounded DFS, ranking
//! - **API**: axum JSON endpoints over catalog and solver
//! - **Config**: TOML service configuration

pub mod api;
pub mod catalog;
pub mod config;
pub mod solver;
pub mod types;

// Re-export service configuration
pub use config::ServiceConfig;

// Re-export the catalog and the search entry point
pub use catalog::{Catalog, CatalogError};
pub use solver::{search, SearchError, SearchParams};

// Re-export commonly used types
pub use types::{
    Attribute, AttributeRequest, AttributeVector, Band, BandSegment, Ingredient, Interval,
    PerAttribute, SearchNote, SearchOutcome, Season, Solution, Style,
};
