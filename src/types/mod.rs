//! Shared data structures for band-constrained recipe search
//!
//! - Attribute space: `Attribute`, `AttributeVector`, `PerAttribute`
//! - Band catalog pieces: `Band`, `BandSegment`
//! - Intervals: `Interval`, `IntervalBox`
//! - Catalog records: `Ingredient`, `Style`
//! - Requests and results: `AttributeRequest`, `Solution`, `SearchOutcome`
//! - Seasonal pricing: `Season`

mod attribute;
mod band;
mod catalog;
mod interval;
mod request;
mod season;
mod solution;

pub use attribute::*;
pub use band::*;
pub use catalog::*;
pub use interval::*;
pub use request::*;
pub use season::*;
pub use solution::*;
